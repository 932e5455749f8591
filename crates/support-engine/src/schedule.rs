//! Versioned statutory schedule
//!
//! Percentages and income caps change by legislative update, so none of them
//! are compiled into the calculators. Every calculation receives a
//! [`StatutorySchedule`], usually loaded from a TOML file such as
//! `schedules/ny-2024.toml`:
//!
//! ```toml
//! version = "NY-2024-03"
//! effective_date = "2024-03-01"
//!
//! [child_support]
//! combined_income_cap = "183000"
//! percentages = ["0.17", "0.25", "0.29", "0.31", "0.35"]
//!
//! [maintenance]
//! payor_income_cap = "228000"
//! combined_share = "0.40"
//!
//! [maintenance.with_child_support]
//! payor_rate = "0.20"
//! payee_rate = "0.25"
//!
//! [maintenance.without_child_support]
//! payor_rate = "0.30"
//! payee_rate = "0.20"
//! ```

use crate::error::{AnalysisError, Result};
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatutorySchedule {
    /// Label carried into every report, e.g. "NY-2024-03"
    pub version: String,
    pub effective_date: NaiveDate,
    pub child_support: ChildSupportSchedule,
    pub maintenance: MaintenanceSchedule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildSupportSchedule {
    pub combined_income_cap: Decimal,
    /// Index 0 is one child; the last entry covers every larger count
    pub percentages: Vec<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub payor_income_cap: Decimal,
    /// Share of combined income used by the second formula track
    pub combined_share: Decimal,
    pub with_child_support: MaintenanceRates,
    pub without_child_support: MaintenanceRates,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRates {
    pub payor_rate: Decimal,
    pub payee_rate: Decimal,
}

impl StatutorySchedule {
    /// Load and validate a schedule from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed or a required key is missing
    /// - The figures fail [`StatutorySchedule::validate`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use support_engine::StatutorySchedule;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let schedule = StatutorySchedule::from_file("schedules/ny-2024.toml")?;
    /// println!("{} effective {}", schedule.version, schedule.effective_date);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schedule file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Invalid schedule file: {}", path.display()))
    }

    /// Parse and validate a schedule from a TOML string.
    ///
    /// A missing table or key is a configuration error; nothing is defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if the TOML is malformed, a
    /// required key is missing or the figures fail validation
    ///
    /// # Example
    ///
    /// ```
    /// use support_engine::StatutorySchedule;
    ///
    /// # fn example() -> support_engine::Result<()> {
    /// let toml = r#"
    ///     version = "NY-2024-03"
    ///     effective_date = "2024-03-01"
    ///
    ///     [child_support]
    ///     combined_income_cap = "183000"
    ///     percentages = ["0.17", "0.25", "0.29", "0.31", "0.35"]
    ///
    ///     [maintenance]
    ///     payor_income_cap = "228000"
    ///     combined_share = "0.40"
    ///
    ///     [maintenance.with_child_support]
    ///     payor_rate = "0.20"
    ///     payee_rate = "0.25"
    ///
    ///     [maintenance.without_child_support]
    ///     payor_rate = "0.30"
    ///     payee_rate = "0.20"
    /// "#;
    /// let schedule = StatutorySchedule::from_str(toml)?;
    /// assert_eq!(schedule.child_support.percentages.len(), 5);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> Result<Self> {
        let schedule: StatutorySchedule = toml::from_str(s)
            .map_err(|e| AnalysisError::configuration("schedule", e.message().to_string()))?;
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check caps, percentages and rates.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] naming the first offending key:
    /// an empty version label, a negative cap, an empty or decreasing
    /// percentage table, or a rate outside 0..=1
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(AnalysisError::configuration(
                "version",
                "schedule version label is empty",
            ));
        }

        ensure_non_negative(
            "child_support.combined_income_cap",
            self.child_support.combined_income_cap,
        )?;

        let percentages = &self.child_support.percentages;
        if percentages.is_empty() {
            return Err(AnalysisError::configuration(
                "child_support.percentages",
                "percentage table is empty",
            ));
        }
        for (i, pct) in percentages.iter().enumerate() {
            ensure_fraction(&format!("child_support.percentages[{}]", i), *pct)?;
        }
        if percentages.windows(2).any(|w| w[1] < w[0]) {
            return Err(AnalysisError::configuration(
                "child_support.percentages",
                "percentages must not decrease as the number of children grows",
            ));
        }

        ensure_non_negative(
            "maintenance.payor_income_cap",
            self.maintenance.payor_income_cap,
        )?;
        ensure_fraction("maintenance.combined_share", self.maintenance.combined_share)?;
        for (name, rates) in [
            ("with_child_support", &self.maintenance.with_child_support),
            ("without_child_support", &self.maintenance.without_child_support),
        ] {
            ensure_fraction(&format!("maintenance.{}.payor_rate", name), rates.payor_rate)?;
            ensure_fraction(&format!("maintenance.{}.payee_rate", name), rates.payee_rate)?;
        }

        Ok(())
    }

    /// CSSA percentage for a number of children
    pub fn child_support_percentage(&self, number_of_children: u32) -> Result<Decimal> {
        if number_of_children < 1 {
            return Err(AnalysisError::configuration(
                "number_of_children",
                "child support requires at least one child",
            ));
        }
        let table = &self.child_support.percentages;
        let last = table.len().checked_sub(1).ok_or_else(|| {
            AnalysisError::configuration("child_support.percentages", "percentage table is empty")
        })?;
        let index = (number_of_children as usize - 1).min(last);
        Ok(table[index])
    }
}

fn ensure_non_negative(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(AnalysisError::configuration(
            field,
            format!("must not be negative (found {})", value),
        ));
    }
    Ok(())
}

fn ensure_fraction(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(AnalysisError::configuration(
            field,
            format!("must be a fraction between 0 and 1 (found {})", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn ny_2024() -> StatutorySchedule {
    StatutorySchedule::from_str(include_str!("../../../schedules/ny-2024.toml"))
        .expect("bundled schedule is valid")
}
