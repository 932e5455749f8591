//! New York support analysis engine
//!
//! Computes presumptive child support (CSSA) and maintenance from declared
//! incomes, cross-checks a party's financial documents against each other and
//! scores hidden-income red flags. All statutory figures come from a versioned
//! [`StatutorySchedule`]; nothing here touches the filesystem except
//! [`StatutorySchedule::from_file`].

pub mod calculator;
pub mod consistency;
pub mod error;
pub mod heuristics;
pub mod normalizer;
pub mod report;
pub mod schedule;

pub use calculator::{
    calculate_child_support, calculate_maintenance, calculate_support, CaseParameters,
};
pub use consistency::analyze_consistency;
pub use error::{AnalysisError, Result};
pub use heuristics::{detect_hidden_income, Disclosure, Heuristic};
pub use normalizer::normalize_party;
pub use report::compose_report;
pub use schedule::StatutorySchedule;

use shared_types::{AnalysisReport, CaseInput};

/// AnalysisEngine entry point, bound to one validated schedule
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    schedule: StatutorySchedule,
}

impl AnalysisEngine {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if the schedule fails validation
    pub fn new(schedule: StatutorySchedule) -> Result<Self> {
        schedule.validate()?;
        Ok(Self { schedule })
    }

    pub fn schedule(&self) -> &StatutorySchedule {
        &self.schedule
    }

    /// Produce a report for one case
    ///
    /// # Errors
    ///
    /// Same as [`compose_report`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_decimal_macros::dec;
    /// use shared_types::{CaseInput, IncomeItem, IncomeSource, Party, PartyRole};
    /// use support_engine::{AnalysisEngine, StatutorySchedule};
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let engine = AnalysisEngine::new(StatutorySchedule::from_file("schedules/ny-2024.toml")?)?;
    /// let wages = |role, amount| {
    ///     Party::new(role, vec![IncomeItem::new(IncomeSource::Wages, amount)])
    /// };
    /// let case = CaseInput {
    ///     payor: wages(PartyRole::Payor, dec!(120000)),
    ///     payee: wages(PartyRole::Payee, dec!(60000)),
    ///     number_of_children: 2,
    ///     existing_orders: Vec::new(),
    ///     add_on_expenses: Default::default(),
    ///     include_maintenance: false,
    ///     documents: Vec::new(),
    /// };
    ///
    /// let report = engine.analyze(&case)?;
    /// assert!(report.support().child_support.is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub fn analyze(&self, case: &CaseInput) -> Result<AnalysisReport> {
        compose_report(case, &self.schedule)
    }
}
