//! Output model: computation trails, findings, risk signals and the assembled report.
//!
//! Amounts are exact decimals in currency units. Fractions (percentages,
//! pro-rata shares, relative deltas, trigger strengths) are decimals where
//! 1 means 100%. Rounding to cents happens once, in [`ReportSummary`].

use crate::types::{AddOnKind, DeductionCategory, DocumentType, PartyRole};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisallowedDeduction {
    pub category: DeductionCategory,
    pub amount: Decimal,
    pub reason: String,
}

/// Canonical annual income of one party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIncome {
    pub role: PartyRole,
    pub gross_income: Decimal,
    /// Portion of gross income declared as non-recurring
    pub non_recurring_income: Decimal,
    pub allowed_deductions: Decimal,
    pub disallowed_deductions: Vec<DisallowedDeduction>,
    pub adjusted_income: Decimal,
    /// True when deductions exceeded gross income and adjusted income was floored at zero
    pub deductions_clamped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProRataShares {
    pub payor: Decimal,
    pub payee: Decimal,
}

/// Figures for combined income above the CSSA cap. Informational only: how
/// much of this, if any, is awarded is left to the court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboveCapInformation {
    pub income_above_cap: Decimal,
    /// Combined parental income times the percentage, with no cap
    pub uncapped_obligation: Decimal,
    pub additional_obligation: Decimal,
    pub payor_additional_share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOnShare {
    pub expense: AddOnKind,
    pub amount: Decimal,
    pub payor_share: Decimal,
    pub payee_share: Decimal,
}

/// CSSA derivation trail (DRL § 240(1-b))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildSupportComputation {
    pub number_of_children: u32,
    /// Payor income entering the formula (after any maintenance adjustment)
    pub payor_income: Decimal,
    pub payee_income: Decimal,
    /// Maintenance moved from payor income to payee income before the formula
    pub maintenance_adjustment: Option<Decimal>,
    pub combined_parental_income: Decimal,
    pub income_cap: Decimal,
    pub capped_combined_income: Decimal,
    pub percentage: Decimal,
    pub basic_obligation: Decimal,
    pub pro_rata: ProRataShares,
    /// Presumptive annual amount owed by the payor
    pub payor_share: Decimal,
    pub payee_share: Decimal,
    pub above_cap: Option<AboveCapInformation>,
    pub add_ons: Vec<AddOnShare>,
    pub payor_add_on_total: Decimal,
    pub payor_total_obligation: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceTrack {
    /// Child support will also be paid by the maintenance payor
    WithChildSupport,
    WithoutChildSupport,
}

/// Maintenance derivation trail (DRL § 236(B)(6))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceComputation {
    pub payor_income: Decimal,
    pub payee_income: Decimal,
    pub income_cap: Decimal,
    pub capped_payor_income: Decimal,
    /// Informational: payor income the presumptive formula ignores
    pub payor_income_above_cap: Decimal,
    pub track: MaintenanceTrack,
    pub payor_rate: Decimal,
    pub payee_rate: Decimal,
    /// payor_rate x capped payor income - payee_rate x payee income
    pub rate_track_amount: Decimal,
    pub combined_share: Decimal,
    /// combined_share x (capped payor income + payee income) - payee income
    pub combined_track_amount: Decimal,
    pub presumptive_award: Decimal,
    pub duration_note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportComputation {
    pub child_support: Option<ChildSupportComputation>,
    pub maintenance: Option<MaintenanceComputation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Materiality {
    Immaterial,
    Notable,
    Significant,
}

impl fmt::Display for Materiality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Materiality::Immaterial => write!(f, "immaterial"),
            Materiality::Notable => write!(f, "notable"),
            Materiality::Significant => write!(f, "significant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyFinding {
    /// Name of the cross-reference entry that matched, e.g. "annual income"
    pub reference: String,
    pub left_document: String,
    pub left_type: DocumentType,
    pub left_item: String,
    /// Annualized value from the left document
    pub left_value: Decimal,
    pub right_document: String,
    pub right_type: DocumentType,
    pub right_item: String,
    pub right_value: Decimal,
    pub absolute_delta: Decimal,
    pub relative_delta: Decimal,
    pub materiality: Materiality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSignal {
    pub heuristic: String,
    pub weight: Decimal,
    pub strength: Decimal,
    /// weight x strength
    pub contribution: Decimal,
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub party: PartyRole,
    /// Triggered signals, highest contribution first
    pub signals: Vec<RiskSignal>,
    pub aggregate_score: Decimal,
    pub heuristics_evaluated: usize,
    pub advisory: String,
}

/// Annual amount broken down into payment cadences, rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub annual: Decimal,
    pub monthly: Decimal,
    pub biweekly: Decimal,
    pub weekly: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub child_support: Option<PaymentSchedule>,
    pub maintenance: Option<PaymentSchedule>,
    pub significant_findings: usize,
    pub notable_findings: usize,
    pub highest_risk_score: Decimal,
}

/// Everything the composer assembles into a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportContents {
    pub schedule_version: String,
    pub payor_income: NormalizedIncome,
    pub payee_income: NormalizedIncome,
    pub support: SupportComputation,
    pub consistency_findings: Vec<ConsistencyFinding>,
    pub risk_assessments: Vec<RiskAssessment>,
    pub recommended_actions: Vec<String>,
    pub disclaimer: String,
    pub summary: ReportSummary,
}

/// Immutable result of one analysis run.
///
/// Fields are private: a report is only ever produced whole by
/// [`AnalysisReport::new`] and read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    report_id: String,
    generated_at: DateTime<Utc>,
    input_fingerprint: String,
    #[serde(flatten)]
    contents: ReportContents,
}

impl AnalysisReport {
    pub fn new(contents: ReportContents, input_fingerprint: String) -> Self {
        Self {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            input_fingerprint,
            contents,
        }
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// SHA-256 of the canonical input, usable as a cache key by callers
    pub fn input_fingerprint(&self) -> &str {
        &self.input_fingerprint
    }

    pub fn contents(&self) -> &ReportContents {
        &self.contents
    }

    pub fn support(&self) -> &SupportComputation {
        &self.contents.support
    }

    pub fn consistency_findings(&self) -> &[ConsistencyFinding] {
        &self.contents.consistency_findings
    }

    pub fn risk_assessments(&self) -> &[RiskAssessment] {
        &self.contents.risk_assessments
    }

    pub fn summary(&self) -> &ReportSummary {
        &self.contents.summary
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
