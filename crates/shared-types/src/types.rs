//! Input model: parties, their declared income and deductions, and the
//! already-extracted financial documents the analysis runs over.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Payor,
    Payee,
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyRole::Payor => write!(f, "payor"),
            PartyRole::Payee => write!(f, "payee"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeSource {
    Wages,
    SelfEmployment,
    Investment,
    Other,
}

/// A single declared income stream, already expressed as an annual figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeItem {
    pub source: IncomeSource,
    pub annual_amount: Decimal,
    #[serde(default = "default_recurring")]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_recurring() -> bool {
    true
}

impl IncomeItem {
    pub fn new(source: IncomeSource, annual_amount: Decimal) -> Self {
        Self {
            source,
            annual_amount,
            recurring: true,
            description: None,
        }
    }

    pub fn non_recurring(mut self) -> Self {
        self.recurring = false;
        self
    }
}

/// Statutory deductions from gross income (DRL § 240(1-b)(b)(5)(vii))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionCategory {
    Fica,
    Medicare,
    /// NYC or Yonkers income tax actually paid
    LocalIncomeTax,
    PriorChildSupportPaid,
    PriorMaintenancePaid,
    PublicAssistance,
    OtherStatutory,
}

impl DeductionCategory {
    /// Order kind that must already exist for this deduction to be eligible
    pub fn required_order(&self) -> Option<OrderKind> {
        match self {
            DeductionCategory::PriorChildSupportPaid => Some(OrderKind::ChildSupport),
            DeductionCategory::PriorMaintenancePaid => Some(OrderKind::Maintenance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionItem {
    pub category: DeductionCategory,
    pub annual_amount: Decimal,
}

impl DeductionItem {
    pub fn new(category: DeductionCategory, annual_amount: Decimal) -> Self {
        Self {
            category,
            annual_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub role: PartyRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text occupation, used only by the cash-business heuristic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    pub income: Vec<IncomeItem>,
    #[serde(default)]
    pub deductions: Vec<DeductionItem>,
    #[serde(default)]
    pub dependents: u32,
}

impl Party {
    pub fn new(role: PartyRole, income: Vec<IncomeItem>) -> Self {
        Self {
            role,
            name: None,
            occupation: None,
            income,
            deductions: Vec::new(),
            dependents: 0,
        }
    }

    pub fn with_deductions(mut self, deductions: Vec<DeductionItem>) -> Self {
        self.deductions = deductions;
        self
    }

    pub fn with_occupation(mut self, occupation: &str) -> Self {
        self.occupation = Some(occupation.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    ChildSupport,
    Maintenance,
}

/// A support order already in force, paid by `obligor` to someone outside this case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingOrder {
    pub kind: OrderKind,
    pub obligor: PartyRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOnKind {
    ChildCare,
    HealthInsurance,
    UnreimbursedMedical,
    Education,
}

/// Annual child-related expenses prorated between the parents on top of basic support
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddOnExpenses {
    #[serde(default)]
    pub child_care: Decimal,
    #[serde(default)]
    pub health_insurance: Decimal,
    #[serde(default)]
    pub unreimbursed_medical: Decimal,
    #[serde(default)]
    pub education: Decimal,
}

impl AddOnExpenses {
    pub fn items(&self) -> [(AddOnKind, Decimal); 4] {
        [
            (AddOnKind::ChildCare, self.child_care),
            (AddOnKind::HealthInsurance, self.health_insurance),
            (AddOnKind::UnreimbursedMedical, self.unreimbursed_medical),
            (AddOnKind::Education, self.education),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    NetWorthStatement,
    TaxReturn,
    BankStatement,
    Other,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::NetWorthStatement => write!(f, "net worth statement"),
            DocumentType::TaxReturn => write!(f, "tax return"),
            DocumentType::BankStatement => write!(f, "bank statement"),
            DocumentType::Other => write!(f, "other document"),
        }
    }
}

/// Line items extracted from one source document.
///
/// Line-item names are snake_case keys such as `monthly_income` (net worth
/// statement), `total_income` (tax return) or `total_deposits` (bank
/// statement). Values carry the period of the source document; the consistency
/// analyzer annualizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub party: PartyRole,
    pub document_type: DocumentType,
    #[serde(default)]
    pub line_items: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub document_date: Option<NaiveDate>,
}

impl DocumentRecord {
    pub fn new(id: &str, party: PartyRole, document_type: DocumentType, date: NaiveDate) -> Self {
        Self {
            id: id.to_string(),
            party,
            document_type,
            line_items: BTreeMap::new(),
            document_date: Some(date),
        }
    }

    pub fn with_item(mut self, name: &str, value: Decimal) -> Self {
        self.line_items.insert(name.to_string(), value);
        self
    }

    pub fn item(&self, name: &str) -> Option<Decimal> {
        self.line_items.get(name).copied()
    }
}

/// Everything a caller hands to the report composer apart from the statutory schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseInput {
    pub payor: Party,
    pub payee: Party,
    pub number_of_children: u32,
    #[serde(default)]
    pub existing_orders: Vec<ExistingOrder>,
    #[serde(default)]
    pub add_on_expenses: AddOnExpenses,
    #[serde(default)]
    pub include_maintenance: bool,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_case_input_parses_minimal_json() {
        let json = r#"{
            "payor": {
                "role": "payor",
                "income": [{ "source": "wages", "annual_amount": "120000" }]
            },
            "payee": {
                "role": "payee",
                "income": [{ "source": "wages", "annual_amount": 60000 }]
            },
            "number_of_children": 2
        }"#;
        let case: CaseInput = serde_json::from_str(json).unwrap();

        assert_eq!(case.payor.income[0].annual_amount, dec!(120000));
        assert_eq!(case.payee.income[0].annual_amount, dec!(60000));
        assert!(case.payor.income[0].recurring);
        assert!(case.documents.is_empty());
        assert!(!case.include_maintenance);
        assert_eq!(case.add_on_expenses, AddOnExpenses::default());
    }

    #[test]
    fn test_document_record_missing_date_deserializes_as_none() {
        let json = r#"{ "id": "nw-1", "party": "payor", "document_type": "net_worth_statement",
                        "line_items": { "monthly_income": "10000" } }"#;
        let doc: DocumentRecord = serde_json::from_str(json).unwrap();

        assert!(doc.document_date.is_none());
        assert_eq!(doc.item("monthly_income"), Some(dec!(10000)));
        assert_eq!(doc.item("total_income"), None);
    }

    #[test]
    fn test_only_prior_order_deductions_require_an_order() {
        assert_eq!(
            DeductionCategory::PriorChildSupportPaid.required_order(),
            Some(OrderKind::ChildSupport)
        );
        assert_eq!(
            DeductionCategory::PriorMaintenancePaid.required_order(),
            Some(OrderKind::Maintenance)
        );
        assert_eq!(DeductionCategory::Fica.required_order(), None);
        assert_eq!(DeductionCategory::LocalIncomeTax.required_order(), None);
    }
}
