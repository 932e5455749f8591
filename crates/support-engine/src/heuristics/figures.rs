//! Read-only views over a party's declared documents
//!
//! Heuristics use these helpers to pull figures out of documents. They read
//! declared data only; nothing here depends on another heuristic.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared_types::{DocumentRecord, DocumentType, Party, PartyRole};

/// Line-item name fragments that mark income-like figures
pub const INCOME_ITEM_FRAGMENTS: &[&str] = &["income", "wages", "deposits", "receipts", "salary"];

/// Everything one party has declared, as seen by the hidden-income heuristics
#[derive(Debug, Clone)]
pub struct Disclosure<'a> {
    pub party: PartyRole,
    pub occupation: Option<&'a str>,
    pub documents: Vec<&'a DocumentRecord>,
}

impl<'a> Disclosure<'a> {
    /// The party's own documents out of a case-wide collection
    pub fn for_party(party: &'a Party, documents: &'a [DocumentRecord]) -> Self {
        Self {
            party: party.role,
            occupation: party.occupation.as_deref(),
            documents: documents.iter().filter(|d| d.party == party.role).collect(),
        }
    }

    pub fn new(party: PartyRole, documents: &'a [DocumentRecord]) -> Self {
        Self {
            party,
            occupation: None,
            documents: documents.iter().filter(|d| d.party == party).collect(),
        }
    }

    pub fn with_occupation(mut self, occupation: &'a str) -> Self {
        self.occupation = Some(occupation);
        self
    }

    /// Value from the most recent document of a type that declares the item.
    /// Ties on date go to the lexically greatest id, so the pick is stable.
    pub fn latest(&self, document_type: DocumentType, item: &str) -> Option<Decimal> {
        self.documents
            .iter()
            .filter(|d| d.document_type == document_type)
            .filter_map(|d| d.item(item).map(|v| (d.document_date, d.id.as_str(), v)))
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)))
            .map(|(_, _, v)| v)
    }

    /// Mean of an item across all documents of a type that declare it.
    /// None when nothing declares it or the sum leaves the decimal range.
    pub fn average(&self, document_type: DocumentType, item: &str) -> Option<Decimal> {
        let values = self.values(document_type, item);
        if values.is_empty() {
            return None;
        }
        let total = checked_sum(&values)?;
        Some(total / Decimal::from(values.len()))
    }

    /// Sum of an item across all documents of a type
    pub fn total(&self, document_type: DocumentType, item: &str) -> Option<Decimal> {
        let values = self.values(document_type, item);
        if values.is_empty() {
            return None;
        }
        checked_sum(&values)
    }

    fn values(&self, document_type: DocumentType, item: &str) -> Vec<Decimal> {
        self.documents
            .iter()
            .filter(|d| d.document_type == document_type)
            .filter_map(|d| d.item(item))
            .collect()
    }

    /// Declared monthly income: net worth statement first, else tax return / 12
    pub fn monthly_income(&self) -> Option<Decimal> {
        self.latest(DocumentType::NetWorthStatement, "monthly_income")
            .or_else(|| {
                self.latest(DocumentType::TaxReturn, "total_income")
                    .map(|annual| annual / dec!(12))
            })
    }

    /// Declared monthly expenses: net worth statement first, else bank withdrawals
    pub fn monthly_expenses(&self) -> Option<Decimal> {
        self.latest(DocumentType::NetWorthStatement, "monthly_expenses")
            .or_else(|| self.average(DocumentType::BankStatement, "total_withdrawals"))
    }

    /// Non-zero income-like values with the id of the document declaring each
    pub fn income_entries(&self) -> Vec<(&'a str, Decimal)> {
        let mut entries = Vec::new();
        for doc in self.documents.iter().copied() {
            for (name, value) in &doc.line_items {
                if value.is_zero() {
                    continue;
                }
                if INCOME_ITEM_FRAGMENTS.iter().any(|f| name.contains(f)) {
                    entries.push((doc.id.as_str(), *value));
                }
            }
        }
        entries
    }
}

fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(*value))
}

/// Ratio a / b, or None when b is not positive. Saturates at the decimal
/// bounds when the quotient is out of range.
pub fn ratio(a: Decimal, b: Decimal) -> Option<Decimal> {
    if b <= Decimal::ZERO {
        return None;
    }
    Some(a.checked_div(b).unwrap_or(if a.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }))
}

/// Format an amount for evidence text
pub fn money(value: Decimal) -> String {
    format!("${}", value.round_dp(2))
}

/// Format a fraction as a percentage for evidence text
pub fn percent(value: Decimal) -> String {
    match value.checked_mul(dec!(100)) {
        Some(scaled) => format!("{}%", scaled.round_dp(1)),
        None => format!("{} times", value.round_dp(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn doc(id: &str, document_type: DocumentType, month: u32) -> DocumentRecord {
        DocumentRecord::new(
            id,
            PartyRole::Payor,
            document_type,
            NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
        )
    }

    #[test]
    fn test_latest_prefers_most_recent_document() {
        let docs = vec![
            doc("nw-old", DocumentType::NetWorthStatement, 1)
                .with_item("monthly_income", dec!(7000)),
            doc("nw-new", DocumentType::NetWorthStatement, 6)
                .with_item("monthly_income", dec!(8000)),
        ];
        let d = Disclosure::new(PartyRole::Payor, &docs);
        assert_eq!(d.monthly_income(), Some(dec!(8000)));
    }

    #[test]
    fn test_monthly_income_falls_back_to_tax_return() {
        let docs =
            vec![doc("tr", DocumentType::TaxReturn, 4).with_item("total_income", dec!(96000))];
        let d = Disclosure::new(PartyRole::Payor, &docs);
        assert_eq!(d.monthly_income(), Some(dec!(8000)));
    }

    #[test]
    fn test_average_and_total_over_statements() {
        let docs = vec![
            doc("bs-1", DocumentType::BankStatement, 1).with_item("total_deposits", dec!(9000)),
            doc("bs-2", DocumentType::BankStatement, 2).with_item("total_deposits", dec!(11000)),
            doc("bs-3", DocumentType::BankStatement, 3),
        ];
        let d = Disclosure::new(PartyRole::Payor, &docs);
        assert_eq!(d.average(DocumentType::BankStatement, "total_deposits"), Some(dec!(10000)));
        assert_eq!(d.total(DocumentType::BankStatement, "total_deposits"), Some(dec!(20000)));
        assert_eq!(d.total(DocumentType::BankStatement, "cash_withdrawals"), None);
    }

    #[test]
    fn test_sums_beyond_decimal_range_are_skipped() {
        let docs = vec![
            doc("bs-1", DocumentType::BankStatement, 1)
                .with_item("total_deposits", Decimal::MAX),
            doc("bs-2", DocumentType::BankStatement, 2)
                .with_item("total_deposits", Decimal::MAX),
        ];
        let d = Disclosure::new(PartyRole::Payor, &docs);
        assert_eq!(d.average(DocumentType::BankStatement, "total_deposits"), None);
        assert_eq!(d.total(DocumentType::BankStatement, "total_deposits"), None);
    }

    #[test]
    fn test_disclosure_keeps_only_own_documents() {
        let mut other = doc("tr-payee", DocumentType::TaxReturn, 4);
        other.party = PartyRole::Payee;
        let docs = vec![doc("tr-payor", DocumentType::TaxReturn, 4), other];
        let d = Disclosure::new(PartyRole::Payor, &docs);
        assert_eq!(d.documents.len(), 1);
        assert_eq!(d.documents[0].id, "tr-payor");
    }

    #[test]
    fn test_income_entries_skip_zero_and_non_income_items() {
        let docs = vec![doc("nw", DocumentType::NetWorthStatement, 1)
            .with_item("monthly_income", dec!(5000))
            .with_item("rental_income", Decimal::ZERO)
            .with_item("monthly_expenses", dec!(4000))];
        let d = Disclosure::new(PartyRole::Payor, &docs);
        assert_eq!(d.income_entries(), vec![("nw", dec!(5000))]);
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(money(dec!(1234.567)), "$1234.57");
        assert_eq!(percent(dec!(0.2631)), "26.3%");
        assert_eq!(ratio(dec!(1), Decimal::ZERO), None);
        assert_eq!(ratio(Decimal::MAX, dec!(0.001)), Some(Decimal::MAX));
        assert_eq!(percent(Decimal::MAX).chars().last(), Some('s'));
    }
}
