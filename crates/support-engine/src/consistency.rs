//! Cross-document consistency checks
//!
//! Figures that should agree across a party's documents are paired through a
//! fixed cross-reference table. Each side is annualized with its own
//! multiplier before comparison, e.g. net worth statement `monthly_income` x 12
//! against tax return `total_income`.

use crate::error::{AnalysisError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared_types::{ConsistencyFinding, DocumentRecord, DocumentType, Materiality};
use std::collections::HashSet;

/// Relative delta above which a discrepancy is significant
pub const SIGNIFICANT_RELATIVE: Decimal = dec!(0.15);
/// Absolute delta (annual dollars) above which a discrepancy is significant
pub const SIGNIFICANT_ABSOLUTE: Decimal = dec!(10000);
/// Relative delta above which a discrepancy is notable
pub const NOTABLE_RELATIVE: Decimal = dec!(0.05);

/// One side of a cross-reference entry
#[derive(Debug, Clone, Copy)]
pub struct LineRef {
    pub document_type: DocumentType,
    pub item: &'static str,
    /// Multiplier that turns the declared value into an annual figure
    pub annualize: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct CrossReference {
    pub name: &'static str,
    pub left: LineRef,
    pub right: LineRef,
}

const fn line(document_type: DocumentType, item: &'static str, annualize: Decimal) -> LineRef {
    LineRef {
        document_type,
        item,
        annualize,
    }
}

const MONTHLY: Decimal = dec!(12);
const ANNUAL: Decimal = Decimal::ONE;

pub const CROSS_REFERENCES: &[CrossReference] = &[
    CrossReference {
        name: "annual income",
        left: line(DocumentType::NetWorthStatement, "monthly_income", MONTHLY),
        right: line(DocumentType::TaxReturn, "total_income", ANNUAL),
    },
    CrossReference {
        name: "wages",
        left: line(DocumentType::NetWorthStatement, "monthly_wages", MONTHLY),
        right: line(DocumentType::TaxReturn, "wages", ANNUAL),
    },
    CrossReference {
        name: "business income",
        left: line(DocumentType::NetWorthStatement, "business_income", ANNUAL),
        right: line(DocumentType::TaxReturn, "business_income", ANNUAL),
    },
    CrossReference {
        name: "rental income",
        left: line(DocumentType::NetWorthStatement, "rental_income", ANNUAL),
        right: line(DocumentType::TaxReturn, "rental_income", ANNUAL),
    },
    CrossReference {
        name: "income vs deposits",
        left: line(DocumentType::NetWorthStatement, "monthly_income", MONTHLY),
        right: line(DocumentType::BankStatement, "total_deposits", MONTHLY),
    },
    CrossReference {
        name: "expenses vs withdrawals",
        left: line(DocumentType::NetWorthStatement, "monthly_expenses", MONTHLY),
        right: line(DocumentType::BankStatement, "total_withdrawals", MONTHLY),
    },
    CrossReference {
        name: "reported income vs deposits",
        left: line(DocumentType::TaxReturn, "total_income", ANNUAL),
        right: line(DocumentType::BankStatement, "total_deposits", MONTHLY),
    },
];

/// Compare every cross-referenced figure across a set of documents.
///
/// Documents are only compared with documents of the same party. Missing line
/// items make a pair non-comparable; they never raise. The result is sorted by
/// descending materiality, then reference name, then document ids, so any
/// permutation of `documents` yields the same list.
///
/// # Errors
///
/// Returns [`AnalysisError::MissingData`] if a document id is empty or
/// repeated, or a document has no date
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use shared_types::{DocumentRecord, DocumentType, Materiality, PartyRole};
/// use support_engine::analyze_consistency;
///
/// # fn example() -> support_engine::Result<()> {
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let documents = vec![
///     DocumentRecord::new("nw", PartyRole::Payor, DocumentType::NetWorthStatement, date)
///         .with_item("monthly_income", dec!(10000)),
///     DocumentRecord::new("tr", PartyRole::Payor, DocumentType::TaxReturn, date)
///         .with_item("total_income", dec!(95000)),
/// ];
///
/// let findings = analyze_consistency(&documents)?;
/// assert_eq!(findings[0].materiality, Materiality::Significant);
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(skip_all, fields(documents = documents.len()))]
pub fn analyze_consistency(documents: &[DocumentRecord]) -> Result<Vec<ConsistencyFinding>> {
    validate_records(documents)?;

    let mut findings = Vec::new();
    for reference in CROSS_REFERENCES {
        for left in documents_of(documents, reference.left.document_type) {
            let Some(left_raw) = left.item(reference.left.item) else {
                continue;
            };
            for right in documents_of(documents, reference.right.document_type)
                .filter(|d| d.party == left.party)
            {
                let Some(right_raw) = right.item(reference.right.item) else {
                    continue;
                };
                let finding = left_raw
                    .checked_mul(reference.left.annualize)
                    .zip(right_raw.checked_mul(reference.right.annualize))
                    .and_then(|(l, r)| compare(reference, left, l, right, r));
                match finding {
                    Some(finding) => findings.push(finding),
                    None => tracing::warn!(
                        reference = reference.name,
                        left = %left.id,
                        right = %right.id,
                        "figures out of comparable range; pair skipped"
                    ),
                }
            }
        }
    }

    findings.sort_by(|a, b| {
        b.materiality
            .cmp(&a.materiality)
            .then_with(|| a.reference.cmp(&b.reference))
            .then_with(|| a.left_document.cmp(&b.left_document))
            .then_with(|| a.right_document.cmp(&b.right_document))
    });

    tracing::debug!(
        findings = findings.len(),
        significant = findings
            .iter()
            .filter(|f| f.materiality == Materiality::Significant)
            .count(),
        "consistency analysis complete"
    );

    Ok(findings)
}

/// Classify a discrepancy
pub fn classify(absolute_delta: Decimal, relative_delta: Decimal) -> Materiality {
    if relative_delta > SIGNIFICANT_RELATIVE || absolute_delta > SIGNIFICANT_ABSOLUTE {
        Materiality::Significant
    } else if relative_delta > NOTABLE_RELATIVE {
        Materiality::Notable
    } else {
        Materiality::Immaterial
    }
}

/// |a - b| relative to the smaller magnitude. When the smaller magnitude is
/// zero the delta is 1 if the values differ and 0 if both are zero.
///
/// Saturates at `Decimal::MAX` when the quotient is out of range.
pub fn relative_delta(a: Decimal, b: Decimal) -> Decimal {
    let absolute = a.checked_sub(b).map_or(Decimal::MAX, |d| d.abs());
    let base = a.abs().min(b.abs());
    if base.is_zero() {
        if absolute.is_zero() {
            Decimal::ZERO
        } else {
            Decimal::ONE
        }
    } else {
        absolute.checked_div(base).unwrap_or(Decimal::MAX)
    }
}

fn compare(
    reference: &CrossReference,
    left: &DocumentRecord,
    left_value: Decimal,
    right: &DocumentRecord,
    right_value: Decimal,
) -> Option<ConsistencyFinding> {
    let absolute_delta = left_value.checked_sub(right_value)?.abs();
    let relative_delta = relative_delta(left_value, right_value);
    Some(ConsistencyFinding {
        reference: reference.name.to_string(),
        left_document: left.id.clone(),
        left_type: left.document_type,
        left_item: reference.left.item.to_string(),
        left_value,
        right_document: right.id.clone(),
        right_type: right.document_type,
        right_item: reference.right.item.to_string(),
        right_value,
        absolute_delta,
        relative_delta,
        materiality: classify(absolute_delta, relative_delta),
    })
}

fn documents_of(
    documents: &[DocumentRecord],
    document_type: DocumentType,
) -> impl Iterator<Item = &DocumentRecord> {
    documents
        .iter()
        .filter(move |d| d.document_type == document_type)
}

fn validate_records(documents: &[DocumentRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for (i, doc) in documents.iter().enumerate() {
        if doc.id.trim().is_empty() {
            return Err(AnalysisError::missing_data(
                format!("#{}", i),
                "document id is empty",
            ));
        }
        if doc.document_date.is_none() {
            return Err(AnalysisError::missing_data(
                doc.id.clone(),
                "document date is missing",
            ));
        }
        if !seen.insert(doc.id.as_str()) {
            return Err(AnalysisError::missing_data(
                doc.id.clone(),
                "document id is not unique",
            ));
        }
    }
    Ok(())
}
