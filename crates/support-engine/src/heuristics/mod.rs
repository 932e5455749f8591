//! Hidden-income detection
//!
//! A fixed registry of independent heuristics scores one party's declared
//! figures. Each heuristic sees only the [`Disclosure`], never another
//! heuristic's result, so the aggregate does not depend on evaluation order.
//!
//! The score is a prompt for follow-up discovery. It is not a finding.

pub mod figures;
pub mod rules;

pub use figures::Disclosure;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared_types::{RiskAssessment, RiskSignal};

/// Upper bound of the aggregate risk score
pub const MAX_SCORE: Decimal = dec!(100);

pub const ADVISORY: &str = "Advisory only. These signals indicate where further discovery may be \
warranted; they are not a finding of concealed income or fraud.";

/// A triggered heuristic before weighting
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    /// In [0, 1]; values outside are clamped by the detector
    pub strength: Decimal,
    pub evidence: String,
}

impl Trigger {
    pub fn new(strength: Decimal, evidence: impl Into<String>) -> Self {
        Self {
            strength,
            evidence: evidence.into(),
        }
    }
}

/// One hidden-income red flag
pub trait Heuristic: Send + Sync {
    /// Stable snake_case name used in reports
    fn name(&self) -> &'static str;

    /// Points contributed at full strength
    fn weight(&self) -> Decimal;

    /// Discovery step suggested when the heuristic triggers
    fn follow_up(&self) -> &'static str;

    fn evaluate(&self, disclosure: &Disclosure<'_>) -> Option<Trigger>;
}

static REGISTRY: &[&dyn Heuristic] = &[
    &rules::ExpensesExceedIncome,
    &rules::UnexplainedDeposits,
    &rules::CashIntensiveOccupation,
    &rules::RoundNumberIncome,
    &rules::LargeCashWithdrawals,
    &rules::UndisclosedTransfers,
    &rules::BusinessLosses,
];

/// The heuristics every assessment runs
pub fn registry() -> &'static [&'static dyn Heuristic] {
    REGISTRY
}

/// Look up a registered heuristic by name
pub fn find(name: &str) -> Option<&'static dyn Heuristic> {
    REGISTRY.iter().copied().find(|h| h.name() == name)
}

/// Score a party's disclosure against the full registry
#[tracing::instrument(
    skip_all,
    fields(party = %disclosure.party, documents = disclosure.documents.len())
)]
pub fn detect_hidden_income(disclosure: &Disclosure<'_>) -> RiskAssessment {
    detect_with(registry(), disclosure)
}

/// Score a disclosure against an explicit set of heuristics
pub fn detect_with(heuristics: &[&dyn Heuristic], disclosure: &Disclosure<'_>) -> RiskAssessment {
    let mut signals: Vec<RiskSignal> = heuristics
        .iter()
        .filter_map(|heuristic| {
            let trigger = heuristic.evaluate(disclosure)?;
            let strength = trigger.strength.clamp(Decimal::ZERO, Decimal::ONE);
            if strength.is_zero() {
                return None;
            }
            let weight = heuristic.weight();
            tracing::debug!(heuristic = heuristic.name(), %strength, "heuristic triggered");
            Some(RiskSignal {
                heuristic: heuristic.name().to_string(),
                weight,
                strength,
                contribution: weight * strength,
                evidence: trigger.evidence,
            })
        })
        .collect();

    signals.sort_by(|a, b| {
        b.contribution
            .cmp(&a.contribution)
            .then_with(|| a.heuristic.cmp(&b.heuristic))
    });

    let total = signals
        .iter()
        .fold(Decimal::ZERO, |total, s| total.saturating_add(s.contribution));
    let aggregate_score = total.clamp(Decimal::ZERO, MAX_SCORE);

    RiskAssessment {
        party: disclosure.party,
        signals,
        aggregate_score,
        heuristics_evaluated: heuristics.len(),
        advisory: ADVISORY.to_string(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use shared_types::{DocumentRecord, DocumentType, PartyRole};

    fn documents(
        income: i64,
        expenses: i64,
        deposits: i64,
        cash: i64,
        loss: i64,
    ) -> Vec<DocumentRecord> {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        vec![
            DocumentRecord::new("nw", PartyRole::Payor, DocumentType::NetWorthStatement, date)
                .with_item("monthly_income", Decimal::from(income))
                .with_item("monthly_expenses", Decimal::from(expenses)),
            DocumentRecord::new("tr", PartyRole::Payor, DocumentType::TaxReturn, date)
                .with_item("business_income", Decimal::from(-loss)),
            DocumentRecord::new("bs", PartyRole::Payor, DocumentType::BankStatement, date)
                .with_item("total_deposits", Decimal::from(deposits))
                .with_item("cash_withdrawals", Decimal::from(cash))
                .with_item("unverified_transfers", Decimal::from(cash / 2)),
        ]
    }

    fn figures() -> impl Strategy<Value = Vec<DocumentRecord>> {
        (0i64..20_000, 0i64..20_000, 0i64..40_000, 0i64..5_000, 0i64..50_000)
            .prop_map(|(i, e, d, c, l)| documents(i, e, d, c, l))
    }

    proptest! {
        /// Property: the aggregate is always within [0, 100]
        #[test]
        fn score_is_bounded(docs in figures()) {
            let assessment = detect_hidden_income(&Disclosure::new(PartyRole::Payor, &docs));
            prop_assert!(assessment.aggregate_score >= Decimal::ZERO);
            prop_assert!(assessment.aggregate_score <= MAX_SCORE);
        }

        /// Property: evaluation order does not change the score
        #[test]
        fn score_invariant_under_heuristic_order(
            docs in figures(),
            order in Just((0..registry().len()).collect::<Vec<usize>>()).prop_shuffle(),
        ) {
            let disclosure = Disclosure::new(PartyRole::Payor, &docs);
            let expected = detect_hidden_income(&disclosure);
            let reordered: Vec<&dyn Heuristic> = order.iter().map(|i| registry()[*i]).collect();
            let shuffled = detect_with(&reordered, &disclosure);
            prop_assert_eq!(expected.aggregate_score, shuffled.aggregate_score);
            prop_assert_eq!(expected.signals, shuffled.signals);
        }

        /// Property: dropping any heuristic never raises the score
        #[test]
        fn removing_heuristic_never_increases_score(docs in figures(), skip in 0usize..7) {
            let disclosure = Disclosure::new(PartyRole::Payor, &docs);
            let full = detect_hidden_income(&disclosure);
            let reduced: Vec<&dyn Heuristic> = registry()
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, h)| *h)
                .collect();
            let partial = detect_with(&reduced, &disclosure);
            prop_assert!(partial.aggregate_score <= full.aggregate_score);
        }
    }
}
