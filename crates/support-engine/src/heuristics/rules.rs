//! The hidden-income red flags
//!
//! Each rule is a unit struct so the registry can hold it as a `&'static dyn
//! Heuristic`. Thresholds are forensic rules of thumb, not statute.

use super::figures::{money, percent, ratio, Disclosure};
use super::{Heuristic, Trigger};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared_types::DocumentType;

/// Occupations where income is commonly received in cash
pub const CASH_INTENSIVE_KEYWORDS: &[&str] = &[
    "restaurant",
    "bar",
    "salon",
    "barber",
    "construction",
    "contractor",
    "taxi",
    "rideshare",
    "retail",
    "laundromat",
    "car wash",
    "vending",
    "landscaping",
    "tips",
];

fn is_cash_intensive(occupation: &str) -> bool {
    let lower = occupation.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    CASH_INTENSIVE_KEYWORDS.iter().any(|keyword| {
        let parts: Vec<&str> = keyword.split(' ').collect();
        words.windows(parts.len()).any(|window| window == parts.as_slice())
    })
}

/// Declared living expenses outrun declared income by more than 10%
pub struct ExpensesExceedIncome;

impl Heuristic for ExpensesExceedIncome {
    fn name(&self) -> &'static str {
        "expenses_exceed_income"
    }

    fn weight(&self) -> Decimal {
        dec!(25)
    }

    fn follow_up(&self) -> &'static str {
        "Subpoena records showing how living expenses are funded \
         (credit lines, gifts, undisclosed accounts)"
    }

    fn evaluate(&self, disclosure: &Disclosure<'_>) -> Option<Trigger> {
        let expenses = disclosure.monthly_expenses()?;
        if expenses <= Decimal::ZERO {
            return None;
        }
        let income = disclosure.monthly_income().unwrap_or(Decimal::ZERO);
        let Some(spend_ratio) = ratio(expenses, income) else {
            return Some(Trigger::new(
                Decimal::ONE,
                format!(
                    "Monthly expenses of {} with no declared income",
                    money(expenses)
                ),
            ));
        };
        let excess = spend_ratio - Decimal::ONE;
        if excess <= dec!(0.10) {
            return None;
        }
        Some(Trigger::new(
            excess.min(dec!(0.5)) / dec!(0.5),
            format!(
                "Monthly expenses of {} exceed declared income of {} by {}",
                money(expenses),
                money(income),
                percent(excess)
            ),
        ))
    }
}

/// Bank deposits well above declared income
pub struct UnexplainedDeposits;

impl Heuristic for UnexplainedDeposits {
    fn name(&self) -> &'static str {
        "unexplained_deposits"
    }

    fn weight(&self) -> Decimal {
        dec!(25)
    }

    fn follow_up(&self) -> &'static str {
        "Trace the source of bank deposits in excess of declared income"
    }

    fn evaluate(&self, disclosure: &Disclosure<'_>) -> Option<Trigger> {
        let deposits = disclosure.average(DocumentType::BankStatement, "total_deposits")?;
        if deposits <= Decimal::ZERO {
            return None;
        }
        let income = disclosure.monthly_income().unwrap_or(Decimal::ZERO);
        let Some(deposit_ratio) = ratio(deposits, income) else {
            return Some(Trigger::new(
                Decimal::ONE,
                format!(
                    "Average monthly deposits of {} with no declared income",
                    money(deposits)
                ),
            ));
        };
        if deposit_ratio <= dec!(1.2) {
            return None;
        }
        Some(Trigger::new(
            (deposit_ratio.min(dec!(2)) - dec!(1.2)) / dec!(0.8),
            format!(
                "Average monthly deposits of {} are {} of declared monthly income of {}",
                money(deposits),
                percent(deposit_ratio),
                money(income)
            ),
        ))
    }
}

/// Cash-heavy occupation combined with implausibly low reported income
pub struct CashIntensiveOccupation;

impl Heuristic for CashIntensiveOccupation {
    fn name(&self) -> &'static str {
        "cash_intensive_occupation"
    }

    fn weight(&self) -> Decimal {
        dec!(15)
    }

    fn follow_up(&self) -> &'static str {
        "Request point-of-sale records, daily receipts and a lifestyle analysis \
         for the cash business"
    }

    fn evaluate(&self, disclosure: &Disclosure<'_>) -> Option<Trigger> {
        let occupation = disclosure.occupation?;
        if !is_cash_intensive(occupation) {
            return None;
        }

        let mut indicators = Vec::new();

        let receipts = disclosure.latest(DocumentType::TaxReturn, "business_gross_receipts");
        let net = disclosure.latest(DocumentType::TaxReturn, "business_income");
        if let (Some(receipts), Some(net)) = (receipts, net) {
            if let Some(margin) = ratio(net, receipts) {
                if margin < dec!(0.10) {
                    indicators.push(format!(
                        "business margin of {} on receipts of {}",
                        percent(margin),
                        money(receipts)
                    ));
                }
            }
        }

        if let (Some(income), Some(expenses)) =
            (disclosure.monthly_income(), disclosure.monthly_expenses())
        {
            if income < expenses {
                indicators.push(format!(
                    "declared income of {} below expenses of {}",
                    money(income),
                    money(expenses)
                ));
            }
        }

        let strength = match indicators.len() {
            0 => return None,
            1 => dec!(0.6),
            _ => Decimal::ONE,
        };
        Some(Trigger::new(
            strength,
            format!(
                "Cash-intensive occupation ({}) with {}",
                occupation,
                indicators.join(" and ")
            ),
        ))
    }
}

/// Income figures that are suspiciously round across several documents
pub struct RoundNumberIncome;

impl Heuristic for RoundNumberIncome {
    fn name(&self) -> &'static str {
        "round_number_income"
    }

    fn weight(&self) -> Decimal {
        dec!(10)
    }

    fn follow_up(&self) -> &'static str {
        "Request source documents (pay stubs, 1099s, ledgers) behind the rounded income figures"
    }

    fn evaluate(&self, disclosure: &Disclosure<'_>) -> Option<Trigger> {
        let entries = disclosure.income_entries();
        if entries.len() < 3 {
            return None;
        }
        let mut documents: Vec<&str> = entries.iter().map(|(id, _)| *id).collect();
        documents.sort_unstable();
        documents.dedup();
        if documents.len() < 2 {
            return None;
        }

        let round = entries
            .iter()
            .filter(|(_, value)| (value.abs() % dec!(1000)).is_zero())
            .count();
        let fraction = Decimal::from(round) / Decimal::from(entries.len());
        if fraction < dec!(0.5) {
            return None;
        }
        Some(Trigger::new(
            fraction,
            format!(
                "{} of {} income figures across {} documents are whole thousands",
                round,
                entries.len(),
                documents.len()
            ),
        ))
    }
}

/// Regular cash withdrawals that are large relative to income
pub struct LargeCashWithdrawals;

impl Heuristic for LargeCashWithdrawals {
    fn name(&self) -> &'static str {
        "large_cash_withdrawals"
    }

    fn weight(&self) -> Decimal {
        dec!(10)
    }

    fn follow_up(&self) -> &'static str {
        "Ask for an accounting of cash withdrawals and what they were spent on"
    }

    fn evaluate(&self, disclosure: &Disclosure<'_>) -> Option<Trigger> {
        let cash = disclosure.average(DocumentType::BankStatement, "cash_withdrawals")?;
        if cash <= dec!(500) {
            return None;
        }
        let income = disclosure.monthly_income().unwrap_or(Decimal::ZERO);
        let strength = match ratio(cash, income) {
            Some(share) if share <= dec!(0.10) => return None,
            Some(share) => share.min(dec!(0.5)) / dec!(0.5),
            None => Decimal::ONE,
        };
        Some(Trigger::new(
            strength,
            format!(
                "Average monthly cash withdrawals of {} against declared monthly income of {}",
                money(cash),
                money(income)
            ),
        ))
    }
}

/// Transfers to or from accounts not listed in the disclosure
pub struct UndisclosedTransfers;

impl Heuristic for UndisclosedTransfers {
    fn name(&self) -> &'static str {
        "undisclosed_transfers"
    }

    fn weight(&self) -> Decimal {
        dec!(10)
    }

    fn follow_up(&self) -> &'static str {
        "Identify the counterparty accounts of unverified transfers and demand their statements"
    }

    fn evaluate(&self, disclosure: &Disclosure<'_>) -> Option<Trigger> {
        let transfers = disclosure.average(DocumentType::BankStatement, "unverified_transfers")?;
        if transfers <= Decimal::ZERO {
            return None;
        }
        let income = disclosure.monthly_income().unwrap_or(Decimal::ZERO);
        let strength = ratio(transfers, income)
            .map(|share| share.min(Decimal::ONE))
            .unwrap_or(Decimal::ONE);
        Some(Trigger::new(
            strength,
            format!(
                "Average monthly unverified transfers of {} against declared monthly income of {}",
                money(transfers),
                money(income)
            ),
        ))
    }
}

/// Large business or rental losses offsetting other income
pub struct BusinessLosses;

impl Heuristic for BusinessLosses {
    fn name(&self) -> &'static str {
        "business_losses"
    }

    fn weight(&self) -> Decimal {
        dec!(5)
    }

    fn follow_up(&self) -> &'static str {
        "Review business and rental schedules for personal expenses and depreciation to add back"
    }

    fn evaluate(&self, disclosure: &Disclosure<'_>) -> Option<Trigger> {
        let mut losses = Vec::new();
        if let Some(business) = disclosure.latest(DocumentType::TaxReturn, "business_income") {
            if business < dec!(-10000) {
                losses.push(format!("business loss of {}", money(business.abs())));
            }
        }
        if let Some(rental) = disclosure.latest(DocumentType::TaxReturn, "rental_income") {
            if rental < dec!(-5000) {
                losses.push(format!("rental loss of {}", money(rental.abs())));
            }
        }

        let strength = match losses.len() {
            0 => return None,
            1 => dec!(0.6),
            _ => Decimal::ONE,
        };
        Some(Trigger::new(
            strength,
            format!("Tax return reports {}", losses.join(" and ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared_types::{DocumentRecord, PartyRole};

    fn record(id: &str, document_type: DocumentType) -> DocumentRecord {
        DocumentRecord::new(
            id,
            PartyRole::Payor,
            document_type,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
    }

    fn net_worth(income: Decimal, expenses: Decimal) -> DocumentRecord {
        record("nw", DocumentType::NetWorthStatement)
            .with_item("monthly_income", income)
            .with_item("monthly_expenses", expenses)
    }

    fn evaluate(heuristic: &dyn Heuristic, docs: &[DocumentRecord]) -> Option<Trigger> {
        heuristic.evaluate(&Disclosure::new(PartyRole::Payor, docs))
    }

    #[test]
    fn test_expenses_exceed_income() {
        // 6,000 vs 5,000 is 20% over: strength 0.2 / 0.5
        let docs = vec![net_worth(dec!(5000), dec!(6000))];
        let trigger = evaluate(&ExpensesExceedIncome, &docs).unwrap();
        assert_eq!(trigger.strength, dec!(0.4));
        assert!(trigger.evidence.contains("20.0%"));
    }

    #[test]
    fn test_expenses_within_tolerance() {
        let docs = vec![net_worth(dec!(5000), dec!(5400))];
        assert!(evaluate(&ExpensesExceedIncome, &docs).is_none());
    }

    #[test]
    fn test_expenses_with_zero_income() {
        let docs = vec![net_worth(Decimal::ZERO, dec!(3000))];
        let trigger = evaluate(&ExpensesExceedIncome, &docs).unwrap();
        assert_eq!(trigger.strength, Decimal::ONE);
    }

    #[test]
    fn test_unexplained_deposits() {
        // 8,000 / 5,000 = 1.6: (1.6 - 1.2) / 0.8 = 0.5
        let docs = vec![
            net_worth(dec!(5000), dec!(4000)),
            record("bs", DocumentType::BankStatement).with_item("total_deposits", dec!(8000)),
        ];
        let trigger = evaluate(&UnexplainedDeposits, &docs).unwrap();
        assert_eq!(trigger.strength, dec!(0.5));
    }

    #[test]
    fn test_deposits_matching_income() {
        let docs = vec![
            net_worth(dec!(5000), dec!(4000)),
            record("bs", DocumentType::BankStatement).with_item("total_deposits", dec!(5500)),
        ];
        assert!(evaluate(&UnexplainedDeposits, &docs).is_none());
    }

    #[test]
    fn test_cash_intensive_occupation_needs_indicator() {
        let docs = vec![
            net_worth(dec!(5000), dec!(4000)),
            record("tr", DocumentType::TaxReturn)
                .with_item("business_gross_receipts", dec!(400000))
                .with_item("business_income", dec!(60000)),
        ];
        let disclosure =
            Disclosure::new(PartyRole::Payor, &docs).with_occupation("Restaurant owner");
        assert!(CashIntensiveOccupation.evaluate(&disclosure).is_none());
    }

    #[test]
    fn test_cash_intensive_occupation_with_both_indicators() {
        let docs = vec![
            net_worth(dec!(3000), dec!(4000)),
            record("tr", DocumentType::TaxReturn)
                .with_item("business_gross_receipts", dec!(400000))
                .with_item("business_income", dec!(20000)),
        ];
        let disclosure =
            Disclosure::new(PartyRole::Payor, &docs).with_occupation("Hair salon owner");
        let trigger = CashIntensiveOccupation.evaluate(&disclosure).unwrap();
        assert_eq!(trigger.strength, Decimal::ONE);
        assert!(trigger.evidence.contains("5.0%"));
    }

    #[test]
    fn test_cash_keywords_match_whole_words() {
        assert!(is_cash_intensive("General Contractor"));
        assert!(is_cash_intensive("owns a car wash"));
        assert!(!is_cash_intensive("Barrister"));
        assert!(!is_cash_intensive("Software engineer"));
    }

    #[test]
    fn test_round_number_income() {
        let docs = vec![
            net_worth(dec!(5000), dec!(4321)),
            record("tr", DocumentType::TaxReturn)
                .with_item("total_income", dec!(60000))
                .with_item("wages", dec!(41234)),
        ];
        // 2 of 3 income figures are whole thousands
        let trigger = evaluate(&RoundNumberIncome, &docs).unwrap();
        assert_eq!(trigger.strength.round_dp(4), dec!(0.6667));
    }

    #[test]
    fn test_round_numbers_need_two_documents() {
        let docs = vec![record("tr", DocumentType::TaxReturn)
            .with_item("total_income", dec!(60000))
            .with_item("wages", dec!(40000))
            .with_item("business_income", dec!(20000))];
        assert!(evaluate(&RoundNumberIncome, &docs).is_none());
    }

    #[test]
    fn test_large_cash_withdrawals() {
        // 1,000 / 5,000 = 20% of income: strength 0.2 / 0.5
        let docs = vec![
            net_worth(dec!(5000), dec!(4000)),
            record("bs", DocumentType::BankStatement).with_item("cash_withdrawals", dec!(1000)),
        ];
        let trigger = evaluate(&LargeCashWithdrawals, &docs).unwrap();
        assert_eq!(trigger.strength, dec!(0.4));
    }

    #[test]
    fn test_small_cash_withdrawals_ignored() {
        let docs = vec![
            net_worth(dec!(2000), dec!(1500)),
            record("bs", DocumentType::BankStatement).with_item("cash_withdrawals", dec!(400)),
        ];
        assert!(evaluate(&LargeCashWithdrawals, &docs).is_none());
    }

    fn transfers(id: &str, amount: Decimal) -> DocumentRecord {
        record(id, DocumentType::BankStatement).with_item("unverified_transfers", amount)
    }

    #[test]
    fn test_undisclosed_transfers() {
        // average of 1,500 and 2,500 against 8,000 of monthly income
        let docs = vec![
            net_worth(dec!(8000), dec!(6000)),
            transfers("bs-1", dec!(1500)),
            transfers("bs-2", dec!(2500)),
        ];
        let trigger = evaluate(&UndisclosedTransfers, &docs).unwrap();
        assert_eq!(trigger.strength, dec!(0.25));
        assert!(trigger.evidence.contains("$2000"));
    }

    #[test]
    fn test_transfer_strength_independent_of_statement_count() {
        let one_month = vec![net_worth(dec!(6000), dec!(5000)), transfers("bs-1", dec!(500))];
        let mut full_year = vec![net_worth(dec!(6000), dec!(5000))];
        full_year.extend((1..=12).map(|m| transfers(&format!("bs-{}", m), dec!(500))));

        let single = evaluate(&UndisclosedTransfers, &one_month).unwrap();
        let yearly = evaluate(&UndisclosedTransfers, &full_year).unwrap();
        assert_eq!(single.strength, yearly.strength);
        assert_eq!(yearly.strength.round_dp(4), dec!(0.0833));
    }

    #[test]
    fn test_figures_beyond_decimal_range_saturate() {
        let docs = vec![
            net_worth(dec!(0.01), Decimal::MAX),
            record("bs", DocumentType::BankStatement)
                .with_item("total_deposits", Decimal::MAX)
                .with_item("cash_withdrawals", Decimal::MAX),
        ];
        assert_eq!(evaluate(&ExpensesExceedIncome, &docs).unwrap().strength, Decimal::ONE);
        assert_eq!(evaluate(&UnexplainedDeposits, &docs).unwrap().strength, Decimal::ONE);
        assert_eq!(evaluate(&LargeCashWithdrawals, &docs).unwrap().strength, Decimal::ONE);
    }

    #[test]
    fn test_business_losses() {
        let tax_return = || record("tr", DocumentType::TaxReturn);

        let one = vec![tax_return().with_item("business_income", dec!(-12000))];
        assert_eq!(evaluate(&BusinessLosses, &one).unwrap().strength, dec!(0.6));

        let both = vec![tax_return()
            .with_item("business_income", dec!(-12000))
            .with_item("rental_income", dec!(-8000))];
        assert_eq!(evaluate(&BusinessLosses, &both).unwrap().strength, Decimal::ONE);

        let small = vec![tax_return().with_item("business_income", dec!(-2000))];
        assert!(evaluate(&BusinessLosses, &small).is_none());
    }
}
