//! Statutory support calculators
//!
//! - [`child_support`]: Child Support Standards Act, DRL § 240(1-b)
//! - [`maintenance`]: post-divorce maintenance guidelines, DRL § 236(B)(6)
//!
//! Both are pure functions of adjusted incomes and a [`StatutorySchedule`].
//! [`calculate_support`] runs them in statutory order: maintenance first, then
//! child support on incomes adjusted for the maintenance award.

pub mod child_support;
pub mod maintenance;

pub use child_support::calculate_child_support;
pub use maintenance::calculate_maintenance;

use crate::error::Result;
use crate::schedule::StatutorySchedule;
use rust_decimal::Decimal;
use shared_types::{AddOnExpenses, ExistingOrder, NormalizedIncome, SupportComputation};

/// Case-level inputs to the calculators
#[derive(Debug, Clone, PartialEq)]
pub struct CaseParameters {
    pub number_of_children: u32,
    pub schedule: StatutorySchedule,
    /// Court orders already in force; prior support deductions need one
    pub existing_orders: Vec<ExistingOrder>,
    pub add_on_expenses: AddOnExpenses,
    pub include_maintenance: bool,
}

impl CaseParameters {
    pub fn new(number_of_children: u32, schedule: StatutorySchedule) -> Self {
        Self {
            number_of_children,
            schedule,
            existing_orders: Vec::new(),
            add_on_expenses: AddOnExpenses::default(),
            include_maintenance: false,
        }
    }

    pub fn with_add_ons(mut self, add_on_expenses: AddOnExpenses) -> Self {
        self.add_on_expenses = add_on_expenses;
        self
    }

    pub fn with_maintenance(mut self) -> Self {
        self.include_maintenance = true;
        self
    }
}

/// Run every calculation the case asks for.
///
/// Child support is computed when the case has children; maintenance when
/// `include_maintenance` is set. With both, the presumptive maintenance award
/// is moved from the payor's income to the payee's before the CSSA formula.
///
/// # Errors
///
/// Propagates any error from the maintenance or child support calculators
#[tracing::instrument(skip_all, fields(children = params.number_of_children))]
pub fn calculate_support(
    payor: &NormalizedIncome,
    payee: &NormalizedIncome,
    params: &CaseParameters,
) -> Result<SupportComputation> {
    let child_support_paid = params.number_of_children > 0;

    let maintenance = if params.include_maintenance {
        Some(calculate_maintenance(
            payor.adjusted_income,
            payee.adjusted_income,
            child_support_paid,
            &params.schedule,
        )?)
    } else {
        None
    };

    let child_support = if child_support_paid {
        let award = maintenance
            .as_ref()
            .map(|m| m.presumptive_award)
            .filter(|award| *award > Decimal::ZERO);
        let computation = match award {
            Some(award) => child_support::calculate_after_maintenance(
                payor.adjusted_income,
                payee.adjusted_income,
                award,
                params,
            )?,
            None => calculate_child_support(payor.adjusted_income, payee.adjusted_income, params)?,
        };
        Some(computation)
    } else {
        tracing::info!("no children in case; child support not calculated");
        None
    };

    Ok(SupportComputation {
        child_support,
        maintenance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ny_2024;
    use rust_decimal_macros::dec;
    use shared_types::PartyRole;

    fn normalized(role: PartyRole, adjusted: Decimal) -> NormalizedIncome {
        NormalizedIncome {
            role,
            gross_income: adjusted,
            non_recurring_income: Decimal::ZERO,
            allowed_deductions: Decimal::ZERO,
            disallowed_deductions: Vec::new(),
            adjusted_income: adjusted,
            deductions_clamped: false,
        }
    }

    #[test]
    fn test_child_support_only() {
        let params = CaseParameters::new(2, ny_2024());
        let result = calculate_support(
            &normalized(PartyRole::Payor, dec!(120000)),
            &normalized(PartyRole::Payee, dec!(60000)),
            &params,
        )
        .unwrap();

        assert!(result.maintenance.is_none());
        let cs = result.child_support.unwrap();
        assert_eq!(cs.basic_obligation, dec!(45000));
        assert!(cs.maintenance_adjustment.is_none());
    }

    #[test]
    fn test_maintenance_only_when_no_children() {
        let params = CaseParameters::new(0, ny_2024()).with_maintenance();
        let result = calculate_support(
            &normalized(PartyRole::Payor, dec!(150000)),
            &normalized(PartyRole::Payee, dec!(30000)),
            &params,
        )
        .unwrap();

        assert!(result.child_support.is_none());
        let m = result.maintenance.unwrap();
        // 30% of 150,000 - 20% of 30,000 = 39,000; 40% of 180,000 - 30,000 = 42,000
        assert_eq!(m.presumptive_award, dec!(39000));
    }

    #[test]
    fn test_maintenance_adjusts_child_support_incomes() {
        let params = CaseParameters::new(1, ny_2024()).with_maintenance();
        let result = calculate_support(
            &normalized(PartyRole::Payor, dec!(150000)),
            &normalized(PartyRole::Payee, dec!(30000)),
            &params,
        )
        .unwrap();

        let m = result.maintenance.unwrap();
        // with child support: 20% of 150,000 - 25% of 30,000 = 22,500
        assert_eq!(m.presumptive_award, dec!(22500));

        let cs = result.child_support.unwrap();
        assert_eq!(cs.maintenance_adjustment, Some(dec!(22500)));
        assert_eq!(cs.payor_income, dec!(127500));
        assert_eq!(cs.payee_income, dec!(52500));
        assert_eq!(cs.combined_parental_income, dec!(180000));
    }

    #[test]
    fn test_zero_maintenance_leaves_incomes_untouched() {
        let params = CaseParameters::new(1, ny_2024()).with_maintenance();
        let result = calculate_support(
            &normalized(PartyRole::Payor, dec!(50000)),
            &normalized(PartyRole::Payee, dec!(60000)),
            &params,
        )
        .unwrap();

        assert_eq!(result.maintenance.unwrap().presumptive_award, Decimal::ZERO);
        let cs = result.child_support.unwrap();
        assert!(cs.maintenance_adjustment.is_none());
        assert_eq!(cs.payor_income, dec!(50000));
    }
}
