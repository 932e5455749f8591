//! Child Support Standards Act (DRL § 240(1-b); FCA § 413)
//!
//! 1. Combined parental income = payor + payee adjusted income
//! 2. Capped combined income = min(combined, schedule cap)
//! 3. Basic obligation = capped combined income x percentage for the child count
//! 4. Each parent's share = basic obligation x that parent's pro-rata fraction
//!
//! Above the cap the court may apply the percentage to the excess, apply the
//! paragraph (f) factors, or both. That choice is judicial: the presumptive
//! figure stays capped and the uncapped figures are reported as information.

use super::CaseParameters;
use crate::error::{AnalysisError, Result};
use rust_decimal::Decimal;
use shared_types::{
    AboveCapInformation, AddOnKind, AddOnShare, ChildSupportComputation, ProRataShares,
};

/// Presumptive basic child support for two adjusted incomes
///
/// # Errors
///
/// Returns [`AnalysisError::Validation`] for a negative income or an amount
/// that overflows, and [`AnalysisError::Configuration`] when the case has no
/// children
#[tracing::instrument(skip(params), fields(children = params.number_of_children))]
pub fn calculate_child_support(
    payor_income: Decimal,
    payee_income: Decimal,
    params: &CaseParameters,
) -> Result<ChildSupportComputation> {
    ensure_income("payor.adjusted_income", payor_income)?;
    ensure_income("payee.adjusted_income", payee_income)?;
    compute(payor_income, payee_income, None, params)
}

/// CSSA on incomes after moving a maintenance award from payor to payee
/// (DRL § 240(1-b)(b)(5)(iii)(I) and (vii)(C))
pub(crate) fn calculate_after_maintenance(
    payor_income: Decimal,
    payee_income: Decimal,
    maintenance_award: Decimal,
    params: &CaseParameters,
) -> Result<ChildSupportComputation> {
    ensure_income("payor.adjusted_income", payor_income)?;
    ensure_income("payee.adjusted_income", payee_income)?;
    let payor_after = (payor_income - maintenance_award).max(Decimal::ZERO);
    let transferred = payor_income - payor_after;
    let payee_after = payee_income
        .checked_add(transferred)
        .ok_or_else(|| AnalysisError::overflow("payee.adjusted_income"))?;
    compute(payor_after, payee_after, Some(transferred), params)
}

fn compute(
    payor_income: Decimal,
    payee_income: Decimal,
    maintenance_adjustment: Option<Decimal>,
    params: &CaseParameters,
) -> Result<ChildSupportComputation> {
    let schedule = &params.schedule;
    let income_cap = schedule.child_support.combined_income_cap;
    if income_cap < Decimal::ZERO {
        return Err(AnalysisError::configuration(
            "child_support.combined_income_cap",
            format!("must not be negative (found {})", income_cap),
        ));
    }
    let percentage = schedule.child_support_percentage(params.number_of_children)?;

    let combined_parental_income = payor_income
        .checked_add(payee_income)
        .ok_or_else(|| AnalysisError::overflow("combined_parental_income"))?;
    let capped_combined_income = combined_parental_income.min(income_cap);
    let basic_obligation = capped_combined_income
        .checked_mul(percentage)
        .ok_or_else(|| AnalysisError::overflow("basic_obligation"))?;

    let pro_rata = pro_rata_shares(payor_income, combined_parental_income);
    let payor_share = basic_obligation * pro_rata.payor;
    let payee_share = basic_obligation * pro_rata.payee;

    let above_cap = if combined_parental_income > income_cap {
        let income_above_cap = combined_parental_income - income_cap;
        let uncapped_obligation = combined_parental_income
            .checked_mul(percentage)
            .ok_or_else(|| AnalysisError::overflow("above_cap.uncapped_obligation"))?;
        let additional_obligation = uncapped_obligation - basic_obligation;
        Some(AboveCapInformation {
            income_above_cap,
            uncapped_obligation,
            additional_obligation,
            payor_additional_share: additional_obligation * pro_rata.payor,
        })
    } else {
        None
    };

    let mut add_ons = Vec::new();
    for (kind, amount) in params.add_on_expenses.items() {
        if amount < Decimal::ZERO {
            return Err(AnalysisError::validation(
                format!("add_on_expenses.{}", add_on_field(kind)),
                format!("must not be negative (found {})", amount),
            ));
        }
        if amount.is_zero() {
            continue;
        }
        add_ons.push(AddOnShare {
            expense: kind,
            amount,
            payor_share: amount * pro_rata.payor,
            payee_share: amount * pro_rata.payee,
        });
    }
    let payor_add_on_total = add_ons
        .iter()
        .try_fold(Decimal::ZERO, |total, a| total.checked_add(a.payor_share))
        .ok_or_else(|| AnalysisError::overflow("add_on_expenses"))?;
    let payor_total_obligation = payor_share
        .checked_add(payor_add_on_total)
        .ok_or_else(|| AnalysisError::overflow("payor_total_obligation"))?;

    tracing::debug!(
        combined = %combined_parental_income,
        capped = %capped_combined_income,
        percentage = %percentage,
        basic = %basic_obligation,
        payor_share = %payor_share,
        "child support computed"
    );

    Ok(ChildSupportComputation {
        number_of_children: params.number_of_children,
        payor_income,
        payee_income,
        maintenance_adjustment,
        combined_parental_income,
        income_cap,
        capped_combined_income,
        percentage,
        basic_obligation,
        pro_rata,
        payor_share,
        payee_share,
        above_cap,
        add_ons,
        payor_add_on_total,
        payor_total_obligation,
    })
}

/// Pro-rata fractions; the payee fraction is the complement so the pair sums to exactly one.
/// Zero combined income yields zero for both parents.
fn pro_rata_shares(payor_income: Decimal, combined: Decimal) -> ProRataShares {
    if combined.is_zero() {
        return ProRataShares {
            payor: Decimal::ZERO,
            payee: Decimal::ZERO,
        };
    }
    let payor = payor_income / combined;
    ProRataShares {
        payor,
        payee: Decimal::ONE - payor,
    }
}

fn ensure_income(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(AnalysisError::validation(
            field,
            format!("must not be negative (found {})", value),
        ));
    }
    Ok(())
}

fn add_on_field(kind: AddOnKind) -> &'static str {
    match kind {
        AddOnKind::ChildCare => "child_care",
        AddOnKind::HealthInsurance => "health_insurance",
        AddOnKind::UnreimbursedMedical => "unreimbursed_medical",
        AddOnKind::Education => "education",
    }
}
