//! Income normalization: declared items to canonical annual gross and adjusted income

use crate::error::{AnalysisError, Result};
use rust_decimal::Decimal;
use shared_types::{DisallowedDeduction, ExistingOrder, NormalizedIncome, Party};

/// Normalize one party's declared income.
///
/// Every income item is taken as an annual figure. Deductions for prior
/// child support or maintenance only count when a matching order obligating
/// this party is listed in `existing_orders`.
///
/// # Errors
///
/// Returns [`AnalysisError::Validation`] if the party declares no income, an
/// amount is negative, or the income or deduction total overflows
#[tracing::instrument(skip_all, fields(role = %party.role))]
pub fn normalize_party(
    party: &Party,
    existing_orders: &[ExistingOrder],
) -> Result<NormalizedIncome> {
    if party.income.is_empty() {
        return Err(AnalysisError::validation(
            format!("{}.income", party.role),
            "no income items declared; declare a zero-amount item for a party without income",
        ));
    }

    let mut gross_income = Decimal::ZERO;
    let mut non_recurring_income = Decimal::ZERO;
    for (i, item) in party.income.iter().enumerate() {
        if item.annual_amount < Decimal::ZERO {
            return Err(AnalysisError::validation(
                format!("{}.income[{}].annual_amount", party.role, i),
                format!("must not be negative (found {})", item.annual_amount),
            ));
        }
        gross_income = gross_income
            .checked_add(item.annual_amount)
            .ok_or_else(|| AnalysisError::overflow(format!("{}.income", party.role)))?;
        if !item.recurring {
            non_recurring_income += item.annual_amount;
        }
    }

    let mut allowed_deductions = Decimal::ZERO;
    let mut disallowed_deductions = Vec::new();
    for (i, deduction) in party.deductions.iter().enumerate() {
        if deduction.annual_amount < Decimal::ZERO {
            return Err(AnalysisError::validation(
                format!("{}.deductions[{}].annual_amount", party.role, i),
                format!("must not be negative (found {})", deduction.annual_amount),
            ));
        }

        let eligible = match deduction.category.required_order() {
            Some(kind) => existing_orders
                .iter()
                .any(|order| order.kind == kind && order.obligor == party.role),
            None => true,
        };

        if eligible {
            allowed_deductions = allowed_deductions
                .checked_add(deduction.annual_amount)
                .ok_or_else(|| AnalysisError::overflow(format!("{}.deductions", party.role)))?;
        } else {
            tracing::warn!(
                category = ?deduction.category,
                amount = %deduction.annual_amount,
                "deduction disallowed: no existing order obligates this party"
            );
            disallowed_deductions.push(DisallowedDeduction {
                category: deduction.category,
                amount: deduction.annual_amount,
                reason: "deductible only when paid under an existing court order".to_string(),
            });
        }
    }

    let deductions_clamped = allowed_deductions > gross_income;
    if deductions_clamped {
        tracing::warn!(
            gross = %gross_income,
            deductions = %allowed_deductions,
            "deductions exceed gross income; adjusted income floored at zero"
        );
    }
    let adjusted_income = (gross_income - allowed_deductions).max(Decimal::ZERO);

    tracing::debug!(gross = %gross_income, adjusted = %adjusted_income, "income normalized");

    Ok(NormalizedIncome {
        role: party.role,
        gross_income,
        non_recurring_income,
        allowed_deductions,
        disallowed_deductions,
        adjusted_income,
        deductions_clamped,
    })
}
