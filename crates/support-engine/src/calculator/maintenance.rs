//! Post-divorce maintenance guidelines (DRL § 236(B)(6))
//!
//! Two formula tracks over the payor's income up to the maintenance cap:
//! - rate track: payor_rate x capped payor income - payee_rate x payee income
//! - combined track: combined_share x (capped payor income + payee income) - payee income
//!
//! The presumptive award is the lower track, floored at zero. Which rate pair
//! applies depends on whether the payor will also pay child support.

use crate::error::{AnalysisError, Result};
use crate::schedule::StatutorySchedule;
use rust_decimal::Decimal;
use shared_types::{MaintenanceComputation, MaintenanceTrack};

const DURATION_NOTE: &str = "Duration is not computed. The advisory duration schedule in \
DRL § 236(B)(6)(f) depends on the length of the marriage and is left to counsel and the court.";

/// Presumptive maintenance from the payor's and payee's adjusted incomes
///
/// # Errors
///
/// Returns [`AnalysisError::Validation`] for a negative income or a combined
/// income that overflows
#[tracing::instrument(skip(schedule), fields(schedule = %schedule.version))]
pub fn calculate_maintenance(
    payor_income: Decimal,
    payee_income: Decimal,
    child_support_paid: bool,
    schedule: &StatutorySchedule,
) -> Result<MaintenanceComputation> {
    if payor_income < Decimal::ZERO {
        return Err(AnalysisError::validation(
            "payor.adjusted_income",
            format!("must not be negative (found {})", payor_income),
        ));
    }
    if payee_income < Decimal::ZERO {
        return Err(AnalysisError::validation(
            "payee.adjusted_income",
            format!("must not be negative (found {})", payee_income),
        ));
    }

    let rules = &schedule.maintenance;
    let income_cap = rules.payor_income_cap;
    if income_cap < Decimal::ZERO {
        return Err(AnalysisError::configuration(
            "maintenance.payor_income_cap",
            format!("must not be negative (found {})", income_cap),
        ));
    }

    let (track, rates) = if child_support_paid {
        (MaintenanceTrack::WithChildSupport, rules.with_child_support)
    } else {
        (
            MaintenanceTrack::WithoutChildSupport,
            rules.without_child_support,
        )
    };

    let capped_payor_income = payor_income.min(income_cap);
    let payor_income_above_cap = payor_income - capped_payor_income;

    let rate_track_amount =
        rates.payor_rate * capped_payor_income - rates.payee_rate * payee_income;
    let combined_income = capped_payor_income
        .checked_add(payee_income)
        .ok_or_else(|| AnalysisError::overflow("maintenance.combined_income"))?;
    let combined_track_amount = rules.combined_share * combined_income - payee_income;
    let presumptive_award = rate_track_amount
        .min(combined_track_amount)
        .max(Decimal::ZERO);

    tracing::debug!(
        ?track,
        rate_track = %rate_track_amount,
        combined_track = %combined_track_amount,
        award = %presumptive_award,
        "maintenance computed"
    );

    Ok(MaintenanceComputation {
        payor_income,
        payee_income,
        income_cap,
        capped_payor_income,
        payor_income_above_cap,
        track,
        payor_rate: rates.payor_rate,
        payee_rate: rates.payee_rate,
        rate_track_amount,
        combined_share: rules.combined_share,
        combined_track_amount,
        presumptive_award,
        duration_note: DURATION_NOTE.to_string(),
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::schedule::ny_2024;
    use proptest::prelude::*;

    proptest! {
        /// Property: the award is never negative and never above either track
        #[test]
        fn award_is_lesser_of_tracks(
            payor in 0i64..1_000_000,
            payee in 0i64..1_000_000,
            with_cs in any::<bool>(),
        ) {
            let result = calculate_maintenance(
                Decimal::from(payor),
                Decimal::from(payee),
                with_cs,
                &ny_2024(),
            ).unwrap();
            prop_assert!(result.presumptive_award >= Decimal::ZERO);
            if result.presumptive_award > Decimal::ZERO {
                prop_assert!(result.presumptive_award <= result.rate_track_amount);
                prop_assert!(result.presumptive_award <= result.combined_track_amount);
            }
        }
    }
}
