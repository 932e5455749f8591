//! Report composition
//!
//! Normalizes both parties, fans the calculator, the consistency analyzer and
//! the hidden-income detector out over rayon, and assembles one immutable
//! [`AnalysisReport`]. Any component error aborts the whole report.

use crate::calculator::{calculate_support, CaseParameters};
use crate::consistency::analyze_consistency;
use crate::error::{AnalysisError, Result};
use crate::heuristics::{self, figures::money, detect_hidden_income, Disclosure};
use crate::normalizer::normalize_party;
use crate::schedule::StatutorySchedule;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use shared_types::{
    fingerprint, AnalysisReport, CaseInput, ConsistencyFinding, Materiality, PartyRole,
    PaymentSchedule, ReportContents, ReportSummary, RiskAssessment, SupportComputation,
};

/// Upper bound on recommended follow-up actions
pub const MAX_ACTIONS: usize = 10;

/// Risk score at which a forensic accountant referral is recommended
pub const FORENSIC_REFERRAL_SCORE: Decimal = dec!(50);

pub const DISCLAIMER: &str = "This report applies the New York statutory formulas to the \
figures provided. It is not legal advice. Courts may deviate from presumptive amounts under \
DRL § 240(1-b)(f) and § 236(B)(6)(e), and hidden-income signals are advisory only.";

/// Round to cents for display, always carrying two decimal places
pub fn cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Annual amount broken into monthly, bi-weekly and weekly payments
pub fn payment_schedule(annual: Decimal) -> PaymentSchedule {
    PaymentSchedule {
        annual: cents(annual),
        monthly: cents(annual / dec!(12)),
        biweekly: cents(annual / dec!(26)),
        weekly: cents(annual / dec!(52)),
    }
}

/// Analyze one case against a schedule and assemble the report
///
/// # Errors
///
/// Returns an error if:
/// - The schedule fails validation
/// - A party carries the wrong role, or declares negative or out-of-range amounts
/// - A document has an empty or duplicate id, or no date
///
/// No partial report is produced.
///
/// # Example
///
/// ```no_run
/// use support_engine::{compose_report, StatutorySchedule};
/// use shared_types::CaseInput;
///
/// # fn example() -> anyhow::Result<()> {
/// let schedule = StatutorySchedule::from_file("schedules/ny-2024.toml")?;
/// let json = std::fs::read_to_string("demos/sample-case.json")?;
/// let case: CaseInput = serde_json::from_str(&json)?;
///
/// let report = compose_report(&case, &schedule)?;
/// println!("{}", report.to_json()?);
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    skip_all,
    fields(schedule = %schedule.version, children = case.number_of_children)
)]
pub fn compose_report(case: &CaseInput, schedule: &StatutorySchedule) -> Result<AnalysisReport> {
    schedule.validate()?;
    check_role(&case.payor.role, PartyRole::Payor, "payor.role")?;
    check_role(&case.payee.role, PartyRole::Payee, "payee.role")?;

    let input_fingerprint = fingerprint(&(case, schedule))
        .map_err(|e| AnalysisError::validation("case", e.to_string()))?;

    let params = CaseParameters {
        number_of_children: case.number_of_children,
        schedule: schedule.clone(),
        existing_orders: case.existing_orders.clone(),
        add_on_expenses: case.add_on_expenses.clone(),
        include_maintenance: case.include_maintenance,
    };

    let payor_income = normalize_party(&case.payor, &params.existing_orders)?;
    let payee_income = normalize_party(&case.payee, &params.existing_orders)?;

    let (support, (findings, risk_assessments)) = rayon::join(
        || calculate_support(&payor_income, &payee_income, &params),
        || {
            rayon::join(
                || analyze_consistency(&case.documents),
                || {
                    vec![
                        detect_hidden_income(&Disclosure::for_party(&case.payor, &case.documents)),
                        detect_hidden_income(&Disclosure::for_party(&case.payee, &case.documents)),
                    ]
                },
            )
        },
    );
    let support = support?;
    let consistency_findings = findings?;

    let recommended_actions = recommended_actions(&consistency_findings, &risk_assessments);
    let summary = summarize(&support, &consistency_findings, &risk_assessments);

    tracing::info!(
        findings = consistency_findings.len(),
        highest_risk = %summary.highest_risk_score,
        fingerprint = %input_fingerprint,
        "analysis report composed"
    );

    Ok(AnalysisReport::new(
        ReportContents {
            schedule_version: schedule.version.clone(),
            payor_income,
            payee_income,
            support,
            consistency_findings,
            risk_assessments,
            recommended_actions,
            disclaimer: DISCLAIMER.to_string(),
            summary,
        },
        input_fingerprint,
    ))
}

fn check_role(actual: &PartyRole, expected: PartyRole, field: &str) -> Result<()> {
    if *actual != expected {
        return Err(AnalysisError::validation(
            field,
            format!("expected {} but found {}", expected, actual),
        ));
    }
    Ok(())
}

fn summarize(
    support: &SupportComputation,
    findings: &[ConsistencyFinding],
    assessments: &[RiskAssessment],
) -> ReportSummary {
    let count = |level: Materiality| findings.iter().filter(|f| f.materiality == level).count();
    ReportSummary {
        child_support: support
            .child_support
            .as_ref()
            .map(|cs| payment_schedule(cs.payor_total_obligation)),
        maintenance: support
            .maintenance
            .as_ref()
            .map(|m| payment_schedule(m.presumptive_award)),
        significant_findings: count(Materiality::Significant),
        notable_findings: count(Materiality::Notable),
        highest_risk_score: assessments
            .iter()
            .map(|a| a.aggregate_score)
            .max()
            .unwrap_or(Decimal::ZERO),
    }
}

/// Follow-up steps for counsel, most pressing first, capped at [`MAX_ACTIONS`]
pub fn recommended_actions(
    findings: &[ConsistencyFinding],
    assessments: &[RiskAssessment],
) -> Vec<String> {
    let mut actions: Vec<String> = findings
        .iter()
        .filter(|f| f.materiality == Materiality::Significant)
        .map(|f| {
            format!(
                "Reconcile {} between {} {} and {} {} (difference of {})",
                f.reference,
                f.left_type,
                f.left_document,
                f.right_type,
                f.right_document,
                money(f.absolute_delta)
            )
        })
        .collect();

    for assessment in assessments {
        if assessment.aggregate_score >= FORENSIC_REFERRAL_SCORE {
            actions.push(format!(
                "Consider retaining a forensic accountant to examine the {}'s finances \
                 (risk score {})",
                assessment.party,
                assessment.aggregate_score.round_dp(1)
            ));
        }
        for signal in &assessment.signals {
            if let Some(heuristic) = heuristics::find(&signal.heuristic) {
                actions.push(format!("{}: {}", assessment.party, heuristic.follow_up()));
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    actions.retain(|action| seen.insert(action.clone()));
    actions.truncate(MAX_ACTIONS);
    actions
}
