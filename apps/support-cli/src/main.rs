//! Support analysis CLI
//!
//! Loads a case file (JSON) and a statutory schedule (TOML), runs the engine
//! and writes the report. Logs go to stderr so stdout stays clean for JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shared_types::{AnalysisReport, CaseInput, PaymentSchedule};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use support_engine::{AnalysisEngine, StatutorySchedule};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "support-cli")]
#[command(
    version,
    about = "New York child support and maintenance analysis with disclosure cross-checks"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a case and emit a report
    Analyze {
        /// Case file (JSON)
        #[arg(long)]
        case: PathBuf,

        /// Statutory schedule (TOML)
        #[arg(long)]
        schedule: PathBuf,

        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a schedule and print its figures
    Schedule {
        #[arg(long)]
        schedule: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Summary,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Command::Analyze {
            case,
            schedule,
            format,
            output,
        } => {
            let report = analyze(&case, &schedule)?;
            let rendered = match format {
                Format::Json => report.to_json().context("Failed to serialize report")?,
                Format::Summary => render_summary(&report),
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write report: {}", path.display()))?;
                    tracing::info!(path = %path.display(), "report written");
                }
                None => println!("{}", rendered),
            }
        }
        Command::Schedule { schedule } => {
            let schedule = StatutorySchedule::from_file(&schedule)?;
            println!("{}", render_schedule(&schedule));
        }
    }

    Ok(())
}

fn analyze(case_path: &Path, schedule_path: &Path) -> Result<AnalysisReport> {
    let schedule = StatutorySchedule::from_file(schedule_path)?;
    let json = std::fs::read_to_string(case_path)
        .with_context(|| format!("Failed to read case file: {}", case_path.display()))?;
    let case: CaseInput = serde_json::from_str(&json)
        .with_context(|| format!("Invalid case file: {}", case_path.display()))?;

    tracing::info!(
        schedule = %schedule.version,
        documents = case.documents.len(),
        "analyzing case"
    );

    let engine = AnalysisEngine::new(schedule)?;
    Ok(engine.analyze(&case)?)
}

fn render_payments(out: &mut String, label: &str, payments: &PaymentSchedule) {
    let _ = writeln!(
        out,
        "{:<14} ${} / year  ${} / month  ${} / two weeks  ${} / week",
        label, payments.annual, payments.monthly, payments.biweekly, payments.weekly
    );
}

fn render_summary(report: &AnalysisReport) -> String {
    let contents = report.contents();
    let summary = report.summary();
    let mut out = String::new();

    let _ = writeln!(out, "Report {} ({})", report.report_id(), contents.schedule_version);
    let _ = writeln!(
        out,
        "Adjusted income: payor ${}, payee ${}",
        contents.payor_income.adjusted_income.round_dp(2),
        contents.payee_income.adjusted_income.round_dp(2)
    );
    let _ = writeln!(out);

    match &summary.child_support {
        Some(payments) => render_payments(&mut out, "Child support", payments),
        None => {
            let _ = writeln!(out, "Child support  not calculated");
        }
    }
    if let Some(payments) = &summary.maintenance {
        render_payments(&mut out, "Maintenance", payments);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Document findings: {} significant, {} notable",
        summary.significant_findings, summary.notable_findings
    );
    for assessment in report.risk_assessments() {
        let _ = writeln!(
            out,
            "Hidden-income risk ({}): {} / 100",
            assessment.party,
            assessment.aggregate_score.round_dp(1)
        );
    }

    if !contents.recommended_actions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recommended actions:");
        for (i, action) in contents.recommended_actions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, action);
        }
    }

    let _ = writeln!(out);
    let _ = write!(out, "{}", contents.disclaimer);
    out
}

fn render_schedule(schedule: &StatutorySchedule) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Schedule {} effective {}",
        schedule.version, schedule.effective_date
    );
    let _ = writeln!(
        out,
        "Child support: combined income cap ${}",
        schedule.child_support.combined_income_cap
    );
    let last = schedule.child_support.percentages.len();
    for (i, pct) in schedule.child_support.percentages.iter().enumerate() {
        let children = if i + 1 == last {
            format!("{}+", i + 1)
        } else {
            (i + 1).to_string()
        };
        let _ = writeln!(out, "  {:<3} children: {}", children, pct);
    }
    let maintenance = &schedule.maintenance;
    let _ = writeln!(
        out,
        "Maintenance: payor income cap ${}, combined share {}",
        maintenance.payor_income_cap, maintenance.combined_share
    );
    let _ = writeln!(
        out,
        "  with child support:    payor {} / payee {}",
        maintenance.with_child_support.payor_rate, maintenance.with_child_support.payee_rate
    );
    let _ = write!(
        out,
        "  without child support: payor {} / payee {}",
        maintenance.without_child_support.payor_rate,
        maintenance.without_child_support.payee_rate
    );
    out
}
