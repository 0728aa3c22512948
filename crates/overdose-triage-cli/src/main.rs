//! Overdose-triage CLI - score a free-text substance description

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use overdose_triage_core::{
    build_referral_text, ClientContext, EngineConfig, Sex, SourceFormat, TriageEngine,
    TriageResult,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "overdose-triage")]
#[command(about = "Acute overdose-risk triage from a free-text substance description")]
#[command(version)]
struct Cli {
    /// Free-text substance description (read from stdin when omitted)
    text: Option<String>,

    /// Directory holding drugs.json and combos.json
    #[arg(long, env = "OVERDOSE_TRIAGE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Engine config file (takes precedence over --data-dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory holds TripSit-format files
    #[arg(long)]
    tripsit: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    output: OutputFormat,

    /// Age in years
    #[arg(long)]
    age: Option<u32>,

    /// Weight in kg
    #[arg(long)]
    weight_kg: Option<f64>,

    /// Height in cm
    #[arg(long)]
    height_cm: Option<f64>,

    /// Recorded sex (female, male, intersex / other)
    #[arg(long)]
    sex: Option<String>,

    /// Known or suspected opioid dependence
    #[arg(long)]
    opioid_dependent: bool,

    /// Homeless or unstable housing
    #[arg(long)]
    homeless: bool,

    /// Non-fatal overdose in the last 3-6 months
    #[arg(long)]
    recent_overdose: bool,

    /// Severe mental health difficulty
    #[arg(long)]
    severe_mental_health: bool,

    /// History of regular polysubstance use
    #[arg(long)]
    polysubstance_history: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
    Referral,
}

impl Cli {
    fn context(&self) -> ClientContext {
        ClientContext {
            age: self.age,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            sex: self.sex.as_deref().and_then(Sex::parse),
            opioid_dependent: self.opioid_dependent,
            homeless: self.homeless,
            recent_overdose: self.recent_overdose,
            severe_mental_health: self.severe_mental_health,
            polysubstance_history: self.polysubstance_history,
        }
    }

    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        if let Some(path) = &self.config {
            return EngineConfig::from_file(path)
                .with_context(|| format!("Failed to load engine config {}", path.display()));
        }
        let Some(dir) = &self.data_dir else {
            bail!("No reference data: pass --config or --data-dir (or set OVERDOSE_TRIAGE_DATA_DIR)");
        };
        let format = if self.tripsit {
            SourceFormat::Tripsit
        } else {
            SourceFormat::Native
        };
        Ok(EngineConfig::from_data_dir(dir, format))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = cli.engine_config()?;
    let engine: TriageEngine = config
        .build_engine()
        .context("Failed to load reference data")?;

    let text = match &cli.text {
        Some(text) => text.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read substance text from stdin")?;
            buf
        }
    };

    let context = cli.context();
    let result = engine.triage(&text, &context);
    tracing::debug!(branch = %result.branch, "triage finished");

    let rendered = match cli.output {
        OutputFormat::Summary => render_summary(&result),
        OutputFormat::Json => result.to_json().context("Failed to serialize result")?,
        OutputFormat::Referral => build_referral_text(&result, &context),
    };
    println!("{rendered}");

    Ok(())
}

/// Short human-readable summary.
fn render_summary(result: &TriageResult) -> String {
    let mut out = String::new();
    let list = |items: &[String]| {
        if items.is_empty() {
            "none".to_string()
        } else {
            items.join(", ")
        }
    };

    out.push_str(&format!("Risk branch: {} ({})\n", result.branch, result.branch.pathway()));
    out.push_str(&format!(
        "Total score: {:.1} (drug {:.1} = base {:.1} + synergy {:.1} + combo {:.1}; context {:.1})\n",
        result.total_score,
        result.drug_score.total,
        result.drug_score.base,
        result.drug_score.synergy,
        result.drug_score.combo,
        result.context_score.total
    ));
    out.push_str(&format!("Detected: {}\n", list(&result.detected_drugs)));
    out.push_str(&format!("Unknown: {}\n", list(&result.unknown_drugs)));

    if !result.alerts.is_empty() {
        out.push_str("Alerts:\n");
        for alert in &result.alerts {
            out.push_str(&format!("  ! {alert}\n"));
        }
    }

    out.push_str("Interventions:\n");
    for step in &result.interventions {
        out.push_str(&format!("  - {step}\n"));
    }

    let referral = &result.referral;
    if referral.refer {
        out.push_str(&format!(
            "Referral: YES, {} to {}. {}",
            referral.priority, referral.service, referral.reason
        ));
    } else {
        out.push_str(&format!("Referral: no. {}", referral.reason));
    }

    out
}
