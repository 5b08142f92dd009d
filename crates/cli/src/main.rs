use api_shared::catalogue::bias_catalogue;
use api_shared::config::{ENV_HIGH_RISK_THRESHOLD, ENV_MEDIUM_RISK_THRESHOLD};
use api_shared::repository::PatientSummary;
use api_shared::wire::{FairnessSummaryRes, FairnessVerdictRes, PredictionRes};
use api_shared::{InMemoryPatientRepository, PatientRecord, PatientRepository};
use clap::{Parser, Subcommand};
use readmit_core::config::risk_thresholds_from_env_values;
use readmit_core::{FairnessAggregator, PatientFeatures, ScoringEngine};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "readmit")]
#[command(about = "30-day readmission risk scoring CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a patient from command-line values
    Score {
        /// Age in whole years
        #[arg(long)]
        age: u32,
        /// Gender (informational only)
        #[arg(long)]
        gender: String,
        /// Primary diagnosis, free text
        #[arg(long)]
        diagnosis: String,
        /// Length of stay in days
        #[arg(long)]
        length_of_stay: u32,
        /// Admissions in the last 12 months
        #[arg(long)]
        previous_admissions: u32,
        /// The index admission was an emergency
        #[arg(long)]
        emergency: bool,
        /// Number of discharge medications
        #[arg(long)]
        medication_count: Option<u32>,
        /// Include the rules that fired
        #[arg(long)]
        explain: bool,
    },
    /// Score a patient feature JSON file
    ScoreFile {
        /// Path to a JSON object with the patient features
        path: PathBuf,
        /// Include the rules that fired
        #[arg(long)]
        explain: bool,
    },
    /// Classify subgroup fairness ratios
    Fairness {
        /// JSON array of subgroup metrics (default: the reference monitoring catalogue)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List the reference patients
    Patients,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let thresholds = risk_thresholds_from_env_values(
        std::env::var(ENV_HIGH_RISK_THRESHOLD).ok(),
        std::env::var(ENV_MEDIUM_RISK_THRESHOLD).ok(),
    )?;
    let engine = ScoringEngine::with_thresholds(thresholds);

    let output = match cli.command {
        Some(Commands::Score {
            age,
            gender,
            diagnosis,
            length_of_stay,
            previous_admissions,
            emergency,
            medication_count,
            explain,
        }) => {
            let mut features =
                PatientFeatures::new(age, &gender, &diagnosis, length_of_stay, previous_admissions)?
                    .with_emergency_admission(emergency);
            if let Some(count) = medication_count {
                features = features.with_medication_count(count);
            }
            serde_json::to_value(assess(&engine, &features, explain))?
        }
        Some(Commands::ScoreFile { path, explain }) => score_file(&engine, &path, explain)?,
        Some(Commands::Fairness { file }) => fairness_report(file.as_deref())?,
        Some(Commands::Patients) => patient_listing(&InMemoryPatientRepository::seeded())?,
        None => {
            println!("No command given. Use --help to see the available commands.");
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn assess(engine: &ScoringEngine, features: &PatientFeatures, explain: bool) -> PredictionRes {
    let res = PredictionRes::from(engine.score(features));
    if explain {
        res.with_breakdown(engine.breakdown(features))
    } else {
        res
    }
}

fn score_file(
    engine: &ScoringEngine,
    path: &Path,
    explain: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    let features = PatientFeatures::from_json(&read_json(path)?)?;
    Ok(serde_json::to_value(assess(engine, &features, explain))?)
}

fn patient_listing(repository: &dyn PatientRepository) -> serde_json::Result<Value> {
    let summaries: Vec<PatientSummary> = repository
        .list()
        .iter()
        .map(PatientRecord::summary)
        .collect();
    serde_json::to_value(summaries)
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

fn fairness_report(file: Option<&Path>) -> Result<Value, Box<dyn std::error::Error>> {
    let aggregator = FairnessAggregator::new();
    let verdicts = match file {
        Some(path) => aggregator.evaluate_json(&read_json(path)?)?,
        None => aggregator.evaluate(&bias_catalogue())?,
    };
    let summary = FairnessSummaryRes::from(aggregator.summarise(&verdicts));
    let verdicts: Vec<FairnessVerdictRes> = verdicts.into_iter().map(Into::into).collect();

    Ok(json!({ "verdicts": verdicts, "summary": summary }))
}
