use std::path::PathBuf;

use clap::Parser;

use syllogism_bench::config::{BenchmarkConfig, EvaluationMode, ResolvedOutputs};
use syllogism_bench::logging::init_logging;
use syllogism_bench::runner::EvaluationRunner;

/// Evaluation harness for syllogistic reasoning models.
#[derive(Debug, Parser)]
#[command(
    name = "syllogism-bench",
    author,
    version,
    about = "Fits reasoning models per participant and scores their predictions"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override how training data is selected per participant.
    #[arg(long, value_enum)]
    mode: Option<EvaluationMode>,

    /// Override the RNG seed for stochastic baselines.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration and loading inputs.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(mode) = cli.mode {
        config.evaluation.mode = mode;
    }

    if let Some(seed) = cli.seed {
        config.evaluation.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let model_count = config.models.len();
    let run_id = config.run_id.clone();
    let mode = config.evaluation.mode;

    println!(
        "Loaded configuration '{run_id}' with {model_count} model{} ({} mode)",
        if model_count == 1 { "" } else { "s" },
        mode.as_str()
    );

    let _logging_guard = init_logging(&config, &outputs)?;
    let runner = EvaluationRunner::new(config, outputs)?;
    println!(
        "Dataset: {} participants, {} observations",
        runner.dataset().len(),
        runner.dataset().observation_count()
    );

    if cli.validate_only {
        println!("Validation-only mode: evaluation skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Evaluation complete for '{run_id}': {} participants → {} rows at {}",
        summary.participants,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for skip in &summary.skipped {
        println!(
            "  skipped {} for participant {}: {}",
            skip.model, skip.participant, skip.reason
        );
    }
    for model in &summary.analytics.models {
        println!(
            "  {:<20} accuracy {:.3}  MAE {:.3}",
            model.name, model.accuracy, model.mean_abs_rating_error
        );
    }
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
