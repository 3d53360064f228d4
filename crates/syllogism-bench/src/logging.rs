use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{Level, event};
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{BenchmarkConfig, ResolvedOutputs};

/// Crates whose events land in the telemetry log.
const TARGETS: [&str; 2] = ["syllogism_bench", "syllogism_models"];

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Filter directives restricting `level` to the evaluation crates.
fn directives(level: Level) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={}", level.as_str().to_ascii_lowercase()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Route evaluation events to `<run_id>.telemetry.jsonl` and stamp the run
/// header. Returns `None` when structured logging is off.
pub fn init_logging(
    config: &BenchmarkConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !config.logging.enable_structured {
        return Ok(None);
    }

    let telemetry_path = outputs.telemetry.clone();
    if let Some(dir) = telemetry_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    }
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;
    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = config.logging.level().unwrap_or(Level::INFO);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_writer(writer)
        .finish();

    // An embedding test may already own the global subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);

    let models: Vec<&str> = config.models.iter().map(|m| m.name.as_str()).collect();
    event!(
        target: "syllogism_bench::run",
        Level::INFO,
        run_id = %config.run_id,
        dataset = %config.dataset.path,
        grid_tables = config.grid_tables.as_deref().unwrap_or("none"),
        mode = config.evaluation.mode.as_str(),
        seed = config.evaluation.seed.unwrap_or(0),
        models = ?models,
        "run started"
    );

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}
