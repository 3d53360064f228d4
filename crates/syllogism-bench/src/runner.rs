use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use syllogism_core::model::{Conclusion, Syllogism};
use syllogism_models::{
    BeliefAdjustment, EnumerationMethod, FitError, GridLookupMethod, GridTables, HeuristicMethod,
    Method, MethodKind, Objective, Portfolio, RandomModel, ResponseModel, UserMedian,
};
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError, AnalyticsSummary, PredictionOutcome};
use crate::config::{
    BenchmarkConfig, EvaluationMode, ModelConfig, ModelSpec, ResolvedOutputs, ValidationError,
};
use crate::dataset::{Dataset, DatasetError, load_grid_tables};

/// Fits every configured model per participant and logs its predictions.
pub struct EvaluationRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    dataset: Dataset,
    tables: Option<Arc<GridTables>>,
    models: Vec<ModelBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub participants: usize,
    pub observations: usize,
    pub rows_written: usize,
    /// Model fits skipped for lack of training data.
    pub skipped: Vec<SkippedFit>,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
    pub analytics: AnalyticsSummary,
}

/// A model left unevaluated for one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFit {
    pub model: String,
    pub participant: String,
    pub reason: FitError,
}

impl EvaluationRunner {
    /// Load the dataset and grid tables named by a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let dataset = Dataset::from_path(&config.dataset.path)?;
        let tables = match config.grid_tables.as_ref() {
            Some(path) => Some(Arc::new(load_grid_tables(path)?)),
            None => None,
        };
        let models = ModelBlueprint::from_configs(&config.models, tables.as_ref())?;

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            dataset,
            tables,
            models,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Execute the evaluation, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.evaluation.seed.unwrap_or(0));
        let mode = self.config.evaluation.mode;
        let mut analytics = AnalyticsCollector::new(&self.config);
        let mut rows_written = 0usize;
        let mut skipped = Vec::new();

        for (index, participant) in self.dataset.participants().iter().enumerate() {
            let started = Instant::now();
            let model_seed = rng.next_u64();
            let training = match mode {
                EvaluationMode::Coverage => participant.observations.clone(),
                EvaluationMode::LeaveOneOut => self.dataset.others(index),
            };

            for blueprint in &self.models {
                let mut model = blueprint.spawn_model(model_seed, self.tables.clone());
                if let Err(reason) = model.pre_train(&training) {
                    event!(
                        target: "syllogism_bench::run",
                        Level::WARN,
                        model = %blueprint.name,
                        participant = %participant.id,
                        training = training.len(),
                        reason = %reason,
                        "fit skipped"
                    );
                    skipped.push(SkippedFit {
                        model: blueprint.name.clone(),
                        participant: participant.id.clone(),
                        reason,
                    });
                    continue;
                }
                let selection = model.selection();

                for obs in &participant.observations {
                    let predicted = model.predict(&obs.task);
                    let predicted_rating = model.predict_rating(&obs.task);
                    let row = PredictionRow {
                        run_id: &self.config.run_id,
                        mode: mode.as_str(),
                        model: &blueprint.name,
                        participant: &participant.id,
                        task: obs.task.syllogism,
                        conclusion: obs.task.conclusion,
                        believable: obs.task.believable,
                        response: obs.response,
                        predicted,
                        rating: obs.rating,
                        predicted_rating,
                        selection: selection.as_deref(),
                    };
                    serde_json::to_writer(&mut writer, &row)?;
                    writer.write_all(b"\n")?;
                    rows_written += 1;

                    analytics.record_prediction(
                        &blueprint.name,
                        PredictionOutcome {
                            response: obs.response,
                            predicted,
                            rating: obs.rating,
                            predicted_rating,
                        },
                    )?;
                }
                analytics.finish_participant(&blueprint.name, selection)?;
            }

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "syllogism_bench::run",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    participant = %participant.id,
                    observations = participant.observations.len(),
                    training = training.len(),
                    elapsed_ms = started.elapsed().as_secs_f64() * 1000.0
                );
            }
        }

        writer.flush()?;

        let summary = analytics.finalize();
        summary.write_markdown(&self.outputs.summary_md, &self.config.run_id, mode.as_str())?;

        event!(
            target: "syllogism_bench::run",
            Level::INFO,
            run_id = %self.config.run_id,
            mode = mode.as_str(),
            participants = self.dataset.len(),
            rows = rows_written,
            skipped = skipped.len()
        );

        let telemetry_path = self.logging_enabled.then(|| self.outputs.telemetry.clone());

        Ok(RunSummary {
            participants: self.dataset.len(),
            observations: self.dataset.observation_count(),
            rows_written,
            skipped,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
            analytics: summary,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct PredictionRow<'a> {
    run_id: &'a str,
    mode: &'static str,
    model: &'a str,
    participant: &'a str,
    task: Syllogism,
    conclusion: Conclusion,
    believable: bool,
    response: bool,
    predicted: bool,
    rating: u8,
    predicted_rating: u8,
    selection: Option<&'a str>,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize prediction row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),
    #[error("{0}")]
    Config(#[from] ValidationError),
    #[error("model '{model}' requires grid tables but none were loaded")]
    MissingGridTables { model: String },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

struct ModelBlueprint {
    name: String,
    implementation: ModelImplementation,
}

enum ModelImplementation {
    Portfolio { objective: Objective },
    BeliefPortfolio { method: Method, objective: Objective },
    Single { method: Method, belief: BeliefAdjustment },
    Random,
    UserMedian,
}

impl ModelBlueprint {
    fn from_configs(
        configs: &[ModelConfig],
        tables: Option<&Arc<GridTables>>,
    ) -> Result<Vec<Self>, RunnerError> {
        configs
            .iter()
            .map(|config| Self::from_config(config, tables))
            .collect()
    }

    fn from_config(config: &ModelConfig, tables: Option<&Arc<GridTables>>) -> Result<Self, RunnerError> {
        let method = |kind: MethodKind| -> Result<Method, RunnerError> {
            let method = match kind {
                MethodKind::Enumeration => Method::from(EnumerationMethod::new()),
                MethodKind::GridLookup => {
                    let tables = tables.ok_or_else(|| RunnerError::MissingGridTables {
                        model: config.name.clone(),
                    })?;
                    Method::from(GridLookupMethod::new(Arc::clone(tables)))
                }
                MethodKind::Heuristic => Method::from(HeuristicMethod::default()),
            };
            Ok(method)
        };

        let implementation = match config.spec()? {
            ModelSpec::Portfolio { objective } => ModelImplementation::Portfolio { objective },
            ModelSpec::BeliefPortfolio { method: kind, objective } => {
                ModelImplementation::BeliefPortfolio {
                    method: method(kind)?,
                    objective,
                }
            }
            ModelSpec::Single { method: kind, belief } => ModelImplementation::Single {
                method: method(kind)?,
                belief,
            },
            ModelSpec::Random => ModelImplementation::Random,
            ModelSpec::UserMedian => ModelImplementation::UserMedian,
        };

        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    /// A fresh, unfitted model with its own evaluation cache.
    fn spawn_model(&self, seed: u64, tables: Option<Arc<GridTables>>) -> Box<dyn ResponseModel> {
        match &self.implementation {
            ModelImplementation::Portfolio { objective } => {
                Box::new(Portfolio::standard(tables, *objective))
            }
            ModelImplementation::BeliefPortfolio { method, objective } => {
                Box::new(Portfolio::belief_portfolio(method.clone(), *objective))
            }
            ModelImplementation::Single { method, belief } => {
                Box::new(Portfolio::fixed(method.clone(), *belief))
            }
            ModelImplementation::Random => Box::new(RandomModel::new(seed)),
            ModelImplementation::UserMedian => Box::new(UserMedian::new(seed)),
        }
    }
}
