use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use syllogism_models::{BeliefAdjustment, MethodKind, Objective, UnknownName};
use thiserror::Error;
use tracing::Level;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root evaluation configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub grid_tables: Option<String>,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    pub models: Vec<ModelConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.dataset.validate()?;
        if let Some(tables) = self.grid_tables.as_ref() {
            if tables.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "grid_tables".to_string(),
                    message: "path must not be empty when set".to_string(),
                });
            }
        }
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_models(&mut self.models, self.grid_tables.is_some())?;
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let summary_md = resolve_template(&self.run_id, &self.outputs.summary_md);
        let telemetry = summary_md
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
            .join(format!("{}.telemetry.jsonl", self.run_id));
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md,
            telemetry,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatasetConfig {
    pub path: String,
}

impl DatasetConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.path.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "dataset.path".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// How training and test observations are split per participant.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Train on a participant's own responses and predict them.
    #[default]
    Coverage,
    /// Train on every other participant.
    LeaveOneOut,
}

impl EvaluationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationMode::Coverage => "coverage",
            EvaluationMode::LeaveOneOut => "leave_one_out",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub mode: EvaluationMode,
    pub seed: Option<u64>,
}

/// Definition of an evaluated model.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelConfig {
    pub name: String,
    pub kind: ModelKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Portfolio,
    BeliefPortfolio,
    Single,
    Random,
    UserMedian,
}

/// A model definition with its parameters parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSpec {
    Portfolio {
        objective: Objective,
    },
    BeliefPortfolio {
        method: MethodKind,
        objective: Objective,
    },
    Single {
        method: MethodKind,
        belief: BeliefAdjustment,
    },
    Random,
    UserMedian,
}

impl ModelSpec {
    /// Strategy the model is pinned to, if any.
    pub fn method(self) -> Option<MethodKind> {
        match self {
            ModelSpec::BeliefPortfolio { method, .. } | ModelSpec::Single { method, .. } => {
                Some(method)
            }
            _ => None,
        }
    }
}

impl ModelConfig {
    pub fn spec(&self) -> Result<ModelSpec, ValidationError> {
        let spec = match self.kind {
            ModelKind::Portfolio => ModelSpec::Portfolio {
                objective: self.objective()?,
            },
            ModelKind::BeliefPortfolio => ModelSpec::BeliefPortfolio {
                method: self.method()?,
                objective: self.objective()?,
            },
            ModelKind::Single => ModelSpec::Single {
                method: self.method()?,
                belief: self.belief()?,
            },
            ModelKind::Random => ModelSpec::Random,
            ModelKind::UserMedian => ModelSpec::UserMedian,
        };
        Ok(spec)
    }

    fn param(&self, key: &str) -> Result<Option<&str>, ValidationError> {
        if self.params.is_null() {
            return Ok(None);
        }
        let mapping = self
            .params
            .as_mapping()
            .ok_or_else(|| ValidationError::InvalidField {
                field: format!("models[{}].params", self.name),
                message: "expected mapping for model params".to_string(),
            })?;
        let Some(value) = mapping
            .iter()
            .find_map(|(k, value)| (k.as_str() == Some(key)).then_some(value))
        else {
            return Ok(None);
        };
        value
            .as_str()
            .map(Some)
            .ok_or_else(|| self.invalid_param(key, format!("{key} must be a string")))
    }

    fn objective(&self) -> Result<Objective, ValidationError> {
        match self.param("objective")? {
            None => Ok(Objective::default()),
            Some(text) => text
                .parse()
                .map_err(|err: UnknownName| self.invalid_param("objective", err.to_string())),
        }
    }

    fn method(&self) -> Result<MethodKind, ValidationError> {
        match self.param("method")? {
            None => Ok(MethodKind::Enumeration),
            Some(text) => text
                .parse()
                .map_err(|err: UnknownName| self.invalid_param("method", err.to_string())),
        }
    }

    fn belief(&self) -> Result<BeliefAdjustment, ValidationError> {
        match self.param("belief")? {
            None => Ok(BeliefAdjustment::default()),
            Some(text) => text
                .parse()
                .map_err(|err: UnknownName| self.invalid_param("belief", err.to_string())),
        }
    }

    fn invalid_param(&self, key: &str, message: String) -> ValidationError {
        ValidationError::InvalidField {
            field: format!("models[{}].params.{key}", self.name),
            message,
        }
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_models(models: &mut [ModelConfig], has_grid_tables: bool) -> Result<(), ValidationError> {
    if models.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "models".to_string(),
            message: "at least one model must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for model in models.iter_mut() {
        if model.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "models.name".to_string(),
                message: "model name must not be empty".to_string(),
            });
        }

        if !model.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("models[{}].name", model.name),
                message: "model name contains invalid characters".to_string(),
            });
        }

        if !seen.insert(model.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "models".to_string(),
                message: format!("model name '{}' defined more than once", model.name),
            });
        }

        if model.params.is_null() {
            model.params = serde_yaml::Value::Mapping(Default::default());
        }

        let spec = model.spec()?;
        if spec.method() == Some(MethodKind::GridLookup) && !has_grid_tables {
            return Err(ValidationError::InvalidField {
                field: format!("models[{}].params.method", model.name),
                message: "grid_lookup requires grid_tables to be configured".to_string(),
            });
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
    /// Structured log, written only when `logging.enable_structured` is set.
    pub telemetry: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "trippas_coverage"
dataset:
  path: "data/trippas2018.jsonl"
evaluation:
  mode: coverage
  seed: 7
models:
  - name: "portfolio"
    kind: "portfolio"
    params:
      objective: "agreement"
  - name: "fol_mn"
    kind: "single"
    params:
      method: "enumeration"
      belief: "misinterpreted_necessity"
  - name: "median"
    kind: "user_median"
outputs:
  jsonl: "out/{run_id}/predictions.jsonl"
  summary_md: "out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.evaluation.mode, EvaluationMode::Coverage);
        assert_eq!(cfg.evaluation.seed, Some(7));
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("out/trippas_coverage/predictions.jsonl")
        );
        assert_eq!(
            outputs.telemetry,
            PathBuf::from("out/trippas_coverage/trippas_coverage.telemetry.jsonl")
        );
        assert_eq!(
            cfg.models[1].spec().expect("spec"),
            ModelSpec::Single {
                method: MethodKind::Enumeration,
                belief: BeliefAdjustment::MisinterpretedNecessity,
            }
        );
        assert!(cfg.models[2].params.is_mapping());
    }

    #[test]
    fn evaluation_block_is_optional() {
        let yaml = BASIC_YAML.replace("evaluation:\n  mode: coverage\n  seed: 7\n", "");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.evaluation, EvaluationConfig::default());
    }

    #[test]
    fn rejects_duplicate_models() {
        let yaml = BASIC_YAML.replace("name: \"median\"", "name: \"portfolio\"");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("duplicate models should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "models"
        ));
    }

    #[test]
    fn rejects_unknown_belief() {
        let yaml = BASIC_YAML.replace("misinterpreted_necessity", "wishful_thinking");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("unknown belief");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "models[fol_mn].params.belief"
        ));
    }

    #[test]
    fn grid_lookup_requires_tables() {
        let yaml = BASIC_YAML.replace("method: \"enumeration\"", "method: \"grid_lookup\"");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        assert!(cfg.validate().is_err());

        let yaml = format!("grid_tables: \"data/grid.json\"\n{yaml}");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("tables configured");
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("trippas_coverage", "trippas coverage");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn rejects_empty_model_list() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse");
        cfg.models.clear();
        assert!(cfg.validate().is_err());
    }
}
