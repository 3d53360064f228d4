use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::{BenchmarkConfig, ModelKind};

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("model '{0}' defined in results but missing from configuration")]
    UnknownModel(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// One prediction compared against the observed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionOutcome {
    pub response: bool,
    pub predicted: bool,
    pub rating: u8,
    pub predicted_rating: u8,
}

pub struct AnalyticsCollector {
    models: HashMap<String, ModelAccumulator>,
    model_order: Vec<String>,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        let mut models = HashMap::new();
        let mut order = Vec::new();
        for model in &config.models {
            models.insert(model.name.clone(), ModelAccumulator::new(model.kind));
            order.push(model.name.clone());
        }
        Self {
            models,
            model_order: order,
        }
    }

    fn accumulator(&mut self, model: &str) -> Result<&mut ModelAccumulator, AnalyticsError> {
        self.models
            .get_mut(model)
            .ok_or_else(|| AnalyticsError::UnknownModel(model.to_string()))
    }

    pub fn record_prediction(
        &mut self,
        model: &str,
        outcome: PredictionOutcome,
    ) -> Result<(), AnalyticsError> {
        let acc = self.accumulator(model)?;
        acc.observations += 1;
        acc.participant_total += 1;
        if outcome.predicted == outcome.response {
            acc.correct += 1;
            acc.participant_correct += 1;
        }
        acc.absolute_error += u64::from(outcome.rating.abs_diff(outcome.predicted_rating));
        Ok(())
    }

    /// Close the current participant for `model`, noting its selection.
    pub fn finish_participant(
        &mut self,
        model: &str,
        selection: Option<String>,
    ) -> Result<(), AnalyticsError> {
        let acc = self.accumulator(model)?;
        if acc.participant_total > 0 {
            acc.participant_accuracy
                .push(acc.participant_correct as f64 / acc.participant_total as f64);
        }
        acc.participant_correct = 0;
        acc.participant_total = 0;
        if let Some(selection) = selection {
            *acc.selections.entry(selection).or_default() += 1;
        }
        Ok(())
    }

    pub fn finalize(mut self) -> AnalyticsSummary {
        let models = self
            .model_order
            .iter()
            .filter_map(|name| {
                self.models
                    .remove(name)
                    .map(|acc| acc.into_report(name.clone()))
            })
            .collect();
        AnalyticsSummary { models }
    }
}

struct ModelAccumulator {
    kind: ModelKind,
    observations: usize,
    correct: usize,
    absolute_error: u64,
    participant_correct: usize,
    participant_total: usize,
    participant_accuracy: Vec<f64>,
    selections: BTreeMap<String, usize>,
}

impl ModelAccumulator {
    fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            observations: 0,
            correct: 0,
            absolute_error: 0,
            participant_correct: 0,
            participant_total: 0,
            participant_accuracy: Vec::new(),
            selections: BTreeMap::new(),
        }
    }

    fn into_report(self, name: String) -> ModelReport {
        let (accuracy, mean_abs_error) = if self.observations == 0 {
            (0.0, 0.0)
        } else {
            let n = self.observations as f64;
            (self.correct as f64 / n, self.absolute_error as f64 / n)
        };
        ModelReport {
            name,
            kind: self.kind,
            observations: self.observations,
            participants: self.participant_accuracy.len(),
            accuracy,
            accuracy_ci: confidence_interval(&self.participant_accuracy),
            mean_abs_rating_error: mean_abs_error,
            selections: self.selections,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub name: String,
    pub kind: ModelKind,
    pub observations: usize,
    pub participants: usize,
    pub accuracy: f64,
    /// Interval over per-participant accuracies.
    pub accuracy_ci: (f64, f64),
    pub mean_abs_rating_error: f64,
    pub selections: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub models: Vec<ModelReport>,
}

impl AnalyticsSummary {
    pub fn model(&self, name: &str) -> Option<&ModelReport> {
        self.models.iter().find(|model| model.name == name)
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>, run_id: &str, mode: &str) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str("# Evaluation Summary\n\n");
        rows.push_str(&format!("Run `{run_id}`, mode `{mode}`\n\n"));
        rows.push_str("| Model | Kind | Participants | Observations | Accuracy | 95% CI | MAE (rating) |\n");
        rows.push_str("|-------|------|--------------|--------------|----------|--------|--------------|\n");

        for model in &self.models {
            rows.push_str(&format!(
                "| {name} | {kind:?} | {participants} | {observations} | {acc:.3} | [{ci_low:.3}, {ci_high:.3}] | {mae:.3} |\n",
                name = model.name,
                kind = model.kind,
                participants = model.participants,
                observations = model.observations,
                acc = model.accuracy,
                ci_low = model.accuracy_ci.0,
                ci_high = model.accuracy_ci.1,
                mae = model.mean_abs_rating_error,
            ));
        }

        let selected: Vec<&ModelReport> = self
            .models
            .iter()
            .filter(|model| !model.selections.is_empty())
            .collect();
        if !selected.is_empty() {
            rows.push_str("\n## Selected combinations\n\n");
            rows.push_str("| Model | Selection | Participants |\n");
            rows.push_str("|-------|-----------|--------------|\n");
            for model in selected {
                for (selection, count) in &model.selections {
                    rows.push_str(&format!("| {} | {selection} | {count} |\n", model.name));
                }
            }
        }

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let z = Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0))
        .unwrap_or(1.96);
    let margin = z * std_error;
    (mean - margin, mean + margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_collapses_for_single_point() {
        assert_eq!(confidence_interval(&[]), (0.0, 0.0));
        assert_eq!(confidence_interval(&[0.75]), (0.75, 0.75));
    }

    #[test]
    fn interval_is_symmetric_around_mean() {
        let (low, high) = confidence_interval(&[0.5, 0.7, 0.9]);
        assert!(((low + high) / 2.0 - 0.7).abs() < 1e-9);
        assert!(low < 0.7 && high > 0.7);
        // z for 95% is close to 1.96
        let expected_margin = 1.96 * (0.04f64 / 3.0).sqrt();
        assert!(((high - low) / 2.0 - expected_margin).abs() < 1e-3);
    }
}
