//! Portfolio model selection: fit every candidate strategy, then keep the
//! (strategy, belief adjustment) pair that best reproduces the training
//! observations.

use crate::belief::BeliefAdjustment;
use crate::method::{EnumerationMethod, FitError, GridLookupMethod, GridTables, HeuristicMethod};
use crate::method::{Method, MethodKind, UnknownName};
use crate::model::ResponseModel;
use crate::task::{Observation, Task};
use crate::training::TrainingCounts;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use syllogism_core::logic::Verdict;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Maximize the number of matching accept/reject responses.
    #[default]
    Agreement,
    /// Minimize the summed absolute rating error.
    RatingError,
}

impl Objective {
    pub const fn as_str(self) -> &'static str {
        match self {
            Objective::Agreement => "agreement",
            Objective::RatingError => "rating_error",
        }
    }
}

impl FromStr for Objective {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "agreement" => Ok(Objective::Agreement),
            "rating_error" | "rating" => Ok(Objective::RatingError),
            _ => Err(UnknownName::new("objective", value)),
        }
    }
}

/// Strategy and belief adjustment retained after `pre_train`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub method: MethodKind,
    pub belief: BeliefAdjustment,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.method, self.belief)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("portfolio needs at least one method and one belief adjustment")]
    NoCandidates,
}

#[derive(Debug, Clone)]
pub struct Portfolio {
    methods: Vec<Method>,
    beliefs: Vec<BeliefAdjustment>,
    objective: Objective,
    method_index: usize,
    belief: BeliefAdjustment,
}

impl Portfolio {
    /// The first method and first belief form the default selection.
    pub fn new(
        methods: Vec<Method>,
        beliefs: Vec<BeliefAdjustment>,
        objective: Objective,
    ) -> Result<Self, SelectorError> {
        let Some(&belief) = beliefs.first() else {
            return Err(SelectorError::NoCandidates);
        };
        if methods.is_empty() {
            return Err(SelectorError::NoCandidates);
        }
        Ok(Self {
            methods,
            beliefs,
            objective,
            method_index: 0,
            belief,
        })
    }

    /// Enumeration, grid lookup (when tables are given) and heuristic,
    /// crossed with every belief adjustment.
    pub fn standard(tables: Option<Arc<GridTables>>, objective: Objective) -> Self {
        let mut methods = vec![Method::from(EnumerationMethod::new())];
        if let Some(tables) = tables {
            methods.push(Method::from(GridLookupMethod::new(tables)));
        }
        methods.push(Method::from(HeuristicMethod::default()));
        Self::with_candidates(methods, BeliefAdjustment::ALL.to_vec(), objective)
    }

    /// Search over belief adjustments only, for one fixed strategy.
    pub fn belief_portfolio(method: Method, objective: Objective) -> Self {
        Self::with_candidates(vec![method], BeliefAdjustment::ALL.to_vec(), objective)
    }

    /// A single strategy with a single belief adjustment; `pre_train` only fits.
    pub fn fixed(method: Method, belief: BeliefAdjustment) -> Self {
        Self::with_candidates(vec![method], vec![belief], Objective::Agreement)
    }

    fn with_candidates(
        methods: Vec<Method>,
        beliefs: Vec<BeliefAdjustment>,
        objective: Objective,
    ) -> Self {
        let belief = beliefs[0];
        Self {
            methods,
            beliefs,
            objective,
            method_index: 0,
            belief,
        }
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn current(&self) -> Selection {
        Selection {
            method: self.methods[self.method_index].kind(),
            belief: self.belief,
        }
    }

    pub fn fit(&mut self, observations: &[Observation]) -> Result<Selection, FitError> {
        if observations.is_empty() {
            return Err(FitError::InsufficientData {
                strategy: "portfolio",
            });
        }

        let counts = TrainingCounts::from_observations(observations);
        for method in &mut self.methods {
            method.fit(&counts)?;
        }

        let mut best = (0, self.beliefs[0]);
        let mut best_agreement = 0u64;
        let mut best_error = u64::MAX;
        for method_index in 0..self.methods.len() {
            for belief_index in 0..self.beliefs.len() {
                let belief = self.beliefs[belief_index];
                let method = &mut self.methods[method_index];
                let improved = match self.objective {
                    Objective::Agreement => {
                        let score = agreement(method, belief, observations);
                        let improved = score > best_agreement;
                        if improved {
                            best_agreement = score;
                        }
                        improved
                    }
                    Objective::RatingError => {
                        let error = rating_error(method, belief, observations);
                        let improved = error < best_error;
                        if improved {
                            best_error = error;
                        }
                        improved
                    }
                };
                if improved {
                    best = (method_index, belief);
                }
            }
        }
        (self.method_index, self.belief) = best;

        let selection = self.current();
        event!(
            target: "syllogism_models::selector",
            Level::INFO,
            method = selection.method.as_str(),
            belief = selection.belief.as_str(),
            objective = self.objective.as_str(),
            observations = observations.len()
        );
        Ok(selection)
    }

    fn verdict(&mut self, task: &Task) -> Verdict {
        self.methods[self.method_index].evaluate_conclusion(task.conclusion, task.syllogism)
    }
}

fn agreement(method: &mut Method, belief: BeliefAdjustment, observations: &[Observation]) -> u64 {
    observations
        .iter()
        .filter(|obs| {
            let verdict = method.evaluate_conclusion(obs.task.conclusion, obs.task.syllogism);
            belief.accepts(verdict, obs.task.believable) == obs.response
        })
        .count() as u64
}

fn rating_error(method: &mut Method, belief: BeliefAdjustment, observations: &[Observation]) -> u64 {
    observations
        .iter()
        .map(|obs| {
            let verdict = method.evaluate_conclusion(obs.task.conclusion, obs.task.syllogism);
            u64::from(belief.rating(verdict, obs.task.believable).abs_diff(obs.rating))
        })
        .sum()
}

impl ResponseModel for Portfolio {
    fn pre_train(&mut self, observations: &[Observation]) -> Result<(), FitError> {
        self.fit(observations).map(|_| ())
    }

    fn predict(&mut self, task: &Task) -> bool {
        let verdict = self.verdict(task);
        self.belief.accepts(verdict, task.believable)
    }

    fn predict_rating(&mut self, task: &Task) -> u8 {
        let verdict = self.verdict(task);
        self.belief.rating(verdict, task.believable)
    }

    fn selection(&self) -> Option<String> {
        Some(self.current().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(syl: &str, concl: &str, believable: bool, response: bool, rating: u8) -> Observation {
        Observation {
            participant: "p".into(),
            task: Task::new(syl.parse().unwrap(), concl.parse().unwrap(), believable),
            response,
            rating,
        }
    }

    #[test]
    fn rejects_empty_candidate_lists() {
        assert_eq!(
            Portfolio::new(Vec::new(), BeliefAdjustment::ALL.to_vec(), Objective::Agreement)
                .unwrap_err(),
            SelectorError::NoCandidates
        );
        let methods = vec![Method::from(EnumerationMethod::new())];
        assert!(Portfolio::new(methods, Vec::new(), Objective::Agreement).is_err());
    }

    #[test]
    fn logical_responder_keeps_default_selection() {
        let data = vec![
            obs("AA1", "Aac", true, true, 5),
            obs("AA1", "Eac", false, false, 2),
            obs("EE1", "Eac", true, false, 2),
        ];
        let mut portfolio = Portfolio::standard(None, Objective::Agreement);
        let selection = portfolio.fit(&data).unwrap();
        assert_eq!(selection.method, MethodKind::Enumeration);
        assert_eq!(selection.belief, BeliefAdjustment::NoBelief);
    }

    #[test]
    fn belief_driven_responder_selects_belief_adjustment() {
        // Accepts every believable conclusion, even impossible ones, and
        // rejects unbelievable ones that are not necessary.
        let data = vec![
            obs("EE1", "Eac", true, true, 4),
            obs("EE1", "Iac", true, true, 4),
            obs("EE1", "Aac", false, false, 1),
            obs("AA1", "Aac", false, true, 5),
            obs("AA1", "Eac", true, true, 4),
        ];
        let mut portfolio = Portfolio::belief_portfolio(
            Method::from(EnumerationMethod::new()),
            Objective::Agreement,
        );
        let selection = portfolio.fit(&data).unwrap();
        assert_eq!(selection.belief, BeliefAdjustment::SelectiveScrutiny);
        assert!(portfolio.predict(&data[0].task));
        assert_eq!(portfolio.predict_rating(&data[0].task), 4);
    }

    #[test]
    fn rating_objective_minimizes_absolute_error() {
        let data = vec![
            obs("AA1", "Aac", true, true, 6),
            obs("AA1", "Eac", true, false, 2),
            obs("AA1", "Eac", false, false, 1),
        ];
        let mut portfolio = Portfolio::belief_portfolio(
            Method::from(EnumerationMethod::new()),
            Objective::RatingError,
        );
        let selection = portfolio.fit(&data).unwrap();
        assert_eq!(selection.belief, BeliefAdjustment::MisinterpretedNecessity);
        assert_eq!(portfolio.selection().as_deref(), Some("enumeration+misinterpreted_necessity"));
    }

    #[test]
    fn fit_without_observations_fails() {
        let mut portfolio = Portfolio::standard(None, Objective::Agreement);
        assert!(matches!(
            portfolio.pre_train(&[]),
            Err(FitError::InsufficientData { .. })
        ));
    }
}
