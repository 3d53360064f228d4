//! Probability-heuristics strategy: min-heuristic conclusion generation with
//! optional p-entailment, and a max-heuristic confidence gate for necessity.

use super::FitError;
use crate::training::TrainingCounts;
use serde::{Deserialize, Serialize};
use syllogism_core::logic::Verdict;
use syllogism_core::model::{Conclusion, Direction, Quantifier, Syllogism, Term};
use tracing::{Level, event};

/// Per-quantifier confidence used by the max-heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfidenceFlags {
    pub all: bool,
    pub some: bool,
    pub no: bool,
    pub some_not: bool,
}

impl ConfidenceFlags {
    /// Combinations searched by [`HeuristicMethod::fit`], in search order.
    pub const GRID: [ConfidenceFlags; 6] = [
        ConfidenceFlags::new(true, true, true, true),
        ConfidenceFlags::new(true, true, true, false),
        ConfidenceFlags::new(true, true, false, true),
        ConfidenceFlags::new(true, true, false, false),
        ConfidenceFlags::new(true, false, false, false),
        ConfidenceFlags::new(false, false, false, false),
    ];

    pub const fn new(all: bool, some: bool, no: bool, some_not: bool) -> Self {
        Self {
            all,
            some,
            no,
            some_not,
        }
    }

    pub const fn for_quantifier(self, quantifier: Quantifier) -> bool {
        match quantifier {
            Quantifier::All => self.all,
            Quantifier::Some => self.some,
            Quantifier::No => self.no,
            Quantifier::SomeNot => self.some_not,
        }
    }
}

impl Default for ConfidenceFlags {
    fn default() -> Self {
        Self::new(true, false, false, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HeuristicParams {
    pub p_entailment: bool,
    pub confidence: ConfidenceFlags,
}

/// Least informative premise quantifier.
fn min_quantifier(syllogism: Syllogism) -> Quantifier {
    let [first, second] = syllogism.quantifiers();
    if second.informativeness() < first.informativeness() {
        second
    } else {
        first
    }
}

/// Most informative premise quantifier.
fn max_quantifier(syllogism: Syllogism) -> Quantifier {
    let [first, second] = syllogism.quantifiers();
    if second.informativeness() > first.informativeness() {
        second
    } else {
        first
    }
}

/// Conclusion directions picked by the attachment heuristic.
///
/// The end term that is the subject of the min-premise becomes the
/// conclusion subject. When that is ambiguous the subjects of both premises
/// are consulted, and when it is still ambiguous both directions are kept.
pub fn attachment(syllogism: Syllogism, quantifier: Quantifier) -> Vec<Direction> {
    let premises = syllogism.premises();
    let end_subjects = |only_min: bool| -> Vec<Term> {
        let mut subjects: Vec<Term> = premises
            .iter()
            .filter(|p| !only_min || p.quantifier == quantifier)
            .map(|p| p.subject)
            .filter(|term| term.is_end_term())
            .collect();
        subjects.sort();
        subjects.dedup();
        subjects
    };

    for only_min in [true, false] {
        if let [subject] = end_subjects(only_min).as_slice() {
            if let Some(direction) = Direction::with_subject(*subject) {
                return vec![direction];
            }
        }
    }
    Direction::ALL.to_vec()
}

/// Candidate conclusions from the min-heuristic, optionally extended by the
/// p-entailment of the min conclusion.
pub fn generate_conclusions(syllogism: Syllogism, p_entailment: bool) -> Vec<Conclusion> {
    let quantifier = min_quantifier(syllogism);
    let directions = attachment(syllogism, quantifier);

    let mut conclusions: Vec<Conclusion> = directions
        .iter()
        .map(|direction| Conclusion::new(quantifier, *direction))
        .collect();
    if p_entailment {
        let entailed = quantifier.p_entailment();
        conclusions.extend(
            directions
                .iter()
                .map(|direction| Conclusion::new(entailed, *direction)),
        );
    }
    conclusions
}

/// Whether the reasoner is confident in the max-premise's quantifier.
pub fn max_heuristic(syllogism: Syllogism, confidence: ConfidenceFlags) -> bool {
    confidence.for_quantifier(max_quantifier(syllogism))
}

#[derive(Debug, Clone, Default)]
pub struct HeuristicMethod {
    params: HeuristicParams,
}

impl HeuristicMethod {
    pub fn new(params: HeuristicParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> HeuristicParams {
        self.params
    }

    /// Searches p-entailment (on, then off) × [`ConfidenceFlags::GRID`],
    /// scoring with [`TrainingCounts::agreement_counts`].
    pub fn fit(&mut self, counts: &TrainingCounts) -> Result<(), FitError> {
        if counts.is_empty() {
            return Err(FitError::InsufficientData {
                strategy: "heuristic",
            });
        }

        let mut best = self.params;
        let mut best_score = f64::NEG_INFINITY;
        for p_entailment in [true, false] {
            for confidence in ConfidenceFlags::GRID {
                let params = HeuristicParams {
                    p_entailment,
                    confidence,
                };
                let score = counts.agreement_counts(|syllogism, conclusion| {
                    verdict_for(params, conclusion, syllogism).necessary
                });
                if score > best_score {
                    best_score = score;
                    best = params;
                }
            }
        }
        self.params = best;

        event!(
            target: "syllogism_models::fit",
            Level::DEBUG,
            strategy = "heuristic",
            p_entailment = best.p_entailment,
            confidence = ?best.confidence,
            score = best_score
        );
        Ok(())
    }

    pub fn evaluate_conclusion(&self, conclusion: Conclusion, syllogism: Syllogism) -> Verdict {
        verdict_for(self.params, conclusion, syllogism)
    }
}

fn verdict_for(params: HeuristicParams, conclusion: Conclusion, syllogism: Syllogism) -> Verdict {
    if !generate_conclusions(syllogism, params.p_entailment).contains(&conclusion) {
        return Verdict::IMPOSSIBLE;
    }
    Verdict::new(true, max_heuristic(syllogism, params.confidence))
}
