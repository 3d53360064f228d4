use crate::cache::EvaluationCache;
use crate::training::TrainingCounts;
use syllogism_core::logic::{self, Verdict};
use syllogism_core::model::{Conclusion, Syllogism};

/// Parameter-free possible-worlds evaluator with a per-instance cache.
#[derive(Debug, Clone, Default)]
pub struct EnumerationMethod {
    cache: EvaluationCache,
    enumerations: usize,
}

impl EnumerationMethod {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing to fit.
    pub fn fit(&mut self, _counts: &TrainingCounts) {}

    pub fn evaluate_conclusion(&mut self, conclusion: Conclusion, syllogism: Syllogism) -> Verdict {
        if let Some(verdict) = self.cache.get(conclusion, syllogism) {
            return verdict;
        }
        self.enumerations += 1;
        let verdict = logic::evaluate_conclusion(conclusion, syllogism);
        self.cache.insert(conclusion, syllogism, verdict);
        verdict
    }

    /// How many times the world set has been enumerated (cache misses).
    pub fn enumerations(&self) -> usize {
        self.enumerations
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }
}
