//! Per-instance memo of enumeration verdicts.

use std::collections::HashMap;
use syllogism_core::logic::Verdict;
use syllogism_core::model::{Conclusion, Syllogism};

/// Append-only map from `(conclusion, syllogism)` to its verdict.
///
/// Owned by one evaluator and never shared; there is no eviction, so an
/// entry once written is returned unchanged for the life of the cache.
#[derive(Debug, Clone, Default)]
pub struct EvaluationCache {
    entries: HashMap<(Conclusion, Syllogism), Verdict>,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, conclusion: Conclusion, syllogism: Syllogism) -> Option<Verdict> {
        self.entries.get(&(conclusion, syllogism)).copied()
    }

    pub fn insert(&mut self, conclusion: Conclusion, syllogism: Syllogism, verdict: Verdict) {
        self.entries.entry((conclusion, syllogism)).or_insert(verdict);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
