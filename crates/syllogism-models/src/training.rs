//! Aggregated verification responses used to fit evaluation strategies.

use crate::task::Observation;
use std::collections::BTreeMap;
use syllogism_core::model::{Conclusion, Syllogism};

/// `[rejections, acceptances]` for one `(syllogism, conclusion)` pair.
pub type ResponseCounts = [u32; 2];

/// Ordered mapping from `(syllogism, conclusion)` to response counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingCounts {
    counts: BTreeMap<(Syllogism, Conclusion), ResponseCounts>,
}

impl TrainingCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_observations<'a, I>(observations: I) -> Self
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut counts = Self::new();
        for obs in observations {
            counts.record(obs.task.syllogism, obs.task.conclusion, obs.response);
        }
        counts
    }

    pub fn record(&mut self, syllogism: Syllogism, conclusion: Conclusion, accepted: bool) {
        let entry = self.counts.entry((syllogism, conclusion)).or_default();
        entry[usize::from(accepted)] += 1;
    }

    pub fn insert(&mut self, syllogism: Syllogism, conclusion: Conclusion, counts: ResponseCounts) {
        self.counts.insert((syllogism, conclusion), counts);
    }

    pub fn get(&self, syllogism: Syllogism, conclusion: Conclusion) -> Option<ResponseCounts> {
        self.counts.get(&(syllogism, conclusion)).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Syllogism, Conclusion, ResponseCounts)> + '_ {
        self.counts
            .iter()
            .map(|(&(syllogism, conclusion), &counts)| (syllogism, conclusion, counts))
    }

    /// Mean share of responses that agree with the predicted necessity.
    ///
    /// Pairs without any response contribute zero. Returns 0.0 when empty.
    pub fn agreement<F>(&self, mut necessary: F) -> f64
    where
        F: FnMut(Syllogism, Conclusion) -> bool,
    {
        if self.counts.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .iter()
            .map(|(syllogism, conclusion, counts)| {
                let responses = counts[0] + counts[1];
                if responses == 0 {
                    return 0.0;
                }
                let agreeing = counts[usize::from(necessary(syllogism, conclusion))];
                f64::from(agreeing) / f64::from(responses)
            })
            .sum();
        total / self.counts.len() as f64
    }

    /// Agreeing responses summed over pairs, divided by the number of pairs.
    ///
    /// Unlike [`TrainingCounts::agreement`], pairs with more responses weigh
    /// more. Returns 0.0 when empty.
    pub fn agreement_counts<F>(&self, mut necessary: F) -> f64
    where
        F: FnMut(Syllogism, Conclusion) -> bool,
    {
        if self.counts.is_empty() {
            return 0.0;
        }
        let agreeing: u64 = self
            .iter()
            .map(|(syllogism, conclusion, counts)| {
                u64::from(counts[usize::from(necessary(syllogism, conclusion))])
            })
            .sum();
        agreeing as f64 / self.counts.len() as f64
    }
}

impl FromIterator<((Syllogism, Conclusion), ResponseCounts)> for TrainingCounts {
    fn from_iter<T: IntoIterator<Item = ((Syllogism, Conclusion), ResponseCounts)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn obs(syl: &str, concl: &str, response: bool) -> Observation {
        Observation {
            participant: "p1".into(),
            task: Task::new(syl.parse().unwrap(), concl.parse().unwrap(), true),
            response,
            rating: if response { 5 } else { 2 },
        }
    }

    #[test]
    fn aggregates_responses_per_pair() {
        let data = vec![
            obs("AA1", "Aac", true),
            obs("AA1", "Aac", true),
            obs("AA1", "Aac", false),
            obs("EE1", "Eac", false),
        ];
        let counts = TrainingCounts::from_observations(&data);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("AA1".parse().unwrap(), "Aac".parse().unwrap()), Some([1, 2]));
        assert_eq!(counts.get("EE1".parse().unwrap(), "Eac".parse().unwrap()), Some([1, 0]));
    }

    #[test]
    fn agreement_is_mean_of_per_pair_shares() {
        let counts: TrainingCounts = [
            (("AA1".parse().unwrap(), "Aac".parse().unwrap()), [1, 3]),
            (("EE1".parse().unwrap(), "Eac".parse().unwrap()), [2, 2]),
            (("II1".parse().unwrap(), "Iac".parse().unwrap()), [0, 0]),
        ]
        .into_iter()
        .collect();
        let always = counts.agreement(|_, _| true);
        assert!((always - (0.75 + 0.5 + 0.0) / 3.0).abs() < 1e-12);
        let never = counts.agreement(|_, _| false);
        assert!((never - (0.25 + 0.5) / 3.0).abs() < 1e-12);
        assert_eq!(TrainingCounts::new().agreement(|_, _| true), 0.0);
    }

    #[test]
    fn agreement_counts_weighs_pairs_by_responses() {
        let counts: TrainingCounts = [
            (("AA1".parse().unwrap(), "Aac".parse().unwrap()), [4, 2]),
            (("II1".parse().unwrap(), "Iac".parse().unwrap()), [0, 1]),
        ]
        .into_iter()
        .collect();
        assert_eq!(counts.agreement_counts(|_, _| false), 2.0);
        assert_eq!(counts.agreement_counts(|_, _| true), 1.5);
        assert_eq!(TrainingCounts::new().agreement_counts(|_, _| true), 0.0);
    }
}
