//! Reference baselines that ignore syllogistic structure.

use crate::belief::ACCEPT_ABOVE;
use crate::method::FitError;
use crate::model::ResponseModel;
use crate::task::{Observation, Task};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use syllogism_core::model::{Conclusion, Syllogism};

/// Rating returned for tasks never seen in training.
pub const FALLBACK_RATING: u8 = 3;

/// Uniform accept/reject and uniform 1-6 ratings.
#[derive(Debug, Clone)]
pub struct RandomModel {
    rng: StdRng,
}

impl RandomModel {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ResponseModel for RandomModel {
    fn pre_train(&mut self, _observations: &[Observation]) -> Result<(), FitError> {
        Ok(())
    }

    fn predict(&mut self, _task: &Task) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn predict_rating(&mut self, _task: &Task) -> u8 {
        self.rng.gen_range(1..=6)
    }
}

type TaskKey = (Syllogism, Conclusion);

/// Median observed rating per `(syllogism, conclusion)`.
///
/// A half-way median is rounded by a coin flip. The rating drawn by
/// `predict` is reused by the following `predict_rating` for the same task,
/// so the response and the rating of one observation agree.
#[derive(Debug, Clone)]
pub struct UserMedian {
    /// Medians stored doubled so half-way values stay exact.
    medians: BTreeMap<TaskKey, u16>,
    pending: Option<(TaskKey, u8)>,
    rng: StdRng,
}

impl UserMedian {
    pub fn new(seed: u64) -> Self {
        Self {
            medians: BTreeMap::new(),
            pending: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.medians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medians.is_empty()
    }

    fn draw(&mut self, key: TaskKey) -> u8 {
        let Some(&doubled) = self.medians.get(&key) else {
            return FALLBACK_RATING;
        };
        let floor = (doubled / 2) as u8;
        if doubled % 2 == 1 && self.rng.gen_bool(0.5) {
            floor + 1
        } else {
            floor
        }
    }
}

fn doubled_median(ratings: &mut [u8]) -> u16 {
    ratings.sort_unstable();
    let mid = ratings.len() / 2;
    if ratings.len() % 2 == 1 {
        u16::from(ratings[mid]) * 2
    } else {
        u16::from(ratings[mid - 1]) + u16::from(ratings[mid])
    }
}

impl ResponseModel for UserMedian {
    fn pre_train(&mut self, observations: &[Observation]) -> Result<(), FitError> {
        let mut ratings: BTreeMap<TaskKey, Vec<u8>> = BTreeMap::new();
        for obs in observations {
            ratings
                .entry((obs.task.syllogism, obs.task.conclusion))
                .or_default()
                .push(obs.rating);
        }
        self.medians = ratings
            .into_iter()
            .map(|(key, mut values)| (key, doubled_median(&mut values)))
            .collect();
        self.pending = None;
        Ok(())
    }

    fn predict(&mut self, task: &Task) -> bool {
        let key = (task.syllogism, task.conclusion);
        let rating = self.draw(key);
        self.pending = Some((key, rating));
        rating > ACCEPT_ABOVE
    }

    fn predict_rating(&mut self, task: &Task) -> u8 {
        let key = (task.syllogism, task.conclusion);
        match self.pending.take() {
            Some((pending, rating)) if pending == key => rating,
            _ => self.draw(key),
        }
    }
}
