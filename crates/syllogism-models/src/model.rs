use crate::method::FitError;
use crate::task::{Observation, Task};

/// Unified interface for everything that answers verification tasks:
/// fitted portfolios as well as baselines.
pub trait ResponseModel: Send {
    /// Fit to training observations before any prediction.
    fn pre_train(&mut self, observations: &[Observation]) -> Result<(), FitError>;

    /// Accept (`true`) or reject the task's conclusion.
    fn predict(&mut self, task: &Task) -> bool;

    /// Confidence rating on the 1-6 scale.
    fn predict_rating(&mut self, task: &Task) -> u8;

    /// Optional: human-readable label of the configuration chosen by `pre_train`.
    fn selection(&self) -> Option<String> {
        None
    }
}
