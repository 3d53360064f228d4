use serde::{Deserialize, Serialize};
use syllogism_core::model::{Conclusion, Syllogism};

/// A verification item: is `conclusion` accepted given `syllogism`?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    pub syllogism: Syllogism,
    pub conclusion: Conclusion,
    /// Whether the conclusion's content is believable.
    pub believable: bool,
}

impl Task {
    pub const fn new(syllogism: Syllogism, conclusion: Conclusion, believable: bool) -> Self {
        Self {
            syllogism,
            conclusion,
            believable,
        }
    }
}

/// One participant's answer to a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub participant: String,
    pub task: Task,
    /// Accepted the conclusion.
    pub response: bool,
    /// Confidence rating on a 1-6 scale.
    pub rating: u8,
}
