pub mod baseline;
pub mod belief;
pub mod cache;
pub mod method;
pub mod model;
pub mod selector;
pub mod task;
pub mod training;

pub use baseline::{RandomModel, UserMedian};
pub use belief::BeliefAdjustment;
pub use cache::EvaluationCache;
pub use method::{
    ConfidenceFlags, EnumerationMethod, FitError, GridError, GridLookupMethod, GridPoint,
    GridTables, HeuristicMethod, HeuristicParams, Method, MethodKind, UnknownName,
};
pub use model::ResponseModel;
pub use selector::{Objective, Portfolio, Selection, SelectorError};
pub use task::{Observation, Task};
pub use training::TrainingCounts;
