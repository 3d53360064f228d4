//! Interchangeable evaluation strategies behind one capability set:
//! `fit(counts)` and `evaluate_conclusion(conclusion, syllogism)`.

mod enumeration;
mod grid;
mod heuristic;

pub use enumeration::EnumerationMethod;
pub use grid::{GridError, GridLookupMethod, GridPoint, GridTables};
pub use heuristic::{
    ConfidenceFlags, HeuristicMethod, HeuristicParams, attachment, generate_conclusions,
    max_heuristic,
};

use crate::training::TrainingCounts;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use syllogism_core::logic::Verdict;
use syllogism_core::model::{Conclusion, EncodingError, Syllogism};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Enumeration,
    GridLookup,
    Heuristic,
}

impl MethodKind {
    pub const ALL: [MethodKind; 3] = [
        MethodKind::Enumeration,
        MethodKind::GridLookup,
        MethodKind::Heuristic,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            MethodKind::Enumeration => "enumeration",
            MethodKind::GridLookup => "grid_lookup",
            MethodKind::Heuristic => "heuristic",
        }
    }
}

impl FromStr for MethodKind {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "enumeration" | "fol" => Ok(MethodKind::Enumeration),
            "grid_lookup" | "grid" | "mreasoner" => Ok(MethodKind::GridLookup),
            "heuristic" | "phm" => Ok(MethodKind::Heuristic),
            _ => Err(UnknownName::new("method", value)),
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration name that matches no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what} '{name}'")]
pub struct UnknownName {
    pub what: &'static str,
    pub name: String,
}

impl UnknownName {
    pub(crate) fn new(what: &'static str, name: &str) -> Self {
        Self {
            what,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    #[error("cannot fit {strategy} without training data")]
    InsufficientData { strategy: &'static str },
}

/// Closed set of evaluation strategies, dispatched by variant.
#[derive(Debug, Clone)]
pub enum Method {
    Enumeration(EnumerationMethod),
    GridLookup(GridLookupMethod),
    Heuristic(HeuristicMethod),
}

impl Method {
    pub fn kind(&self) -> MethodKind {
        match self {
            Method::Enumeration(_) => MethodKind::Enumeration,
            Method::GridLookup(_) => MethodKind::GridLookup,
            Method::Heuristic(_) => MethodKind::Heuristic,
        }
    }

    pub fn fit(&mut self, counts: &TrainingCounts) -> Result<(), FitError> {
        match self {
            Method::Enumeration(method) => {
                method.fit(counts);
                Ok(())
            }
            Method::GridLookup(method) => method.fit(counts),
            Method::Heuristic(method) => method.fit(counts),
        }
    }

    pub fn evaluate_conclusion(&mut self, conclusion: Conclusion, syllogism: Syllogism) -> Verdict {
        match self {
            Method::Enumeration(method) => method.evaluate_conclusion(conclusion, syllogism),
            Method::GridLookup(method) => method.evaluate_conclusion(conclusion, syllogism),
            Method::Heuristic(method) => method.evaluate_conclusion(conclusion, syllogism),
        }
    }

    /// Same as [`Method::evaluate_conclusion`] for encoded tokens (`"Aac"`, `"AA1"`).
    pub fn evaluate_encoded(
        &mut self,
        conclusion: &str,
        syllogism: &str,
    ) -> Result<Verdict, EncodingError> {
        let conclusion: Conclusion = conclusion.parse()?;
        let syllogism: Syllogism = syllogism.parse()?;
        Ok(self.evaluate_conclusion(conclusion, syllogism))
    }
}

impl From<EnumerationMethod> for Method {
    fn from(value: EnumerationMethod) -> Self {
        Method::Enumeration(value)
    }
}

impl From<GridLookupMethod> for Method {
    fn from(value: GridLookupMethod) -> Self {
        Method::GridLookup(value)
    }
}

impl From<HeuristicMethod> for Method {
    fn from(value: HeuristicMethod) -> Self {
        Method::Heuristic(value)
    }
}
