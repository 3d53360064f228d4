//! Lookup strategy over externally precomputed verdict tables.

use super::FitError;
use crate::training::TrainingCounts;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use syllogism_core::logic::Verdict;
use syllogism_core::model::conclusion::RESPONSE_COUNT;
use syllogism_core::model::syllogism::SYLLOGISM_COUNT;
use syllogism_core::model::{Conclusion, Syllogism};
use thiserror::Error;
use tracing::{Level, event};

/// Stored values at or above this count as `true`.
const TRUTH_THRESHOLD: f32 = 0.5;

/// Index along the four free-parameter axes of the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub epsilon: usize,
    pub lambda: usize,
    pub omega: usize,
    pub sigma: usize,
}

impl GridPoint {
    pub const fn new(epsilon: usize, lambda: usize, omega: usize, sigma: usize) -> Self {
        Self {
            epsilon,
            lambda,
            omega,
            sigma,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("table shape {0:?} must have 6 addressable axes ending in [64, 9]")]
    Shape(Vec<usize>),
    #[error("parameter axis {axis} is empty")]
    EmptyAxis { axis: usize },
    #[error("{table} table holds {found} values, expected {expected}")]
    Length {
        table: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{table} table contains a non-finite value at offset {offset}")]
    NonFinite { table: &'static str, offset: usize },
    #[error("necessary but not possible at {point:?} for {syllogism} / response {response}")]
    Inconsistent {
        point: GridPoint,
        syllogism: Syllogism,
        response: usize,
    },
}

/// Read-only possibility/necessity tables indexed by
/// `[epsilon, lambda, omega, sigma, syllogism, response]`, row-major.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawGridTables")]
pub struct GridTables {
    axes: [usize; 4],
    possible: Vec<f32>,
    necessary: Vec<f32>,
}

#[derive(Deserialize)]
struct RawGridTables {
    shape: Vec<usize>,
    possible: Vec<f32>,
    necessary: Vec<f32>,
}

impl TryFrom<RawGridTables> for GridTables {
    type Error = GridError;

    fn try_from(raw: RawGridTables) -> Result<Self, Self::Error> {
        let axes = match raw.shape.as_slice() {
            [e, l, o, s, SYLLOGISM_COUNT, RESPONSE_COUNT] => [*e, *l, *o, *s],
            _ => return Err(GridError::Shape(raw.shape)),
        };
        Self::new(axes, raw.possible, raw.necessary)
    }
}

impl GridTables {
    pub fn new(axes: [usize; 4], possible: Vec<f32>, necessary: Vec<f32>) -> Result<Self, GridError> {
        if let Some(axis) = axes.iter().position(|len| *len == 0) {
            return Err(GridError::EmptyAxis { axis });
        }
        let expected = axes
            .iter()
            .chain(&[SYLLOGISM_COUNT, RESPONSE_COUNT])
            .try_fold(1usize, |acc, len| acc.checked_mul(*len))
            .ok_or_else(|| {
                let mut shape = axes.to_vec();
                shape.extend([SYLLOGISM_COUNT, RESPONSE_COUNT]);
                GridError::Shape(shape)
            })?;
        for (table, values) in [("possible", &possible), ("necessary", &necessary)] {
            if values.len() != expected {
                return Err(GridError::Length {
                    table,
                    expected,
                    found: values.len(),
                });
            }
            if let Some(offset) = values.iter().position(|v| !v.is_finite()) {
                return Err(GridError::NonFinite { table, offset });
            }
        }

        let tables = Self {
            axes,
            possible,
            necessary,
        };
        tables.check_consistency()?;
        Ok(tables)
    }

    pub fn axes(&self) -> [usize; 4] {
        self.axes
    }

    /// Every parameter combination, in lexicographic order.
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + '_ {
        let [ne, nl, no, ns] = self.axes;
        (0..ne).flat_map(move |e| {
            (0..nl).flat_map(move |l| {
                (0..no).flat_map(move |o| (0..ns).map(move |s| GridPoint::new(e, l, o, s)))
            })
        })
    }

    pub fn contains(&self, point: GridPoint) -> bool {
        let [ne, nl, no, ns] = self.axes;
        point.epsilon < ne && point.lambda < nl && point.omega < no && point.sigma < ns
    }

    /// Verdict at `point` for response index `response` (see `Response::index`).
    pub fn verdict(&self, point: GridPoint, syllogism: Syllogism, response: usize) -> Verdict {
        let offset = self.offset(point, syllogism.index(), response);
        Verdict::new(
            self.possible[offset] >= TRUTH_THRESHOLD,
            self.necessary[offset] >= TRUTH_THRESHOLD,
        )
    }

    fn offset(&self, point: GridPoint, syllogism: usize, response: usize) -> usize {
        let [_, nl, no, ns] = self.axes;
        let params = ((point.epsilon * nl + point.lambda) * no + point.omega) * ns + point.sigma;
        (params * SYLLOGISM_COUNT + syllogism) * RESPONSE_COUNT + response
    }

    fn check_consistency(&self) -> Result<(), GridError> {
        for point in self.points() {
            for syllogism in Syllogism::all() {
                for response in 0..RESPONSE_COUNT {
                    let offset = self.offset(point, syllogism.index(), response);
                    if self.necessary[offset] >= TRUTH_THRESHOLD
                        && self.possible[offset] < TRUTH_THRESHOLD
                    {
                        return Err(GridError::Inconsistent {
                            point,
                            syllogism,
                            response,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Looks verdicts up at the fitted parameter point.
#[derive(Debug, Clone)]
pub struct GridLookupMethod {
    tables: Arc<GridTables>,
    point: GridPoint,
}

impl GridLookupMethod {
    pub fn new(tables: Arc<GridTables>) -> Self {
        Self {
            tables,
            point: GridPoint::default(),
        }
    }

    pub fn point(&self) -> GridPoint {
        self.point
    }

    /// Exhaustive search over all parameter points; the first point with the
    /// highest agreement wins.
    pub fn fit(&mut self, counts: &TrainingCounts) -> Result<(), FitError> {
        if counts.is_empty() {
            return Err(FitError::InsufficientData {
                strategy: "grid_lookup",
            });
        }

        let mut best = GridPoint::default();
        let mut best_score = f64::NEG_INFINITY;
        for point in self.tables.points() {
            let score = counts.agreement(|syllogism, conclusion| {
                self.tables
                    .verdict(point, syllogism, conclusion.index())
                    .necessary
            });
            if score > best_score {
                best_score = score;
                best = point;
            }
        }
        self.point = best;

        event!(
            target: "syllogism_models::fit",
            Level::DEBUG,
            strategy = "grid_lookup",
            epsilon = best.epsilon,
            lambda = best.lambda,
            omega = best.omega,
            sigma = best.sigma,
            score = best_score
        );
        Ok(())
    }

    pub fn evaluate_conclusion(&self, conclusion: Conclusion, syllogism: Syllogism) -> Verdict {
        self.tables.verdict(self.point, syllogism, conclusion.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELLS: usize = SYLLOGISM_COUNT * RESPONSE_COUNT;

    /// Two points along epsilon: point 0 says nothing is necessary, point 1
    /// says everything is.
    fn two_point_tables() -> GridTables {
        let possible = vec![1.0; 2 * CELLS];
        let mut necessary = vec![0.0; CELLS];
        necessary.extend(vec![1.0; CELLS]);
        GridTables::new([2, 1, 1, 1], possible, necessary).expect("valid tables")
    }

    fn counts(accept: u32, reject: u32) -> TrainingCounts {
        let mut counts = TrainingCounts::new();
        counts.insert("AA1".parse().unwrap(), "Aac".parse().unwrap(), [reject, accept]);
        counts
    }

    #[test]
    fn fit_picks_point_matching_responses() {
        let mut method = GridLookupMethod::new(Arc::new(two_point_tables()));
        method.fit(&counts(9, 1)).unwrap();
        assert_eq!(method.point(), GridPoint::new(1, 0, 0, 0));
        assert!(method
            .evaluate_conclusion("Aac".parse().unwrap(), "AA1".parse().unwrap())
            .necessary);

        method.fit(&counts(1, 9)).unwrap();
        assert_eq!(method.point(), GridPoint::default());
    }

    #[test]
    fn ties_keep_the_first_point() {
        let mut method = GridLookupMethod::new(Arc::new(two_point_tables()));
        method.fit(&counts(5, 5)).unwrap();
        assert_eq!(method.point(), GridPoint::default());
    }

    #[test]
    fn fit_requires_data() {
        let mut method = GridLookupMethod::new(Arc::new(two_point_tables()));
        assert_eq!(
            method.fit(&TrainingCounts::new()),
            Err(FitError::InsufficientData {
                strategy: "grid_lookup"
            })
        );
    }

    #[test]
    fn rejects_inconsistent_tables() {
        let possible = vec![0.0; CELLS];
        let mut necessary = vec![0.0; CELLS];
        necessary[RESPONSE_COUNT + 2] = 1.0;
        let err = GridTables::new([1, 1, 1, 1], possible, necessary).unwrap_err();
        assert_eq!(
            err,
            GridError::Inconsistent {
                point: GridPoint::default(),
                syllogism: "AA2".parse().unwrap(),
                response: 2,
            }
        );
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!(
            GridTables::new([1, 0, 1, 1], vec![], vec![]).unwrap_err(),
            GridError::EmptyAxis { axis: 1 }
        );
        assert!(matches!(
            GridTables::new([1, 1, 1, 1], vec![0.0; 3], vec![0.0; CELLS]),
            Err(GridError::Length { table: "possible", .. })
        ));
        let json = r#"{"shape": [1, 1, 1, 1, 64, 8], "possible": [], "necessary": []}"#;
        assert!(serde_json::from_str::<GridTables>(json).is_err());
    }

    #[test]
    fn oversized_shape_is_a_shape_error() {
        let huge = usize::MAX / 2;
        assert!(matches!(
            GridTables::new([huge, huge, 1, 1], vec![], vec![]),
            Err(GridError::Shape(shape)) if shape[0] == huge
        ));
        let json = format!(
            r#"{{"shape": [{huge}, 3, 1, 1, 64, 9], "possible": [], "necessary": []}}"#
        );
        assert!(serde_json::from_str::<GridTables>(&json).is_err());
    }

    #[test]
    fn deserializes_from_flat_json() {
        let values = vec!["0.0"; CELLS].join(",");
        let json = format!(
            r#"{{"shape": [1, 1, 1, 1, 64, 9], "possible": [{values}], "necessary": [{values}]}}"#
        );
        let tables: GridTables = serde_json::from_str(&json).expect("valid tables");
        assert_eq!(tables.axes(), [1, 1, 1, 1]);
        assert_eq!(tables.points().count(), 1);
    }

    #[test]
    fn points_enumerate_lexicographically() {
        let tables =
            GridTables::new([2, 1, 1, 2], vec![0.0; 4 * CELLS], vec![0.0; 4 * CELLS]).unwrap();
        let points: Vec<GridPoint> = tables.points().collect();
        assert_eq!(
            points,
            vec![
                GridPoint::new(0, 0, 0, 0),
                GridPoint::new(0, 0, 0, 1),
                GridPoint::new(1, 0, 0, 0),
                GridPoint::new(1, 0, 0, 1),
            ]
        );
        assert!(tables.contains(GridPoint::new(1, 0, 0, 1)));
        assert!(!tables.contains(GridPoint::new(2, 0, 0, 0)));
    }
}
