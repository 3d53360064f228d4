//! Extensional decision procedure over Venn-diagram regions.
//!
//! This module is composed of:
//! - `region`: bitset value types for regions and sets of regions.
//! - `premise`: translation of a premise into required and forbidden regions.
//! - `world`: enumeration of every admissible world for a syllogism.
//! - `check`: truth of a conclusion in a world and aggregation into a verdict.

mod check;
mod premise;
mod region;
mod world;

pub use check::{Verdict, evaluate, evaluate_conclusion, evaluate_syllogism, holds, valid_responses};
pub use premise::{PremiseMeaning, RequiredCondition, translate};
pub use region::{Region, RegionSet};
pub use world::{Constraints, World, WorldSet, enumerate};
