use super::premise::{RequiredCondition, translate};
use super::region::{Region, RegionSet};
use crate::model::syllogism::Syllogism;
use crate::model::term::Term;
use core::fmt;

/// One admissible state of affairs: the set of populated regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct World(RegionSet);

impl World {
    pub const fn new(regions: RegionSet) -> Self {
        Self(regions)
    }

    pub const fn regions(self) -> RegionSet {
        self.0
    }

    pub const fn len(self) -> usize {
        self.0.len()
    }

    pub const fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    /// Populated regions that contain `term`.
    pub fn regions_with(self, term: Term) -> impl Iterator<Item = Region> {
        self.0.iter().filter(move |region| region.contains(term))
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Combined premise constraints after cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraints {
    conditions: Vec<RequiredCondition>,
    forbidden: RegionSet,
    free: RegionSet,
}

impl Constraints {
    /// Translates both premises, removes forbidden candidates from every
    /// required condition and derives the regions no premise mentions.
    pub fn for_syllogism(syllogism: Syllogism) -> Self {
        let mut conditions = Vec::with_capacity(4);
        let mut forbidden = RegionSet::EMPTY;
        for premise in syllogism.premises() {
            let meaning = translate(premise.quantifier, premise.subject, premise.object);
            conditions.extend(meaning.required);
            forbidden = forbidden.union(meaning.forbidden);
        }

        let mentioned = conditions
            .iter()
            .fold(forbidden, |acc, condition| acc.union(condition.candidates()));
        let free = RegionSet::FULL.difference(mentioned);

        let conditions: Vec<RequiredCondition> = conditions
            .into_iter()
            .map(|condition| condition.clean(forbidden))
            .collect();
        assert!(
            conditions.iter().all(|c| !c.candidates().is_empty()),
            "{syllogism}: a required condition lost every candidate to the forbidden set"
        );

        Self {
            conditions,
            forbidden,
            free,
        }
    }

    pub fn conditions(&self) -> &[RequiredCondition] {
        &self.conditions
    }

    pub fn forbidden(&self) -> RegionSet {
        self.forbidden
    }

    /// Regions neither required nor forbidden by any premise.
    pub fn free(&self) -> RegionSet {
        self.free
    }

    /// Every choice of one candidate per condition, in condition order.
    fn partial_worlds(&self) -> Vec<RegionSet> {
        let mut partials = vec![RegionSet::EMPTY];
        for condition in &self.conditions {
            partials = partials
                .iter()
                .flat_map(|partial| {
                    condition
                        .candidates()
                        .iter()
                        .map(move |region| partial.with(region))
                })
                .collect();
        }
        partials
    }
}

/// Deduplicated, sorted set of worlds for one syllogism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSet {
    worlds: Vec<World>,
}

impl WorldSet {
    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = World> + '_ {
        self.worlds.iter().copied()
    }
}

/// Enumerates every admissible world for `syllogism`.
///
/// Each partial world (one region chosen per required condition) is combined
/// with every subset of the free regions.
pub fn enumerate(syllogism: Syllogism) -> WorldSet {
    let constraints = Constraints::for_syllogism(syllogism);
    let free_subsets: Vec<RegionSet> = constraints.free().subsets().collect();

    let mut worlds: Vec<World> = constraints
        .partial_worlds()
        .into_iter()
        .flat_map(|partial| {
            free_subsets
                .iter()
                .map(move |extra| World::new(partial.union(*extra)))
        })
        .collect();
    worlds.sort_unstable();
    worlds.dedup();

    assert!(
        !worlds.is_empty(),
        "{syllogism}: enumeration produced no admissible world"
    );
    WorldSet { worlds }
}
