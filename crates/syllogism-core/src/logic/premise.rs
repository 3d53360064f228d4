use super::region::{Region, RegionSet};
use crate::model::quantifier::Quantifier;
use crate::model::term::Term;

/// Alternative regions, at least one of which must be populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequiredCondition(RegionSet);

impl RequiredCondition {
    pub const fn new(candidates: RegionSet) -> Self {
        Self(candidates)
    }

    pub const fn candidates(self) -> RegionSet {
        self.0
    }

    /// Drops every candidate that is forbidden.
    pub const fn clean(self, forbidden: RegionSet) -> Self {
        Self(self.0.difference(forbidden))
    }
}

/// What a single premise says about the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremiseMeaning {
    pub required: Vec<RequiredCondition>,
    pub forbidden: RegionSet,
}

/// Translates `quantifier(subject, object)` into required and forbidden regions.
pub fn translate(quantifier: Quantifier, subject: Term, object: Term) -> PremiseMeaning {
    let both = expansions(&[subject, object], subject, object);
    let subject_only = expansions(&[subject], subject, object);

    match quantifier {
        Quantifier::All => PremiseMeaning {
            required: vec![RequiredCondition::new(both)],
            forbidden: subject_only,
        },
        Quantifier::No => PremiseMeaning {
            required: vec![
                RequiredCondition::new(subject_only),
                RequiredCondition::new(expansions(&[object], subject, object)),
            ],
            forbidden: both,
        },
        Quantifier::Some => PremiseMeaning {
            required: vec![RequiredCondition::new(both)],
            forbidden: RegionSet::EMPTY,
        },
        Quantifier::SomeNot => PremiseMeaning {
            required: vec![RequiredCondition::new(subject_only)],
            forbidden: RegionSet::EMPTY,
        },
    }
}

/// `base` extended by every subset of the terms the premise does not mention.
fn expansions(base: &[Term], subject: Term, object: Term) -> RegionSet {
    let Some(base) = Region::from_terms(base) else {
        return RegionSet::EMPTY;
    };
    let remaining: Vec<Term> = Term::ALL
        .into_iter()
        .filter(|term| *term != subject && *term != object)
        .collect();

    let mut regions = RegionSet::EMPTY;
    for mask in 0..(1usize << remaining.len()) {
        let region = remaining
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << *bit) != 0)
            .fold(base, |region, (_, term)| region.with(*term));
        regions.insert(region);
    }
    regions
}
