//! Belief-bias adjustments that map a verdict plus conclusion believability
//! to a 1-6 confidence rating.

use crate::method::UnknownName;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use syllogism_core::logic::Verdict;

/// Ratings above this are treated as acceptance.
pub const ACCEPT_ABOVE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefAdjustment {
    /// Content is ignored; only necessity matters.
    #[default]
    NoBelief,
    /// Reasoners read "necessary" as "possible" and let belief break ties.
    MisinterpretedNecessity,
    /// Believable conclusions are waved through; unbelievable ones get
    /// checked more carefully.
    SelectiveScrutiny,
}

impl BeliefAdjustment {
    pub const ALL: [BeliefAdjustment; 3] = [
        BeliefAdjustment::NoBelief,
        BeliefAdjustment::MisinterpretedNecessity,
        BeliefAdjustment::SelectiveScrutiny,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            BeliefAdjustment::NoBelief => "no_belief",
            BeliefAdjustment::MisinterpretedNecessity => "misinterpreted_necessity",
            BeliefAdjustment::SelectiveScrutiny => "selective_scrutiny",
        }
    }

    pub fn rating(self, verdict: Verdict, believable: bool) -> u8 {
        let Verdict {
            possible,
            necessary,
        } = verdict;
        assert!(
            possible || !necessary,
            "invariant violation: verdict is necessary but not possible"
        );
        match self {
            BeliefAdjustment::NoBelief => {
                if necessary {
                    5
                } else {
                    2
                }
            }
            BeliefAdjustment::MisinterpretedNecessity => match (possible, necessary, believable) {
                (false, _, false) => 1,
                (false, _, true) => 2,
                (true, false, false) => 3,
                (true, false, true) => 4,
                (true, true, false) => 5,
                (true, true, true) => 6,
            },
            BeliefAdjustment::SelectiveScrutiny => match (believable, necessary, possible) {
                (true, true, _) => 6,
                (true, false, _) => 4,
                (false, true, _) => 5,
                (false, false, true) => 2,
                (false, false, false) => 1,
            },
        }
    }

    pub fn accepts(self, verdict: Verdict, believable: bool) -> bool {
        match self {
            BeliefAdjustment::NoBelief => verdict.necessary,
            _ => self.rating(verdict, believable) > ACCEPT_ABOVE,
        }
    }
}

impl FromStr for BeliefAdjustment {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "no_belief" | "none" => Ok(BeliefAdjustment::NoBelief),
            "misinterpreted_necessity" | "mn" => Ok(BeliefAdjustment::MisinterpretedNecessity),
            "selective_scrutiny" | "ss" => Ok(BeliefAdjustment::SelectiveScrutiny),
            _ => Err(UnknownName::new("belief adjustment", value)),
        }
    }
}

impl fmt::Display for BeliefAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMPOSSIBLE: Verdict = Verdict::IMPOSSIBLE;
    const POSSIBLE: Verdict = Verdict {
        possible: true,
        necessary: false,
    };
    const NECESSARY: Verdict = Verdict {
        possible: true,
        necessary: true,
    };

    #[test]
    fn no_belief_ignores_content() {
        let model = BeliefAdjustment::NoBelief;
        for believable in [true, false] {
            assert_eq!(model.rating(NECESSARY, believable), 5);
            assert_eq!(model.rating(POSSIBLE, believable), 2);
            assert!(model.accepts(NECESSARY, believable));
            assert!(!model.accepts(POSSIBLE, believable));
        }
    }

    #[test]
    fn misinterpreted_necessity_ladder() {
        let model = BeliefAdjustment::MisinterpretedNecessity;
        assert_eq!(model.rating(IMPOSSIBLE, false), 1);
        assert_eq!(model.rating(IMPOSSIBLE, true), 2);
        assert_eq!(model.rating(POSSIBLE, false), 3);
        assert_eq!(model.rating(POSSIBLE, true), 4);
        assert_eq!(model.rating(NECESSARY, false), 5);
        assert_eq!(model.rating(NECESSARY, true), 6);
        assert!(model.accepts(POSSIBLE, true));
        assert!(!model.accepts(POSSIBLE, false));
    }

    #[test]
    fn selective_scrutiny_only_checks_unbelievable() {
        let model = BeliefAdjustment::SelectiveScrutiny;
        assert_eq!(model.rating(IMPOSSIBLE, true), 4);
        assert_eq!(model.rating(NECESSARY, true), 6);
        assert_eq!(model.rating(NECESSARY, false), 5);
        assert_eq!(model.rating(POSSIBLE, false), 2);
        assert_eq!(model.rating(IMPOSSIBLE, false), 1);
        assert!(model.accepts(IMPOSSIBLE, true));
        assert!(!model.accepts(POSSIBLE, false));
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    fn necessary_without_possible_is_rejected() {
        let broken = Verdict {
            possible: false,
            necessary: true,
        };
        BeliefAdjustment::MisinterpretedNecessity.rating(broken, true);
    }

    #[test]
    fn names_round_trip() {
        for belief in BeliefAdjustment::ALL {
            assert_eq!(belief.as_str().parse(), Ok(belief));
        }
        assert_eq!("MN".parse(), Ok(BeliefAdjustment::MisinterpretedNecessity));
        assert!("wishful".parse::<BeliefAdjustment>().is_err());
    }
}
