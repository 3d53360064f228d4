use super::world::{World, WorldSet, enumerate};
use crate::model::conclusion::{Conclusion, Response};
use crate::model::quantifier::Quantifier;
use crate::model::syllogism::Syllogism;
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one conclusion against a syllogism.
///
/// `necessary` always implies `possible`; constructing a verdict that breaks
/// this panics, since it can only come from a defective evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Verdict {
    pub possible: bool,
    pub necessary: bool,
}

impl Verdict {
    pub const IMPOSSIBLE: Verdict = Verdict {
        possible: false,
        necessary: false,
    };

    pub fn new(possible: bool, necessary: bool) -> Self {
        assert!(
            possible || !necessary,
            "invariant violation: verdict is necessary but not possible"
        );
        Self {
            possible,
            necessary,
        }
    }
}

/// Truth of `conclusion` in a single world.
///
/// Every quantifier is false when no populated region contains the subject
/// term, including `Some … are not`.
pub fn holds(conclusion: Conclusion, world: World) -> bool {
    let target = conclusion.object();
    let mut subject_regions = world.regions_with(conclusion.subject()).peekable();
    if subject_regions.peek().is_none() {
        return false;
    }

    match conclusion.quantifier {
        Quantifier::All => subject_regions.all(|region| region.contains(target)),
        Quantifier::No => subject_regions.all(|region| !region.contains(target)),
        Quantifier::Some => subject_regions.any(|region| region.contains(target)),
        Quantifier::SomeNot => subject_regions.any(|region| !region.contains(target)),
    }
}

/// Possible if the conclusion holds in some world, necessary if in all.
pub fn evaluate(conclusion: Conclusion, worlds: &WorldSet) -> Verdict {
    assert!(
        !worlds.is_empty(),
        "cannot evaluate {conclusion} against an empty world set"
    );
    let mut possible = false;
    let mut necessary = true;
    for world in worlds.iter() {
        if holds(conclusion, world) {
            possible = true;
        } else {
            necessary = false;
        }
    }
    Verdict::new(possible, necessary)
}

/// Enumerates the worlds of `syllogism` and evaluates one conclusion.
pub fn evaluate_conclusion(conclusion: Conclusion, syllogism: Syllogism) -> Verdict {
    evaluate(conclusion, &enumerate(syllogism))
}

/// Verdicts for all eight quantified conclusions, enumerating once.
pub fn evaluate_syllogism(syllogism: Syllogism) -> [(Conclusion, Verdict); 8] {
    let worlds = enumerate(syllogism);
    Conclusion::ALL.map(|conclusion| (conclusion, evaluate(conclusion, &worlds)))
}

/// Conclusions that necessarily follow, or `[NVC]` when none does.
pub fn valid_responses(syllogism: Syllogism) -> Vec<Response> {
    let valid: Vec<Response> = evaluate_syllogism(syllogism)
        .into_iter()
        .filter(|(_, verdict)| verdict.necessary)
        .map(|(conclusion, _)| Response::Conclusion(conclusion))
        .collect();
    if valid.is_empty() {
        vec![Response::Nvc]
    } else {
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Region, RegionSet};
    use crate::model::term::Term::{self, A, B, C};

    fn world(regions: &[&[Term]]) -> World {
        World::new(
            regions
                .iter()
                .map(|terms| Region::from_terms(terms).unwrap())
                .collect::<RegionSet>(),
        )
    }

    fn concl(token: &str) -> Conclusion {
        token.parse().unwrap()
    }

    #[test]
    fn empty_subject_makes_every_quantifier_false() {
        let w = world(&[&[B], &[B, C]]);
        for conclusion in Conclusion::ALL.iter().filter(|c| c.subject() == A) {
            assert!(!holds(*conclusion, w), "{conclusion}");
        }
    }

    #[test]
    fn truth_conditions_per_quantifier() {
        let w = world(&[&[A, C], &[A, B]]);
        assert!(!holds(concl("Aac"), w));
        assert!(!holds(concl("Eac"), w));
        assert!(holds(concl("Iac"), w));
        assert!(holds(concl("Oac"), w));

        let w = world(&[&[A, B, C], &[C]]);
        assert!(holds(concl("Aac"), w));
        assert!(holds(concl("Iac"), w));
        assert!(!holds(concl("Oac"), w));
        assert!(holds(concl("Oca"), w));
        assert!(!holds(concl("Aca"), w));
    }

    #[test]
    fn all_premises_yield_necessary_universal() {
        let verdict = evaluate_conclusion(concl("Aac"), "AA1".parse().unwrap());
        assert_eq!(verdict, Verdict::new(true, true));
    }

    #[test]
    fn fourth_figure_all_all_yields_some() {
        let verdict = evaluate_conclusion(concl("Iac"), "AA4".parse().unwrap());
        assert_eq!(verdict, Verdict::new(true, true));
    }

    #[test]
    fn two_negative_premises_have_no_valid_conclusion() {
        let syl: Syllogism = "EE1".parse().unwrap();
        for (conclusion, verdict) in evaluate_syllogism(syl) {
            assert!(!verdict.necessary, "{conclusion}");
        }
        assert_eq!(valid_responses(syl), vec![Response::Nvc]);
    }

    #[test]
    fn necessary_implies_possible_everywhere() {
        for syl in Syllogism::all() {
            for (conclusion, verdict) in evaluate_syllogism(syl) {
                assert!(verdict.possible || !verdict.necessary, "{syl} {conclusion}");
            }
        }
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    fn necessary_without_possible_panics() {
        let _ = Verdict::new(false, true);
    }
}
