use super::term::Term;
use core::fmt;

/// The four canonical layouts of the middle term across both premises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Figure {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Figure {
    pub const ALL: [Figure; 4] = [Figure::One, Figure::Two, Figure::Three, Figure::Four];

    pub const fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Figure::One),
            '2' => Some(Figure::Two),
            '3' => Some(Figure::Three),
            '4' => Some(Figure::Four),
            _ => None,
        }
    }

    pub const fn digit(self) -> char {
        match self {
            Figure::One => '1',
            Figure::Two => '2',
            Figure::Three => '3',
            Figure::Four => '4',
        }
    }

    /// Zero-based position in [`Figure::ALL`].
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// `(subject, object)` of the first and second premise.
    pub const fn premise_terms(self) -> [(Term, Term); 2] {
        match self {
            Figure::One => [(Term::A, Term::B), (Term::B, Term::C)],
            Figure::Two => [(Term::B, Term::A), (Term::C, Term::B)],
            Figure::Three => [(Term::A, Term::B), (Term::C, Term::B)],
            Figure::Four => [(Term::B, Term::A), (Term::B, Term::C)],
        }
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digit())
    }
}

#[cfg(test)]
mod tests {
    use super::{Figure, Term};

    #[test]
    fn every_figure_shares_the_middle_term() {
        for figure in Figure::ALL {
            let [(s1, o1), (s2, o2)] = figure.premise_terms();
            assert!(s1 == Term::B || o1 == Term::B, "{figure}");
            assert!(s2 == Term::B || o2 == Term::B, "{figure}");
            assert!(s1 == Term::A || o1 == Term::A, "{figure}");
            assert!(s2 == Term::C || o2 == Term::C, "{figure}");
        }
    }

    #[test]
    fn digits_outside_one_to_four_are_rejected() {
        assert_eq!(Figure::from_digit('0'), None);
        assert_eq!(Figure::from_digit('5'), None);
        assert_eq!(Figure::from_digit('3'), Some(Figure::Three));
    }
}
