use core::fmt;

/// One of the three terms of a syllogism. `B` is always the middle term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Term {
    A = 0,
    B = 1,
    C = 2,
}

impl Term {
    pub const ALL: [Term; 3] = [Term::A, Term::B, Term::C];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Term::A),
            1 => Some(Term::B),
            2 => Some(Term::C),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit used for this term inside a [`crate::logic::Region`].
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// End terms are the ones that can appear in a conclusion.
    pub const fn is_end_term(self) -> bool {
        !matches!(self, Term::B)
    }

    pub const fn as_char(self) -> char {
        match self {
            Term::A => 'A',
            Term::B => 'B',
            Term::C => 'C',
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::Term;

    #[test]
    fn bits_are_distinct() {
        let bits: Vec<u8> = Term::ALL.iter().map(|t| t.bit()).collect();
        assert_eq!(bits, vec![1, 2, 4]);
    }

    #[test]
    fn only_middle_term_is_not_an_end_term() {
        assert!(Term::A.is_end_term());
        assert!(!Term::B.is_end_term());
        assert!(Term::C.is_end_term());
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Term::from_index(2), Some(Term::C));
        assert_eq!(Term::from_index(3), None);
    }
}
