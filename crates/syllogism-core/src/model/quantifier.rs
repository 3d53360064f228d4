use core::fmt;

/// Classical quantifiers, in the canonical `A, I, E, O` order used by every
/// index in the encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Quantifier {
    /// "All S are P"
    All = 0,
    /// "Some S are P"
    Some = 1,
    /// "No S are P"
    No = 2,
    /// "Some S are not P"
    SomeNot = 3,
}

impl Quantifier {
    pub const ALL: [Quantifier; 4] = [
        Quantifier::All,
        Quantifier::Some,
        Quantifier::No,
        Quantifier::SomeNot,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Quantifier::All),
            1 => Some(Quantifier::Some),
            2 => Some(Quantifier::No),
            3 => Some(Quantifier::SomeNot),
            _ => None,
        }
    }

    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(Quantifier::All),
            'I' => Some(Quantifier::Some),
            'E' => Some(Quantifier::No),
            'O' => Some(Quantifier::SomeNot),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn letter(self) -> char {
        match self {
            Quantifier::All => 'A',
            Quantifier::Some => 'I',
            Quantifier::No => 'E',
            Quantifier::SomeNot => 'O',
        }
    }

    /// Informativeness rank, `A > I > E > O`. Higher is more informative.
    pub const fn informativeness(self) -> u8 {
        match self {
            Quantifier::All => 3,
            Quantifier::Some => 2,
            Quantifier::No => 1,
            Quantifier::SomeNot => 0,
        }
    }

    /// Quantifier probabilistically entailed by this one.
    pub const fn p_entailment(self) -> Quantifier {
        match self {
            Quantifier::All => Quantifier::Some,
            Quantifier::Some => Quantifier::SomeNot,
            Quantifier::No => Quantifier::SomeNot,
            Quantifier::SomeNot => Quantifier::Some,
        }
    }

    pub const fn is_universal(self) -> bool {
        matches!(self, Quantifier::All | Quantifier::No)
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
