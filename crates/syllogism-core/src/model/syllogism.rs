use super::error::EncodingError;
use super::figure::Figure;
use super::quantifier::Quantifier;
use super::term::Term;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of distinct syllogisms (4 quantifiers² × 4 figures).
pub const SYLLOGISM_COUNT: usize = 64;

/// A single quantified statement over two terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Premise {
    pub quantifier: Quantifier,
    pub subject: Term,
    pub object: Term,
}

/// Two premises plus a figure, encoded as e.g. `"AA1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Syllogism {
    first: Quantifier,
    second: Quantifier,
    figure: Figure,
}

impl Syllogism {
    pub const fn new(first: Quantifier, second: Quantifier, figure: Figure) -> Self {
        Self {
            first,
            second,
            figure,
        }
    }

    pub const fn first(self) -> Quantifier {
        self.first
    }

    pub const fn second(self) -> Quantifier {
        self.second
    }

    pub const fn figure(self) -> Figure {
        self.figure
    }

    pub const fn quantifiers(self) -> [Quantifier; 2] {
        [self.first, self.second]
    }

    /// Both premises with subject/object resolved from the figure.
    pub const fn premises(self) -> [Premise; 2] {
        let [(s1, o1), (s2, o2)] = self.figure.premise_terms();
        [
            Premise {
                quantifier: self.first,
                subject: s1,
                object: o1,
            },
            Premise {
                quantifier: self.second,
                subject: s2,
                object: o2,
            },
        ]
    }

    /// Position in the canonical `AA1, AA2, …, OO4` ordering.
    pub const fn index(self) -> usize {
        self.first.index() * 16 + self.second.index() * 4 + self.figure.index()
    }

    pub fn from_index(index: usize) -> Result<Self, EncodingError> {
        if index >= SYLLOGISM_COUNT {
            return Err(EncodingError::SyllogismIndex(index));
        }
        let first = Quantifier::ALL[index / 16];
        let second = Quantifier::ALL[(index / 4) % 4];
        let figure = Figure::ALL[index % 4];
        Ok(Self::new(first, second, figure))
    }

    /// All 64 syllogisms in canonical order.
    pub fn all() -> impl Iterator<Item = Syllogism> {
        Quantifier::ALL.into_iter().flat_map(|first| {
            Quantifier::ALL.into_iter().flat_map(move |second| {
                Figure::ALL
                    .into_iter()
                    .map(move |figure| Syllogism::new(first, second, figure))
            })
        })
    }
}

impl FromStr for Syllogism {
    type Err = EncodingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        let chars: Vec<char> = token.chars().collect();
        let [q1, q2, fig] = chars.as_slice() else {
            return Err(EncodingError::syllogism(token, "expected three characters"));
        };
        let first = Quantifier::from_letter(*q1)
            .ok_or_else(|| EncodingError::syllogism(token, "unknown first quantifier"))?;
        let second = Quantifier::from_letter(*q2)
            .ok_or_else(|| EncodingError::syllogism(token, "unknown second quantifier"))?;
        let figure = Figure::from_digit(*fig)
            .ok_or_else(|| EncodingError::syllogism(token, "figure must be 1-4"))?;
        Ok(Self::new(first, second, figure))
    }
}

impl TryFrom<String> for Syllogism {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Syllogism> for String {
    fn from(value: Syllogism) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Syllogism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.first, self.second, self.figure)
    }
}
