use super::error::EncodingError;
use super::quantifier::Quantifier;
use super::term::Term;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of entries in [`Response::ALL`] (8 quantified candidates plus NVC).
pub const RESPONSE_COUNT: usize = 9;

/// Term order of a conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    /// `ac`: subject A, object C.
    Ac,
    /// `ca`: subject C, object A.
    Ca,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Ac, Direction::Ca];

    pub const fn subject(self) -> Term {
        match self {
            Direction::Ac => Term::A,
            Direction::Ca => Term::C,
        }
    }

    pub const fn object(self) -> Term {
        match self {
            Direction::Ac => Term::C,
            Direction::Ca => Term::A,
        }
    }

    /// Direction whose subject is `term`, if `term` is an end term.
    pub const fn with_subject(term: Term) -> Option<Self> {
        match term {
            Term::A => Some(Direction::Ac),
            Term::C => Some(Direction::Ca),
            Term::B => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Ac => "ac",
            Direction::Ca => "ca",
        }
    }
}

impl FromStr for Direction {
    type Err = EncodingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ac" => Ok(Direction::Ac),
            "ca" => Ok(Direction::Ca),
            _ => Err(EncodingError::Direction(value.to_string())),
        }
    }
}

/// A quantified conclusion candidate, encoded as e.g. `"Aac"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Conclusion {
    pub quantifier: Quantifier,
    pub direction: Direction,
}

impl Conclusion {
    /// The eight quantified candidates, in response-index order.
    pub const ALL: [Conclusion; 8] = [
        Conclusion::new(Quantifier::All, Direction::Ac),
        Conclusion::new(Quantifier::All, Direction::Ca),
        Conclusion::new(Quantifier::Some, Direction::Ac),
        Conclusion::new(Quantifier::Some, Direction::Ca),
        Conclusion::new(Quantifier::No, Direction::Ac),
        Conclusion::new(Quantifier::No, Direction::Ca),
        Conclusion::new(Quantifier::SomeNot, Direction::Ac),
        Conclusion::new(Quantifier::SomeNot, Direction::Ca),
    ];

    pub const fn new(quantifier: Quantifier, direction: Direction) -> Self {
        Self {
            quantifier,
            direction,
        }
    }

    pub const fn subject(self) -> Term {
        self.direction.subject()
    }

    pub const fn object(self) -> Term {
        self.direction.object()
    }

    /// Position in [`Response::ALL`].
    pub const fn index(self) -> usize {
        self.quantifier.index() * 2
            + match self.direction {
                Direction::Ac => 0,
                Direction::Ca => 1,
            }
    }
}

impl FromStr for Conclusion {
    type Err = EncodingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        let mut chars = token.chars();
        let quantifier = chars
            .next()
            .and_then(Quantifier::from_letter)
            .ok_or_else(|| EncodingError::conclusion(token, "unknown quantifier"))?;
        let direction: Direction = chars
            .as_str()
            .parse()
            .map_err(|_| EncodingError::conclusion(token, "direction must be 'ac' or 'ca'"))?;
        Ok(Self::new(quantifier, direction))
    }
}

impl TryFrom<String> for Conclusion {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Conclusion> for String {
    fn from(value: Conclusion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quantifier, self.direction.as_str())
    }
}

/// Any response a reasoner may give, including "no valid conclusion".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Response {
    Conclusion(Conclusion),
    Nvc,
}

impl Response {
    pub const ALL: [Response; RESPONSE_COUNT] = [
        Response::Conclusion(Conclusion::ALL[0]),
        Response::Conclusion(Conclusion::ALL[1]),
        Response::Conclusion(Conclusion::ALL[2]),
        Response::Conclusion(Conclusion::ALL[3]),
        Response::Conclusion(Conclusion::ALL[4]),
        Response::Conclusion(Conclusion::ALL[5]),
        Response::Conclusion(Conclusion::ALL[6]),
        Response::Conclusion(Conclusion::ALL[7]),
        Response::Nvc,
    ];

    pub const fn index(self) -> usize {
        match self {
            Response::Conclusion(conclusion) => conclusion.index(),
            Response::Nvc => RESPONSE_COUNT - 1,
        }
    }

    pub const fn conclusion(self) -> Option<Conclusion> {
        match self {
            Response::Conclusion(conclusion) => Some(conclusion),
            Response::Nvc => None,
        }
    }
}

impl FromStr for Response {
    type Err = EncodingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("nvc") {
            return Ok(Response::Nvc);
        }
        raw.parse().map(Response::Conclusion)
    }
}

impl TryFrom<String> for Response {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Response> for String {
    fn from(value: Response) -> Self {
        value.to_string()
    }
}

impl From<Conclusion> for Response {
    fn from(value: Conclusion) -> Self {
        Response::Conclusion(value)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Conclusion(conclusion) => write!(f, "{conclusion}"),
            Response::Nvc => f.write_str("NVC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directions() {
        assert_eq!("ac".parse(), Ok(Direction::Ac));
        assert_eq!("ca".parse(), Ok(Direction::Ca));
        assert_eq!(
            "cb".parse::<Direction>(),
            Err(EncodingError::Direction("cb".to_string()))
        );
    }

    #[test]
    fn parses_conclusion_tokens() {
        let concl: Conclusion = "Oca".parse().unwrap();
        assert_eq!(concl.quantifier, Quantifier::SomeNot);
        assert_eq!(concl.subject(), Term::C);
        assert_eq!(concl.object(), Term::A);
        assert_eq!(concl.to_string(), "Oca");
    }

    #[test]
    fn rejects_unknown_direction_and_quantifier() {
        for bad in ["Aab", "Xac", "A", "AAC", "Aac ac", "NVC"] {
            assert!(bad.parse::<Conclusion>().is_err(), "{bad}");
        }
    }

    #[test]
    fn response_order_matches_indices() {
        let tokens: Vec<String> = Response::ALL.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            tokens,
            vec!["Aac", "Aca", "Iac", "Ica", "Eac", "Eca", "Oac", "Oca", "NVC"]
        );
        for (idx, response) in Response::ALL.iter().enumerate() {
            assert_eq!(response.index(), idx);
        }
    }

    #[test]
    fn nvc_is_only_a_response() {
        assert_eq!("nvc".parse::<Response>(), Ok(Response::Nvc));
        assert_eq!(Response::Nvc.conclusion(), None);
        let aac: Response = "Aac".parse().unwrap();
        assert_eq!(aac.conclusion().map(|c| c.index()), Some(0));
    }
}
