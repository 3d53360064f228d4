//! Encoded vocabulary of the classical syllogistic: terms, quantifiers,
//! figures, syllogisms and conclusion candidates.

pub mod conclusion;
pub mod error;
pub mod figure;
pub mod quantifier;
pub mod syllogism;
pub mod term;

pub use conclusion::{Conclusion, Direction, Response};
pub use error::EncodingError;
pub use figure::Figure;
pub use quantifier::Quantifier;
pub use syllogism::{Premise, Syllogism};
pub use term::Term;
