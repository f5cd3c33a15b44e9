use crate::Error as RollError;


/// Errors raised while evaluating dice notation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParserError {
    /// Wraps a cause with the character offset it occurred at.
    #[error("At position {0} - {1}")]
    AtPosition(usize, Box<ParserError>),

    /// A number did not fit.
    #[error("Invalid number: {0}")]
    Number(#[from] std::num::ParseIntError),

    /// Blank input.
    #[error("Input string is empty")]
    Empty,

    /// Input no token could claim.
    #[error("Unable to parse: {0}")]
    Syntax(String),

    /// Notation must open with a dice token.
    #[error("First argument must be a dice string (3d6 etc), got {0}")]
    InvalidFirstToken(String),

    /// A dice token with a zero count, too few faces, or above the caps.
    #[error("Invalid die: {0}")]
    InvalidDieSpec(String),

    /// Keeping or dropping more rolls than are left.
    #[error("Keep or drop count out of range: {0}")]
    InvalidKeepOrDropCount(String),

    /// A value list naming every distinct face.
    #[error("Match set covers every face of the die: {0}")]
    InvalidMatchSetSize(String),

    /// A roll operation failed.
    #[error("Roll error - {0}")]
    RollError(#[from] Box<RollError>)
}

impl ParserError {
    /// The cause, with any position wrapper removed.
    pub fn err(&self) -> &Self {
        match self {
            ParserError::AtPosition(_, err) => err.as_ref(),
            other => other
        }
    }

    /// Character offset, if known.
    pub fn pos(&self) -> Option<&usize> {
        match self {
            ParserError::AtPosition(position, _) => Some(position),
            _ => None
        }
    }

    /// Attaches a position unless one is already set.
    pub fn at_pos(self, position: usize) -> Self {
        match self {
            ParserError::AtPosition(_, _) => self,
            other => ParserError::AtPosition(position, Box::new(other))
        }
    }
}

impl From<RollError> for ParserError {
    fn from(value: RollError) -> Self {
        ParserError::RollError(Box::new(value))
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;
