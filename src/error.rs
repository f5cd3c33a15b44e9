use crate::parser::ParserError as ParserError;


/// Errors raised by dice, rolls and tables.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A count or limit that must be positive was 0.
    #[error("Zero value not allowed")]
    ZeroValue,

    /// A die needs at least two distinct face values.
    #[error("Non-euclidean die: {0} distinct face value(s), at least 2 required")]
    NonEuclidean(usize),

    /// Keeping or dropping more rolls than there are.
    #[error("Keep or drop count {n} out of range for {available} roll(s)")]
    KeepOrDropCount {
        /// Requested count.
        n: usize,
        /// Rolls present.
        available: usize
    },

    /// An explosion was still pending after the reroll limit.
    #[error("Explosion exceeded {0} rerolls")]
    ExplodeDepthExceeded(usize),

    /// No table is registered under the id.
    #[error("No table registered with id [{0}]")]
    UnknownTable(String),

    /// The id is already taken in the registry.
    #[error("Table {0} already registered")]
    DuplicateTable(String),

    /// Notation failed to evaluate.
    #[error("Parser error - {0}")]
    ParserError(#[from] ParserError)
}
