#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]

//! Dice notation and random tables for tabletop games.
//!
//! ```
//! use dicebag::{evaluate, Sequence};
//!
//! // Roll 4d6, keep the highest three.
//! let mut rng = Sequence::faces([2, 5, 6, 1]);
//! let result = evaluate("4d6Kh3", &mut rng).unwrap();
//! assert_eq!(result.sum(), 13);
//! ```


#[cfg(test)]
mod roll_test_strategies;

mod error;
mod rng;
mod die;
mod match_set;
mod roll;
mod parser;
mod table;
mod registry;

pub use error::Error;
pub use rng::{RandomSource, Sequence, seeded};
pub use die::{Die, Face};
pub use match_set::MatchSet;
pub use roll::{Dice, DiceSet, RollResult, RollResults, Side, DEFAULT_EXPLODE_LIMIT};
pub use parser::{ParserError, Interpreter, InterpreterBuilder, evaluate, roll, DEFAULT_MAX_DICE, DEFAULT_MAX_FACES};
pub use table::{Action, List, Reroll, Table, TableBuilder, TableItem};
pub use registry::TableRegistry;
