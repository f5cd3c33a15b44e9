mod error;
mod lexer;
mod parse;

#[cfg(test)]
mod str_test_strategies;

pub use error::ParserError;
pub(crate) use lexer::{Lexer, Lexeme, Token};
pub use parse::{Interpreter, InterpreterBuilder, evaluate, roll, DEFAULT_MAX_DICE, DEFAULT_MAX_FACES};
