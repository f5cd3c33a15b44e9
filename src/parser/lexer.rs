use std::fmt::Display;
use log::trace;
use crate::Side;
use crate::parser::error::*;


#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Dice { count: usize, faces: usize },
    Keep { side: Side, n: usize },
    KeepN(Vec<i64>),
    Drop { side: Side, n: usize },
    DropN(Vec<i64>),
    Explode(Vec<i64>),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn list(values: &[i64]) -> String {
            values.iter().map(i64::to_string).collect::<Vec<_>>().join(",")
        }

        match self {
            Token::Dice { count, faces } => write!(f, "{count}d{faces}"),
            Token::Keep { side, n } => write!(f, "K{side}{n}"),
            Token::KeepN(values) => write!(f, "Kn{}", list(values)),
            Token::Drop { side, n } => write!(f, "D{side}{n}"),
            Token::DropN(values) => write!(f, "Dn{}", list(values)),
            Token::Explode(values) => write!(f, "X{}", list(values)),
        }
    }
}


/// A recognised token together with where it sat in the input and how it was spelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lexeme {
    pub token: Token,
    pub position: usize,
    pub text: String,
}


/// Everything the lexer found: the tokens in input order, and every
/// character that no token claimed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Tokens {
    pub lexemes: Vec<Lexeme>,
    pub residue: Vec<(usize, char)>,
}

impl Tokens {
    /// The unclaimed input with whitespace trimmed, and the position of its
    /// first character. `None` when only whitespace was left over.
    pub fn remainder(&self) -> Option<(usize, String)> {
        let position = self.residue.iter()
            .find(|(_, ch)| !ch.is_whitespace())
            .map(|(position, _)| *position)?;

        let text: String = self.residue.iter().map(|(_, ch)| ch).collect();
        Some((position, text.trim().to_string()))
    }
}


/// Scans dice notation for tokens anywhere in the input, left to right.
///
/// Characters that cannot start a token at their position are set aside as
/// residue instead of failing the scan; deciding whether leftovers are an
/// error is up to the caller.
#[derive(Debug)]
pub(crate) struct Lexer {
    input: Vec<char>,
    pub position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Tokens> {
        let mut tokens = Tokens::default();

        while self.position < self.input.len() {
            let start = self.position;

            match self.read_token().map_err(|err| err.at_pos(start))? {
                Some(token) => {
                    let text: String = self.input[start..self.position].iter().collect();
                    trace!("lexeme {token} at {start}");
                    tokens.lexemes.push(Lexeme { token, position: start, text });
                },
                None => {
                    self.position = start + 1;
                    tokens.residue.push((start, self.input[start]));
                }
            }
        }

        Ok(tokens)
    }

    // Leaves the position wherever scanning stopped; callers reset it on `None`.
    fn read_token(&mut self) -> Result<Option<Token>> {
        let ch = self.input[self.position];

        match ch {
            '0'..='9' => self.read_dice(),
            'K' => {
                self.position += 1;
                self.read_selection(
                    |side, n| Token::Keep { side, n },
                    Token::KeepN
                )
            },
            'D' => {
                self.position += 1;
                self.read_selection(
                    |side, n| Token::Drop { side, n },
                    Token::DropN
                )
            },
            'X' => {
                self.position += 1;
                Ok(self.read_list()?.map(Token::Explode))
            },
            _ => Ok(None)
        }
    }

    fn read_dice(&mut self) -> Result<Option<Token>> {
        let Some(count) = self.read_digits() else {
            return Ok(None);
        };

        if self.peek() != Some('d') {
            return Ok(None);
        }
        self.position += 1;

        let Some(faces) = self.read_digits() else {
            return Ok(None);
        };

        Ok(Some(Token::Dice { count: count.parse()?, faces: faces.parse()? }))
    }

    fn read_selection(
        &mut self,
        ranked: fn(Side, usize) -> Token,
        by_value: fn(Vec<i64>) -> Token
    ) -> Result<Option<Token>> {
        let side = match self.peek() {
            Some('h') => Side::High,
            Some('l') => Side::Low,
            Some('n') => {
                self.position += 1;
                return Ok(self.read_list()?.map(by_value));
            },
            _ => return Ok(None)
        };
        self.position += 1;

        match self.read_digits() {
            Some(n) => Ok(Some(ranked(side, n.parse()?))),
            None => Ok(None)
        }
    }

    fn read_list(&mut self) -> Result<Option<Vec<i64>>> {
        let Some(first) = self.read_digits() else {
            return Ok(None);
        };

        let mut values = vec![first.parse()?];

        // A trailing comma is not part of the list.
        while self.peek() == Some(',') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
            if let Some(digits) = self.read_digits() {
                values.push(digits.parse()?);
            }
        }

        Ok(Some(values))
    }

    fn read_digits(&mut self) -> Option<String> {
        let start = self.position;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
        }

        if start == self.position {
            return None;
        }

        Some(self.input[start..self.position].iter().collect())
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}
