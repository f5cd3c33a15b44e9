use log::debug;
use crate::{Dice, Die, Error, MatchSet, RandomSource, RollResult, DEFAULT_EXPLODE_LIMIT};
use crate::parser::error::*;
use crate::parser::{Lexer, Lexeme, Token};


/// Largest dice count a dice token may ask for by default.
pub const DEFAULT_MAX_DICE: usize = 1000;

/// Largest face count a dice token may ask for by default.
pub const DEFAULT_MAX_FACES: usize = 10_000;


/// Evaluates dice notation such as `4d6Kh3` or `1d6X6` into a [`RollResult`].
///
/// Notation is a flat, left to right sequence of operations: a dice token
/// (`<count>d<faces>`) followed by any mix of `Kh<n>`, `Kl<n>`, `Dh<n>`,
/// `Dl<n>`, `Kn<v,...>`, `Dn<v,...>` and `X<v,...>`, each applied to the
/// running result in the order written. A later dice token starts over with
/// a fresh roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    explode_limit: usize,
    max_dice: usize,
    max_faces: usize
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            explode_limit: DEFAULT_EXPLODE_LIMIT,
            max_dice: DEFAULT_MAX_DICE,
            max_faces: DEFAULT_MAX_FACES
        }
    }
}

impl Interpreter {
    /// Creates a new [`InterpreterBuilder`] with default settings.
    ///
    /// # Examples
    /// ```
    /// use dicebag::Interpreter;
    ///
    /// let interpreter = Interpreter::builder()
    ///     .explode_limit(50)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(interpreter.explode_limit(), 50);
    /// ```
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Rerolls one explosion may make before evaluation fails.
    pub const fn explode_limit(&self) -> usize {
        self.explode_limit
    }

    /// Largest dice count accepted in a dice token.
    pub const fn max_dice(&self) -> usize {
        self.max_dice
    }

    /// Largest face count accepted in a dice token.
    pub const fn max_faces(&self) -> usize {
        self.max_faces
    }

    /// Tokenizes `input` and folds every operation over the initial roll.
    ///
    /// # Errors
    /// Every error is wrapped in [`ParserError::AtPosition`] pointing at the
    /// character offset of the offending token; use [`ParserError::err()`]
    /// to get at the cause:
    /// - [`ParserError::Empty`] for blank input.
    /// - [`ParserError::InvalidFirstToken`] when the first token is not a dice token.
    /// - [`ParserError::InvalidDieSpec`] for a zero count, fewer than two faces,
    ///   or a count or face count above the configured maximum.
    /// - [`ParserError::InvalidKeepOrDropCount`] when keeping or dropping more dice than are left.
    /// - [`ParserError::InvalidMatchSetSize`] when a value list names as many
    ///   distinct values as the die has.
    /// - [`ParserError::RollError`] with [`Error::ExplodeDepthExceeded`] when an explosion runs away.
    /// - [`ParserError::Syntax`] with whatever input no token could claim.
    ///
    /// # Examples
    /// ```
    /// use dicebag::{Interpreter, ParserError, Sequence};
    ///
    /// let interpreter = Interpreter::default();
    ///
    /// let mut rng = Sequence::faces([2, 5, 6, 1]);
    /// let result = interpreter.evaluate("4d6Kh3", &mut rng).unwrap();
    /// assert_eq!(result.sum(), 13);
    ///
    /// let err = interpreter.evaluate("3d6Kh5", &mut rng).unwrap_err();
    /// assert!(matches!(err.err(), ParserError::InvalidKeepOrDropCount(_)));
    /// ```
    pub fn evaluate<R: RandomSource + ?Sized>(&self, input: &str, rng: &mut R) -> Result<RollResult> {
        if input.trim().is_empty() {
            return Err(ParserError::Empty.at_pos(0));
        }

        let tokens = Lexer::new(input).tokenize()?;
        let mut lexemes = tokens.lexemes.iter();

        let Some(first) = lexemes.next() else {
            return Err(syntax_error(tokens.remainder(), input));
        };

        let mut result = match first.token {
            Token::Dice { .. } => self.roll(first, rng)?,
            _ => return Err(ParserError::InvalidFirstToken(first.text.clone()).at_pos(first.position))
        };

        for lexeme in lexemes {
            result = self.apply(result, lexeme, rng)
                .map_err(|err| err.at_pos(lexeme.position))?;
        }

        if let Some(remainder) = tokens.remainder() {
            return Err(syntax_error(Some(remainder), input));
        }

        debug!("{} -> [{}] = {}", input.trim(), result, result.sum());
        Ok(result)
    }

    fn apply<R: RandomSource + ?Sized>(&self, result: RollResult, lexeme: &Lexeme, rng: &mut R) -> Result<RollResult> {
        match &lexeme.token {
            Token::Dice { .. } => self.roll(lexeme, rng),

            Token::Keep { side, n } => {
                check_count(&result, *n, lexeme)?;
                Ok(result.keep(*n, *side)?)
            },

            Token::Drop { side, n } => {
                check_count(&result, *n, lexeme)?;
                Ok(result.drop(*n, *side)?)
            },

            Token::KeepN(values) => Ok(result.keep_by_value(&match_set(&result, values, lexeme)?)),

            Token::DropN(values) => Ok(result.drop_by_value(&match_set(&result, values, lexeme)?)),

            Token::Explode(values) => {
                let matches = match_set(&result, values, lexeme)?;
                Ok(result.explode_with_limit(&matches, self.explode_limit, rng)?)
            }
        }
    }

    fn roll<R: RandomSource + ?Sized>(&self, lexeme: &Lexeme, rng: &mut R) -> Result<RollResult> {
        let Token::Dice { count, faces } = lexeme.token else {
            return Err(ParserError::InvalidFirstToken(lexeme.text.clone()).at_pos(lexeme.position));
        };

        let invalid = || ParserError::InvalidDieSpec(lexeme.text.clone()).at_pos(lexeme.position);

        if count > self.max_dice || faces > self.max_faces {
            return Err(invalid());
        }

        let die = Die::numbered(faces).map_err(|_| invalid())?;
        let dice = Dice::new(count, die).map_err(|_| invalid())?;

        Ok(dice.roll(rng))
    }
}


/// A builder for [`Interpreter`] settings.
#[derive(Debug, Clone)]
pub struct InterpreterBuilder {
    explode_limit: usize,
    max_dice: usize,
    max_faces: usize
}

impl InterpreterBuilder {
    fn new() -> Self {
        Self {
            explode_limit: DEFAULT_EXPLODE_LIMIT,
            max_dice: DEFAULT_MAX_DICE,
            max_faces: DEFAULT_MAX_FACES
        }
    }

    /// Sets how many rerolls one explosion may make before evaluation fails.
    pub fn explode_limit(mut self, limit: usize) -> Self {
        self.explode_limit = limit;
        self
    }

    /// Caps the dice count of a dice token.
    pub fn max_dice(mut self, max: usize) -> Self {
        self.max_dice = max;
        self
    }

    /// Caps the face count of a dice token.
    pub fn max_faces(mut self, max: usize) -> Self {
        self.max_faces = max;
        self
    }

    /// Finalizes the configuration.
    ///
    /// # Errors
    /// Returns [`Error::ZeroValue`] if the explode limit or either cap is 0.
    pub fn build(self) -> std::result::Result<Interpreter, Error> {
        if self.explode_limit == 0 || self.max_dice == 0 || self.max_faces == 0 {
            return Err(Error::ZeroValue);
        }

        Ok(Interpreter {
            explode_limit: self.explode_limit,
            max_dice: self.max_dice,
            max_faces: self.max_faces
        })
    }
}


fn check_count(result: &RollResult, n: usize, lexeme: &Lexeme) -> Result<()> {
    if n > result.len() {
        return Err(ParserError::InvalidKeepOrDropCount(lexeme.text.clone()));
    }

    Ok(())
}

// A list naming every distinct face would keep, drop or explode the whole roll.
fn match_set(result: &RollResult, values: &[i64], lexeme: &Lexeme) -> Result<MatchSet> {
    let matches: MatchSet = values.iter().copied().collect();

    if matches.len() >= result.die().distinct_values() {
        return Err(ParserError::InvalidMatchSetSize(lexeme.text.clone()));
    }

    Ok(matches)
}

fn syntax_error(remainder: Option<(usize, String)>, input: &str) -> ParserError {
    match remainder {
        Some((position, text)) => ParserError::Syntax(text).at_pos(position),
        None => ParserError::Syntax(input.trim().to_string()).at_pos(0)
    }
}


/// Evaluates dice notation with the default [`Interpreter`].
///
/// # Errors
/// See [`Interpreter::evaluate`].
///
/// # Examples
/// ```
/// use dicebag::{evaluate, seeded};
///
/// let result = evaluate("3d6", &mut seeded(1)).unwrap();
/// assert!((3..=18).contains(&result.sum()));
/// ```
pub fn evaluate<R: RandomSource + ?Sized>(input: &str, rng: &mut R) -> Result<RollResult> {
    Interpreter::default().evaluate(input, rng)
}

/// Evaluates dice notation with the default [`Interpreter`] and the thread local generator.
///
/// # Errors
/// See [`Interpreter::evaluate`].
///
/// # Examples
/// ```
/// let result = dicebag::roll("4d6Kh3").unwrap();
/// assert_eq!(result.len(), 3);
/// ```
pub fn roll(input: &str) -> Result<RollResult> {
    evaluate(input, &mut rand::rng())
}


#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use super::*;
    use crate::{seeded, Sequence};
    use crate::parser::str_test_strategies::*;


    fn forced(input: &str, faces: &[usize]) -> Result<RollResult> {
        evaluate(input, &mut Sequence::faces(faces.iter().copied()))
    }

    proptest! {
        #[test]
        fn test_plain_dice_bounds((count, faces, expr) in dice_strategy(), seed: u64) {
            let result = evaluate(&expr, &mut seeded(seed)).unwrap();

            prop_assert_eq!(result.len(), count);
            prop_assert!(result.ints().iter().all(|&v| v >= 1 && v <= faces as i64));
            prop_assert!(result.sum() >= count as i64 && result.sum() <= (count * faces) as i64);
        }

        #[test]
        fn test_notation_never_panics(expr in notation_strategy(), seed: u64) {
            match evaluate(&expr, &mut seeded(seed)) {
                Ok(result) => prop_assert!(result.sum() <= result.max() && result.sum() >= result.min()),
                Err(err) => prop_assert!(
                    matches!(err.err(), ParserError::InvalidKeepOrDropCount(_) | ParserError::RollError(_)),
                    "{} -> {}", expr, err
                )
            }
        }

        #[test]
        fn test_whitespace_is_trimmed((_, _, expr) in dice_strategy(), pad in "[ \\t\\n]{0,3}") {
            let padded = format!("{pad}{expr}{pad}");
            prop_assert!(evaluate(&padded, &mut seeded(0)).is_ok());
        }

        #[test]
        fn test_blank_input(input in "[ \\t\\n]*") {
            let err = evaluate(&input, &mut seeded(0)).unwrap_err();
            prop_assert_eq!(err.err(), &ParserError::Empty);
        }

        #[test]
        fn test_keep_beyond_count(count in 1usize..10, extra in 1usize..10) {
            let expr = format!("{count}d6Kh{}", count + extra);
            let err = evaluate(&expr, &mut seeded(0)).unwrap_err();

            prop_assert!(matches!(err.err(), ParserError::InvalidKeepOrDropCount(_)));
        }
    }

    #[test]
    fn test_three_d_six_statistics() {
        let mut rng = seeded(1234);
        let interpreter = Interpreter::default();
        let samples = 10_000;

        let mut total = 0;
        for _ in 0..samples {
            let sum = interpreter.evaluate("3d6", &mut rng).unwrap().sum();
            assert!((3..=18).contains(&sum));
            total += sum;
        }

        let mean = total as f64 / samples as f64;
        assert!((mean - 10.5).abs() < 0.2, "mean {mean}");
    }

    #[test]
    fn test_keep_highest() {
        let result = forced("4d6Kh3", &[2, 5, 6, 1]).unwrap();
        let mut ints = result.ints();
        ints.sort_unstable();

        assert_eq!(ints, vec![2, 5, 6]);
        assert_eq!(result.sum(), 13);
    }

    #[test]
    fn test_keep_lowest() {
        let result = forced("2d10Kl1", &[7, 3]).unwrap();

        assert_eq!(result.ints(), vec![3]);
        assert_eq!(result.sum(), 3);
    }

    #[test]
    fn test_explode_chain() {
        let result = forced("1d6X6", &[6, 6, 3]).unwrap();

        assert_eq!(result.ints(), vec![6, 6, 3]);
        assert_eq!(result.sum(), 15);
    }

    #[test]
    fn test_operations_apply_in_order() {
        // Explode first, then keep the best two of everything rolled.
        let result = forced("3d6X6Kh2", &[6, 2, 1, 4]).unwrap();
        assert_eq!(result.sum(), 10);

        // Keep the best two first; the 6 explodes afterwards.
        let result = forced("3d6Kh2X6", &[6, 2, 1, 4]).unwrap();
        assert_eq!(result.sum(), 12);
    }

    #[test]
    fn test_value_selection() {
        let result = forced("5d6Kn5,6", &[5, 1, 6, 2, 5]).unwrap();
        assert_eq!(result.ints(), vec![5, 6, 5]);

        let result = forced("5d6Dn1,1,2", &[5, 1, 6, 2, 5]).unwrap();
        assert_eq!(result.ints(), vec![5, 6, 5]);
    }

    #[test]
    fn test_drop() {
        let result = forced("4d6Dl1", &[3, 1, 4, 6]).unwrap();
        assert_eq!(result.sum(), 13);

        let result = forced("4d6Dh4", &[3, 1, 4, 6]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_keep_exceeds_roll_count() {
        let err = forced("3d6Kh5", &[1, 2, 3]).unwrap_err();

        assert_eq!(err, ParserError::InvalidKeepOrDropCount("Kh5".into()).at_pos(3));
    }

    #[test]
    fn test_drop_exceeds_roll_count() {
        let err = forced("2d6Dl1Dh2", &[1, 2]).unwrap_err();

        assert_eq!(err.err(), &ParserError::InvalidKeepOrDropCount("Dh2".into()));
        assert_eq!(err.pos(), Some(&6));
    }

    #[test]
    fn test_missing_count_is_syntax_error() {
        let err = forced("d6", &[1]).unwrap_err();
        assert_eq!(err, ParserError::Syntax("d6".into()).at_pos(0));
    }

    #[test]
    fn test_first_token_must_be_dice() {
        let err = forced("Kh3 3d6", &[1]).unwrap_err();
        assert_eq!(err, ParserError::InvalidFirstToken("Kh3".into()).at_pos(0));

        let err = forced("X6d6", &[1]).unwrap_err();
        assert_eq!(err.err(), &ParserError::InvalidFirstToken("X6".into()));
    }

    #[test]
    fn test_invalid_die_spec() {
        let err = forced("0d6", &[1]).unwrap_err();
        assert_eq!(err.err(), &ParserError::InvalidDieSpec("0d6".into()));

        let err = forced("3d1", &[1]).unwrap_err();
        assert_eq!(err.err(), &ParserError::InvalidDieSpec("3d1".into()));

        let err = forced("3d6Kh1 2d0", &[1]).unwrap_err();
        assert_eq!(err, ParserError::InvalidDieSpec("2d0".into()).at_pos(7));
    }

    #[test]
    fn test_match_set_too_large() {
        let err = forced("1d2X1,2", &[1]).unwrap_err();
        assert_eq!(err.err(), &ParserError::InvalidMatchSetSize("X1,2".into()));

        let err = forced("4d6Kn1,2,3,4,5,6", &[1]).unwrap_err();
        assert!(matches!(err.err(), ParserError::InvalidMatchSetSize(_)));

        // Duplicates are collapsed before counting.
        assert!(forced("1d2X2,2,2", &[1]).is_ok());
    }

    #[test]
    fn test_unparsed_remainder() {
        let err = forced("3d6 foo Kh2", &[1, 2, 3]).unwrap_err();
        assert_eq!(err, ParserError::Syntax("foo".into()).at_pos(4));

        let err = forced("2d20kh1", &[1, 2]).unwrap_err();
        assert_eq!(err.err(), &ParserError::Syntax("kh1".into()));
    }

    #[test]
    fn test_later_dice_token_starts_over() {
        let result = forced("2d6Kh1 3d4", &[6, 5, 1, 2, 3]).unwrap();

        assert_eq!(result.ints(), vec![1, 2, 3]);
        assert_eq!(result.die(), &Die::d4());
    }

    #[test]
    fn test_explode_limit() {
        let interpreter = Interpreter::builder().explode_limit(1).build().unwrap();
        let mut rng = Sequence::faces([6, 6, 6]);

        let err = interpreter.evaluate("1d6X6", &mut rng).unwrap_err();
        assert_eq!(err.err(), &ParserError::RollError(Box::new(Error::ExplodeDepthExceeded(1))));
        assert_eq!(err.pos(), Some(&3));
    }

    #[test]
    fn test_oversized_dice_rejected() {
        let err = evaluate("1d99999999999999", &mut seeded(0)).unwrap_err();
        assert_eq!(err, ParserError::InvalidDieSpec("1d99999999999999".into()).at_pos(0));

        let err = evaluate("1000000000000d6", &mut seeded(0)).unwrap_err();
        assert_eq!(err, ParserError::InvalidDieSpec("1000000000000d6".into()).at_pos(0));

        let err = evaluate("2d6Kh1 1d10001", &mut seeded(0)).unwrap_err();
        assert_eq!(err, ParserError::InvalidDieSpec("1d10001".into()).at_pos(7));

        assert_eq!(evaluate("1000d10000", &mut seeded(0)).unwrap().len(), 1000);
    }

    #[test]
    fn test_configured_caps() {
        let interpreter = Interpreter::builder()
            .max_dice(4)
            .max_faces(20)
            .build()
            .unwrap();

        assert!(interpreter.evaluate("4d20", &mut seeded(0)).is_ok());

        let err = interpreter.evaluate("5d6", &mut seeded(0)).unwrap_err();
        assert_eq!(err.err(), &ParserError::InvalidDieSpec("5d6".into()));

        let err = interpreter.evaluate("1d100", &mut seeded(0)).unwrap_err();
        assert_eq!(err.err(), &ParserError::InvalidDieSpec("1d100".into()));
    }

    #[test]
    fn test_builder_rejects_zero_limit() {
        assert_eq!(Interpreter::builder().explode_limit(0).build(), Err(Error::ZeroValue));
        assert_eq!(Interpreter::builder().max_dice(0).build(), Err(Error::ZeroValue));
        assert_eq!(Interpreter::builder().max_faces(0).build(), Err(Error::ZeroValue));
        assert_eq!(Interpreter::builder().build(), Ok(Interpreter::default()));
    }
}
