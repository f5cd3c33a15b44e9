use std::{fmt::Display, iter::FromIterator, ops::Deref, sync::Arc};
use log::{trace, warn};
use crate::{Die, Error, Face, MatchSet, RandomSource};


/// Maximum number of rerolls a single explosion chain may perform before
/// [`RollResult::explode`] gives up with [`Error::ExplodeDepthExceeded`].
pub const DEFAULT_EXPLODE_LIMIT: usize = 1000;


/// Which end of a sorted roll a keep or drop applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// The highest values.
    High,
    /// The lowest values.
    Low
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::High => write!(f, "h"),
            Side::Low => write!(f, "l")
        }
    }
}


/// A number of identical dice rolled together.
///
/// # Examples
/// ```
/// use dicebag::{Dice, Die};
///
/// let dice = Dice::new(3, Die::d6()).unwrap();
/// assert_eq!(dice.to_string(), "3d6");
/// assert_eq!((dice.min(), dice.max()), (3, 18));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dice {
    count: usize,
    die: Arc<Die>
}

impl Dice {
    /// Creates `count` dice of one kind. The die may be passed by value or as a shared [`Arc`].
    ///
    /// # Errors
    /// Returns [`Error::ZeroValue`] if `count` is 0.
    pub fn new<D: Into<Arc<Die>>>(count: usize, die: D) -> Result<Self, Error> {
        if count == 0 {
            return Err(Error::ZeroValue);
        }

        Ok(Self { count, die: die.into() })
    }

    /// Number of dice rolled together.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// The die each of them is.
    pub fn die(&self) -> &Die {
        &self.die
    }

    /// Lowest possible sum.
    pub fn min(&self) -> i64 {
        scaled(self.count, self.die.min().value())
    }

    /// Highest possible sum.
    pub fn max(&self) -> i64 {
        scaled(self.count, self.die.max().value())
    }

    /// Draws `count` independent faces.
    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> RollResult {
        RollResult::roll(self.count, Arc::clone(&self.die), rng)
    }
}

impl Display for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.die)
    }
}


/// The faces produced by rolling a [`Dice`], or by transforming an earlier result.
///
/// Every transformation returns a fresh result over the same shared [`Die`];
/// the receiver is never modified. Dereferences to the rolled faces.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollResult {
    die: Arc<Die>,
    rolls: Vec<Face>
}

impl RollResult {
    /// Wraps already rolled faces.
    pub fn new(die: Arc<Die>, rolls: Vec<Face>) -> Self {
        Self { die, rolls }
    }

    fn roll<R: RandomSource + ?Sized>(count: usize, die: Arc<Die>, rng: &mut R) -> Self {
        let rolls = (0..count).map(|_| die.roll(rng)).collect();
        Self { die, rolls }
    }

    fn with_rolls(&self, rolls: Vec<Face>) -> Self {
        Self { die: Arc::clone(&self.die), rolls }
    }

    /// The die that was rolled.
    pub fn die(&self) -> &Die {
        &self.die
    }

    /// Sum of the rolled values, saturating at the bounds of `i64`.
    pub fn sum(&self) -> i64 {
        self.rolls.iter().map(Face::value).fold(0, i64::saturating_add)
    }

    /// Labels of the rolled faces, in roll order.
    pub fn values(&self) -> Vec<&str> {
        self.rolls.iter().map(Face::label).collect()
    }

    /// Numeric values of the rolled faces, in roll order.
    pub fn ints(&self) -> Vec<i64> {
        self.rolls.iter().map(Face::value).collect()
    }

    /// Lowest sum possible for the current number of rolls.
    pub fn min(&self) -> i64 {
        scaled(self.rolls.len(), self.die.min().value())
    }

    /// Highest sum possible for the current number of rolls.
    pub fn max(&self) -> i64 {
        scaled(self.rolls.len(), self.die.max().value())
    }

    /// Keeps the `n` highest or lowest rolls.
    ///
    /// # Errors
    /// Returns [`Error::KeepOrDropCount`] if `n` exceeds the number of rolls.
    ///
    /// # Examples
    /// ```
    /// use dicebag::{Dice, Die, Sequence, Side};
    ///
    /// let mut rng = Sequence::faces([2, 5, 6, 1]);
    /// let result = Dice::new(4, Die::d6()).unwrap().roll(&mut rng);
    ///
    /// assert_eq!(result.keep(3, Side::High).unwrap().sum(), 13);
    /// assert_eq!(result.keep(1, Side::Low).unwrap().ints(), vec![1]);
    /// assert!(result.keep(5, Side::High).is_err());
    /// ```
    pub fn keep(&self, n: usize, side: Side) -> Result<Self, Error> {
        let sorted = self.sorted(n)?;
        let len = sorted.len();

        let kept = match side {
            Side::High => sorted[len - n..].to_vec(),
            Side::Low => sorted[..n].to_vec()
        };

        Ok(self.with_rolls(kept))
    }

    /// Drops the `n` highest or lowest rolls, keeping the rest.
    ///
    /// # Errors
    /// Returns [`Error::KeepOrDropCount`] if `n` exceeds the number of rolls.
    pub fn drop(&self, n: usize, side: Side) -> Result<Self, Error> {
        let sorted = self.sorted(n)?;
        let len = sorted.len();

        let kept = match side {
            Side::High => sorted[..len - n].to_vec(),
            Side::Low => sorted[n..].to_vec()
        };

        Ok(self.with_rolls(kept))
    }

    fn sorted(&self, n: usize) -> Result<Vec<Face>, Error> {
        if n > self.rolls.len() {
            return Err(Error::KeepOrDropCount { n, available: self.rolls.len() });
        }

        let mut sorted = self.rolls.clone();
        sorted.sort_by_key(Face::value);
        Ok(sorted)
    }

    /// Keeps only rolls whose value is in `matches`.
    pub fn keep_by_value(&self, matches: &MatchSet) -> Self {
        self.with_rolls(
            self.rolls.iter()
                .filter(|face| matches.contains(face.value()))
                .cloned()
                .collect()
        )
    }

    /// Removes rolls whose value is in `matches`.
    pub fn drop_by_value(&self, matches: &MatchSet) -> Self {
        self.with_rolls(
            self.rolls.iter()
                .filter(|face| !matches.contains(face.value()))
                .cloned()
                .collect()
        )
    }

    /// Rerolls the die once for every roll whose value is in `matches`, and
    /// again for every reroll that matches, until nothing matches.
    ///
    /// The exploded faces stay in the result: the initial rolls come first,
    /// followed by every reroll in the order it was made.
    ///
    /// # Errors
    /// Returns [`Error::ExplodeDepthExceeded`] after [`DEFAULT_EXPLODE_LIMIT`] rerolls.
    ///
    /// # Examples
    /// ```
    /// use dicebag::{Dice, Die, MatchSet, Sequence};
    ///
    /// let mut rng = Sequence::faces([6, 6, 3]);
    /// let result = Dice::new(1, Die::d6()).unwrap()
    ///     .roll(&mut rng)
    ///     .explode(&MatchSet::from([6]), &mut rng)
    ///     .unwrap();
    ///
    /// assert_eq!(result.ints(), vec![6, 6, 3]);
    /// assert_eq!(result.sum(), 15);
    /// ```
    pub fn explode<R: RandomSource + ?Sized>(&self, matches: &MatchSet, rng: &mut R) -> Result<Self, Error> {
        self.explode_with_limit(matches, DEFAULT_EXPLODE_LIMIT, rng)
    }

    /// [`RollResult::explode`] with an explicit cap on the number of rerolls.
    ///
    /// # Errors
    /// Returns [`Error::ExplodeDepthExceeded`] once `limit` rerolls have been
    /// made and a matching face is still pending.
    pub fn explode_with_limit<R: RandomSource + ?Sized>(
        &self,
        matches: &MatchSet,
        limit: usize,
        rng: &mut R
    ) -> Result<Self, Error> {
        let mut rolls = self.rolls.clone();
        let mut pending = rolls.iter()
            .filter(|face| matches.contains(face.value()))
            .count();
        let mut rerolls = 0;

        while pending > 0 {
            if rerolls == limit {
                warn!("explosion on [{matches}] still pending after {limit} rerolls");
                return Err(Error::ExplodeDepthExceeded(limit));
            }

            let face = self.die.roll(rng);
            trace!("exploded into {face}");
            rerolls += 1;

            if !matches.contains(face.value()) {
                pending -= 1;
            }

            rolls.push(face);
        }

        Ok(self.with_rolls(rolls))
    }

    /// Rolls the same number of dice again.
    pub fn reroll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Self {
        Self::roll(self.rolls.len(), Arc::clone(&self.die), rng)
    }
}

impl Deref for RollResult {
    type Target = [Face];

    fn deref(&self) -> &Self::Target {
        &self.rolls
    }
}

impl Display for RollResult {
    /// Labels sorted by value, comma separated.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sorted: Vec<&Face> = self.rolls.iter().collect();
        sorted.sort_by_key(|face| face.value());

        let labels: Vec<&str> = sorted.into_iter().map(Face::label).collect();
        write!(f, "{}", labels.join(", "))
    }
}


/// Several groups of dice, each of a possibly different kind, such as `2d6 + 1d8`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceSet(Vec<Dice>);

impl DiceSet {
    /// Groups `dice` into a set.
    pub fn new(dice: Vec<Dice>) -> Self {
        Self(dice)
    }

    /// Rolls every group once.
    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> RollResults {
        self.0.iter().map(|dice| dice.roll(rng)).collect()
    }

    /// Lowest possible total.
    pub fn min(&self) -> i64 {
        self.0.iter().map(Dice::min).fold(0, i64::saturating_add)
    }

    /// Highest possible total.
    pub fn max(&self) -> i64 {
        self.0.iter().map(Dice::max).fold(0, i64::saturating_add)
    }
}

impl FromIterator<Dice> for DiceSet {
    fn from_iter<T: IntoIterator<Item = Dice>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for DiceSet {
    type Target = Vec<Dice>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}


/// One [`RollResult`] per group of a [`DiceSet`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollResults(Vec<RollResult>);

impl RollResults {
    /// Wraps already rolled results.
    pub fn new(results: Vec<RollResult>) -> Self {
        Self(results)
    }

    /// Lowest total possible for the current roll counts.
    pub fn min(&self) -> i64 {
        self.0.iter().map(RollResult::min).fold(0, i64::saturating_add)
    }

    /// Highest total possible for the current roll counts.
    pub fn max(&self) -> i64 {
        self.0.iter().map(RollResult::max).fold(0, i64::saturating_add)
    }

    /// Total over every group.
    pub fn sum(&self) -> i64 {
        self.0.iter().map(RollResult::sum).fold(0, i64::saturating_add)
    }

    /// The dice groups that would reproduce these results. Results left
    /// empty by a keep or drop have no group and are skipped.
    pub fn dice(&self) -> DiceSet {
        self.0.iter()
            .filter(|result| !result.is_empty())
            .map(|result| Dice { count: result.len(), die: Arc::clone(&result.die) })
            .collect()
    }
}

impl FromIterator<RollResult> for RollResults {
    fn from_iter<T: IntoIterator<Item = RollResult>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for RollResults {
    type Target = Vec<RollResult>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Saturates instead of overflowing for huge counts or face values.
fn scaled(count: usize, value: i64) -> i64 {
    i64::try_from(count)
        .unwrap_or(i64::MAX)
        .saturating_mul(value)
}
