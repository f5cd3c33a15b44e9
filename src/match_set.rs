use std::{collections::BTreeSet, fmt::Display, iter::FromIterator};


/// A deduplicated set of face values or table results to match against.
///
/// Order of insertion is irrelevant; iteration is ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchSet(BTreeSet<i64>);

impl MatchSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every integer from `start` to `end` inclusive.
    ///
    /// # Examples
    /// ```
    /// use dicebag::MatchSet;
    ///
    /// let set = MatchSet::range(2, 5);
    /// assert_eq!(set.to_string(), "2, 3, 4, 5");
    /// assert!(MatchSet::range(5, 2).is_empty());
    /// ```
    pub fn range(start: i64, end: i64) -> Self {
        (start..=end).collect()
    }

    /// Whether `value` is in the set.
    pub fn contains(&self, value: i64) -> bool {
        self.0.contains(&value)
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set matches nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<i64> for MatchSet {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[i64; N]> for MatchSet {
    fn from(value: [i64; N]) -> Self {
        value.into_iter().collect()
    }
}

impl From<Vec<i64>> for MatchSet {
    fn from(value: Vec<i64>) -> Self {
        value.into_iter().collect()
    }
}

impl Display for MatchSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.0.iter().map(i64::to_string).collect();
        write!(f, "{}", values.join(", "))
    }
}
