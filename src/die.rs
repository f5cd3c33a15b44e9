use std::{collections::BTreeSet, fmt::Display};
use crate::{Error, RandomSource};


/// A single labelled outcome of a [`Die`].
///
/// The label does not have to spell the value, which is what makes symbolic
/// dice such as [`Die::fate()`] possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Face {
    value: i64,
    label: String
}

impl Face {
    /// Creates a face with an explicit label.
    pub fn new<S: Into<String>>(value: i64, label: S) -> Self {
        Self { value, label: label.into() }
    }

    /// Creates a face labelled with its own number.
    pub fn numbered(value: i64) -> Self {
        Self { value, label: value.to_string() }
    }

    /// Numeric value of the face.
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// Text shown for the face.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}


/// A rollable template of faces.
///
/// Dice are immutable once built and can be shared freely; rolling never
/// changes them. Every constructor rejects dice with fewer than two distinct
/// face values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Die {
    faces: Vec<Face>,
    min: usize,
    max: usize,
    distinct: usize
}

impl Die {
    /// Builds a die from an ordered list of faces.
    ///
    /// # Errors
    /// Returns [`Error::NonEuclidean`] when the faces carry fewer than two distinct values.
    ///
    /// # Examples
    /// ```
    /// use dicebag::{Die, Face, Error};
    ///
    /// let coin = Die::new(vec![Face::new(0, "tails"), Face::new(1, "heads")]).unwrap();
    /// assert_eq!(coin.max().label(), "heads");
    ///
    /// let bent = Die::new(vec![Face::numbered(1), Face::numbered(1)]);
    /// assert_eq!(bent, Err(Error::NonEuclidean(1)));
    /// ```
    pub fn new(faces: Vec<Face>) -> Result<Self, Error> {
        let die = Self::from_faces(faces);

        if die.distinct < 2 {
            return Err(Error::NonEuclidean(die.distinct));
        }

        Ok(die)
    }

    /// A die with faces `1..=sides`, each labelled with its number.
    ///
    /// # Errors
    /// Returns [`Error::NonEuclidean`] when `sides < 2`.
    pub fn numbered(sides: usize) -> Result<Self, Error> {
        Self::new((1..=sides as i64).map(Face::numbered).collect())
    }

    /// The Fate/Fudge die: two blanks, two pluses and two minuses.
    pub fn fate() -> Self {
        Self::from_faces(vec![
            Face::new(-1, "[-]"),
            Face::new(-1, "[-]"),
            Face::new(0, "[ ]"),
            Face::new(0, "[ ]"),
            Face::new(1, "[+]"),
            Face::new(1, "[+]"),
        ])
    }

    /// Two sided die, effectively a coin flip.
    pub fn d2() -> Self { Self::standard_numbered(2) }
    /// Three sided die.
    pub fn d3() -> Self { Self::standard_numbered(3) }
    /// Four sided die.
    pub fn d4() -> Self { Self::standard_numbered(4) }
    /// Six sided die.
    pub fn d6() -> Self { Self::standard_numbered(6) }
    /// Eight sided die.
    pub fn d8() -> Self { Self::standard_numbered(8) }
    /// Ten sided die.
    pub fn d10() -> Self { Self::standard_numbered(10) }
    /// Twelve sided die.
    pub fn d12() -> Self { Self::standard_numbered(12) }
    /// Twenty sided die.
    pub fn d20() -> Self { Self::standard_numbered(20) }
    /// Percentile die.
    pub fn d100() -> Self { Self::standard_numbered(100) }

    // Ties resolve to the first face in construction order.
    fn from_faces(faces: Vec<Face>) -> Self {
        let min = faces.iter().enumerate()
            .fold(0, |m, (i, f)| if f.value < faces[m].value { i } else { m });
        let max = faces.iter().enumerate()
            .fold(0, |m, (i, f)| if f.value > faces[m].value { i } else { m });
        let distinct = faces.iter().map(Face::value).collect::<BTreeSet<_>>().len();

        Self { faces, min, max, distinct }
    }

    fn standard_numbered(sides: i64) -> Self {
        Self::from_faces((1..=sides).map(Face::numbered).collect())
    }

    /// Draws one face uniformly at random.
    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Face {
        self.faces[rng.index(self.faces.len()) % self.faces.len()].clone()
    }

    /// The lowest valued face.
    pub fn min(&self) -> &Face {
        &self.faces[self.min]
    }

    /// The highest valued face.
    pub fn max(&self) -> &Face {
        &self.faces[self.max]
    }

    /// All faces in construction order.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Number of distinct face values.
    pub const fn distinct_values(&self) -> usize {
        self.distinct
    }

    /// Whether the faces are exactly `1..=n` labelled with their numbers.
    pub fn is_numbered(&self) -> bool {
        self.faces.iter()
            .enumerate()
            .all(|(i, face)| face.value == i as i64 + 1 && face.label == face.value.to_string())
    }
}

impl Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_numbered() {
            return write!(f, "d{}", self.faces.len());
        }

        let labels: Vec<&str> = self.faces.iter().map(Face::label).collect();
        write!(f, "d[{}]", labels.join(","))
    }
}
