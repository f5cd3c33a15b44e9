//! Random tables and lists.
//!
//! A [`Table`] maps the (modified, clamped) sum of a dice roll to text.
//! Tables rolled on two or more dice give bell curve odds, which is what
//! sets them apart from a [`List`], where every entry is equally likely.
//!
//! Items may carry an [`Action`], run when the final roll lands on them. An
//! action receives the [`TableRegistry`] the table was rolled through, which
//! is how one table defers to another:
//!
//! ```
//! use dicebag::{Action, Dice, Die, Sequence, Table, TableItem, TableRegistry};
//!
//! let mut registry = TableRegistry::new();
//!
//! registry.add(
//!     Table::builder("weather", Dice::new(1, Die::d4()).unwrap())
//!         .item(TableItem::new([1, 2], "Clear"))
//!         .item(TableItem::new([3, 4], "Storm"))
//!         .build()
//! ).unwrap();
//!
//! registry.add(
//!     Table::builder("travel", Dice::new(1, Die::d6()).unwrap())
//!         .item(TableItem::new([1, 2, 3], "Uneventful"))
//!         .item(TableItem::new([4, 5, 6], "Weather turns").action(Action::reroll_on("weather")))
//!         .build()
//! ).unwrap();
//!
//! let mut rng = Sequence::faces([5, 4]);
//! assert_eq!(registry.roll("travel", &mut rng).unwrap(), "Weather turns; Storm");
//! ```

use std::{fmt::{Debug, Display}, sync::Arc};
use log::debug;
use crate::{Dice, Error, MatchSet, RandomSource, TableRegistry};


type ActionFn = dyn Fn(&TableRegistry, &mut dyn RandomSource) -> Result<String, Error> + Send + Sync;

/// A callback attached to a [`TableItem`], producing extra text.
#[derive(Clone)]
pub struct Action(Arc<ActionFn>);

impl Action {
    /// Wraps a closure run after its item is drawn.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&TableRegistry, &mut dyn RandomSource) -> Result<String, Error> + Send + Sync + 'static
    {
        Self(Arc::new(f))
    }

    /// Rolls on the table registered as `id`.
    ///
    /// The lookup happens when the action runs, so the target may be
    /// registered after the table that refers to it, or be that table itself.
    pub fn reroll_on<S: Into<String>>(id: S) -> Self {
        let id = id.into();
        Self::new(move |registry, rng| registry.get(&id)?.roll(registry, rng))
    }

    /// Runs the action.
    ///
    /// # Errors
    /// Whatever the callback returns, typically [`Error::UnknownTable`].
    pub fn call(&self, registry: &TableRegistry, rng: &mut dyn RandomSource) -> Result<String, Error> {
        (self.0)(registry, rng)
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Action(..)")
    }
}


/// One row of a [`Table`].
#[derive(Debug, Clone)]
pub struct TableItem {
    matches: MatchSet,
    text: String,
    action: Option<Action>
}

impl TableItem {
    /// An item drawn when the roll lands in `matches`.
    pub fn new<M: Into<MatchSet>, S: Into<String>>(matches: M, text: S) -> Self {
        Self {
            matches: matches.into(),
            text: text.into(),
            action: None
        }
    }

    /// Attaches an action run when the final roll lands on this item.
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Roll values selecting this item.
    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    /// Text contributed when drawn.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether an action is attached.
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }
}


/// When the table result is in `matches`, roll `dice` instead and look that up too.
#[derive(Debug, Clone, PartialEq)]
pub struct Reroll {
    /// First-roll values that trigger the second lookup.
    pub matches: MatchSet,
    /// Dice rolled for it.
    pub dice: Dice
}


/// A dice driven lookup table. Build one with [`Table::builder()`].
#[derive(Debug, Clone)]
pub struct Table {
    id: String,
    name: String,
    dice: Dice,
    modifier: i64,
    reroll: Option<Reroll>,
    items: Vec<TableItem>
}

impl Table {
    /// Starts a table keyed by `id` and rolled with `dice`.
    pub fn builder<S: Into<String>>(id: S, dice: Dice) -> TableBuilder {
        TableBuilder::new(id.into(), dice)
    }

    /// Registry key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name, empty if none was given.
    pub fn label(&self) -> &str {
        &self.name
    }

    /// Dice rolled to pick an item.
    pub fn dice(&self) -> &Dice {
        &self.dice
    }

    /// Added to the roll before clamping.
    pub const fn modifier(&self) -> i64 {
        self.modifier
    }

    /// Second lookup, if configured.
    pub fn reroll(&self) -> Option<&Reroll> {
        self.reroll.as_ref()
    }

    /// Items in the order they were added.
    pub fn items(&self) -> &[TableItem] {
        &self.items
    }

    /// Rolls on the table and returns the text drawn.
    ///
    /// 1. Roll the dice, add the modifier and clamp into the dice's range.
    /// 2. Every item matching that value contributes its text.
    /// 3. If the value is in the reroll set, roll the reroll dice (no
    ///    modifier, no clamping) and every item matching the new value
    ///    contributes its text too.
    /// 4. The first item matching the final value runs its action, if it has one.
    ///
    /// The contributions are joined with `"; "`. A roll matching no item yields
    /// an empty string.
    ///
    /// # Errors
    /// Only actions can fail, e.g. with [`Error::UnknownTable`] when they refer
    /// to a table missing from `registry`.
    pub fn roll(&self, registry: &TableRegistry, rng: &mut dyn RandomSource) -> Result<String, Error> {
        let rolled = self.dice.roll(rng).sum();
        let mut n = rolled.saturating_add(self.modifier).clamp(self.dice.min(), self.dice.max());

        let mut parts: Vec<String> = self.matching(n).map(|item| item.text.clone()).collect();

        if let Some(reroll) = self.reroll.as_ref().filter(|reroll| reroll.matches.contains(n)) {
            n = reroll.dice.roll(rng).sum();
            parts.extend(self.matching(n).map(|item| item.text.clone()));
        }

        if let Some(action) = self.matching(n).next().and_then(|item| item.action.as_ref()) {
            parts.push(action.call(registry, rng)?);
        }

        let text = parts.join("; ");
        debug!("table {} rolled {rolled} -> {n}: {text}", self.id);
        Ok(text)
    }

    fn matching(&self, n: i64) -> impl Iterator<Item = &TableItem> {
        self.items.iter().filter(move |item| item.matches.contains(n))
    }
}


/// A builder for [`Table`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
    table: Table
}

impl TableBuilder {
    fn new(id: String, dice: Dice) -> Self {
        Self {
            table: Table {
                id,
                name: String::new(),
                dice,
                modifier: 0,
                reroll: None,
                items: Vec::new()
            }
        }
    }

    /// Sets the display name.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.table.name = name.into();
        self
    }

    /// Added to every roll before clamping.
    pub fn modifier(mut self, modifier: i64) -> Self {
        self.table.modifier = modifier;
        self
    }

    /// Rolls `dice` again when the clamped first roll is in `matches`.
    pub fn reroll<M: Into<MatchSet>>(mut self, matches: M, dice: Dice) -> Self {
        self.table.reroll = Some(Reroll { matches: matches.into(), dice });
        self
    }

    /// Appends one item.
    pub fn item(mut self, item: TableItem) -> Self {
        self.table.items.push(item);
        self
    }

    /// Appends several items.
    pub fn items<I: IntoIterator<Item = TableItem>>(mut self, items: I) -> Self {
        self.table.items.extend(items);
        self
    }

    /// Finishes the table.
    pub fn build(self) -> Table {
        self.table
    }
}


/// A named list of strings, drawn from with equal probability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct List {
    name: String,
    items: Vec<String>
}

impl List {
    /// A list with a display name.
    pub fn new<S: Into<String>>(name: S, items: Vec<String>) -> Self {
        Self { name: name.into(), items }
    }

    /// The display name.
    pub fn label(&self) -> &str {
        &self.name
    }

    /// The entries drawn from.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// A random item, or an empty string if the list is empty.
    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> String {
        if self.items.is_empty() {
            return String::new();
        }

        self.items[rng.index(self.items.len()) % self.items.len()].clone()
    }
}

impl Display for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.items.join(", "))
    }
}
