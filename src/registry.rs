use std::collections::HashMap;
use log::{debug, warn};
use crate::{Error, RandomSource, Table};


/// Tables keyed by their id, for rolling by name and for cross-table actions.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: HashMap<String, Table>
}

impl TableRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table under its id.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateTable`] if the id is taken.
    pub fn add(&mut self, table: Table) -> Result<(), Error> {
        if self.tables.contains_key(table.id()) {
            warn!("table {} already registered", table.id());
            return Err(Error::DuplicateTable(table.id().to_string()));
        }

        debug!("registered table {}", table.id());
        self.tables.insert(table.id().to_string(), table);
        Ok(())
    }

    /// Unregisters and returns a table.
    ///
    /// # Errors
    /// Returns [`Error::UnknownTable`] if nothing is registered under `id`.
    pub fn remove(&mut self, id: &str) -> Result<Table, Error> {
        self.tables.remove(id)
            .ok_or_else(|| Error::UnknownTable(id.to_string()))
    }

    /// Borrows a registered table.
    ///
    /// # Errors
    /// Returns [`Error::UnknownTable`] if nothing is registered under `id`.
    pub fn get(&self, id: &str) -> Result<&Table, Error> {
        self.tables.get(id)
            .ok_or_else(|| Error::UnknownTable(id.to_string()))
    }

    /// Looks up a table and rolls on it through this registry.
    ///
    /// # Errors
    /// Returns [`Error::UnknownTable`] if the table, or one its actions
    /// refer to, is not registered.
    pub fn roll(&self, id: &str, rng: &mut dyn RandomSource) -> Result<String, Error> {
        self.get(id)?.roll(self, rng)
    }

    /// Whether a table is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    /// Number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no tables are registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// All registered tables, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::{Action, Dice, Die, Sequence, TableItem};


    fn table(id: &str) -> Table {
        Table::builder(id, Dice::new(1, Die::d6()).unwrap())
            .item(TableItem::new([1, 2, 3], format!("{id} low")))
            .item(TableItem::new([4, 5, 6], format!("{id} high")))
            .build()
    }

    #[test]
    fn test_add_and_get() {
        let mut registry = TableRegistry::new();
        registry.add(table("a")).unwrap();
        registry.add(table("b")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
        assert_eq!(registry.get("b").unwrap().id(), "b");
        assert_eq!(registry.iter().count(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = TableRegistry::new();
        registry.add(table("a")).unwrap();

        assert_eq!(registry.add(table("a")), Err(Error::DuplicateTable("a".into())));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut registry = TableRegistry::new();
        registry.add(table("a")).unwrap();

        assert_eq!(registry.remove("a").unwrap().id(), "a");
        assert!(registry.is_empty());
        assert_eq!(registry.remove("a").unwrap_err(), Error::UnknownTable("a".into()));
    }

    #[test]
    fn test_get_missing() {
        let registry = TableRegistry::new();

        assert_eq!(registry.get("ghost").unwrap_err(), Error::UnknownTable("ghost".into()));
        assert_eq!(
            registry.roll("ghost", &mut Sequence::new([0])).unwrap_err(),
            Error::UnknownTable("ghost".into())
        );
    }

    #[test]
    fn test_roll_by_id() {
        let mut registry = TableRegistry::new();
        registry.add(table("a")).unwrap();

        assert_eq!(registry.roll("a", &mut Sequence::faces([5])).unwrap(), "a high");
    }

    #[test]
    fn test_action_can_reroll_its_own_table() {
        let mut registry = TableRegistry::new();
        registry.add(
            Table::builder("parent", Dice::new(1, Die::d6()).unwrap())
                .item(TableItem::new([1], "Again").action(Action::reroll_on("parent")))
                .item(TableItem::new([2, 3, 4, 5, 6], "Done"))
                .build()
        ).unwrap();

        let text = registry.roll("parent", &mut Sequence::faces([1, 1, 4])).unwrap();
        assert_eq!(text, "Again; Again; Done");
    }
}
