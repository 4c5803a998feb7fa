//! Order book store module.
//!
//! This module provides the [`OrderBookStore`], the keyed collection of resting
//! orders that the feed mutates through [`OrderBookStore::apply`].
//!
//! ## Atomicity
//!
//! The book lives behind an `Arc`. Readers take a [`BookSnapshot`] and keep a
//! consistent view for as long as they hold it. `apply` takes `&mut self`, so
//! there is exactly one writer, and it mutates through `Arc::make_mut`: a held
//! snapshot forces a copy, so a reader only ever sees the book as it was
//! before or after a whole operation.

use super::operation::{Action, DataRow, Operation};
use super::record::OrderRecord;
use crate::error::Result;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Resting orders indexed by feed id.
///
/// The id space is shared by every symbol: at most one record per id.
pub type BookMap = HashMap<u64, OrderRecord>;

/// Immutable view of the book at one point in the stream.
pub type BookSnapshot = Arc<BookMap>;

/// Keyed store of resting orders, mutated one operation at a time.
#[derive(Debug, Clone, Default)]
pub struct OrderBookStore {
    /// Current book.
    book: BookSnapshot,
    /// Incremented once per applied operation.
    generation: u64,
}

impl OrderBookStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one feed operation.
    ///
    /// Never fails: operations on other tables are ignored, unknown actions and
    /// operations without `data` are logged and ignored, and rows that do not
    /// decode or miss a required field are skipped individually.
    ///
    /// Returns the action that was applied, or `None` if the operation was ignored.
    pub fn apply(&mut self, operation: &Operation) -> Option<Action> {
        match self.try_apply(operation) {
            Ok(action) => Some(action),
            Err(crate::Error::UnknownTable { table }) => {
                debug!(%table, "ignoring operation for unmaintained table");
                None
            }
            Err(err) => {
                warn!(table = %operation.table, action = %operation.action, "{err}");
                None
            }
        }
    }

    /// Applies one feed operation, reporting why it was ignored.
    ///
    /// The store is left untouched whenever this returns an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownTable`, `Error::UnknownAction` or
    /// `Error::MalformedMessage` (no `data`) without mutating the store.
    pub fn try_apply(&mut self, operation: &Operation) -> Result<Action> {
        operation.table()?;
        let action = operation.action()?;
        let data = operation.rows()?;

        let book = Arc::make_mut(&mut self.book);
        match action {
            Action::Partial => apply_partial(book, data),
            Action::Insert => apply_insert(book, data),
            Action::Update => apply_update(book, data),
            Action::Delete => apply_delete(book, data),
        }
        self.generation += 1;

        Ok(action)
    }

    /// Returns a consistent snapshot of the book.
    #[must_use]
    pub fn snapshot(&self) -> BookSnapshot {
        Arc::clone(&self.book)
    }

    /// Returns a reference to the current book.
    #[must_use]
    pub fn book(&self) -> &BookMap {
        &self.book
    }

    /// Returns the number of operations applied so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the record with the given id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&OrderRecord> {
        self.book.get(&id)
    }

    /// Returns true if a record with the given id exists.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.book.contains_key(&id)
    }

    /// Returns the total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.book.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.book.is_empty()
    }

    /// Returns the number of records for a symbol.
    #[must_use]
    pub fn order_count(&self, symbol: &str) -> usize {
        self.book.values().filter(|r| r.symbol == symbol).count()
    }

    /// Returns all symbols present in the store (sorted).
    pub fn symbols(&self) -> Vec<String> {
        self.book
            .values()
            .map(|r| r.symbol.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        if !self.book.is_empty() {
            self.book = BookSnapshot::default();
            self.generation += 1;
        }
    }
}

/// Replaces the state of every symbol the snapshot covers.
///
/// A symbol named only by a row that is later skipped is still cleared.
fn apply_partial(book: &mut BookMap, data: &[DataRow]) {
    let symbols: HashSet<&str> = data.iter().filter_map(DataRow::symbol).collect();

    let before = book.len();
    book.retain(|_, record| !symbols.contains(record.symbol.as_str()));
    let cleared = before - book.len();

    let mut seeded = 0usize;
    for row in data {
        match row
            .fragment()
            .and_then(|fragment| OrderRecord::from_fragment(fragment, "partial"))
        {
            Ok(record) => {
                book.insert(record.id, record);
                seeded += 1;
            }
            Err(err) => warn!("skipping snapshot row: {err}"),
        }
    }

    debug!(
        symbols = ?symbols,
        cleared,
        seeded,
        "applied orderbook snapshot"
    );
}

fn apply_insert(book: &mut BookMap, data: &[DataRow]) {
    for row in data {
        match row
            .fragment()
            .and_then(|fragment| OrderRecord::from_fragment(fragment, "insert"))
        {
            Ok(record) => {
                book.insert(record.id, record);
            }
            Err(err) => warn!("skipping insert: {err}"),
        }
    }
}

/// Updates for ids that are not resting are dropped.
fn apply_update(book: &mut BookMap, data: &[DataRow]) {
    for row in data {
        let fragment = match row.fragment() {
            Ok(fragment) => fragment,
            Err(err) => {
                warn!("skipping update: {err}");
                continue;
            }
        };
        let Some(id) = fragment.id else {
            warn!("skipping update without id");
            continue;
        };
        match book.get_mut(&id) {
            Some(existing) => existing.merge(fragment),
            None => trace!(id, "update for unknown id dropped"),
        }
    }
}

fn apply_delete(book: &mut BookMap, data: &[DataRow]) {
    for row in data {
        match row.fragment() {
            Ok(fragment) => {
                if let Some(id) = fragment.id {
                    book.remove(&id);
                }
            }
            Err(err) => warn!("skipping delete: {err}"),
        }
    }
}
