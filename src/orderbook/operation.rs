//! Feed operations.
//!
//! An [`Operation`] is one `table`/`action`/`data` unit as published by the
//! realtime feed. The table and action stay raw strings on the wire shape so a
//! frame with an unfamiliar value still deserializes; [`Operation::table`] and
//! [`Operation::action`] classify them.
//!
//! Rows are decoded one by one into [`DataRow`]s, so a single row with a bad
//! field type is kept as raw JSON instead of failing the whole frame.

use super::record::RecordFragment;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Order book tables the engine maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Table {
    /// Full-depth level-2 book.
    #[serde(rename = "orderBookL2")]
    OrderBookL2,
    /// Top 25 levels of the level-2 book.
    #[default]
    #[serde(rename = "orderBookL2_25")]
    OrderBookL2_25,
}

impl Table {
    /// Returns the feed name of the table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderBookL2 => "orderBookL2",
            Self::OrderBookL2_25 => "orderBookL2_25",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "orderBookL2" => Ok(Self::OrderBookL2),
            "orderBookL2_25" => Ok(Self::OrderBookL2_25),
            other => Err(Error::unknown_table(other)),
        }
    }
}

/// Merge semantics of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Authoritative snapshot for the symbols it contains.
    Partial,
    /// Insert or replace by id.
    Insert,
    /// Shallow merge onto an existing id.
    Update,
    /// Remove by id.
    Delete,
}

impl Action {
    /// Returns the feed name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Partial => "partial",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "partial" => Ok(Self::Partial),
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(Error::unknown_action(other)),
        }
    }
}

/// One element of an operation's `data` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataRow {
    /// Row that decoded into a fragment.
    Fragment(RecordFragment),
    /// Row that did not, kept verbatim.
    Rejected(Value),
}

impl DataRow {
    /// Returns the decoded fragment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` with the decoding failure for a rejected row.
    pub fn fragment(&self) -> Result<&RecordFragment> {
        match self {
            Self::Fragment(fragment) => Ok(fragment),
            Self::Rejected(value) => Err(
                match serde_json::from_value::<RecordFragment>(value.clone()) {
                    Err(err) => err.into(),
                    Ok(_) => Error::malformed(format!("unreadable row {value}")),
                },
            ),
        }
    }

    /// Returns the symbol the row names, if it is readable.
    ///
    /// Rejected rows are searched for a string `symbol` key.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Self::Fragment(fragment) => fragment.symbol.as_deref(),
            Self::Rejected(value) => value.get("symbol").and_then(Value::as_str),
        }
    }

    /// Returns true if the row did not decode.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl From<RecordFragment> for DataRow {
    fn from(fragment: RecordFragment) -> Self {
        Self::Fragment(fragment)
    }
}

/// One unit of work from the feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Table name.
    #[serde(default)]
    pub table: String,
    /// Action name.
    #[serde(default)]
    pub action: String,
    /// Rows, all sharing the action's semantics.
    #[serde(default)]
    pub data: Option<Vec<DataRow>>,
}

impl Operation {
    /// Creates an operation.
    pub fn new(table: Table, action: Action, data: Vec<RecordFragment>) -> Self {
        Self {
            table: table.as_str().to_string(),
            action: action.as_str().to_string(),
            data: Some(data.into_iter().map(DataRow::from).collect()),
        }
    }

    /// Creates a `partial` snapshot on the top-25 table.
    #[must_use]
    pub fn partial(data: Vec<RecordFragment>) -> Self {
        Self::new(Table::OrderBookL2_25, Action::Partial, data)
    }

    /// Creates an `insert` on the top-25 table.
    #[must_use]
    pub fn insert(data: Vec<RecordFragment>) -> Self {
        Self::new(Table::OrderBookL2_25, Action::Insert, data)
    }

    /// Creates an `update` on the top-25 table.
    #[must_use]
    pub fn update(data: Vec<RecordFragment>) -> Self {
        Self::new(Table::OrderBookL2_25, Action::Update, data)
    }

    /// Creates a `delete` on the top-25 table.
    #[must_use]
    pub fn delete(data: Vec<RecordFragment>) -> Self {
        Self::new(Table::OrderBookL2_25, Action::Delete, data)
    }

    /// Parses an operation from a JSON frame.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the frame is not a JSON object of the expected shape.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Classifies the table.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownTable` for any table other than the two level-2 tables.
    pub fn table(&self) -> Result<Table> {
        self.table.parse()
    }

    /// Classifies the action.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAction` for any action other than
    /// `partial`, `insert`, `update` or `delete`.
    pub fn action(&self) -> Result<Action> {
        self.action.parse()
    }

    /// Returns the rows.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedMessage` if the operation carries no `data` array.
    pub fn rows(&self) -> Result<&[DataRow]> {
        self.data
            .as_deref()
            .ok_or_else(|| Error::malformed(format!("{} operation without data", self.action)))
    }

    /// Returns a copy of this operation retargeted at another table.
    #[must_use]
    pub fn on_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Returns a copy of this operation with one more raw row appended.
    #[must_use]
    pub fn with_raw_row(mut self, row: Value) -> Self {
        self.data.get_or_insert_with(Vec::new).push(DataRow::Rejected(row));
        self
    }

    /// Returns a copy of this operation with another action name.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }
}
