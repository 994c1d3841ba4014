//! Document entries.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::value::{resolve_index, Kind, Sequence, Value};

/// A key-addressable document entry: a [`Value`] that may also be an array of tables.
///
/// Every [`Value`] method is available through `Deref`. For [`Kind::ArrayOfTables`]
/// the payload is a sequence of nested [`Document`]s, one per `[[name]]` header.
///
/// # Examples
///
/// ```rust
/// use toml_layout::{parse, Kind};
///
/// let doc = parse(b"[[a]]\nx = 1\n[[a]]\nx = 2\n").unwrap();
/// let a = doc.get("a").unwrap();
/// assert_eq!(a.kind(), Some(Kind::ArrayOfTables));
/// assert_eq!(a.len(), 2);
/// assert_eq!(a.table(-1).and_then(|t| t.get("x")).and_then(|x| x.as_integer()), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Item {
    value: Value,
    tables: Vec<Document>,
}

impl Item {
    /// Creates a kind-less item.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `[table]` declaration.
    #[must_use]
    pub fn table_name() -> Self {
        Item {
            value: Value::with_kind(Kind::TableName),
            tables: Vec::new(),
        }
    }

    /// Creates an empty array of tables.
    #[must_use]
    pub fn array_of_tables() -> Self {
        Item {
            value: Value::with_kind(Kind::ArrayOfTables),
            tables: Vec::new(),
        }
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Element count: tables for an array of tables, elements for an array.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.kind() == Some(Kind::ArrayOfTables) {
            self.tables.len()
        } else {
            self.value.len()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nested documents of an array of tables.
    #[must_use]
    pub fn tables(&self) -> &[Document] {
        &self.tables
    }

    /// Nested document at `idx`; negative indexes count from the end.
    #[must_use]
    pub fn table(&self, idx: isize) -> Option<&Document> {
        self.tables.get(resolve_index(idx, self.tables.len())?)
    }

    pub fn table_mut(&mut self, idx: isize) -> Option<&mut Document> {
        let i = resolve_index(idx, self.tables.len())?;
        self.tables.get_mut(i)
    }

    /// Appends a nested document, turning a kind-less item into an array of tables.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if the item already has another kind.
    pub fn push_table(&mut self, table: Document) -> Result<()> {
        match self.kind() {
            None => self.value = Value::with_kind(Kind::ArrayOfTables),
            Some(Kind::ArrayOfTables) => {}
            Some(kind) => {
                return Err(Error::not_supported(format!("cannot add a table to {kind}")));
            }
        }
        self.tables.push(table);
        Ok(())
    }

    /// Removes and returns the nested document at `idx`.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if the item is not an array of tables and
    /// [`Error::OutOfRange`] if `idx` does not resolve to an element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_layout::parse;
    ///
    /// let mut doc = parse(b"[[p]]\nn = 1\n[[p]]\nn = 2\n[[p]]\nn = 3\n").unwrap();
    /// let p = doc.get_mut("p").unwrap();
    /// let removed = p.remove_table(-2).unwrap();
    /// assert_eq!(removed.get("n").and_then(|n| n.as_integer()), Some(2));
    /// assert_eq!(p.len(), 2);
    /// assert!(p.remove_table(5).is_err());
    /// ```
    pub fn remove_table(&mut self, idx: isize) -> Result<Document> {
        if self.kind() != Some(Kind::ArrayOfTables) {
            return Err(Error::not_supported(format!(
                "cannot remove a table from {}",
                self.kind().map_or("a kind-less item", |k| k.as_str())
            )));
        }
        let i = resolve_index(idx, self.tables.len()).ok_or_else(|| {
            Error::out_of_range(format!("table index {idx} of {}", self.tables.len()))
        })?;
        Ok(self.tables.remove(i))
    }

    pub(crate) fn last_table_mut(&mut self) -> Option<&mut Document> {
        self.tables.last_mut()
    }

    pub(crate) fn stamp_deep(&mut self, seq: &Sequence) {
        self.value.stamp_deep(seq);
    }
}

impl Deref for Item {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.value
    }
}

impl DerefMut for Item {
    fn deref_mut(&mut self) -> &mut Value {
        &mut self.value
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item {
            value,
            tables: Vec::new(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
