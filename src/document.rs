//! The document model.
//!
//! A [`Document`] is a flat, insertion-ordered map from dotted key paths to
//! [`Item`]s. Table declarations live in the same map as the values they own:
//! `[server]` is the entry `server` of kind [`Kind::TableName`] and `port = 80`
//! below it is the entry `server.port`. Each element of an array of tables is a
//! nested `Document` whose paths are relative to the array's own path.
//!
//! Entries carry an insertion index drawn from the document's [`Sequence`]; the
//! serializer uses it to reproduce declaration order.
//!
//! ## Examples
//!
//! ```rust
//! use toml_layout::{Document, Kind};
//!
//! let mut doc: Document = "[server]\nhost = \"localhost\"\nport = 80\n".parse().unwrap();
//! assert_eq!(doc.get("server").and_then(|s| s.kind()), Some(Kind::TableName));
//!
//! let server = doc.fetch("server");
//! assert_eq!(server.len(), 2);
//! assert_eq!(server.get("port").and_then(|p| p.as_integer()), Some(80));
//!
//! doc.set("server.port", 8080).unwrap();
//! assert_eq!(doc.to_string(), "[server]\n\thost = \"localhost\"\n\tport = 8080\n");
//! ```

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::item::Item;
use crate::recognizer::{is_newline, is_whitespace};
use crate::scanner::Rune;
use crate::value::{Comments, Kind, Sequence, Value};

/// A parsed or programmatically built document.
///
/// Equality compares entries, header comments and tail comments; the order
/// sequence and map iteration order are ignored.
///
/// A `Document` is a plain value with no interior locking. Views returned by
/// [`Document::fetch`] and [`Document::fetch_mut`] borrow it, so writes cannot
/// overlap a live view.
#[derive(Clone, Debug, Default)]
pub struct Document {
    entries: IndexMap<String, Item>,
    header: Comments,
    tail: Option<String>,
    seq: Sequence,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.header == other.header && self.tail == other.tail
    }
}

impl Document {
    /// Creates an empty document with a fresh sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document that numbers its entries from `seq`.
    #[must_use]
    pub fn with_sequence(seq: Sequence) -> Self {
        Document {
            seq,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sequence(&self) -> &Sequence {
        &self.seq
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Item> {
        self.entries.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut Item> {
        self.entries.get_mut(path)
    }

    #[must_use]
    pub fn contains_key(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of entries, table declarations included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries sorted by insertion index.
    #[must_use]
    pub fn ordered(&self) -> Vec<(&str, &Item)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|(_, item)| item.order());
        entries
    }

    /// Comments of the `[[name]]` header that opened this document, when it is
    /// an element of an array of tables.
    #[must_use]
    pub fn header(&self) -> &Comments {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Comments {
        &mut self.header
    }

    /// Comments that follow the last entry.
    #[must_use]
    pub fn tail(&self) -> Option<&str> {
        self.tail.as_deref()
    }

    pub fn set_tail(&mut self, tail: Option<String>) {
        self.tail = tail;
    }

    /// Entries below `prefix`, keyed relative to it.
    ///
    /// `prefix` is treated as if it ended in `.`; an empty prefix selects every
    /// entry. The entry equal to `prefix` and kind-less entries are skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_layout::parse;
    ///
    /// let doc = parse(b"[a]\nx = 1\n[a.b]\ny = 2\n").unwrap();
    /// let a = doc.fetch("a");
    /// let mut keys: Vec<_> = a.keys().collect();
    /// keys.sort();
    /// assert_eq!(keys, ["b", "b.y", "x"]);
    /// assert_eq!(a.fetch("b").get("y").and_then(|y| y.as_integer()), Some(2));
    /// ```
    #[must_use]
    pub fn fetch(&self, prefix: &str) -> Fetch<'_> {
        let entries = self
            .entries
            .iter()
            .filter(|(_, item)| item.is_valid())
            .filter_map(|(k, item)| relative(k, prefix).map(|rel| (rel, item)))
            .collect();
        Fetch { entries }
    }

    /// Mutable counterpart of [`Document::fetch`].
    pub fn fetch_mut(&mut self, prefix: &str) -> FetchMut<'_> {
        let entries = self
            .entries
            .iter_mut()
            .filter(|(_, item)| item.is_valid())
            .filter_map(|(k, item)| relative(k, prefix).map(|rel| (rel, item)))
            .collect();
        FetchMut { entries }
    }

    /// Paths of `[table]` declarations and of arrays of tables, each sorted by
    /// insertion index.
    #[must_use]
    pub fn table_names(&self) -> (Vec<&str>, Vec<&str>) {
        let mut tables = Vec::new();
        let mut arrays = Vec::new();
        for (path, item) in self.ordered() {
            match item.kind() {
                Some(Kind::TableName) => tables.push(path),
                Some(Kind::ArrayOfTables) => arrays.push(path),
                _ => {}
            }
        }
        (tables, arrays)
    }

    /// Stores a scalar or array at `path`.
    ///
    /// An existing entry keeps its comments and insertion index and must accept
    /// the new value's kind; a new entry is numbered from the document sequence.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] when `path` names a table or the kinds differ,
    /// [`Error::InvalidFormat`] when `path` could not be written as a key.
    pub fn set<T: Into<Value>>(&mut self, path: &str, value: T) -> Result<()> {
        check_key(path)?;
        let seq = self.seq.clone();
        match self.entries.get_mut(path) {
            Some(item) => {
                if item.kind().is_some_and(Kind::is_table) {
                    return Err(Error::not_supported(format!("`{path}` is a table")));
                }
                item.set(value)?;
                item.stamp_deep(&seq);
            }
            None => {
                let mut item = Item::new();
                item.set(value)?;
                item.stamp_deep(&seq);
                self.entries.insert(path.to_string(), item);
            }
        }
        Ok(())
    }

    /// Appends an element to the array at `path`, creating the array if needed.
    /// A rejected element leaves the document unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] when the element does not fit the array,
    /// [`Error::InvalidFormat`] when `path` could not be written as a key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_layout::{Document, Kind};
    ///
    /// let mut doc = Document::new();
    /// doc.add("ports", 80).unwrap();
    /// doc.add("ports", 443).unwrap();
    /// assert_eq!(doc.get("ports").and_then(|p| p.kind()), Some(Kind::IntegerArray));
    /// assert!(doc.add("ports", "http").is_err());
    /// assert_eq!(doc.to_string(), "ports = [80, 443]\n");
    /// ```
    pub fn add<T: Into<Value>>(&mut self, path: &str, element: T) -> Result<()> {
        check_key(path)?;
        let seq = self.seq.clone();
        match self.entries.get_mut(path) {
            Some(item) => {
                item.add(element)?;
                item.stamp_deep(&seq);
            }
            None => {
                let mut item = Item::from(Value::array());
                item.add(element)?;
                item.stamp_deep(&seq);
                self.entries.insert(path.to_string(), item);
            }
        }
        Ok(())
    }

    /// Declares `[path]`.
    ///
    /// # Errors
    ///
    /// [`Error::Redeclared`] if `path` already exists, [`Error::InvalidFormat`]
    /// when `path` could not be written as a header.
    pub fn declare_table(&mut self, path: &str) -> Result<()> {
        check_header(path)?;
        if self.entries.contains_key(path) {
            return Err(Error::redeclared(path));
        }
        let mut item = Item::table_name();
        item.stamp(&self.seq);
        self.entries.insert(path.to_string(), item);
        Ok(())
    }

    /// Appends a new element to the array of tables at `path` and returns it.
    ///
    /// # Errors
    ///
    /// [`Error::Redeclared`] if `path` holds anything but an array of tables,
    /// [`Error::InvalidFormat`] when `path` could not be written as a header.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_layout::Document;
    ///
    /// let mut doc = Document::new();
    /// doc.push_table("fruit").unwrap().set("name", "apple").unwrap();
    /// doc.push_table("fruit").unwrap().set("name", "pear").unwrap();
    /// assert_eq!(doc.get("fruit").map(|f| f.len()), Some(2));
    /// assert_eq!(
    ///     doc.to_string(),
    ///     "[[fruit]]\n\tname = \"apple\"\n\n[[fruit]]\n\tname = \"pear\"\n"
    /// );
    /// ```
    pub fn push_table(&mut self, path: &str) -> Result<&mut Document> {
        check_header(path)?;
        let seq = self.seq.clone();
        let item = self
            .entries
            .entry(path.to_string())
            .or_insert_with(Item::array_of_tables);
        if item.kind() != Some(Kind::ArrayOfTables) {
            return Err(Error::redeclared(path));
        }
        item.stamp(&seq);
        item.push_table(Document::with_sequence(seq))?;
        item.last_table_mut()
            .ok_or_else(|| Error::internal("array of tables lost its new element"))
    }

    /// Removes the element at `idx` of the array of tables at `path`.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if `path` is missing or not an array of tables and
    /// [`Error::OutOfRange`] if `idx` does not resolve.
    pub fn remove_table(&mut self, path: &str, idx: isize) -> Result<Document> {
        self.entries
            .get_mut(path)
            .ok_or_else(|| Error::not_supported(format!("no entry `{path}`")))?
            .remove_table(idx)
    }

    /// Inserts a prepared item, numbering it if it has no index yet.
    pub fn insert(&mut self, path: &str, mut item: Item) -> Option<Item> {
        item.stamp_deep(&self.seq);
        self.entries.insert(path.to_string(), item)
    }

    /// Removes the entry at `path`, keeping the order of the others.
    pub fn remove(&mut self, path: &str) -> Option<Item> {
        self.entries.shift_remove(path)
    }

    pub(crate) fn insert_raw(&mut self, path: String, item: Item) {
        self.entries.insert(path, item);
    }
}

/// Strips `prefix.` from `key`; `None` when `key` is not strictly below `prefix`.
fn relative<'k>(key: &'k str, prefix: &str) -> Option<&'k str> {
    if prefix.is_empty() {
        return Some(key);
    }
    let rest = key.strip_prefix(prefix)?;
    let rest = if prefix.ends_with('.') {
        rest
    } else {
        rest.strip_prefix('.')?
    };
    (!rest.is_empty()).then_some(rest)
}

/// Rejects paths that would not read back as a `key = value` line.
fn check_key(path: &str) -> Result<()> {
    check_path(path)?;
    if path.starts_with(['#', '[']) {
        return Err(Error::invalid_format(format!("`{path}` would not parse as a key")));
    }
    Ok(())
}

/// Rejects paths that would not read back as a `[path]` header.
fn check_header(path: &str) -> Result<()> {
    check_path(path)?;
    if path.starts_with('[') || path.contains(']') {
        return Err(Error::invalid_format(format!("`{path}` would not parse as a header")));
    }
    Ok(())
}

fn check_path(path: &str) -> Result<()> {
    if path.split('.').any(str::is_empty) {
        return Err(Error::invalid_format(format!("empty segment in `{path}`")));
    }
    if path
        .chars()
        .map(Rune::Char)
        .any(|r| is_whitespace(r) || is_newline(r) || r.is('='))
    {
        return Err(Error::invalid_format(format!("`{path}` contains a separator")));
    }
    Ok(())
}

/// Read-only view of the entries below a prefix.
#[derive(Clone, Debug, Default)]
pub struct Fetch<'a> {
    entries: IndexMap<&'a str, &'a Item>,
}

impl<'a> Fetch<'a> {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Item> {
        self.entries.get(key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Item)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    /// Narrows the view further.
    #[must_use]
    pub fn fetch(&self, prefix: &str) -> Fetch<'a> {
        let entries = self
            .entries
            .iter()
            .filter_map(|(k, item)| relative(*k, prefix).map(|rel| (rel, *item)))
            .collect();
        Fetch { entries }
    }
}

/// Mutable view of the entries below a prefix.
#[derive(Debug, Default)]
pub struct FetchMut<'a> {
    entries: IndexMap<&'a str, &'a mut Item>,
}

impl<'a> FetchMut<'a> {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.entries.get(key).map(|item| &**item)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Item> {
        self.entries.get_mut(key).map(|item| &mut **item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&'a str, &mut Item)> + '_ {
        self.entries.iter_mut().map(|(k, v)| (*k, &mut **v))
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parse(s.as_bytes())
    }
}

/// Formats with the default [`FormatOptions`](crate::FormatOptions).
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative() {
        assert_eq!(relative("a.b", "a"), Some("b"));
        assert_eq!(relative("a.b", "a."), Some("b"));
        assert_eq!(relative("a", "a"), None);
        assert_eq!(relative("ab.c", "a"), None);
        assert_eq!(relative("x", ""), Some("x"));
    }

    #[test]
    fn test_fetch_skips_kindless_entries() {
        let mut doc = Document::new();
        doc.set("t.a", 1).unwrap();
        doc.insert_raw("t.b".to_string(), Item::new());
        assert_eq!(doc.fetch("t").len(), 1);
        assert_eq!(doc.fetch("").len(), 1);
    }

    #[test]
    fn test_fetch_mut_writes_through() {
        let mut doc = Document::new();
        doc.set("db.port", 5432).unwrap();
        {
            let mut db = doc.fetch_mut("db");
            db.get_mut("port").unwrap().set(6543).unwrap();
        }
        assert_eq!(doc.get("db.port").and_then(|p| p.as_integer()), Some(6543));
    }

    #[test]
    fn test_set_keeps_order_and_comments() {
        let mut doc = Document::new();
        doc.set("a", 1).unwrap();
        doc.set("b", 2).unwrap();
        doc.get_mut("a").unwrap().comments.trailing = Some("# one".into());
        doc.set("a", 10).unwrap();
        let a = doc.get("a").unwrap();
        assert_eq!(a.order(), Some(1));
        assert_eq!(a.comments.trailing.as_deref(), Some("# one"));
        assert!(doc.set("a", "x").is_err());
    }

    #[test]
    fn test_rejected_add_leaves_no_entry() {
        let mut doc = Document::new();
        assert!(doc.add("p", f64::NAN).is_err());
        assert!(!doc.contains_key("p"));
        assert_eq!(doc.to_string(), "");

        doc.add("q", 1).unwrap();
        assert!(matches!(doc.add("q", "x"), Err(Error::NotSupported(_))));
        assert_eq!(doc.get("q").and_then(|q| q.as_integers()), Some(vec![1]));
    }

    #[test]
    fn test_paths_must_read_back() {
        let mut doc = Document::new();
        for path in ["a b", "", "a..b", "a.", "k=v", "tab\there", "line\nbreak", "#c", "[x"] {
            assert!(matches!(doc.set(path, 1), Err(Error::InvalidFormat(_))), "{path:?}");
            assert!(matches!(doc.add(path, 1), Err(Error::InvalidFormat(_))), "{path:?}");
        }
        for path in ["a b", "x]", "[x", "a..b"] {
            assert!(matches!(doc.declare_table(path), Err(Error::InvalidFormat(_))), "{path:?}");
            assert!(matches!(doc.push_table(path), Err(Error::InvalidFormat(_))), "{path:?}");
        }
        assert!(doc.is_empty());

        doc.set("a-b.c_d", 1).unwrap();
        doc.declare_table("t-1").unwrap();
        let again: Document = doc.to_string().parse().unwrap();
        assert_eq!(again.get("a-b.c_d").and_then(|v| v.as_integer()), Some(1));
        assert!(again.contains_key("t-1"));
    }

    #[test]
    fn test_tables_cannot_be_set() {
        let mut doc = Document::new();
        doc.declare_table("t").unwrap();
        assert!(matches!(doc.set("t", 1), Err(Error::NotSupported(_))));
        assert!(matches!(doc.declare_table("t"), Err(Error::Redeclared(_))));
        assert!(matches!(doc.push_table("t"), Err(Error::Redeclared(_))));
    }

    #[test]
    fn test_table_names_by_order() {
        let mut doc = Document::new();
        doc.declare_table("b").unwrap();
        doc.push_table("p").unwrap();
        doc.declare_table("a").unwrap();
        let (tables, arrays) = doc.table_names();
        assert_eq!(tables, ["b", "a"]);
        assert_eq!(arrays, ["p"]);
    }

    #[test]
    fn test_elements_share_the_sequence() {
        let mut doc = Document::new();
        doc.push_table("p").unwrap().set("x", 1).unwrap();
        doc.set("y", 2).unwrap();
        let x = doc.get("p").and_then(|p| p.table(0)).and_then(|t| t.get("x"));
        assert_eq!(x.and_then(|x| x.order()), Some(2));
        assert_eq!(doc.get("y").and_then(|y| y.order()), Some(3));
    }

    #[test]
    fn test_equality_ignores_map_order() {
        let mut a = Document::new();
        a.set("x", 1).unwrap();
        a.set("y", 2).unwrap();
        let mut b = Document::new();
        b.set("y", 2).unwrap();
        b.set("x", 1).unwrap();
        assert_eq!(a, b);
    }
}
