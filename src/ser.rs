//! Document formatting.
//!
//! The [`Formatter`] renders a [`Document`] back to text. Entries are emitted in
//! declaration order, grouped under the table that owns them:
//!
//! - top-level values first, with their full dotted key
//! - then every `[table]` and `[[table]]` header, each preceded by a blank line
//! - values below a header are indented one level deeper than the header, and a
//!   header is indented once for every declared table above it
//!
//! Arrays stay on one line unless one of their elements carries a comment; such
//! arrays are broken into one element per line so the comments survive.
//!
//! ## Examples
//!
//! ```rust
//! use toml_layout::{parse, to_string_with_options, FormatOptions, Indent};
//!
//! let doc = parse(b"[a]\nx = 1\n[a.b]\ny = [1, # one\n 2]\n").unwrap();
//! let text = to_string_with_options(&doc, &FormatOptions::new().with_indent(Indent::Spaces(2)));
//! assert_eq!(
//!     text,
//!     "[a]\n  x = 1\n\n  [a.b]\n    y = [\n      1, # one\n      2,\n    ]\n"
//! );
//! ```

use serde::ser::{Error as _, Serialize, Serializer};

use crate::document::Document;
use crate::item::Item;
use crate::options::FormatOptions;
use crate::value::{Comments, Kind, Value};

/// Renders documents as text.
pub struct Formatter<'o> {
    output: String,
    options: &'o FormatOptions,
}

impl<'o> Formatter<'o> {
    #[must_use]
    pub fn new(options: &'o FormatOptions) -> Self {
        Formatter {
            output: String::with_capacity(256),
            options,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends the rendering of `doc`.
    pub fn format(&mut self, doc: &Document) {
        self.document(doc, "", 0);
    }

    /// Renders one document level. `prefix` is the header path of the array of
    /// tables element being rendered, empty at the root.
    fn document(&mut self, doc: &Document, prefix: &str, level: usize) {
        let ordered = doc.ordered();

        for (path, item) in &ordered {
            if is_value(item) && owner(doc, path).is_none() {
                self.entry(path, item, level);
            }
        }

        for (path, item) in &ordered {
            let full = join(prefix, path);
            let header_level = level + declared_prefixes(doc, path);
            match item.kind() {
                Some(Kind::TableName) => {
                    self.blank_line();
                    self.leading(&item.comments, header_level);
                    self.indent(header_level);
                    self.output.push('[');
                    self.output.push_str(&full);
                    self.output.push(']');
                    self.trailing(&item.comments);
                    self.output.push('\n');

                    for (key, owned) in &ordered {
                        if is_value(owned) && owner(doc, key) == Some(*path) {
                            self.entry(&key[path.len() + 1..], owned, header_level + 1);
                        }
                    }
                }
                Some(Kind::ArrayOfTables) => {
                    for element in item.tables() {
                        self.blank_line();
                        self.leading(element.header(), header_level);
                        self.indent(header_level);
                        self.output.push_str("[[");
                        self.output.push_str(&full);
                        self.output.push_str("]]");
                        self.trailing(element.header());
                        self.output.push('\n');
                        self.document(element, &full, header_level + 1);
                    }
                }
                _ => {}
            }
        }

        if let Some(tail) = doc.tail().filter(|_| self.options.comments) {
            self.blank_line();
            self.comment_lines(tail, level);
        }
    }

    fn entry(&mut self, key: &str, value: &Value, level: usize) {
        self.leading(&value.comments, level);
        self.indent(level);
        self.output.push_str(key);
        self.output.push_str(" = ");
        self.value(value, level);
        self.trailing(&value.comments);
        self.output.push('\n');
    }

    /// Writes a value whose first line is already started; a multi-line array
    /// closes at `level`.
    fn value(&mut self, value: &Value, level: usize) {
        match value.as_array() {
            Some(elements) if self.options.comments && value.has_element_comments() => {
                self.output.push_str("[\n");
                for element in elements {
                    self.leading(&element.comments, level + 1);
                    self.indent(level + 1);
                    self.value(element, level + 1);
                    self.output.push(',');
                    self.trailing(&element.comments);
                    self.output.push('\n');
                }
                self.indent(level);
                self.output.push(']');
            }
            _ => self.output.push_str(&value.to_literal()),
        }
    }

    fn leading(&mut self, comments: &Comments, level: usize) {
        if !self.options.comments {
            return;
        }
        if let Some(block) = &comments.leading {
            self.comment_lines(block, level);
        }
    }

    fn trailing(&mut self, comments: &Comments) {
        if !self.options.comments {
            return;
        }
        if let Some(comment) = &comments.trailing {
            self.output.push(' ');
            self.output.push_str(&as_comment(comment));
        }
    }

    fn comment_lines(&mut self, block: &str, level: usize) {
        for line in block.lines() {
            self.indent(level);
            self.output.push_str(&as_comment(line));
            self.output.push('\n');
        }
    }

    fn blank_line(&mut self) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
    }

    fn indent(&mut self, level: usize) {
        let unit = self.options.indent.as_str();
        for _ in 0..level {
            self.output.push_str(unit);
        }
    }
}

/// Renders `doc` with `options`.
pub(crate) fn format(doc: &Document, options: &FormatOptions) -> String {
    let mut formatter = Formatter::new(options);
    formatter.format(doc);
    formatter.into_inner()
}

/// Serializes the document as nested maps, the shape [`from_document`](crate::from_document)
/// binds from.
///
/// # Examples
///
/// ```rust
/// use toml_layout::parse;
///
/// let doc = parse(b"name = \"app\"\n[db]\nports = [1, 2]\n").unwrap();
/// let json = serde_json::to_string(&doc).unwrap();
/// assert_eq!(json, r#"{"name":"app","db":{"ports":[1,2]}}"#);
/// ```
impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let tree = crate::de::tree(self).map_err(S::Error::custom)?;
        serializer.collect_map(&tree)
    }
}

fn is_value(item: &Item) -> bool {
    item.kind().is_some_and(|k| !k.is_table())
}

/// Longest proper prefix of `path` declared as a `[table]`.
fn owner<'p>(doc: &Document, path: &'p str) -> Option<&'p str> {
    path.rmatch_indices('.')
        .map(|(i, _)| &path[..i])
        .find(|prefix| doc.get(prefix).and_then(|item| item.kind()) == Some(Kind::TableName))
}

/// Number of declared tables strictly above `path`.
fn declared_prefixes(doc: &Document, path: &str) -> usize {
    path.match_indices('.')
        .filter(|(i, _)| doc.get(&path[..*i]).is_some_and(|item| item.kind().is_some_and(Kind::is_table)))
        .count()
}

fn join(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{prefix}.{path}")
    }
}

fn as_comment(line: &str) -> String {
    let line = line.trim();
    if line.starts_with('#') {
        line.to_string()
    } else {
        format!("# {line}")
    }
}
