//! # toml_layout
//!
//! A format-preserving parser and serializer for a TOML subset.
//!
//! Configuration files are written by people: they carry comments, a chosen
//! order of keys and an indentation that shows which table owns what. This crate
//! parses such files into an editable [`Document`] that remembers all of that,
//! and writes it back out with the comments in place and the entries in their
//! original declaration order.
//!
//! ## Supported syntax
//!
//! - `key = value` with string, integer, float, boolean and UTC datetime values
//! - homogeneous arrays, nested up to a configurable depth (2 by default)
//! - `[table]` and `[[array.of.tables]]` headers with dotted names
//! - `#` comments, both on their own lines and after a value or header
//!
//! ## Quick Start
//!
//! ```rust
//! use toml_layout::parse;
//!
//! let input = b"# service settings\nname = \"api\"\n\n[server]\nport = 8080 # default\n";
//! let mut doc = parse(input).unwrap();
//!
//! assert_eq!(doc.get("name").and_then(|v| v.as_str()), Some("api"));
//! assert_eq!(doc.get("server.port").and_then(|v| v.as_integer()), Some(8080));
//!
//! doc.set("server.port", 9090).unwrap();
//! assert_eq!(
//!     doc.to_string(),
//!     "# service settings\nname = \"api\"\n\n[server]\n\tport = 9090 # default\n"
//! );
//! ```
//!
//! ### Binding to structs
//!
//! ```rust
//! use serde::Deserialize;
//! use toml_layout::from_str;
//!
//! #[derive(Deserialize)]
//! struct Product {
//!     name: String,
//!     sku: i64,
//! }
//!
//! #[derive(Deserialize)]
//! struct Catalog {
//!     products: Vec<Product>,
//! }
//!
//! let catalog: Catalog = from_str(
//!     "[[products]]\nname = \"Hammer\"\nsku = 738594937\n\n[[products]]\nname = \"Nail\"\nsku = 284758393\n",
//! )
//! .unwrap();
//! assert_eq!(catalog.products[1].name, "Nail");
//! ```
//!
//! ## How parsing works
//!
//! Input is decoded rune by rune. At every point of the grammar a small set of
//! token recognizers race on the same runes; the first to confirm wins and moves
//! the grammar to its next [`Stage`]. Tokens are folded into the document as they
//! are produced, so a parse is a single pass with no backtracking.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - No panics on malformed input: every failure is an [`Error`] that carries the
//!   line, column and text of the offending line
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`round_trip.rs`** - parse a commented file and write it back unchanged
//! - **`edit_config.rs`** - change values and tables without losing comments
//! - **`bind_struct.rs`** - read a document into typed structs
//!
//! Run any example with: `cargo run --example <name>`

mod builder;
pub mod de;
pub mod document;
pub mod error;
pub mod item;
pub mod options;
mod recognizer;
mod scanner;
pub mod ser;
pub mod stage;
pub mod token;
pub mod value;

pub use de::from_document;
pub use document::{Document, Fetch, FetchMut};
pub use error::{Error, Result};
pub use item::Item;
pub use options::{FormatOptions, Indent, ParseOptions, DEFAULT_MAX_ARRAY_DEPTH};
pub use ser::Formatter;
pub use stage::{tokenize, Engine, Stage};
pub use token::TokenKind;
pub use value::{Comments, Kind, Sequence, Value};

use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::builder::Builder;

/// Parses a document with default options.
///
/// # Examples
///
/// ```rust
/// use toml_layout::{parse, Kind};
///
/// let doc = parse(b"key = [1, 2, 3]").unwrap();
/// let key = doc.get("key").unwrap();
/// assert_eq!(key.kind(), Some(Kind::IntegerArray));
/// assert_eq!(key.len(), 3);
/// assert_eq!(key.index(-1).and_then(|v| v.as_integer()), Some(3));
/// ```
///
/// # Errors
///
/// Returns an error positioned at the offending line and column when the input
/// is not valid UTF-8, does not follow the grammar, or redeclares an entry.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(input: &[u8]) -> Result<Document> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parses a document with custom options.
///
/// # Examples
///
/// ```rust
/// use toml_layout::{parse_with_options, Error, ParseOptions};
///
/// let flat = ParseOptions::new().with_max_array_depth(1);
/// let err = parse_with_options(b"m = [[1]]", &flat).unwrap_err();
/// assert!(matches!(err.root(), Error::NestingTooDeep(1)));
/// ```
///
/// # Errors
///
/// See [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(input: &[u8], options: &ParseOptions) -> Result<Document> {
    let seq = options.sequence.clone().unwrap_or_default();
    let mut builder = Builder::new(seq);
    Engine::new(input, options).run(|token, text| builder.push(token, text))?;
    builder.finish()
}

/// Reads and parses a file.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, otherwise see [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "loading document");
    parse(&bytes)
}

/// Formats a document with tab indentation and comments.
///
/// Same as `doc.to_string()`.
#[must_use]
pub fn to_string(doc: &Document) -> String {
    to_string_with_options(doc, &FormatOptions::default())
}

/// Formats a document with custom options.
///
/// # Examples
///
/// ```rust
/// use toml_layout::{parse, to_string_with_options, FormatOptions, Indent};
///
/// let doc = parse(b"[a]\nx = 1 # note\n").unwrap();
/// let options = FormatOptions::new().with_indent(Indent::Spaces(4)).with_comments(false);
/// assert_eq!(to_string_with_options(&doc, &options), "[a]\n    x = 1\n");
/// ```
#[must_use]
pub fn to_string_with_options(doc: &Document, options: &FormatOptions) -> String {
    ser::format(doc, options)
}

/// Formats a document into an I/O stream.
///
/// # Examples
///
/// ```rust
/// use toml_layout::{parse, to_writer, FormatOptions};
///
/// let doc = parse(b"a = true\n").unwrap();
/// let mut out = Vec::new();
/// to_writer(&mut out, &doc, &FormatOptions::default()).unwrap();
/// assert_eq!(out, b"a = true\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn to_writer<W>(mut writer: W, doc: &Document, options: &FormatOptions) -> Result<()>
where
    W: io::Write,
{
    writer.write_all(to_string_with_options(doc, options).as_bytes())?;
    Ok(())
}

/// Parses text and binds it to `T`.
///
/// # Examples
///
/// ```rust
/// use toml_layout::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x = 1\ny = 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input does not parse or does not match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice(s.as_bytes())
}

/// Parses bytes and binds them to `T`.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, do not parse, or do not
/// match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_document(&parse(v)?)
}

/// Reads an I/O stream to the end, then parses and binds it to `T`.
///
/// # Examples
///
/// ```rust
/// use toml_layout::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Flags { verbose: bool }
///
/// let flags: Flags = from_reader(Cursor::new(b"verbose = false\n")).unwrap();
/// assert!(!flags.verbose);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, otherwise see [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    from_slice(&bytes)
}
