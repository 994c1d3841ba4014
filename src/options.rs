//! Configuration for parsing and formatting.
//!
//! - [`ParseOptions`]: array nesting limit and the order sequence used to number entries
//! - [`FormatOptions`]: indentation and whether comments are emitted
//!
//! ## Examples
//!
//! ```rust
//! use toml_layout::{parse_with_options, to_string_with_options, FormatOptions, Indent, ParseOptions};
//!
//! let options = ParseOptions::new().with_max_array_depth(3);
//! let doc = parse_with_options(b"[t]\nm = [[[1]]] # deep\n", &options).unwrap();
//!
//! let text = to_string_with_options(&doc, &FormatOptions::new().with_indent(Indent::Spaces(2)));
//! assert_eq!(text, "[t]\n  m = [[[1]]] # deep\n");
//!
//! let plain = to_string_with_options(&doc, &FormatOptions::plain());
//! assert_eq!(plain, "[t]\nm = [[[1]]]\n");
//! ```

use crate::value::Sequence;

/// Array nesting accepted by default.
pub const DEFAULT_MAX_ARRAY_DEPTH: usize = 2;

/// Options for [`parse_with_options`](crate::parse_with_options).
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Deepest array nesting accepted; `[[1]]` has depth 2.
    pub max_array_depth: usize,
    /// Sequence that numbers entries in declaration order. A fresh one is used when unset.
    pub sequence: Option<Sequence>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_array_depth: DEFAULT_MAX_ARRAY_DEPTH,
            sequence: None,
        }
    }
}

impl ParseOptions {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_layout::ParseOptions;
    ///
    /// let options = ParseOptions::new();
    /// assert_eq!(options.max_array_depth, 2);
    /// assert!(options.sequence.is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deepest array nesting accepted.
    #[must_use]
    pub fn with_max_array_depth(mut self, depth: usize) -> Self {
        self.max_array_depth = depth;
        self
    }

    /// Numbers entries from the given sequence instead of a fresh one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_layout::{parse_with_options, ParseOptions, Sequence};
    ///
    /// let seq = Sequence::starting_at(100);
    /// let doc = parse_with_options(b"a = 1", &ParseOptions::new().with_sequence(seq)).unwrap();
    /// assert_eq!(doc.get("a").and_then(|it| it.order()), Some(101));
    /// ```
    #[must_use]
    pub fn with_sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = Some(sequence);
        self
    }
}

/// Indentation unit used for nested tables and values.
///
/// # Examples
///
/// ```rust
/// use toml_layout::Indent;
///
/// assert_eq!(Indent::Tab.as_str(), "\t");
/// assert_eq!(Indent::Spaces(2).as_str(), "  ");
/// assert_eq!(Indent::None.as_str(), "");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(u8),
    None,
}

impl Indent {
    /// Returns one unit of indentation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        const SPACES: &str = "                ";
        match self {
            Indent::Tab => "\t",
            Indent::Spaces(n) => &SPACES[..usize::from(*n).min(SPACES.len())],
            Indent::None => "",
        }
    }
}

/// Options for [`to_string_with_options`](crate::to_string_with_options).
#[derive(Clone, Debug)]
pub struct FormatOptions {
    pub indent: Indent,
    /// Emit leading and trailing comments.
    pub comments: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            indent: Indent::default(),
            comments: true,
        }
    }
}

impl FormatOptions {
    /// Creates the layout-preserving defaults: tab indentation with comments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bare values without comments or indentation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_layout::{FormatOptions, Indent};
    ///
    /// let options = FormatOptions::plain();
    /// assert!(!options.comments);
    /// assert_eq!(options.indent, Indent::None);
    /// ```
    #[must_use]
    pub fn plain() -> Self {
        FormatOptions {
            indent: Indent::None,
            comments: false,
        }
    }

    /// Sets the indentation unit.
    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Enables or disables comment output.
    #[must_use]
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }
}
