//! Values, kinds, comments and the order sequence.
//!
//! A [`Value`] starts *kind-less* and acquires its [`Kind`] on the first successful
//! [`Value::set`], [`Value::set_as`] or [`Value::add`]. From then on every write must
//! conform to that kind or it fails with [`Error::NotSupported`] and leaves the value
//! unchanged.
//!
//! ## Examples
//!
//! ```rust
//! use toml_layout::{Kind, Value};
//!
//! let mut v = Value::new();
//! assert_eq!(v.kind(), None);
//!
//! v.set(42).unwrap();
//! assert_eq!(v.kind(), Some(Kind::Integer));
//! assert!(v.set("text").is_err());
//! assert_eq!(v.as_integer(), Some(42));
//!
//! let mut arr = Value::array();
//! arr.add(1.5).unwrap();
//! arr.add(2.5).unwrap();
//! assert_eq!(arr.kind(), Some(Kind::FloatArray));
//! assert_eq!(arr.index(-1).and_then(Value::as_float), Some(2.5));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Timelike, Utc};

use crate::error::{Error, Result};

/// The closed set of value and declaration kinds.
///
/// The declaration order is significant: every kind between
/// [`Kind::StringArray`] and [`Kind::Array`] inclusive is array-like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
    StringArray,
    IntegerArray,
    FloatArray,
    BooleanArray,
    DatetimeArray,
    /// Array whose elements are themselves arrays, or an array not yet typed.
    Array,
    /// A `[table]` declaration; carries no payload.
    TableName,
    /// A `[[table]]` sequence of nested documents.
    ArrayOfTables,
}

impl Kind {
    #[must_use]
    pub fn is_scalar(self) -> bool {
        self < Kind::StringArray
    }

    #[must_use]
    pub fn is_array(self) -> bool {
        self >= Kind::StringArray && self <= Kind::Array
    }

    #[must_use]
    pub fn is_table(self) -> bool {
        self >= Kind::TableName
    }

    /// Element kind of a typed array.
    #[must_use]
    pub fn element(self) -> Option<Kind> {
        match self {
            Kind::StringArray => Some(Kind::String),
            Kind::IntegerArray => Some(Kind::Integer),
            Kind::FloatArray => Some(Kind::Float),
            Kind::BooleanArray => Some(Kind::Boolean),
            Kind::DatetimeArray => Some(Kind::Datetime),
            _ => None,
        }
    }

    /// Typed array kind holding elements of this scalar kind.
    #[must_use]
    pub fn array_of(self) -> Option<Kind> {
        match self {
            Kind::String => Some(Kind::StringArray),
            Kind::Integer => Some(Kind::IntegerArray),
            Kind::Float => Some(Kind::FloatArray),
            Kind::Boolean => Some(Kind::BooleanArray),
            Kind::Datetime => Some(Kind::DatetimeArray),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "String",
            Kind::Integer => "Integer",
            Kind::Float => "Float",
            Kind::Boolean => "Boolean",
            Kind::Datetime => "Datetime",
            Kind::StringArray => "StringArray",
            Kind::IntegerArray => "IntegerArray",
            Kind::FloatArray => "FloatArray",
            Kind::BooleanArray => "BooleanArray",
            Kind::DatetimeArray => "DatetimeArray",
            Kind::Array => "Array",
            Kind::TableName => "TableName",
            Kind::ArrayOfTables => "ArrayOfTables",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comments attached to an entity.
///
/// Both fields hold comment text as written, `#` included. A leading block keeps one
/// comment per line joined with `\n`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Comments {
    /// Comment lines placed above the entity.
    pub leading: Option<String>,
    /// Comment on the line that closes the entity.
    pub trailing: Option<String>,
}

impl Comments {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leading.is_none() && self.trailing.is_none()
    }

    /// Appends one line to the leading block.
    pub fn push_leading(&mut self, line: &str) {
        match &mut self.leading {
            Some(block) => {
                block.push('\n');
                block.push_str(line);
            }
            None => self.leading = Some(line.to_string()),
        }
    }
}

/// Monotonic source of insertion indexes.
///
/// Clones share the same counter, so every entity numbered from one sequence gets a
/// distinct index no matter which document or thread stamped it.
///
/// # Examples
///
/// ```rust
/// use toml_layout::Sequence;
///
/// let seq = Sequence::new();
/// let other = seq.clone();
/// assert_eq!(seq.next(), 1);
/// assert_eq!(other.next(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Sequence(Arc<AtomicU64>);

impl Sequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence whose next index is `start + 1`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Sequence(Arc::new(AtomicU64::new(start)))
    }

    /// Returns the next index.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The last index handed out.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum Data {
    #[default]
    None,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Datetime(DateTime<Utc>),
    Array(Vec<Value>),
}

/// A scalar, an array, or a table declaration marker.
///
/// Equality compares kind, payload and comments; the insertion index is ignored.
#[derive(Clone, Debug, Default)]
pub struct Value {
    kind: Option<Kind>,
    data: Data,
    pub comments: Comments,
    order: Option<u64>,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.data == other.data && self.comments == other.comments
    }
}

impl Value {
    /// Creates a kind-less value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty array that narrows to a typed array on its first scalar.
    #[must_use]
    pub fn array() -> Self {
        Value {
            kind: Some(Kind::Array),
            data: Data::Array(Vec::new()),
            ..Self::default()
        }
    }

    pub(crate) fn with_kind(kind: Kind) -> Self {
        Value {
            kind: Some(kind),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn kind(&self) -> Option<Kind> {
        self.kind
    }

    /// True once the value has a kind.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.kind.is_some()
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        self.kind.is_some_and(Kind::is_array)
    }

    /// Insertion index, assigned the first time the value is stored with a kind.
    #[must_use]
    pub fn order(&self) -> Option<u64> {
        self.order
    }

    /// Assigns an insertion index unless one is already set.
    pub fn stamp(&mut self, seq: &Sequence) {
        if self.order.is_none() {
            self.order = Some(seq.next());
        }
    }

    /// Stamps this value and every array element that has no index yet.
    pub(crate) fn stamp_deep(&mut self, seq: &Sequence) {
        self.stamp(seq);
        if let Data::Array(elements) = &mut self.data {
            for element in elements {
                element.stamp_deep(seq);
            }
        }
    }

    /// Stores `value`, fixing the kind if this value is kind-less.
    ///
    /// Comments and insertion index of `self` are kept.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if `value` is kind-less, a table marker, a non-finite
    /// float, or of a different kind than `self`.
    pub fn set<T: Into<Value>>(&mut self, value: T) -> Result<()> {
        let value = value.into();
        value.check()?;
        let kind = value
            .kind
            .ok_or_else(|| Error::not_supported("cannot set a kind-less value"))?;
        if kind.is_table() {
            return Err(Error::not_supported(format!("cannot set {kind} as a value")));
        }
        self.expect_kind(kind)?;
        self.kind = Some(kind);
        self.data = value.data;
        Ok(())
    }

    /// Parses `text` as a literal of `kind` and stores it.
    ///
    /// Strings are taken verbatim, integers must fit `i64`, booleans are `true` or
    /// `false` and datetimes are RFC 3339.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] on a kind mismatch or a non-scalar `kind`,
    /// [`Error::OutOfRange`] on integer overflow and [`Error::InvalidFormat`] on
    /// malformed text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_layout::{Error, Kind, Value};
    ///
    /// let mut v = Value::new();
    /// v.set_as("1979-05-27T07:32:00Z", Kind::Datetime).unwrap();
    /// assert_eq!(v.to_string(), "1979-05-27 07:32:00");
    ///
    /// let mut big = Value::new();
    /// let err = big.set_as("9223372036854775808", Kind::Integer).unwrap_err();
    /// assert!(matches!(err, Error::OutOfRange(_)));
    /// ```
    pub fn set_as(&mut self, text: &str, kind: Kind) -> Result<()> {
        self.expect_kind(kind)?;
        let data = match kind {
            Kind::String => Data::String(text.to_string()),
            Kind::Integer => Data::Integer(parse_integer(text)?),
            Kind::Float => Data::Float(
                text.parse()
                    .map_err(|_| Error::invalid_format(format!("`{text}` is not a float")))?,
            ),
            Kind::Boolean => match text {
                "true" => Data::Boolean(true),
                "false" => Data::Boolean(false),
                _ => return Err(Error::invalid_format(format!("`{text}` is not a boolean"))),
            },
            Kind::Datetime => Data::Datetime(
                DateTime::parse_from_rfc3339(text)
                    .map_err(|e| Error::invalid_format(format!("`{text}`: {e}")))?
                    .with_timezone(&Utc),
            ),
            _ => return Err(Error::not_supported(format!("cannot parse {kind} from text"))),
        };
        let parsed = Value {
            kind: Some(kind),
            data,
            ..Value::default()
        };
        parsed.check()?;
        self.kind = parsed.kind;
        self.data = parsed.data;
        Ok(())
    }

    /// Appends an element to an array.
    ///
    /// A typed array accepts only its element kind. An untyped [`Kind::Array`]
    /// accepts arrays, or narrows to a typed array when its first element is a scalar.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] if `self` is not an array or the element breaks
    /// homogeneity.
    pub fn add<T: Into<Value>>(&mut self, element: T) -> Result<()> {
        let element = element.into();
        element.check()?;
        let kind = self
            .kind
            .filter(|k| k.is_array())
            .ok_or_else(|| Error::not_supported(format!("cannot add to {}", describe(self.kind))))?;
        let elem = element
            .kind
            .filter(|k| !k.is_table())
            .ok_or_else(|| Error::not_supported(format!("cannot add {}", describe(element.kind))))?;

        let narrowed = match (kind, kind.element()) {
            (Kind::Array, _) if elem.is_array() => Kind::Array,
            (Kind::Array, _) if self.is_empty() => elem.array_of().unwrap_or(Kind::Array),
            (_, Some(expected)) if expected == elem => kind,
            _ => {
                return Err(Error::not_supported(format!("cannot add {elem} to {kind}")));
            }
        };

        self.kind = Some(narrowed);
        match &mut self.data {
            Data::Array(elements) => elements.push(element),
            data => *data = Data::Array(vec![element]),
        }
        Ok(())
    }

    fn expect_kind(&self, kind: Kind) -> Result<()> {
        match self.kind {
            Some(current) if current != kind => Err(Error::not_supported(format!(
                "cannot store {kind} in {current}"
            ))),
            _ => Ok(()),
        }
    }

    fn check(&self) -> Result<()> {
        match &self.data {
            Data::Float(f) if !f.is_finite() => {
                Err(Error::not_supported(format!("non-finite float {f}")))
            }
            Data::Array(elements) => elements.iter().try_for_each(Value::check),
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            Data::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self.data {
            Data::Integer(i) => Some(i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self.data {
            Data::Float(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            Data::Boolean(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self.data {
            Data::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Elements of an array value.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match &self.data {
            Data::Array(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut [Value]> {
        match &mut self.data {
            Data::Array(elements) => Some(elements),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_strings(&self) -> Option<Vec<&str>> {
        self.collect(Kind::StringArray, Value::as_str)
    }

    #[must_use]
    pub fn as_integers(&self) -> Option<Vec<i64>> {
        self.collect(Kind::IntegerArray, Value::as_integer)
    }

    #[must_use]
    pub fn as_floats(&self) -> Option<Vec<f64>> {
        self.collect(Kind::FloatArray, Value::as_float)
    }

    #[must_use]
    pub fn as_bools(&self) -> Option<Vec<bool>> {
        self.collect(Kind::BooleanArray, Value::as_bool)
    }

    #[must_use]
    pub fn as_datetimes(&self) -> Option<Vec<DateTime<Utc>>> {
        self.collect(Kind::DatetimeArray, Value::as_datetime)
    }

    fn collect<'a, T>(&'a self, kind: Kind, f: impl Fn(&'a Value) -> Option<T>) -> Option<Vec<T>> {
        if self.kind != Some(kind) {
            return None;
        }
        self.as_array()?.iter().map(f).collect()
    }

    /// Number of elements of an array, 0 for anything else.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_array().map_or(0, <[Value]>::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Array element at `idx`; negative indexes count from the end.
    #[must_use]
    pub fn index(&self, idx: isize) -> Option<&Value> {
        let elements = self.as_array()?;
        elements.get(resolve_index(idx, elements.len())?)
    }

    pub fn index_mut(&mut self, idx: isize) -> Option<&mut Value> {
        let elements = self.as_array_mut()?;
        let i = resolve_index(idx, elements.len())?;
        elements.get_mut(i)
    }

    /// The value as it is written in a document: strings quoted and escaped,
    /// datetimes in RFC 3339, floats always with a fractional part.
    #[must_use]
    pub fn to_literal(&self) -> String {
        match &self.data {
            Data::None => String::new(),
            Data::String(s) => quote(s),
            Data::Integer(i) => i.to_string(),
            Data::Float(f) => float_literal(*f),
            Data::Boolean(b) => b.to_string(),
            Data::Datetime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            Data::Array(elements) => {
                let parts: Vec<String> = elements.iter().map(Value::to_literal).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }

    /// True if this value or any element carries a comment.
    #[must_use]
    pub fn has_comments(&self) -> bool {
        !self.comments.is_empty()
            || self
                .as_array()
                .is_some_and(|elements| elements.iter().any(Value::has_comments))
    }

    /// True if any element, at any depth, carries a comment.
    pub(crate) fn has_element_comments(&self) -> bool {
        self.as_array()
            .is_some_and(|elements| elements.iter().any(Value::has_comments))
    }

    pub(crate) fn take_payload(&mut self) -> (Option<Kind>, Data) {
        (self.kind.take(), std::mem::take(&mut self.data))
    }

    pub(crate) fn put_payload(&mut self, payload: (Option<Kind>, Data)) {
        self.kind = payload.0;
        self.data = payload.1;
    }
}

/// Plain rendering: strings unquoted, datetimes as `YYYY-MM-DD HH:MM:SS`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Data::None => Ok(()),
            Data::String(s) => f.write_str(s),
            Data::Integer(i) => write!(f, "{i}"),
            Data::Float(x) => f.write_str(&float_literal(*x)),
            Data::Boolean(b) => write!(f, "{b}"),
            Data::Datetime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Data::Array(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
        }
    }
}

fn describe(kind: Option<Kind>) -> String {
    kind.map_or_else(|| "a kind-less value".to_string(), |k| k.to_string())
}

pub(crate) fn resolve_index(idx: isize, len: usize) -> Option<usize> {
    let i = if idx < 0 {
        len.checked_sub(idx.unsigned_abs())?
    } else {
        idx.unsigned_abs()
    };
    (i < len).then_some(i)
}

fn parse_integer(text: &str) -> Result<i64> {
    use std::num::IntErrorKind;

    text.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            Error::out_of_range(format!("integer `{text}` does not fit in 64 bits"))
        }
        _ => Error::invalid_format(format!("`{text}` is not an integer")),
    })
}

fn float_literal(f: f64) -> String {
    let s = f.to_string();
    if s.contains('.') {
        s
    } else {
        s + ".0"
    }
}

/// Quotes and escapes a string for output.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Strips the quotes of a string token and resolves its escapes.
pub(crate) fn unquote(token: &str) -> Result<String> {
    let inner = token
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| Error::invalid_format(format!("`{token}` is not a quoted string")))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('b') => '\u{8}',
            Some('t') => '\t',
            Some('n') => '\n',
            Some('f') => '\u{c}',
            Some('r') => '\r',
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('u') => read_hex(&mut chars, 4)?,
            Some('U') => read_hex(&mut chars, 8)?,
            Some(other) => {
                return Err(Error::invalid_format(format!("unknown escape `\\{other}`")));
            }
            None => return Err(Error::invalid_format("dangling escape")),
        };
        out.push(escaped);
    }
    Ok(out)
}

fn read_hex(chars: &mut std::str::Chars<'_>, len: usize) -> Result<char> {
    let digits: String = chars.by_ref().take(len).collect();
    if digits.len() != len {
        return Err(Error::invalid_format(format!("short escape `{digits}`")));
    }
    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| Error::invalid_format(format!("invalid unicode escape `{digits}`")))
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value { kind: Some(Kind::Integer), data: Data::Integer(i64::from(v)), ..Value::default() }
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! try_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl TryFrom<$t> for Value {
                type Error = Error;

                fn try_from(v: $t) -> Result<Self> {
                    let i = i64::try_from(v)
                        .map_err(|_| Error::out_of_range(format!("{v} does not fit in 64 bits")))?;
                    Ok(Value::from(i))
                }
            }
        )*
    };
}

try_from_unsigned!(u64, usize);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value {
            kind: Some(Kind::Float),
            data: Data::Float(v),
            ..Value::default()
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::from(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value {
            kind: Some(Kind::Boolean),
            data: Data::Boolean(v),
            ..Value::default()
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value {
            kind: Some(Kind::String),
            data: Data::String(v),
            ..Value::default()
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::from(v.to_string())
    }
}

/// Datetimes are kept at second precision.
impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value {
            kind: Some(Kind::Datetime),
            data: Data::Datetime(v.with_nanosecond(0).unwrap_or(v)),
            ..Value::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_ranges() {
        assert!(Kind::Datetime.is_scalar());
        assert!(Kind::StringArray.is_array());
        assert!(Kind::Array.is_array());
        assert!(!Kind::TableName.is_array());
        assert!(Kind::ArrayOfTables.is_table());
        assert_eq!(Kind::Float.array_of(), Some(Kind::FloatArray));
        assert_eq!(Kind::FloatArray.element(), Some(Kind::Float));
    }

    #[test]
    fn test_kind_is_immutable_after_first_set() {
        let mut v = Value::new();
        v.set("a").unwrap();
        let err = v.set(1).unwrap_err();
        assert!(matches!(err, Error::NotSupported(_)));
        assert_eq!(v.as_str(), Some("a"));
        v.set("b").unwrap();
        assert_eq!(v.as_str(), Some("b"));
    }

    #[test]
    fn test_array_homogeneity() {
        let mut arr = Value::array();
        arr.add(1).unwrap();
        assert_eq!(arr.kind(), Some(Kind::IntegerArray));
        assert!(arr.add("x").is_err());
        assert_eq!(arr.len(), 1);

        let mut nested = Value::array();
        let mut inner = Value::array();
        inner.add("a").unwrap();
        nested.add(inner).unwrap();
        nested.add(Value::array()).unwrap();
        assert_eq!(nested.kind(), Some(Kind::Array));
        assert!(nested.add(true).is_err());
        assert_eq!(nested.len(), 2);

        let mut scalar = Value::from(3);
        assert!(scalar.add(4).is_err());
    }

    #[test]
    fn test_negative_index() {
        let mut arr = Value::array();
        for i in 1..=3 {
            arr.add(i).unwrap();
        }
        assert_eq!(arr.index(-1).and_then(Value::as_integer), Some(3));
        assert_eq!(arr.index(0).and_then(Value::as_integer), Some(1));
        assert!(arr.index(3).is_none());
        assert!(arr.index(-4).is_none());
        assert_eq!(arr.as_integers(), Some(vec![1, 2, 3]));
        assert_eq!(arr.as_strings(), None);
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let mut v = Value::new();
        assert!(v.set(f64::NAN).is_err());
        assert!(!v.is_valid());
        let mut arr = Value::array();
        assert!(arr.add(f64::INFINITY).is_err());
    }

    #[test]
    fn test_unsigned_range() {
        assert!(Value::try_from(u64::MAX).is_err());
        assert_eq!(Value::try_from(7u64).unwrap().as_integer(), Some(7));
    }

    #[test]
    fn test_literals() {
        assert_eq!(Value::from(1.0).to_literal(), "1.0");
        assert_eq!(Value::from(-0.25).to_literal(), "-0.25");
        assert_eq!(Value::from("a\"b\n").to_literal(), r#""a\"b\n""#);
        let dt = Utc.with_ymd_and_hms(1979, 5, 27, 7, 32, 0).unwrap();
        assert_eq!(Value::from(dt).to_literal(), "1979-05-27T07:32:00Z");
        assert_eq!(Value::from(dt).to_string(), "1979-05-27 07:32:00");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""tab\there""#).unwrap(), "tab\there");
        assert_eq!(unquote(r#""é\U0001F600""#).unwrap(), "é😀");
        assert_eq!(unquote(r#""a\/b""#).unwrap(), "a/b");
        assert!(unquote(r#""\q""#).is_err());
        assert!(unquote(r#""\u12""#).is_err());
        assert!(unquote("bare").is_err());
    }

    #[test]
    fn test_quote_round_trips() {
        let original = "line\nquote\" back\\ bell\u{7}";
        assert_eq!(unquote(&quote(original)).unwrap(), original);
    }

    #[test]
    fn test_equality_ignores_order() {
        let seq = Sequence::new();
        let mut a = Value::from(1);
        a.stamp(&seq);
        let b = Value::from(1);
        assert_eq!(a, b);
        assert_eq!(a.order(), Some(1));
        a.stamp(&seq);
        assert_eq!(a.order(), Some(1));
    }
}
