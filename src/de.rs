//! Serde binding.
//!
//! A [`Document`] is flat, so binding first builds a nested view of it: dotted
//! paths become nested maps, an array of tables becomes a sequence of maps and a
//! datetime becomes its RFC 3339 string (which `chrono`'s serde support reads
//! back into a `DateTime<Utc>`). The view is then walked by a `serde`
//! deserializer. Comments and layout play no part in binding.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use toml_layout::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config {
//!     title: String,
//!     server: Server,
//! }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Server {
//!     host: String,
//!     ports: Vec<u16>,
//! }
//!
//! let config: Config = from_str("title = \"demo\"\n[server]\nhost = \"::1\"\nports = [80, 443]\n").unwrap();
//! assert_eq!(config.server.ports, vec![80, 443]);
//! ```

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{de, forward_to_deserialize_any, Serialize, Serializer};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::value::{Kind, Value};

/// A node of the nested view.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Node {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Array(Vec<Node>),
    Table(IndexMap<String, Node>),
}

impl Node {
    fn from_value(value: &Value) -> Option<Node> {
        if let Some(elements) = value.as_array() {
            return Some(Node::Array(
                elements.iter().filter_map(Node::from_value).collect(),
            ));
        }
        match value.kind()? {
            Kind::String => value.as_str().map(|s| Node::String(s.to_string())),
            Kind::Integer => value.as_integer().map(Node::Integer),
            Kind::Float => value.as_float().map(Node::Float),
            Kind::Boolean => value.as_bool().map(Node::Boolean),
            Kind::Datetime => Some(Node::String(value.to_literal())),
            _ => None,
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::String(s) => serializer.serialize_str(s),
            Node::Integer(i) => serializer.serialize_i64(*i),
            Node::Float(f) => serializer.serialize_f64(*f),
            Node::Boolean(b) => serializer.serialize_bool(*b),
            Node::Array(items) => serializer.collect_seq(items),
            Node::Table(map) => serializer.collect_map(map),
        }
    }
}

/// Builds the nested view of `doc` in declaration order.
pub(crate) fn tree(doc: &Document) -> Result<IndexMap<String, Node>> {
    let mut root = IndexMap::new();
    for (path, item) in doc.ordered() {
        let node = match item.kind() {
            None => continue,
            Some(Kind::TableName) => None,
            Some(Kind::ArrayOfTables) => {
                let tables = item
                    .tables()
                    .iter()
                    .map(|table| tree(table).map(Node::Table))
                    .collect::<Result<Vec<_>>>()?;
                Some(Node::Array(tables))
            }
            Some(_) => Node::from_value(item),
        };
        insert(&mut root, path, node)?;
    }
    Ok(root)
}

/// Places `node` at a dotted path; `None` only makes sure the table exists.
fn insert(root: &mut IndexMap<String, Node>, path: &str, node: Option<Node>) -> Result<()> {
    let (parents, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };

    let mut table = root;
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        let entry = table
            .entry(segment.to_string())
            .or_insert_with(|| Node::Table(IndexMap::new()));
        table = match entry {
            Node::Table(inner) => inner,
            _ => return Err(Error::invalid_format(format!("`{path}` is nested under a value"))),
        };
    }

    match node {
        None => match table
            .entry(last.to_string())
            .or_insert_with(|| Node::Table(IndexMap::new()))
        {
            Node::Table(_) => Ok(()),
            _ => Err(Error::invalid_format(format!("`{path}` is both a value and a table"))),
        },
        Some(node) => {
            if table.contains_key(last) {
                return Err(Error::invalid_format(format!("`{path}` is both a value and a table")));
            }
            table.insert(last.to_string(), node);
            Ok(())
        }
    }
}

/// Binds a typed value from a document.
///
/// # Errors
///
/// Fails when the document does not match the shape of `T`, or when a value
/// path collides with a table path.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use toml_layout::{from_document, parse};
///
/// let doc = parse(b"[[fruit]]\nname = \"apple\"\n[[fruit]]\nname = \"pear\"\n").unwrap();
/// let bound: HashMap<String, Vec<HashMap<String, String>>> = from_document(&doc).unwrap();
/// assert_eq!(bound["fruit"][1]["name"], "pear");
/// ```
pub fn from_document<T>(doc: &Document) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(NodeDeserializer::new(Node::Table(tree(doc)?)))
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Node>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Node>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Node>,
    value: Option<Node>,
}

impl MapDeserializer {
    fn new(map: IndexMap<String, Node>) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, node)) => {
                self.value = Some(node);
                seed.deserialize(NodeDeserializer::new(Node::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct NodeDeserializer {
    node: Node,
}

impl NodeDeserializer {
    fn new(node: Node) -> Self {
        NodeDeserializer { node }
    }
}

impl<'de> de::Deserializer<'de> for NodeDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node {
            Node::String(s) => visitor.visit_string(s),
            Node::Integer(i) => visitor.visit_i64(i),
            Node::Float(f) => visitor.visit_f64(f),
            Node::Boolean(b) => visitor.visit_bool(b),
            Node::Array(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Node::Table(map) => visitor.visit_map(MapDeserializer::new(map)),
        }
    }

    // A present entry is always `Some`; absent fields are handled by serde.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    /// Unit variants only, written as strings.
    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.node {
            Node::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            other => Err(Error::custom(format!(
                "expected a string for an enum, found {}",
                describe(&other)
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

fn describe(node: &Node) -> &'static str {
    match node {
        Node::String(_) => "a string",
        Node::Integer(_) => "an integer",
        Node::Float(_) => "a float",
        Node::Boolean(_) => "a boolean",
        Node::Array(_) => "an array",
        Node::Table(_) => "a table",
    }
}
