//! Folds the token stream into a [`Document`].
//!
//! The builder tracks where the next token lands: the open chain of arrays of
//! tables, the current `[table]`, the current key and a stack of arrays under
//! construction. Comments are attached as they arrive. A comment that starts a
//! line (or follows an opening `[`) is buffered and becomes the leading comment
//! of the next entity; any other comment is the trailing comment of the entity
//! that precedes it on the same line. A block still buffered at `]` joins the
//! leading comments of the array being closed.

use tracing::debug;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::item::Item;
use crate::token::TokenKind;
use crate::value::{unquote, Comments, Kind, Sequence, Value};

/// One open `[[name]]` element.
#[derive(Debug)]
struct Scope {
    /// Path as written in the header.
    full: String,
    /// Path relative to the enclosing element.
    rel: String,
}

#[derive(Debug)]
pub(crate) struct Builder {
    root: Document,
    scopes: Vec<Scope>,
    table: Option<String>,
    key: Option<String>,
    arrays: Vec<Value>,
    pending: Comments,
    prev: Option<TokenKind>,
    seq: Sequence,
}

impl Builder {
    pub(crate) fn new(seq: Sequence) -> Self {
        Builder {
            root: Document::with_sequence(seq.clone()),
            scopes: Vec::new(),
            table: None,
            key: None,
            arrays: Vec::new(),
            pending: Comments::default(),
            prev: None,
            seq,
        }
    }

    /// Applies one token.
    pub(crate) fn push(&mut self, token: TokenKind, text: &str) -> Result<()> {
        match token {
            TokenKind::Whitespace | TokenKind::NewLine => {}
            TokenKind::Comment => self.comment(text)?,
            TokenKind::TableName => self.table_name(header_path(text))?,
            TokenKind::ArrayOfTables => self.array_of_tables(header_path(text))?,
            TokenKind::Key => self.key(text)?,
            TokenKind::Equal => {
                if self.prev != Some(TokenKind::Key) {
                    return Err(Error::invalid_format("`=` must follow a key"));
                }
            }
            TokenKind::String
            | TokenKind::Integer
            | TokenKind::Float
            | TokenKind::Boolean
            | TokenKind::Datetime => self.scalar(token, text)?,
            TokenKind::ArrayLeftBrack => self.open_array()?,
            TokenKind::ArrayRightBrack => self.close_array()?,
            TokenKind::Comma => {
                if self.arrays.is_empty() {
                    return Err(Error::invalid_format("`,` outside of an array"));
                }
            }
            TokenKind::Eof => {
                if let Some(tail) = self.pending.leading.take() {
                    self.root.set_tail(Some(tail));
                }
            }
        }
        if token != TokenKind::Whitespace {
            self.prev = Some(token);
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<Document> {
        if !self.arrays.is_empty() {
            return Err(Error::internal("input ended inside an array"));
        }
        Ok(self.root)
    }

    /// Closes the elements that cannot contain `path` and returns `path`
    /// relative to the innermost remaining one.
    fn enter(&mut self, path: &str) -> String {
        while let Some(scope) = self.scopes.last() {
            if path
                .strip_prefix(scope.full.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
            {
                break;
            }
            self.scopes.pop();
        }
        match self.scopes.last() {
            Some(scope) => path[scope.full.len() + 1..].to_string(),
            None => path.to_string(),
        }
    }

    fn full_path(&self, rel: &str) -> String {
        match self.scopes.last() {
            Some(scope) => format!("{}.{rel}", scope.full),
            None => rel.to_string(),
        }
    }

    fn table_name(&mut self, path: &str) -> Result<()> {
        let rel = self.enter(path);
        let doc = descend(&mut self.root, &self.scopes)?;
        if doc.contains_key(&rel) {
            return Err(Error::redeclared(path));
        }
        let mut item = Item::table_name();
        item.comments.leading = self.pending.leading.take();
        item.stamp(&self.seq);
        doc.insert_raw(rel.clone(), item);
        debug!(table = path, "table declared");
        self.table = Some(rel);
        self.key = None;
        Ok(())
    }

    fn array_of_tables(&mut self, path: &str) -> Result<()> {
        let rel = self.enter(path);
        let doc = descend(&mut self.root, &self.scopes)?;
        match doc.get(&rel).map(|item| item.kind()) {
            Some(Some(Kind::ArrayOfTables)) => {}
            Some(_) => return Err(Error::redeclared(path)),
            None => {
                let mut item = Item::array_of_tables();
                item.stamp(&self.seq);
                doc.insert_raw(rel.clone(), item);
            }
        }
        let mut element = Document::with_sequence(self.seq.clone());
        element.header_mut().leading = self.pending.leading.take();
        let item = doc
            .get_mut(&rel)
            .ok_or_else(|| Error::internal(format!("lost array of tables `{path}`")))?;
        item.push_table(element)?;
        debug!(table = path, index = item.len() - 1, "array of tables element opened");

        self.scopes.push(Scope {
            full: path.to_string(),
            rel,
        });
        self.table = None;
        self.key = None;
        Ok(())
    }

    fn key(&mut self, name: &str) -> Result<()> {
        let rel = match &self.table {
            Some(table) => format!("{table}.{name}"),
            None => name.to_string(),
        };
        let full = self.full_path(&rel);
        let doc = descend(&mut self.root, &self.scopes)?;
        if doc.get(&rel).is_some_and(|item| !item.is_array()) {
            return Err(Error::redeclared(full));
        }
        let mut item = Item::new();
        item.comments.leading = self.pending.leading.take();
        doc.insert_raw(rel.clone(), item);
        self.key = Some(rel);
        Ok(())
    }

    fn scalar(&mut self, token: TokenKind, text: &str) -> Result<()> {
        let kind = scalar_kind(token)
            .ok_or_else(|| Error::internal(format!("{token} is not a scalar")))?;
        let text = if kind == Kind::String {
            unquote(text)?
        } else {
            text.to_string()
        };

        let seq = self.seq.clone();
        if self.arrays.is_empty() {
            let item = self.item_mut()?;
            item.set_as(&text, kind)?;
            item.stamp(&seq);
        } else {
            let mut element = Value::new();
            element.set_as(&text, kind)?;
            element.stamp(&seq);
            element.comments.leading = self.pending.leading.take();
            let top = self
                .arrays
                .last_mut()
                .ok_or_else(|| Error::internal("no open array"))?;
            top.add(element)?;
        }
        Ok(())
    }

    fn open_array(&mut self) -> Result<()> {
        let seq = self.seq.clone();
        if self.arrays.is_empty() {
            let item = self.item_mut()?;
            if item.is_valid() {
                return Err(Error::not_supported("array assigned to a key that has a value"));
            }
            item.stamp(&seq);
            self.arrays.push(Value::array());
            return Ok(());
        }

        if let Some(kind) = self.arrays.last().and_then(Value::kind) {
            if kind != Kind::Array {
                return Err(Error::not_supported(format!("cannot nest an array in {kind}")));
            }
        }
        let mut nested = Value::array();
        nested.stamp(&seq);
        nested.comments.leading = self.pending.leading.take();
        self.arrays.push(nested);
        Ok(())
    }

    fn close_array(&mut self) -> Result<()> {
        let mut done = self
            .arrays
            .pop()
            .ok_or_else(|| Error::internal("`]` without an open array"))?;
        // comments after the last element stay with the array
        let carried = self.pending.leading.take();
        match self.arrays.last_mut() {
            Some(parent) => {
                absorb(&mut done.comments, carried);
                parent.add(done)?;
            }
            None => {
                let payload = done.take_payload();
                let item = self.item_mut()?;
                absorb(&mut item.comments, carried);
                item.put_payload(payload);
            }
        }
        Ok(())
    }

    fn comment(&mut self, text: &str) -> Result<()> {
        let prev = self.prev;
        let starts_line = matches!(
            prev,
            None | Some(TokenKind::NewLine | TokenKind::Comment | TokenKind::ArrayLeftBrack)
        );
        if starts_line {
            self.pending.push_leading(text);
            return Ok(());
        }

        let target = match prev {
            Some(k) if (k.is_scalar() || k == TokenKind::ArrayRightBrack) && self.arrays.is_empty() => {
                &mut self.item_mut()?.comments
            }
            Some(k) if k.is_scalar() || k == TokenKind::ArrayRightBrack || k == TokenKind::Comma => {
                last_element(&mut self.arrays)?
            }
            Some(TokenKind::TableName) => {
                let table = self
                    .table
                    .as_deref()
                    .ok_or_else(|| Error::internal("comment after a table without a table"))?;
                let doc = descend(&mut self.root, &self.scopes)?;
                &mut doc
                    .get_mut(table)
                    .ok_or_else(|| Error::internal(format!("lost table `{table}`")))?
                    .comments
            }
            Some(TokenKind::ArrayOfTables) => descend(&mut self.root, &self.scopes)?.header_mut(),
            _ => return Err(Error::internal(format!("comment cannot follow {prev:?}"))),
        };
        if target.trailing.is_some() {
            return Err(Error::internal("entity already has a trailing comment"));
        }
        target.trailing = Some(text.to_string());
        Ok(())
    }

    fn item_mut(&mut self) -> Result<&mut Item> {
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| Error::internal("value without a key"))?;
        descend(&mut self.root, &self.scopes)?
            .get_mut(key)
            .ok_or_else(|| Error::internal(format!("lost key `{key}`")))
    }
}

/// Walks to the newest element of every open array of tables.
fn descend<'d>(mut doc: &'d mut Document, scopes: &[Scope]) -> Result<&'d mut Document> {
    for scope in scopes {
        doc = doc
            .get_mut(&scope.rel)
            .and_then(Item::last_table_mut)
            .ok_or_else(|| Error::internal(format!("lost array of tables `{}`", scope.full)))?;
    }
    Ok(doc)
}

fn last_element(arrays: &mut [Value]) -> Result<&mut Comments> {
    arrays
        .last_mut()
        .and_then(|top| top.index_mut(-1))
        .map(|element| &mut element.comments)
        .ok_or_else(|| Error::internal("comment after an element of an empty array"))
}

fn absorb(comments: &mut Comments, block: Option<String>) {
    if let Some(block) = block {
        comments.push_leading(&block);
    }
}

fn header_path(text: &str) -> &str {
    text.trim_start_matches('[').trim_end_matches(']')
}

fn scalar_kind(token: TokenKind) -> Option<Kind> {
    match token {
        TokenKind::String => Some(Kind::String),
        TokenKind::Integer => Some(Kind::Integer),
        TokenKind::Float => Some(Kind::Float),
        TokenKind::Boolean => Some(Kind::Boolean),
        TokenKind::Datetime => Some(Kind::Datetime),
        _ => None,
    }
}
