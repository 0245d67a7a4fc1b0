/// A node in a parsed document tree.
///
/// `Table` and `Array` own their children; dropping a `Value` drops its
/// whole subtree. `Error` is produced only as the direct result of
/// [`crate::parse`](crate::parse) — it is never inserted into a `Table` or
/// `Array`, since nothing in this crate constructs one that way.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Vec<u8>),
    /// A dot-separated identifier sequence introduced by `&ident.ident…`,
    /// stored pre-joined with `.` separators.
    ShortType(String),
    Table(Table),
    Array(Array),
    /// Diagnostic payload; only ever the root returned by a failed parse.
    Error(String),
}

/// An insertion-ordered key/value association. Keys are not deduplicated on
/// insert — later insertions append rather than replace, and [`Table::get`]
/// returns the first match, matching the append-with-first-wins-on-lookup
/// policy this format commits to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    entries: Vec<(String, Value)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(k, _)| k.as_str())
    }

    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, v)| v)
    }

    /// Removes every entry with a matching key, returning how many were
    /// removed. The format does not define replacement semantics for
    /// duplicate keys, so this removes all of them rather than guessing
    /// which one the caller meant.
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// An insertion-ordered, source-ordered sequence of values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Array {
    elements: Vec<Value>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.elements.push(value);
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn remove(&mut self, index: usize) -> Option<Value> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter()
    }
}

impl Value {
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&[u8]> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_short_type(&self) -> Option<&str> {
        match self {
            Value::ShortType(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&str> {
        match self {
            Value::Error(m) => Some(m),
            _ => None,
        }
    }

    /// Convenience constructor for a `ShortType` node.
    pub fn short_type(ident: impl Into<String>) -> Self {
        Value::ShortType(ident.into())
    }

    /// Builds an `Error` node from a plain message.
    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(message.into())
    }

    /// Builds an `Error` node from a format string, e.g.
    /// `Value::error_fmt(format_args!("expected {kind} at {loc}"))`.
    pub fn error_fmt(args: std::fmt::Arguments<'_>) -> Self {
        Value::Error(args.to_string())
    }

    /// Replaces this node with `Null`, dropping any previous payload or
    /// children.
    pub fn set_null(&mut self) {
        *self = Value::Null;
    }

    /// Replaces this node's payload with `b`, converting it to `Bool` and
    /// dropping any previous children.
    pub fn set_bool(&mut self, b: bool) {
        *self = Value::Bool(b);
    }

    /// Replaces this node's payload with `i`, converting it to `Int` and
    /// dropping any previous children.
    pub fn set_int(&mut self, i: i64) {
        *self = Value::Int(i);
    }

    /// Replaces this node's payload with `f`, converting it to `Float` and
    /// dropping any previous children.
    pub fn set_float(&mut self, f: f64) {
        *self = Value::Float(f);
    }

    /// Replaces this node's payload with `bytes`, converting it to `String`
    /// and dropping any previous children.
    pub fn set_str(&mut self, bytes: impl Into<Vec<u8>>) {
        *self = Value::String(bytes.into());
    }

    /// Replaces this node's payload with `ident`, converting it to
    /// `ShortType` and dropping any previous children.
    pub fn set_short_type(&mut self, ident: impl Into<String>) {
        *self = Value::ShortType(ident.into());
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::String(bytes)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.as_bytes().to_vec())
    }
}
