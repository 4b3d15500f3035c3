//! Primary-key values returned by write operations.

use std::collections::BTreeMap;

use relmap_types::Value;

/// Column-to-value map identifying one stored record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryKey(BTreeMap<String, Value>);

impl PrimaryKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-column key `{ "ID": value }`.
    pub fn id(value: impl Into<Value>) -> Self {
        Self::single("ID", value)
    }

    pub fn single(column: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(column.into(), value.into());
        Self(map)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.0
    }

    /// The lone value of a single-column key, or the whole map.
    pub fn identifier(&self) -> Option<Identifier> {
        match self.0.len() {
            0 => None,
            1 => self.0.values().next().cloned().map(Identifier::Single),
            _ => Some(Identifier::Composite(self.0.clone())),
        }
    }
}

impl From<BTreeMap<String, Value>> for PrimaryKey {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PrimaryKey {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// What an id accessor returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Identifier {
    Single(Value),
    Composite(BTreeMap<String, Value>),
}
