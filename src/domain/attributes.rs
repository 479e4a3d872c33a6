//! Ordered attribute mappings used for cache keys and cached values.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize, Serializer};

/// Ordered mapping from attribute name to attribute value.
///
/// Insertion order is preserved for iteration; attribute names are unique
/// within one mapping, and inserting an existing name overwrites the value
/// in place. Equality and hashing are content-based: two mappings holding
/// the same name/value pairs compare equal regardless of insertion order,
/// and equal mappings hash identically. The wire shape is a sequence of
/// `(name, value)` pairs; deserialized pairs funnel through
/// [`insert`](Self::insert), so a repeated name folds to its last value
/// instead of violating name uniqueness.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of attributes in the mapping.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the mapping holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether an attribute named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert an attribute, returning the previous value if the name existed.
    ///
    /// An existing attribute keeps its original position; a new attribute is
    /// appended at the end.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(entry_name, _)| *entry_name == name)
        {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove an attribute by name, returning its value if present.
    ///
    /// The relative order of the remaining attributes is unchanged.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let position = self
            .entries
            .iter()
            .position(|(entry_name, _)| entry_name == name)?;
        Some(self.entries.remove(position).1)
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Iterate over attribute names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl PartialEq for AttributeMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(name, value)| other.get(name) == Some(value.as_str()))
    }
}

impl Eq for AttributeMap {}

impl Hash for AttributeMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash in name order so that mappings that compare equal under the
        // order-insensitive `PartialEq` also hash identically.
        let mut pairs: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        pairs.sort_unstable_by(|left, right| left.0.cmp(right.0));

        self.entries.len().hash(state);
        for (name, value) in pairs {
            name.hash(state);
            value.hash(state);
        }
    }
}

impl Serialize for AttributeMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.entries.iter())
    }
}

// Deserialization target: folding through `insert` keeps names unique even
// when the document repeats one.
impl From<Vec<(String, String)>> for AttributeMap {
    fn from(pairs: Vec<(String, String)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<N, V> FromIterator<(N, V)> for AttributeMap
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl<N, V> Extend<(N, V)> for AttributeMap
where
    N: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(
            self.entries
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
    }
}

/// Dimension values identifying one cross-sectional series.
///
/// A thin wrapper over [`AttributeMap`] used as the cache entry key. Keys are
/// moved into the cache on insert, so a stored key cannot be mutated for the
/// lifetime of its entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesKey(AttributeMap);

impl SeriesKey {
    /// Create a key from dimension name/value pairs.
    pub fn new(dimensions: AttributeMap) -> Self {
        Self(dimensions)
    }

    /// The dimension mapping backing this key.
    pub fn dimensions(&self) -> &AttributeMap {
        &self.0
    }

    /// Unwrap the key into its dimension mapping.
    pub fn into_dimensions(self) -> AttributeMap {
        self.0
    }
}

impl From<AttributeMap> for SeriesKey {
    fn from(dimensions: AttributeMap) -> Self {
        Self(dimensions)
    }
}

impl<N, V> FromIterator<(N, V)> for SeriesKey
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(AttributeMap::from_iter(iter))
    }
}
