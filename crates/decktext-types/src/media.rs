use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from a payload file's numeric name ("0", "1", ...) to the media
/// file name it was stored under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaIndex(BTreeMap<String, String>);

impl MediaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. Returns the previous filename if `id` was already present.
    pub fn insert(&mut self, id: impl Into<String>, filename: impl Into<String>) -> Option<String> {
        self.0.insert(id.into(), filename.into())
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for MediaIndex {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for MediaIndex {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
