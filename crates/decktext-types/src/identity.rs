use crate::Guid;
use std::collections::{BTreeMap, BTreeSet};

/// Set of note keys found in one source (a text file or a package).
///
/// Each key keeps the first field it was seen with so that reports can show
/// which card a key belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySet {
    entries: BTreeMap<Guid, String>,
}

impl IdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `guid` with its first field. The first label seen for a key wins.
    pub fn insert(&mut self, guid: Guid, front: impl Into<String>) -> bool {
        if self.entries.contains_key(&guid) {
            return false;
        }
        self.entries.insert(guid, front.into());
        true
    }

    pub fn contains(&self, guid: &Guid) -> bool {
        self.entries.contains_key(guid)
    }

    /// First field recorded for `guid`.
    pub fn label(&self, guid: &Guid) -> Option<&str> {
        self.entries.get(guid).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn guids(&self) -> BTreeSet<Guid> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Guid, &str)> {
        self.entries.iter().map(|(g, f)| (g, f.as_str()))
    }
}

impl FromIterator<Guid> for IdentitySet {
    fn from_iter<I: IntoIterator<Item = Guid>>(iter: I) -> Self {
        let mut set = Self::new();
        for guid in iter {
            set.insert(guid, String::new());
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_label_wins() {
        let mut set = IdentitySet::new();
        assert!(set.insert(Guid::new("a"), "first"));
        assert!(!set.insert(Guid::new("a"), "second"));
        assert_eq!(set.label(&Guid::new("a")), Some("first"));
        assert_eq!(set.len(), 1);
    }
}
