use crate::Guid;

/// Separator between fields inside a stored note's `flds` blob.
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// A note row as read from a package's note store.
///
/// Produced by the note store and consumed immediately by text serialization;
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNote {
    /// Field values in model order. Never empty: a blob without separators
    /// yields a single (possibly empty) field.
    pub fields: Vec<String>,
    pub guid: Guid,
}

impl RawNote {
    /// Build a note from its separator-joined field blob.
    pub fn from_blob(blob: &str, guid: impl Into<Guid>) -> Self {
        Self {
            fields: blob.split(FIELD_SEPARATOR).map(str::to_string).collect(),
            guid: guid.into(),
        }
    }

    /// First field, the one that identifies a basic note.
    pub fn front(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    /// Join the fields back into the stored blob form.
    pub fn to_blob(&self) -> String {
        join_fields(&self.fields)
    }
}

/// Join field values with [`FIELD_SEPARATOR`].
pub fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(FIELD_SEPARATOR);
        }
        out.push_str(field.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_split_on_unit_separator() {
        let note = RawNote::from_blob("Front\u{1f}Extra\u{1f}Back", "67890");
        assert_eq!(note.fields, vec!["Front", "Extra", "Back"]);
        assert_eq!(note.front(), "Front");
        assert_eq!(note.guid.as_str(), "67890");
    }

    #[test]
    fn test_empty_blob_yields_single_empty_field() {
        let note = RawNote::from_blob("", "g");
        assert_eq!(note.fields, vec![String::new()]);
        assert_eq!(note.front(), "");
    }

    #[test]
    fn test_blob_roundtrip_keeps_trailing_empty_fields() {
        let note = RawNote::from_blob("a\u{1f}\u{1f}", "g");
        assert_eq!(note.fields.len(), 3);
        assert_eq!(note.to_blob(), "a\u{1f}\u{1f}");
    }
}
