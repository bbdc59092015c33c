use crate::error::Result;
use decktext_types::{Guid, IdentitySet, RawNote};
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::Path;

/// Source of stored notes.
pub trait NoteStore {
    /// Every note as `(fields, guid)`, in storage order.
    fn fetch_notes(&self) -> Result<Vec<RawNote>>;
}

/// Notes of an Anki collection database.
pub struct SqliteNoteStore {
    conn: Connection,
}

impl SqliteNoteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl NoteStore for SqliteNoteStore {
    fn fetch_notes(&self) -> Result<Vec<RawNote>> {
        let mut stmt = self.conn.prepare("SELECT flds, guid FROM notes ORDER BY id")?;
        let notes = stmt
            .query_map([], |row| {
                let flds: String = row.get(0)?;
                let guid: String = row.get(1)?;
                Ok(RawNote::from_blob(&flds, guid))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    }
}

/// Keys held by a store, labelled with each note's first field.
pub fn identities(store: &dyn NoteStore) -> Result<IdentitySet> {
    let mut set = IdentitySet::new();
    for note in store.fetch_notes()? {
        set.insert(note.guid.clone(), note.front().trim());
    }
    Ok(set)
}

/// Map each note's trimmed first field to its key. The first note wins when
/// fronts repeat.
pub fn front_index(notes: &[RawNote]) -> HashMap<String, Guid> {
    let mut index = HashMap::new();
    for note in notes {
        index
            .entry(note.front().trim().to_string())
            .or_insert_with(|| note.guid.clone());
    }
    index
}
