// NOTE: Package Layout
//
// An .apkg is a zip archive holding:
// - one collection database: `collection.anki21b` (Zstandard-compressed,
//   current Anki), `collection.anki21` or `collection.anki2` (plain SQLite)
// - media payloads named "0", "1", ... by ascending index
// - an optional `media` member mapping those indices to file names, written as
//   JSON, Zstandard-compressed JSON or a binary wire message
//
// Reading only ever touches `notes.flds` and `notes.guid`. Writing produces the
// legacy layout, which every Anki version imports.

pub mod collection;
pub mod error;
pub mod media_index;
pub mod payload;
pub mod reader;
pub mod schema;
pub mod store;
pub mod wire;
pub mod writer;

pub use error::{Error, Result};
pub use media_index::{MediaIndexFormat, MediaIndexReport, classify};
pub use payload::{DatabasePayload, select};
pub use reader::ExtractedPackage;
pub use store::{NoteStore, SqliteNoteStore, front_index, identities};
pub use writer::{DeckBuilder, WriteSummary, deck_id_for};
