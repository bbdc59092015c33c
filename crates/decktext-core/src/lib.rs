// NOTE: Identity Rationale
//
// Why content-addressed keys (not random)?
// - A text file without explicit keys must yield the same notes on every build,
//   otherwise review history detaches from cards on each regeneration
// - Keys are only derived when a line has no `[key] ` prefix; once a key is
//   stamped into the text it is authoritative and content edits keep it
//
// Why a per-family salt?
// - The same text used as a basic front and as a cloze body must not collide
// - The salt is the family's model id, so keys stay compatible with decks that
//   were generated before the text format existed

pub mod arity;
pub mod error;
pub mod grammar;
pub mod guid;
pub mod migrate;
pub mod registry;
pub mod verify;

pub use arity::{InferredArity, infer};
pub use error::{Error, Result};
pub use grammar::{
    KeySource, KeyedCard, ParsedDocument, SkippedLine, parse_document, parse_line, render_card,
    render_note,
};
pub use guid::{GUID_SCHEME, derive_key, guid_for};
pub use migrate::{MigrationOutcome, migrate_document};
pub use verify::{VerifyReport, text_identities, verify};
