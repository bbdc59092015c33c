// NOTE: decktext Architecture Rationale
//
// Why a text round trip (not editing packages in place)?
// - Cards are easier to review, diff and bulk-edit as one line each
// - The package is rebuilt from scratch every time; nothing in it is patched
// - Trade-off: scheduling data is not carried over by the text, so note keys
//   must be stable for Anki to re-attach review history on import
//
// Why verify after every build?
// - A key that silently changed is a lost review history
// - The verifier compares the keys the text implies with the keys the written
//   package holds; a mismatch is reported, never fatal

mod args;
mod commands;
pub mod config;
pub mod context;
mod handlers;
pub mod logging;
pub mod presentation;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;
