//! Testing infrastructure for decktext integration tests.
//!
//! - `TestWorld`: isolated working directory and CLI runner
//! - `fixtures`: hand-assembled `.apkg` files in every layout Anki produces
//! - `assertions`: checks against the CLI's JSON output

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::{DatabaseLayout, MediaEncoding, PackageFixture};
pub use world::{CliResult, TestWorld};
