pub mod build;
pub mod dump;
pub mod inspect;
pub mod migrate;
pub mod verify;

use anyhow::{Context, Result};
use decktext_package::ExtractedPackage;
use std::path::Path;

fn open_package(apkg: &Path) -> Result<ExtractedPackage> {
    ExtractedPackage::open(apkg)
        .with_context(|| format!("Failed to open package: {}", apkg.display()))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read card text: {}", path.display()))
}
