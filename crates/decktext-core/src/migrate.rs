use crate::grammar::{KeySource, parse_line};
use decktext_types::Guid;
use std::collections::HashMap;

/// Result of stamping keys into a text file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub text: String,
    /// Lines stamped with a key recovered from an existing package.
    pub recovered: usize,
    /// Lines stamped with a freshly derived key.
    pub derived: usize,
    /// Card lines that already carried a key.
    pub unchanged: usize,
}

/// Stamp an explicit key onto every card line that lacks one.
///
/// `recovered` maps a note's trimmed first field to the key it has in an
/// existing package; cards whose front is found there keep that key, the rest
/// get their derived key. Comments, blank lines, keyed lines and unrecognized
/// lines are copied verbatim.
pub fn migrate_document(text: &str, recovered: &HashMap<String, Guid>) -> MigrationOutcome {
    let mut outcome = MigrationOutcome::default();
    let mut lines = Vec::new();

    for line in text.lines() {
        let card = match parse_line(line) {
            Ok(Some(card)) => card,
            Ok(None) | Err(_) => {
                lines.push(line.to_string());
                continue;
            }
        };

        if card.key_source == KeySource::Explicit {
            outcome.unchanged += 1;
            lines.push(line.to_string());
            continue;
        }

        let key = match recovered.get(card.card.front()) {
            Some(key) => {
                outcome.recovered += 1;
                key.clone()
            }
            None => {
                outcome.derived += 1;
                card.key
            }
        };
        lines.push(format!("[{}] {}", key, card.body));
    }

    outcome.text = lines.join("\n");
    if text.ends_with('\n') {
        outcome.text.push('\n');
    }
    outcome
}
