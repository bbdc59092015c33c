//! Line grammar of the card text format.
//!
//! ```text
//! ['[' key '] ']? field_1 ' :: ' field_2 (' :: ' field_n)*
//! ```
//!
//! One card per line. Blank lines and lines starting with `#` are ignored. A
//! card whose first field contains `{{c` is a cloze card; its delimiters are
//! only honoured outside `{{...}}` markup.

use crate::error::{Error, Result};
use crate::guid::derive_key;
use crate::registry::{CLOZE_MARKER, FIELD_DELIMITER};
use decktext_types::{Family, Guid, MIN_ARITY, RawNote, TextCard};
use serde::Serialize;
use tracing::warn;

const COMMENT_PREFIX: char = '#';

/// Where a card's key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    /// The line carried a `[key] ` prefix.
    Explicit,
    /// The key was derived from the card's content.
    Derived,
}

/// A parsed card line together with its resolved key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedCard {
    pub key: Guid,
    pub key_source: KeySource,
    /// Line content after the key prefix, trimmed.
    pub body: String,
    pub card: TextCard,
}

/// A line that could not be read as a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line_number: usize,
    pub content: String,
}

/// Result of reading a whole text file.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub cards: Vec<KeyedCard>,
    pub skipped: Vec<SkippedLine>,
}

impl ParsedDocument {
    pub fn text_cards(&self) -> impl Iterator<Item = &TextCard> {
        self.cards.iter().map(|c| &c.card)
    }

    /// Fail with [`Error::EmptyBatch`] when no card survived parsing.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.cards.is_empty() {
            return Err(Error::EmptyBatch);
        }
        Ok(())
    }
}

/// Parse every line of `text`. Unrecognized lines are skipped and reported,
/// never fatal to the batch.
pub fn parse_document(text: &str) -> ParsedDocument {
    let mut doc = ParsedDocument::default();

    for (idx, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(card)) => doc.cards.push(card),
            Ok(None) => {}
            Err(err) => {
                warn!(line = idx + 1, "skipping line: {}", err);
                doc.skipped.push(SkippedLine {
                    line_number: idx + 1,
                    content: line.trim().to_string(),
                });
            }
        }
    }

    doc
}

/// Parse one line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<KeyedCard>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return Ok(None);
    }

    let (explicit_key, body) = split_key(line);

    let markup_fields = split_fields(body, true);
    let (family, fields) = if markup_fields[0].contains(CLOZE_MARKER) {
        (Family::Cloze, markup_fields)
    } else {
        let fields = split_fields(body, false);
        if fields.len() < 2 {
            return Err(Error::UnrecognizedCardFormat(line.to_string()));
        }
        (Family::Basic, fields)
    };

    let (key, key_source) = match explicit_key {
        Some(key) => (Guid::new(key), KeySource::Explicit),
        None => {
            let content = match family {
                Family::Cloze => body,
                Family::Basic => fields[0].as_str(),
            };
            (derive_key(family, content), KeySource::Derived)
        }
    };

    Ok(Some(KeyedCard {
        card: TextCard {
            guid: explicit_key.map(Guid::from),
            field_values: fields,
            family,
        },
        key,
        key_source,
        body: body.to_string(),
    }))
}

/// Render a card line with an explicit key.
pub fn render_card(key: &Guid, fields: &[String]) -> String {
    let body = fields
        .iter()
        .map(|f| f.trim())
        .collect::<Vec<_>>()
        .join(FIELD_DELIMITER);
    format!("[{}] {}", key, body).trim_end().to_string()
}

/// Render a stored note as a card line.
///
/// Every field is kept; notes with a single field get an empty second field
/// so the line stays parseable. Line breaks inside a field become `<br>`.
pub fn render_note(note: &RawNote) -> String {
    let mut fields: Vec<String> = note
        .fields
        .iter()
        .map(|f| f.replace("\r\n", "<br>").replace('\n', "<br>"))
        .collect();
    if fields.len() < MIN_ARITY {
        fields.resize(MIN_ARITY, String::new());
    }
    render_card(&note.guid, &fields)
}

/// Split an optional `[key] ` prefix off a trimmed line.
pub(crate) fn split_key(line: &str) -> (Option<&str>, &str) {
    if let Some(rest) = line.strip_prefix('[')
        && let Some(end) = rest.find("] ")
    {
        let key = &rest[..end];
        let body = rest[end + 2..].trim();
        return if key.is_empty() {
            (None, body)
        } else {
            (Some(key), body)
        };
    }
    (None, line)
}

/// Split a body on field delimiters and trim each field.
///
/// A delimiter is `::` with whitespace (or the line edge) on both sides, so
/// `std::vec` stays whole and a trailing ` ::` ends with an empty field. With
/// `respect_markup`, delimiters inside `{{...}}` are ignored.
fn split_fields(body: &str, respect_markup: bool) -> Vec<String> {
    let bytes = body.as_bytes();
    let mut fields = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        if respect_markup && bytes[i..].starts_with(b"{{") {
            depth += 1;
            i += 2;
            continue;
        }
        if respect_markup && bytes[i..].starts_with(b"}}") {
            depth = depth.saturating_sub(1);
            i += 2;
            continue;
        }
        if depth == 0 && is_delimiter_at(bytes, i) {
            fields.push(body[start..i].trim().to_string());
            i += 2;
            start = i;
            continue;
        }
        i += 1;
    }

    fields.push(body[start..].trim().to_string());
    fields
}

fn is_delimiter_at(bytes: &[u8], i: usize) -> bool {
    bytes[i..].starts_with(b"::")
        && (i == 0 || bytes[i - 1].is_ascii_whitespace())
        && bytes.get(i + 2).is_none_or(|b| b.is_ascii_whitespace())
}
