//! Decoding of the `media` member of a package.
//!
//! Producers write it as plain JSON, as Zstandard-compressed JSON, or as a
//! binary wire message. Nothing in the archive says which, so the bytes are
//! classified by content.

use crate::error::{Error, Result};
use crate::wire::{Tag, WireScanner, WireType};
use decktext_types::MediaIndex;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Magic number opening every Zstandard frame.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

const ENTRY_FIELD: u64 = 1;
const FILENAME_FIELD: u64 = 1;
const INDEX_FIELD: u64 = 2;

/// Encoding of a media index as judged from its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaIndexFormat {
    Empty,
    Zstd,
    Json,
    Binary,
}

impl std::fmt::Display for MediaIndexFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MediaIndexFormat::Empty => "empty",
            MediaIndexFormat::Zstd => "zstd",
            MediaIndexFormat::Json => "json",
            MediaIndexFormat::Binary => "binary",
        };
        write!(f, "{}", name)
    }
}

/// What the decoder saw while decoding one media index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaIndexReport {
    /// Format of the payload that produced the entries (after decompression).
    pub format: MediaIndexFormat,
    /// Whether the payload was wrapped in a Zstandard frame.
    pub compressed: bool,
    pub entries: usize,
    /// Fields of unknown wire type passed over by the binary pass.
    pub ignored_fields: usize,
    /// Binary entries dropped for lacking a filename or an index.
    pub discarded_entries: usize,
    /// The binary pass hit a scan error and its entries were dropped.
    pub degraded: bool,
}

impl MediaIndexReport {
    fn new(format: MediaIndexFormat) -> Self {
        Self {
            format,
            compressed: false,
            entries: 0,
            ignored_fields: 0,
            discarded_entries: 0,
            degraded: false,
        }
    }
}

/// Classify raw media index bytes without decoding them.
pub fn classify(bytes: &[u8]) -> MediaIndexFormat {
    if bytes.is_empty() {
        return MediaIndexFormat::Empty;
    }
    if bytes.starts_with(&ZSTD_MAGIC) {
        return MediaIndexFormat::Zstd;
    }
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => MediaIndexFormat::Json,
        _ => MediaIndexFormat::Binary,
    }
}

pub fn decode(raw: &[u8]) -> Result<MediaIndex> {
    decode_with_report(raw).map(|(index, _)| index)
}

/// Decode a media index and describe how it was decoded.
///
/// Only a failing Zstandard frame is an error. A binary payload that cannot be
/// scanned yields an empty index.
pub fn decode_with_report(raw: &[u8]) -> Result<(MediaIndex, MediaIndexReport)> {
    let outer = classify(raw);
    let decompressed;
    let (bytes, compressed) = if outer == MediaIndexFormat::Zstd {
        decompressed = decompress(raw)?;
        (decompressed.as_slice(), true)
    } else {
        (raw, false)
    };

    let format = match classify(bytes) {
        // A frame inside a frame is not something any producer writes.
        MediaIndexFormat::Zstd => MediaIndexFormat::Binary,
        other => other,
    };

    let (index, mut report) = match format {
        MediaIndexFormat::Empty => (MediaIndex::new(), MediaIndexReport::new(format)),
        MediaIndexFormat::Json => match serde_json::from_slice::<BTreeMap<String, String>>(bytes) {
            Ok(map) => (MediaIndex::from(map), MediaIndexReport::new(format)),
            Err(err) => {
                debug!(error = %err, "media index is not JSON, trying binary");
                decode_binary_lenient(bytes)
            }
        },
        MediaIndexFormat::Zstd | MediaIndexFormat::Binary => decode_binary_lenient(bytes),
    };

    report.compressed = compressed;
    report.entries = index.len();
    debug!(
        format = %report.format,
        compressed = report.compressed,
        entries = report.entries,
        "media index decoded"
    );
    Ok((index, report))
}

fn decompress(raw: &[u8]) -> Result<Vec<u8>> {
    zstd::stream::decode_all(raw)
        .map_err(|err| Error::CorruptContainer(format!("media index: {}", err)))
}

fn decode_binary_lenient(bytes: &[u8]) -> (MediaIndex, MediaIndexReport) {
    let mut report = MediaIndexReport::new(MediaIndexFormat::Binary);
    match decode_binary(bytes, &mut report) {
        Ok(index) => (index, report),
        Err(err) => {
            warn!("media index could not be scanned, ignoring it: {}", err);
            report.degraded = true;
            (MediaIndex::new(), report)
        }
    }
}

fn decode_binary(bytes: &[u8], report: &mut MediaIndexReport) -> Result<MediaIndex> {
    let mut index = MediaIndex::new();
    let mut scanner = WireScanner::new(bytes);

    while !scanner.is_at_end() {
        let start = scanner.position();
        let tag = scanner.read_tag()?;

        if tag.field_number == ENTRY_FIELD && tag.wire_type == WireType::LengthDelimited {
            let entry = scanner.read_length_delimited()?;
            match decode_entry(entry, report)? {
                Some((name, number)) => {
                    index.insert(number.to_string(), name);
                }
                None => report.discarded_entries += 1,
            }
        } else {
            scanner.skip(tag)?;
        }

        scanner.ensure_progress(start)?;
    }

    report.ignored_fields += scanner.ignored_fields();
    Ok(index)
}

fn decode_entry(bytes: &[u8], report: &mut MediaIndexReport) -> Result<Option<(String, u64)>> {
    let mut scanner = WireScanner::new(bytes);
    let mut name = None;
    let mut number = None;

    while !scanner.is_at_end() {
        let start = scanner.position();
        let tag: Tag = scanner.read_tag()?;

        match (tag.field_number, tag.wire_type) {
            (FILENAME_FIELD, WireType::LengthDelimited) => {
                let raw = scanner.read_length_delimited()?;
                name = Some(String::from_utf8_lossy(raw).into_owned());
            }
            (INDEX_FIELD, WireType::Varint) => number = Some(scanner.read_varint()?),
            _ => scanner.skip(tag)?,
        }

        scanner.ensure_progress(start)?;
    }

    report.ignored_fields += scanner.ignored_fields();
    Ok(name.zip(number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::write_varint;

    fn entry(name: Option<&[u8]>, number: Option<u64>) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some(name) = name {
            out.push(0x0a);
            write_varint(name.len() as u64, &mut out);
            out.extend_from_slice(name);
        }
        if let Some(number) = number {
            out.push(0x10);
            write_varint(number, &mut out);
        }
        out
    }

    fn message(entries: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::new();
        for e in entries {
            out.push(0x0a);
            write_varint(e.len() as u64, &mut out);
            out.extend_from_slice(e);
        }
        out
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(b""), MediaIndexFormat::Empty);
        assert_eq!(classify(b"  {\"0\": \"a.png\"}"), MediaIndexFormat::Json);
        assert_eq!(classify(&[0x28, 0xB5, 0x2F, 0xFD, 0]), MediaIndexFormat::Zstd);
        assert_eq!(classify(&[0x0a, 0x00]), MediaIndexFormat::Binary);
    }

    #[test]
    fn test_empty_input_is_empty_index() {
        let (index, report) = decode_with_report(b"").unwrap();
        assert!(index.is_empty());
        assert_eq!(report.format, MediaIndexFormat::Empty);
    }

    #[test]
    fn test_plain_json() {
        let index = decode(br#"{"0": "cat.jpg", "1": "dog.mp3"}"#).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("1"), Some("dog.mp3"));
    }

    #[test]
    fn test_zstd_compressed_empty_object() {
        let raw = zstd::stream::encode_all(&b"{}"[..], 0).unwrap();
        assert!(raw.starts_with(&ZSTD_MAGIC));

        let (index, report) = decode_with_report(&raw).unwrap();
        assert!(index.is_empty());
        assert!(report.compressed);
        assert_eq!(report.format, MediaIndexFormat::Json);
        assert_eq!(report.entries, 0);
    }

    #[test]
    fn test_broken_zstd_frame_is_corrupt_container() {
        let raw = [0x28, 0xB5, 0x2F, 0xFD, 0xff, 0xff];
        assert!(matches!(decode(&raw), Err(Error::CorruptContainer(_))));
    }

    #[test]
    fn test_binary_entries() {
        let raw = message(&[
            entry(Some(b"cat.jpg"), Some(0)),
            entry(Some(b"dog.mp3"), Some(1)),
        ]);
        let (index, report) = decode_with_report(&raw).unwrap();
        assert_eq!(index.get("0"), Some("cat.jpg"));
        assert_eq!(index.get("1"), Some("dog.mp3"));
        assert_eq!(report.format, MediaIndexFormat::Binary);
        assert_eq!(report.entries, 2);
    }

    #[test]
    fn test_zstd_compressed_binary() {
        let raw = message(&[entry(Some(b"a.png"), Some(7))]);
        let compressed = zstd::stream::encode_all(raw.as_slice(), 3).unwrap();
        let index = decode(&compressed).unwrap();
        assert_eq!(index.get("7"), Some("a.png"));
    }

    #[test]
    fn test_incomplete_entries_are_discarded() {
        let raw = message(&[
            entry(Some(b"no-index.png"), None),
            entry(None, Some(3)),
            entry(Some(b"ok.png"), Some(4)),
        ]);
        let (index, report) = decode_with_report(&raw).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("4"), Some("ok.png"));
        assert_eq!(report.discarded_entries, 2);
    }

    #[test]
    fn test_unrelated_fields_are_skipped() {
        let mut inner = entry(Some(b"x.png"), Some(2));
        // field 3 fixed32, field 4 fixed64 inside the entry
        inner.extend_from_slice(&[0x1d, 1, 2, 3, 4]);
        inner.extend_from_slice(&[0x21, 0, 0, 0, 0, 0, 0, 0, 0]);

        let mut raw = Vec::new();
        // top-level field 2 varint before the entry
        raw.extend_from_slice(&[0x10, 0x96, 0x01]);
        raw.extend(message(&[inner]));

        let index = decode(&raw).unwrap();
        assert_eq!(index.get("2"), Some("x.png"));
    }

    #[test]
    fn test_unknown_wire_types_are_counted() {
        let mut inner = entry(Some(b"x.png"), Some(5));
        // field 3, wire type 3
        inner.push(0x1b);
        let raw = message(&[inner.clone()]);

        let (index, report) = decode_with_report(&raw).unwrap();
        assert_eq!(index.get("5"), Some("x.png"));
        assert_eq!(report.ignored_fields, 1);
        assert!(!report.degraded);

        // field 4 wire type 6 and field 7 wire type 7 at the top level
        let mut raw = vec![0x26];
        raw.extend(message(&[inner]));
        raw.push(0x3f);

        let (index, report) = decode_with_report(&raw).unwrap();
        assert_eq!(index.get("5"), Some("x.png"));
        assert_eq!(report.ignored_fields, 3);
    }

    #[test]
    fn test_invalid_utf8_filename_is_replaced() {
        let raw = message(&[entry(Some(&[b'a', 0xff, b'b']), Some(0))]);
        let index = decode(&raw).unwrap();
        assert_eq!(index.get("0"), Some("a\u{fffd}b"));
    }

    #[test]
    fn test_truncated_binary_degrades_to_empty() {
        let mut raw = message(&[entry(Some(b"ok.png"), Some(0))]);
        raw.extend_from_slice(&[0x0a, 0x80]);

        let (index, report) = decode_with_report(&raw).unwrap();
        assert!(index.is_empty());
        assert!(report.degraded);
    }

    #[test]
    fn test_malformed_json_falls_back_to_binary() {
        let (index, report) = decode_with_report(b"{not json").unwrap();
        assert!(index.is_empty());
        assert_eq!(report.format, MediaIndexFormat::Binary);
    }
}
