//! Hand-assembled packages.
//!
//! Built directly with SQLite, zip and zstd so the reader is tested against
//! bytes it did not write itself.

use anyhow::Result;
use rusqlite::{Connection, params};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Which collection member the package carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseLayout {
    /// `collection.anki2`
    Anki2,
    /// `collection.anki21`
    Anki21,
    /// `collection.anki21b`, Zstandard-compressed
    Anki21b,
    /// No collection at all
    Missing,
}

/// How the `media` member is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEncoding {
    Absent,
    Json,
    ZstdJson,
    Binary,
    ZstdBinary,
}

/// Builder for a package on disk.
///
/// # Example
/// ```no_run
/// use decktext_testing::{DatabaseLayout, PackageFixture};
///
/// let dir = tempfile::tempdir().unwrap();
/// PackageFixture::new()
///     .layout(DatabaseLayout::Anki21b)
///     .note("g1", &["Front", "Back"])
///     .write(&dir.path().join("deck.apkg"))
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PackageFixture {
    layout: DatabaseLayout,
    media_encoding: MediaEncoding,
    notes: Vec<(String, Vec<String>)>,
    media: Vec<(String, Vec<u8>)>,
}

impl Default for PackageFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageFixture {
    pub fn new() -> Self {
        Self {
            layout: DatabaseLayout::Anki2,
            media_encoding: MediaEncoding::Json,
            notes: Vec::new(),
            media: Vec::new(),
        }
    }

    pub fn layout(mut self, layout: DatabaseLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn media_encoding(mut self, encoding: MediaEncoding) -> Self {
        self.media_encoding = encoding;
        self
    }

    /// Add a note with `guid` and the given fields.
    pub fn note(mut self, guid: &str, fields: &[&str]) -> Self {
        self.notes.push((
            guid.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        ));
        self
    }

    /// Add a media file, stored under the next numeric index.
    pub fn media(mut self, name: &str, bytes: &[u8]) -> Self {
        self.media.push((name.to_string(), bytes.to_vec()));
        self
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let scratch = tempfile::tempdir()?;
        let db_path = scratch.path().join("collection.db");
        self.write_database(&db_path)?;
        let db_bytes = std::fs::read(&db_path)?;

        let mut zip = ZipWriter::new(File::create(path)?);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        match self.layout {
            DatabaseLayout::Anki2 => {
                zip.start_file("collection.anki2", options)?;
                zip.write_all(&db_bytes)?;
            }
            DatabaseLayout::Anki21 => {
                zip.start_file("collection.anki21", options)?;
                zip.write_all(&db_bytes)?;
            }
            DatabaseLayout::Anki21b => {
                // Current Anki also ships a stub legacy collection.
                zip.start_file("collection.anki2", options)?;
                zip.write_all(&stub_database(scratch.path())?)?;
                zip.start_file("collection.anki21b", options)?;
                zip.write_all(&zstd::stream::encode_all(db_bytes.as_slice(), 0)?)?;
            }
            DatabaseLayout::Missing => {}
        }

        for (number, (_, bytes)) in self.media.iter().enumerate() {
            zip.start_file(number.to_string(), options)?;
            zip.write_all(bytes)?;
        }

        if let Some(index) = self.media_index()? {
            zip.start_file("media", options)?;
            zip.write_all(&index)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn write_database(&self, path: &Path) -> Result<()> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE notes (
                id integer primary key,
                guid text not null,
                mid integer not null,
                mod integer not null,
                usn integer not null,
                tags text not null,
                flds text not null,
                sfld integer not null,
                csum integer not null,
                flags integer not null,
                data text not null
            );",
        )?;
        for (idx, (guid, fields)) in self.notes.iter().enumerate() {
            conn.execute(
                "INSERT INTO notes VALUES (?1, ?2, 1, 0, -1, '', ?3, ?4, 0, 0, '')",
                params![idx as i64 + 1, guid, fields.join("\u{1f}"), fields[0]],
            )?;
        }
        Ok(())
    }

    fn media_index(&self) -> Result<Option<Vec<u8>>> {
        let json = || -> Result<Vec<u8>> {
            let map: BTreeMap<String, &str> = self
                .media
                .iter()
                .enumerate()
                .map(|(number, (name, _))| (number.to_string(), name.as_str()))
                .collect();
            Ok(serde_json::to_vec(&map)?)
        };
        let binary = || {
            let entries: Vec<(&str, u64)> = self
                .media
                .iter()
                .enumerate()
                .map(|(number, (name, _))| (name.as_str(), number as u64))
                .collect();
            binary_media_index(&entries)
        };

        let bytes = match self.media_encoding {
            MediaEncoding::Absent => return Ok(None),
            MediaEncoding::Json => json()?,
            MediaEncoding::ZstdJson => zstd::stream::encode_all(json()?.as_slice(), 0)?,
            MediaEncoding::Binary => binary(),
            MediaEncoding::ZstdBinary => zstd::stream::encode_all(binary().as_slice(), 0)?,
        };
        Ok(Some(bytes))
    }
}

/// Encode `(filename, index)` pairs as a binary media index message.
pub fn binary_media_index(entries: &[(&str, u64)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, number) in entries {
        let mut entry = vec![0x0a];
        push_varint(name.len() as u64, &mut entry);
        entry.extend_from_slice(name.as_bytes());
        entry.push(0x10);
        push_varint(*number, &mut entry);
        // a trailing field the reader must skip
        entry.extend_from_slice(&[0x18, 0x01]);

        out.push(0x0a);
        push_varint(entry.len() as u64, &mut out);
        out.extend(entry);
    }
    out
}

fn push_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn stub_database(dir: &Path) -> Result<Vec<u8>> {
    let path = dir.join("stub.db");
    let conn = Connection::open(&path)?;
    conn.execute_batch(
        "CREATE TABLE notes (id integer primary key, guid text not null, flds text not null);
         INSERT INTO notes VALUES (1, 'stub', 'Please update to the latest Anki version');",
    )?;
    drop(conn);
    Ok(std::fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_index_layout() {
        let bytes = binary_media_index(&[("a", 1)]);
        assert_eq!(
            bytes,
            vec![0x0a, 0x07, 0x0a, 0x01, b'a', 0x10, 0x01, 0x18, 0x01]
        );
    }

    #[test]
    fn test_fixture_writes_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.apkg");
        PackageFixture::new()
            .layout(DatabaseLayout::Anki21b)
            .note("g1", &["Front", "Back"])
            .media("cat.jpg", b"meow")
            .write(&path)
            .unwrap();

        let archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"collection.anki21b"));
        assert!(names.contains(&"0"));
        assert!(names.contains(&"media"));
    }
}
