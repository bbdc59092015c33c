use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Zstandard-compressed collection written by current Anki versions.
pub const MODERN_DATABASE: &str = "collection.anki21b";

/// Directly usable collections, in order of preference.
pub const LEGACY_DATABASES: [&str; 2] = ["collection.anki21", "collection.anki2"];

/// Name of the decompressed modern collection inside the extraction area.
pub const DECOMPRESSED_DATABASE: &str = "collection.decompressed.db";

/// Which member of the archive holds the notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabasePayload {
    Modern(String),
    Legacy(String),
}

impl DatabasePayload {
    pub fn file_name(&self) -> &str {
        match self {
            DatabasePayload::Modern(name) | DatabasePayload::Legacy(name) => name,
        }
    }
}

/// Pick the note database among the extracted file names.
pub fn select<'a, I>(file_names: I) -> Result<DatabasePayload>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = file_names.into_iter().collect();

    if names.contains(&MODERN_DATABASE) {
        return Ok(DatabasePayload::Modern(MODERN_DATABASE.to_string()));
    }

    LEGACY_DATABASES
        .iter()
        .find(|candidate| names.contains(candidate))
        .map(|name| DatabasePayload::Legacy(name.to_string()))
        .ok_or(Error::MissingDatabase)
}

/// Return a path SQLite can open for `payload`, decompressing a modern
/// collection into `dir` first.
pub fn materialize(dir: &Path, payload: &DatabasePayload) -> Result<PathBuf> {
    match payload {
        DatabasePayload::Legacy(name) => Ok(dir.join(name)),
        DatabasePayload::Modern(name) => {
            let source = dir.join(name);
            let target = dir.join(DECOMPRESSED_DATABASE);

            let reader = BufReader::new(File::open(&source)?);
            let writer = BufWriter::new(File::create(&target)?);
            zstd::stream::copy_decode(reader, writer)
                .map_err(|err| Error::CorruptContainer(format!("{}: {}", name, err)))?;

            debug!(source = %source.display(), target = %target.display(), "collection decompressed");
            Ok(target)
        }
    }
}

/// True for the database members a package or its extraction area may hold.
/// Media files never take one of these names.
pub fn is_collection_file(name: &str) -> bool {
    name == MODERN_DATABASE || name == DECOMPRESSED_DATABASE || LEGACY_DATABASES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_collection_files_match_exact_names() {
        assert!(is_collection_file("collection.anki21b"));
        assert!(is_collection_file("collection.anki21"));
        assert!(is_collection_file("collection.anki2"));
        assert!(is_collection_file("collection.decompressed.db"));
        assert!(!is_collection_file("collection.png"));
        assert!(!is_collection_file("collection.anki2.bak"));
        assert!(!is_collection_file("media"));
    }

    #[test]
    fn test_modern_wins_over_legacy() {
        let payload = select(["collection.anki2", "media", MODERN_DATABASE]).unwrap();
        assert_eq!(payload, DatabasePayload::Modern(MODERN_DATABASE.to_string()));
    }

    #[test]
    fn test_legacy_preference_order() {
        let payload = select(["collection.anki2", "collection.anki21", "0"]).unwrap();
        assert_eq!(payload.file_name(), "collection.anki21");

        let payload = select(["collection.anki2"]).unwrap();
        assert_eq!(payload, DatabasePayload::Legacy("collection.anki2".to_string()));
    }

    #[test]
    fn test_missing_database() {
        assert!(matches!(select(["media", "0"]), Err(Error::MissingDatabase)));
        assert!(matches!(select(std::iter::empty()), Err(Error::MissingDatabase)));
    }

    #[test]
    fn test_materialize_legacy_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = materialize(dir.path(), &DatabasePayload::Legacy("collection.anki2".into()))
            .unwrap();
        assert_eq!(path, dir.path().join("collection.anki2"));
    }

    #[test]
    fn test_materialize_modern_decompresses() {
        let dir = tempfile::tempdir().unwrap();
        let compressed = zstd::stream::encode_all(&b"SQLite format 3\0"[..], 0).unwrap();
        File::create(dir.path().join(MODERN_DATABASE))
            .unwrap()
            .write_all(&compressed)
            .unwrap();

        let path = materialize(dir.path(), &DatabasePayload::Modern(MODERN_DATABASE.into()))
            .unwrap();
        assert_eq!(path.file_name().unwrap(), DECOMPRESSED_DATABASE);
        assert_eq!(std::fs::read(path).unwrap(), b"SQLite format 3\0");
    }

    #[test]
    fn test_materialize_garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MODERN_DATABASE), b"not zstd").unwrap();
        let err = materialize(dir.path(), &DatabasePayload::Modern(MODERN_DATABASE.into()));
        assert!(matches!(err, Err(Error::CorruptContainer(_))));
    }
}
