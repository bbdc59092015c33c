use crate::error::{Error, Result};
use crate::media_index::{self, MediaIndexReport};
use crate::payload::{self, DatabasePayload};
use crate::store::{self, NoteStore, SqliteNoteStore};
use decktext_types::{IdentitySet, MediaIndex, RawNote};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Name of the media index member.
pub const MEDIA_INDEX_FILE: &str = "media";

/// A package unpacked into a private working directory.
///
/// The directory lives as long as this value and is removed when it drops,
/// on success and error paths alike.
pub struct ExtractedPackage {
    // Declared before `workdir` so the connection closes before the directory
    // is removed.
    store: SqliteNoteStore,
    payload: DatabasePayload,
    database: PathBuf,
    media: MediaIndex,
    media_report: MediaIndexReport,
    workdir: TempDir,
}

impl ExtractedPackage {
    pub fn open(apkg: &Path) -> Result<Self> {
        let workdir = tempfile::Builder::new().prefix("decktext-").tempdir()?;
        extract_archive(apkg, workdir.path())?;

        let (media, media_report) = restore_media(workdir.path())?;

        let names = member_names(workdir.path())?;
        let payload = payload::select(names.iter().map(String::as_str))?;
        let database = payload::materialize(workdir.path(), &payload)?;
        let store = SqliteNoteStore::open(&database)?;

        info!(
            package = %apkg.display(),
            database = payload.file_name(),
            media = media.len(),
            "package extracted"
        );

        Ok(Self {
            store,
            payload,
            database,
            media,
            media_report,
            workdir,
        })
    }

    pub fn notes(&self) -> Result<Vec<RawNote>> {
        self.store.fetch_notes()
    }

    pub fn identities(&self) -> Result<IdentitySet> {
        store::identities(&self.store)
    }

    pub fn payload(&self) -> &DatabasePayload {
        &self.payload
    }

    pub fn database_path(&self) -> &Path {
        &self.database
    }

    pub fn media_index(&self) -> &MediaIndex {
        &self.media
    }

    pub fn media_report(&self) -> &MediaIndexReport {
        &self.media_report
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    /// Copy every media file into `target`, creating it if needed. Returns the
    /// number of files copied.
    pub fn export_media(&self, target: &Path) -> Result<usize> {
        fs::create_dir_all(target)?;

        let mut copied = 0;
        for entry in WalkDir::new(self.workdir.path()).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| Error::Io(err.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if payload::is_collection_file(&name) {
                continue;
            }
            fs::copy(entry.path(), target.join(entry.file_name()))?;
            copied += 1;
        }

        debug!(count = copied, target = %target.display(), "media exported");
        Ok(copied)
    }
}

fn extract_archive(apkg: &Path, dir: &Path) -> Result<()> {
    let file = File::open(apkg)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|err| Error::CorruptContainer(format!("{}: {}", apkg.display(), err)))?;
    archive
        .extract(dir)
        .map_err(|err| Error::CorruptContainer(format!("{}: {}", apkg.display(), err)))?;
    Ok(())
}

/// Drop the media index member, then rename numbered payload files back to
/// their original names.
///
/// The index is removed first so a media file that is itself called `media`
/// survives. Names that would land on a database member are not restored.
fn restore_media(dir: &Path) -> Result<(MediaIndex, MediaIndexReport)> {
    let index_path = dir.join(MEDIA_INDEX_FILE);
    let raw = match fs::read(&index_path) {
        Ok(raw) => {
            fs::remove_file(&index_path)?;
            raw
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(err) => return Err(err.into()),
    };

    let (media, report) = media_index::decode_with_report(&raw)?;

    for (id, name) in media.iter() {
        let Some(file_name) = Path::new(name).file_name() else {
            warn!(id, name, "media entry has no usable file name");
            continue;
        };
        if payload::is_collection_file(&file_name.to_string_lossy()) {
            warn!(id, name, "media entry would replace a collection database, skipped");
            continue;
        }
        let source = dir.join(id);
        if !source.is_file() {
            debug!(id, name, "media payload missing from archive");
            continue;
        }
        fs::rename(&source, dir.join(file_name))?;
    }

    Ok((media, report))
}

fn member_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
