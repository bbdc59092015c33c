use crate::collection;
use crate::error::Result;
use crate::payload::LEGACY_DATABASES;
use crate::reader::MEDIA_INDEX_FILE;
use crate::schema::{self, COLLECTION_VERSION};
use chrono::Utc;
use decktext_core::registry;
use decktext_core::{InferredArity, KeyedCard, infer};
use decktext_types::{Family, Guid, join_fields};
use regex::Regex;
use rusqlite::{Connection, params};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, warn};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Database member name of written packages.
pub const WRITTEN_DATABASE: &str = LEGACY_DATABASES[1];

static CLOZE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{c(\d+)::").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// What a write produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub deck_id: i64,
    pub notes: usize,
    pub cards: usize,
    pub media: usize,
    /// Cards dropped because an earlier card of the batch had the same key.
    pub duplicates: usize,
    pub arity: InferredArity,
}

/// Collects a batch of keyed cards and writes them as one package.
///
/// Every note's guid is its card's key, so a later dump yields the same keys.
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    deck_name: String,
    cards: Vec<KeyedCard>,
    media: Vec<PathBuf>,
}

impl DeckBuilder {
    pub fn new(deck_name: impl Into<String>) -> Self {
        Self {
            deck_name: deck_name.into(),
            cards: Vec::new(),
            media: Vec::new(),
        }
    }

    pub fn with_cards(mut self, cards: impl IntoIterator<Item = KeyedCard>) -> Self {
        self.cards.extend(cards);
        self
    }

    pub fn add_media(&mut self, path: impl Into<PathBuf>) {
        self.media.push(path.into());
    }

    pub fn deck_id(&self) -> i64 {
        deck_id_for(&self.deck_name)
    }

    /// Write the package to `output`.
    ///
    /// Fails with `EmptyBatch` when no card was added. Field arity is inferred
    /// from the whole batch before the first note is written.
    pub fn write_to(&self, output: &Path) -> Result<WriteSummary> {
        if self.cards.is_empty() {
            return Err(decktext_core::Error::EmptyBatch.into());
        }

        let arity = infer(self.cards.iter().map(|c| &c.card));
        let workdir = tempfile::Builder::new()
            .prefix("decktext-build-")
            .tempdir()?;
        let db_path = workdir.path().join(WRITTEN_DATABASE);

        let mut summary = {
            let mut conn = Connection::open(&db_path)?;
            self.write_collection(&mut conn, arity)?
        };

        summary.media = write_archive(output, &db_path, &self.media)?;

        info!(
            output = %output.display(),
            notes = summary.notes,
            cards = summary.cards,
            media = summary.media,
            "package written"
        );
        Ok(summary)
    }

    fn write_collection(&self, conn: &mut Connection, arity: InferredArity) -> Result<WriteSummary> {
        schema::init_schema(conn)?;

        let now = Utc::now();
        let secs = now.timestamp();
        let millis = now.timestamp_millis();
        let deck_id = self.deck_id();

        let mut summary = WriteSummary {
            deck_id,
            notes: 0,
            cards: 0,
            media: 0,
            duplicates: 0,
            arity,
        };

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO col (id, crt, mod, scm, ver, dty, usn, ls, conf, models, decks, dconf, tags)
             VALUES (1, ?1, ?2, ?3, ?4, 0, 0, 0, ?5, ?6, ?7, ?8, '{}')",
            params![
                secs,
                millis,
                millis,
                COLLECTION_VERSION,
                collection::conf_json(deck_id).to_string(),
                collection::models_json(arity, deck_id, secs).to_string(),
                collection::decks_json(deck_id, &self.deck_name, secs).to_string(),
                collection::dconf_json(secs).to_string(),
            ],
        )?;

        let mut seen: HashSet<&Guid> = HashSet::new();
        for card in &self.cards {
            if !seen.insert(&card.key) {
                warn!(key = %card.key, "duplicate key in batch, keeping the first card");
                summary.duplicates += 1;
                continue;
            }

            let family = card.card.family;
            let fields = arity.model(family).pad(card.card.field_values.clone());
            let sort_field = strip_html(&fields[0]);
            let note_id = millis + summary.notes as i64;

            tx.execute(
                "INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
                 VALUES (?1, ?2, ?3, ?4, -1, '', ?5, ?6, ?7, 0, '')",
                params![
                    note_id,
                    card.key.as_str(),
                    registry::model(family).id,
                    secs,
                    join_fields(&fields),
                    sort_field,
                    checksum(&sort_field),
                ],
            )?;
            summary.notes += 1;

            for ord in card_ordinals(family, &fields[0]) {
                tx.execute(
                    "INSERT INTO cards (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor,
                                        reps, lapses, left, odue, odid, flags, data)
                     VALUES (?1, ?2, ?3, ?4, ?5, -1, 0, 0, ?6, 0, 0, 0, 0, 0, 0, 0, 0, '')",
                    params![
                        millis + summary.cards as i64,
                        note_id,
                        deck_id,
                        ord,
                        secs,
                        summary.notes as i64,
                    ],
                )?;
                summary.cards += 1;
            }
        }
        tx.commit()?;

        Ok(summary)
    }
}

fn write_archive(output: &Path, db_path: &Path, media: &[PathBuf]) -> Result<usize> {
    let file = File::create(output)?;
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(WRITTEN_DATABASE, options)?;
    std::io::copy(&mut File::open(db_path)?, &mut zip)?;

    let mut index = BTreeMap::new();
    for (number, path) in media.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| number.to_string());
        zip.start_file(number.to_string(), options)?;
        std::io::copy(&mut File::open(path)?, &mut zip)?;
        index.insert(number.to_string(), name);
    }

    zip.start_file(MEDIA_INDEX_FILE, options)?;
    zip.write_all(serde_json::to_string(&index)?.as_bytes())?;
    zip.finish()?;

    Ok(index.len())
}

/// Stable deck id in Anki's generated range `[2^30, 2^31)`.
pub fn deck_id_for(name: &str) -> i64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let value = u64::from_be_bytes(prefix) % (1 << 30);
    (value + (1 << 30)) as i64
}

/// Card ordinals of a note: one per distinct cloze number, or a single card.
fn card_ordinals(family: Family, first_field: &str) -> Vec<i64> {
    if family == Family::Basic {
        return vec![0];
    }
    let numbers: BTreeSet<i64> = CLOZE_NUMBER
        .captures_iter(first_field)
        .filter_map(|caps| caps[1].parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .map(|n| n - 1)
        .collect();
    if numbers.is_empty() {
        vec![0]
    } else {
        numbers.into_iter().collect()
    }
}

fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").trim().to_string()
}

/// Anki's duplicate-check value: the first 32 bits of SHA-1.
fn checksum(text: &str) -> i64 {
    let digest = Sha1::digest(text.as_bytes());
    i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}
