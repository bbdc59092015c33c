use super::view_models::{
    BuildViewModel, DumpViewModel, InspectViewModel, KeySetsViewModel, MediaIndexViewModel,
    MigrateViewModel, NoteSummaryViewModel, SkippedLineViewModel, VerifyViewModel,
};
use decktext_core::{MigrationOutcome, SkippedLine, VerifyReport};
use decktext_package::{ExtractedPackage, MediaIndexReport, WriteSummary};
use decktext_types::{Guid, IdentitySet, RawNote};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

const FRONT_PREVIEW_CHARS: usize = 60;

pub fn present_media_index(report: &MediaIndexReport) -> MediaIndexViewModel {
    MediaIndexViewModel {
        format: report.format.to_string(),
        compressed: report.compressed,
        entries: report.entries,
        ignored_fields: report.ignored_fields,
        discarded_entries: report.discarded_entries,
        degraded: report.degraded,
    }
}

pub struct DumpOutcome<'a> {
    pub package: &'a ExtractedPackage,
    pub apkg: &'a Path,
    pub output_dir: &'a Path,
    pub cards_file: &'a Path,
    pub preview_file: &'a Path,
    pub notes: usize,
    pub media_files: usize,
}

pub fn present_dump(outcome: DumpOutcome<'_>) -> DumpViewModel {
    DumpViewModel {
        package: outcome.apkg.display().to_string(),
        database: outcome.package.payload().file_name().to_string(),
        output_dir: outcome.output_dir.display().to_string(),
        cards_file: outcome.cards_file.display().to_string(),
        preview_file: outcome.preview_file.display().to_string(),
        notes: outcome.notes,
        media_files: outcome.media_files,
        media_index: present_media_index(outcome.package.media_report()),
    }
}

pub fn present_skipped(skipped: &[SkippedLine]) -> Vec<SkippedLineViewModel> {
    skipped
        .iter()
        .map(|s| SkippedLineViewModel {
            line: s.line_number,
            content: s.content.clone(),
        })
        .collect()
}

fn keys(set: &BTreeSet<Guid>) -> Vec<String> {
    set.iter().map(|g| g.to_string()).collect()
}

pub fn present_verify(
    text: &Path,
    apkg: &Path,
    expected: &IdentitySet,
    actual: &IdentitySet,
    report: &VerifyReport,
    skipped: &[SkippedLine],
    verbose: bool,
) -> VerifyViewModel {
    let mut labels = BTreeMap::new();
    for key in &report.missing {
        if let Some(label) = expected.label(key) {
            labels.insert(key.to_string(), label.to_string());
        }
    }
    for key in &report.unexpected {
        if let Some(label) = actual.label(key) {
            labels.insert(key.to_string(), label.to_string());
        }
    }

    VerifyViewModel {
        text: text.display().to_string(),
        package: apkg.display().to_string(),
        expected: expected.len(),
        actual: actual.len(),
        success: report.is_success(),
        report: KeySetsViewModel {
            matches: keys(&report.matches),
            missing: keys(&report.missing),
            unexpected: keys(&report.unexpected),
        },
        labels,
        skipped_lines: present_skipped(skipped),
        verbose,
    }
}

pub fn present_build(
    text: &Path,
    output: &Path,
    deck_name: &str,
    summary: &WriteSummary,
    skipped: &[SkippedLine],
    verification: Option<VerifyViewModel>,
) -> BuildViewModel {
    BuildViewModel {
        text: text.display().to_string(),
        output: output.display().to_string(),
        deck_name: deck_name.to_string(),
        deck_id: summary.deck_id,
        notes: summary.notes,
        cards: summary.cards,
        media: summary.media,
        duplicates: summary.duplicates,
        basic_arity: summary.arity.basic,
        cloze_arity: summary.arity.cloze,
        skipped_lines: present_skipped(skipped),
        verification,
    }
}

pub fn present_migrate(text: &Path, apkg: &Path, outcome: &MigrationOutcome) -> MigrateViewModel {
    MigrateViewModel {
        text: text.display().to_string(),
        package: apkg.display().to_string(),
        recovered: outcome.recovered,
        derived: outcome.derived,
        unchanged: outcome.unchanged,
        rewritten: outcome.recovered + outcome.derived > 0,
    }
}

pub fn present_inspect(
    apkg: &Path,
    package: &ExtractedPackage,
    notes: &[RawNote],
    limit: usize,
) -> InspectViewModel {
    InspectViewModel {
        package: apkg.display().to_string(),
        database: package.payload().file_name().to_string(),
        notes: notes.len(),
        media_index: present_media_index(package.media_report()),
        sample: notes
            .iter()
            .take(limit)
            .map(|note| NoteSummaryViewModel {
                guid: note.guid.to_string(),
                front: truncate(note.front().trim(), FRONT_PREVIEW_CHARS),
                fields: note.fields.len(),
            })
            .collect(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
