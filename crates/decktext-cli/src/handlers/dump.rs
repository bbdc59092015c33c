use crate::context::ExecutionContext;
use crate::presentation::html::{self, MEDIA_DIR};
use crate::presentation::presenters::{self, DumpOutcome};
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, Guidance, StatusBadge};
use anyhow::{Context, Result};
use decktext_core::render_note;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CARDS_FILE: &str = "cards.txt";
pub const PREVIEW_FILE: &str = "index.html";

pub fn handle(ctx: &ExecutionContext, apkg: &Path, output_dir: Option<PathBuf>) -> Result<()> {
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => ctx.config()?.dump_dir.clone(),
    };

    let package = super::open_package(apkg)?;
    let notes = package.notes()?;

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let cards_file = output_dir.join(CARDS_FILE);
    let mut text = notes.iter().map(render_note).collect::<Vec<_>>().join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    fs::write(&cards_file, text)?;

    let title = apkg
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "deck".to_string());
    let preview_file = output_dir.join(PREVIEW_FILE);
    fs::write(&preview_file, html::render_preview(&title, &notes))?;

    // Media from an earlier dump into the same directory must not linger.
    let media_dir = output_dir.join(MEDIA_DIR);
    if media_dir.exists() {
        fs::remove_dir_all(&media_dir)
            .with_context(|| format!("Failed to clear {}", media_dir.display()))?;
    }
    let media_files = package.export_media(&media_dir)?;
    info!(notes = notes.len(), media = media_files, "dump written");

    let view_model = presenters::present_dump(DumpOutcome {
        package: &package,
        apkg,
        output_dir: &output_dir,
        cards_file: &cards_file,
        preview_file: &preview_file,
        notes: notes.len(),
        media_files,
    });

    let badge = if view_model.media_index.degraded {
        StatusBadge::warning(format!(
            "Dumped {} notes; the media index could not be read",
            notes.len()
        ))
    } else {
        StatusBadge::success(format!("Dumped {} notes", notes.len()))
    };
    let result = CommandResultViewModel::new(view_model)
        .with_badge(badge)
        .with_suggestion(
            Guidance::new("Edit the cards, then build a new package")
                .with_command(format!("decktext build {}", cards_file.display())),
        );

    ConsoleRenderer::new(ctx.json()).render(result)
}

