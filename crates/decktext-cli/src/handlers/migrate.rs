use crate::context::ExecutionContext;
use crate::presentation::presenters;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, StatusBadge};
use anyhow::{Context, Result};
use decktext_core::migrate_document;
use decktext_package::front_index;
use std::path::Path;

/// Stamp keys into `text_path`, reusing the keys of matching fronts in `apkg`.
pub fn handle(ctx: &ExecutionContext, text_path: &Path, apkg: &Path) -> Result<()> {
    let text = super::read_text(text_path)?;

    let package = super::open_package(apkg)?;
    let recovered = front_index(&package.notes()?);

    let outcome = migrate_document(&text, &recovered);
    let view_model = presenters::present_migrate(text_path, apkg, &outcome);

    if view_model.rewritten {
        std::fs::write(text_path, &outcome.text)
            .with_context(|| format!("Failed to write {}", text_path.display()))?;
    }

    let badge = if view_model.rewritten {
        StatusBadge::success(format!(
            "Stamped {} keys",
            outcome.recovered + outcome.derived
        ))
    } else {
        StatusBadge::info("Every card already has a key")
    };

    ConsoleRenderer::new(ctx.json()).render(CommandResultViewModel::new(view_model).with_badge(badge))
}
