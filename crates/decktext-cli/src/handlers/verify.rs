use crate::context::ExecutionContext;
use crate::presentation::presenters;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, Guidance, StatusBadge};
use anyhow::Result;
use decktext_core::{parse_document, text_identities, verify};
use std::path::Path;

/// Report how the keys of `text_path` and `apkg` differ. A mismatch is a
/// report, not an error.
pub fn handle(ctx: &ExecutionContext, text_path: &Path, apkg: &Path, verbose: bool) -> Result<()> {
    let text = super::read_text(text_path)?;
    let doc = parse_document(&text);
    let expected = text_identities(&doc);

    let package = super::open_package(apkg)?;
    let actual = package.identities()?;

    let report = verify(&expected, &actual);
    let view_model = presenters::present_verify(
        text_path,
        apkg,
        &expected,
        &actual,
        &report,
        &doc.skipped,
        verbose,
    );

    let mut result = CommandResultViewModel::new(view_model);
    if report.is_success() {
        result = result.with_badge(StatusBadge::success("All keys match"));
    } else {
        result = result.with_badge(StatusBadge::warning("Keys differ"));
        if !report.missing.is_empty() {
            result = result.with_suggestion(
                Guidance::new("Rebuild the package to include new cards")
                    .with_command(format!("decktext build {}", text_path.display())),
            );
        }
        if !report.unexpected.is_empty() {
            result = result.with_suggestion(Guidance::new(
                "Cards removed from the text stay in Anki until deleted there",
            ));
        }
    }

    ConsoleRenderer::new(ctx.json()).render(result)
}
