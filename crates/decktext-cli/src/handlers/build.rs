use crate::context::ExecutionContext;
use crate::presentation::presenters;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, Guidance, StatusBadge};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use decktext_core::{parse_document, text_identities, verify};
use decktext_package::DeckBuilder;
use std::fs;
use std::path::{Path, PathBuf};

pub struct BuildOptions {
    pub output: Option<PathBuf>,
    pub deck_name: Option<String>,
    pub media: Vec<PathBuf>,
    pub no_verify: bool,
}

pub fn handle(ctx: &ExecutionContext, text_path: &Path, options: BuildOptions) -> Result<()> {
    let text = super::read_text(text_path)?;
    let doc = parse_document(&text);
    doc.ensure_not_empty()
        .with_context(|| format!("Nothing to build from {}", text_path.display()))?;

    let config = ctx.config()?;
    let deck_name = options.deck_name.unwrap_or_else(|| {
        text_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "deck".to_string())
    });

    let output = match options.output {
        Some(path) => path,
        None => config
            .output_dir
            .join(package_file_name(&deck_name, Local::now().date_naive())),
    };
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut builder = DeckBuilder::new(deck_name.clone()).with_cards(doc.cards.iter().cloned());
    for path in options.media {
        builder.add_media(path);
    }
    let summary = builder
        .write_to(&output)
        .with_context(|| format!("Failed to write package: {}", output.display()))?;

    let verification = if config.verify_after_build && !options.no_verify {
        let package = super::open_package(&output)?;
        let expected = text_identities(&doc);
        let actual = package.identities()?;
        let report = verify(&expected, &actual);
        Some(presenters::present_verify(
            text_path, &output, &expected, &actual, &report, &[], false,
        ))
    } else {
        None
    };

    let view_model = presenters::present_build(
        text_path,
        &output,
        &deck_name,
        &summary,
        &doc.skipped,
        verification,
    );

    let verified = view_model
        .verification
        .as_ref()
        .is_none_or(|v| v.success);
    let badge = if verified {
        StatusBadge::success(format!("Built {} notes", summary.notes))
    } else {
        StatusBadge::warning(format!("Built {} notes; keys do not match", summary.notes))
    };

    let mut result = CommandResultViewModel::new(view_model).with_badge(badge);
    if !verified {
        result = result.with_suggestion(
            Guidance::new("List the mismatching keys").with_command(format!(
                "decktext verify {} {} -v",
                text_path.display(),
                output.display()
            )),
        );
    }

    ConsoleRenderer::new(ctx.json()).render(result)
}

/// `<deck>_<YYYY-MM-DD>.apkg`, with anything but letters, digits, `-` and `_`
/// in the deck name replaced by `_`.
pub fn package_file_name(deck_name: &str, date: NaiveDate) -> String {
    let safe: String = deck_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}.apkg", safe, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(package_file_name("Geo", date), "Geo_2024-03-09.apkg");
        assert_eq!(
            package_file_name("World map: capitals", date),
            "World_map__capitals_2024-03-09.apkg"
        );
    }
}
