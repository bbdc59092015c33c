//! Static preview page of a dumped package.

use decktext_types::RawNote;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Directory next to the preview page holding the media files.
pub const MEDIA_DIR: &str = "media";

static MEDIA_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bsrc=(["'])([^"']*)["']"#).unwrap());

/// Point relative `src` attributes at the media directory.
pub fn rewrite_media_refs(html: &str) -> String {
    MEDIA_SRC
        .replace_all(html, |caps: &Captures| {
            let quote = &caps[1];
            let target = &caps[2];
            if is_external(target) {
                caps[0].to_string()
            } else {
                format!("src={q}{}/{}{q}", MEDIA_DIR, target, q = quote)
            }
        })
        .into_owned()
}

fn is_external(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    lower.is_empty()
        || lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("data:")
        || lower.starts_with('/')
        || lower.starts_with(&format!("{}/", MEDIA_DIR))
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render every note with its key. Field content is Anki HTML and is kept
/// as markup.
pub fn render_preview(title: &str, notes: &[RawNote]) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n", escape(title)));
    page.push_str(
        "<style>\n\
         body { font-family: sans-serif; max-width: 60em; margin: 2em auto; }\n\
         .note { border: 1px solid #ccc; border-radius: 4px; margin: 1em 0; padding: 0.5em 1em; }\n\
         .guid { color: #888; font-family: monospace; font-size: 0.8em; }\n\
         .field + .field { border-top: 1px dashed #ddd; margin-top: 0.5em; padding-top: 0.5em; }\n\
         </style>\n",
    );
    page.push_str("</head>\n<body>\n");
    page.push_str(&format!(
        "<h1>{}</h1>\n<p>{} notes</p>\n",
        escape(title),
        notes.len()
    ));

    for note in notes {
        page.push_str("<div class=\"note\">\n");
        page.push_str(&format!(
            "<div class=\"guid\">{}</div>\n",
            escape(note.guid.as_str())
        ));
        for field in note.fields.iter().filter(|f| !f.trim().is_empty()) {
            page.push_str(&format!(
                "<div class=\"field\">{}</div>\n",
                rewrite_media_refs(field)
            ));
        }
        page.push_str("</div>\n");
    }

    page.push_str("</body>\n</html>\n");
    page
}
