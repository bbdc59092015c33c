use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct StatusBadge {
    pub level: StatusLevel,
    pub label: String,
}

impl StatusBadge {
    pub fn success(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            label: label.into(),
        }
    }

    pub fn info(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            label: label.into(),
        }
    }

    pub fn warning(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            label: label.into(),
        }
    }

    pub fn icon(&self) -> &str {
        match self.level {
            StatusLevel::Success => "✅",
            StatusLevel::Info => "ℹ️",
            StatusLevel::Warning => "⚠️",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Success,
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct Guidance {
    pub description: String,
    pub command: Option<String>,
}

impl Guidance {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResultViewModel<T>
where
    T: Serialize,
{
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<StatusBadge>,

    pub content: T,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Guidance>,
}

impl<T> CommandResultViewModel<T>
where
    T: Serialize,
{
    pub fn new(content: T) -> Self {
        Self {
            badge: None,
            content,
            suggestions: Vec::new(),
        }
    }

    pub fn with_badge(mut self, badge: StatusBadge) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn with_suggestion(mut self, guide: Guidance) -> Self {
        self.suggestions.push(guide);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaIndexViewModel {
    pub format: String,
    pub compressed: bool,
    pub entries: usize,
    pub ignored_fields: usize,
    pub discarded_entries: usize,
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DumpViewModel {
    pub package: String,
    pub database: String,
    pub output_dir: String,
    pub cards_file: String,
    pub preview_file: String,
    pub notes: usize,
    pub media_files: usize,
    pub media_index: MediaIndexViewModel,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedLineViewModel {
    pub line: usize,
    pub content: String,
}

/// Keys of each verifier set, sorted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeySetsViewModel {
    pub matches: Vec<String>,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyViewModel {
    pub text: String,
    pub package: String,
    pub expected: usize,
    pub actual: usize,
    pub success: bool,
    pub report: KeySetsViewModel,
    /// First field of every key that did not match, for display.
    pub labels: BTreeMap<String, String>,
    pub skipped_lines: Vec<SkippedLineViewModel>,
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildViewModel {
    pub text: String,
    pub output: String,
    pub deck_name: String,
    pub deck_id: i64,
    pub notes: usize,
    pub cards: usize,
    pub media: usize,
    pub duplicates: usize,
    pub basic_arity: usize,
    pub cloze_arity: usize,
    pub skipped_lines: Vec<SkippedLineViewModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerifyViewModel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrateViewModel {
    pub text: String,
    pub package: String,
    pub recovered: usize,
    pub derived: usize,
    pub unchanged: usize,
    pub rewritten: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteSummaryViewModel {
    pub guid: String,
    pub front: String,
    pub fields: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectViewModel {
    pub package: String,
    pub database: String,
    pub notes: usize,
    pub media_index: MediaIndexViewModel,
    pub sample: Vec<NoteSummaryViewModel>,
}
