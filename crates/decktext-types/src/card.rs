use crate::Guid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card template class. Each family has its own identity salt and arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Front/back style card.
    Basic,
    /// In-place blank (`{{c1::...}}`) card.
    Cloze,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Basic => write!(f, "basic"),
            Family::Cloze => write!(f, "cloze"),
        }
    }
}

/// One card in its text-line form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCard {
    /// Explicit key from a `[key] ` prefix, if the line carried one.
    pub guid: Option<Guid>,
    pub field_values: Vec<String>,
    pub family: Family,
}

impl TextCard {
    pub fn is_cloze(&self) -> bool {
        self.family == Family::Cloze
    }

    pub fn front(&self) -> &str {
        self.field_values
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }
}
