use crate::grammar::ParsedDocument;
use decktext_types::{Guid, IdentitySet};
use serde::Serialize;
use std::collections::BTreeSet;

/// Outcome of comparing the keys a text file expects with the keys a package
/// actually holds. Diagnostic only; neither source is touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub matches: BTreeSet<Guid>,
    /// In the text, absent from the package: new cards not yet built.
    pub missing: BTreeSet<Guid>,
    /// In the package, absent from the text: cards deleted from the text.
    pub unexpected: BTreeSet<Guid>,
}

impl VerifyReport {
    pub fn is_success(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

pub fn verify(expected: &IdentitySet, actual: &IdentitySet) -> VerifyReport {
    let expected = expected.guids();
    let actual = actual.guids();

    VerifyReport {
        matches: expected.intersection(&actual).cloned().collect(),
        missing: expected.difference(&actual).cloned().collect(),
        unexpected: actual.difference(&expected).cloned().collect(),
    }
}

/// Keys a parsed text file expects to find, explicit or derived.
pub fn text_identities(doc: &ParsedDocument) -> IdentitySet {
    let mut set = IdentitySet::new();
    for card in &doc.cards {
        set.insert(card.key.clone(), card.card.front());
    }
    set
}
