use crate::Family;

/// Minimum number of fields any generated model carries.
pub const MIN_ARITY: usize = 2;

/// Field layout of one family for a single generation run.
///
/// Derived from the widest card of the family in the batch; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldModel {
    pub family: Family,
    pub arity: usize,
}

impl FieldModel {
    /// Create a model, raising `arity` to the floor of [`MIN_ARITY`].
    pub fn new(family: Family, arity: usize) -> Self {
        Self {
            family,
            arity: arity.max(MIN_ARITY),
        }
    }

    /// Whether a card with `count` fields fits without truncation.
    pub fn fits(&self, count: usize) -> bool {
        count <= self.arity
    }

    /// Pad `fields` with trailing empty strings up to exactly `arity`.
    ///
    /// Callers must only pass cards that fit; fields are never dropped.
    pub fn pad(&self, mut fields: Vec<String>) -> Vec<String> {
        debug_assert!(self.fits(fields.len()));
        if fields.len() < self.arity {
            fields.resize(self.arity, String::new());
        }
        fields
    }
}
