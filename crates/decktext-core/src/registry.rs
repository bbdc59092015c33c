//! Fixed identifiers of the generated note models.
//!
//! The model ids double as the identity salts of their family. Changing any
//! value here re-keys every card derived without an explicit key.

use decktext_types::Family;

/// Model id of the basic (front/back) model.
pub const BASIC_MODEL_ID: i64 = 1607392319;

/// Model id of the cloze model.
pub const CLOZE_MODEL_ID: i64 = 9988776655;

/// Substring that marks a cloze card in its first field.
pub const CLOZE_MARKER: &str = "{{c";

/// Delimiter written between fields of a text line.
pub const FIELD_DELIMITER: &str = " :: ";

/// Static description of one generated model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub family: Family,
    pub id: i64,
    pub name: &'static str,
}

pub const BASIC_MODEL: ModelSpec = ModelSpec {
    family: Family::Basic,
    id: BASIC_MODEL_ID,
    name: "Basic Model",
};

pub const CLOZE_MODEL: ModelSpec = ModelSpec {
    family: Family::Cloze,
    id: CLOZE_MODEL_ID,
    name: "Cloze Model",
};

/// Model for a family.
pub const fn model(family: Family) -> ModelSpec {
    match family {
        Family::Basic => BASIC_MODEL,
        Family::Cloze => CLOZE_MODEL,
    }
}

/// Identity salt of a family.
pub const fn salt(family: Family) -> i64 {
    model(family).id
}

/// Field names of a family's model with `arity` fields.
///
/// Two-field models keep the conventional names (`Front`/`Back`,
/// `Text`/`Extra`); wider basic models are numbered `Field 1..n` and wider
/// cloze models continue with `Extra 2..`.
pub fn field_names(family: Family, arity: usize) -> Vec<String> {
    match family {
        Family::Basic if arity <= 2 => vec!["Front".to_string(), "Back".to_string()],
        Family::Basic => (1..=arity).map(|i| format!("Field {}", i)).collect(),
        Family::Cloze => {
            let mut names = vec!["Text".to_string(), "Extra".to_string()];
            names.extend((2..arity).map(|i| format!("Extra {}", i)));
            names
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids_are_fixed() {
        assert_eq!(BASIC_MODEL_ID, 1607392319);
        assert_eq!(CLOZE_MODEL_ID, 9988776655);
        assert_ne!(salt(Family::Basic), salt(Family::Cloze));
    }

    #[test]
    fn test_basic_field_names() {
        assert_eq!(field_names(Family::Basic, 2), vec!["Front", "Back"]);
        assert_eq!(
            field_names(Family::Basic, 3),
            vec!["Field 1", "Field 2", "Field 3"]
        );
    }

    #[test]
    fn test_cloze_field_names() {
        assert_eq!(field_names(Family::Cloze, 2), vec!["Text", "Extra"]);
        assert_eq!(
            field_names(Family::Cloze, 4),
            vec!["Text", "Extra", "Extra 2", "Extra 3"]
        );
    }
}
