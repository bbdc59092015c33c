use decktext_types::{Family, FieldModel, MIN_ARITY, TextCard};

/// Field arity chosen for each family of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferredArity {
    pub basic: usize,
    pub cloze: usize,
}

impl Default for InferredArity {
    fn default() -> Self {
        Self {
            basic: MIN_ARITY,
            cloze: MIN_ARITY,
        }
    }
}

impl InferredArity {
    pub fn arity(&self, family: Family) -> usize {
        match family {
            Family::Basic => self.basic,
            Family::Cloze => self.cloze,
        }
    }

    pub fn model(&self, family: Family) -> FieldModel {
        FieldModel::new(family, self.arity(family))
    }
}

/// Choose the minimal arity per family that fits every card of the batch.
///
/// The output schema is fixed for a whole run, so this must see the complete
/// batch before any record is built.
pub fn infer<'a, I>(cards: I) -> InferredArity
where
    I: IntoIterator<Item = &'a TextCard>,
{
    let mut arity = InferredArity::default();

    for card in cards {
        let count = card.field_values.len();
        let slot = match card.family {
            Family::Basic => &mut arity.basic,
            Family::Cloze => &mut arity.cloze,
        };
        *slot = (*slot).max(count);
    }

    arity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_card(family: Family, fields: &[&str]) -> TextCard {
        TextCard {
            guid: None,
            field_values: fields.iter().map(|f| f.to_string()).collect(),
            family,
        }
    }

    #[test]
    fn test_empty_batch_keeps_floor() {
        let arity = infer(&Vec::<TextCard>::new());
        assert_eq!(arity, InferredArity { basic: 2, cloze: 2 });
    }

    #[test]
    fn test_families_are_counted_separately() {
        let cards = vec![
            text_card(Family::Basic, &["a", "b"]),
            text_card(Family::Basic, &["a", "b", "c", "d"]),
            text_card(Family::Cloze, &["{{c1::x}}"]),
            text_card(Family::Cloze, &["{{c1::x}}", "extra", "more"]),
        ];

        let arity = infer(&cards);
        assert_eq!(arity.basic, 4);
        assert_eq!(arity.cloze, 3);
    }

    #[test]
    fn test_arity_is_never_smaller_than_any_card() {
        let cards: Vec<TextCard> = (1..8)
            .map(|n| {
                let fields: Vec<String> = (0..n).map(|i| i.to_string()).collect();
                TextCard {
                    guid: None,
                    field_values: fields,
                    family: if n % 2 == 0 { Family::Basic } else { Family::Cloze },
                }
            })
            .collect();

        let arity = infer(&cards);
        for card in &cards {
            let model = arity.model(card.family);
            assert!(model.fits(card.field_values.len()));

            let padded = model.pad(card.field_values.clone());
            assert_eq!(padded.len(), model.arity);
            assert_eq!(&padded[..card.field_values.len()], &card.field_values[..]);
            assert!(padded[card.field_values.len()..].iter().all(String::is_empty));
        }
    }
}
