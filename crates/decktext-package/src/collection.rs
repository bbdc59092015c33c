//! JSON columns of the `col` row: models, decks and their configuration.

use decktext_core::InferredArity;
use decktext_core::registry::{self, ModelSpec};
use decktext_types::Family;
use serde_json::{Value, json};

/// Id of the deck every collection carries.
pub const DEFAULT_DECK_ID: i64 = 1;

/// Id of the deck options group used by generated decks.
pub const DEFAULT_DCONF_ID: i64 = 1;

const CARD_CSS: &str = ".card {\n font-family: arial;\n font-size: 20px;\n text-align: center;\n color: black;\n background-color: white;\n}\n";
const CLOZE_CSS: &str = ".cloze {\n font-weight: bold;\n color: blue;\n}\n";

const LATEX_PRE: &str = "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n";
const LATEX_POST: &str = "\\end{document}";

/// Question and answer templates of a model with the given field names.
pub fn templates(family: Family, names: &[String]) -> (String, String) {
    let rest: String = names
        .iter()
        .skip(2)
        .map(|name| format!("<br>{{{{{}}}}}", name))
        .collect();

    match family {
        Family::Basic => (
            format!("{{{{{}}}}}", names[0]),
            format!(
                "{{{{FrontSide}}}}\n\n<hr id=answer>\n\n{{{{{}}}}}{}",
                names[1], rest
            ),
        ),
        Family::Cloze => (
            format!("{{{{cloze:{}}}}}", names[0]),
            format!(
                "{{{{cloze:{}}}}}<br><br>{{{{{}}}}}{}",
                names[0], names[1], rest
            ),
        ),
    }
}

fn model_json(spec: ModelSpec, arity: usize, deck_id: i64, mod_secs: i64) -> Value {
    let names = registry::field_names(spec.family, arity);
    let (qfmt, afmt) = templates(spec.family, &names);

    let fields: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(ord, name)| {
            json!({
                "name": name,
                "ord": ord,
                "font": "Arial",
                "media": [],
                "rtl": false,
                "size": 20,
                "sticky": false,
            })
        })
        .collect();

    let (kind, template_name, css) = match spec.family {
        Family::Basic => (0, "Card 1", CARD_CSS.to_string()),
        Family::Cloze => (1, "Cloze", format!("{}{}", CARD_CSS, CLOZE_CSS)),
    };

    json!({
        "id": spec.id,
        "name": spec.name,
        "type": kind,
        "mod": mod_secs,
        "usn": -1,
        "sortf": 0,
        "did": deck_id,
        "tmpls": [{
            "name": template_name,
            "ord": 0,
            "qfmt": qfmt,
            "afmt": afmt,
            "bqfmt": "",
            "bafmt": "",
            "did": null,
        }],
        "flds": fields,
        "css": css,
        "latexPre": LATEX_PRE,
        "latexPost": LATEX_POST,
        "latexsvg": false,
        "req": [[0, "any", [0]]],
        "tags": [],
        "vers": [],
    })
}

/// `col.models`: both generated models, keyed by id.
pub fn models_json(arity: InferredArity, deck_id: i64, mod_secs: i64) -> Value {
    let mut models = serde_json::Map::new();
    for family in [Family::Basic, Family::Cloze] {
        let spec = registry::model(family);
        models.insert(
            spec.id.to_string(),
            model_json(spec, arity.arity(family), deck_id, mod_secs),
        );
    }
    Value::Object(models)
}

fn deck_json(id: i64, name: &str, mod_secs: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "desc": "",
        "mod": mod_secs,
        "usn": -1,
        "dyn": 0,
        "conf": DEFAULT_DCONF_ID,
        "collapsed": false,
        "browserCollapsed": false,
        "extendNew": 10,
        "extendRev": 50,
        "newToday": [0, 0],
        "revToday": [0, 0],
        "lrnToday": [0, 0],
        "timeToday": [0, 0],
    })
}

/// `col.decks`: the default deck plus the generated one.
pub fn decks_json(deck_id: i64, deck_name: &str, mod_secs: i64) -> Value {
    let mut decks = serde_json::Map::new();
    decks.insert(
        DEFAULT_DECK_ID.to_string(),
        deck_json(DEFAULT_DECK_ID, "Default", mod_secs),
    );
    decks.insert(deck_id.to_string(), deck_json(deck_id, deck_name, mod_secs));
    Value::Object(decks)
}

/// `col.dconf`: one options group with Anki's stock settings.
pub fn dconf_json(mod_secs: i64) -> Value {
    json!({
        (DEFAULT_DCONF_ID.to_string()): {
            "id": DEFAULT_DCONF_ID,
            "name": "Default",
            "mod": mod_secs,
            "usn": 0,
            "maxTaken": 60,
            "autoplay": true,
            "timer": 0,
            "replayq": true,
            "dyn": false,
            "new": {
                "bury": true,
                "delays": [1.0, 10.0],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true,
            },
            "lapse": {
                "delays": [10.0],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0.0,
            },
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1.0,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100,
            },
        }
    })
}

/// `col.conf`: collection-wide settings pointing at the generated deck.
pub fn conf_json(deck_id: i64) -> Value {
    json!({
        "activeDecks": [DEFAULT_DECK_ID],
        "curDeck": deck_id,
        "curModel": null,
        "newSpread": 0,
        "collapseTime": 1200,
        "timeLim": 0,
        "estTimes": true,
        "dueCounts": true,
        "sortType": "noteFld",
        "sortBackwards": false,
        "addToCur": true,
        "nextPos": 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_templates() {
        let names = registry::field_names(Family::Basic, 2);
        let (q, a) = templates(Family::Basic, &names);
        assert_eq!(q, "{{Front}}");
        assert_eq!(a, "{{FrontSide}}\n\n<hr id=answer>\n\n{{Back}}");
    }

    #[test]
    fn test_wide_cloze_templates_show_every_extra() {
        let names = registry::field_names(Family::Cloze, 3);
        let (q, a) = templates(Family::Cloze, &names);
        assert_eq!(q, "{{cloze:Text}}");
        assert_eq!(a, "{{cloze:Text}}<br><br>{{Extra}}<br>{{Extra 2}}");
    }

    #[test]
    fn test_models_follow_inferred_arity() {
        let arity = InferredArity { basic: 3, cloze: 2 };
        let models = models_json(arity, 42, 0);

        let basic = &models[registry::BASIC_MODEL_ID.to_string()];
        assert_eq!(basic["flds"].as_array().unwrap().len(), 3);
        assert_eq!(basic["type"], 0);
        assert_eq!(basic["did"], 42);

        let cloze = &models[registry::CLOZE_MODEL_ID.to_string()];
        assert_eq!(cloze["flds"][1]["name"], "Extra");
        assert_eq!(cloze["type"], 1);
    }

    #[test]
    fn test_decks_include_default() {
        let decks = decks_json(77, "Geography", 0);
        assert_eq!(decks["1"]["name"], "Default");
        assert_eq!(decks["77"]["name"], "Geography");
    }
}
