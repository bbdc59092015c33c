//! Assertions over the CLI's JSON output.

use anyhow::{Context, Result};
use serde_json::Value;

fn keys<'a>(json: &'a Value, set: &str) -> Result<&'a Vec<Value>> {
    json["report"][set]
        .as_array()
        .with_context(|| format!("Expected 'report.{}' array in JSON", set))
}

/// Assert the sizes of a verify report's three sets.
pub fn assert_report_counts(
    json: &Value,
    matches: usize,
    missing: usize,
    unexpected: usize,
) -> Result<()> {
    let actual = (
        keys(json, "matches")?.len(),
        keys(json, "missing")?.len(),
        keys(json, "unexpected")?.len(),
    );
    if actual != (matches, missing, unexpected) {
        anyhow::bail!(
            "Expected (matches, missing, unexpected) = {:?}, got {:?}",
            (matches, missing, unexpected),
            actual
        );
    }
    Ok(())
}

/// Assert that a key appears in the given set of a verify report.
pub fn assert_key_in(json: &Value, set: &str, key: &str) -> Result<()> {
    if !keys(json, set)?.iter().any(|k| k == key) {
        anyhow::bail!("Key {} not found in report.{}", key, set);
    }
    Ok(())
}

/// Assert that every non-blank line of a dump starts with a `[key] ` prefix.
pub fn assert_all_lines_keyed(text: &str) -> Result<()> {
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let keyed = line
            .strip_prefix('[')
            .and_then(|rest| rest.find("] "))
            .is_some_and(|end| end > 0);
        if !keyed {
            anyhow::bail!("Line {} has no key: {}", idx + 1, line);
        }
    }
    Ok(())
}
