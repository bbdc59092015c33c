use std::fmt;

use super::view_models::{
    BuildViewModel, DumpViewModel, InspectViewModel, MediaIndexViewModel, MigrateViewModel,
    SkippedLineViewModel, VerifyViewModel,
};

fn write_skipped(f: &mut fmt::Formatter, skipped: &[SkippedLineViewModel]) -> fmt::Result {
    if skipped.is_empty() {
        return Ok(());
    }
    writeln!(f, "Skipped {} unrecognized line(s):", skipped.len())?;
    for line in skipped {
        writeln!(f, "  {:>5}: {}", line.line, line.content)?;
    }
    Ok(())
}

impl fmt::Display for MediaIndexViewModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.format)?;
        if self.compressed {
            write!(f, " (zstd)")?;
        }
        write!(f, ", {} entries", self.entries)?;
        if self.discarded_entries > 0 {
            write!(f, ", {} discarded", self.discarded_entries)?;
        }
        if self.ignored_fields > 0 {
            write!(f, ", {} unknown fields ignored", self.ignored_fields)?;
        }
        if self.degraded {
            write!(f, ", unreadable")?;
        }
        Ok(())
    }
}

impl fmt::Display for DumpViewModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Package:     {}", self.package)?;
        writeln!(f, "Database:    {}", self.database)?;
        writeln!(f, "Media index: {}", self.media_index)?;
        writeln!(f)?;
        writeln!(f, "Notes:       {} -> {}", self.notes, self.cards_file)?;
        writeln!(f, "Preview:     {}", self.preview_file)?;
        writeln!(f, "Media files: {}", self.media_files)?;
        Ok(())
    }
}

impl fmt::Display for VerifyViewModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Text:     {} ({} keys)", self.text, self.expected)?;
        writeln!(f, "Package:  {} ({} keys)", self.package, self.actual)?;
        writeln!(f)?;
        writeln!(f, "Matches:    {}", self.report.matches.len())?;
        writeln!(f, "Missing:    {}", self.report.missing.len())?;
        writeln!(f, "Unexpected: {}", self.report.unexpected.len())?;

        let show = |f: &mut fmt::Formatter, title: &str, keys: &[String]| -> fmt::Result {
            if keys.is_empty() {
                return Ok(());
            }
            writeln!(f)?;
            writeln!(f, "{}:", title)?;
            for key in keys {
                match self.labels.get(key) {
                    Some(label) => writeln!(f, "  [{}] {}", key, label)?,
                    None => writeln!(f, "  [{}]", key)?,
                }
            }
            Ok(())
        };

        show(f, "Missing from package (new in text)", &self.report.missing)?;
        show(f, "Unexpected in package (removed from text)", &self.report.unexpected)?;
        if self.verbose {
            show(f, "Matching keys", &self.report.matches)?;
        }

        if !self.skipped_lines.is_empty() {
            writeln!(f)?;
            write_skipped(f, &self.skipped_lines)?;
        }
        Ok(())
    }
}

impl fmt::Display for BuildViewModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Deck:    {} ({})", self.deck_name, self.deck_id)?;
        writeln!(f, "Output:  {}", self.output)?;
        writeln!(
            f,
            "Notes:   {} ({} cards, {} media)",
            self.notes, self.cards, self.media
        )?;
        writeln!(
            f,
            "Fields:  basic {}, cloze {}",
            self.basic_arity, self.cloze_arity
        )?;
        if self.duplicates > 0 {
            writeln!(f, "Dropped {} card(s) with a repeated key", self.duplicates)?;
        }
        write_skipped(f, &self.skipped_lines)?;

        if let Some(verification) = &self.verification {
            writeln!(f)?;
            if verification.success {
                writeln!(
                    f,
                    "Verified: all {} keys present",
                    verification.report.matches.len()
                )?;
            } else {
                writeln!(
                    f,
                    "Verification: {} missing, {} unexpected",
                    verification.report.missing.len(),
                    verification.report.unexpected.len()
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for MigrateViewModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Text:      {}", self.text)?;
        writeln!(f, "Package:   {}", self.package)?;
        writeln!(f, "Recovered: {}", self.recovered)?;
        writeln!(f, "Derived:   {}", self.derived)?;
        writeln!(f, "Unchanged: {}", self.unchanged)?;
        if !self.rewritten {
            writeln!(f, "Nothing to stamp; file left as is.")?;
        }
        Ok(())
    }
}

impl fmt::Display for InspectViewModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Package:     {}", self.package)?;
        writeln!(f, "Database:    {}", self.database)?;
        writeln!(f, "Media index: {}", self.media_index)?;
        writeln!(f, "Notes:       {}", self.notes)?;

        if self.sample.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "{:<14} {:<7} FRONT", "GUID", "FIELDS")?;
        writeln!(f, "{}", "-".repeat(80))?;
        for note in &self.sample {
            writeln!(f, "{:<14} {:<7} {}", note.guid, note.fields, note.front)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::view_models::KeySetsViewModel;
    use std::collections::BTreeMap;

    #[test]
    fn test_verify_view() {
        let mut labels = BTreeMap::new();
        labels.insert("k2".to_string(), "New card".to_string());
        let vm = VerifyViewModel {
            text: "cards.txt".to_string(),
            package: "deck.apkg".to_string(),
            expected: 2,
            actual: 1,
            success: false,
            report: KeySetsViewModel {
                matches: vec!["k1".to_string()],
                missing: vec!["k2".to_string()],
                unexpected: vec![],
            },
            labels,
            skipped_lines: vec![],
            verbose: false,
        };

        insta::assert_snapshot!(vm.to_string().trim_end(), @r"
        Text:     cards.txt (2 keys)
        Package:  deck.apkg (1 keys)

        Matches:    1
        Missing:    1
        Unexpected: 0

        Missing from package (new in text):
          [k2] New card
        ");
    }

    #[test]
    fn test_media_index_view() {
        let vm = MediaIndexViewModel {
            format: "binary".to_string(),
            compressed: true,
            entries: 3,
            ignored_fields: 0,
            discarded_entries: 1,
            degraded: false,
        };
        assert_eq!(vm.to_string(), "binary (zstd), 3 entries, 1 discarded");
    }
}
