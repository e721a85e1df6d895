//! Text parsing and rendering for the override-set editor.
//!
//! The settings modal edits the override sets as plain text: one set per
//! non-empty line, slots separated by whitespace or commas. Splitting lives
//! here; value normalization (digits only, clamp, zero-pad) is the store's
//! job on commit.

use once_cell::sync::Lazy;
use regex::Regex;

use stoper::OverrideSet;

static SLOT_SPLIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,;]+").unwrap());

/// Parse editor text into override sets. Blank lines are skipped, so an
/// empty editor yields no sets rather than one empty set.
pub fn parse_sets_text(text: &str) -> Vec<OverrideSet> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            SLOT_SPLIT_REGEX
                .split(line)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect()
        })
        .collect()
}

/// Render override sets back into canonical editor text, one set per line.
pub fn sets_to_text(sets: &[OverrideSet]) -> String {
    sets.iter()
        .map(|set| set.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_become_sets_and_tokens_become_slots() {
        let sets = parse_sets_text("07 12\n99");
        assert_eq!(
            sets,
            vec![vec!["07".to_string(), "12".into()], vec!["99".into()]]
        );
    }

    #[test]
    fn commas_semicolons_and_extra_whitespace_split_too() {
        let sets = parse_sets_text("  07,12 ;  3  \n\n  \n42");
        assert_eq!(
            sets,
            vec![vec!["07".to_string(), "12".into(), "3".into()], vec!["42".into()]]
        );
    }

    #[test]
    fn empty_editor_yields_no_sets() {
        assert!(parse_sets_text("").is_empty());
        assert!(parse_sets_text("   \n \n").is_empty());
    }

    #[test]
    fn rendering_is_one_set_per_line() {
        let sets: Vec<OverrideSet> = vec![vec!["07".into(), "12".into()], vec!["99".into()]];
        assert_eq!(sets_to_text(&sets), "07 12\n99");
        assert_eq!(sets_to_text(&[]), "");
        assert_eq!(parse_sets_text(&sets_to_text(&sets)), sets);
    }
}
