//! Selector tables for the supported sportsbooks.
pub mod draftkings;
pub mod fanduel;

use regex::Regex;
use wager_core::Field;

/// Compiles a pattern from a site table. The tables are static data, so a
/// failure here is a programming error caught by the site tests.
pub(crate) fn pattern(source: &str) -> Regex {
    Regex::new(source).unwrap_or_else(|err| panic!("invalid site pattern {source:?}: {err}"))
}

/// Last-resort patterns over normalized container text, shared by all sites.
pub(crate) fn generic_text_fallbacks() -> Vec<(Field, Regex)> {
    vec![
        (
            Field::Timestamp,
            pattern(
                r"(?i)\b((?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.? \d{1,2},? \d{4}(?:,? \d{1,2}:\d{2}\s*[ap]m)?|\d{1,2}/\d{1,2}/\d{2,4}(?:,? \d{1,2}:\d{2}\s*[ap]m)?)",
            ),
        ),
        (
            Field::Odds,
            pattern(r"(?:^|[^\w.])([+\-\x{2212}]\d{3,})\b"),
        ),
        (Field::Stake, pattern(r"\$\s*\d[\d,]*(?:\.\d+)?")),
        (
            Field::Result,
            pattern(r"(?i)\b(won|lost|push|void|cancelled|canceled|returned|open|pending)\b"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::generic_text_fallbacks;

    #[test]
    fn site_tables_compile() {
        let _ = super::draftkings::profile();
        let _ = super::fanduel::profile();
        assert_eq!(generic_text_fallbacks().len(), 4);
    }
}
