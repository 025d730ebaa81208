use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use wager_core::{BetResult, Field};

static MONEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*(\d[\d,]*(?:\.\d+)?)").expect("money pattern"));
static BARE_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d[\d,]*(?:\.\d+)?$").expect("amount pattern"));
static SIGNED_ODDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w.])([+-]\d{3,})\b").expect("odds pattern"));

/// Separators seen between sport and league in combined labels.
const SPORT_LEAGUE_SEPARATORS: [&str; 5] = [" - ", " / ", " | ", " · ", "•"];

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-element text with whitespace collapsed. Text nodes are joined with a
/// space so adjacent inline elements do not fuse into one token.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Replaces typographic minus and dash glyphs with ASCII `-`.
pub fn ascii_signs(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2212}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{FE63}' | '\u{FF0D}' => '-',
            '\u{FF0B}' => '+',
            other => other,
        })
        .collect()
}

/// `"Wager: $1,250.00"` becomes `"$1250.00"`; text without an amount becomes empty.
pub fn money(text: &str) -> String {
    let trimmed = text.trim();
    let amount = MONEY
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .or_else(|| BARE_AMOUNT.is_match(trimmed).then_some(trimmed));
    match amount {
        Some(amount) => format!("${}", amount.replace(',', "")),
        None => String::new(),
    }
}

/// Parses the numeric part of a money value, ignoring the currency symbol.
pub fn money_amount(text: &str) -> Option<f64> {
    money(text).trim_start_matches('$').parse().ok()
}

pub fn odds(text: &str) -> String {
    let signed = ascii_signs(&collapse_whitespace(text));
    // "- 110" -> "-110"
    match signed.strip_prefix(['+', '-']) {
        Some(rest) if rest.starts_with(' ') => {
            let sign = &signed[..1];
            format!("{sign}{}", rest.trim_start())
        }
        _ => signed,
    }
}

pub fn result(text: &str) -> String {
    BetResult::from_site_text(text).to_string()
}

/// Finds a signed odds figure of three or more digits, e.g. `+445` or `-110`.
pub fn find_signed_odds(text: &str) -> Option<String> {
    let signed = ascii_signs(text);
    SIGNED_ODDS
        .captures(&signed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn contains_money(text: &str) -> bool {
    MONEY.is_match(text)
}

/// Splits `"Basketball - NBA"` style values into sport and league.
pub fn split_sport_league(text: &str) -> Option<(String, String)> {
    let collapsed = collapse_whitespace(text);
    SPORT_LEAGUE_SEPARATORS.iter().find_map(|sep| {
        let (sport, league) = collapsed.split_once(sep)?;
        let (sport, league) = (sport.trim(), league.trim());
        (!sport.is_empty() && !league.is_empty()).then(|| (sport.to_string(), league.to_string()))
    })
}

/// Applies the per-field normalization rules to a located raw value.
pub fn field_value(field: Field, raw: &str) -> String {
    match field {
        Field::Stake | Field::Payout => money(raw),
        Field::Odds => odds(raw),
        Field::Result => result(raw),
        _ => collapse_whitespace(raw),
    }
}

/// Builds the audit trail: non-empty parts joined by `" | "`.
pub fn raw_notes(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    if joined.is_empty() {
        "(no text)".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_keeps_leading_dollar_and_drops_separators() {
        assert_eq!(money("Wager: $0.10"), "$0.10");
        assert_eq!(money("To Pay: $ 1,250.50"), "$1250.50");
        assert_eq!(money("12.00"), "$12.00");
        assert_eq!(money("no amount"), "");
    }

    #[test]
    fn odds_normalize_unicode_minus() {
        assert_eq!(odds("\u{2212}110"), "-110");
        assert_eq!(odds(" +445 "), "+445");
        assert_eq!(odds("\u{2013} 120"), "-120");
    }

    #[test]
    fn signed_odds_are_found_in_text() {
        assert_eq!(find_signed_odds("Over 222.5 \u{2212}110 $5.00").as_deref(), Some("-110"));
        assert_eq!(find_signed_odds("line 222.5 only"), None);
        assert_eq!(find_signed_odds("score 2-110"), None);
    }

    #[test]
    fn sport_and_league_split_on_common_delimiters() {
        assert_eq!(
            split_sport_league("Basketball - NBA"),
            Some(("Basketball".to_string(), "NBA".to_string()))
        );
        assert_eq!(
            split_sport_league("Soccer • EPL"),
            Some(("Soccer".to_string(), "EPL".to_string()))
        );
        assert_eq!(split_sport_league("Tennis"), None);
    }

    #[test]
    fn raw_notes_never_empty() {
        assert_eq!(raw_notes(&["", "  "]), "(no text)");
        assert_eq!(raw_notes(&["DK123", "card text"]), "DK123 | card text");
    }
}
