//! FanDuel bet history and account activity.
//!
//! The page is a flat `<ul>`: each bet spans a header `<li>` whose exposed
//! aria-label reads `"Selection, Bet Type, <handicap>, Odds, Event, Time"` and
//! a footer `<li>` with the wager, payout, `BET ID` and `PLACED` date. Spacer
//! and banner items sit in between, so the header is searched a few siblings
//! back from each footer.

use std::sync::LazyLock;

use regex::Regex;
use wager_core::{BetResult, Field, Record};

use super::{generic_text_fallbacks, pattern};
use crate::extract::normalize::money_amount;
use crate::extract::{
    AriaSlot, Companion, ContainerGuess, HeuristicTable, Locator, Matcher, Rendering,
    SelectorChain, SiteProfile, Strategy, Target,
};

static WON_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)(\$\s*[\d,]+(?:\.\d+)?)\s*WON ON FANDUEL"));
static RETURNED_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)(\$\s*[\d,]+(?:\.\d+)?)\s*RETURNED"));

pub const KEY: &str = "fanduel";
pub const NAME: &str = "FanDuel";

pub fn profile() -> SiteProfile {
    SiteProfile {
        key: KEY,
        name: NAME,
        site_pattern: pattern(r"(?i)fanduel\.com"),
        history_pattern: pattern(r"(?i)fanduel\.com/(my-bets|account/activity|history|mybets)"),
        wrong_page_hint: "Please navigate to your FanDuel bet history/activity page first.",
        rendering: Rendering::Static,
        strategies: vec![Strategy::Heuristic],
        anchored: None,
        heuristic: Some(heuristic_table()),
    }
}

fn heuristic_table() -> HeuristicTable {
    let bet_id = pattern(r"(?i)BET ID");
    HeuristicTable {
        containers: vec![
            ContainerGuess::new("ul > li").requiring(bet_id.clone()),
            ContainerGuess::new("[role='listitem']").requiring(bet_id),
        ],
        shape_fallback: true,
        companion: Some(Companion {
            matcher: Matcher::AriaLabelled,
            lookback: 3,
        }),
        chains: vec![
            (
                Target::Field(Field::Selection),
                SelectorChain::new(vec![Locator::aria(AriaSlot::Selection)]),
            ),
            (
                Target::Field(Field::BetType),
                SelectorChain::new(vec![Locator::aria(AriaSlot::BetType)]),
            ),
            // The header's odds span carries the line when the label does not.
            (
                Target::Field(Field::Odds),
                SelectorChain::new(vec![
                    Locator::attr_prefix("aria-label", "Odds"),
                    Locator::aria(AriaSlot::Odds),
                ]),
            ),
            (
                Target::Field(Field::Event),
                SelectorChain::new(vec![Locator::aria(AriaSlot::Event)]),
            ),
            (
                Target::Field(Field::Stake),
                SelectorChain::new(vec![Locator::text_pattern(pattern(
                    r"(?i)(\$\s*[\d,]+(?:\.\d+)?)\s*TOTAL WAGER",
                ))]),
            ),
            (
                Target::Field(Field::Payout),
                SelectorChain::new(vec![Locator::text_pattern(pattern(
                    r"(?i)(\$\s*[\d,]+(?:\.\d+)?)\s*(?:WON ON FANDUEL|RETURNED)",
                ))]),
            ),
            (
                Target::Field(Field::Timestamp),
                SelectorChain::new(vec![
                    Locator::text_pattern(pattern(r"(?i)PLACED:\s*(.+?)\s*BET ID")),
                    Locator::text_pattern(pattern(r"(?i)PLACED:\s*(.+)")),
                ]),
            ),
            (
                Target::SportLeague,
                SelectorChain::new(vec![Locator::class_substring("competition")]),
            ),
        ],
        text_fallbacks: generic_text_fallbacks(),
        reference: SelectorChain::new(vec![Locator::text_pattern(pattern(
            r"(?i)BET ID:\s*(\S+)",
        ))]),
        reference_label: "BET ID: ",
        id_attrs: &["id"],
        finish: Some(settle_result),
    }
}

/// FanDuel reports outcomes through payout wording rather than a status badge:
/// `$x WON ON FANDUEL` and `$x RETURNED`, where a zero amount means a loss.
fn settle_result(record: &mut Record, text: &str) {
    let (amount, positive) = if let Some(caps) = WON_AMOUNT.captures(text) {
        (caps[1].to_string(), BetResult::Won)
    } else if let Some(caps) = RETURNED_AMOUNT.captures(text) {
        (caps[1].to_string(), BetResult::Returned)
    } else {
        return;
    };
    let result = match money_amount(&amount) {
        Some(value) if value > 0.0 => positive,
        _ => BetResult::Lost,
    };
    record.result = result.to_string();
}
