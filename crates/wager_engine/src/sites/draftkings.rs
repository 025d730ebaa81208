//! DraftKings bet history.
//!
//! Cards are rendered by a lazy list that keeps only the visible cards in the
//! DOM, so the profile is marked virtualized and records are harvested while
//! scrolling. Every card and field carries a `data-test-id` sharing the card's
//! id suffix.

use wager_core::Field;

use super::pattern;
use crate::extract::{
    AnchoredSource, AnchoredTable, ContainerGuess, HeuristicTable, Locator, Rendering,
    SelectorChain, SiteProfile, Strategy, Target,
};

pub const KEY: &str = "draftkings";
pub const NAME: &str = "DraftKings";

const TEST_ID: &str = "data-test-id";

pub fn profile() -> SiteProfile {
    SiteProfile {
        key: KEY,
        name: NAME,
        site_pattern: pattern(r"(?i)draftkings\.com"),
        history_pattern: pattern(r"(?i)draftkings\.com/(mybets|bet-history|my-bets)"),
        wrong_page_hint: "Please navigate to your DraftKings settled bets page first.",
        rendering: Rendering::Virtualized,
        strategies: vec![Strategy::Anchored, Strategy::Heuristic],
        anchored: Some(anchored_table()),
        heuristic: Some(heuristic_table()),
    }
}

fn anchored_table() -> AnchoredTable {
    use AnchoredSource::*;

    AnchoredTable {
        container_attr: TEST_ID,
        container_prefix: "bet-card-",
        fields: vec![
            (Field::Timestamp, vec![Text("bet-reference-{id}-0")]),
            (
                Field::Event,
                vec![JoinPrefixes {
                    prefixes: &["event-team-name-1-", "event-team-name-2-"],
                    separator: " v ",
                }],
            ),
            (
                Field::BetType,
                vec![
                    PresentAs {
                        marker: "sgp-{id}",
                        value: "SGP",
                    },
                    Text("bet-details-subtitle-{id}"),
                ],
            ),
            (
                Field::Selection,
                vec![
                    WhenPresent {
                        marker: "sgp-{id}",
                        then: "bet-details-subtitle-{id}",
                    },
                    Text("bet-details-title-{id}"),
                ],
            ),
            // Boosted odds supersede the crossed-out original.
            (
                Field::Odds,
                vec![
                    Text("bet-details-boosted-displayOdds-{id}"),
                    Text("bet-details-displayOdds-{id}"),
                ],
            ),
            (Field::Stake, vec![Text("bet-stake-{id}")]),
            (Field::Payout, vec![Text("bet-returns-{id}")]),
            (Field::Result, vec![Text("bet-details-status-{id}")]),
        ],
        reference: Some("bet-reference-{id}-1"),
    }
}

/// Used when the test-id scheme disappears from the markup.
fn heuristic_table() -> HeuristicTable {
    HeuristicTable {
        containers: vec![
            ContainerGuess::new("[data-test-id*='bet-card']"),
            ContainerGuess::new("[class*='bet-card']"),
            ContainerGuess::new("[class*='BetCard']"),
        ],
        shape_fallback: true,
        companion: None,
        chains: vec![
            (
                Target::Field(Field::Selection),
                SelectorChain::new(vec![
                    Locator::attr_prefix(TEST_ID, "bet-details-title"),
                    Locator::class_substring("title"),
                ]),
            ),
            (
                Target::Field(Field::BetType),
                SelectorChain::new(vec![
                    Locator::attr_prefix(TEST_ID, "bet-details-subtitle"),
                    Locator::class_substring("subtitle"),
                ]),
            ),
            (
                Target::Field(Field::Odds),
                SelectorChain::new(vec![
                    Locator::attr_prefix(TEST_ID, "bet-details-boosted-displayOdds"),
                    Locator::attr_prefix(TEST_ID, "bet-details-displayOdds"),
                    Locator::class_substring("odds"),
                ]),
            ),
            (
                Target::Field(Field::Result),
                SelectorChain::new(vec![
                    Locator::attr_prefix(TEST_ID, "bet-details-status"),
                    Locator::class_substring("status"),
                ]),
            ),
            (
                Target::Field(Field::Stake),
                SelectorChain::new(vec![
                    Locator::attr_prefix(TEST_ID, "bet-stake"),
                    Locator::text_pattern(pattern(r"(?i)wager:?\s*(\$\s*[\d,]+(?:\.\d+)?)")),
                ]),
            ),
            (
                Target::Field(Field::Payout),
                SelectorChain::new(vec![
                    Locator::attr_prefix(TEST_ID, "bet-returns"),
                    Locator::text_pattern(pattern(
                        r"(?i)(?:to pay|payout|paid):?\s*(\$\s*[\d,]+(?:\.\d+)?)",
                    )),
                ]),
            ),
            (
                Target::SportLeague,
                SelectorChain::new(vec![Locator::class_substring("league")]),
            ),
        ],
        text_fallbacks: super::generic_text_fallbacks(),
        reference: SelectorChain::new(vec![Locator::text_pattern(pattern(
            r"(?i)(?:bet id|ref(?:erence)?)[:#]?\s*([A-Za-z0-9-]+)",
        ))]),
        reference_label: "",
        id_attrs: &[TEST_ID, "id"],
        finish: None,
    }
}
