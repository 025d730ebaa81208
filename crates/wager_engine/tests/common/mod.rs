#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use wager_engine::{EngineEvent, ProgressSink};

pub const DK_HISTORY: &str = "https://sportsbook.draftkings.com/mybets";
pub const FD_HISTORY: &str = "https://sportsbook.fanduel.com/my-bets";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    pub fn progress(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Progress(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn page(body: &str) -> String {
    format!("<html><head><title>Bets</title></head><body><div class=\"list\">{body}</div></body></html>")
}

/// A DraftKings settled-bet card in the test-id markup.
pub struct DkCard<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub subtitle: &'a str,
    pub odds: &'a str,
    pub boosted: Option<&'a str>,
    pub sgp: bool,
    pub status: &'a str,
}

impl<'a> DkCard<'a> {
    pub fn new(id: &'a str) -> Self {
        Self {
            id,
            title: "Boston Celtics",
            subtitle: "Moneyline",
            odds: "+150",
            boosted: None,
            sgp: false,
            status: "Won",
        }
    }

    pub fn html(&self) -> String {
        let id = self.id;
        let boosted = self
            .boosted
            .map(|odds| {
                format!(r#"<span data-test-id="bet-details-boosted-displayOdds-{id}">{odds}</span>"#)
            })
            .unwrap_or_default();
        let sgp = if self.sgp {
            format!(r#"<span data-test-id="sgp-{id}">SGP</span>"#)
        } else {
            String::new()
        };
        format!(
            r#"<div data-test-id="bet-card-{id}">
  {sgp}
  <span data-test-id="bet-details-title-{id}">{title}</span>
  <span data-test-id="bet-details-subtitle-{id}">{subtitle}</span>
  <s data-test-id="bet-details-displayOdds-{id}">{odds}</s>
  {boosted}
  <span data-test-id="bet-details-status-{id}">{status}</span>
  <div>
    <span data-test-id="event-team-name-1-{id}">Celtics</span>
    <span data-test-id="event-team-name-2-{id}">Knicks</span>
  </div>
  <span data-test-id="bet-stake-{id}">Wager: $10.00</span>
  <span data-test-id="bet-returns-{id}">Paid: $1,025.00</span>
  <span data-test-id="bet-reference-{id}-0">Mar 9, 2024, 7:05:12 PM</span>
  <span data-test-id="bet-reference-{id}-1">DK{id}</span>
</div>"#,
            title = self.title,
            subtitle = self.subtitle,
            odds = self.odds,
            status = self.status,
        )
    }
}

pub fn dk_page(cards: &[DkCard<'_>]) -> String {
    page(&cards.iter().map(DkCard::html).collect::<String>())
}

/// A FanDuel bet: header item, an unrelated banner, then the footer item.
pub fn fd_bet(selection: &str, odds: &str, payout: &str, bet_id: &str) -> String {
    format!(
        r#"<li><div aria-hidden="false" aria-label="{selection}, MONEYLINE, , {odds}, Celtics @ Knicks, 7:30pm ET">
    <span>{selection}</span><span aria-label="Odds {odds}">{odds}</span>
    <span class="competition-label">Basketball - NBA</span>
  </div></li>
<li><div class="promo">Boost your parlay</div></li>
<li>
  <span>$10.00 TOTAL WAGER</span>
  <span>{payout}</span>
  <span>PLACED: 3/9/2024 7:05PM ET</span>
  <span>BET ID: {bet_id}</span>
</li>"#
    )
}

pub fn fd_page(bets: &[String]) -> String {
    page(&format!("<ul>{}</ul>", bets.concat()))
}
