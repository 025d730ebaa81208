mod common;

use std::time::Duration;

use async_trait::async_trait;
use common::{page, TestSink};
use pretty_assertions::assert_eq;
use tokio::time::Instant;
use wager_engine::{
    Completion, Overflow, ReplayPage, ScrollCandidate, ScrollDriver, ScrollReport, ScrollSettings,
    ScrollTarget, StepHook,
};

const URL: &str = "https://sportsbook.draftkings.com/mybets";

fn settings(max_total_duration_ms: u64) -> ScrollSettings {
    ScrollSettings {
        step_delay_ms: 1_000,
        max_stable_attempts: 3,
        max_total_duration_ms,
        mutation_debounce_ms: 500,
        ..ScrollSettings::default()
    }
}

/// Frames that grow by one item each.
fn growing_frames(count: usize) -> Vec<String> {
    (1..=count)
        .map(|n| page(&"<p>bet</p>".repeat(n)))
        .collect()
}

#[derive(Default)]
struct CountingHook {
    steps: Vec<u32>,
}

#[async_trait(?Send)]
impl StepHook for CountingHook {
    async fn on_step(&mut self, step: u32) {
        self.steps.push(step);
    }
}

#[test]
fn default_cap_covers_idle_budget_and_two_stall_windows() {
    let defaults = ScrollSettings::default();
    assert_eq!(defaults.step_delay(), Duration::from_millis(1_000));
    assert_eq!(defaults.max_stable_attempts, 3);
    assert_eq!(defaults.max_total_duration(), Duration::from_millis(11_000));
    assert_eq!(defaults.mutation_debounce_ms, 1_500);
    assert_eq!(defaults.mutation_debounce(), Duration::from_millis(1_000));
}

#[tokio::test(start_paused = true)]
async fn settles_after_stable_attempts_once_growth_stops() {
    common::init_logging();
    let host = ReplayPage::new(URL, growing_frames(3));
    let sink = TestSink::new();
    let mut hook = CountingHook::default();

    let started = Instant::now();
    let report = ScrollDriver::new(settings(60_000))
        .run(&host, &sink, Some(&mut hook))
        .await;

    // Two growing steps, then three stable polls.
    assert_eq!(
        report,
        ScrollReport {
            steps: 5,
            completion: Completion::Settled,
        }
    );
    assert_eq!(hook.steps, vec![1, 2, 3, 4, 5]);
    assert_eq!(started.elapsed(), Duration::from_millis(5_000));
    assert_eq!(
        sink.progress(),
        vec![
            "Scrolling and loading more bets...",
            "Scrolling and loading more bets...",
            "Checking for more content... (1/3)",
            "Checking for more content... (2/3)",
            "Checking for more content... (3/3)",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn safety_cap_forces_completion() {
    let host = ReplayPage::new(URL, growing_frames(50));
    let sink = TestSink::new();

    let started = Instant::now();
    let report = ScrollDriver::new(settings(5_000)).run(&host, &sink, None).await;

    assert_eq!(report.completion, Completion::Forced);
    assert_eq!(report.steps, 4);
    assert!(started.elapsed() <= Duration::from_millis(5_000));
    assert_eq!(
        sink.progress().last().map(String::as_str),
        Some("Safety timeout reached, proceeding with loaded content.")
    );
}

#[tokio::test(start_paused = true)]
async fn recycled_window_keeps_loading_while_cards_change() {
    // Same height and element count in every frame; only the text differs.
    let frames: Vec<String> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| page(&format!("<p>bet {id}</p>")))
        .collect();
    let host = ReplayPage::new(URL, frames).with_fixed_height(800);
    let sink = TestSink::new();

    let report = ScrollDriver::new(settings(60_000)).run(&host, &sink, None).await;

    assert_eq!(report.completion, Completion::Settled);
    assert_eq!(report.steps, 6);
    assert_eq!(host.frame_index(), 3);
}

#[tokio::test(start_paused = true)]
async fn default_settings_settle_right_after_the_stable_window() {
    // Content changes on the first step only.
    let host = ReplayPage::new(URL, growing_frames(2));
    let sink = TestSink::new();
    let defaults = ScrollSettings::default();
    let last_change = 1;

    let report = ScrollDriver::new(defaults.clone())
        .run(&host, &sink, None)
        .await;

    assert_eq!(report.completion, Completion::Settled);
    assert_eq!(report.steps, last_change + defaults.max_stable_attempts);
    assert_eq!(
        sink.progress(),
        vec![
            "Scrolling and loading more bets...",
            "Checking for more content... (1/3)",
            "Checking for more content... (2/3)",
            "Checking for more content... (3/3)",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn long_debounce_is_capped_at_one_step() {
    let host = ReplayPage::new(URL, growing_frames(3));
    let sink = TestSink::new();
    let slow = ScrollSettings {
        mutation_debounce_ms: 10_000,
        ..settings(60_000)
    };

    let report = ScrollDriver::new(slow).run(&host, &sink, None).await;

    assert_eq!(report.steps, 5);
    assert_eq!(report.completion, Completion::Settled);
}

#[tokio::test]
async fn picks_first_scrollable_candidate_with_bet_text() {
    let candidates = vec![
        ScrollCandidate {
            target: ScrollTarget::Element("#nav".into()),
            overflow_y: Overflow::Visible,
            scroll_height: 900,
            client_height: 300,
            text_sample: "My Bets".into(),
        },
        ScrollCandidate {
            target: ScrollTarget::Element("#promo".into()),
            overflow_y: Overflow::Auto,
            scroll_height: 200,
            client_height: 200,
            text_sample: "Odds boosts".into(),
        },
        ScrollCandidate {
            target: ScrollTarget::Element("#chat".into()),
            overflow_y: Overflow::Scroll,
            scroll_height: 2_000,
            client_height: 400,
            text_sample: "Live chat".into(),
        },
        ScrollCandidate {
            target: ScrollTarget::Element("#settled".into()),
            overflow_y: Overflow::from_css("auto"),
            scroll_height: 5_000,
            client_height: 700,
            text_sample: "Settled WAGER $10.00".into(),
        },
    ];
    let host = ReplayPage::single(URL, page("")).with_candidates(candidates);

    let target = ScrollDriver::default().locate_container(&host).await;
    assert_eq!(target, ScrollTarget::Element("#settled".into()));
}

#[tokio::test]
async fn falls_back_to_document_without_candidates() {
    let host = ReplayPage::single(URL, page(""));
    let target = ScrollDriver::default().locate_container(&host).await;
    assert_eq!(target, ScrollTarget::Document);
}
