use std::sync::Once;

use pretty_assertions::assert_eq;
use wager_core::{update, Effect, FailureKind, Msg, Phase, RunFailure, RunState};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn detected(incremental: bool) -> RunState {
    let (state, _) = update(
        RunState::new(),
        Msg::SiteDetected {
            site: "draftkings".to_string(),
            incremental,
        },
    );
    state
}

#[test]
fn virtualized_site_resets_harvester_before_scrolling() {
    init_logging();
    let (mut state, effects) = update(
        RunState::new(),
        Msg::SiteDetected {
            site: "draftkings".to_string(),
            incremental: true,
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::EmitProgress("Starting auto-scroll to load all bets...".to_string()),
            Effect::ResetHarvester,
            Effect::StartScroll { harvest: true },
        ]
    );
    assert_eq!(*state.phase(), Phase::Scrolling);
    assert_eq!(state.site(), Some("draftkings"));
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn static_site_scrolls_without_harvesting() {
    init_logging();
    let (_state, effects) = update(
        RunState::new(),
        Msg::SiteDetected {
            site: "fanduel".to_string(),
            incremental: false,
        },
    );

    assert!(!effects.contains(&Effect::ResetHarvester));
    assert!(effects.contains(&Effect::StartScroll { harvest: false }));
}

#[test]
fn steps_alternate_between_scrolling_and_harvesting() {
    init_logging();
    let state = detected(true);

    let (state, effects) = update(state, Msg::ScrollStepStarted);
    assert_eq!(*state.phase(), Phase::Harvesting);
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::ScrollStepFinished {
            new_records: 4,
            total_harvested: 4,
        },
    );
    assert_eq!(*state.phase(), Phase::Scrolling);
    assert_eq!(
        effects,
        vec![Effect::EmitProgress("Collected 4 bets so far...".to_string())]
    );

    let (state, _) = update(state, Msg::ScrollStepStarted);
    let (state, effects) = update(
        state,
        Msg::ScrollStepFinished {
            new_records: 0,
            total_harvested: 4,
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.steps, 2);
    assert_eq!(view.harvested, 4);
}

#[test]
fn static_steps_stay_in_scrolling() {
    init_logging();
    let state = detected(false);
    let (state, _) = update(state, Msg::ScrollStepStarted);
    assert_eq!(*state.phase(), Phase::Scrolling);
}

#[test]
fn scroll_finish_requests_final_extraction() {
    init_logging();
    let state = detected(true);
    let (state, effects) = update(state, Msg::ScrollFinished { forced: true });

    assert_eq!(*state.phase(), Phase::Extracting);
    assert_eq!(
        effects,
        vec![
            Effect::EmitProgress("Parsing bet data...".to_string()),
            Effect::RunFinalExtraction { incremental: true },
        ]
    );
}

#[test]
fn zero_records_fail_with_dom_excerpt() {
    init_logging();
    let state = detected(false);
    let (state, _) = update(state, Msg::ScrollFinished { forced: false });
    let (state, effects) = update(
        state,
        Msg::ExtractionFinished {
            count: 0,
            dom_excerpt: "<div>empty</div>".to_string(),
        },
    );

    let failure = RunFailure::NoRecordsFound {
        dom_excerpt: "<div>empty</div>".to_string(),
    };
    assert_eq!(*state.phase(), Phase::Failed(failure.clone()));
    assert_eq!(effects, vec![Effect::EmitError(failure.clone())]);
    assert!(failure.to_string().contains("No bets found"));
}

#[test]
fn records_complete_the_run() {
    init_logging();
    let state = detected(false);
    let (state, _) = update(state, Msg::ScrollFinished { forced: false });
    let (state, effects) = update(
        state,
        Msg::ExtractionFinished {
            count: 3,
            dom_excerpt: String::new(),
        },
    );

    assert_eq!(*state.phase(), Phase::Completed);
    assert_eq!(state.view().record_count, 3);
    assert_eq!(effects.last(), Some(&Effect::EmitComplete { count: 3 }));
}

#[test]
fn detection_failure_is_terminal() {
    init_logging();
    let failure = RunFailure::WrongPageOnSupportedSite {
        site: "fanduel".to_string(),
        hint: "Please navigate to your FanDuel bet history/activity page first.".to_string(),
    };
    let (state, effects) = update(RunState::new(), Msg::DetectionFailed(failure.clone()));
    assert_eq!(effects, vec![Effect::EmitError(failure)]);
    assert!(state.phase().is_terminal());

    // A late detection message cannot revive the run.
    let (state, effects) = update(
        state,
        Msg::SiteDetected {
            site: "fanduel".to_string(),
            incremental: false,
        },
    );
    assert!(effects.is_empty());
    assert!(matches!(state.phase(), Phase::Failed(f) if f.kind() == FailureKind::WrongPageOnSupportedSite));
}

#[test]
fn export_failure_only_after_completion() {
    init_logging();
    let (state, effects) = update(
        detected(false),
        Msg::ExportFailed {
            message: "disk full".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(*state.phase(), Phase::Scrolling);

    let (state, _) = update(state, Msg::ScrollFinished { forced: false });
    let (state, _) = update(
        state,
        Msg::ExtractionFinished {
            count: 1,
            dom_excerpt: String::new(),
        },
    );
    let (state, effects) = update(
        state,
        Msg::ExportFailed {
            message: "disk full".to_string(),
        },
    );
    let failure = RunFailure::ExportFailure {
        message: "disk full".to_string(),
    };
    assert_eq!(effects, vec![Effect::EmitError(failure.clone())]);
    assert_eq!(*state.phase(), Phase::Failed(failure));
}
