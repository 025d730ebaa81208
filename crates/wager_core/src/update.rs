use crate::{Effect, Msg, Phase, RunFailure, RunState};

/// Pure update function: applies a message to run state and returns any effects.
///
/// Messages that do not fit the current phase are ignored, so a finished run
/// never restarts and a failed run never completes.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    let effects = match msg {
        Msg::SiteDetected { site, incremental } => {
            if *state.phase() != Phase::Detecting {
                return (state, Vec::new());
            }
            state.select_site(site, incremental);
            let mut effects = Vec::with_capacity(3);
            effects.push(Effect::EmitProgress(
                "Starting auto-scroll to load all bets...".to_string(),
            ));
            if incremental {
                effects.push(Effect::ResetHarvester);
            }
            effects.push(Effect::StartScroll {
                harvest: incremental,
            });
            effects
        }
        Msg::DetectionFailed(failure) => {
            if *state.phase() != Phase::Detecting {
                return (state, Vec::new());
            }
            state.fail(failure.clone());
            vec![Effect::EmitError(failure)]
        }
        Msg::ScrollStepStarted => {
            if *state.phase() == Phase::Scrolling {
                state.begin_step();
            }
            Vec::new()
        }
        Msg::ScrollStepFinished {
            new_records,
            total_harvested,
        } => match state.phase() {
            Phase::Scrolling | Phase::Harvesting => {
                state.end_step(total_harvested);
                if new_records > 0 {
                    vec![Effect::EmitProgress(format!(
                        "Collected {total_harvested} bets so far..."
                    ))]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        },
        Msg::ScrollFinished { forced: _ } => match state.phase() {
            Phase::Scrolling | Phase::Harvesting => {
                state.begin_extraction();
                vec![
                    Effect::EmitProgress("Parsing bet data...".to_string()),
                    Effect::RunFinalExtraction {
                        incremental: state.is_incremental(),
                    },
                ]
            }
            _ => Vec::new(),
        },
        Msg::ExtractionFinished { count, dom_excerpt } => {
            if *state.phase() != Phase::Extracting {
                return (state, Vec::new());
            }
            if count == 0 {
                let failure = RunFailure::NoRecordsFound { dom_excerpt };
                state.fail(failure.clone());
                vec![Effect::EmitError(failure)]
            } else {
                state.complete(count);
                vec![
                    Effect::EmitProgress(format!("Found {count} bets. Generating CSV...")),
                    Effect::EmitComplete { count },
                ]
            }
        }
        Msg::ExportFailed { message } => {
            if *state.phase() != Phase::Completed {
                return (state, Vec::new());
            }
            let failure = RunFailure::ExportFailure { message };
            state.fail(failure.clone());
            vec![Effect::EmitError(failure)]
        }
    };

    (state, effects)
}
