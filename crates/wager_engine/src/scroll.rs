//! Drives a lazily loading list to its end.
//!
//! Loading is judged complete when the container's height and element count
//! stop changing and no subtree mutation has been seen for a number of
//! consecutive polls. Both signals are needed: virtualized lists swap cards
//! without growing, and some lists grow without child-list mutations on the
//! watched node.

use std::time::Duration;

use async_trait::async_trait;
use engine_logging::{engine_debug, engine_info};
use serde::Deserialize;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};

use crate::page::{PageHost, ScrollTarget};
use crate::{EngineEvent, ProgressSink};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScrollSettings {
    pub step_delay_ms: u64,
    pub max_stable_attempts: u32,
    pub max_total_duration_ms: u64,
    pub mutation_debounce_ms: u64,
    /// Case-insensitive tokens a bet list container's text should contain.
    pub anchor_tokens: Vec<String>,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        let step_delay_ms = 1_000;
        let max_stable_attempts = 3;
        Self {
            step_delay_ms,
            max_stable_attempts,
            // 5s idle budget plus two passes over the stall window.
            max_total_duration_ms: 5_000 + u64::from(max_stable_attempts) * step_delay_ms * 2,
            mutation_debounce_ms: 1_500,
            anchor_tokens: ["bet", "wager", "stake", "odds", "payout"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ScrollSettings {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms.max(1))
    }

    pub fn max_total_duration(&self) -> Duration {
        Duration::from_millis(self.max_total_duration_ms)
    }

    /// Grace period after the last mutation, capped at one step so a quiet
    /// poll always counts toward settling.
    pub fn mutation_debounce(&self) -> Duration {
        Duration::from_millis(self.mutation_debounce_ms).min(self.step_delay())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Content stopped changing for `max_stable_attempts` polls.
    Settled,
    /// The safety cap elapsed first.
    Forced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollReport {
    pub steps: u32,
    pub completion: Completion,
}

/// Called after every scroll attempt, before the next one is issued.
#[async_trait(?Send)]
pub trait StepHook {
    async fn on_step(&mut self, step: u32);
}

#[derive(Debug, Clone, Default)]
pub struct ScrollDriver {
    settings: ScrollSettings,
}

impl ScrollDriver {
    pub fn new(settings: ScrollSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScrollSettings {
        &self.settings
    }

    /// Scrolls until loading settles or the safety cap elapses. Never fails.
    pub async fn run(
        &self,
        host: &dyn PageHost,
        sink: &dyn ProgressSink,
        mut hook: Option<&mut dyn StepHook>,
    ) -> ScrollReport {
        let settings = &self.settings;
        let target = self.locate_container(host).await;
        engine_info!("Scrolling {:?}", target);

        let mut mutations = host.watch_mutations(&target);
        let started = Instant::now();
        let deadline = started + settings.max_total_duration();
        let mut ticker = interval_at(started + settings.step_delay(), settings.step_delay());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut baseline = host.metrics(&target).await;
        let mut last_mutation: Option<Instant> = None;
        let mut mutated_since_poll = false;
        let mut stable = 0u32;
        let mut steps = 0u32;

        let completion = loop {
            tokio::select! {
                biased;
                _ = sleep_until(deadline) => {
                    sink.emit(EngineEvent::progress(
                        "Safety timeout reached, proceeding with loaded content.",
                    ));
                    break Completion::Forced;
                }
                _ = ticker.tick() => {}
                Some(batch) = mutations.recv() => {
                    if batch.is_structural() {
                        mutated_since_poll = true;
                        last_mutation = Some(Instant::now());
                    }
                    continue;
                }
            }

            host.scroll_to_end(&target).await;
            steps += 1;
            if let Some(hook) = hook.as_deref_mut() {
                hook.on_step(steps).await;
            }

            // Mutations caused by this scroll belong to this poll.
            while let Ok(batch) = mutations.try_recv() {
                if batch.is_structural() {
                    mutated_since_poll = true;
                    last_mutation = Some(Instant::now());
                }
            }

            let current = host.metrics(&target).await;
            let settling = last_mutation
                .is_some_and(|at| Instant::now().duration_since(at) < settings.mutation_debounce());
            engine_debug!(
                "Scroll step {}: {:?} (mutated={}, settling={})",
                steps,
                current,
                mutated_since_poll,
                settling
            );

            if current == baseline && !mutated_since_poll && !settling {
                stable += 1;
                sink.emit(EngineEvent::progress(format!(
                    "Checking for more content... ({stable}/{})",
                    settings.max_stable_attempts
                )));
                if stable >= settings.max_stable_attempts {
                    break Completion::Settled;
                }
            } else {
                stable = 0;
                baseline = current;
                sink.emit(EngineEvent::progress("Scrolling and loading more bets..."));
            }
            mutated_since_poll = false;
        };

        host.scroll_to_top(&target).await;
        engine_info!("Scrolling finished after {} steps: {:?}", steps, completion);
        ScrollReport { steps, completion }
    }

    /// Prefers a scrollable descendant that holds bet content, otherwise the
    /// document itself.
    pub async fn locate_container(&self, host: &dyn PageHost) -> ScrollTarget {
        let tokens: Vec<String> = self
            .settings
            .anchor_tokens
            .iter()
            .map(|t| t.to_lowercase())
            .collect();
        host.scroll_candidates()
            .await
            .into_iter()
            .find(|candidate| {
                let text = candidate.text_sample.to_lowercase();
                candidate.overflow_y.is_scrollable()
                    && candidate.scroll_height > candidate.client_height
                    && tokens.iter().any(|token| text.contains(token.as_str()))
            })
            .map(|candidate| candidate.target)
            .unwrap_or(ScrollTarget::Document)
    }
}
