use crate::view_model::RunView;
use crate::RunFailure;

/// Lifecycle of one scrape run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Detecting,
    Scrolling,
    Harvesting,
    Extracting,
    Completed,
    Failed(RunFailure),
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    phase: Phase,
    site: Option<String>,
    incremental: bool,
    steps: u32,
    harvested: usize,
    record_count: usize,
    dirty: bool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    pub fn is_incremental(&self) -> bool {
        self.incremental
    }

    pub fn view(&self) -> RunView {
        RunView {
            phase: self.phase.clone(),
            site: self.site.clone(),
            steps: self.steps,
            harvested: self.harvested,
            record_count: self.record_count,
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, then clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn select_site(&mut self, site: String, incremental: bool) {
        self.site = Some(site);
        self.incremental = incremental;
        self.phase = Phase::Scrolling;
        self.dirty = true;
    }

    pub(crate) fn begin_step(&mut self) {
        self.steps += 1;
        if self.incremental {
            self.phase = Phase::Harvesting;
        }
        self.dirty = true;
    }

    pub(crate) fn end_step(&mut self, total_harvested: usize) {
        self.harvested = total_harvested;
        self.phase = Phase::Scrolling;
        self.dirty = true;
    }

    pub(crate) fn begin_extraction(&mut self) {
        self.phase = Phase::Extracting;
        self.dirty = true;
    }

    pub(crate) fn complete(&mut self, record_count: usize) {
        self.record_count = record_count;
        self.phase = Phase::Completed;
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, failure: RunFailure) {
        self.phase = Phase::Failed(failure);
        self.dirty = true;
    }
}
