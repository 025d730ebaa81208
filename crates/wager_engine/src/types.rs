use engine_logging::{engine_error, engine_info};
use wager_core::{Record, RunFailure};

use crate::scroll::ScrollReport;

/// Events a run reports to whoever invoked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(String),
    Complete {
        records: Vec<Record>,
        site: String,
        count: usize,
    },
    Error {
        failure: RunFailure,
        message: String,
    },
}

impl EngineEvent {
    pub fn progress(message: impl Into<String>) -> Self {
        EngineEvent::Progress(message.into())
    }

    pub fn error(failure: RunFailure) -> Self {
        EngineEvent::Error {
            message: failure.to_string(),
            failure,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Forwards events into a channel; a closed receiver is ignored.
pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Writes events to the log and drops them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::Progress(message) => engine_info!("{}", message),
            EngineEvent::Complete { site, count, .. } => {
                engine_info!("Run complete: {} records from {}", count, site)
            }
            EngineEvent::Error { message, .. } => engine_error!("Run failed: {}", message),
        }
    }
}

/// Records of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Lowercase site key, e.g. `fanduel`.
    pub site: String,
    pub records: Vec<Record>,
    pub scroll: ScrollReport,
    /// Serialized export, when the run was asked to export.
    pub export: Option<String>,
}

pub type RunOutcome = Result<RunReport, RunFailure>;
