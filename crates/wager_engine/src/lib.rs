//! Wager engine: page seam, scrolling, record extraction and export.
mod export;
pub mod extract;
mod harvest;
mod page;
mod persist;
mod pipeline;
mod replay;
mod scroll;
mod sites;
mod types;

pub use export::{export_filename, write_export, CsvExporter, ExportError, Exporter};
pub use extract::{Rendering, SiteExtractor, SiteProfile, SiteRegistry, Strategy};
pub use harvest::IncrementalHarvester;
pub use page::{
    ContainerMetrics, MutationBatch, Overflow, PageHost, ScrollCandidate, ScrollTarget,
};
pub use persist::{ExportDir, PersistError};
pub use pipeline::Orchestrator;
pub use replay::ReplayPage;
pub use scroll::{Completion, ScrollDriver, ScrollReport, ScrollSettings, StepHook};
pub use sites::{draftkings, fanduel};
pub use types::{
    ChannelProgressSink, EngineEvent, LogProgressSink, ProgressSink, RunOutcome, RunReport,
};
