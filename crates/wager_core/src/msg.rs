use crate::RunFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The page URL matched a supported site's history view.
    SiteDetected { site: String, incremental: bool },
    /// The page URL was rejected before any scrolling.
    DetectionFailed(RunFailure),
    /// The scroll driver issued one scroll attempt.
    ScrollStepStarted,
    /// The step hook finished for the current scroll attempt.
    ScrollStepFinished {
        new_records: usize,
        total_harvested: usize,
    },
    /// The scroll driver settled or hit its safety cap.
    ScrollFinished { forced: bool },
    /// The final extraction pass produced `count` records.
    ExtractionFinished { count: usize, dom_excerpt: String },
    /// The export collaborator rejected the record set.
    ExportFailed { message: String },
}
