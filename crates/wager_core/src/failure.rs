use thiserror::Error;

/// Terminal outcomes of a run that did not produce records.
///
/// None of these are retried; the caller reports the message to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunFailure {
    #[error("This site is not supported. Please navigate to FanDuel or DraftKings bet history.")]
    UnsupportedSite { url: String },
    #[error("{hint}")]
    WrongPageOnSupportedSite { site: String, hint: String },
    #[error("No bets found on this page. The page structure may have changed. Check the log for details.")]
    NoRecordsFound { dom_excerpt: String },
    #[error("CSV export failed: {message}")]
    ExportFailure { message: String },
}

impl RunFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            RunFailure::UnsupportedSite { .. } => FailureKind::UnsupportedSite,
            RunFailure::WrongPageOnSupportedSite { .. } => FailureKind::WrongPageOnSupportedSite,
            RunFailure::NoRecordsFound { .. } => FailureKind::NoRecordsFound,
            RunFailure::ExportFailure { .. } => FailureKind::ExportFailure,
        }
    }
}

/// Field-less discriminant of [`RunFailure`], handy for assertions and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UnsupportedSite,
    WrongPageOnSupportedSite,
    NoRecordsFound,
    ExportFailure,
}
