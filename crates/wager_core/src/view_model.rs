use crate::Phase;

/// Read-only snapshot of a run for progress displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunView {
    pub phase: Phase,
    pub site: Option<String>,
    pub steps: u32,
    pub harvested: usize,
    pub record_count: usize,
    pub dirty: bool,
}
