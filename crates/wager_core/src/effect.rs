use crate::RunFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ResetHarvester,
    StartScroll { harvest: bool },
    RunFinalExtraction { incremental: bool },
    EmitProgress(String),
    EmitComplete { count: usize },
    EmitError(RunFailure),
}
