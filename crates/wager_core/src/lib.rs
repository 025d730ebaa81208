//! Wager core: record model, failure taxonomy and the pure run state machine.
mod effect;
mod failure;
mod harvest_state;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use failure::{FailureKind, RunFailure};
pub use harvest_state::HarvestState;
pub use msg::Msg;
pub use record::{BetResult, Field, Record, RecordId};
pub use state::{Phase, RunState};
pub use update::update;
pub use view_model::RunView;
