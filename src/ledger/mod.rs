mod gate;
mod record;

pub use gate::{FREE_USES, GateDecision, RESET_WINDOW_DAYS, TrialPolicy, can_use, evaluate};
pub use record::UsageRecord;
