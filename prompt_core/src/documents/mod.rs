//! Documents - the artifacts passed between pipeline stages.
//!
//! - **IntentDocument**: what the user wants; mutated only by operators
//! - **TechnicalDocument**: derived concept plus unresolved directives
//! - **ProductionPlan**: fully resolved, read-only input to rendering
//! - **ReasoningTrace**: the audit log accumulated across all of them

mod intent;
mod plan;
mod technical;
mod trace;

pub use intent::*;
pub use plan::*;
pub use technical::*;
pub use trace::*;
