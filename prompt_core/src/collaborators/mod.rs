//! External collaborators - the seams where the pipeline meets the outside world.
//!
//! - **FieldCompleter**: fills in creative fields for a free-text brief
//! - **KnowledgeSource**: external articles used to backfill graph gaps
//! - **SessionStore**: persistence of finished runs
//!
//! The core only defines the traits and the conversions around them.
//! Network clients and file formats belong to the callers.

mod completion;
mod gap;
mod store;

pub use completion::*;
pub use gap::*;
pub use store::*;
