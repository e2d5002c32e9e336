//! Standard actions.

pub mod conditional;
pub mod logging;

pub use conditional::{BranchAction, ConditionalAction};
pub use logging::LoggingAction;
