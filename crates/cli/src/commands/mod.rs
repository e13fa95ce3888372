//! Command implementations.

mod preview;
mod run;
mod validate;

pub use preview::run_preview;
pub use run::run_broadcast;
pub use validate::run_validate;
