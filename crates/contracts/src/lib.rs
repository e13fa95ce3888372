//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Job Model
//! - A `RawRow` is one decoded line of the recipient sheet
//! - A `DeliveryJob` is the normalized intent for one recipient
//! - A `DispatchOutcome` is what actually happened when the job ran

mod blueprint;
mod channel;
mod error;
mod job;
mod outcome;
mod progress;
mod row;
mod source;

pub use blueprint::*;
pub use channel::{ChannelAdapter, LocalChannelAdapter};
pub use error::*;
pub use job::*;
pub use outcome::*;
pub use progress::*;
pub use row::*;
pub use source::JobSource;
