//! Channel implementations
//!
//! Contains LogChannel, GatewayChannel, TimeoutChannel, and MockChannel.

mod gateway;
mod log;
mod mock;
mod timeout;

pub use self::gateway::{GatewayChannel, GatewayChannelConfig};
pub use self::log::LogChannel;
pub use self::mock::{MockChannel, SentMessage};
pub use self::timeout::TimeoutChannel;
