//! # Dispatcher
//!
//! 广播调度模块。
//!
//! 负责：
//! - 按队列顺序逐个发送 `DeliveryJob`
//! - 两个收件人之间强制等待可配置的间隔
//! - 单个收件人失败不影响后续任务
//! - 通过 `ProgressReporter` 输出进度事件

pub mod channels;
pub mod delay;
pub mod error;
pub mod factory;
pub mod report;
pub mod reporters;
pub mod scheduler;

pub use channels::{
    GatewayChannel, GatewayChannelConfig, LogChannel, MockChannel, SentMessage, TimeoutChannel,
};
pub use contracts::{ChannelAdapter, DeliveryJob, ProgressEvent, ProgressReporter};
pub use delay::{DelayFallback, DelayPolicy, DelayUpdate, MIN_DELAY_MILLIS};
pub use error::DispatcherError;
pub use factory::{create_channel, create_reporters, ConfiguredChannel};
pub use report::RunReport;
pub use reporters::{
    FanoutReporter, JsonLinesReporter, LogReporter, MetricsReporter, RecordingReporter,
};
pub use scheduler::{DispatchScheduler, MediaCaptions, SchedulerState};
