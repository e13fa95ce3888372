//! 广播调度指标收集模块
//!
//! 基于 ProgressEvent 记录调度运行指标。

use contracts::{PayloadKind, ProgressEvent};
use metrics::{counter, gauge, histogram};

/// 从 ProgressEvent 记录指标
///
/// 每个调度事件调用一次。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_progress_event;
///
/// reporter.report(&event);
/// record_progress_event(&event);
/// ```
pub fn record_progress_event(event: &ProgressEvent) {
    match event {
        ProgressEvent::RunStarted {
            total_jobs,
            delay_millis,
            estimated_total_seconds,
        } => {
            gauge!("broadcaster_run_jobs").set(*total_jobs as f64);
            gauge!("broadcaster_delay_ms").set(*delay_millis as f64);
            gauge!("broadcaster_run_estimated_seconds").set(*estimated_total_seconds as f64);
            gauge!("broadcaster_current_job").set(0.0);
        }
        ProgressEvent::JobStarted { index, .. } => {
            counter!("broadcaster_jobs_total").increment(1);
            gauge!("broadcaster_current_job").set(*index as f64);
        }
        ProgressEvent::PayloadSent { kind, .. } => {
            record_payload_sent(*kind);
        }
        ProgressEvent::PayloadSkipped { kind, .. } => {
            counter!(
                "broadcaster_payloads_skipped_total",
                "kind" => kind.as_str()
            )
            .increment(1);
        }
        ProgressEvent::JobFailed { error, .. } => {
            counter!(
                "broadcaster_jobs_failed_total",
                "kind" => error.kind.as_str()
            )
            .increment(1);
        }
        ProgressEvent::RunCompleted {
            succeeded, failed, ..
        } => {
            counter!("broadcaster_runs_total", "status" => "completed").increment(1);
            gauge!("broadcaster_run_succeeded").set(*succeeded as f64);
            gauge!("broadcaster_run_failed").set(*failed as f64);
        }
        ProgressEvent::RunAborted { .. } => {
            counter!("broadcaster_runs_total", "status" => "aborted").increment(1);
        }
    }
}

/// 记录单个载荷发送成功
fn record_payload_sent(kind: PayloadKind) {
    counter!(
        "broadcaster_payloads_sent_total",
        "kind" => kind.as_str()
    )
    .increment(1);
}

/// 记录运行耗时 (秒)
pub fn record_run_duration_secs(secs: f64) {
    histogram!("broadcaster_run_duration_seconds").record(secs);
}
