//! DispatchScheduler - sequential dispatch loop
//!
//! State machine: `Idle -> Running -> {Completed, Stopped, Aborted}`. One
//! scheduler runs one job set; a new run needs a new scheduler.
//!
//! Per job, payloads go out in the fixed order image, video, audio, file,
//! text, url. The first failing send ends that job (recorded in its outcome)
//! and the loop moves on. The delay always elapses between two jobs,
//! whatever the first one's outcome. A shutdown request is only honoured
//! during that wait, never in the middle of a job.

use std::path::Path;

use contracts::{
    ChannelAdapter, ChannelConfig, ContractError, DeliveryJob, DispatchOutcome, ErrorDescriptor,
    MediaKind, PayloadKind, ProgressEvent, ProgressReporter,
};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::delay::DelayPolicy;
use crate::error::DispatcherError;
use crate::report::RunReport;

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Idle,
    Running,
    Completed,
    /// Shut down between two jobs; later jobs were never contacted
    Stopped,
    Aborted,
}

/// Captions attached to media sends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaCaptions {
    pub image: String,
    pub video: String,
    pub file: String,
}

impl From<&ChannelConfig> for MediaCaptions {
    fn from(config: &ChannelConfig) -> Self {
        Self {
            image: config.image_caption.clone(),
            video: config.video_caption.clone(),
            file: config.file_caption.clone(),
        }
    }
}

/// Sequential dispatch engine
pub struct DispatchScheduler {
    state: SchedulerState,
    captions: MediaCaptions,
    shutdown: Option<watch::Receiver<bool>>,
}

impl DispatchScheduler {
    /// Create an idle scheduler
    pub fn new(captions: MediaCaptions) -> Self {
        Self {
            state: SchedulerState::Idle,
            captions,
            shutdown: None,
        }
    }

    /// Stop at the next delay wait once `shutdown` reads `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Build the queue, then run it
    ///
    /// A queue that cannot be built moves the scheduler to `Aborted` before
    /// any job runs.
    pub async fn start_with<F, C, R>(
        &mut self,
        build_queue: F,
        delay: &DelayPolicy,
        channel: &mut C,
        reporter: &mut R,
    ) -> Result<RunReport, DispatcherError>
    where
        F: FnOnce() -> Result<Vec<DeliveryJob>, ContractError>,
        C: ChannelAdapter,
        R: ProgressReporter + ?Sized,
    {
        self.ensure_idle()?;
        match build_queue() {
            Ok(jobs) => self.start(jobs, delay, channel, reporter).await,
            Err(e) => {
                self.abort(&e, reporter);
                Err(DispatcherError::Ingestion(e))
            }
        }
    }

    /// Move an idle scheduler to `Aborted`
    pub fn abort<R>(&mut self, reason: &ContractError, reporter: &mut R)
    where
        R: ProgressReporter + ?Sized,
    {
        if self.state != SchedulerState::Idle {
            warn!(state = ?self.state, "Abort ignored, scheduler already started");
            return;
        }
        error!(error = %reason, "Run aborted before dispatch");
        self.state = SchedulerState::Aborted;
        reporter.report(&ProgressEvent::RunAborted {
            reason: reason.to_string(),
        });
    }

    /// Dispatch every job in order
    ///
    /// Per-job failures are recorded in the report, never returned.
    #[instrument(
        name = "dispatch_scheduler_start",
        skip(self, jobs, delay, channel, reporter),
        fields(jobs = jobs.len(), channel = %channel.name(), delay_ms = delay.get())
    )]
    pub async fn start<C, R>(
        &mut self,
        jobs: Vec<DeliveryJob>,
        delay: &DelayPolicy,
        channel: &mut C,
        reporter: &mut R,
    ) -> Result<RunReport, DispatcherError>
    where
        C: ChannelAdapter,
        R: ProgressReporter + ?Sized,
    {
        self.ensure_idle()?;
        self.state = SchedulerState::Running;

        let total = jobs.len();
        let delay_millis = delay.get();
        let pause = delay.duration();
        let estimated_total_seconds = delay.estimate_total_seconds(total);

        reporter.report(&ProgressEvent::RunStarted {
            total_jobs: total,
            delay_millis,
            estimated_total_seconds,
        });
        info!(
            total_jobs = total,
            delay_secs = delay_millis / 1000,
            estimated_total_secs = estimated_total_seconds,
            "Dispatch run started"
        );

        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(total);
        let mut stopped = false;

        for (idx, job) in jobs.iter().enumerate() {
            if idx > 0 {
                debug!(delay_ms = delay_millis, "Waiting before next recipient");
                tokio::select! {
                    biased;
                    _ = shutdown_requested(&mut self.shutdown) => {
                        warn!(
                            dispatched = idx,
                            not_contacted = total - idx,
                            "Shutdown requested, stopping before next recipient"
                        );
                        stopped = true;
                        break;
                    }
                    _ = tokio::time::sleep(pause) => {}
                }
            }

            let index = idx + 1;
            reporter.report(&ProgressEvent::JobStarted {
                index,
                total,
                recipient_id: job.recipient_id.clone(),
            });

            let outcome = self.dispatch_job(job, channel, reporter).await;
            outcomes.push(outcome);
        }

        self.state = if stopped {
            SchedulerState::Stopped
        } else {
            SchedulerState::Completed
        };

        let mut report = RunReport::new(
            self.state,
            delay_millis,
            estimated_total_seconds,
            started.elapsed(),
            outcomes,
        );
        report.not_contacted = total - report.total_jobs;
        reporter.report(&ProgressEvent::RunCompleted {
            total_jobs: report.total_jobs,
            succeeded: report.succeeded,
            failed: report.failed,
        });
        info!(
            total_jobs = report.total_jobs,
            succeeded = report.succeeded,
            failed = report.failed,
            not_contacted = report.not_contacted,
            state = ?self.state,
            "Dispatch run finished"
        );

        Ok(report)
    }

    fn ensure_idle(&self) -> Result<(), DispatcherError> {
        if self.state == SchedulerState::Idle {
            Ok(())
        } else {
            Err(DispatcherError::InvalidState {
                expected: SchedulerState::Idle,
                actual: self.state,
            })
        }
    }

    #[instrument(
        name = "dispatch_job",
        skip(self, job, channel, reporter),
        fields(recipient = %job.recipient_id)
    )]
    async fn dispatch_job<C, R>(
        &self,
        job: &DeliveryJob,
        channel: &mut C,
        reporter: &mut R,
    ) -> DispatchOutcome
    where
        C: ChannelAdapter,
        R: ProgressReporter + ?Sized,
    {
        let mut outcome = DispatchOutcome::new(&job.recipient_id);

        if let Err(failure) = self
            .send_payloads(job, channel, reporter, &mut outcome)
            .await
        {
            error!(
                recipient = %job.recipient_id,
                kind = %failure.kind,
                error = %failure.message,
                "Delivery failed"
            );
            reporter.report(&ProgressEvent::JobFailed {
                recipient_id: job.recipient_id.clone(),
                error: failure.clone(),
            });
            outcome.error = Some(failure);
        }

        outcome
    }

    async fn send_payloads<C, R>(
        &self,
        job: &DeliveryJob,
        channel: &mut C,
        reporter: &mut R,
        outcome: &mut DispatchOutcome,
    ) -> Result<(), ErrorDescriptor>
    where
        C: ChannelAdapter,
        R: ProgressReporter + ?Sized,
    {
        let to = job.recipient_id.as_str();

        for kind in MediaKind::ALL {
            let Some(path) = job.media_path(kind) else {
                continue;
            };
            let payload = PayloadKind::from(kind);
            outcome.attempted.insert(payload);

            if !media_exists(path).await {
                warn!(recipient = %to, kind = %payload, path = %path.display(), "Attachment missing, skipped");
                outcome.skipped.insert(payload);
                reporter.report(&ProgressEvent::PayloadSkipped {
                    recipient_id: to.to_string(),
                    kind: payload,
                    path: path.to_path_buf(),
                });
                continue;
            }

            let result = match kind {
                MediaKind::Image => channel.send_image(to, path, &self.captions.image).await,
                MediaKind::Video => channel.send_video(to, path, &self.captions.video).await,
                MediaKind::Audio => channel.send_audio(to, path).await,
                MediaKind::File => {
                    let filename = file_name(path);
                    channel
                        .send_file(to, path, &filename, &self.captions.file)
                        .await
                }
            };
            self.record_send(payload, result, to, outcome, reporter)?;
        }

        if let Some(text) = &job.text {
            outcome.attempted.insert(PayloadKind::Text);
            let result = channel.send_text(to, text).await;
            self.record_send(PayloadKind::Text, result, to, outcome, reporter)?;
        }

        if let Some(url) = &job.url {
            outcome.attempted.insert(PayloadKind::Url);
            let result = channel.send_text(to, url).await;
            self.record_send(PayloadKind::Url, result, to, outcome, reporter)?;
        }

        Ok(())
    }

    fn record_send<R>(
        &self,
        kind: PayloadKind,
        result: Result<(), ContractError>,
        recipient_id: &str,
        outcome: &mut DispatchOutcome,
        reporter: &mut R,
    ) -> Result<(), ErrorDescriptor>
    where
        R: ProgressReporter + ?Sized,
    {
        match result {
            Ok(()) => {
                debug!(recipient = %recipient_id, kind = %kind, "Payload sent");
                outcome.sent.insert(kind);
                reporter.report(&ProgressEvent::PayloadSent {
                    recipient_id: recipient_id.to_string(),
                    kind,
                });
                Ok(())
            }
            Err(e) => Err(ErrorDescriptor::new(kind, e.to_string())),
        }
    }
}

impl Default for DispatchScheduler {
    fn default() -> Self {
        Self::new(MediaCaptions::default())
    }
}

/// Resolves once shutdown reads `true`; never without a live sender
async fn shutdown_requested(shutdown: &mut Option<watch::Receiver<bool>>) {
    if let Some(rx) = shutdown {
        let requested = rx.wait_for(|stop| *stop).await.is_ok();
        if requested {
            return;
        }
    }
    std::future::pending::<()>().await
}

/// Checked at send time, never at normalization
async fn media_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::MockChannel;
    use crate::reporters::RecordingReporter;
    use std::time::Duration;
    use tempfile::tempdir;

    fn text_job(recipient: &str, text: &str) -> DeliveryJob {
        let mut job = DeliveryJob::new(recipient);
        job.text = Some(text.to_string());
        job
    }

    fn captions() -> MediaCaptions {
        MediaCaptions {
            image: "img".to_string(),
            video: "vid".to_string(),
            file: "📎 Attached file".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_and_url_then_missing_image() {
        let mut first = text_job("573001112222@s.whatsapp.net", "Hola");
        first.url = Some("https://example.com".to_string());
        let mut second = DeliveryJob::new("573003334444@s.whatsapp.net");
        second
            .media
            .insert(MediaKind::Image, "/definitely/missing/foto.jpg".into());

        let mut scheduler = DispatchScheduler::new(captions());
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();
        let delay = DelayPolicy::new(1);

        let report = scheduler
            .start(vec![first, second], &delay, &mut channel, &mut reporter)
            .await
            .unwrap();

        let sent = channel.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].kind, PayloadKind::Text);
        assert_eq!(sent[0].body, "Hola");
        assert_eq!(sent[1].kind, PayloadKind::Url);
        assert_eq!(sent[1].body, "https://example.com");
        assert!(sent
            .iter()
            .all(|m| m.recipient_id == "573001112222@s.whatsapp.net"));

        let skipped = &report.outcomes[1];
        assert!(skipped.attempted.contains(&PayloadKind::Image));
        assert!(skipped.skipped.contains(&PayloadKind::Image));
        assert!(skipped.sent.is_empty());
        assert!(skipped.error.is_none());

        assert_eq!(report.state, SchedulerState::Completed);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(scheduler.state(), SchedulerState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_jobs_survives_failure() {
        let jobs = vec![
            text_job("57a", "uno"),
            text_job("57b", "dos"),
            text_job("57c", "tres"),
        ];
        let mut scheduler = DispatchScheduler::default();
        let mut channel = MockChannel::new("mock").fail_recipient("57b");
        let mut reporter = RecordingReporter::new();
        let delay = DelayPolicy::new(2);

        let report = scheduler
            .start(jobs, &delay, &mut channel, &mut reporter)
            .await
            .unwrap();

        let sent = channel.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].recipient_id, "57a");
        assert_eq!(sent[1].recipient_id, "57c");
        assert!(sent[1].at - sent[0].at >= Duration::from_secs(4));

        assert_eq!(report.failed, 1);
        assert_eq!(report.succeeded, 2);
        assert!(report.elapsed() >= Duration::from_secs(4));
        assert!(report.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_preserved() {
        let recipients: Vec<String> = (0..5).map(|i| format!("5730000000{i}")).collect();
        let jobs = recipients.iter().map(|r| text_job(r, "hola")).collect();

        let mut scheduler = DispatchScheduler::default();
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();
        let delay = DelayPolicy::new(1);

        scheduler
            .start(jobs, &delay, &mut channel, &mut reporter)
            .await
            .unwrap();

        let seen: Vec<&str> = channel
            .sent()
            .iter()
            .map(|m| m.recipient_id.as_str())
            .collect();
        assert_eq!(seen, recipients);

        for pair in channel.sent().windows(2) {
            assert!(pair[1].at - pair[0].at >= Duration::from_secs(1));
        }

        let indices: Vec<usize> = reporter
            .events()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::JobStarted { index, total, .. } => {
                    assert_eq!(*total, 5);
                    Some(*index)
                }
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_failure_ends_job() {
        let mut job = text_job("57a", "hola");
        job.url = Some("https://example.com".to_string());

        let mut scheduler = DispatchScheduler::default();
        let mut channel = MockChannel::new("mock").fail_on("57a", PayloadKind::Text);
        let mut reporter = RecordingReporter::new();

        let report = scheduler
            .start(vec![job], &DelayPolicy::default(), &mut channel, &mut reporter)
            .await
            .unwrap();

        assert!(channel.sent().is_empty());
        let outcome = &report.outcomes[0];
        let error = outcome.error.as_ref().unwrap();
        assert_eq!(error.kind, PayloadKind::Text);
        assert!(error.message.contains("injected failure"));
        assert!(!outcome.attempted.contains(&PayloadKind::Url));
        assert!(reporter.names().contains(&"job_failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_media_order_and_file_name() {
        let dir = tempdir().unwrap();
        let mut job = text_job("57a", "hola");
        job.url = Some("https://example.com".to_string());
        for (kind, name) in [
            (MediaKind::File, "informe.pdf"),
            (MediaKind::Audio, "nota.mp3"),
            (MediaKind::Image, "foto.jpg"),
            (MediaKind::Video, "clip.mp4"),
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, b"x").unwrap();
            job.media.insert(kind, path);
        }

        let mut scheduler = DispatchScheduler::new(captions());
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();

        let report = scheduler
            .start(vec![job], &DelayPolicy::default(), &mut channel, &mut reporter)
            .await
            .unwrap();

        let kinds: Vec<PayloadKind> = channel.sent().iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PayloadKind::Image,
                PayloadKind::Video,
                PayloadKind::Audio,
                PayloadKind::File,
                PayloadKind::Text,
                PayloadKind::Url,
            ]
        );

        let file = &channel.sent()[3];
        assert_eq!(file.filename.as_deref(), Some("informe.pdf"));
        assert_eq!(file.caption.as_deref(), Some("📎 Attached file"));
        assert_eq!(channel.sent()[0].caption.as_deref(), Some("img"));
        assert_eq!(channel.sent()[2].caption, None);

        assert_eq!(report.payloads_sent(), 6);
        assert_eq!(report.payloads_skipped(), 0);
        assert_eq!(scheduler.state(), SchedulerState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_at_delay_wait() {
        let jobs = vec![
            text_job("57a", "uno"),
            text_job("57b", "dos"),
            text_job("57c", "tres"),
        ];
        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(15)).await;
            let _ = stop_tx.send(true);
        });

        let mut scheduler = DispatchScheduler::default().with_shutdown(stop_rx);
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();

        let report = scheduler
            .start(jobs, &DelayPolicy::new(10), &mut channel, &mut reporter)
            .await
            .unwrap();

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(report.state, SchedulerState::Stopped);
        assert_eq!(report.total_jobs, 2);
        assert_eq!(report.not_contacted, 1);
        assert!(channel.sent_to("57c").is_empty());
        assert_eq!(reporter.names().last(), Some(&"run_completed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_never_interrupts_a_job() {
        let mut job = text_job("57a", "hola");
        job.url = Some("https://example.com".to_string());
        let (stop_tx, stop_rx) = watch::channel(false);
        stop_tx.send(true).unwrap();

        let mut scheduler = DispatchScheduler::default().with_shutdown(stop_rx);
        let mut channel = MockChannel::new("mock").with_latency(Duration::from_secs(1));
        let mut reporter = RecordingReporter::new();

        let report = scheduler
            .start(
                vec![job, text_job("57b", "chao")],
                &DelayPolicy::new(5),
                &mut channel,
                &mut reporter,
            )
            .await
            .unwrap();

        assert_eq!(channel.sent_to("57a").len(), 2);
        assert!(report.outcomes[0].error.is_none());
        assert_eq!(report.not_contacted, 1);
        assert_eq!(report.state, SchedulerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_shutdown_sender_is_ignored() {
        let (stop_tx, stop_rx) = watch::channel(false);
        drop(stop_tx);

        let mut scheduler = DispatchScheduler::default().with_shutdown(stop_rx);
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();

        let report = scheduler
            .start(
                vec![text_job("57a", "uno"), text_job("57b", "dos")],
                &DelayPolicy::new(1),
                &mut channel,
                &mut reporter,
            )
            .await
            .unwrap();

        assert_eq!(report.state, SchedulerState::Completed);
        assert_eq!(report.not_contacted, 0);
        assert_eq!(channel.sent().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_sequence() {
        let mut scheduler = DispatchScheduler::default();
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();

        scheduler
            .start(
                vec![text_job("57a", "hola")],
                &DelayPolicy::new(3),
                &mut channel,
                &mut reporter,
            )
            .await
            .unwrap();

        assert_eq!(
            reporter.names(),
            vec!["run_started", "job_started", "payload_sent", "run_completed"]
        );
        assert_eq!(
            reporter.events()[0],
            ProgressEvent::RunStarted {
                total_jobs: 1,
                delay_millis: 3000,
                estimated_total_seconds: 3,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_queue_completes() {
        let mut scheduler = DispatchScheduler::default();
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();

        let report = scheduler
            .start(Vec::new(), &DelayPolicy::default(), &mut channel, &mut reporter)
            .await
            .unwrap();

        assert_eq!(report.total_jobs, 0);
        assert_eq!(report.state, SchedulerState::Completed);
        assert_eq!(report.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_rejected() {
        let mut scheduler = DispatchScheduler::default();
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();
        let delay = DelayPolicy::default();

        scheduler
            .start(Vec::new(), &delay, &mut channel, &mut reporter)
            .await
            .unwrap();
        let second = scheduler
            .start(Vec::new(), &delay, &mut channel, &mut reporter)
            .await;

        assert!(matches!(
            second,
            Err(DispatcherError::InvalidState {
                expected: SchedulerState::Idle,
                actual: SchedulerState::Completed,
            })
        ));
    }

    #[tokio::test]
    async fn test_unreadable_queue_aborts() {
        let mut scheduler = DispatchScheduler::default();
        let mut channel = MockChannel::new("mock");
        let mut reporter = RecordingReporter::new();

        let result = scheduler
            .start_with(
                || {
                    Err(ContractError::source_unreadable(
                        "mensajes.xlsx",
                        "no such file",
                    ))
                },
                &DelayPolicy::default(),
                &mut channel,
                &mut reporter,
            )
            .await;

        assert!(matches!(result, Err(DispatcherError::Ingestion(_))));
        assert_eq!(scheduler.state(), SchedulerState::Aborted);
        assert_eq!(reporter.names(), vec!["run_aborted"]);
        assert!(channel.sent().is_empty());
    }
}
