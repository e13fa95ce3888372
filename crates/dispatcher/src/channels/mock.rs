//! MockChannel - records sends in memory, for tests

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use contracts::{ChannelAdapter, ContractError, PayloadKind};
use tokio::time::Instant;

/// One recorded send
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub recipient_id: String,
    pub kind: PayloadKind,
    /// Text body, or the attachment path for media sends
    pub body: String,
    pub caption: Option<String>,
    pub filename: Option<String>,
    pub at: Instant,
}

/// Mock transport with failure injection
#[derive(Debug, Default)]
pub struct MockChannel {
    name: String,
    sent: Vec<SentMessage>,
    failing_recipients: HashSet<String>,
    failing_sends: HashSet<(String, PayloadKind)>,
    latency: Option<Duration>,
}

impl MockChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Every send to this recipient fails
    pub fn fail_recipient(mut self, recipient_id: impl Into<String>) -> Self {
        self.failing_recipients.insert(recipient_id.into());
        self
    }

    /// Sends of one kind to this recipient fail
    pub fn fail_on(mut self, recipient_id: impl Into<String>, kind: PayloadKind) -> Self {
        self.failing_sends.insert((recipient_id.into(), kind));
        self
    }

    /// Each send takes this long before completing
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn sent(&self) -> &[SentMessage] {
        &self.sent
    }

    pub fn sent_to(&self, recipient_id: &str) -> Vec<&SentMessage> {
        self.sent
            .iter()
            .filter(|m| m.recipient_id == recipient_id)
            .collect()
    }

    async fn record(
        &mut self,
        recipient_id: &str,
        kind: PayloadKind,
        body: String,
        caption: Option<&str>,
        filename: Option<&str>,
    ) -> Result<(), ContractError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing_recipients.contains(recipient_id)
            || self
                .failing_sends
                .contains(&(recipient_id.to_string(), kind))
        {
            return Err(ContractError::channel_send(
                &self.name,
                recipient_id,
                kind,
                "injected failure",
            ));
        }

        self.sent.push(SentMessage {
            recipient_id: recipient_id.to_string(),
            kind,
            body,
            caption: caption.map(str::to_string),
            filename: filename.map(str::to_string),
            at: Instant::now(),
        });
        Ok(())
    }
}

fn path_body(path: &Path) -> String {
    path.display().to_string()
}

impl ChannelAdapter for MockChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_text(&mut self, recipient_id: &str, text: &str) -> Result<(), ContractError> {
        self.record(recipient_id, PayloadKind::Text, text.to_string(), None, None)
            .await
    }

    async fn send_image(
        &mut self,
        recipient_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), ContractError> {
        self.record(
            recipient_id,
            PayloadKind::Image,
            path_body(path),
            Some(caption),
            None,
        )
        .await
    }

    async fn send_video(
        &mut self,
        recipient_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), ContractError> {
        self.record(
            recipient_id,
            PayloadKind::Video,
            path_body(path),
            Some(caption),
            None,
        )
        .await
    }

    async fn send_audio(&mut self, recipient_id: &str, path: &Path) -> Result<(), ContractError> {
        self.record(recipient_id, PayloadKind::Audio, path_body(path), None, None)
            .await
    }

    async fn send_file(
        &mut self,
        recipient_id: &str,
        path: &Path,
        filename: &str,
        caption: &str,
    ) -> Result<(), ContractError> {
        self.record(
            recipient_id,
            PayloadKind::File,
            path_body(path),
            Some(caption),
            Some(filename),
        )
        .await
    }
}
