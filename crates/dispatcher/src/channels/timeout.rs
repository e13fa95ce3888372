//! TimeoutChannel - bounds every send of an inner channel

use std::path::Path;
use std::time::Duration;

use contracts::{ChannelAdapter, ContractError, PayloadKind};
use tracing::warn;

/// Wraps a channel so that a hung send becomes a send error
pub struct TimeoutChannel<C> {
    inner: C,
    limit: Duration,
}

impl<C: ChannelAdapter> TimeoutChannel<C> {
    pub fn new(inner: C, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn timed_out(&self, recipient_id: &str, kind: PayloadKind) -> ContractError {
        warn!(
            channel = %self.inner.name(),
            recipient = %recipient_id,
            kind = %kind,
            limit_ms = self.limit.as_millis() as u64,
            "Send timed out"
        );
        ContractError::channel_send(
            self.inner.name(),
            recipient_id,
            kind,
            format!("timed out after {}ms", self.limit.as_millis()),
        )
    }
}

impl<C: ChannelAdapter> ChannelAdapter for TimeoutChannel<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn send_text(&mut self, recipient_id: &str, text: &str) -> Result<(), ContractError> {
        match tokio::time::timeout(self.limit, self.inner.send_text(recipient_id, text)).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(recipient_id, PayloadKind::Text)),
        }
    }

    async fn send_image(
        &mut self,
        recipient_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), ContractError> {
        match tokio::time::timeout(
            self.limit,
            self.inner.send_image(recipient_id, path, caption),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(recipient_id, PayloadKind::Image)),
        }
    }

    async fn send_video(
        &mut self,
        recipient_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), ContractError> {
        match tokio::time::timeout(
            self.limit,
            self.inner.send_video(recipient_id, path, caption),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(recipient_id, PayloadKind::Video)),
        }
    }

    async fn send_audio(&mut self, recipient_id: &str, path: &Path) -> Result<(), ContractError> {
        match tokio::time::timeout(self.limit, self.inner.send_audio(recipient_id, path)).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(recipient_id, PayloadKind::Audio)),
        }
    }

    async fn send_file(
        &mut self,
        recipient_id: &str,
        path: &Path,
        filename: &str,
        caption: &str,
    ) -> Result<(), ContractError> {
        match tokio::time::timeout(
            self.limit,
            self.inner.send_file(recipient_id, path, filename, caption),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(recipient_id, PayloadKind::File)),
        }
    }
}
