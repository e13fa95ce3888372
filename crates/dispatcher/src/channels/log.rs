//! LogChannel - logs every send via tracing, delivers nothing

use std::path::Path;

use contracts::{ChannelAdapter, ContractError};
use tracing::{info, instrument};

/// Dry-run transport
pub struct LogChannel {
    name: String,
    sends: u64,
}

impl LogChannel {
    /// Create a new LogChannel with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sends: 0,
        }
    }

    /// Sends logged so far
    pub fn sends(&self) -> u64 {
        self.sends
    }

    fn log_send(&mut self, recipient_id: &str, kind: &str, body: &str) {
        self.sends += 1;
        info!(
            channel = %self.name,
            recipient = %recipient_id,
            kind,
            body,
            "Send (dry run)"
        );
    }
}

impl ChannelAdapter for LogChannel {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_channel_send_text", skip(self, text))]
    async fn send_text(&mut self, recipient_id: &str, text: &str) -> Result<(), ContractError> {
        self.log_send(recipient_id, "text", text);
        Ok(())
    }

    async fn send_image(
        &mut self,
        recipient_id: &str,
        path: &Path,
        _caption: &str,
    ) -> Result<(), ContractError> {
        self.log_send(recipient_id, "image", &path.display().to_string());
        Ok(())
    }

    async fn send_video(
        &mut self,
        recipient_id: &str,
        path: &Path,
        _caption: &str,
    ) -> Result<(), ContractError> {
        self.log_send(recipient_id, "video", &path.display().to_string());
        Ok(())
    }

    async fn send_audio(&mut self, recipient_id: &str, path: &Path) -> Result<(), ContractError> {
        self.log_send(recipient_id, "audio", &path.display().to_string());
        Ok(())
    }

    async fn send_file(
        &mut self,
        recipient_id: &str,
        _path: &Path,
        filename: &str,
        _caption: &str,
    ) -> Result<(), ContractError> {
        self.log_send(recipient_id, "file", filename);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_channel_send() {
        let mut channel = LogChannel::new("dry_run");
        assert!(channel.send_text("57300@s.whatsapp.net", "hi").await.is_ok());
        assert!(channel
            .send_file("57300@s.whatsapp.net", Path::new("/tmp/a.pdf"), "a.pdf", "")
            .await
            .is_ok());
        assert_eq!(channel.sends(), 2);
    }

    #[tokio::test]
    async fn test_log_channel_name() {
        let channel = LogChannel::new("my_logger");
        assert_eq!(channel.name(), "my_logger");
    }
}
