//! ChannelAdapter trait - messaging transport interface
//!
//! Session, authentication and pairing belong to the implementation; the
//! scheduler only sees these send operations.

use std::path::Path;

use crate::ContractError;

/// Messaging transport trait
///
/// Every operation may suspend until the channel acknowledges or rejects the
/// send, and every operation may fail.
#[trait_variant::make(ChannelAdapter: Send)]
pub trait LocalChannelAdapter {
    /// Channel name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Send a standalone text message
    async fn send_text(&mut self, recipient_id: &str, text: &str) -> Result<(), ContractError>;

    /// Send an image with caption
    async fn send_image(
        &mut self,
        recipient_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), ContractError>;

    /// Send a video with caption
    async fn send_video(
        &mut self,
        recipient_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), ContractError>;

    /// Send an audio clip
    async fn send_audio(&mut self, recipient_id: &str, path: &Path) -> Result<(), ContractError>;

    /// Send a document under the given file name
    async fn send_file(
        &mut self,
        recipient_id: &str,
        path: &Path,
        filename: &str,
        caption: &str,
    ) -> Result<(), ContractError>;
}
