//! DeliveryJob - JobNormalizer output
//!
//! One recipient's fully resolved set of payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Attachment kinds carried by a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    File,
}

impl MediaKind {
    /// Dispatch order for attachments
    pub const ALL: [MediaKind; 4] = [Self::Image, Self::Video, Self::Audio, Self::File];

    /// Source column holding the attachment path
    pub fn column(self) -> &'static str {
        match self {
            Self::Image => crate::columns::IMAGE_PATH,
            Self::Video => crate::columns::VIDEO_PATH,
            Self::Audio => crate::columns::AUDIO_PATH,
            Self::File => crate::columns::FILE_PATH,
        }
    }
}

/// Every kind of payload a job can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Image,
    Video,
    Audio,
    File,
    Text,
    Url,
}

impl From<MediaKind> for PayloadKind {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => Self::Image,
            MediaKind::Video => Self::Video,
            MediaKind::Audio => Self::Audio,
            MediaKind::File => Self::File,
        }
    }
}

impl PayloadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
            Self::Text => "text",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized delivery intent for one recipient
///
/// Built only by the normalizer. Attachment paths are resolved but their
/// existence is checked again when the job is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryJob {
    /// Canonical channel address
    pub recipient_id: String,

    /// Standalone text body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Scheme-normalized link, sent as its own message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Attachment kind -> resolved path
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub media: BTreeMap<MediaKind, PathBuf>,
}

impl DeliveryJob {
    /// Create a job with no payloads
    pub fn new(recipient_id: impl Into<String>) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            text: None,
            url: None,
            media: BTreeMap::new(),
        }
    }

    /// Attachment path for a kind, if any
    pub fn media_path(&self, kind: MediaKind) -> Option<&Path> {
        self.media.get(&kind).map(PathBuf::as_path)
    }

    /// Payload kinds populated on this job, in dispatch order
    pub fn payload_kinds(&self) -> Vec<PayloadKind> {
        let mut kinds: Vec<PayloadKind> = MediaKind::ALL
            .iter()
            .filter(|kind| self.media.contains_key(kind))
            .map(|&kind| kind.into())
            .collect();
        if self.text.is_some() {
            kinds.push(PayloadKind::Text);
        }
        if self.url.is_some() {
            kinds.push(PayloadKind::Url);
        }
        kinds
    }

    /// True when the job carries nothing to send
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.url.is_none() && self.media.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_kinds_follow_dispatch_order() {
        let mut job = DeliveryJob::new("573001112222@s.whatsapp.net");
        job.url = Some("https://example.com".to_string());
        job.text = Some("hi".to_string());
        job.media.insert(MediaKind::File, PathBuf::from("/tmp/a.pdf"));
        job.media.insert(MediaKind::Image, PathBuf::from("/tmp/a.jpg"));

        assert_eq!(
            job.payload_kinds(),
            vec![
                PayloadKind::Image,
                PayloadKind::File,
                PayloadKind::Text,
                PayloadKind::Url
            ]
        );
    }

    #[test]
    fn test_empty_job() {
        let job = DeliveryJob::new("57300@s.whatsapp.net");
        assert!(job.is_empty());
        assert!(job.payload_kinds().is_empty());
        assert_eq!(job.media_path(MediaKind::Audio), None);
    }

    #[test]
    fn test_payload_kind_serde_names() {
        let json = serde_json::to_string(&PayloadKind::Url).unwrap();
        assert_eq!(json, "\"url\"");
        assert_eq!(PayloadKind::from(MediaKind::Video).to_string(), "video");
    }
}
