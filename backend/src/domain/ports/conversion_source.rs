//! Driven port for the remote media-conversion service.
//!
//! The adapter performs the HTTP round trip and decodes the body; the domain
//! decides what the upstream verdict means for the user.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::VideoId;

/// Status value the conversion service reports for a finished conversion.
pub const UPSTREAM_STATUS_OK: &str = "ok";

/// Decoded upstream reply for one conversion request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionResponse {
    /// Upstream status string (`"ok"` on success).
    pub status: String,
    /// Track title, present on success.
    pub title: Option<String>,
    /// Download link, present on success.
    pub link: Option<String>,
    /// Free-form upstream message, usually present on failure.
    pub message: Option<String>,
}

impl ConversionResponse {
    /// Whether the upstream reported a finished conversion.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == UPSTREAM_STATUS_OK
    }
}

define_port_error! {
    /// Errors surfaced while calling the conversion service.
    pub enum ConversionSourceError {
        /// The request could not be sent or the response could not be read.
        Transport => "conversion transport failed: {message}",
        /// The response body was not the expected JSON document.
        Decode => "conversion response decode failed: {message}",
    }
}

/// Port for requesting a conversion of one video.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversionSource: Send + Sync {
    /// Ask the conversion service to convert `video_id`.
    ///
    /// Implementations issue exactly one request and never retry.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionSourceError`] when no parseable reply arrives.
    async fn fetch(&self, video_id: &VideoId) -> Result<ConversionResponse, ConversionSourceError>;
}

/// Fixture implementation answering every request with a fixed track.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureConversionSource;

#[async_trait]
impl ConversionSource for FixtureConversionSource {
    async fn fetch(&self, video_id: &VideoId) -> Result<ConversionResponse, ConversionSourceError> {
        Ok(ConversionResponse {
            status: UPSTREAM_STATUS_OK.to_owned(),
            title: Some(format!("Fixture track {video_id}")),
            link: Some(format!("https://downloads.invalid/{video_id}.mp3")),
            message: None,
        })
    }
}
