//! Conversion pipeline: normalise, call upstream once, classify.
//!
//! [`ConversionService`] implements the [`ConversionCommand`] driving port on
//! top of any [`ConversionSource`]. It owns the classification rules so
//! adapters stay thin and the HTTP layer only maps outcomes to pages.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use super::ports::{ConversionCommand, ConversionResponse, ConversionSource};
use super::{TraceId, VideoId};

/// Message rendered when the input holds no usable identifier.
pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid YouTube video ID or URL";
/// Message rendered when the conversion service rejects the identifier.
pub const UPSTREAM_REJECTED_MESSAGE: &str = "Conversion failed. Invalid YouTube ID.";
/// Message rendered when the conversion service cannot be reached.
pub const TRANSPORT_ERROR_MESSAGE: &str = "Server error while converting YouTube video.";

/// A finished conversion ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedTrack {
    /// Track title reported by the conversion service.
    pub title: String,
    /// Download link for the converted file.
    pub link: String,
}

/// Why a conversion did not produce a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionFailure {
    /// The input was blank or held no usable identifier.
    InvalidIdentifier,
    /// The conversion service answered with a non-ok status.
    UpstreamRejected,
    /// The conversion service could not be reached or replied with garbage.
    TransportError,
}

impl ConversionFailure {
    /// User-facing message for this failure.
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            Self::InvalidIdentifier => INVALID_INPUT_MESSAGE,
            Self::UpstreamRejected => UPSTREAM_REJECTED_MESSAGE,
            Self::TransportError => TRANSPORT_ERROR_MESSAGE,
        }
    }
}

/// Outcome of one conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    /// The video was converted.
    Success(ConvertedTrack),
    /// The video was not converted.
    Failure(ConversionFailure),
}

/// Conversion use-case backed by a [`ConversionSource`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use yt2mp3::domain::ConversionService;
/// use yt2mp3::domain::ports::FixtureConversionSource;
///
/// let service = ConversionService::new(Arc::new(FixtureConversionSource));
/// # let _ = service;
/// ```
#[derive(Clone)]
pub struct ConversionService {
    source: Arc<dyn ConversionSource>,
}

impl ConversionService {
    /// Create a service that converts through `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ConversionSource>) -> Self {
        Self { source }
    }

    /// Call the upstream once for an already normalised identifier.
    pub async fn convert_id(&self, video_id: &VideoId) -> ConversionResult {
        if !video_id.is_canonical() {
            warn!(
                video_id = %video_id,
                "forwarding identifier that is not an 11-character YouTube id"
            );
        }
        match self.source.fetch(video_id).await {
            Ok(response) => classify(video_id, response),
            Err(err) => {
                let trace_id = TraceId::current().map(|id| id.to_string());
                error!(
                    error = %err,
                    video_id = %video_id,
                    trace_id = trace_id.as_deref().unwrap_or("-"),
                    "conversion request failed"
                );
                ConversionResult::Failure(ConversionFailure::TransportError)
            }
        }
    }
}

#[async_trait]
impl ConversionCommand for ConversionService {
    async fn convert(&self, raw_input: Option<&str>) -> ConversionResult {
        let Some(raw_input) = raw_input else {
            return ConversionResult::Failure(ConversionFailure::InvalidIdentifier);
        };
        match VideoId::normalize(raw_input) {
            Ok(video_id) => self.convert_id(&video_id).await,
            Err(_) => ConversionResult::Failure(ConversionFailure::InvalidIdentifier),
        }
    }
}

fn classify(video_id: &VideoId, response: ConversionResponse) -> ConversionResult {
    if !response.is_ok() {
        warn!(
            video_id = %video_id,
            status = %response.status,
            upstream_message = response.message.as_deref().unwrap_or(""),
            "conversion rejected upstream"
        );
        return ConversionResult::Failure(ConversionFailure::UpstreamRejected);
    }
    match (response.title, response.link) {
        (Some(title), Some(link)) => ConversionResult::Success(ConvertedTrack { title, link }),
        _ => {
            warn!(
                video_id = %video_id,
                "conversion reported ok without a title and link"
            );
            ConversionResult::Failure(ConversionFailure::UpstreamRejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ConversionSourceError, MockConversionSource};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn response(status: &str, title: Option<&str>, link: Option<&str>) -> ConversionResponse {
        ConversionResponse {
            status: status.to_owned(),
            title: title.map(str::to_owned),
            link: link.map(str::to_owned),
            message: None,
        }
    }

    fn service_returning(
        expected_id: &str,
        reply: Result<ConversionResponse, ConversionSourceError>,
    ) -> ConversionService {
        let mut source = MockConversionSource::new();
        let expected = VideoId::normalize(expected_id).expect("valid id");
        source
            .expect_fetch()
            .with(eq(expected))
            .times(1)
            .return_once(move |_| reply);
        ConversionService::new(Arc::new(source))
    }

    fn service_never_called() -> ConversionService {
        let mut source = MockConversionSource::new();
        source.expect_fetch().times(0);
        ConversionService::new(Arc::new(source))
    }

    #[tokio::test]
    async fn ok_status_yields_track() {
        let service = service_returning(
            "dQw4w9WgXcQ",
            Ok(response("ok", Some("Song"), Some("http://x/y.mp3"))),
        );
        let result = service.convert(Some("dQw4w9WgXcQ")).await;
        assert_eq!(
            result,
            ConversionResult::Success(ConvertedTrack {
                title: "Song".to_owned(),
                link: "http://x/y.mp3".to_owned(),
            })
        );
    }

    #[tokio::test]
    async fn url_input_is_normalised_before_fetch() {
        let service = service_returning(
            "dQw4w9WgXcQ",
            Ok(response("ok", Some("T"), Some("L"))),
        );
        let result = service
            .convert(Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ"))
            .await;
        assert!(matches!(result, ConversionResult::Success(_)));
    }

    #[rstest]
    #[case::fail("fail")]
    #[case::processing("processing")]
    #[case::upper_case("OK")]
    #[case::empty("")]
    #[tokio::test]
    async fn non_ok_status_is_rejected(#[case] status: &str) {
        let service = service_returning("dQw4w9WgXcQ", Ok(response(status, None, None)));
        let result = service.convert(Some("dQw4w9WgXcQ")).await;
        assert_eq!(
            result,
            ConversionResult::Failure(ConversionFailure::UpstreamRejected)
        );
    }

    #[tokio::test]
    async fn ok_without_link_is_rejected() {
        let service = service_returning("dQw4w9WgXcQ", Ok(response("ok", Some("T"), None)));
        let result = service.convert(Some("dQw4w9WgXcQ")).await;
        assert_eq!(
            result,
            ConversionResult::Failure(ConversionFailure::UpstreamRejected)
        );
    }

    #[rstest]
    #[case::transport(ConversionSourceError::transport("connection refused"))]
    #[case::decode(ConversionSourceError::decode("expected value at line 1"))]
    #[tokio::test]
    async fn source_errors_become_transport_failures(#[case] err: ConversionSourceError) {
        let service = service_returning("dQw4w9WgXcQ", Err(err));
        let result = service.convert(Some("dQw4w9WgXcQ")).await;
        assert_eq!(
            result,
            ConversionResult::Failure(ConversionFailure::TransportError)
        );
    }

    #[rstest]
    #[case::missing(None)]
    #[case::empty(Some(""))]
    #[case::whitespace(Some("   "))]
    #[tokio::test]
    async fn blank_input_never_reaches_upstream(#[case] input: Option<&str>) {
        let service = service_never_called();
        let result = service.convert(input).await;
        assert_eq!(
            result,
            ConversionResult::Failure(ConversionFailure::InvalidIdentifier)
        );
    }

    #[rstest]
    #[case(ConversionFailure::InvalidIdentifier, INVALID_INPUT_MESSAGE)]
    #[case(ConversionFailure::UpstreamRejected, UPSTREAM_REJECTED_MESSAGE)]
    #[case(ConversionFailure::TransportError, TRANSPORT_ERROR_MESSAGE)]
    fn failures_map_to_user_messages(#[case] failure: ConversionFailure, #[case] expected: &str) {
        assert_eq!(failure.user_message(), expected);
    }
}
