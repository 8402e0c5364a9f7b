//! Driving port for the conversion use-case.
//!
//! The HTTP adapter hands over the raw form value and receives a classified
//! [`ConversionResult`]; it never sees transport errors.

use async_trait::async_trait;

use crate::domain::{ConversionFailure, ConversionResult, ConvertedTrack, VideoId};

/// Use-case port: normalise user input and convert the referenced video.
#[async_trait]
pub trait ConversionCommand: Send + Sync {
    /// Run the conversion pipeline for one submitted form value.
    ///
    /// `raw_input` is `None` when the form field was missing altogether.
    /// Every failure is folded into [`ConversionResult::Failure`].
    async fn convert(&self, raw_input: Option<&str>) -> ConversionResult;
}

/// Fixture command that converts any well-formed input without I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureConversionCommand;

#[async_trait]
impl ConversionCommand for FixtureConversionCommand {
    async fn convert(&self, raw_input: Option<&str>) -> ConversionResult {
        match raw_input.map(VideoId::normalize) {
            Some(Ok(id)) => ConversionResult::Success(ConvertedTrack {
                title: format!("Fixture track {id}"),
                link: format!("https://downloads.invalid/{id}.mp3"),
            }),
            _ => ConversionResult::Failure(ConversionFailure::InvalidIdentifier),
        }
    }
}
