//! YouTube video identifier extraction.
//!
//! Users paste either a bare identifier or a full/short YouTube URL. The
//! normaliser pulls the 11-character identifier out of the first `v=` query
//! parameter or `/<id>` path segment it finds, and otherwise forwards the
//! trimmed input unchanged as a raw identifier.

use std::sync::OnceLock;

use regex::Regex;

/// Length of a canonical YouTube video identifier.
pub const VIDEO_ID_LEN: usize = 11;

static EMBEDDED_ID_RE: OnceLock<Regex> = OnceLock::new();

fn embedded_id_regex() -> &'static Regex {
    EMBEDDED_ID_RE.get_or_init(|| {
        let pattern = r"(?:v=|/)([0-9A-Za-z_-]{11})";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("video id regex failed to compile: {error}"))
    })
}

/// Validation errors raised while normalising user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VideoIdError {
    /// Input was missing or blank after trimming.
    #[error("video identifier must not be empty")]
    Empty,
}

/// Normalised video identifier forwarded to the conversion service.
///
/// ## Invariants
/// - Never empty and never carries surrounding whitespace.
/// - When the input contained a YouTube URL, holds only the extracted
///   identifier, never the URL.
///
/// Inputs that do not look like a URL are kept verbatim; use
/// [`VideoId::is_canonical`] to check the 11-character shape.
///
/// # Examples
/// ```
/// use yt2mp3::domain::VideoId;
///
/// let id = VideoId::normalize("https://youtu.be/dQw4w9WgXcQ").expect("valid input");
/// assert_eq!(id.as_ref(), "dQw4w9WgXcQ");
/// assert!(id.is_canonical());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Extract the video identifier from a raw identifier or YouTube URL.
    ///
    /// # Errors
    ///
    /// Returns [`VideoIdError::Empty`] when the input is blank.
    pub fn normalize(input: &str) -> Result<Self, VideoIdError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VideoIdError::Empty);
        }
        let id = embedded_id_regex()
            .captures(trimmed)
            .and_then(|captures| captures.get(1))
            .map_or(trimmed, |found| found.as_str());
        Ok(Self(id.to_owned()))
    }

    /// Whether the identifier has the canonical 11-character YouTube shape.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.0.len() == VIDEO_ID_LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
