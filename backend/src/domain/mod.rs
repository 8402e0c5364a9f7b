//! Domain primitives, ports, and the conversion use-case.
//!
//! Purpose: keep the conversion rules independent of Actix and reqwest so
//! they can be exercised with plain unit tests.
//!
//! Public surface:
//! - VideoId (alias to `video_id::VideoId`) — normalised video identifier.
//! - ConversionService — normalise, fetch once, classify.
//! - ConversionResult / ConversionFailure — classified outcome.
//! - AuthenticatedUser — signed-in profile kept in the session.
//! - Error / ErrorCode — transport-agnostic failures outside the pipeline.

pub mod conversion;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod video_id;

pub use self::conversion::{
    ConversionFailure, ConversionResult, ConversionService, ConvertedTrack,
    INVALID_INPUT_MESSAGE, TRANSPORT_ERROR_MESSAGE, UPSTREAM_REJECTED_MESSAGE,
};
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{AuthenticatedUser, UserValidationError};
pub use self::video_id::{VIDEO_ID_LEN, VideoId, VideoIdError};

/// Convenient result alias for fallible domain and handler code.
pub type ApiResult<T> = Result<T, Error>;
