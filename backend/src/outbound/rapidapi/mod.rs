//! Conversion service outbound adapter.
//!
//! Thin HTTP implementation of the `ConversionSource` port for the RapidAPI
//! hosted YouTube MP3 service.

mod dto;
mod http_source;

pub use http_source::{
    DEFAULT_CONVERSION_ENDPOINT, RAPIDAPI_HOST_HEADER, RAPIDAPI_KEY_HEADER, RapidApiSettings,
    RapidApiSetupError, RapidApiSource,
};
