//! Outbound adapters implementing domain ports for external services.
//!
//! - **rapidapi**: the YouTube MP3 conversion API (`ConversionSource`)
//! - **google**: Google OAuth 2.0 sign-in (`IdentityProvider`)
//!
//! Adapters translate between domain types and wire formats. They contain no
//! business rules; classification happens in the domain.

pub mod google;
pub mod rapidapi;
