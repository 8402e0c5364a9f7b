//! YouTube to MP3 conversion proxy behind Google sign-in.
//!
//! The crate follows a hexagonal layout:
//! - [`domain`]: identifier normalisation, the conversion use-case and ports.
//! - [`outbound`]: reqwest adapters for the conversion API and Google OAuth.
//! - [`inbound`]: Actix handlers, sessions and page rendering.
//! - [`config`]: startup configuration read from the environment.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
