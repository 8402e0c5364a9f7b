//! Google OAuth outbound adapter.
//!
//! `oauth2`-backed implementation of the `IdentityProvider` port.

mod dto;
mod http_provider;

pub use http_provider::{
    GOOGLE_AUTHORIZE_ENDPOINT, GOOGLE_SCOPES, GOOGLE_TOKEN_ENDPOINT, GOOGLE_USERINFO_ENDPOINT,
    GoogleIdentityProvider, GoogleOAuthSettings,
};
