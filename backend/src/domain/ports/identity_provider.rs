//! Driven port for the OAuth identity provider.
//!
//! Inbound handlers own the redirect and session mechanics; the provider
//! builds the authorisation redirect and turns a callback code into a
//! profile.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::AuthenticatedUser;

define_port_error! {
    /// Errors surfaced while completing a sign-in with the provider.
    pub enum IdentityProviderError {
        /// The provider could not be reached or replied with a server error.
        Transport => "identity provider transport failed: {message}",
        /// The authorisation code was rejected by the token endpoint.
        Exchange => "authorisation code exchange failed: {message}",
        /// The profile returned by the provider was unusable.
        Profile => "identity profile rejected: {message}",
    }
}

/// Secrets kept in the session between the redirect and the callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSignIn {
    /// Anti-forgery `state` the provider must echo back.
    pub state: String,
    /// PKCE code verifier matching the challenge sent to the provider.
    pub pkce_verifier: String,
}

/// Where to send the browser, plus what to remember until it returns.
#[derive(Debug, Clone)]
pub struct SignInRedirect {
    /// Consent screen URL.
    pub url: Url,
    /// Secrets the callback needs to finish the sign-in.
    pub pending: PendingSignIn,
}

/// Port for signing users in through an external OAuth provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Start a sign-in with a fresh `state` and PKCE verifier.
    fn begin_sign_in(&self) -> SignInRedirect;

    /// Exchange a callback `code` for the signed-in user's profile.
    ///
    /// `pkce_verifier` is the one returned by [`Self::begin_sign_in`].
    ///
    /// # Errors
    ///
    /// Returns [`IdentityProviderError`] when the exchange or profile lookup
    /// fails.
    async fn authenticate(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<AuthenticatedUser, IdentityProviderError>;
}

/// Fixture provider that signs everyone in as the same user.
///
/// The authorisation URL points at the local callback so a browser can walk
/// the whole flow without a real provider.
#[derive(Debug, Clone)]
pub struct FixtureIdentityProvider {
    callback_url: Url,
}

impl FixtureIdentityProvider {
    /// Display name of the fixture user.
    pub const DISPLAY_NAME: &'static str = "Ada Lovelace";
    /// Code accepted by [`IdentityProvider::authenticate`].
    pub const CODE: &'static str = "fixture-code";
    /// Verifier handed out by [`IdentityProvider::begin_sign_in`].
    pub const PKCE_VERIFIER: &'static str = "fixture-verifier";

    /// Build a fixture redirecting straight back to `callback_url`.
    #[must_use]
    pub fn new(callback_url: Url) -> Self {
        Self { callback_url }
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    fn begin_sign_in(&self) -> SignInRedirect {
        let state = Uuid::new_v4().simple().to_string();
        let mut url = self.callback_url.clone();
        url.query_pairs_mut()
            .append_pair("code", Self::CODE)
            .append_pair("state", &state);
        SignInRedirect {
            url,
            pending: PendingSignIn {
                state,
                pkce_verifier: Self::PKCE_VERIFIER.to_owned(),
            },
        }
    }

    async fn authenticate(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<AuthenticatedUser, IdentityProviderError> {
        if code != Self::CODE {
            return Err(IdentityProviderError::exchange("unknown fixture code"));
        }
        if pkce_verifier != Self::PKCE_VERIFIER {
            return Err(IdentityProviderError::exchange("pkce verifier mismatch"));
        }
        AuthenticatedUser::try_new(
            "fixture-user",
            Self::DISPLAY_NAME,
            Some("ada@example.com".to_owned()),
            None,
        )
        .map_err(|error| IdentityProviderError::profile(error.to_string()))
    }
}
