//! Google OAuth 2.0 identity provider.
//!
//! The `oauth2` client builds the consent URL with a CSRF state and a PKCE
//! challenge, then exchanges the callback code for an access token. The
//! OpenID userinfo document is read with reqwest. Tokens are used once and
//! never stored.

use async_trait::async_trait;
use oauth2::basic::{BasicClient, BasicRequestTokenError};
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    EndpointSet, HttpClientError, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl,
    RequestTokenError, Scope, TokenResponse, TokenUrl,
};
use reqwest::{Client, StatusCode, Url, redirect};

use super::dto::UserInfoDto;
use crate::domain::AuthenticatedUser;
use crate::domain::ports::{
    IdentityProvider, IdentityProviderError, PendingSignIn, SignInRedirect,
};

/// Google consent screen.
pub const GOOGLE_AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Google token exchange endpoint.
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
/// Google OpenID Connect userinfo endpoint.
pub const GOOGLE_USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";
/// Scopes requested from Google.
pub const GOOGLE_SCOPES: [&str; 2] = ["profile", "email"];

type GoogleOAuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// OAuth client registration and endpoints.
#[derive(Clone)]
pub struct GoogleOAuthSettings {
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Redirect URI registered with Google; must route to the callback handler.
    pub callback_url: Url,
    /// Consent screen URL.
    pub authorize_endpoint: Url,
    /// Token exchange URL.
    pub token_endpoint: Url,
    /// Userinfo URL.
    pub userinfo_endpoint: Url,
}

impl GoogleOAuthSettings {
    /// Settings targeting Google's public endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] only if the built-in endpoint constants are
    /// malformed.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        callback_url: Url,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            callback_url,
            authorize_endpoint: Url::parse(GOOGLE_AUTHORIZE_ENDPOINT)?,
            token_endpoint: Url::parse(GOOGLE_TOKEN_ENDPOINT)?,
            userinfo_endpoint: Url::parse(GOOGLE_USERINFO_ENDPOINT)?,
        })
    }
}

impl std::fmt::Debug for GoogleOAuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("callback_url", &self.callback_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Identity provider talking to Google over HTTPS.
pub struct GoogleIdentityProvider {
    oauth: GoogleOAuthClient,
    http: Client,
    userinfo_endpoint: Url,
}

impl GoogleIdentityProvider {
    /// Build a provider for the given client registration.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: &GoogleOAuthSettings) -> Result<Self, reqwest::Error> {
        // The token endpoint must not be allowed to redirect the exchange.
        let http = Client::builder().redirect(redirect::Policy::none()).build()?;
        let oauth = BasicClient::new(ClientId::new(settings.client_id.clone()))
            .set_client_secret(ClientSecret::new(settings.client_secret.clone()))
            .set_auth_type(AuthType::RequestBody)
            .set_auth_uri(AuthUrl::from_url(settings.authorize_endpoint.clone()))
            .set_token_uri(TokenUrl::from_url(settings.token_endpoint.clone()))
            .set_redirect_uri(RedirectUrl::from_url(settings.callback_url.clone()));
        Ok(Self {
            oauth,
            http,
            userinfo_endpoint: settings.userinfo_endpoint.clone(),
        })
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<String, IdentityProviderError> {
        let token = self
            .oauth
            .exchange_code(AuthorizationCode::new(code.to_owned()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_owned()))
            .request_async(&self.http)
            .await
            .map_err(map_token_error)?;
        Ok(token.access_token().secret().clone())
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserInfoDto, IdentityProviderError> {
        let response = self
            .http
            .get(self.userinfo_endpoint.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status.is_client_error() {
            return Err(IdentityProviderError::profile(status_message(
                status,
                body.as_ref(),
            )));
        }
        if !status.is_success() {
            return Err(IdentityProviderError::transport(status_message(
                status,
                body.as_ref(),
            )));
        }
        serde_json::from_slice(body.as_ref()).map_err(|error| {
            IdentityProviderError::profile(format!("invalid JSON payload: {error}"))
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn begin_sign_in(&self) -> SignInRedirect {
        let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        let (url, csrf_state) = self
            .oauth
            .authorize_url(CsrfToken::new_random)
            .add_scopes(GOOGLE_SCOPES.map(|scope| Scope::new(scope.to_owned())))
            .set_pkce_challenge(challenge)
            .url();
        SignInRedirect {
            url,
            pending: PendingSignIn {
                state: csrf_state.secret().clone(),
                pkce_verifier: verifier.secret().clone(),
            },
        }
    }

    async fn authenticate(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<AuthenticatedUser, IdentityProviderError> {
        let access_token = self.exchange_code(code, pkce_verifier).await?;
        let profile = self.fetch_profile(&access_token).await?;
        profile
            .into_domain_user()
            .map_err(|error| IdentityProviderError::profile(error.to_string()))
    }
}

/// Provider rejections and unreadable token replies are exchange failures;
/// anything that never produced a usable reply is a transport failure.
fn map_token_error(
    error: BasicRequestTokenError<HttpClientError<reqwest::Error>>,
) -> IdentityProviderError {
    match error {
        RequestTokenError::ServerResponse(response) => {
            IdentityProviderError::exchange(response.to_string())
        }
        RequestTokenError::Parse(error, body) => IdentityProviderError::exchange(format!(
            "{error}; body: {}",
            String::from_utf8_lossy(&body).chars().take(160).collect::<String>()
        )),
        RequestTokenError::Request(error) => IdentityProviderError::transport(error.to_string()),
        RequestTokenError::Other(message) => IdentityProviderError::transport(message),
    }
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!(
            "status {}: {}",
            status.as_u16(),
            text.chars().take(160).collect::<String>()
        )
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::transport(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VERIFIER: &str = "the-verifier-0123456789-0123456789-0123456789";

    fn settings(server: &MockServer) -> GoogleOAuthSettings {
        let base = server.uri();
        GoogleOAuthSettings {
            client_id: "client-id".to_owned(),
            client_secret: "client-secret".to_owned(),
            callback_url: Url::parse("http://localhost:3000/auth/google/callback")
                .expect("callback url"),
            authorize_endpoint: Url::parse(GOOGLE_AUTHORIZE_ENDPOINT).expect("authorize url"),
            token_endpoint: Url::parse(&format!("{base}/token")).expect("token url"),
            userinfo_endpoint: Url::parse(&format!("{base}/userinfo")).expect("userinfo url"),
        }
    }

    async fn mount_token(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("code=the-code"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("client_secret=client-secret"))
            .and(body_string_contains(format!("code_verifier={VERIFIER}")))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn bearer_token() -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_json(json!({ "access_token": "tok", "token_type": "Bearer" }))
    }

    #[tokio::test]
    async fn consent_url_carries_client_state_and_pkce_challenge() {
        let server = MockServer::start().await;
        let provider = GoogleIdentityProvider::new(&settings(&server)).expect("provider");
        let redirect = provider.begin_sign_in();

        assert!(redirect.url.as_str().starts_with(GOOGLE_AUTHORIZE_ENDPOINT));
        let pairs: Vec<(String, String)> = redirect.url.query_pairs().into_owned().collect();
        let has = |name: &str, value: &str| pairs.contains(&(name.to_owned(), value.to_owned()));
        assert!(has("response_type", "code"));
        assert!(has("client_id", "client-id"));
        assert!(has("scope", "profile email"));
        assert!(has("state", &redirect.pending.state));
        assert!(has("code_challenge_method", "S256"));
        assert!(has(
            "redirect_uri",
            "http://localhost:3000/auth/google/callback"
        ));
        assert!(pairs.iter().any(|(name, _)| name == "code_challenge"));
        assert!(
            !pairs
                .iter()
                .any(|(_, value)| value == &redirect.pending.pkce_verifier)
        );
    }

    #[tokio::test]
    async fn every_sign_in_gets_fresh_secrets() {
        let server = MockServer::start().await;
        let provider = GoogleIdentityProvider::new(&settings(&server)).expect("provider");
        let first = provider.begin_sign_in().pending;
        let second = provider.begin_sign_in().pending;

        assert_ne!(first.state, second.state);
        assert_ne!(first.pkce_verifier, second.pkce_verifier);
    }

    #[tokio::test]
    async fn exchanges_code_with_verifier_and_reads_profile() {
        let server = MockServer::start().await;
        mount_token(&server, bearer_token()).await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sub": "1234",
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "picture": "https://example.com/ada.png",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GoogleIdentityProvider::new(&settings(&server)).expect("provider");
        let user = provider
            .authenticate("the-code", VERIFIER)
            .await
            .expect("sign-in succeeds");

        assert_eq!(user.id(), "1234");
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert_eq!(user.email(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn rejected_code_is_an_exchange_error() {
        let server = MockServer::start().await;
        mount_token(
            &server,
            ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })),
        )
        .await;

        let provider = GoogleIdentityProvider::new(&settings(&server)).expect("provider");
        let error = provider
            .authenticate("the-code", VERIFIER)
            .await
            .expect_err("must fail");

        assert!(matches!(error, IdentityProviderError::Exchange { .. }));
        assert!(error.message().contains("invalid_grant"));
    }

    #[tokio::test]
    async fn server_errors_are_transport_errors() {
        let server = MockServer::start().await;
        mount_token(&server, ResponseTemplate::new(503)).await;

        let provider = GoogleIdentityProvider::new(&settings(&server)).expect("provider");
        let error = provider
            .authenticate("the-code", VERIFIER)
            .await
            .expect_err("must fail");

        assert!(matches!(error, IdentityProviderError::Transport { .. }));
    }

    #[tokio::test]
    async fn profile_without_name_or_email_is_rejected() {
        let server = MockServer::start().await;
        mount_token(&server, bearer_token()).await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sub": "1234" })))
            .mount(&server)
            .await;

        let provider = GoogleIdentityProvider::new(&settings(&server)).expect("provider");
        let error = provider
            .authenticate("the-code", VERIFIER)
            .await
            .expect_err("must fail");

        assert!(matches!(error, IdentityProviderError::Profile { .. }));
    }

    #[tokio::test]
    async fn unauthorised_userinfo_is_a_profile_error() {
        let server = MockServer::start().await;
        mount_token(&server, bearer_token()).await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = GoogleIdentityProvider::new(&settings(&server)).expect("provider");
        let error = provider
            .authenticate("the-code", VERIFIER)
            .await
            .expect_err("must fail");

        assert!(matches!(error, IdentityProviderError::Profile { .. }));
        assert!(error.message().contains("status 401"));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let settings = GoogleOAuthSettings::new(
            "id",
            "super-secret",
            Url::parse("http://localhost/cb").expect("url"),
        )
        .expect("settings");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
