//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, web};
use url::Url;

use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::ports::{ConversionCommand, FixtureIdentityProvider};
use crate::domain::{AuthenticatedUser, Error};

/// Path of the helper route that signs the fixture user in.
pub const TEST_LOGIN_PATH: &str = "/test/login";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Profile used by handler tests.
pub fn fixture_user() -> AuthenticatedUser {
    AuthenticatedUser::try_new(
        "fixture-user",
        FixtureIdentityProvider::DISPLAY_NAME,
        Some("ada@example.com".to_owned()),
        None,
    )
    .expect("fixture user is valid")
}

/// HTTP state wired to `conversion` and the fixture identity provider.
pub fn test_state(conversion: Arc<dyn ConversionCommand>) -> web::Data<HttpState> {
    let callback =
        Url::parse("http://localhost:3000/auth/google/callback").expect("callback url");
    web::Data::new(HttpState::new(
        conversion,
        Arc::new(FixtureIdentityProvider::new(callback)),
    ))
}

/// App with the test session middleware, `state`, and every public route,
/// plus [`TEST_LOGIN_PATH`] for signing in without the OAuth dance.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(test_session_middleware())
        .configure(super::configure)
        .route(
            TEST_LOGIN_PATH,
            web::get().to(|session: SessionContext| async move {
                session.persist_user(&fixture_user())?;
                Ok::<_, Error>(HttpResponse::Ok().finish())
            }),
        )
}
