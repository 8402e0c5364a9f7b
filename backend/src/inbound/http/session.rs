//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving the signed-in
//! user, plus the [`CurrentUser`] extractor that gates protected routes.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::PendingSignIn;
use crate::domain::{AuthenticatedUser, Error};

pub(crate) const USER_KEY: &str = "user";
pub(crate) const PENDING_SIGN_IN_KEY: &str = "pending_sign_in";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in user's profile in the session cookie.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the profile cannot be serialised.
    pub fn persist_user(&self, user: &AuthenticatedUser) -> Result<(), Error> {
        self.0
            .insert(USER_KEY, user)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the signed-in user from the session, if present.
    ///
    /// A profile that no longer deserialises is dropped from the session and
    /// treated as signed out.
    pub fn user(&self) -> Option<AuthenticatedUser> {
        match self.0.get::<AuthenticatedUser>(USER_KEY) {
            Ok(user) => user,
            Err(error) => {
                warn!(%error, "discarding unreadable user in session cookie");
                self.0.remove(USER_KEY);
                None
            }
        }
    }

    /// Require a signed-in user or fail with [`Error::unauthorized`].
    ///
    /// # Errors
    ///
    /// Returns an unauthorised error when no user is signed in.
    pub fn require_user(&self) -> Result<AuthenticatedUser, Error> {
        self.user()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Remember the secrets of a sign-in in progress.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the session cannot be written.
    pub fn store_pending_sign_in(&self, pending: &PendingSignIn) -> Result<(), Error> {
        self.0
            .insert(PENDING_SIGN_IN_KEY, pending)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Remove and return the sign-in in progress.
    ///
    /// Each pending sign-in is accepted at most once.
    pub fn take_pending_sign_in(&self) -> Option<PendingSignIn> {
        match self.0.remove_as::<PendingSignIn>(PENDING_SIGN_IN_KEY) {
            Some(Ok(pending)) => Some(pending),
            Some(Err(raw)) => {
                warn!(raw_len = raw.len(), "discarding malformed pending sign-in");
                None
            }
            None => None,
        }
    }

    /// Rotate the session identifier, keeping its contents.
    pub fn renew(&self) {
        self.0.renew();
    }

    /// Drop everything stored in the session and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Extractor gating a handler on a signed-in user.
///
/// Extraction fails with [`Error::unauthorized`], which the HTTP error
/// mapping turns into a redirect to the login page, so the handler body never
/// runs for anonymous callers.
#[derive(Debug, Clone)]
pub struct CurrentUser(AuthenticatedUser);

impl CurrentUser {
    /// Unwrap the signed-in profile.
    #[must_use]
    pub fn into_inner(self) -> AuthenticatedUser {
        self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = fut.await?;
            let user = session.require_user()?;
            Ok(CurrentUser(user))
        })
    }
}
