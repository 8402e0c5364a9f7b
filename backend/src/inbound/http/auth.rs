//! Google sign-in routes.
//!
//! `/auth/google` asks the
//! [`IdentityProvider`](crate::domain::ports::IdentityProvider) for a consent
//! redirect, keeps its anti-forgery state and PKCE verifier in the session,
//! and sends the browser on. The callback checks the state, lets the provider
//! turn the code into a profile, and keeps the profile in the session. Every
//! failure ends on the login page.

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use tracing::{info, warn};

use super::LOGIN_PATH;
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::ApiResult;

/// Query parameters Google appends to the callback URL.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    /// Authorisation code to exchange.
    #[serde(default)]
    pub code: Option<String>,
    /// Anti-forgery state echoed back by the provider.
    #[serde(default)]
    pub state: Option<String>,
    /// Set when the user declined consent or the request was invalid.
    #[serde(default)]
    pub error: Option<String>,
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

/// Start the OAuth flow.
#[get("/auth/google")]
pub async fn google_login(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let redirect = state.identity.begin_sign_in();
    session.store_pending_sign_in(&redirect.pending)?;
    Ok(see_other(redirect.url.as_str()))
}

/// Complete the OAuth flow and sign the user in.
#[get("/auth/google/callback")]
pub async fn google_callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    let pending = session.take_pending_sign_in();
    let CallbackQuery {
        code,
        state: returned_state,
        error,
    } = query.into_inner();

    if let Some(error) = error {
        warn!(%error, "identity provider refused sign-in");
        return Ok(see_other(LOGIN_PATH));
    }

    let (code, pending) = match (pending, returned_state, code) {
        (Some(pending), Some(returned), Some(code)) if pending.state == returned => {
            (code, pending)
        }
        _ => {
            warn!("oauth callback rejected: missing code or state mismatch");
            return Ok(see_other(LOGIN_PATH));
        }
    };

    match state
        .identity
        .authenticate(&code, &pending.pkce_verifier)
        .await
    {
        Ok(user) => {
            session.renew();
            session.persist_user(&user)?;
            info!(user_id = user.id(), "user signed in");
            Ok(see_other("/"))
        }
        Err(error) => {
            warn!(%error, "sign-in failed");
            Ok(see_other(LOGIN_PATH))
        }
    }
}

/// Sign the user out.
#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    see_other(LOGIN_PATH)
}
