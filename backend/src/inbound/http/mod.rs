//! HTTP inbound adapter: pages, the conversion form and Google sign-in.

use actix_web::web;

pub mod auth;
pub mod convert;
pub mod error;
pub mod health;
pub mod pages;
pub mod render;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use crate::domain::ApiResult;

/// Where anonymous callers are sent.
pub const LOGIN_PATH: &str = "/login";

/// Register every session-backed route.
///
/// The caller must provide [`state::HttpState`] as app data and wrap the app
/// in a session middleware. Health checks are registered separately because
/// they do not use sessions.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::index)
        .service(pages::login_page)
        .service(convert::convert_mp3)
        .service(auth::google_login)
        .service(auth::google_callback)
        .service(auth::logout);
}
