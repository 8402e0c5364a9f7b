//! `POST /convert-mp3`: the authenticated conversion handler.
//!
//! The handler is a thin adapter. It reads the `videoID` form field, hands
//! it to the [`ConversionCommand`](crate::domain::ports::ConversionCommand)
//! port, and renders whatever classified outcome comes back. Every outcome,
//! including failures, is a `200` page.

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::Deserialize;

use super::render::{IndexPage, respond};
use super::session::CurrentUser;
use super::state::HttpState;

/// Form submitted by the converter page.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertForm {
    /// Raw user input: a bare id or any URL containing one.
    #[serde(rename = "videoID", default)]
    pub video_id: Option<String>,
}

/// Convert the submitted video and render the outcome.
///
/// A body that is not a urlencoded form is treated like a missing field.
#[post("/convert-mp3")]
pub async fn convert_mp3(
    user: CurrentUser,
    state: web::Data<HttpState>,
    req: HttpRequest,
    form: Option<web::Form<ConvertForm>>,
) -> HttpResponse {
    let raw_input = form.and_then(|form| form.into_inner().video_id);
    let result = state.conversion.convert(raw_input.as_deref()).await;
    respond(&req, &IndexPage::from_result(user.into_inner(), result))
}
