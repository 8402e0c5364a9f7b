//! Page handlers: the gated index and the public login page.

use actix_web::http::header::{CACHE_CONTROL, ContentType};
use actix_web::{HttpRequest, HttpResponse, get};

use super::render::{IndexPage, login_html, respond};
use super::session::CurrentUser;

/// Render the converter form for the signed-in user.
#[get("/")]
pub async fn index(user: CurrentUser, req: HttpRequest) -> HttpResponse {
    respond(&req, &IndexPage::initial(user.into_inner()))
}

/// Render the sign-in page.
#[get("/login")]
pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((CACHE_CONTROL, "no-store"))
        .content_type(ContentType::html())
        .body(login_html())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::test;
    use serde_json::{Value, json};

    use crate::domain::ports::FixtureConversionCommand;
    use crate::inbound::http::LOGIN_PATH;
    use crate::inbound::http::test_utils::{TEST_LOGIN_PATH, test_app, test_state};

    #[actix_web::test]
    async fn index_requires_login() {
        let app = test::init_service(test_app(test_state(Arc::new(FixtureConversionCommand)))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some(LOGIN_PATH.as_bytes())
        );
    }

    #[actix_web::test]
    async fn index_renders_initial_payload_for_signed_in_user() {
        let app = test::init_service(test_app(test_state(Arc::new(FixtureConversionCommand)))).await;
        let login =
            test::call_service(&app, test::TestRequest::get().uri(TEST_LOGIN_PATH).to_request())
                .await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let req = test::TestRequest::get()
            .uri("/")
            .cookie(cookie)
            .insert_header((header::ACCEPT, "application/json"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user"]["displayName"], json!("Ada Lovelace"));
        assert_eq!(body.get("success"), None);
    }

    #[actix_web::test]
    async fn login_page_is_public() {
        let app = test::init_service(test_app(test_state(Arc::new(FixtureConversionCommand)))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri(LOGIN_PATH).to_request())
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).expect("utf8 body");
        assert!(body.contains(r#"href="/auth/google""#));
    }
}
