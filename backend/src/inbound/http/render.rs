//! Page payloads and their HTML rendering.
//!
//! Handlers build an [`IndexPage`] and call [`respond`]. Browsers get HTML;
//! clients sending `Accept: application/json` get the payload itself, which
//! keeps the rendered contract observable in tests.

use actix_web::http::StatusCode;
use actix_web::http::header::{ACCEPT, CACHE_CONTROL, ContentType};
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::domain::{AuthenticatedUser, ConversionResult};

/// Data handed to the index view.
///
/// Serialises to `{user}` on the initial render,
/// `{user, success: true, song_title, song_link}` after a conversion and
/// `{user, success: false, message}` after a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexPage {
    /// Signed-in user shown in the header.
    pub user: AuthenticatedUser,
    /// `None` until a conversion has been attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Failure message shown to the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Title of the converted track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_title: Option<String>,
    /// Download link of the converted track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_link: Option<String>,
}

impl IndexPage {
    /// Index before any conversion was attempted.
    #[must_use]
    pub fn initial(user: AuthenticatedUser) -> Self {
        Self {
            user,
            success: None,
            message: None,
            song_title: None,
            song_link: None,
        }
    }

    /// Index reporting the outcome of a conversion.
    #[must_use]
    pub fn from_result(user: AuthenticatedUser, result: ConversionResult) -> Self {
        let mut page = Self::initial(user);
        match result {
            ConversionResult::Success(track) => {
                page.success = Some(true);
                page.song_title = Some(track.title);
                page.song_link = Some(track.link);
            }
            ConversionResult::Failure(failure) => {
                page.success = Some(false);
                page.message = Some(failure.user_message().to_owned());
            }
        }
        page
    }

    /// Render the page as a complete HTML document.
    #[must_use]
    pub fn to_html(&self) -> String {
        let outcome = match (self.success, &self.song_title, &self.song_link) {
            (Some(true), Some(title), Some(link)) => {
                let download = if is_web_link(link) {
                    format!(
                        r#"<a class="btn" href="{}" rel="noopener" download>Download MP3</a>"#,
                        html_escape(link)
                    )
                } else {
                    warn!("refusing to render non-http download link");
                    "<p>Download link unavailable.</p>".to_owned()
                };
                format!(
                    r#"<section class="result success">
<h2>{title}</h2>
{download}
</section>"#,
                    title = html_escape(title),
                )
            }
            (Some(false), _, _) => format!(
                r#"<section class="result failure"><p>{}</p></section>"#,
                html_escape(self.message.as_deref().unwrap_or_default())
            ),
            _ => String::new(),
        };

        let avatar = self.user.avatar_url().map_or_else(String::new, |url| {
            format!(
                r#"<img class="avatar" src="{}" alt="" referrerpolicy="no-referrer">"#,
                html_escape(url)
            )
        });

        let body = format!(
            r#"<header>
{avatar}<span class="user">{name}</span>
<a href="/logout">Log out</a>
</header>
<main>
<h1>YouTube to MP3</h1>
<form method="post" action="/convert-mp3">
<input type="text" name="videoID" placeholder="YouTube video ID or URL" autofocus>
<button type="submit">Convert</button>
</form>
{outcome}
</main>"#,
            name = html_escape(self.user.display_name()),
        );
        document("YouTube to MP3", &body)
    }
}

/// Render the sign-in page.
#[must_use]
pub fn login_html() -> String {
    document(
        "Sign in",
        r#"<main>
<h1>YouTube to MP3</h1>
<p>Sign in to convert videos.</p>
<a class="btn" href="/auth/google">Sign in with Google</a>
</main>"#,
    )
}

/// Render a minimal error page; `message` must already be safe to show.
pub(crate) fn error_html(status: StatusCode, message: &str, trace_id: Option<&str>) -> String {
    let reference = trace_id.map_or_else(String::new, |id| {
        format!(r#"<p class="trace">Reference: {}</p>"#, html_escape(id))
    });
    let body = format!(
        r#"<main>
<h1>{code} {reason}</h1>
<p>{message}</p>
{reference}
<a href="/">Back</a>
</main>"#,
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        message = html_escape(message),
    );
    document("Error", &body)
}

/// Reply with the index page, as JSON when the client asks for it.
pub(crate) fn respond(req: &HttpRequest, page: &IndexPage) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    builder.insert_header((CACHE_CONTROL, "no-store"));
    if wants_json(req) {
        builder.json(page)
    } else {
        builder.content_type(ContentType::html()).body(page.to_html())
    }
}

fn wants_json(req: &HttpRequest) -> bool {
    req.headers()
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
*{{box-sizing:border-box}}
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;max-width:640px;margin:0 auto;padding:24px;color:#222}}
header{{display:flex;gap:12px;align-items:center;justify-content:flex-end}}
.avatar{{width:32px;height:32px;border-radius:50%}}
form{{display:flex;gap:8px;margin:24px 0}}
input{{flex:1;padding:10px;border:1px solid #ccc;border-radius:8px}}
button,.btn{{padding:10px 18px;border:0;border-radius:8px;background:#e62117;color:#fff;text-decoration:none;font-weight:600}}
.result{{padding:16px;border-radius:8px}}
.success{{background:#eef9ee}}
.failure{{background:#fdeeee}}
.trace{{color:#777;font-size:.8rem}}
</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title),
    )
}

/// Only absolute `http`/`https` URLs may become an `href`.
fn is_web_link(link: &str) -> bool {
    Url::parse(link).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
