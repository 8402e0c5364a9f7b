//! Reqwest-backed conversion source.
//!
//! This adapter owns transport details only: the credential headers, the
//! query string, and JSON decoding. It sends exactly one request per call and
//! relies on reqwest's defaults for timeouts.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, StatusCode, Url};

use super::dto::ConversionResponseDto;
use crate::domain::VideoId;
use crate::domain::ports::{ConversionResponse, ConversionSource, ConversionSourceError};

/// Header carrying the RapidAPI application key.
pub const RAPIDAPI_KEY_HEADER: &str = "x-rapidapi-key";
/// Header naming the RapidAPI host being called.
pub const RAPIDAPI_HOST_HEADER: &str = "x-rapidapi-host";
/// Public endpoint of the YouTube MP3 conversion API.
pub const DEFAULT_CONVERSION_ENDPOINT: &str = "https://youtube-mp36.p.rapidapi.com/dl";

/// Endpoint and credentials for the conversion service.
#[derive(Debug, Clone)]
pub struct RapidApiSettings {
    /// Full URL of the conversion endpoint; `id` is appended as a query pair.
    pub endpoint: Url,
    /// Value for `X-RapidAPI-Key`; the header is omitted when `None`.
    pub api_key: Option<String>,
    /// Value for `X-RapidAPI-Host`; the header is omitted when `None`.
    pub api_host: Option<String>,
}

/// Errors raised while building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum RapidApiSetupError {
    /// A credential contains characters that are not valid in a header.
    #[error("invalid value for header {name}")]
    InvalidHeader {
        /// Header that could not be encoded.
        name: &'static str,
        /// Underlying encoding error.
        #[source]
        source: InvalidHeaderValue,
    },
    /// The reqwest client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Conversion source that performs HTTP GET requests against one endpoint.
pub struct RapidApiSource {
    client: Client,
    endpoint: Url,
}

impl RapidApiSource {
    /// Build an adapter whose client sends the credential headers on every
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`RapidApiSetupError`] when a credential is not a valid header
    /// value or the client cannot be constructed.
    pub fn new(settings: &RapidApiSettings) -> Result<Self, RapidApiSetupError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        insert_secret(&mut headers, RAPIDAPI_KEY_HEADER, settings.api_key.as_deref())?;
        insert_secret(&mut headers, RAPIDAPI_HOST_HEADER, settings.api_host.as_deref())?;

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }
}

fn insert_secret(
    headers: &mut HeaderMap,
    name: &'static str,
    value: Option<&str>,
) -> Result<(), RapidApiSetupError> {
    let Some(value) = value else {
        return Ok(());
    };
    let mut header = HeaderValue::from_str(value)
        .map_err(|source| RapidApiSetupError::InvalidHeader { name, source })?;
    header.set_sensitive(true);
    headers.insert(HeaderName::from_static(name), header);
    Ok(())
}

#[async_trait]
impl ConversionSource for RapidApiSource {
    async fn fetch(&self, video_id: &VideoId) -> Result<ConversionResponse, ConversionSourceError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("id", video_id.as_ref())])
            .send()
            .await
            .map_err(|error| ConversionSourceError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ConversionSourceError::transport(error.to_string()))?;
        parse_response(status, body.as_ref())
    }
}

fn parse_response(
    status: StatusCode,
    body: &[u8],
) -> Result<ConversionResponse, ConversionSourceError> {
    // The upstream reports failures in the body, so the HTTP status is only
    // used for diagnostics.
    let decoded: ConversionResponseDto = serde_json::from_slice(body).map_err(|error| {
        ConversionSourceError::decode(format!(
            "status {}: {error}; body: {}",
            status.as_u16(),
            body_preview(body)
        ))
    })?;
    Ok(decoded.into())
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rstest::rstest;
    use serde_json::json;

    use crate::domain::{ConversionFailure, ConversionResult, ConversionService};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(endpoint: &str) -> RapidApiSettings {
        RapidApiSettings {
            endpoint: Url::parse(endpoint).expect("endpoint url"),
            api_key: Some("test-key".to_owned()),
            api_host: Some("youtube-mp36.p.rapidapi.com".to_owned()),
        }
    }

    fn video_id(raw: &str) -> VideoId {
        VideoId::normalize(raw).expect("valid id")
    }

    #[tokio::test]
    async fn sends_id_and_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dl"))
            .and(query_param("id", "dQw4w9WgXcQ"))
            .and(header("X-RapidAPI-Key", "test-key"))
            .and(header("X-RapidAPI-Host", "youtube-mp36.p.rapidapi.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "title": "Song",
                "link": "http://x/y.mp3",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = RapidApiSource::new(&settings(&format!("{}/dl", server.uri())))
            .expect("adapter builds");
        let response = source
            .fetch(&video_id("dQw4w9WgXcQ"))
            .await
            .expect("reply decodes");

        assert!(response.is_ok());
        assert_eq!(response.title.as_deref(), Some("Song"));
        assert_eq!(response.link.as_deref(), Some("http://x/y.mp3"));
    }

    #[tokio::test]
    async fn encodes_unusual_raw_identifiers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dl"))
            .and(query_param("id", "a&b=c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "fail",
                "msg": "invalid id",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = RapidApiSource::new(&settings(&format!("{}/dl", server.uri())))
            .expect("adapter builds");
        let response = source.fetch(&video_id("a&b=c")).await.expect("reply decodes");

        assert!(!response.is_ok());
        assert_eq!(response.message.as_deref(), Some("invalid id"));
    }

    #[rstest]
    #[case::null(json!({"status": null, "msg": "x"}))]
    #[case::number(json!({"status": 0}))]
    #[tokio::test]
    async fn non_string_status_is_an_upstream_rejection(#[case] body: serde_json::Value) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let source = RapidApiSource::new(&settings(&format!("{}/dl", server.uri())))
            .expect("adapter builds");
        let service = ConversionService::new(Arc::new(source));
        let result = service.convert_id(&video_id("dQw4w9WgXcQ")).await;

        assert_eq!(
            result,
            ConversionResult::Failure(ConversionFailure::UpstreamRejected)
        );
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
            .mount(&server)
            .await;

        let source = RapidApiSource::new(&settings(&format!("{}/dl", server.uri())))
            .expect("adapter builds");
        let error = source
            .fetch(&video_id("dQw4w9WgXcQ"))
            .await
            .expect_err("decode must fail");

        assert!(matches!(error, ConversionSourceError::Decode { .. }));
        assert!(error.message().contains("status 502"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
        let endpoint = format!("http://{}/dl", listener.local_addr().expect("local addr"));
        drop(listener);

        let source = RapidApiSource::new(&settings(&endpoint)).expect("adapter builds");
        let error = source
            .fetch(&video_id("dQw4w9WgXcQ"))
            .await
            .expect_err("connection must fail");

        assert!(matches!(error, ConversionSourceError::Transport { .. }));
    }

    #[test]
    fn rejects_credentials_that_cannot_be_headers() {
        let mut bad = settings(DEFAULT_CONVERSION_ENDPOINT);
        bad.api_key = Some("line\nbreak".to_owned());
        let error = RapidApiSource::new(&bad).err().expect("setup must fail");
        assert!(matches!(
            error,
            RapidApiSetupError::InvalidHeader {
                name: RAPIDAPI_KEY_HEADER,
                ..
            }
        ));
    }

    #[rstest]
    #[case::missing_status(r#"{"title":"T","link":"L"}"#, "")]
    #[case::extra_fields(r#"{"status":"ok","progress":100,"duration":212.5}"#, "ok")]
    #[case::null_status(r#"{"status":null,"msg":"x"}"#, "null")]
    #[case::numeric_status(r#"{"status":0}"#, "0")]
    #[case::boolean_status(r#"{"status":true,"link":"L"}"#, "true")]
    fn decodes_loose_bodies(#[case] body: &str, #[case] expected_status: &str) {
        let response = parse_response(StatusCode::OK, body.as_bytes()).expect("decodes");
        assert_eq!(response.status, expected_status);
    }

    #[test]
    fn non_string_fields_are_dropped() {
        let body = r#"{"status":"fail","title":42,"link":null,"msg":["bad id"]}"#;
        let response = parse_response(StatusCode::OK, body.as_bytes()).expect("decodes");
        assert!(!response.is_ok());
        assert_eq!(response.title, None);
        assert_eq!(response.link, None);
        assert_eq!(response.message, None);
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let body = "x".repeat(500);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 123);
    }
}
