//! HTTP wrapper shared by every page.
//!
//! ## Design
//! - One `reqwest::Client` per process; no client-level timeout. The deadline
//!   is applied per call around send + body read so that a slow body is
//!   cancelled too
//! - The bearer token is read from the [`Session`] on every call, never
//!   cached
//! - Response interpretation is a pure function ([`interpret_response`]) so
//!   the ok/error branching is testable without a server

use super::error::{ApiError, ErrorCode};
use super::models::{Availability, Credentials, PostPage, RegistrationForm, TokenPair};
use super::{
    BoardApi, CHECK_EMAIL_ENDPOINT, CHECK_NICKNAME_ENDPOINT, LOGIN_ENDPOINT, POSTS_ENDPOINT,
    SIGNUP_ENDPOINT,
};
use crate::config::ApiConfig;
use crate::session::Session;
use crate::util::build_query;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Fallback message when an error response carries none.
const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong while talking to the server.";

/// Body of an outgoing request.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized with `Content-Type: application/json`.
    Json(Value),
    /// The transport picks the multipart boundary and content type.
    Multipart(Form),
}

#[derive(Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub body: RequestBody,
    /// Extra headers, sent after the defaults.
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: RequestBody::Empty,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Board API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("board-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            session,
        })
    }

    /// Override the per-request timeout taken from the config.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Absolute URLs pass through; anything else is appended to the base.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            return endpoint.to_string();
        }
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Perform one call and normalize the outcome.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let url = self.resolve(endpoint);
        let method = options.method.clone();

        let mut builder = self.http.request(options.method, &url);
        if let Some(token) = self.session.access_token() {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in options.headers {
            builder = builder.header(name, value);
        }
        builder = match options.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        tracing::debug!(%method, %url, "API request");

        let call = async {
            let response = builder.send().await?;
            let status = response.status();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, content_type, body))
        };

        match tokio::time::timeout(self.timeout, call).await {
            Err(_) => {
                tracing::warn!(
                    %method,
                    %url,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "API request timed out"
                );
                Err(ApiError::Timeout)
            }
            Ok(Err(e)) => {
                tracing::warn!(%method, %url, "API request failed: {e}");
                Err(ApiError::Network(e.to_string()))
            }
            Ok(Ok((status, content_type, body))) => {
                let result = interpret_response(status, content_type.as_deref(), &body);
                if let Err(ref e) = result {
                    tracing::warn!(%method, %url, status = status.as_u16(), "API error: {e}");
                }
                result
            }
        }
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::GET)).await
    }

    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Value, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::POST).json(body))
            .await
    }

    pub async fn put(&self, endpoint: &str, body: Value) -> Result<Value, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::PUT).json(body))
            .await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::DELETE))
            .await
    }

    /// Multipart POST.
    pub async fn upload(&self, endpoint: &str, form: Form) -> Result<Value, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::POST).multipart(form))
            .await
    }
}

#[async_trait]
impl BoardApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let value = self.post(LOGIN_ENDPOINT, body).await?;
        unwrap_data(value)
    }

    async fn signup(&self, form: &RegistrationForm) -> Result<TokenPair, ApiError> {
        let value = self.upload(SIGNUP_ENDPOINT, signup_form(form)?).await?;
        unwrap_data(value)
    }

    async fn list_posts(&self, page: u32, size: u32) -> Result<PostPage, ApiError> {
        let query = build_query(&[("page", page.to_string()), ("size", size.to_string())]);
        let value = self.get(&format!("{POSTS_ENDPOINT}?{query}")).await?;
        unwrap_data(value)
    }

    async fn check_email(&self, email: &str) -> Result<bool, ApiError> {
        let query = build_query(&[("email", email)]);
        let value = self.get(&format!("{CHECK_EMAIL_ENDPOINT}?{query}")).await?;
        unwrap_data::<Availability>(value).map(|a| a.available)
    }

    async fn check_nickname(&self, nickname: &str) -> Result<bool, ApiError> {
        let query = build_query(&[("nickname", nickname)]);
        let value = self
            .get(&format!("{CHECK_NICKNAME_ENDPOINT}?{query}"))
            .await?;
        unwrap_data::<Availability>(value).map(|a| a.available)
    }
}

// ── Response handling ────────────────────────────────────────────

/// Turn a raw response into the parsed body or an [`ApiError`].
///
/// JSON (by content type) is parsed first; a parse failure is a
/// [`ApiError::Decode`]. Other bodies are treated as text and, on success,
/// wrapped as `{"data": text}`.
pub fn interpret_response(
    status: StatusCode,
    content_type: Option<&str>,
    body: &str,
) -> Result<Value, ApiError> {
    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        let value: Value =
            serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if !status.is_success() {
            return Err(error_from_json(status, &value));
        }
        return Ok(value);
    }

    if !status.is_success() {
        let message = if body.trim().is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            body.trim().to_string()
        };
        return Err(ApiError::Api {
            status: status.as_u16(),
            code: ErrorCode::find_in(&message),
            message,
            details: None,
        });
    }

    Ok(serde_json::json!({ "data": body }))
}

fn error_from_json(status: StatusCode, value: &Value) -> ApiError {
    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let message = field("error")
        .or_else(|| field("message"))
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

    let code = field("code")
        .as_deref()
        .and_then(ErrorCode::find_in)
        .or_else(|| ErrorCode::find_in(&message));

    let details = value
        .get("data")
        .and_then(|d| d.get("details"))
        .and_then(Value::as_str)
        .map(str::to_string);

    ApiError::Api {
        status: status.as_u16(),
        code,
        message,
        details,
    }
}

/// Deserialize `value` as `T`. A `data` object, when present, is the
/// payload and must parse on its own; otherwise the top level is used.
fn unwrap_data<T: DeserializeOwned>(mut value: Value) -> Result<T, ApiError> {
    if let Some(inner) = value.get_mut("data").filter(|d| d.is_object()) {
        return serde_json::from_value(inner.take())
            .map_err(|e| ApiError::Decode(e.to_string()));
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn signup_form(form: &RegistrationForm) -> Result<Form, ApiError> {
    let mut multipart = Form::new()
        .text("email", form.email.clone())
        .text("password", form.password.clone())
        .text("nickname", form.nickname.clone());

    if let Some(image) = &form.profile_image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| ApiError::InvalidRequest(format!("profile image: {e}")))?;
        multipart = multipart.part("profile_image", part);
    }

    Ok(multipart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ProfileImage;
    use serde_json::json;

    fn client(base: &str) -> ApiClient {
        let config = ApiConfig {
            base_url: base.into(),
            ..ApiConfig::default()
        };
        ApiClient::new(&config, Session::in_memory()).unwrap()
    }

    #[test]
    fn resolves_relative_and_absolute() {
        let c = client("http://localhost:8080/api/");
        assert_eq!(c.resolve("/posts"), "http://localhost:8080/api/posts");
        assert_eq!(c.resolve("posts"), "http://localhost:8080/api/posts");
        assert_eq!(
            c.resolve("https://cdn.example.com/x"),
            "https://cdn.example.com/x"
        );
    }

    #[test]
    fn json_success_returns_body() {
        let v = interpret_response(
            StatusCode::OK,
            Some("application/json; charset=utf-8"),
            r#"{"accessToken":"a"}"#,
        )
        .unwrap();
        assert_eq!(v["accessToken"], "a");
    }

    #[test]
    fn json_error_carries_code_and_details() {
        let err = interpret_response(
            StatusCode::UNAUTHORIZED,
            Some("application/json"),
            r#"{"message":"AUTH-001","data":{"details":"Invalid credentials"}}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(&ErrorCode::InvalidCredentials));
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "AUTH-001");
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[test]
    fn json_error_prefers_error_field() {
        let err = interpret_response(
            StatusCode::CONFLICT,
            Some("application/json"),
            r#"{"error":"USER-002 email exists","message":"ignored"}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(&ErrorCode::EmailTaken));
        assert_eq!(err.to_string(), "USER-002 email exists");
    }

    #[test]
    fn json_error_explicit_code_field() {
        let err = interpret_response(
            StatusCode::BAD_REQUEST,
            Some("application/json"),
            r#"{"code":"USER-003","message":"nickname taken"}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(&ErrorCode::NicknameTaken));
    }

    #[test]
    fn json_error_without_message_uses_default() {
        let err =
            interpret_response(StatusCode::INTERNAL_SERVER_ERROR, Some("application/json"), "{}")
                .unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = interpret_response(StatusCode::OK, Some("application/json"), "{oops")
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn text_success_is_wrapped() {
        let v = interpret_response(StatusCode::OK, Some("text/plain"), "pong").unwrap();
        assert_eq!(v, json!({"data": "pong"}));
        let v = interpret_response(StatusCode::NO_CONTENT, None, "").unwrap();
        assert_eq!(v, json!({"data": ""}));
    }

    #[test]
    fn text_error_keeps_text() {
        let err = interpret_response(StatusCode::BAD_GATEWAY, Some("text/html"), "Bad Gateway")
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad Gateway");
        assert_eq!(err.status(), Some(502));

        let err = interpret_response(StatusCode::FORBIDDEN, None, "  ").unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn unwrap_data_handles_envelope() {
        let direct: TokenPair =
            unwrap_data(json!({"accessToken": "a", "refreshToken": "r"})).unwrap();
        let wrapped: TokenPair =
            unwrap_data(json!({"message": "ok", "data": {"accessToken": "a", "refreshToken": "r"}}))
                .unwrap();
        assert_eq!(direct, wrapped);

        let err = unwrap_data::<TokenPair>(json!({"unexpected": true})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn broken_envelope_is_decode_error() {
        let err = unwrap_data::<PostPage>(json!({
            "data": {"posts": [{"id": 1, "title": "no author"}], "hasMore": true}
        }))
        .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "{err:?}");

        let page: PostPage = unwrap_data(json!({"data": {"posts": [], "hasMore": true}})).unwrap();
        assert!(page.has_more);
        let flat: Availability = unwrap_data(json!({"available": true, "data": null})).unwrap();
        assert!(flat.available);
    }

    #[test]
    fn signup_form_rejects_bad_mime() {
        let form = RegistrationForm {
            email: "a@b.c".into(),
            password: "Abcdef1!".into(),
            password_confirm: "Abcdef1!".into(),
            nickname: "kim".into(),
            profile_image: Some(ProfileImage {
                file_name: "x".into(),
                mime_type: "not a mime".into(),
                bytes: vec![1],
            }),
        };
        assert!(matches!(
            signup_form(&form),
            Err(ApiError::InvalidRequest(_))
        ));
    }
}
