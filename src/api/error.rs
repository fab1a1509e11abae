//! Failure taxonomy of the API client.

use regex::Regex;
use std::sync::LazyLock;

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]+-\d{3})\b").unwrap());

/// Machine-readable error codes the board API is known to return.
/// Anything else is kept verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// `AUTH-001`: wrong email/password combination.
    InvalidCredentials,
    /// `AUTH-002`: missing or rejected access token.
    Unauthorized,
    /// `AUTH-003`: access token expired.
    TokenExpired,
    /// `USER-001`
    UserNotFound,
    /// `USER-002`
    EmailTaken,
    /// `USER-003`
    NicknameTaken,
    /// `USER-004`: password rejected by the server-side policy.
    PasswordPolicy,
    /// `USER-005`: account deactivated.
    AccountInactive,
    /// `IMAGE-003`: unsupported image format.
    InvalidFileType,
    /// `IMAGE-002`: image over the upload limit.
    FileTooLarge,
    /// `COMMON-001`: request body failed validation.
    InvalidInput,
    /// `COMMON-004`: rate limited.
    TooManyRequests,
    Other(String),
}

impl ErrorCode {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "AUTH-001" => Self::InvalidCredentials,
            "AUTH-002" => Self::Unauthorized,
            "AUTH-003" => Self::TokenExpired,
            "USER-001" => Self::UserNotFound,
            "USER-002" => Self::EmailTaken,
            "USER-003" => Self::NicknameTaken,
            "USER-004" => Self::PasswordPolicy,
            "USER-005" => Self::AccountInactive,
            "IMAGE-003" => Self::InvalidFileType,
            "IMAGE-002" => Self::FileTooLarge,
            "COMMON-001" => Self::InvalidInput,
            "COMMON-004" => Self::TooManyRequests,
            other => Self::Other(other.to_string()),
        }
    }

    /// First `XXX-000` token in `text`, if any.
    pub fn find_in(text: &str) -> Option<Self> {
        CODE_PATTERN
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| Self::parse(m.as_str()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::InvalidCredentials => "AUTH-001",
            Self::Unauthorized => "AUTH-002",
            Self::TokenExpired => "AUTH-003",
            Self::UserNotFound => "USER-001",
            Self::EmailTaken => "USER-002",
            Self::NicknameTaken => "USER-003",
            Self::PasswordPolicy => "USER-004",
            Self::AccountInactive => "USER-005",
            Self::InvalidFileType => "IMAGE-003",
            Self::FileTooLarge => "IMAGE-002",
            Self::InvalidInput => "COMMON-001",
            Self::TooManyRequests => "COMMON-004",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything [`super::ApiClient::request`] can fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The deadline fired and the in-flight call was dropped.
    #[error("The request timed out.")]
    Timeout,

    /// Transport failure before a response arrived.
    #[error("Please check your network connection. ({0})")]
    Network(String),

    /// Non-success HTTP status.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
        details: Option<String>,
    },

    /// A JSON response that did not parse, or did not have the expected shape.
    #[error("Unexpected response from the server: {0}")]
    Decode(String),

    /// The request could not be built (e.g. a malformed upload part).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Api { code, .. } => code.as_ref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Best human-readable text: server details when present, otherwise
    /// the display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                details: Some(details),
                ..
            } if !details.trim().is_empty() => details.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes() {
        assert_eq!(ErrorCode::parse("AUTH-001"), ErrorCode::InvalidCredentials);
        assert_eq!(ErrorCode::parse("USER-003"), ErrorCode::NicknameTaken);
        assert_eq!(
            ErrorCode::parse("POST-001"),
            ErrorCode::Other("POST-001".into())
        );
    }

    #[test]
    fn as_str_inverts_parse() {
        for raw in ["AUTH-001", "AUTH-002", "USER-002", "IMAGE-003", "COMMON-001"] {
            assert_eq!(ErrorCode::parse(raw).as_str(), raw);
        }
    }

    #[test]
    fn finds_code_inside_message() {
        assert_eq!(
            ErrorCode::find_in("login failed: AUTH-001 (bad password)"),
            Some(ErrorCode::InvalidCredentials)
        );
        assert_eq!(ErrorCode::find_in("COMMON-001"), Some(ErrorCode::InvalidInput));
        assert_eq!(ErrorCode::find_in("no code here"), None);
        assert_eq!(ErrorCode::find_in("lowercase auth-001"), None);
    }

    #[test]
    fn code_accessor_only_for_api_errors() {
        let err = ApiError::Api {
            status: 401,
            code: Some(ErrorCode::InvalidCredentials),
            message: "AUTH-001".into(),
            details: None,
        };
        assert_eq!(err.code(), Some(&ErrorCode::InvalidCredentials));
        assert_eq!(err.status(), Some(401));
        assert_eq!(ApiError::Timeout.code(), None);
    }

    #[test]
    fn user_message_prefers_details() {
        let err = ApiError::Api {
            status: 400,
            code: Some(ErrorCode::InvalidInput),
            message: "COMMON-001".into(),
            details: Some("email must not be blank".into()),
        };
        assert_eq!(err.user_message(), "email must not be blank");
        assert_eq!(err.to_string(), "COMMON-001");
        assert_eq!(ApiError::Timeout.user_message(), "The request timed out.");
    }
}
