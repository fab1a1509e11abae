//! Server error → form field translation tables.

use crate::api::{ApiError, ErrorCode};
use crate::ui::Field;

/// Where a failed submission's message goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";
pub const ACCOUNT_INACTIVE_MESSAGE: &str = "This account has been deactivated.";
pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Too many attempts. Please try again later.";
pub const EMAIL_TAKEN_MESSAGE: &str = "This email is already registered.";
pub const NICKNAME_TAKEN_MESSAGE: &str = "This nickname is already taken.";
pub const UNSUPPORTED_IMAGE_MESSAGE: &str = "Unsupported file type.";
pub const IMAGE_TOO_LARGE_MESSAGE: &str = "The image is too large.";

/// Login failures. Only an inactive account is reported under the email
/// field; everything else lands under the password field, with whatever
/// the server said when the code has no fixed message.
pub fn login_field_error(err: &ApiError) -> FieldError {
    let Some(code) = err.code() else {
        return FieldError::new(Field::Password, err.user_message());
    };
    match code {
        ErrorCode::InvalidCredentials => {
            FieldError::new(Field::Password, INVALID_CREDENTIALS_MESSAGE)
        }
        ErrorCode::AccountInactive => FieldError::new(Field::Email, ACCOUNT_INACTIVE_MESSAGE),
        ErrorCode::TooManyRequests => {
            FieldError::new(Field::Password, TOO_MANY_REQUESTS_MESSAGE)
        }
        ErrorCode::Unauthorized
        | ErrorCode::TokenExpired
        | ErrorCode::UserNotFound
        | ErrorCode::InvalidInput
        | ErrorCode::EmailTaken
        | ErrorCode::NicknameTaken
        | ErrorCode::PasswordPolicy
        | ErrorCode::InvalidFileType
        | ErrorCode::FileTooLarge
        | ErrorCode::Other(_) => FieldError::new(Field::Password, err.user_message()),
    }
}

/// Registration failures. Unrecognised codes land under the email field.
pub fn register_field_error(err: &ApiError) -> FieldError {
    let Some(code) = err.code() else {
        return FieldError::new(Field::Email, err.user_message());
    };
    match code {
        ErrorCode::EmailTaken => FieldError::new(Field::Email, EMAIL_TAKEN_MESSAGE),
        ErrorCode::NicknameTaken => FieldError::new(Field::Nickname, NICKNAME_TAKEN_MESSAGE),
        ErrorCode::PasswordPolicy => FieldError::new(Field::Password, err.user_message()),
        ErrorCode::InvalidFileType => {
            FieldError::new(Field::ProfileImage, UNSUPPORTED_IMAGE_MESSAGE)
        }
        ErrorCode::FileTooLarge => FieldError::new(Field::ProfileImage, IMAGE_TOO_LARGE_MESSAGE),
        ErrorCode::TooManyRequests => FieldError::new(Field::Email, TOO_MANY_REQUESTS_MESSAGE),
        ErrorCode::InvalidCredentials
        | ErrorCode::Unauthorized
        | ErrorCode::TokenExpired
        | ErrorCode::UserNotFound
        | ErrorCode::AccountInactive
        | ErrorCode::InvalidInput
        | ErrorCode::Other(_) => FieldError::new(Field::Email, err.user_message()),
    }
}

/// Transport failures also get a toast, since the field message alone
/// reads like a validation problem.
pub(crate) fn is_transport(err: &ApiError) -> bool {
    matches!(err, ApiError::Timeout | ApiError::Network(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(code: ErrorCode, message: &str) -> ApiError {
        ApiError::Api {
            status: 400,
            code: Some(code),
            message: message.into(),
            details: None,
        }
    }

    #[test]
    fn login_table() {
        let e = login_field_error(&api(ErrorCode::InvalidCredentials, "AUTH-001"));
        assert_eq!(e.field, Field::Password);
        assert_eq!(e.message, INVALID_CREDENTIALS_MESSAGE);

        assert_eq!(
            login_field_error(&api(ErrorCode::AccountInactive, "USER-005")),
            FieldError::new(Field::Email, ACCOUNT_INACTIVE_MESSAGE)
        );
        assert_eq!(
            login_field_error(&api(ErrorCode::UserNotFound, "no such user")),
            FieldError::new(Field::Password, "no such user")
        );
        assert_eq!(
            login_field_error(&api(ErrorCode::InvalidInput, "bad email")),
            FieldError::new(Field::Password, "bad email")
        );
        assert_eq!(
            login_field_error(&api(ErrorCode::Other("X-999".into()), "odd")),
            FieldError::new(Field::Password, "odd")
        );
    }

    #[test]
    fn login_transport_errors_go_to_password() {
        let e = login_field_error(&ApiError::Timeout);
        assert_eq!(e.field, Field::Password);
        assert_eq!(e.message, ApiError::Timeout.to_string());
        assert!(is_transport(&ApiError::Network("refused".into())));
        assert!(!is_transport(&api(ErrorCode::InvalidInput, "x")));
    }

    #[test]
    fn register_table() {
        let cases = [
            (ErrorCode::EmailTaken, Field::Email),
            (ErrorCode::NicknameTaken, Field::Nickname),
            (ErrorCode::PasswordPolicy, Field::Password),
            (ErrorCode::parse("IMAGE-003"), Field::ProfileImage),
            (ErrorCode::parse("IMAGE-002"), Field::ProfileImage),
            (ErrorCode::Unauthorized, Field::Email),
        ];
        for (code, field) in cases {
            assert_eq!(register_field_error(&api(code.clone(), "m")).field, field, "{code:?}");
        }
    }

    #[test]
    fn register_image_code_from_response_body() {
        let err = crate::api::interpret_response(
            reqwest::StatusCode::BAD_REQUEST,
            Some("application/json"),
            r#"{"success":false,"message":"IMAGE-003"}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(&ErrorCode::InvalidFileType));
        assert_eq!(
            register_field_error(&err),
            FieldError::new(Field::ProfileImage, UNSUPPORTED_IMAGE_MESSAGE)
        );
    }

    #[test]
    fn register_uncoded_error_uses_server_message() {
        let err = ApiError::Api {
            status: 500,
            code: None,
            message: "boom".into(),
            details: None,
        };
        assert_eq!(
            register_field_error(&err),
            FieldError::new(Field::Email, "boom")
        );
    }
}
