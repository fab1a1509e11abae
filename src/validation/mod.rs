//! Form field validators.
//!
//! Every validator is a pure function from the current field value to a
//! [`ValidationResult`]. Nothing here touches the network or the view; the
//! page controllers decide where a failed result is displayed.
//!
//! ## Password policy
//! - 8 to 20 characters
//! - at least one uppercase letter, one lowercase letter, one digit
//! - at least one special character from [`PASSWORD_SPECIALS`]

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Special characters accepted by the password policy.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Password length bounds (inclusive, in characters).
const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 20;

/// Nickname length bounds (inclusive, in characters).
const NICKNAME_MIN_LEN: usize = 2;
const NICKNAME_MAX_LEN: usize = 10;

/// Default post title limit.
pub const DEFAULT_TITLE_MAX_LEN: usize = 26;

/// Default upload ceiling: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Default image MIME allow-list.
pub const DEFAULT_ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

// ── Result types ─────────────────────────────────────────────────

/// Outcome of validating a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Message to display, empty for valid results.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

/// Aggregate outcome of [`validate_form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValidation<K: Ord> {
    pub valid: bool,
    pub errors: BTreeMap<K, String>,
}

/// Relative password strength shown while the user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn label(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }
}

impl std::fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Size and type metadata of a file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub size: u64,
    pub mime_type: String,
}

/// Constraints applied by [`file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRules {
    pub max_size: u64,
    pub allowed_types: Vec<String>,
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_FILE_BYTES,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

// ── Field validators ─────────────────────────────────────────────

pub fn email(value: &str) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid("Please enter your email.");
    }
    if !EMAIL_SHAPE.is_match(value) {
        return ValidationResult::invalid("Please enter a valid email address.");
    }
    ValidationResult::ok()
}

pub fn password(value: &str) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid("Please enter your password.");
    }

    let len = value.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return ValidationResult::invalid("Password must be 8 to 20 characters long.");
    }

    if !(has_upper(value) && has_lower(value) && has_digit(value) && has_special(value)) {
        return ValidationResult::invalid(
            "Password must include at least one uppercase letter, lowercase letter, number and special character.",
        );
    }

    ValidationResult::ok()
}

/// Score a password for the strength indicator. Independent of [`password`]:
/// a weak password may still pass the policy and vice versa.
pub fn password_strength(value: &str) -> PasswordStrength {
    if value.is_empty() {
        return PasswordStrength::Weak;
    }

    let len = value.chars().count();
    let score = [
        len >= 8,
        len >= 12,
        has_upper(value),
        has_lower(value),
        has_digit(value),
        has_special(value),
    ]
    .into_iter()
    .filter(|hit| *hit)
    .count();

    match score {
        0..=2 => PasswordStrength::Weak,
        3..=4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

pub fn password_match(password: &str, confirm: &str) -> ValidationResult {
    if confirm.is_empty() {
        return ValidationResult::invalid("Please confirm your password.");
    }
    if password != confirm {
        return ValidationResult::invalid("Passwords do not match.");
    }
    ValidationResult::ok()
}

pub fn nickname(value: &str) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid("Please enter a nickname.");
    }
    let len = value.chars().count();
    if !(NICKNAME_MIN_LEN..=NICKNAME_MAX_LEN).contains(&len) {
        return ValidationResult::invalid("Nickname must be 2 to 10 characters long.");
    }
    ValidationResult::ok()
}

pub fn title(value: &str, max_len: usize) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid("Please enter a title.");
    }
    if value.chars().count() > max_len {
        return ValidationResult::invalid(format!(
            "Title can be at most {max_len} characters."
        ));
    }
    ValidationResult::ok()
}

pub fn content(value: &str) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::invalid("Please enter some content.");
    }
    ValidationResult::ok()
}

/// Files are optional: `None` is always valid.
pub fn file(meta: Option<&FileMeta>, rules: &FileRules) -> ValidationResult {
    let Some(meta) = meta else {
        return ValidationResult::ok();
    };

    if meta.size > rules.max_size {
        return ValidationResult::invalid(format!(
            "Files can be at most {}MB.",
            format_megabytes(rules.max_size)
        ));
    }

    if !rules.allowed_types.iter().any(|t| t == &meta.mime_type) {
        return ValidationResult::invalid("Unsupported file type.");
    }

    ValidationResult::ok()
}

pub fn required(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::invalid("This field is required.");
    }
    ValidationResult::ok()
}

/// Collect per-field results into a single verdict keyed by field.
pub fn validate_form<K, I>(checks: I) -> FormValidation<K>
where
    K: Ord,
    I: IntoIterator<Item = (K, ValidationResult)>,
{
    let mut errors = BTreeMap::new();
    for (field, result) in checks {
        if !result.valid {
            errors.insert(field, result.message.unwrap_or_default());
        }
    }
    FormValidation {
        valid: errors.is_empty(),
        errors,
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn has_upper(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_uppercase())
}

fn has_lower(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_lowercase())
}

fn has_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

fn has_special(value: &str) -> bool {
    value.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

fn format_megabytes(bytes: u64) -> String {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    if mb.fract() == 0.0 {
        format!("{}", mb as u64)
    } else {
        format!("{mb:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_minimal_shape() {
        assert!(email("a@b.c").valid);
        assert!(email("user.name+tag@example.co.kr").valid);
    }

    #[test]
    fn email_rejects_malformed() {
        let r = email("not-an-email");
        assert!(!r.valid);
        assert_eq!(r.message(), "Please enter a valid email address.");

        assert!(!email("a b@c.d").valid);
        assert!(!email("a@b").valid);
        assert!(!email("@b.c").valid);
    }

    #[test]
    fn email_empty_is_required() {
        let r = email("");
        assert!(!r.valid);
        assert!(r.message().contains("enter your email"));
    }

    #[test]
    fn password_length_bounds() {
        for len in [1usize, 5, 7, 21, 30] {
            let candidate: String = "Aa1!".chars().cycle().take(len).collect();
            assert!(!password(&candidate).valid, "length {len} should be rejected");
        }
        for len in [8usize, 14, 20] {
            let candidate: String = "Aa1!".chars().cycle().take(len).collect();
            assert!(password(&candidate).valid, "length {len} should be accepted");
        }
    }

    #[test]
    fn password_requires_every_class() {
        assert!(password("Abcdef1!").valid);
        assert!(!password("abcdef1!").valid, "missing upper");
        assert!(!password("ABCDEF1!").valid, "missing lower");
        assert!(!password("Abcdefg!").valid, "missing digit");
        assert!(!password("Abcdefg1").valid, "missing special");
    }

    #[test]
    fn password_rejects_specials_outside_policy_set() {
        // '-' and '_' are not in the accepted special set.
        assert!(!password("Abcdef1-_").valid);
    }

    #[test]
    fn password_counts_characters_not_bytes() {
        // 8 characters, more than 8 bytes.
        assert!(password("Ab1!éééé").valid);
    }

    #[test]
    fn password_empty_is_required() {
        assert_eq!(password("").message(), "Please enter your password.");
    }

    #[test]
    fn strength_scores() {
        assert_eq!(password_strength(""), PasswordStrength::Weak);
        assert_eq!(password_strength("abc"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefgh1"), PasswordStrength::Medium);
        assert_eq!(password_strength("Abcdefgh1!"), PasswordStrength::Strong);
        assert_eq!(password_strength("Abcdefghijk1!"), PasswordStrength::Strong);
    }

    #[test]
    fn password_match_cases() {
        assert!(password_match("Abcdef1!", "Abcdef1!").valid);
        assert_eq!(
            password_match("Abcdef1!", "Abcdef1?").message(),
            "Passwords do not match."
        );
        assert!(!password_match("Abcdef1!", "").valid);
    }

    #[test]
    fn nickname_bounds() {
        assert!(!nickname("").valid);
        assert!(!nickname("a").valid);
        assert!(nickname("ab").valid);
        assert!(nickname("닉네임").valid);
        assert!(nickname("abcdefghij").valid);
        assert!(!nickname("abcdefghijk").valid);
    }

    #[test]
    fn title_and_content() {
        assert!(!title("", DEFAULT_TITLE_MAX_LEN).valid);
        assert!(title("hello", DEFAULT_TITLE_MAX_LEN).valid);
        let long = "x".repeat(27);
        assert_eq!(
            title(&long, DEFAULT_TITLE_MAX_LEN).message(),
            "Title can be at most 26 characters."
        );
        assert!(!content("").valid);
        assert!(content("body").valid);
    }

    #[test]
    fn file_is_optional() {
        assert!(file(None, &FileRules::default()).valid);
    }

    #[test]
    fn file_size_ceiling() {
        let rules = FileRules {
            max_size: 5 * 1024 * 1024,
            ..FileRules::default()
        };
        let meta = FileMeta {
            size: 5 * 1024 * 1024 + 1,
            mime_type: "image/png".into(),
        };
        let r = file(Some(&meta), &rules);
        assert!(!r.valid);
        assert_eq!(r.message(), "Files can be at most 5MB.");
    }

    #[test]
    fn file_type_allow_list() {
        let meta = FileMeta {
            size: 10,
            mime_type: "application/pdf".into(),
        };
        assert_eq!(
            file(Some(&meta), &FileRules::default()).message(),
            "Unsupported file type."
        );
        let meta = FileMeta {
            size: 10,
            mime_type: "image/gif".into(),
        };
        assert!(file(Some(&meta), &FileRules::default()).valid);
    }

    #[test]
    fn required_trims_whitespace() {
        assert!(!required("").valid);
        assert!(!required("   ").valid);
        assert!(required(" x ").valid);
    }

    #[test]
    fn validate_form_collects_errors() {
        let result = validate_form([
            ("email", email("a@b.c")),
            ("password", password("short")),
            ("nickname", nickname("")),
        ]);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.contains_key("password"));
        assert!(result.errors.contains_key("nickname"));

        let ok = validate_form([("email", email("a@b.c"))]);
        assert!(ok.valid);
        assert!(ok.errors.is_empty());
    }
}
