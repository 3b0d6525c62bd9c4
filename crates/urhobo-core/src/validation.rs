//! Client-side validation: blocks submission before any network call.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

pub const EMAIL_REQUIRED: &str = "Please enter your email address";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const OTP_INCOMPLETE: &str = "Please enter the complete 6-digit code";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const NAME_REQUIRED: &str = "Please enter a new name";
pub const USERNAME_REQUIRED: &str = "Please enter a new username";

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Number of OTP cells.
pub const OTP_LEN: usize = 6;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Inline validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Returns the trimmed email, or the inline message.
///
/// # Errors
/// Returns a `ValidationError` for a blank or malformed address.
pub fn validate_email(input: &str) -> Result<&str, ValidationError> {
    let email = input.trim();
    if email.is_empty() {
        return Err(ValidationError::new(EMAIL_REQUIRED));
    }
    let valid = EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email));
    if valid {
        Ok(email)
    } else {
        Err(ValidationError::new(EMAIL_INVALID))
    }
}

/// Length first, then equality.
///
/// # Errors
/// Returns a `ValidationError` when the password is short or the two differ.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(PASSWORD_TOO_SHORT));
    }
    if password != confirm {
        return Err(ValidationError::new(PASSWORD_MISMATCH));
    }
    Ok(())
}

/// # Errors
/// Returns a `ValidationError` when `value` is blank.
pub fn require_non_blank<'a>(value: &'a str, message: &str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::new(message))
    } else {
        Ok(trimmed)
    }
}

/// Splits a full name on the first whitespace run.
///
/// The remainder keeps its words, joined by single spaces.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut words = full_name.split_whitespace();
    let first = words.next().unwrap_or_default().to_string();
    let last = words.collect::<Vec<_>>().join(" ");
    (first, last)
}

// ============================================================================
// Password strength
// ============================================================================

const STRENGTH_LABELS: [&str; 5] = ["Very Weak", "Weak", "Fair", "Good", "Strong"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    /// 0..=5
    pub level: u8,
    pub label: &'static str,
}

impl PasswordStrength {
    /// Scores a candidate password.
    ///
    /// Empty scores 0, anything under eight characters scores 1
    /// ("Too Short"). Otherwise one point for length plus one per character
    /// class present (lowercase, uppercase, digit, symbol). Classes are ASCII;
    /// any other character counts as a symbol.
    pub fn of(password: &str) -> Self {
        let len = password.chars().count();
        if len == 0 {
            return Self { level: 0, label: "" };
        }
        if len < MIN_PASSWORD_LEN {
            return Self {
                level: 1,
                label: "Too Short",
            };
        }

        let classes = [
            password.chars().any(|c| c.is_ascii_lowercase()),
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ];
        let level = 1 + classes.iter().filter(|present| **present).count();
        Self {
            level: u8::try_from(level).unwrap_or(5),
            label: STRENGTH_LABELS[level - 1],
        }
    }
}

// ============================================================================
// OTP input
// ============================================================================

/// Six single-digit cells forming one code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    cells: [Option<char>; OTP_LEN],
    focus: usize,
}

impl OtpInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the focused cell.
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn cell(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied().flatten()
    }

    /// Sets one cell from typed input.
    ///
    /// Non-digit input is ignored. An empty value clears the cell. Entering a
    /// digit moves focus to the next cell.
    pub fn set_digit(&mut self, index: usize, value: &str) {
        if index >= OTP_LEN || !value.chars().all(|c| c.is_ascii_digit()) {
            return;
        }
        let digit = value.chars().last();
        self.cells[index] = digit;
        if digit.is_some() && index + 1 < OTP_LEN {
            self.focus = index + 1;
        }
    }

    /// Handles backspace in `index`.
    ///
    /// A filled cell is cleared in place. On an empty cell focus moves back
    /// one.
    pub fn backspace(&mut self, index: usize) {
        if index >= OTP_LEN {
            return;
        }
        if self.cells[index].take().is_none() && index > 0 {
            self.focus = index - 1;
        }
    }

    /// Fills cells from the start with the first six pasted characters.
    ///
    /// Ignored unless every one of them is a digit.
    pub fn paste(&mut self, text: &str) {
        let head: Vec<char> = text.chars().take(OTP_LEN).collect();
        if head.is_empty() || !head.iter().all(char::is_ascii_digit) {
            return;
        }
        for (cell, digit) in self.cells.iter_mut().zip(&head) {
            *cell = Some(*digit);
        }
        self.focus = (head.len()).min(OTP_LEN - 1);
    }

    /// Concatenation of the filled cells, in order.
    pub fn code(&self) -> String {
        self.cells.iter().flatten().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Empties every cell and refocuses the first.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The six-digit code, or the inline message.
    ///
    /// # Errors
    /// Returns a `ValidationError` unless all six cells are filled.
    pub fn submit(&self) -> Result<String, ValidationError> {
        if self.is_complete() {
            Ok(self.code())
        } else {
            Err(ValidationError::new(OTP_INCOMPLETE))
        }
    }

    /// Builds a filled input from a typed code.
    ///
    /// # Errors
    /// Returns a `ValidationError` unless `code` is exactly six digits.
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        let code = code.trim();
        if code.chars().count() != OTP_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new(OTP_INCOMPLETE));
        }
        let mut input = Self::new();
        input.paste(code);
        Ok(input)
    }
}
