//! Input Validation
//!
//! Pure checks run before any roster mutation. Nothing here touches
//! roster state; the duplicate-name check lives in the roster itself.

use thiserror::Error;

/// Maximum score a player can hold.
pub const MAX_SCORE: u32 = 1_000_000;

/// Minimum name length (characters, after trimming).
pub const MIN_NAME_LEN: usize = 2;

/// Maximum name length (characters, after trimming).
pub const MAX_NAME_LEN: usize = 50;

/// Largest manual score change an operator may apply in one step.
pub const MAX_MANUAL_CHANGE: i64 = 10_000;

/// Characters stripped by [`sanitize`].
const MARKUP_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];

/// Reasons a player name is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameError {
    /// Empty input.
    #[error("Name is required")]
    Required,
    /// Fewer than two characters after trimming.
    #[error("Name must be at least 2 characters long")]
    TooShort,
    /// More than fifty characters after trimming.
    #[error("Name cannot exceed 50 characters")]
    TooLong,
    /// Something other than letters, digits, space, hyphen or underscore.
    #[error("Name contains invalid characters")]
    InvalidChars,
}

impl NameError {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            NameError::Required => "REQUIRED",
            NameError::TooShort => "TOO_SHORT",
            NameError::TooLong => "TOO_LONG",
            NameError::InvalidChars => "INVALID_CHARS",
        }
    }
}

/// Reasons a score or score change is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// Not a finite number.
    #[error("Score must be a valid number")]
    NotANumber,
    /// Below zero.
    #[error("Score cannot be negative")]
    Negative,
    /// Above [`MAX_SCORE`].
    #[error("Score cannot exceed 1,000,000")]
    TooLarge,
    /// Manual change larger than [`MAX_MANUAL_CHANGE`] in either direction.
    #[error("Score change cannot exceed ±10,000 points")]
    ChangeTooLarge,
}

impl ScoreError {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            ScoreError::NotANumber => "NOT_A_NUMBER",
            ScoreError::Negative => "NEGATIVE",
            ScoreError::TooLarge => "TOO_LARGE",
            ScoreError::ChangeTooLarge => "CHANGE_TOO_LARGE",
        }
    }
}

/// Any validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name rejected.
    #[error(transparent)]
    Name(#[from] NameError),
    /// Score rejected.
    #[error(transparent)]
    Score(#[from] ScoreError),
}

impl ValidationError {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Name(e) => e.code(),
            ValidationError::Score(e) => e.code(),
        }
    }
}

/// Validate a raw player name.
///
/// Length and character checks run on the trimmed name.
pub fn validate_name(raw: &str) -> Result<(), NameError> {
    if raw.is_empty() {
        return Err(NameError::Required);
    }

    let trimmed = raw.trim();
    let len = trimmed.chars().count();

    if len < MIN_NAME_LEN {
        return Err(NameError::TooShort);
    }
    if len > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }
    if !trimmed.chars().all(is_name_char) {
        return Err(NameError::InvalidChars);
    }

    Ok(())
}

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_')
}

/// Validate a score value, returning it as an integer score.
///
/// Fractional values are truncated toward zero once the range checks pass.
pub fn validate_score(value: f64) -> Result<u32, ScoreError> {
    if !value.is_finite() {
        return Err(ScoreError::NotANumber);
    }
    if value < 0.0 {
        return Err(ScoreError::Negative);
    }
    if value > MAX_SCORE as f64 {
        return Err(ScoreError::TooLarge);
    }
    Ok(value as u32)
}

/// Validate the size of a manual score change.
pub fn validate_change(delta: i64) -> Result<(), ScoreError> {
    if delta.unsigned_abs() > MAX_MANUAL_CHANGE.unsigned_abs() {
        return Err(ScoreError::ChangeTooLarge);
    }
    Ok(())
}

/// Strip markup-significant characters.
///
/// Not a substitute for [`validate_name`]; both are applied.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(validate_name("Al"), Ok(()));
        assert_eq!(validate_name("  Alice Johnson  "), Ok(()));
        assert_eq!(validate_name("player_one-2"), Ok(()));
        assert_eq!(validate_name(&"a".repeat(50)), Ok(()));
    }

    #[test]
    fn test_name_length_limits() {
        assert_eq!(validate_name(""), Err(NameError::Required));
        assert_eq!(validate_name("A"), Err(NameError::TooShort));
        assert_eq!(validate_name("   "), Err(NameError::TooShort));
        assert_eq!(validate_name(" A "), Err(NameError::TooShort));
        assert_eq!(validate_name(&"A".repeat(51)), Err(NameError::TooLong));
        // Trimming happens before the length check.
        assert_eq!(validate_name(&format!("  {}  ", "A".repeat(50))), Ok(()));
    }

    #[test]
    fn test_name_charset() {
        assert_eq!(validate_name("Bad$Name"), Err(NameError::InvalidChars));
        assert_eq!(validate_name("Tab\tName"), Err(NameError::InvalidChars));
        assert_eq!(validate_name("Zoë"), Err(NameError::InvalidChars));
        assert_eq!(validate_name("<script>"), Err(NameError::InvalidChars));
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(validate_score(0.0), Ok(0));
        assert_eq!(validate_score(1_000_000.0), Ok(MAX_SCORE));
        assert_eq!(validate_score(42.9), Ok(42));
        assert_eq!(validate_score(-5.0), Err(ScoreError::Negative));
        assert_eq!(validate_score(2_000_000.0), Err(ScoreError::TooLarge));
        assert_eq!(validate_score(1_000_000.5), Err(ScoreError::TooLarge));
        assert_eq!(validate_score(f64::NAN), Err(ScoreError::NotANumber));
        assert_eq!(validate_score(f64::INFINITY), Err(ScoreError::NotANumber));
    }

    #[test]
    fn test_change_limit() {
        assert_eq!(validate_change(10_000), Ok(()));
        assert_eq!(validate_change(-10_000), Ok(()));
        assert_eq!(validate_change(10_001), Err(ScoreError::ChangeTooLarge));
        assert_eq!(validate_change(-10_001), Err(ScoreError::ChangeTooLarge));
    }

    #[test]
    fn test_sanitize_strips_markup() {
        assert_eq!(sanitize(r#"<b>"Tom" & 'Jerry'</b>"#), "bTom  Jerry/b");
        assert_eq!(sanitize("plain name"), "plain name");
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ValidationError::from(NameError::TooShort).code(), "TOO_SHORT");
        assert_eq!(ValidationError::from(ScoreError::Negative).code(), "NEGATIVE");
        assert_eq!(NameError::InvalidChars.to_string(), "Name contains invalid characters");
    }
}
