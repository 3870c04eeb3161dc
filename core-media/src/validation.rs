//! Embed code validation for host form pipelines

use crate::embed::EmbedMatcher;
use core_runtime::config::DEFAULT_VALIDATION_MESSAGE;
use thiserror::Error;

/// A failed embed code constraint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConstraintViolation {
    pub message: String,
}

/// Validates that a field value is a 500px embed code
#[derive(Debug, Clone)]
pub struct EmbedCodeValidator {
    message: String,
    matcher: EmbedMatcher,
}

impl Default for EmbedCodeValidator {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDATION_MESSAGE)
    }
}

impl EmbedCodeValidator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            matcher: EmbedMatcher::default(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// A missing value passes; nothing is there to validate.
    pub fn validate(&self, value: Option<&str>) -> Result<(), ConstraintViolation> {
        match value {
            None => Ok(()),
            Some(text) if self.matcher.is_match(text) => Ok(()),
            Some(_) => Err(ConstraintViolation {
                message: self.message.clone(),
            }),
        }
    }
}

/// True iff `text` is a recognised 500px embed code
pub fn is_valid_embed(text: &str) -> bool {
    EmbedMatcher::default().is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMBED: &str = "<div class='pixels-photo'>\r\n<p><img src='https://drscdn.500px.org/photo/98765/q%3D80_m%3D1500/abc123' alt='Dawn'></p>\n<a href='https://500px.com/photo/98765/dawn-by-bob' alt='Dawn'></a></div><script type='text/javascript' src='https://500px.com/embed.js'></script>";

    #[test]
    fn test_valid_embed_passes() {
        assert!(is_valid_embed(EMBED));
        assert_eq!(EmbedCodeValidator::default().validate(Some(EMBED)), Ok(()));
    }

    #[test]
    fn test_missing_value_passes() {
        assert_eq!(EmbedCodeValidator::default().validate(None), Ok(()));
    }

    #[test]
    fn test_invalid_value_reports_default_message() {
        assert!(!is_valid_embed("not an embed code"));

        let violation = EmbedCodeValidator::default()
            .validate(Some("not an embed code"))
            .unwrap_err();
        assert_eq!(violation.message, "Not valid 500px embed code.");
        assert_eq!(violation.to_string(), "Not valid 500px embed code.");
    }

    #[test]
    fn test_empty_string_is_validated() {
        let validator = EmbedCodeValidator::new("Paste the code from the 500px share dialog.");
        let violation = validator.validate(Some("")).unwrap_err();
        assert_eq!(violation.message, validator.message());
    }
}
