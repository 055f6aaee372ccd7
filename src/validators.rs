/// Input validators
/// 1. Email format and length
/// 2. Chirp body length and profanity filtering

use lazy_static::lazy_static;
use regex::Regex;

use crate::configuration::ChirpSettings;
use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("email regex is valid");
}

/// Validates email address
///
/// The address is returned exactly as given: emails are compared
/// case-sensitively as stored, so no trimming or lowercasing happens here.
pub fn is_valid_email(email: &str) -> Result<&str, ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(email)
}

/// Validates a chirp body and returns it with profanity censored
///
/// Length is counted in characters, before censoring.
pub fn validate_chirp(body: &str, settings: &ChirpSettings) -> Result<String, ValidationError> {
    if body.chars().count() > settings.max_length {
        return Err(ValidationError::TooLong(
            "chirp".to_string(),
            settings.max_length,
        ));
    }

    Ok(clean_profanity(body, settings))
}

/// Replace every space-separated word that matches the profane list
/// (case-insensitively) with the censor marker. Spacing is preserved.
pub fn clean_profanity(body: &str, settings: &ChirpSettings) -> String {
    body.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            if settings.profane_words.iter().any(|bad| bad.to_lowercase() == lower) {
                settings.censor.as_str()
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in ["alice@example.com", "first.last+tag@sub.example.org"] {
            assert!(is_valid_email(email).is_ok(), "{} should be valid", email);
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["", "notanemail", "user@", "@example.com", "user@@example.com"] {
            assert!(is_valid_email(email).is_err(), "{} should be invalid", email);
        }
    }

    #[test]
    fn test_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            is_valid_email(&email),
            Err(ValidationError::TooLong(_, MAX_EMAIL_LENGTH))
        ));
    }

    #[test]
    fn test_chirp_length_limit() {
        let settings = ChirpSettings::default();

        assert!(validate_chirp(&"a".repeat(140), &settings).is_ok());
        assert!(validate_chirp(&"a".repeat(141), &settings).is_err());
        // characters, not bytes
        assert!(validate_chirp(&"é".repeat(140), &settings).is_ok());
    }

    #[test]
    fn test_profanity_is_censored() {
        let settings = ChirpSettings::default();
        let cleaned = clean_profanity("I had something interesting for breakfast Kerfuffle", &settings);

        assert_eq!(cleaned, "I had something interesting for breakfast ****");
    }

    #[test]
    fn test_profanity_keeps_word_count_and_spacing() {
        let settings = ChirpSettings::default();
        let body = "what a  sharbert day, fornax!";
        let cleaned = clean_profanity(body, &settings);

        // punctuation attached to a word means it does not match
        assert_eq!(cleaned, "what a  **** day, fornax!");
        assert_eq!(
            cleaned.split_whitespace().count(),
            body.split_whitespace().count()
        );
    }
}
