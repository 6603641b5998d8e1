use crate::domain::model::TransformedRecord;
use regex::Regex;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
const MIN_PHONE_DIGITS: usize = 10;

/// Classifies transformed records. A record is worth sending to the CRM when
/// it has at least one usable contact channel: a well-formed email or a phone
/// number with enough digits. Checks are purely syntactic.
pub struct RecordValidator {
    email_pattern: Regex,
}

impl RecordValidator {
    pub fn new() -> Self {
        Self {
            email_pattern: Regex::new(EMAIL_PATTERN).unwrap(),
        }
    }

    pub fn is_valid_email(&self, email: &str) -> bool {
        !email.is_empty() && self.email_pattern.is_match(email)
    }

    pub fn is_valid_phone(&self, phone: &str) -> bool {
        phone.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
    }

    /// Reads the literal destination keys `email` and `phone`; renaming those
    /// destinations in the mapping table would silently invalidate everything.
    pub fn is_valid_record(&self, record: &TransformedRecord) -> bool {
        self.is_valid_email(record.get_str("email")) || self.is_valid_phone(record.get_str("phone"))
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}
