//! Input validation utilities.
//!
//! Requests are checked before they leave the client so obviously bad input
//! never costs a round trip.

use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {message}")]
pub struct ValidationError {
    pub message: String,
}

/// Validate a request body, returning a [`ValidationError`] on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), ValidationError> {
    body.validate().map_err(|e| ValidationError {
        message: format_validation_errors(&e),
    })
}

/// Format validation errors into a human-readable string.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{field}'"))
            })
        })
        .collect();
    // field_errors() is a HashMap; keep output stable
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateShortLinkReq, ShortLinkGroupSaveReq, UserLoginReq, UserRegisterReq};

    #[test]
    fn empty_login_fields_are_rejected() {
        let err = validate_request(&UserLoginReq { username: String::new(), password: String::new() })
            .unwrap_err();
        assert!(err.message.contains("Username cannot be empty"));
        assert!(err.message.contains("Password cannot be empty"));
    }

    #[test]
    fn registration_requires_an_email() {
        let req = UserRegisterReq {
            username: "alice".into(),
            password: "p".into(),
            realname: "Alice".into(),
            phone: "13800000000".into(),
            mail: "not-an-email".into(),
        };
        let err = validate_request(&req).unwrap_err();
        assert_eq!(err.message, "Mail must be a valid email address");
    }

    #[test]
    fn origin_url_must_parse() {
        let mut req = CreateShortLinkReq {
            origin_url: "example".into(),
            gid: "g1".into(),
            valid_date_type: None,
            valid_date: None,
            describe: None,
        };
        assert!(validate_request(&req).is_err());
        req.origin_url = "https://example.com/a?b=c".into();
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn group_name_length_is_bounded() {
        assert!(validate_request(&ShortLinkGroupSaveReq { name: String::new() }).is_err());
        assert!(validate_request(&ShortLinkGroupSaveReq { name: "x".repeat(65) }).is_err());
        assert!(validate_request(&ShortLinkGroupSaveReq { name: "default".into() }).is_ok());
    }
}
