use super::error::{ServiceError, ServiceResult};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn require_non_empty(field: &str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// `local@domain.tld`, single `@`, no whitespace.
pub fn validate_email(email: &str) -> ServiceResult<()> {
    let email = email.trim();
    let invalid = || ServiceError::validation(format!("'{}' is not a valid email address", email));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let valid_domain = domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));
    if !valid_domain {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ServiceResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if !password.chars().any(char::is_alphabetic) || !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ServiceError::validation(
            "Password must contain at least one letter and one digit",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_emails() {
        for email in ["jane@example.com", "Bob.Smith@mail.co.uk", " padded@example.org "] {
            assert!(validate_email(email).is_ok(), "{email}");
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["", "jane", "@example.com", "jane@", "jane@example", "a@b@c.com", "ja ne@x.com", "jane@.com"] {
            assert!(validate_email(email).is_err(), "{email}");
        }
    }

    #[test]
    fn password_strength() {
        assert!(validate_password("P@ssword1").is_ok());
        assert!(validate_password("p@ssWord!2").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("allletters").is_err());
        assert!(validate_password("12345678").is_err());
    }

    #[test]
    fn trims_required_fields() {
        assert_eq!(require_non_empty("title", "  Dishes ").unwrap(), "Dishes");
        assert!(require_non_empty("title", "   ").is_err());
    }
}
