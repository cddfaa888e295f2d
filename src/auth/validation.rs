use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,20}$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// First password rule the candidate breaks, if any.
pub(crate) fn password_error(password: &str) -> Option<&'static str> {
    if password.len() < 8 {
        return Some("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_accepts_expected_shapes() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username("A1_2345"));
        assert!(is_valid_username("a".repeat(20).as_str()));
    }

    #[test]
    fn username_rejects_bad_shapes() {
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("a".repeat(21).as_str()));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("dash-ed"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn password_rules_fire_independently() {
        assert_eq!(
            password_error("Abcde12"),
            Some("Password must be at least 8 characters long")
        );
        assert_eq!(
            password_error("abcdef12"),
            Some("Password must contain at least one uppercase letter")
        );
        assert_eq!(
            password_error("ABCDEF12"),
            Some("Password must contain at least one lowercase letter")
        );
        assert_eq!(
            password_error("Abcdefgh"),
            Some("Password must contain at least one number")
        );
    }

    #[test]
    fn password_accepts_compliant_value() {
        assert_eq!(password_error("Abcdef12"), None);
    }

    #[test]
    fn email_syntax_checks() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@x.com"));
    }
}
