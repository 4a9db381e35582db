//! Test helpers for generating unique test data
//!
//! ULID-based so that concurrently running tests never collide on unique
//! columns (usernames, emails, match slugs).

use ulid::Ulid;

/// Generate a unique string with the given prefix, e.g. `user-01J...`.
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address with the given prefix.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_str_differs_between_calls() {
        let a = unique_str("user");
        let b = unique_str("user");
        assert_ne!(a, b);
        assert!(a.starts_with("user-"));
    }

    #[test]
    fn unique_email_shape() {
        let email = unique_email("kick");
        assert!(email.starts_with("kick-"));
        assert!(email.ends_with("@example.test"));
    }
}
