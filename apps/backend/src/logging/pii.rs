use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Email pattern: matches standard email addresses
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
    });
    &EMAIL_REGEX
}

/// Opaque token pattern: long runs from the invite-token alphabet (≥24 chars)
fn invite_token_regex() -> &'static Regex {
    static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"[A-Za-z0-9+_$-]{24,}").unwrap()
    });
    &TOKEN_REGEX
}

/// Redacts sensitive information from a string.
///
/// Conservatively masks:
/// - Emails: keeps first character of local part, replaces rest with ***,
///   keeps full domain
/// - Invite-token-like runs (≥24 chars from the token alphabet), which also
///   covers JWTs and hex ids: replaced with [REDACTED_TOKEN]
///
/// Order: emails first, then tokens, to avoid double-processing.
pub fn redact(input: &str) -> String {
    let email_redacted = email_regex().replace_all(input, |caps: &regex::Captures| {
        let full_match = &caps[0];
        match full_match.find('@') {
            Some(at_pos) => {
                let local_part = &full_match[..at_pos];
                let domain = &full_match[at_pos..];

                if local_part.is_empty() {
                    domain.to_string()
                } else {
                    let first_char = &local_part[..1];
                    format!("{first_char}***{domain}")
                }
            }
            None => full_match.to_string(),
        }
    });

    invite_token_regex()
        .replace_all(&email_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// A wrapper that automatically redacts sensitive strings when displayed.
///
/// Used when logging raw DB error strings, which can quote invite tokens
/// or email addresses from failed statements.
pub struct Redacted<'a>(pub &'a str);

impl<'a> fmt::Display for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl<'a> fmt::Debug for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_redaction() {
        assert_eq!(redact("user@example.com"), "u***@example.com");
        assert_eq!(redact("a@test.org"), "a***@test.org");
        assert_eq!(
            redact("Contact user@example.com or admin@test.org"),
            "Contact u***@example.com or a***@test.org"
        );
    }

    #[test]
    fn token_redaction() {
        // Full-length invite token
        assert_eq!(
            redact("duplicate key value: Kk2m$9_x-PLnb3TqWcY7hr5vZJd0eGfa"),
            "duplicate key value: [REDACTED_TOKEN]"
        );

        // Short identifiers stay readable
        assert_eq!(redact("match lockout-2026"), "match lockout-2026");
    }

    #[test]
    fn mixed_content() {
        assert_eq!(
            redact("kicked b@example.com, token Kk2m$9_x-PLnb3TqWcY7hr5vZJd0eGfa"),
            "kicked b***@example.com, token [REDACTED_TOKEN]"
        );
    }

    #[test]
    fn redacted_wrapper() {
        let sensitive = "user@example.com";
        assert_eq!(format!("{}", Redacted(sensitive)), "u***@example.com");
        assert_eq!(format!("{:?}", Redacted(sensitive)), "u***@example.com");
    }

    #[test]
    fn no_sensitive_data() {
        assert_eq!(redact("Hello world"), "Hello world");
        assert_eq!(redact(""), "");
    }
}
