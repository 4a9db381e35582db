//! Outbound mail boundary.
//!
//! The coordinator only composes notices; delivery is a collaborator behind
//! the `Mailer` trait and happens after the transaction commits.

use async_trait::async_trait;
use tracing::info;

use crate::errors::domain::DomainError;
use crate::logging::pii::Redacted;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub const KICKED_SUBJECT: &str = "Codefray - Removed from party";

/// Notice sent to a member who was kicked from a party.
pub fn kick_notice(username: &str, email: &str, match_title: &str) -> OutboundMail {
    OutboundMail {
        to: email.to_string(),
        subject: KICKED_SUBJECT.to_string(),
        body: format!(
            "Hello {username},\n\n\
             You have been removed from your party for the match \"{match_title}\".\n\
             You can join another party at any time before the match starts.\n"
        ),
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutboundMail) -> Result<(), DomainError>;
}

/// Logs outbound mail instead of delivering it. Deployments wire a real
/// transport behind the same trait.
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), DomainError> {
        info!(
            to = %Redacted(&mail.to),
            subject = %mail.subject,
            "outbound mail"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kick_notice_addresses_the_target() {
        let mail = kick_notice("brook", "brook@example.test", "Spring Open");
        assert_eq!(mail.to, "brook@example.test");
        assert_eq!(mail.subject, KICKED_SUBJECT);
        assert!(mail.body.contains("brook"));
        assert!(mail.body.contains("Spring Open"));
    }
}
