//! Caller identity attached to every user-scoped request.

use std::fmt::{self, Display, Formatter};

use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

/// Opaque user id the backend keys chat and analysis history by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Wrap an existing id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] when the id is blank.
    pub fn new(user_id: impl Into<String>) -> ClientResult<Self> {
        let user_id = user_id.into();
        let trimmed = user_id.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidInput {
                field: "user_id",
                reason: "must not be empty",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Fresh random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Id as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ClientIdentity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_refused() {
        assert!(ClientIdentity::new("  ").is_err());
        assert!(matches!(
            ClientIdentity::new(" user-1 ").map(|id| id.to_string()),
            Ok(id) if id == "user-1"
        ));
    }

    #[test]
    fn generated_ids_are_unique_uuids() {
        let first = ClientIdentity::generate();
        let second = ClientIdentity::generate();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }
}
