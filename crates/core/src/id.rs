//! Strongly-typed identifiers used across the client.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a user account, as issued by the backend.
///
/// The backend hands out integer IDs; the client never mints its own.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = i64::from_str(s).map_err(|e| DomainError::invalid_id(format!("UserId: {e}")))?;
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_string() {
        let id: UserId = "7".parse().unwrap();
        assert_eq!(id, UserId::new(7));
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn rejects_non_numeric() {
        let result = "seven".parse::<UserId>();
        assert!(matches!(result, Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&UserId::new(7)).unwrap();
        assert_eq!(json, "7");

        let id: UserId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_i64(), 42);
    }
}
