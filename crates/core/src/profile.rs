//! Authenticated identity snapshot.

use serde::{Deserialize, Serialize};

use crate::{Role, UserId};

/// Server-issued description of the authenticated identity.
///
/// Fetched from the identity boundary (`/users/me`) and replaced wholesale on
/// each successful verification, never partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default = "Role::default_role")]
    pub role: Role,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl UserProfile {
    /// Human-readable name for headers and greetings; falls back to the
    /// email address when no name fields are set.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_payload() {
        let json = r#"{
            "id": 7,
            "email": "anna@example.com",
            "first_name": "Anna",
            "last_name": "Muster",
            "role": "Projektleiter",
            "is_superuser": false,
            "is_active": true
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, UserId::new(7));
        assert_eq!(profile.role.as_str(), "Projektleiter");
        assert!(!profile.is_superuser);
        assert_eq!(profile.display_name(), "Anna Muster");
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{ "id": 3, "email": "w@example.com" }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role.as_str(), "Worker");
        assert!(profile.is_active);
        assert!(!profile.is_superuser);
        assert_eq!(profile.display_name(), "w@example.com");
    }
}
