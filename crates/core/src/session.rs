//! Signed-in / signed-out status and the visitor's profile.

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Email};

/// Profile data handed over by a login or signup form.
///
/// `display_name` is optional; when it is missing or blank the profile name
/// is built from the first and last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub uid: AccountId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Profile of the signed-in visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub uid: AccountId,
}

impl From<ProfileInput> for UserProfile {
    fn from(input: ProfileInput) -> Self {
        let name = input
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("{} {}", input.first_name, input.last_name));

        Self {
            name,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            uid: input.uid,
        }
    }
}

/// Session status. The flag and the profile live in one value so they are
/// always set and cleared together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Session {
    #[default]
    SignedOut,
    SignedIn { profile: UserProfile },
}

impl Session {
    /// Whether someone is signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }

    /// The signed-in profile, if any.
    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::SignedIn { profile } => Some(profile),
            Self::SignedOut => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(display_name: Option<&str>) -> ProfileInput {
        ProfileInput {
            uid: AccountId::generate(),
            email: Email::parse("maya@studio.io").unwrap(),
            first_name: "Maya".to_string(),
            last_name: "Okafor".to_string(),
            display_name: display_name.map(str::to_string),
        }
    }

    #[test]
    fn test_display_name_wins_when_present() {
        let profile = UserProfile::from(input(Some("DJ Maya")));
        assert_eq!(profile.name, "DJ Maya");
    }

    #[test]
    fn test_missing_or_blank_display_name_falls_back() {
        assert_eq!(UserProfile::from(input(None)).name, "Maya Okafor");
        assert_eq!(UserProfile::from(input(Some("  "))).name, "Maya Okafor");
    }

    #[test]
    fn test_session_accessors() {
        let signed_out = Session::default();
        assert!(!signed_out.is_signed_in());
        assert!(signed_out.profile().is_none());

        let signed_in = Session::SignedIn {
            profile: UserProfile::from(input(None)),
        };
        assert!(signed_in.is_signed_in());
        assert_eq!(signed_in.profile().unwrap().first_name, "Maya");
    }
}
