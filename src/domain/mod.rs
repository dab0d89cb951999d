//! Domain types shared across modules.
//!
//! These are the values the startup initializers hand off to shared state.
//! Most of them arrive unchanged from the shell BFF, so they double as wire
//! types for the API module.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity of the workspace the shell is serving.
///
/// Published once by the workspace-config initializer. Portal and workspace
/// names are both taken from the workspace name returned by the BFF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceIdentity {
    pub base_url: String,
    pub portal_name: String,
    pub workspace_name: String,
    #[serde(default)]
    pub microfrontend_registrations: Vec<MicrofrontendRegistration>,
}

/// Legacy microfrontend registration entry. The shell always publishes an
/// empty list; routes are the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrofrontendRegistration {
    pub app_id: String,
    pub base_url: String,
}

/// A route served by a remote application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Absolute URL of the route (including host), as computed by the BFF
    #[serde(default)]
    pub url: String,
    /// Path prefix under which the remote application is mounted
    pub base_url: String,
    pub remote_entry_url: String,
    pub app_id: String,
    pub product_name: String,
    #[serde(default)]
    pub technology: Option<String>,
    pub exposed_module: String,
    #[serde(default)]
    pub path_match: Option<PathMatch>,
    #[serde(default)]
    pub remote_name: Option<String>,
    #[serde(default)]
    pub element_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// How a route's base URL is matched against a requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMatch {
    Full,
    Prefix,
}

/// A remote component that can be rendered into a shell slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteComponent {
    pub name: String,
    pub base_url: String,
    pub remote_entry_url: String,
    pub app_id: String,
    pub product_name: String,
    pub exposed_module: String,
    #[serde(default)]
    pub technology: Option<String>,
    #[serde(default)]
    pub remote_name: Option<String>,
}

/// Mapping of a shell slot to the remote components rendered into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotMapping {
    pub slot_name: String,
    #[serde(default)]
    pub remote_components: Vec<String>,
}

/// Theme property groups, e.g. `{"general": {"primary-color": "#000"}}`.
///
/// Groups and leaves are kept as raw JSON; only the outer object is required.
pub type ThemeProperties = BTreeMap<String, serde_json::Value>;

/// A theme with its properties parsed into structured groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    pub properties: ThemeProperties,
}

/// Profile of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub person: UserPerson,
    #[serde(default)]
    pub account_settings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPerson {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<UserPersonAddress>,
    #[serde(default)]
    pub phone: Option<UserPersonPhone>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPersonAddress {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub street_no: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPersonPhone {
    #[serde(default, rename = "type")]
    pub phone_type: Option<PhoneType>,
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneType {
    Mobile,
    Landline,
}

impl UserPerson {
    /// Name to show for the user: display name, else "first last", else email.
    pub fn preferred_name(&self) -> Option<String> {
        if let Some(name) = self.display_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(name.to_string());
        }

        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return Some(full);
        }

        self.email.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_name_fallbacks() {
        let mut person = UserPerson {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(person.preferred_name().as_deref(), Some("Ada Lovelace"));

        person.display_name = Some("Countess".to_string());
        assert_eq!(person.preferred_name().as_deref(), Some("Countess"));

        let person = UserPerson {
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(person.preferred_name().as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_user_profile_deserializes_phone_type() {
        let json = r#"{
            "userId": "u-1",
            "organization": "acme",
            "person": {"email": "a@acme.io", "phone": {"type": "MOBILE", "number": "123"}}
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.organization.as_deref(), Some("acme"));
        let phone = profile.person.phone.unwrap();
        assert_eq!(phone.phone_type, Some(PhoneType::Mobile));
    }
}
