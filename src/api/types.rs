//! API request and response types for the shell BFF.

use serde::{Deserialize, Serialize};

use crate::domain::{RemoteComponent, Route, SlotMapping, UserProfile, WorkspaceIdentity};

// ============================================================================
// Workspace Config
// ============================================================================

/// Workspace config request body
#[derive(Debug, Serialize)]
pub(super) struct GetWorkspaceConfigRequest {
    /// Application path the shell is served under
    pub url: String,
}

/// Workspace section of the workspace config response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceInfo {
    pub name: String,
    pub base_url: String,
}

impl WorkspaceInfo {
    /// Identity published to shared state. Portal and workspace names are
    /// the same value.
    pub fn identity(&self) -> WorkspaceIdentity {
        WorkspaceIdentity {
            base_url: self.base_url.clone(),
            portal_name: self.name.clone(),
            workspace_name: self.name.clone(),
            microfrontend_registrations: Vec::new(),
        }
    }
}

/// Theme as delivered by the BFF, with its properties still JSON-encoded
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// JSON object string: `{"group": {"key": "value"}}`
    pub properties: String,
}

/// Workspace config response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWorkspaceConfigResponse {
    pub workspace: WorkspaceInfo,
    #[serde(default)]
    pub routes: Vec<Route>,
    pub theme: ThemeInfo,
    #[serde(default)]
    pub remote_components: Vec<RemoteComponent>,
    #[serde(default)]
    pub shell_remote_components: Vec<SlotMapping>,
}

// ============================================================================
// User Profile
// ============================================================================

/// User profile response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserProfileResponse {
    pub user_profile: UserProfile,
}

// ============================================================================
// API Status Codes
// ============================================================================

/// Coarse classification of BFF error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    /// Invalid request arguments
    InvalidArgument,
    /// Authentication failed, token missing or expired
    Unauthenticated,
    /// Authenticated but not allowed
    PermissionDenied,
    /// No workspace / profile for the request
    NotFound,
    /// Backend unavailable or failing
    Unavailable,
    /// Anything else
    Unknown,
}

impl ApiStatus {
    /// Convert from HTTP status code to internal API status
    pub fn from_http_status(http_status: u16) -> Self {
        match http_status {
            400 => ApiStatus::InvalidArgument,
            401 => ApiStatus::Unauthenticated,
            403 => ApiStatus::PermissionDenied,
            404 => ApiStatus::NotFound,
            500..=599 => ApiStatus::Unavailable,
            _ => ApiStatus::Unknown,
        }
    }

    /// Get the error message for this status
    pub fn error_message(&self) -> &'static str {
        match self {
            ApiStatus::InvalidArgument => "Invalid request",
            ApiStatus::Unauthenticated => "Authentication failed",
            ApiStatus::PermissionDenied => "Permission denied",
            ApiStatus::NotFound => "Not found",
            ApiStatus::Unavailable => "Service temporarily unavailable",
            ApiStatus::Unknown => "Unknown error occurred",
        }
    }
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error_message())
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// API error with status code and details.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: ApiStatus,
    /// HTTP status code
    pub http_status: u16,
    pub message: String,
    /// Request ID (for debugging)
    pub request_id: Option<String>,
}

impl ApiError {
    /// Create from HTTP status code and response body
    pub fn from_http_response(http_status: u16, body: String, request_id: Option<String>) -> Self {
        let status = ApiStatus::from_http_status(http_status);
        let body = body.trim();
        let message = if body.is_empty() {
            format!("BFF error (HTTP {}): {}", http_status, status.error_message())
        } else {
            format!("BFF error (HTTP {}): {}", http_status, body)
        };

        Self {
            status,
            http_status,
            message,
            request_id,
        }
    }

    /// Whether the error indicates a credential problem
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.status,
            ApiStatus::Unauthenticated | ApiStatus::PermissionDenied
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_config_response_parses() {
        let json = r##"{
            "workspace": {"name": "acme", "baseUrl": "/x"},
            "routes": [{
                "url": "http://host/x/admin",
                "baseUrl": "/x/admin",
                "remoteEntryUrl": "http://host/mfe/admin/remoteEntry.js",
                "appId": "admin-ui",
                "productName": "admin",
                "exposedModule": "./AdminModule",
                "pathMatch": "prefix"
            }],
            "theme": {"name": "default", "properties": "{\"general\":{\"primary-color\":\"#000\"}}"},
            "remoteComponents": [],
            "shellRemoteComponents": [{"slotName": "menu", "remoteComponents": ["main-menu"]}]
        }"##;

        let response: GetWorkspaceConfigResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.workspace.name, "acme");
        assert_eq!(response.routes.len(), 1);
        assert_eq!(response.shell_remote_components[0].slot_name, "menu");

        let identity = response.workspace.identity();
        assert_eq!(identity.base_url, "/x");
        assert_eq!(identity.portal_name, "acme");
        assert_eq!(identity.workspace_name, "acme");
        assert!(identity.microfrontend_registrations.is_empty());
    }

    #[test]
    fn test_api_error_from_http_response() {
        let err = ApiError::from_http_response(401, String::new(), None);
        assert!(err.is_auth_error());
        assert_eq!(err.to_string(), "BFF error (HTTP 401): Authentication failed");

        let err = ApiError::from_http_response(503, "maintenance".to_string(), None);
        assert_eq!(err.status, ApiStatus::Unavailable);
        assert!(err.to_string().contains("maintenance"));
    }
}
