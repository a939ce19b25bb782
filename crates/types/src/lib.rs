//! Shared type definitions for the Shuffle provider.
//!
//! This crate holds the domain records exchanged with the Shuffle SOAR REST
//! API, the JSON response envelopes wrapping them, and the declarative
//! [`schema`] model used to describe those records to the hosting
//! configuration framework.
//!
//! All records decode leniently: the remote API omits empty members, so every
//! field falls back to its default value. Wire keys are the snake_case field
//! names; Rust-keyword collisions (`type`, `in`) use raw identifiers so the
//! serialized name stays untouched.

use serde::{Deserialize, Serialize};

pub mod schema;

pub use schema::{SchemaBlock, SchemaKind, SchemaNode, SchemaStatus};

/// One user-supplied credential value for an app authentication.
///
/// The key must match the name of an authentication parameter declared by the
/// remote app definition; the remote API rejects mismatched sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthField {
    pub key: String,
    pub value: String,
}

/// Maintainer contact details published with an app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub name: String,
    pub url: String,
}

/// External documentation links for an app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceInfo {
    pub documentation_url: String,
    pub github_url: String,
}

/// Folder mount configuration for apps that run with a mounted directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderMount {
    pub folder_mount: bool,
    pub source_folder: String,
    pub destination_folder: String,
}

/// Declared type of a single authentication parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSchema {
    pub r#type: String,
}

/// One authentication parameter declared by an app definition.
///
/// Parameters describe what credential values the app expects; the
/// [`AuthField`] list submitted with an [`AppAuth`] must line up with them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthParameter {
    pub description: String,
    pub id: String,
    pub name: String,
    pub example: String,
    pub multiline: bool,
    pub required: bool,
    pub r#in: String,
    pub schema: ParameterSchema,
    pub scheme: String,
}

/// Authentication scheme declared by an app definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub r#type: String,
    pub required: bool,
    pub parameters: Vec<AuthParameter>,
    pub redirect_uri: String,
    pub token_uri: String,
    pub refresh_uri: String,
    pub client_id: String,
    pub client_secret: String,
}

/// One published version of an app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppVersion {
    pub version: String,
    pub id: String,
}

/// Workflow usage counters reported for an app authentication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppUsage {
    pub workflow_id: String,
    pub nodes: Vec<String>,
}

/// The app definition an authentication is linked to.
///
/// Only `name`, `id` and `large_image` are meaningful on submission; the
/// remaining members mirror what the remote API reports back when the
/// canonical state is re-read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppDefinition {
    /// Name of an existing app to link the authentication to.
    pub name: String,
    /// Identifier of the app to link the authentication to.
    pub id: String,
    pub is_valid: bool,
    pub link: String,
    pub app_version: String,
    pub sharing_config: String,
    pub generated: bool,
    pub downloaded: bool,
    pub sharing: bool,
    pub verified: bool,
    pub invalid: bool,
    pub activated: bool,
    pub tested: bool,
    pub hash: String,
    pub private_id: String,
    pub description: String,
    pub environment: String,
    pub small_image: String,
    /// Image shown in the Shuffle UI, as a `data:image/png;base64,...` string.
    pub large_image: String,
    pub contact_info: ContactInfo,
    pub reference_info: ReferenceInfo,
    pub folder_mount: FolderMount,
    pub authentication: AuthConfig,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub created: i64,
    pub edited: i64,
    pub last_runtime: i64,
    pub versions: Vec<AppVersion>,
    pub loop_versions: Vec<String>,
    pub owner: String,
    pub public: bool,
    pub reference_org: String,
    pub reference_url: String,
    pub action_file_path: String,
    pub documentation: String,
}

/// An app-authentication record: the unit managed by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppAuth {
    pub active: bool,
    /// Text shown for this authentication in the Shuffle UI.
    pub label: String,
    /// Remote identifier, assigned by the server on first submission.
    pub id: String,
    pub app: AppDefinition,
    /// Credential values; must line up with the app's declared parameters.
    pub fields: Vec<AuthField>,
    pub usage: Vec<AppUsage>,
    pub workflow_count: i64,
    pub node_count: i64,
    pub org_id: String,
    pub created: i64,
    pub edited: i64,
    pub defined: bool,
    pub r#type: String,
    pub encrypted: bool,
    pub reference_workflow: String,
}

/// Envelope returned by the list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListAppAuthResponse {
    pub success: bool,
    pub data: Vec<AppAuth>,
}

/// Envelope returned by the create-or-update endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpsertAppAuthResponse {
    pub success: bool,
    pub id: String,
    /// Failure message supplied by the server when `success` is false.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_auth_decodes_from_sparse_json() {
        let json = r#"{
            "label": "my slack auth",
            "app": { "name": "Slack", "id": "abc123" },
            "fields": [ { "key": "api_token", "value": "xoxb" } ]
        }"#;

        let auth: AppAuth = serde_json::from_str(json).expect("deserialize AppAuth");
        assert_eq!(auth.label, "my slack auth");
        assert_eq!(auth.app.name, "Slack");
        assert_eq!(auth.app.id, "abc123");
        assert_eq!(auth.fields.len(), 1);
        assert_eq!(auth.fields[0].key, "api_token");
        assert!(!auth.active);
        assert_eq!(auth.id, "");
        assert_eq!(auth.workflow_count, 0);
    }

    #[test]
    fn keyword_fields_keep_their_wire_names() {
        let mut auth = AppAuth::default();
        auth.r#type = "oauth2".into();
        auth.app.authentication.r#type = "bearer".into();
        auth.app.authentication.parameters.push(AuthParameter {
            r#in: "header".into(),
            ..Default::default()
        });

        let value = serde_json::to_value(&auth).expect("serialize AppAuth");
        assert_eq!(value["type"], "oauth2");
        assert_eq!(value["app"]["authentication"]["type"], "bearer");
        assert_eq!(value["app"]["authentication"]["parameters"][0]["in"], "header");
    }

    #[test]
    fn envelopes_tolerate_missing_members() {
        let list: ListAppAuthResponse = serde_json::from_str("{}").expect("deserialize list envelope");
        assert!(!list.success);
        assert!(list.data.is_empty());

        let upsert: UpsertAppAuthResponse =
            serde_json::from_str(r#"{"success": true, "id": "xyz"}"#).expect("deserialize upsert envelope");
        assert!(upsert.success);
        assert_eq!(upsert.id, "xyz");
        assert_eq!(upsert.reason, "");
    }
}
