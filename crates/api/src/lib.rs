//! Shuffle API client utilities.
//!
//! This crate provides a lightweight client for the app-authentication
//! endpoints of the Shuffle SOAR REST API. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Discovering configuration from `SHUFFLE_API_BASE` / `SHUFFLE_API_TOKEN`
//! - Validating the base URL for safety
//! - Attaching the bearer token and JSON content type to every request
//!
//! The primary entry point is [`ShuffleClient`]. Create an instance via
//! [`ShuffleClient::new`], then call one of the four operations.
//!
//! # Example
//!
//! ```ignore
//! use shuffle_api::ShuffleClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), shuffle_api::ClientError> {
//!     let client = ShuffleClient::new(None, Some("my-api-token"))?;
//!     let auths = client.get_all_app_auths().await?;
//!     println!("{} app authentications", auths.len());
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use reqwest::{Client, header};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use shuffle_types::{AppAuth, ListAppAuthResponse, UpsertAppAuthResponse};

/// Environment variable overriding the default API base URL.
pub const API_BASE_ENV: &str = "SHUFFLE_API_BASE";
/// Environment variable supplying the API token when the configuration does not.
pub const API_TOKEN_ENV: &str = "SHUFFLE_API_TOKEN";

/// Public Shuffle instance used when no base URL is configured.
const DEFAULT_BASE_URL: &str = "https://shuffler.io";
/// Collection path for app-authentication records.
const APP_AUTH_PATH: &str = "/api/v1/apps/authentication";
/// Hostnames allowed to use plain HTTP for local development.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Errors surfaced by [`ShuffleClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no API token provided; set {API_TOKEN_ENV} or configure api_token")]
    MissingToken,
    #[error("API token is not a valid header value")]
    InvalidToken,
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("remote API refused the request: {reason}")]
    Api { reason: String },
    #[error("app authentication '{id}' not found")]
    NotFound { id: String },
}

/// Thin wrapper around a configured `reqwest::Client` for Shuffle API access.
///
/// The client pre-configures the bearer token and JSON content-type headers
/// and issues every request against a validated base URL. It holds no mutable
/// state and is cheap to clone.
#[derive(Debug, Clone)]
pub struct ShuffleClient {
    pub base_url: String,
    pub http: Client,
}

impl ShuffleClient {
    /// Construct a [`ShuffleClient`] from explicit settings with environment
    /// fallbacks.
    ///
    /// Resolution order for the base URL: the `base_url` argument,
    /// `SHUFFLE_API_BASE`, then the public `https://shuffler.io` instance.
    /// Resolution order for the token: the `api_token` argument, then
    /// `SHUFFLE_API_TOKEN`. Non-localhost hosts must use HTTPS.
    pub fn new(base_url: Option<&str>, api_token: Option<&str>) -> Result<Self, ClientError> {
        let api_token = match api_token {
            Some(token) => token.to_string(),
            None => env::var(API_TOKEN_ENV).map_err(|_| ClientError::MissingToken)?,
        };

        let base_url = match base_url {
            Some(base) => base.to_string(),
            None => env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
        };
        let base_url = base_url.trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        let authorization = format!("Bearer {}", api_token);
        default_headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&authorization).map_err(|_| ClientError::InvalidToken)?,
        );
        default_headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json; charset=utf-8"),
        );

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { base_url, http })
    }

    /// Create or update an app authentication, returning the remote identifier.
    ///
    /// The remote API uses a single PUT against the collection URL for both
    /// cases; a populated `id` on the record selects the update path.
    pub async fn upsert_app_auth(&self, auth: &AppAuth) -> Result<String, ClientError> {
        let url = self.collection_url();
        debug!(%url, label = %auth.label, app = %auth.app.name, "submitting app authentication");

        let payload = serde_json::to_vec(auth)?;
        let response = self.http.put(&url).body(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: UpsertAppAuthResponse = serde_json::from_str(&body)?;
        if !envelope.success {
            warn!(%status, reason = %envelope.reason, "remote refused app authentication");
            let reason = if envelope.reason.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                envelope.reason
            };
            return Err(ClientError::Api { reason });
        }

        debug!(%status, id = %envelope.id, "app authentication stored");
        Ok(envelope.id)
    }

    /// Delete an app authentication by identifier.
    ///
    /// Fire-and-forget: transport failures propagate, but a remote response
    /// indicating failure is logged and swallowed. Orphaned remote records
    /// are possible when the remote refuses silently.
    pub async fn delete_app_auth(&self, id: &str) -> Result<(), ClientError> {
        let url = self.record_url(id);
        debug!(%url, "deleting app authentication");

        let response = self.http.delete(&url).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<UpsertAppAuthResponse>(&body) {
            Ok(envelope) if !envelope.success => {
                warn!(%status, reason = %envelope.reason, "remote reported delete failure, continuing");
            }
            Ok(_) => debug!(%status, "app authentication deleted"),
            Err(_) => warn!(%status, %body, "unparseable delete response, continuing"),
        }

        Ok(())
    }

    /// Fetch every app authentication visible to the token's organization.
    pub async fn get_all_app_auths(&self) -> Result<Vec<AppAuth>, ClientError> {
        let url = self.collection_url();
        debug!(%url, "listing app authentications");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ListAppAuthResponse = serde_json::from_str(&body)?;
        if !envelope.success {
            warn!(%status, "remote reported unsuccessful listing");
        }
        Ok(envelope.data)
    }

    /// Fetch one app authentication by identifier.
    ///
    /// The collection endpoint has no per-record variant, so this lists and
    /// scans linearly; first match wins. Acceptable at expected collection
    /// sizes.
    pub async fn get_app_auth_by_id(&self, id: &str) -> Result<AppAuth, ClientError> {
        let auths = self.get_all_app_auths().await?;
        debug!(%id, total = auths.len(), "scanning for app authentication");

        find_by_id(&auths, id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound { id: id.to_string() })
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, APP_AUTH_PATH)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }
}

fn find_by_id<'a>(auths: &'a [AppAuth], id: &str) -> Option<&'a AppAuth> {
    auths.iter().find(|auth| auth.id == id)
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS and the URL must include a host
fn validate_base_url(base: &str) -> Result<(), ClientError> {
    let parsed = Url::parse(base).map_err(|error| ClientError::InvalidBaseUrl {
        url: base.to_string(),
        reason: error.to_string(),
    })?;

    let host = parsed.host_str().ok_or_else(|| ClientError::InvalidBaseUrl {
        url: base.to_string(),
        reason: "missing host".to_string(),
    })?;

    if LOCALHOST_DOMAINS.iter().any(|allowed| host.eq_ignore_ascii_case(allowed)) {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        return Err(ClientError::InvalidBaseUrl {
            url: base.to_string(),
            reason: format!("scheme '{}' is only allowed for localhost; use https", parsed.scheme()),
        });
    }

    Ok(())
}
