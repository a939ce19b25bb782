//! Provider adapters binding the Shuffle client to a declarative lifecycle.
//!
//! The hosting configuration framework drives resources through four verbs
//! (create, read, update, delete) and data sources through one (read), in
//! both cases handing over a [`ResourceData`] state object. This crate
//! defines that boundary ([`Resource`], [`DataSource`]) and implements it for
//! the two surfaces the provider exposes:
//!
//! - [`AppAuthResource`]: one managed app-authentication record
//! - [`AllAppAuthsDataSource`]: the full list of app authentications
//!
//! [`ShuffleProvider::configure`] turns the provider configuration into the
//! shared [`ShuffleClient`]; the client is the only state shared across
//! callback invocations and is immutable once built.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use shuffle_api::ShuffleClient;
use shuffle_types::{SchemaBlock, SchemaNode, SchemaStatus};
use shuffle_util::ValueTree;

mod data_source_all_app_auths;
mod resource_app_auth;
mod state;

pub use data_source_all_app_auths::AllAppAuthsDataSource;
pub use resource_app_auth::AppAuthResource;
pub use state::ResourceData;

/// Registry name of the managed app-authentication resource.
pub const APP_AUTH_RESOURCE: &str = "shuffle_app_authentication";
/// Registry name of the all-app-authentications data source.
pub const ALL_APP_AUTHS_DATA_SOURCE: &str = "shuffle_all_app_authentications";

/// A managed resource as seen by the hosting framework.
#[async_trait]
pub trait Resource: Send + Sync {
    fn schema(&self) -> Result<SchemaBlock>;
    async fn create(&self, data: &mut ResourceData) -> Result<()>;
    async fn read(&self, data: &mut ResourceData) -> Result<()>;
    async fn update(&self, data: &mut ResourceData) -> Result<()>;
    async fn delete(&self, data: &mut ResourceData) -> Result<()>;
}

/// A read-only data source as seen by the hosting framework.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn schema(&self) -> Result<SchemaBlock>;
    async fn read(&self, data: &mut ResourceData) -> Result<()>;
}

/// The configured provider: one shared client plus the registered surfaces.
#[derive(Debug)]
pub struct ShuffleProvider {
    client: Arc<ShuffleClient>,
}

impl ShuffleProvider {
    /// Schema of the provider configuration block.
    pub fn config_schema() -> SchemaBlock {
        SchemaBlock::new()
            .field(
                "base_url",
                SchemaNode::string().describe("Base URL of the Shuffle instance; defaults to https://shuffler.io"),
            )
            .field(
                "api_token",
                SchemaNode::string()
                    .status(SchemaStatus::Required)
                    .describe("Shuffle API token used as the bearer credential"),
            )
    }

    /// Build the provider from its configuration tree.
    ///
    /// Reads the two settings (`base_url` optional, `api_token` required with
    /// an environment fallback) once; the resulting client lives for the rest
    /// of the provider process.
    pub fn configure(config: &ValueTree) -> Result<Self> {
        let base_url = config.get("base_url").and_then(Value::as_str).filter(|s| !s.is_empty());
        let api_token = config.get("api_token").and_then(Value::as_str).filter(|s| !s.is_empty());

        let client = ShuffleClient::new(base_url, api_token).context("configure Shuffle client")?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// The managed resources this provider registers, keyed by type name.
    pub fn resources(&self) -> IndexMap<String, Box<dyn Resource>> {
        let mut resources: IndexMap<String, Box<dyn Resource>> = IndexMap::new();
        resources.insert(
            APP_AUTH_RESOURCE.to_string(),
            Box::new(AppAuthResource::new(self.client.clone())),
        );
        resources
    }

    /// The data sources this provider registers, keyed by type name.
    pub fn data_sources(&self) -> IndexMap<String, Box<dyn DataSource>> {
        let mut sources: IndexMap<String, Box<dyn DataSource>> = IndexMap::new();
        sources.insert(
            ALL_APP_AUTHS_DATA_SOURCE.to_string(),
            Box::new(AllAppAuthsDataSource::new(self.client.clone())),
        );
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> ValueTree {
        value.as_object().expect("object literal").clone()
    }

    #[test]
    fn configure_requires_an_api_token() {
        temp_env::with_var(shuffle_api::API_TOKEN_ENV, None::<&str>, || {
            let error = ShuffleProvider::configure(&tree(json!({ "base_url": "https://shuffler.io" })))
                .expect_err("token required");
            assert!(error.to_string().contains("configure Shuffle client"));
        });
    }

    #[test]
    fn configure_accepts_explicit_settings() {
        let provider = ShuffleProvider::configure(&tree(json!({
            "base_url": "http://localhost:3001",
            "api_token": "unit-token"
        })))
        .expect("configure provider");

        assert_eq!(provider.client.base_url, "http://localhost:3001");
        assert!(provider.resources().contains_key(APP_AUTH_RESOURCE));
        assert!(provider.data_sources().contains_key(ALL_APP_AUTHS_DATA_SOURCE));
    }

    #[test]
    fn config_schema_marks_the_token_required() {
        let schema = ShuffleProvider::config_schema();
        assert_eq!(schema.get("api_token").expect("api_token").status, SchemaStatus::Required);
        assert_eq!(schema.get("base_url").expect("base_url").status, SchemaStatus::Optional);
    }
}
