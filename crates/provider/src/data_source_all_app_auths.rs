//! The all-app-authentications data source.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use shuffle_api::ShuffleClient;
use shuffle_types::{AppAuth, SchemaBlock, SchemaNode, SchemaStatus};
use shuffle_util::{Mappable, with_status};

use crate::{DataSource, ResourceData};

/// Adapter for the `shuffle_all_app_authentications` data source.
pub struct AllAppAuthsDataSource {
    client: Arc<ShuffleClient>,
}

impl AllAppAuthsDataSource {
    pub fn new(client: Arc<ShuffleClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for AllAppAuthsDataSource {
    fn schema(&self) -> Result<SchemaBlock> {
        let block = SchemaBlock::new().field(
            "all_app_auths",
            SchemaNode::block(AppAuth::schema())
                .describe("Every app authentication visible to the configured token"),
        );
        Ok(with_status(&block, SchemaStatus::Computed, true))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let auths = self
            .client
            .get_all_app_auths()
            .await
            .context("list app authentications")?;
        debug!(total = auths.len(), "flattening app authentications");

        let mapped: Vec<Value> = auths.iter().map(|auth| Value::Object(auth.to_tree())).collect();
        data.set("all_app_auths", Value::Array(mapped));
        // The listing has no natural identity; the read timestamp stands in.
        data.set_id(Utc::now().timestamp().to_string());
        Ok(())
    }
}
