//! The managed app-authentication resource.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use shuffle_api::{ClientError, ShuffleClient};
use shuffle_types::{AppAuth, AppDefinition, AuthField, SchemaBlock, SchemaStatus};
use shuffle_util::{Mappable, ValueTree, random_hex_id, with_status_overrides};

use crate::{Resource, ResourceData};

/// Width in bytes of locally generated app identifiers.
const APP_ID_BYTES: usize = 16;

/// Adapter for the `shuffle_app_authentication` resource.
pub struct AppAuthResource {
    client: Arc<ShuffleClient>,
}

impl AppAuthResource {
    pub fn new(client: Arc<ShuffleClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for AppAuthResource {
    fn schema(&self) -> Result<SchemaBlock> {
        let schema = with_status_overrides(
            &AppAuth::schema(),
            SchemaStatus::Optional,
            &[
                ("id", SchemaStatus::Computed),
                ("label", SchemaStatus::Required),
                ("fields", SchemaStatus::Required),
                ("app.name", SchemaStatus::Required),
                ("app.id", SchemaStatus::Computed),
            ],
        )?;
        Ok(schema)
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let record = record_from_state(data)?;
        // Record the locally assigned app identifier before submitting.
        data.set("app", Value::Array(vec![Value::Object(record.app.to_tree())]));

        let id = self
            .client
            .upsert_app_auth(&record)
            .await
            .context("create app authentication")?;
        data.set_id(id);
        Ok(())
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.id().to_string();
        if id.is_empty() {
            return Ok(());
        }

        match self.client.get_app_auth_by_id(&id).await {
            Ok(record) => {
                write_record_to_state(&record, data);
                Ok(())
            }
            Err(ClientError::NotFound { .. }) => {
                warn!(%id, "app authentication vanished remotely, clearing local identity");
                data.clear_id();
                Ok(())
            }
            Err(error) => Err(error).context("read app authentication"),
        }
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let record = record_from_state(data)?;
        let remote_id = self
            .client
            .upsert_app_auth(&record)
            .await
            .context("update app authentication")?;
        debug!(%remote_id, "remote acknowledged update");
        Ok(())
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.id().to_string();
        if !id.is_empty() {
            self.client
                .delete_app_auth(&id)
                .await
                .context("delete app authentication")?;
        }
        data.clear_id();
        Ok(())
    }
}

/// Build the outbound record from declarative state.
///
/// Carries the resource identifier (empty on first create), forces the
/// record active, and assigns a random app identifier when the configuration
/// leaves it out.
pub(crate) fn record_from_state(data: &ResourceData) -> Result<AppAuth> {
    let label = data.get_str("label").unwrap_or_default().to_string();
    if label.is_empty() {
        bail!("label is required");
    }

    let app_block = match data.first_block("app") {
        Some(block) => block,
        None => bail!("app block is required"),
    };
    let name = block_str(app_block, "name");
    if name.is_empty() {
        bail!("app.name is required");
    }

    let mut app_id = block_str(app_block, "id");
    if app_id.is_empty() {
        app_id = random_hex_id(APP_ID_BYTES);
        debug!(%app_id, "assigned generated app identifier");
    }

    let fields: Vec<AuthField> = data
        .blocks("fields")
        .into_iter()
        .map(|block| AuthField {
            key: block_str(block, "key"),
            value: block_str(block, "value"),
        })
        .collect();

    Ok(AppAuth {
        active: true,
        label,
        id: data.id().to_string(),
        app: AppDefinition {
            name,
            id: app_id,
            large_image: block_str(app_block, "large_image"),
            ..Default::default()
        },
        fields,
        ..Default::default()
    })
}

/// Flatten the canonical remote record into state, one attribute per entry.
fn write_record_to_state(record: &AppAuth, data: &mut ResourceData) {
    for (key, value) in record.to_tree() {
        data.set(&key, value);
    }
}

fn block_str(block: &ValueTree, key: &str) -> String {
    block.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shuffle_types::SchemaNode;

    fn state(value: Value) -> ResourceData {
        ResourceData::new(value.as_object().expect("object literal").clone())
    }

    #[test]
    fn builds_record_from_declarative_state() {
        let data = state(json!({
            "label": "my slack auth",
            "app": [ { "name": "Slack", "id": "abc123", "large_image": "data:image/png;base64,xyz" } ],
            "fields": [
                { "key": "api_token", "value": "xoxb" },
                { "key": "url", "value": "https://hooks.example.com" }
            ]
        }));

        let record = record_from_state(&data).expect("build record");
        assert!(record.active);
        assert_eq!(record.label, "my slack auth");
        assert_eq!(record.id, "");
        assert_eq!(record.app.name, "Slack");
        assert_eq!(record.app.id, "abc123");
        assert_eq!(record.app.large_image, "data:image/png;base64,xyz");
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.fields[1].key, "url");
    }

    #[test]
    fn generates_an_app_id_when_missing() {
        let data = state(json!({
            "label": "my auth",
            "app": [ { "name": "Slack" } ],
            "fields": [ { "key": "k", "value": "v" } ]
        }));

        let record = record_from_state(&data).expect("build record");
        assert_eq!(record.app.id.len(), 32);
        assert!(record.app.id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn carries_the_resource_id_on_update() {
        let mut data = state(json!({
            "label": "my auth",
            "app": [ { "name": "Slack" } ]
        }));
        data.set_id("auth-7");

        let record = record_from_state(&data).expect("build record");
        assert_eq!(record.id, "auth-7");
    }

    #[test]
    fn rejects_state_without_label_or_app() {
        let error = record_from_state(&state(json!({ "app": [ { "name": "Slack" } ] }))).expect_err("label missing");
        assert!(error.to_string().contains("label"));

        let error = record_from_state(&state(json!({ "label": "x" }))).expect_err("app missing");
        assert!(error.to_string().contains("app block"));

        let error =
            record_from_state(&state(json!({ "label": "x", "app": [ {} ] }))).expect_err("app name missing");
        assert!(error.to_string().contains("app.name"));
    }

    #[test]
    fn schema_statuses_follow_the_resource_surface() {
        let client = Arc::new(ShuffleClient::new(Some("http://localhost:3001"), Some("t")).expect("client"));
        let schema = AppAuthResource::new(client).schema().expect("schema");

        assert_eq!(schema.get("label").expect("label").status, SchemaStatus::Required);
        assert_eq!(schema.get("fields").expect("fields").status, SchemaStatus::Required);
        assert_eq!(schema.get("id").expect("id").status, SchemaStatus::Computed);
        assert_eq!(schema.get("app").expect("app").status, SchemaStatus::Optional);
        assert_eq!(schema.get("active").expect("active").status, SchemaStatus::Optional);

        let app = schema.get("app").and_then(SchemaNode::nested).expect("app block");
        assert_eq!(app.get("name").expect("name").status, SchemaStatus::Required);
        assert_eq!(app.get("id").expect("id").status, SchemaStatus::Computed);
        assert_eq!(app.get("large_image").expect("large_image").status, SchemaStatus::Optional);
    }
}
