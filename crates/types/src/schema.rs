//! Declarative schema model for provider attributes.
//!
//! A [`SchemaBlock`] describes the shape of one record as seen by the hosting
//! configuration framework: an ordered map of field name to [`SchemaNode`],
//! where nested records appear as repeated blocks carrying their own
//! `SchemaBlock`. Each node carries exactly one [`SchemaStatus`]; modeling the
//! status as an enum makes the "required, optional and computed are mutually
//! exclusive" rule unrepresentable to violate.
//!
//! Every domain record exposes a `schema()` constructor returning its default
//! block with all nodes `Optional`. Adapters refine statuses at registration
//! time through the propagator in `shuffle-util`, which returns new trees and
//! leaves these defaults untouched.

use indexmap::IndexMap;

use crate::{
    AppAuth, AppDefinition, AppUsage, AppVersion, AuthConfig, AuthField, AuthParameter, ContactInfo, FolderMount,
    ParameterSchema, ReferenceInfo,
};

/// Lifecycle status of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaStatus {
    /// The practitioner must supply a value.
    Required,
    /// The practitioner may supply a value.
    #[default]
    Optional,
    /// The value is produced by the provider and read-only downstream.
    Computed,
}

/// Semantic type of a schema node.
///
/// `Block` and `StringList` are container kinds: status propagation treats
/// them specially (see `shuffle-util::schema`).
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    String,
    Int,
    Bool,
    /// List of scalar strings.
    StringList,
    /// Repeated nested block with its own field schema.
    Block(SchemaBlock),
}

/// One field of a schema block.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub status: SchemaStatus,
    pub description: Option<String>,
}

impl SchemaNode {
    fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            status: SchemaStatus::default(),
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    pub fn int() -> Self {
        Self::new(SchemaKind::Int)
    }

    pub fn bool() -> Self {
        Self::new(SchemaKind::Bool)
    }

    pub fn string_list() -> Self {
        Self::new(SchemaKind::StringList)
    }

    pub fn block(block: SchemaBlock) -> Self {
        Self::new(SchemaKind::Block(block))
    }

    /// Attach a human-readable description shown in generated documentation.
    pub fn describe(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Override the node's status in place of the `Optional` default.
    pub fn status(mut self, status: SchemaStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the node is a container kind (block or scalar list).
    pub fn is_container(&self) -> bool {
        matches!(self.kind, SchemaKind::Block(_) | SchemaKind::StringList)
    }

    /// The nested block schema, for `Block` nodes.
    pub fn nested(&self) -> Option<&SchemaBlock> {
        match &self.kind {
            SchemaKind::Block(block) => Some(block),
            _ => None,
        }
    }
}

/// Ordered field-name-to-node map describing one record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaBlock {
    pub fields: IndexMap<String, SchemaNode>,
}

impl SchemaBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous node under the same name.
    pub fn field(mut self, name: &str, node: SchemaNode) -> Self {
        self.fields.insert(name.to_string(), node);
        self
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        self.fields.iter()
    }
}

impl ContactInfo {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .field("name", SchemaNode::string())
            .field("url", SchemaNode::string())
    }
}

impl ReferenceInfo {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .field("documentation_url", SchemaNode::string())
            .field("github_url", SchemaNode::string())
    }
}

impl FolderMount {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .field("folder_mount", SchemaNode::bool())
            .field("source_folder", SchemaNode::string())
            .field("destination_folder", SchemaNode::string())
    }
}

impl ParameterSchema {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new().field("type", SchemaNode::string())
    }
}

impl AuthParameter {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .field("description", SchemaNode::string())
            .field("id", SchemaNode::string())
            .field("name", SchemaNode::string())
            .field("example", SchemaNode::string())
            .field("multiline", SchemaNode::bool())
            .field("required", SchemaNode::bool())
            .field("in", SchemaNode::string())
            .field("schema", SchemaNode::block(ParameterSchema::schema()))
            .field("scheme", SchemaNode::string())
    }
}

impl AuthConfig {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .field("type", SchemaNode::string())
            .field("required", SchemaNode::bool())
            .field("parameters", SchemaNode::block(AuthParameter::schema()))
            .field("redirect_uri", SchemaNode::string())
            .field("token_uri", SchemaNode::string())
            .field("refresh_uri", SchemaNode::string())
            .field("client_id", SchemaNode::string())
            .field("client_secret", SchemaNode::string())
    }
}

impl AppVersion {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .field("version", SchemaNode::string())
            .field("id", SchemaNode::string())
    }
}

impl AppUsage {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .field("workflow_id", SchemaNode::string())
            .field("nodes", SchemaNode::string_list())
    }
}

impl AuthField {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .field("key", SchemaNode::string())
            .field("value", SchemaNode::string())
    }
}

impl AppDefinition {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .field(
                "name",
                SchemaNode::string().describe("Name of the existing app to attach this authentication to"),
            )
            .field(
                "id",
                SchemaNode::string().describe("Identifier of the app to attach this authentication to"),
            )
            .field("is_valid", SchemaNode::bool())
            .field("link", SchemaNode::string())
            .field("app_version", SchemaNode::string())
            .field("sharing_config", SchemaNode::string())
            .field("generated", SchemaNode::bool())
            .field("downloaded", SchemaNode::bool())
            .field("sharing", SchemaNode::bool())
            .field("verified", SchemaNode::bool())
            .field("invalid", SchemaNode::bool())
            .field("activated", SchemaNode::bool())
            .field("tested", SchemaNode::bool())
            .field("hash", SchemaNode::string())
            .field("private_id", SchemaNode::string())
            .field("description", SchemaNode::string())
            .field("environment", SchemaNode::string())
            .field("small_image", SchemaNode::string())
            .field(
                "large_image",
                SchemaNode::string().describe("Image shown in the Shuffle UI, as data:image/png;base64,<BASE64>"),
            )
            .field("contact_info", SchemaNode::block(ContactInfo::schema()))
            .field("reference_info", SchemaNode::block(ReferenceInfo::schema()))
            .field("folder_mount", SchemaNode::block(FolderMount::schema()))
            .field("authentication", SchemaNode::block(AuthConfig::schema()))
            .field("tags", SchemaNode::string_list())
            .field("categories", SchemaNode::string_list())
            .field("created", SchemaNode::int())
            .field("edited", SchemaNode::int())
            .field("last_runtime", SchemaNode::int())
            .field("versions", SchemaNode::block(AppVersion::schema()))
            .field("loop_versions", SchemaNode::string_list())
            .field("owner", SchemaNode::string())
            .field("public", SchemaNode::bool())
            .field("reference_org", SchemaNode::string())
            .field("reference_url", SchemaNode::string())
            .field("action_file_path", SchemaNode::string())
            .field("documentation", SchemaNode::string())
    }
}

impl AppAuth {
    pub fn schema() -> SchemaBlock {
        SchemaBlock::new()
            .field("active", SchemaNode::bool())
            .field("label", SchemaNode::string().describe("Text shown for this authentication in the Shuffle UI"))
            .field("id", SchemaNode::string())
            .field(
                "app",
                SchemaNode::block(AppDefinition::schema()).describe("The app this authentication applies to"),
            )
            .field(
                "fields",
                SchemaNode::block(AuthField::schema()).describe(
                    "Credential values for this authentication. Keys must match the app's declared \
                     authentication parameters, one field per parameter",
                ),
            )
            .field("usage", SchemaNode::block(AppUsage::schema()))
            .field("workflow_count", SchemaNode::int())
            .field("node_count", SchemaNode::int())
            .field("org_id", SchemaNode::string())
            .field("created", SchemaNode::int())
            .field("edited", SchemaNode::int())
            .field("defined", SchemaNode::bool())
            .field("type", SchemaNode::string())
            .field("encrypted", SchemaNode::bool())
            .field("reference_workflow", SchemaNode::string())
    }
}
