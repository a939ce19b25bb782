//! Structural field mapper.
//!
//! Converts a typed domain record into a [`ValueTree`]: the untyped,
//! string-keyed representation the configuration framework stores as state.
//! The conversion is generic over the record's serialized shape, so new
//! nested fields need no hand-written mapping code. A record opts in by
//! implementing [`Mappable`] and inherits the whole policy:
//!
//! - keys are the serialized field names, lower-cased
//! - empty strings are treated as absent and omitted
//! - a nested record becomes a one-element list of its mapped tree
//!   (the block-as-list convention), omitted when the tree is empty
//! - a list of records maps element-wise, length and order preserved,
//!   omitted when no element produced anything
//! - everything else is dropped, never an error
//!
//! The mapper is best-effort by contract: it only omits. Callers must
//! tolerate missing keys; in particular an empty string and a genuinely
//! absent value are indistinguishable in the output.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use shuffle_types::{
    AppAuth, AppDefinition, AppUsage, AppVersion, AuthConfig, AuthField, AuthParameter, ContactInfo, FolderMount,
    ParameterSchema, ReferenceInfo,
};

/// Untyped nested map/list/scalar representation used at the configuration
/// boundary.
pub type ValueTree = Map<String, Value>;

/// Capability trait for records that can be flattened into a [`ValueTree`].
///
/// The provided implementation serializes the record and hands the result to
/// [`tree_from_value`]; dispatch over nested records is structural, driven by
/// the serialized shape rather than type names.
pub trait Mappable: Serialize {
    fn to_tree(&self) -> ValueTree {
        match serde_json::to_value(self) {
            Ok(value) => tree_from_value(&value),
            Err(error) => {
                warn!(%error, "record is not representable as JSON, emitting empty tree");
                ValueTree::new()
            }
        }
    }
}

impl Mappable for AppAuth {}
impl Mappable for AppDefinition {}
impl Mappable for AuthField {}
impl Mappable for ContactInfo {}
impl Mappable for ReferenceInfo {}
impl Mappable for FolderMount {}
impl Mappable for AuthConfig {}
impl Mappable for AuthParameter {}
impl Mappable for ParameterSchema {}
impl Mappable for AppVersion {}
impl Mappable for AppUsage {}

/// Flatten one serialized record into a [`ValueTree`].
///
/// Pure function of its input. Non-object inputs yield an empty tree.
pub fn tree_from_value(value: &Value) -> ValueTree {
    let mut tree = ValueTree::new();
    let Some(object) = value.as_object() else {
        return tree;
    };

    for (name, member) in object {
        let key = name.to_ascii_lowercase();
        match member {
            Value::String(text) => {
                if !text.is_empty() {
                    tree.insert(key, Value::String(text.clone()));
                }
            }
            Value::Number(number) if number.is_i64() || number.is_u64() => {
                tree.insert(key, Value::Number(number.clone()));
            }
            Value::Bool(flag) => {
                tree.insert(key, Value::Bool(*flag));
            }
            Value::Object(_) => {
                let nested = tree_from_value(member);
                if !nested.is_empty() {
                    tree.insert(key, Value::Array(vec![Value::Object(nested)]));
                }
            }
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                let mapped: Vec<Value> = items.iter().map(|item| Value::Object(tree_from_value(item))).collect();
                let any_non_empty = mapped.iter().any(|item| item.as_object().is_some_and(|m| !m.is_empty()));
                if any_non_empty {
                    tree.insert(key, Value::Array(mapped));
                }
            }
            // Null marks an absent optional reference; floats and scalar or
            // mixed lists have no mapping. All are omitted without error.
            _ => {}
        }
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_strings_are_omitted() {
        let record = AuthField {
            key: String::new(),
            value: String::new(),
        };
        assert!(record.to_tree().is_empty());
    }

    #[test]
    fn empty_value_keeps_sibling_key() {
        let tree = tree_from_value(&json!({
            "id": "",
            "name": "X",
            "fields": [ { "key": "token", "value": "" } ]
        }));

        assert_eq!(tree.get("name"), Some(&json!("X")));
        assert!(!tree.contains_key("id"));

        let fields = tree.get("fields").and_then(Value::as_array).expect("fields list");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0], json!({ "key": "token" }));
    }

    #[test]
    fn keys_are_lower_cased() {
        let tree = tree_from_value(&json!({ "Name": "slack", "WorkflowCount": 2 }));
        assert_eq!(tree.get("name"), Some(&json!("slack")));
        assert_eq!(tree.get("workflowcount"), Some(&json!(2)));
    }

    #[test]
    fn zero_numbers_and_false_booleans_survive() {
        let tree = tree_from_value(&json!({ "created": 0, "active": false }));
        assert_eq!(tree.get("created"), Some(&json!(0)));
        assert_eq!(tree.get("active"), Some(&json!(false)));
    }

    #[test]
    fn nested_record_becomes_one_element_list() {
        let tree = tree_from_value(&json!({ "app": { "name": "Slack", "id": "" } }));
        assert_eq!(tree.get("app"), Some(&json!([ { "name": "Slack" } ])));
    }

    #[test]
    fn empty_nested_record_is_omitted() {
        let tree = tree_from_value(&json!({ "app": { "name": "", "id": "" } }));
        assert!(!tree.contains_key("app"));
    }

    #[test]
    fn record_lists_preserve_length_and_order() {
        let tree = tree_from_value(&json!({
            "fields": [
                { "key": "first", "value": "1" },
                { "key": "", "value": "" },
                { "key": "third", "value": "3" }
            ]
        }));

        let fields = tree.get("fields").and_then(Value::as_array).expect("fields list");
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], json!({ "key": "first", "value": "1" }));
        assert_eq!(fields[1], json!({}));
        assert_eq!(fields[2], json!({ "key": "third", "value": "3" }));
    }

    #[test]
    fn list_of_all_empty_records_is_omitted() {
        let tree = tree_from_value(&json!({ "fields": [ { "key": "", "value": "" } ] }));
        assert!(!tree.contains_key("fields"));
    }

    #[test]
    fn unmapped_shapes_are_dropped_silently() {
        let tree = tree_from_value(&json!({
            "ratio": 0.5,
            "tags": ["a", "b"],
            "owner": null,
            "label": "kept"
        }));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("label"), Some(&json!("kept")));
    }

    #[test]
    fn non_object_input_yields_empty_tree() {
        assert!(tree_from_value(&json!("scalar")).is_empty());
        assert!(tree_from_value(&json!(["a", "b"])).is_empty());
    }

    #[test]
    fn app_auth_maps_end_to_end() {
        let auth = AppAuth {
            active: true,
            label: "my slack auth".into(),
            app: AppDefinition {
                name: "Slack".into(),
                id: "abc123".into(),
                ..Default::default()
            },
            fields: vec![
                AuthField {
                    key: "api_token".into(),
                    value: "xoxb".into(),
                },
                AuthField {
                    key: "url".into(),
                    value: String::new(),
                },
            ],
            ..Default::default()
        };

        let tree = auth.to_tree();
        assert_eq!(tree.get("active"), Some(&json!(true)));
        assert_eq!(tree.get("label"), Some(&json!("my slack auth")));
        assert!(!tree.contains_key("id"));

        let app = tree.get("app").and_then(Value::as_array).expect("app block list");
        assert_eq!(app.len(), 1);
        assert_eq!(app[0]["name"], json!("Slack"));

        let fields = tree.get("fields").and_then(Value::as_array).expect("fields list");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], json!({ "key": "api_token", "value": "xoxb" }));
        assert_eq!(fields[1], json!({ "key": "url" }));
    }
}
