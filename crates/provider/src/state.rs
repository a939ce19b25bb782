//! Declarative state handed across the framework boundary.

use serde_json::Value;
use shuffle_util::ValueTree;

/// Attribute values plus the framework-assigned identifier for one resource
/// or data-source invocation.
///
/// Values follow the mapper's conventions: scalars for leaf attributes and
/// lists of maps for nested blocks. An empty identifier means the resource
/// has no remote counterpart (not yet created, or detected as deleted).
#[derive(Debug, Clone, Default)]
pub struct ResourceData {
    id: String,
    values: ValueTree,
}

impl ResourceData {
    /// State for a resource that does not exist remotely yet.
    pub fn new(values: ValueTree) -> Self {
        Self {
            id: String::new(),
            values,
        }
    }

    /// State for a resource already tracked under `id`.
    pub fn with_id(id: impl Into<String>, values: ValueTree) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Drop the identifier, marking the resource as gone.
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn values(&self) -> &ValueTree {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// All nested maps of a repeated block attribute, in list order.
    pub fn blocks(&self, key: &str) -> Vec<&ValueTree> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_object).collect())
            .unwrap_or_default()
    }

    /// The first nested map of a block attribute, when present.
    pub fn first_block(&self, key: &str) -> Option<&ValueTree> {
        self.blocks(key).into_iter().next()
    }

    /// Store an attribute value, replacing any previous one.
    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ResourceData {
        let values = json!({
            "label": "my auth",
            "active": true,
            "created": 12,
            "app": [ { "name": "Slack" } ],
            "fields": [ { "key": "a" }, { "key": "b" } ]
        });
        ResourceData::new(values.as_object().expect("object literal").clone())
    }

    #[test]
    fn typed_accessors_read_attribute_values() {
        let data = sample();
        assert_eq!(data.get_str("label"), Some("my auth"));
        assert_eq!(data.get_bool("active"), Some(true));
        assert_eq!(data.get_int("created"), Some(12));
        assert_eq!(data.get_str("missing"), None);
    }

    #[test]
    fn blocks_expose_nested_maps_in_order() {
        let data = sample();
        let fields = data.blocks("fields");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].get("key"), Some(&json!("a")));
        assert_eq!(fields[1].get("key"), Some(&json!("b")));

        let app = data.first_block("app").expect("app block");
        assert_eq!(app.get("name"), Some(&json!("Slack")));
        assert!(data.first_block("label").is_none());
    }

    #[test]
    fn identity_can_be_assigned_and_cleared() {
        let mut data = sample();
        assert_eq!(data.id(), "");
        data.set_id("auth-1");
        assert_eq!(data.id(), "auth-1");
        data.clear_id();
        assert_eq!(data.id(), "");
    }
}
