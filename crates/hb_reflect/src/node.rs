use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::WireError;
use crate::info::MemberKind;

// -----------------------------------------------------------------------------
// SerializedNode

/// Generic tree produced by serialization and consumed by populate.
///
/// A node carries either a `value`, or member children in `fields` and
/// `properties`, which are separate name spaces. A node with children and
/// no value describes a partial update of the members it lists.
///
/// # Examples
///
/// ```
/// use hb_reflect::SerializedNode;
/// use serde_json::json;
///
/// let node: SerializedNode = serde_json::from_value(json!({
///     "name": "player",
///     "typeName": "Game.Player",
///     "fields": [{ "name": "health", "typeName": "f32", "value": 80.0 }],
/// }))
/// .unwrap();
///
/// assert!(node.value.is_none());
/// assert_eq!(node.field("health").unwrap().value, Some(json!(80.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "typeName", default)]
    pub type_name: String,
    /// `Some(Value::Null)` when the input spells an explicit `null`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SerializedNode>,
    #[serde(default, alias = "props", skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<SerializedNode>,
}

fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl SerializedNode {
    /// A node with neither value nor children.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// A node carrying a single value.
    pub fn leaf(name: impl Into<String>, type_name: impl Into<String>, value: Value) -> Self {
        Self::new(name, type_name).with_value(value)
    }

    #[inline]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    #[inline]
    pub fn with_field(mut self, node: SerializedNode) -> Self {
        self.fields.push(node);
        self
    }

    #[inline]
    pub fn with_property(mut self, node: SerializedNode) -> Self {
        self.properties.push(node);
        self
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.fields.is_empty() || !self.properties.is_empty()
    }

    /// Neither a value nor children: populating it changes nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && !self.has_children()
    }

    #[inline]
    pub fn children(&self, kind: MemberKind) -> &[SerializedNode] {
        match kind {
            MemberKind::Field => &self.fields,
            MemberKind::Property => &self.properties,
        }
    }

    #[inline]
    pub fn children_mut(&mut self, kind: MemberKind) -> &mut Vec<SerializedNode> {
        match kind {
            MemberKind::Field => &mut self.fields,
            MemberKind::Property => &mut self.properties,
        }
    }

    pub fn field(&self, name: &str) -> Option<&SerializedNode> {
        self.fields.iter().find(|n| n.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&SerializedNode> {
        self.properties.iter().find(|n| n.name == name)
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_json(value: &Value) -> Result<Self, WireError> {
        Self::deserialize(value).map_err(WireError::from)
    }

    pub fn to_json_string(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(WireError::from)
    }

    pub fn from_json_str(text: &str) -> Result<Self, WireError> {
        serde_json::from_str(text).map_err(WireError::from)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::SerializedNode;

    #[test]
    fn explicit_null_is_kept() {
        let node = SerializedNode::from_json(&json!({"name": "a", "value": null})).unwrap();
        assert_eq!(node.value, Some(json!(null)));

        let node = SerializedNode::from_json(&json!({"name": "a"})).unwrap();
        assert_eq!(node.value, None);
        assert!(node.is_empty());
    }

    #[test]
    fn props_alias() {
        let node = SerializedNode::from_json(&json!({
            "name": "t",
            "props": [{"name": "enabled", "value": true}],
        }))
        .unwrap();
        assert_eq!(node.property("enabled").unwrap().value, Some(json!(true)));
    }

    #[test]
    fn wire_shape_omits_empty_parts() {
        let node = SerializedNode::new("root", "Game.Player")
            .with_field(SerializedNode::leaf("hp", "i32", json!(3)));
        assert_eq!(
            node.to_json(),
            json!({
                "name": "root",
                "typeName": "Game.Player",
                "fields": [{"name": "hp", "typeName": "i32", "value": 3}],
            })
        );
        assert!(SerializedNode::from_json_str("{\"name\": 1}").is_err());
    }
}
