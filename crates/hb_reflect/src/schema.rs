//! Structural schemas of reflected types.
//!
//! Structured value types describe themselves through their wire codec,
//! see [`wire::schema`](crate::wire::schema). The [`SchemaGenerator`] builds
//! the schema of any reflected type on top of that, moving every named
//! structured value, composite and reference descriptor into a shared
//! `$defs` table.
//!
//! # Examples
//!
//! ```
//! use hb_reflect::schema::SchemaGenerator;
//! use hb_reflect::wire::Bounds;
//! use serde_json::json;
//!
//! let mut generator = SchemaGenerator::new();
//! let root = generator.add::<Vec<Bounds>>();
//! assert_eq!(root, json!({"type": "array", "items": {"$ref": "#/$defs/Bounds"}}));
//!
//! let schema = generator.finish(root);
//! assert_eq!(schema["$defs"]["Bounds"]["required"], json!(["center", "size"]));
//! ```

use alloc::format;
use alloc::string::String;
use core::any::TypeId;

use hb_utils::TypeIdMap;
use serde_json::{Map, Value, json};

use crate::info::{MemberFlags, MemberKind, TypeInfo, TypeKind, Typed};

/// Name of the reference descriptor schema in `$defs`.
pub const OBJECT_REF_DEF: &str = "ObjectRef";
/// Name of the node schema in `$defs`.
pub const NODE_DEF: &str = "SerializedNode";

/// Schema of an [`ObjectRef`](crate::refs::ObjectRef) descriptor.
pub fn object_ref_schema() -> Value {
    json!({
        "type": ["object", "null"],
        "properties": {
            "instanceID": { "type": "integer" },
            "assetPath": { "type": "string" },
            "assetGuid": { "type": "string" },
        },
        "additionalProperties": false,
    })
}

/// Schema of the [`SerializedNode`](crate::SerializedNode) wire shape.
pub fn node_schema() -> Value {
    let children = json!({ "type": "array", "items": { "$ref": format!("#/$defs/{NODE_DEF}") } });
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "typeName": { "type": "string" },
            "value": {},
            "fields": children,
            "properties": children,
        },
        "required": ["name"],
        "additionalProperties": false,
    })
}

fn def_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/$defs/{name}") })
}

// -----------------------------------------------------------------------------
// SchemaGenerator

/// Collects the schemas of a set of types into one `$defs` table.
///
/// Each named type is defined once. Two types sharing a short name are
/// told apart by their full type path.
#[derive(Default)]
pub struct SchemaGenerator {
    defs: Map<String, Value>,
    names: TypeIdMap<String>,
}

impl SchemaGenerator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The schema of `T`, registering what it refers to.
    #[inline]
    pub fn add<T: Typed>(&mut self) -> Value {
        self.schema_of(T::type_info())
    }

    /// Adds the [`SerializedNode`](crate::SerializedNode) shape and returns
    /// a reference to it.
    pub fn add_node(&mut self) -> Value {
        self.defs
            .entry(NODE_DEF)
            .or_insert_with(node_schema);
        def_ref(NODE_DEF)
    }

    /// The schema of `ty`, inline for primitives, enums and lists, and as a
    /// `$ref` for everything that gets a definition.
    pub fn schema_of(&mut self, ty: &'static TypeInfo) -> Value {
        match ty.kind() {
            TypeKind::Primitive(codec) => codec.schema(),
            TypeKind::Enum(info) => json!({ "type": "string", "enum": info.variants() }),
            TypeKind::List(list) => json!({ "type": "array", "items": self.schema_of(list.item()) }),
            TypeKind::Object | TypeKind::ObjectRef(_) => {
                self.defs
                    .entry(OBJECT_REF_DEF)
                    .or_insert_with(object_ref_schema);
                def_ref(OBJECT_REF_DEF)
            }
            TypeKind::Value(codec) => {
                let (name, fresh) = self.name_of(ty);
                if fresh {
                    self.defs.insert(name.clone(), codec.schema());
                }
                def_ref(&name)
            }
            TypeKind::Composite => {
                let (name, fresh) = self.name_of(ty);
                if fresh {
                    // Placeholder first: a composite may contain itself.
                    self.defs.insert(name.clone(), Value::Null);
                    let schema = self.composite(ty);
                    self.defs.insert(name.clone(), schema);
                }
                def_ref(&name)
            }
        }
    }

    fn composite(&mut self, ty: &'static TypeInfo) -> Value {
        let mut properties = Map::new();
        for kind in [MemberKind::Field, MemberKind::Property] {
            for member in ty.members(kind) {
                if member
                    .flags()
                    .intersects(MemberFlags::OBSOLETE | MemberFlags::NON_SERIALIZED)
                {
                    continue;
                }
                let mut schema = self.schema_of(member.type_info());
                if !member.is_writable()
                    && let Value::Object(map) = &mut schema
                {
                    map.insert("readOnly".into(), Value::Bool(true));
                }
                properties.insert(member.name().into(), schema);
            }
        }
        json!({ "type": "object", "properties": properties })
    }

    /// The `$defs` key of `ty`, and whether it was just assigned.
    fn name_of(&mut self, ty: &'static TypeInfo) -> (String, bool) {
        let type_id: TypeId = ty.type_id();
        if let Some(name) = self.names.get(&type_id) {
            return (name.clone(), false);
        }
        let name = if self.defs.contains_key(ty.type_name()) {
            String::from(ty.type_path())
        } else {
            String::from(ty.type_name())
        };
        self.names.insert(type_id, name.clone());
        (name, true)
    }

    #[inline]
    pub fn definitions(&self) -> &Map<String, Value> {
        &self.defs
    }

    /// Attaches the collected `$defs` to `root`.
    pub fn finish(self, root: Value) -> Value {
        let mut root = match root {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("allOf".into(), Value::Array(alloc::vec![other]));
                map
            }
        };
        if !self.defs.is_empty() {
            root.insert("$defs".into(), Value::Object(self.defs));
        }
        Value::Object(root)
    }
}

// -----------------------------------------------------------------------------
// Tests
