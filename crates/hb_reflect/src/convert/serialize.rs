use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::Value;

use super::{Env, stack};
use crate::error::ReflectError;
use crate::info::{MemberKind, RefTarget, TypeInfo, TypeKind};
use crate::node::SerializedNode;
use crate::object::Instance;
use crate::reflection::Reflect;
use crate::refs::{ObjectRef, ReferenceResolver};
use crate::registry::{Converter, ConverterKind};

// -----------------------------------------------------------------------------
// Serializer

/// Walks a live value top-down and builds its [`SerializedNode`].
///
/// Only the root may fail. Below it, a member that cannot be converted is
/// skipped with a warning on the `log` facade, and a member without a
/// converter becomes an opaque node carrying only its name and type.
pub(crate) struct Serializer<'a> {
    env: Env<'a>,
    recursive: bool,
}

impl<'a> Serializer<'a> {
    pub fn new(env: Env<'a>, recursive: bool) -> Self {
        Self { env, recursive }
    }

    pub fn serialize(&self, value: &dyn Reflect, name: &str) -> Result<SerializedNode, ReflectError> {
        let ty = value.reflect_type_info();
        let converter = self.root_converter(ty)?;
        self.node(value, name, converter, 0)
    }

    /// Serializes a live object: its descriptor, and its members when recursive.
    pub fn serialize_instance(
        &self,
        instance: &Instance,
        name: &str,
    ) -> Result<SerializedNode, ReflectError> {
        let converter = self.root_converter(instance.type_info())?;
        self.object_node(instance, name, converter, 0)
    }

    fn root_converter(&self, ty: &'static TypeInfo) -> Result<&'a Converter, ReflectError> {
        if self.env.converters.is_denylisted(ty) {
            return Err(ReflectError::conversion(ty.type_path(), "the type is denylisted"));
        }
        self.env
            .converters
            .resolve(ty)
            .ok_or(ReflectError::ConverterNotFound {
                type_path: ty.type_path(),
            })
    }

    fn node(
        &self,
        value: &dyn Reflect,
        name: &str,
        converter: &Converter,
        depth: usize,
    ) -> Result<SerializedNode, ReflectError> {
        let ty = value.reflect_type_info();
        let _guard = stack::enter(ty);

        if let TypeKind::ObjectRef(slot) = ty.kind() {
            return match slot.target_of(value) {
                RefTarget::Alive(instance) => self.object_node(&instance, name, converter, depth),
                RefTarget::Null | RefTarget::Destroyed { .. } => Ok(SerializedNode::leaf(
                    name,
                    slot.target().type_path(),
                    ObjectRef::NULL.to_value(),
                )),
            };
        }

        match converter.kind() {
            ConverterKind::Object { ignored } | ConverterKind::Composite { ignored } => {
                let mut node = SerializedNode::new(name, ty.type_path());
                // A host object held by value is only expanded at the root.
                let expand = depth == 0 || !matches!(ty.kind(), TypeKind::Object);
                if self.recursive && expand {
                    self.members(&mut node, value, ty, ignored, depth);
                }
                Ok(node)
            }
            _ => {
                let value = self.value(value, converter, depth)?;
                Ok(SerializedNode::leaf(name, ty.type_path(), value))
            }
        }
    }

    /// The single JSON value of a leaf.
    fn value(
        &self,
        value: &dyn Reflect,
        converter: &Converter,
        depth: usize,
    ) -> Result<Value, ReflectError> {
        let ty = value.reflect_type_info();
        let handling = self.env.options.number_handling;
        let encode_error = |e: crate::error::WireError| ReflectError::conversion(ty.type_path(), e);

        match (converter.kind(), ty.kind()) {
            (ConverterKind::Custom(codec), _)
            | (ConverterKind::Primitive, TypeKind::Primitive(codec))
            | (ConverterKind::Structured, TypeKind::Value(codec)) => {
                codec.encode(value, handling).map_err(encode_error)
            }
            (ConverterKind::Enumeration, TypeKind::Enum(info)) => info
                .variant_name(value)
                .map(Value::from)
                .ok_or_else(|| ReflectError::conversion(ty.type_path(), "unknown variant")),
            (ConverterKind::Collection, TypeKind::List(list)) => {
                let mut items = Vec::with_capacity(list.len(value));
                for index in 0..list.len(value) {
                    let item = match list.get(value, index) {
                        Some(item) => self.element(&*item, index, depth + 1),
                        None => Value::Null,
                    };
                    items.push(item);
                }
                Ok(Value::Array(items))
            }
            (kind, _) => Err(ReflectError::conversion(
                ty.type_path(),
                format!("converter `{}` ({}) cannot handle a {:?} type", converter.name(), kind.as_str(), ty.kind()),
            )),
        }
    }

    /// One element of a collection. Failures turn into `null` elements.
    ///
    /// Elements take the shape the element reader expects. A reference is a
    /// bare descriptor, so a reference list stays a plain array of
    /// descriptors. A composite is a whole node named `[index]`, since its
    /// members have no other place to go. Every other element is its
    /// converter's value.
    fn element(&self, item: &dyn Reflect, index: usize, depth: usize) -> Value {
        let ty = item.reflect_type_info();
        if depth > self.env.options.max_depth {
            log::warn!("element [{index}] of type `{}` is beyond the maximum depth", ty.type_path());
            return Value::Null;
        }
        if let TypeKind::ObjectRef(slot) = ty.kind() {
            return match slot.target_of(item) {
                RefTarget::Alive(instance) => self.describe(&instance).to_value(),
                RefTarget::Null | RefTarget::Destroyed { .. } => ObjectRef::NULL.to_value(),
            };
        }
        let Some(converter) = self.env.converters.resolve(ty) else {
            log::warn!("no converter for element [{index}] of type `{}`", ty.type_path());
            return Value::Null;
        };
        let result = match converter.kind() {
            ConverterKind::Composite { .. } | ConverterKind::Object { .. } => self
                .node(item, &format!("[{index}]"), converter, depth)
                .map(|node| node.to_json()),
            _ => self.value(item, converter, depth),
        };
        result.unwrap_or_else(|err| {
            log::warn!("element [{index}] skipped: {err}");
            Value::Null
        })
    }

    fn describe(&self, instance: &Instance) -> ObjectRef {
        ReferenceResolver::new(self.env.hooks).describe(instance)
    }

    /// A host object: the descriptor, and its members at the root of a
    /// recursive walk.
    fn object_node(
        &self,
        instance: &Instance,
        name: &str,
        converter: &Converter,
        depth: usize,
    ) -> Result<SerializedNode, ReflectError> {
        let ty = instance.type_info();
        let mut node =
            SerializedNode::leaf(name, ty.type_path(), self.describe(instance).to_value());
        if depth > 0 || !self.recursive {
            return Ok(node);
        }
        let value = instance.try_borrow().map_err(|_| {
            ReflectError::conversion(ty.type_path(), "the object is being modified")
        })?;
        self.members(&mut node, &*value, ty, converter.kind().ignored_members(), depth);
        Ok(node)
    }

    fn members(
        &self,
        node: &mut SerializedNode,
        owner: &dyn Reflect,
        ty: &'static TypeInfo,
        ignored: &[&'static str],
        depth: usize,
    ) {
        let depth = depth + 1;
        for kind in [MemberKind::Field, MemberKind::Property] {
            for member in ty.members(kind) {
                let name = member.name();
                if ignored.contains(&name) || !self.env.hooks.is_serializable_member(ty, member) {
                    log::trace!("{kind} `{name}` of `{}` is not serialized", ty.type_path());
                    continue;
                }
                let declared = member.type_info();
                if self.env.converters.is_denylisted(declared) {
                    log::trace!("{kind} `{name}` of `{}` has a denylisted type", ty.type_path());
                    continue;
                }
                if depth > self.env.options.max_depth {
                    log::warn!(
                        "{kind} `{name}` of `{}` is beyond the maximum depth of {}",
                        ty.type_path(),
                        self.env.options.max_depth
                    );
                    continue;
                }
                let Some(value) = member.get(owner) else {
                    log::warn!("{kind} `{name}` of `{}` could not be read", ty.type_path());
                    continue;
                };
                let child = match self.env.converters.resolve(value.reflect_type_info()) {
                    Some(converter) => match self.node(&*value, name, converter, depth) {
                        Ok(child) => child,
                        Err(err) => {
                            log::warn!("{kind} `{name}` of `{}` skipped: {err}", ty.type_path());
                            continue;
                        }
                    },
                    None => SerializedNode::new(name, opaque_type_name(&*value)),
                };
                node.children_mut(kind).push(child);
            }
        }
    }
}

fn opaque_type_name(value: &dyn Reflect) -> String {
    value.reflect_type_info().effective().type_path().to_string()
}
