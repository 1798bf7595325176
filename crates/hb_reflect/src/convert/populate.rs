use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::Value;

use super::{Env, Recorder, stack};
use crate::access::MemberPath;
use crate::error::{ReflectError, WireError};
use crate::info::{CodecInfo, ListInfo, MemberInfo, MemberKind, ObjectRefInfo, SetMemberError};
use crate::info::{RefTarget, TypeInfo, TypeKind};
use crate::logs::{LogSink, Logs};
use crate::node::SerializedNode;
use crate::object::Instance;
use crate::reflection::Reflect;
use crate::refs::{DeserializationContext, ObjectRef, ReferenceResolver};
use crate::registry::ConverterKind;

/// Node keys that may wrongly end up inside the value of a reference node.
const CHILD_KEYS: [&str; 3] = ["fields", "props", "properties"];
/// Node keys that never belong inside the value of a reference node.
const RESTRICTED_KEYS: [&str; 3] = ["name", "typeName", "value"];

// -----------------------------------------------------------------------------
// Fixup

/// Which value a [`MemberPath`] starts from.
#[derive(Clone)]
enum Anchor {
    /// The value handed to the call.
    Root,
    /// A host object reached through a reference.
    Instance(Instance),
}

/// A reference slot left null during the walk, retried once it is over.
struct Fixup {
    anchor: Anchor,
    path: MemberPath,
    descriptor: ObjectRef,
    required: &'static TypeInfo,
    slot: ObjectRefInfo,
    depth: usize,
}

// -----------------------------------------------------------------------------
// Populator

/// Applies a [`SerializedNode`] onto a live value.
///
/// Runs in two phases. The walk applies every member the tree mentions and
/// registers each object it resolves or creates before descending into it.
/// References that found nothing are written as null and queued; once the
/// walk is over they are resolved again against the now complete context,
/// which is how a reference to an object created later in the same tree
/// ends up attached.
pub(crate) struct Populator<'a> {
    env: Env<'a>,
    context: &'a mut DeserializationContext,
    recorder: Recorder<'a>,
    pending: Vec<Fixup>,
}

impl<'a> Populator<'a> {
    pub fn new(
        env: Env<'a>,
        context: &'a mut DeserializationContext,
        sink: Option<&'a dyn LogSink>,
    ) -> Self {
        Self {
            env,
            context,
            recorder: Recorder::new(sink),
            pending: Vec::new(),
        }
    }

    /// Populates `target` in place.
    ///
    /// Fails only when no converter handles the type of `target` or when a
    /// member conversion fails. Either way every other member is still
    /// attempted.
    pub fn populate(mut self, target: &mut dyn Reflect, node: &SerializedNode) -> (bool, Logs) {
        let ty = target.reflect_type_info();
        if self.env.converters.resolve(ty).is_none() {
            let err = ReflectError::ConverterNotFound {
                type_path: ty.type_path(),
            };
            self.recorder.reflect_error(0, &err);
            return self.recorder.finish();
        }
        self.populate_value(target, node, 0, &MemberPath::new(), &Anchor::Root);
        self.resolve_pending(Some(target));
        self.recorder.finish()
    }

    /// Populates a live host object, registering it first under both its own
    /// descriptor and the one the tree carries.
    pub fn populate_instance(mut self, instance: &Instance, node: &SerializedNode) -> (bool, Logs) {
        let ty = instance.type_info();
        if self.env.converters.resolve(ty).is_none() {
            let err = ReflectError::ConverterNotFound {
                type_path: ty.type_path(),
            };
            self.recorder.reflect_error(0, &err);
            return self.recorder.finish();
        }
        let descriptor = node
            .value
            .as_ref()
            .and_then(|value| ObjectRef::from_value(value).ok())
            .unwrap_or(ObjectRef::NULL);
        ReferenceResolver::new(self.env.hooks).register(self.context, instance, &descriptor);

        let _guard = stack::enter(ty);
        self.populate_object(instance, node, 0);
        self.resolve_pending(None);
        self.recorder.finish()
    }

    /// Builds a fresh value from `node`.
    ///
    /// The type is the one named by the node when the type registry knows
    /// it, otherwise `fallback`.
    pub fn deserialize(
        mut self,
        node: &SerializedNode,
        fallback: Option<&'static TypeInfo>,
    ) -> Result<(Box<dyn Reflect>, Logs), ReflectError> {
        let ty = self.root_type(node, fallback)?;
        if self.env.converters.is_denylisted(ty) {
            return Err(ReflectError::conversion(ty.type_path(), "the type is denylisted"));
        }
        if matches!(ty.kind(), TypeKind::Object) {
            return Err(ReflectError::conversion(
                ty.type_path(),
                "host objects are created by the host, not deserialized",
            ));
        }
        let _guard = stack::enter(ty);
        let mut value = self.deserialize_value(node, ty, 0, &MemberPath::new(), &Anchor::Root)?;
        self.resolve_pending(Some(&mut *value));
        let (_, logs) = self.recorder.finish();
        Ok((value, logs))
    }

    fn root_type(
        &mut self,
        node: &SerializedNode,
        fallback: Option<&'static TypeInfo>,
    ) -> Result<&'static TypeInfo, ReflectError> {
        if !node.type_name.is_empty() {
            match self.env.types.resolve_name(&node.type_name) {
                Ok(ty) if fallback.is_none_or(|f| ty.is_assignable_to(f)) => return Ok(ty),
                Ok(ty) => self.recorder.warning(
                    0,
                    format!("`{}` is not assignable to the requested type", ty.type_path()),
                ),
                Err(err) if fallback.is_some() => self.recorder.warning(0, err.to_string()),
                Err(_) => {}
            }
        }
        fallback.ok_or_else(|| ReflectError::TypeNotFound {
            type_name: node.type_name.clone(),
        })
    }

    // -------------------------------------------------------------------------
    // Values

    fn populate_value(
        &mut self,
        target: &mut dyn Reflect,
        node: &SerializedNode,
        depth: usize,
        path: &MemberPath,
        anchor: &Anchor,
    ) {
        let ty = target.reflect_type_info();
        let _guard = stack::enter(ty);

        if node.is_empty() {
            self.recorder
                .info(depth, format!("`{}` left unchanged", ty.type_path()));
            return;
        }

        if let TypeKind::ObjectRef(slot) = ty.kind() {
            let current = alive(slot.target_of(target));
            if let Some(value) = self.reference_slot(node, *slot, current, depth, path, anchor)
                && let Err(value) = target.set(value)
            {
                self.mismatch(depth, ty, &*value);
            }
            return;
        }

        let converters = self.env.converters;
        let Some(converter) = converters.resolve(ty) else {
            let err = ReflectError::ConverterNotFound {
                type_path: ty.type_path(),
            };
            self.recorder.reflect_error(depth, &err);
            return;
        };
        let is_object = matches!(ty.kind(), TypeKind::Object);

        // The value of a host object node is its descriptor, never a body.
        // A null value next to members is a partial update, not a reset.
        if node.has_children() && (node.value.as_ref().is_none_or(Value::is_null) || is_object) {
            let ignored = converter.kind().ignored_members();
            self.populate_members(target, ty, node, ignored, depth, path, anchor);
            return;
        }
        if is_object {
            self.recorder.info(
                depth,
                format!("`{}` has no members to apply", ty.type_path()),
            );
            return;
        }

        match self.deserialize_value(node, ty, depth, path, anchor) {
            Ok(value) => match target.set(value) {
                Ok(()) => self
                    .recorder
                    .info(depth, format!("`{}` replaced", ty.type_path())),
                Err(value) => self.mismatch(depth, ty, &*value),
            },
            Err(err) => self.recorder.reflect_error(depth, &err),
        }
    }

    /// Decodes a whole value of type `ty` from `node`.
    fn deserialize_value(
        &mut self,
        node: &SerializedNode,
        ty: &'static TypeInfo,
        depth: usize,
        path: &MemberPath,
        anchor: &Anchor,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        if let TypeKind::ObjectRef(slot) = ty.kind() {
            return self
                .reference_slot(node, *slot, None, depth, path, anchor)
                .ok_or_else(|| ReflectError::conversion(ty.type_path(), "the reference node was rejected"));
        }

        let converters = self.env.converters;
        let converter = converters
            .resolve(ty)
            .ok_or(ReflectError::ConverterNotFound {
                type_path: ty.type_path(),
            })?;
        let handling = self.env.options.number_handling;
        let decode = |codec: &CodecInfo, value: &Value| {
            codec
                .decode(value, handling)
                .map_err(|err| ReflectError::decode(ty.type_path(), err))
        };

        match (converter.kind(), ty.kind()) {
            (ConverterKind::Custom(codec), _)
            | (ConverterKind::Primitive, TypeKind::Primitive(codec))
            | (ConverterKind::Structured, TypeKind::Value(codec)) => match &node.value {
                Some(value) => decode(codec, value),
                None => self.from_default(node, ty, &[], depth, path, anchor),
            },
            (ConverterKind::Enumeration, TypeKind::Enum(info)) => match &node.value {
                Some(value) => info
                    .decode(value)
                    .map_err(|err| ReflectError::decode(ty.type_path(), err)),
                None => self.from_default(node, ty, &[], depth, path, anchor),
            },
            (ConverterKind::Collection, TypeKind::List(list)) => {
                self.deserialize_list(node, *list, ty, depth, path, anchor)
            }
            (ConverterKind::Composite { .. } | ConverterKind::Object { .. }, TypeKind::Object) => {
                Err(ReflectError::conversion(
                    ty.type_path(),
                    "host objects are only assigned through references",
                ))
            }
            (ConverterKind::Composite { ignored } | ConverterKind::Object { ignored }, _) => {
                if node.value.as_ref().is_some_and(|v| !v.is_null()) {
                    self.recorder.warning(
                        depth,
                        format!("the value of composite `{}` is ignored", ty.type_path()),
                    );
                }
                self.from_default(node, ty, ignored, depth, path, anchor)
            }
            (kind, _) => Err(ReflectError::conversion(
                ty.type_path(),
                format!(
                    "converter `{}` ({}) cannot handle a {:?} type",
                    converter.name(),
                    kind.as_str(),
                    ty.kind()
                ),
            )),
        }
    }

    /// Starts from the default value of `ty` and applies the members of `node`.
    fn from_default(
        &mut self,
        node: &SerializedNode,
        ty: &'static TypeInfo,
        ignored: &[&'static str],
        depth: usize,
        path: &MemberPath,
        anchor: &Anchor,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        let mut value = ty.default_value().ok_or_else(|| {
            ReflectError::conversion(ty.type_path(), "the type has no default value to start from")
        })?;
        self.populate_members(&mut *value, ty, node, ignored, depth, path, anchor);
        Ok(value)
    }

    fn deserialize_list(
        &mut self,
        node: &SerializedNode,
        list: ListInfo,
        ty: &'static TypeInfo,
        depth: usize,
        path: &MemberPath,
        anchor: &Anchor,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        let items = match &node.value {
            Some(Value::Array(items)) => items.as_slice(),
            Some(Value::Null) | None => &[],
            Some(other) => {
                let err = WireError::mismatch(format!("expected an array, found `{other}`"));
                return Err(ReflectError::decode(ty.type_path(), err));
            }
        };
        let item_ty = list.item();
        let mut values = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let element_path = path.clone().index(index);
            values.push(self.deserialize_element(item, item_ty, depth + 1, &element_path, anchor)?);
        }
        list.from_items(values).map_err(|value| {
            ReflectError::conversion(
                ty.type_path(),
                format!("a `{}` is not a valid element", value.type_path()),
            )
        })
    }

    fn deserialize_element(
        &mut self,
        item: &Value,
        ty: &'static TypeInfo,
        depth: usize,
        path: &MemberPath,
        anchor: &Anchor,
    ) -> Result<Box<dyn Reflect>, ReflectError> {
        if let TypeKind::ObjectRef(slot) = ty.kind() {
            if item.is_null() {
                return Ok(slot.make(None));
            }
            let descriptor =
                ObjectRef::from_value(item).map_err(|err| ReflectError::decode(ty.type_path(), err))?;
            if descriptor.is_null() {
                return Ok(slot.make(None));
            }
            let required = slot.target();
            let resolver = ReferenceResolver::new(self.env.hooks);
            return Ok(match resolver.resolve(&descriptor, self.context, required) {
                Some(instance) => {
                    resolver.register(self.context, &instance, &descriptor);
                    slot.make(Some(&instance))
                }
                None => {
                    self.defer(anchor, path, descriptor, required, *slot, depth);
                    slot.make(None)
                }
            });
        }

        let converters = self.env.converters;
        let converter = converters
            .resolve(ty)
            .ok_or(ReflectError::ConverterNotFound {
                type_path: ty.type_path(),
            })?;
        let node = match converter.kind() {
            ConverterKind::Composite { .. } | ConverterKind::Object { .. } => {
                SerializedNode::from_json(item).map_err(|err| ReflectError::decode(ty.type_path(), err))?
            }
            _ => SerializedNode::leaf("", ty.type_path(), item.clone()),
        };
        self.deserialize_value(&node, ty, depth, path, anchor)
    }

    fn mismatch(&mut self, depth: usize, ty: &TypeInfo, found: &dyn Reflect) {
        let err = ReflectError::conversion(
            ty.type_path(),
            format!("a `{}` does not fit the slot", found.type_path()),
        );
        self.recorder.reflect_error(depth, &err);
    }

    // -------------------------------------------------------------------------
    // Members

    #[allow(clippy::too_many_arguments, reason = "walk state")]
    fn populate_members(
        &mut self,
        owner: &mut dyn Reflect,
        ty: &'static TypeInfo,
        node: &SerializedNode,
        ignored: &[&'static str],
        depth: usize,
        path: &MemberPath,
        anchor: &Anchor,
    ) {
        let depth = depth + 1;
        for kind in [MemberKind::Field, MemberKind::Property] {
            for child in node.children(kind) {
                if ignored.iter().any(|name| *name == child.name) {
                    self.recorder
                        .info(depth, format!("{kind} `{}` is ignored", child.name));
                    continue;
                }
                let Some(member) = ty.member(kind, &child.name) else {
                    let err = ReflectError::MemberNotFound {
                        owner: ty.type_path(),
                        namespace: kind.as_str(),
                        member: child.name.clone(),
                    };
                    self.recorder.reflect_error(depth, &err);
                    continue;
                };
                let member_path = path.member(kind, &child.name);
                self.populate_member(owner, ty, member, child, depth, &member_path, anchor);
            }
        }
    }

    #[allow(clippy::too_many_arguments, reason = "walk state")]
    fn populate_member(
        &mut self,
        owner: &mut dyn Reflect,
        ty: &'static TypeInfo,
        member: &MemberInfo,
        node: &SerializedNode,
        depth: usize,
        path: &MemberPath,
        anchor: &Anchor,
    ) {
        let kind = member.kind();
        if node.is_empty() {
            self.recorder
                .info(depth, format!("{kind} `{path}` left unchanged"));
            return;
        }
        if depth > self.env.options.max_depth {
            self.recorder.warning(
                depth,
                format!(
                    "{kind} `{path}` is beyond the maximum depth of {}",
                    self.env.options.max_depth
                ),
            );
            return;
        }
        let declared = member.type_info();
        if self.env.converters.is_denylisted(declared) {
            self.recorder.warning(
                depth,
                format!("{kind} `{path}` has the denylisted type `{}`", declared.type_path()),
            );
            return;
        }
        if !member.is_writable() {
            let err = ReflectError::MemberNotWritable {
                owner: ty.type_path(),
                member: member.name().into(),
            };
            self.recorder.reflect_error(depth, &err);
            return;
        }

        let _guard = stack::enter(declared);
        let value = match declared.kind() {
            TypeKind::ObjectRef(slot) => {
                let current = member
                    .get(owner)
                    .and_then(|value| alive(slot.target_of(&*value)));
                match self.reference_slot(node, *slot, current, depth, path, anchor) {
                    Some(value) => value,
                    None => return,
                }
            }
            _ if node.has_children() && node.value.as_ref().is_none_or(Value::is_null) => {
                let converters = self.env.converters;
                let Some(converter) = converters.resolve(declared) else {
                    let err = ReflectError::ConverterNotFound {
                        type_path: declared.type_path(),
                    };
                    self.recorder.reflect_error(depth, &err);
                    return;
                };
                let Some(mut current) = member.get(owner) else {
                    self.recorder
                        .warning(depth, format!("{kind} `{path}` could not be read"));
                    return;
                };
                let ignored = converter.kind().ignored_members();
                self.populate_members(&mut *current, declared, node, ignored, depth, path, anchor);
                current
            }
            _ => match self.deserialize_value(node, declared, depth, path, anchor) {
                Ok(value) => value,
                Err(err) => {
                    self.recorder.reflect_error(depth, &err);
                    return;
                }
            },
        };

        match member.set(owner, value) {
            Ok(()) => self.recorder.info(depth, format!("{kind} `{path}` applied")),
            Err(SetMemberError::NotWritable) => {
                let err = ReflectError::MemberNotWritable {
                    owner: ty.type_path(),
                    member: member.name().into(),
                };
                self.recorder.reflect_error(depth, &err);
            }
            Err(SetMemberError::OwnerMismatch) => {
                let err = ReflectError::conversion(path.to_string(), "the owner is not of the declaring type");
                self.recorder.reflect_error(depth, &err);
            }
            Err(SetMemberError::ValueMismatch { found }) => {
                let err = ReflectError::conversion(
                    path.to_string(),
                    format!("a `{found}` does not fit the slot"),
                );
                self.recorder.reflect_error(depth, &err);
            }
        }
    }

    // -------------------------------------------------------------------------
    // References

    /// The new value of a reference slot currently pointing at `current`.
    ///
    /// Returns `None` when the node is rejected and the slot must be left
    /// as it is.
    fn reference_slot(
        &mut self,
        node: &SerializedNode,
        slot: ObjectRefInfo,
        current: Option<Instance>,
        depth: usize,
        path: &MemberPath,
        anchor: &Anchor,
    ) -> Option<Box<dyn Reflect>> {
        if matches!(node.value, Some(Value::Null)) && !node.has_children() {
            self.recorder.info(depth, format!("`{path}` cleared"));
            return Some(slot.make(None));
        }
        let node = self.fix_reference_body(node, depth)?;
        let required = self.required_type(&node, slot.target(), depth);

        let descriptor = match &node.value {
            Some(value) => match ObjectRef::from_value(value) {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    let err = ReflectError::decode(slot.target().type_path(), err);
                    self.recorder.reflect_error(depth, &err);
                    return None;
                }
            },
            None => ObjectRef::NULL,
        };

        let resolver = ReferenceResolver::new(self.env.hooks);
        let mut found = match &node.value {
            // Children without a descriptor update the object already referenced.
            None => current.filter(|instance| instance.is_assignable_to(required)),
            Some(_) => resolver.resolve(&descriptor, self.context, required),
        };

        if let Some(instance) = &found {
            resolver.register(self.context, instance, &descriptor);
        } else if node.has_children() {
            found = self.env.hooks.instantiate(required, &descriptor);
            if let Some(instance) = &found {
                resolver.register(self.context, instance, &descriptor);
                self.recorder.info(
                    depth,
                    format!("created a new `{}` for `{path}`", instance.type_info().type_path()),
                );
            }
        }

        if node.has_children() {
            match &found {
                Some(instance) => self.populate_object(instance, &node, depth),
                None => self.recorder.warning(
                    depth,
                    format!("the members given for `{path}` have no object to go to"),
                ),
            }
        }

        match found {
            Some(instance) => {
                self.recorder.info(depth, format!("`{path}` set to `{descriptor}`"));
                Some(slot.make(Some(&instance)))
            }
            None if descriptor.is_null() => Some(slot.make(None)),
            None => {
                self.defer(anchor, path, descriptor, required, slot, depth);
                Some(slot.make(None))
            }
        }
    }

    /// Moves member lists found inside a reference value back into the node.
    fn fix_reference_body<'n>(
        &mut self,
        node: &'n SerializedNode,
        depth: usize,
    ) -> Option<Cow<'n, SerializedNode>> {
        let Some(Value::Object(map)) = &node.value else {
            return Some(Cow::Borrowed(node));
        };
        if let Some(key) = RESTRICTED_KEYS.iter().find(|key| map.contains_key(**key)) {
            self.recorder.error(
                depth,
                format!("reference `{}` carries the node key `{key}` in its value", node.name),
            );
            return None;
        }
        if !CHILD_KEYS.iter().any(|key| map.contains_key(*key)) {
            return Some(Cow::Borrowed(node));
        }

        let mut fixed = node.clone();
        let mut body = map.clone();
        for key in CHILD_KEYS {
            let Some(children) = body.remove(key) else {
                continue;
            };
            match serde_json::from_value::<Vec<SerializedNode>>(children) {
                Ok(children) if key == "fields" => fixed.fields.extend(children),
                Ok(children) => fixed.properties.extend(children),
                Err(err) => {
                    self.recorder.error(
                        depth,
                        format!("`{key}` in the value of reference `{}` is malformed: {err}", node.name),
                    );
                    return None;
                }
            }
            self.recorder.warning(
                depth,
                format!("`{key}` moved out of the value of reference `{}`", node.name),
            );
        }
        fixed.value = Some(Value::Object(body));
        Some(Cow::Owned(fixed))
    }

    /// The type named by the node when it can stand in for `declared`.
    fn required_type(
        &mut self,
        node: &SerializedNode,
        declared: &'static TypeInfo,
        depth: usize,
    ) -> &'static TypeInfo {
        if node.type_name.is_empty() || node.type_name == declared.type_path() {
            return declared;
        }
        match self.env.types.resolve_name(&node.type_name) {
            Ok(ty) if ty.is_assignable_to(declared) => ty,
            Ok(ty) => {
                self.recorder.warning(
                    depth,
                    format!(
                        "`{}` is not a `{}`, the declared type is used",
                        ty.type_path(),
                        declared.type_path()
                    ),
                );
                declared
            }
            Err(_) => {
                let err = ReflectError::TypeNotFound {
                    type_name: node.type_name.clone(),
                };
                self.recorder.reflect_error(depth, &err);
                declared
            }
        }
    }

    /// Applies the members of `node` onto a host object.
    fn populate_object(&mut self, instance: &Instance, node: &SerializedNode, depth: usize) {
        let ty = instance.type_info();
        let converters = self.env.converters;
        let Some(converter) = converters.resolve(ty) else {
            let err = ReflectError::ConverterNotFound {
                type_path: ty.type_path(),
            };
            self.recorder.reflect_error(depth, &err);
            return;
        };
        let Ok(mut value) = instance.try_borrow_mut() else {
            self.recorder.warning(
                depth,
                format!("{instance:?} is already being populated, its members are skipped"),
            );
            return;
        };
        let anchor = Anchor::Instance(instance.clone());
        let ignored = converter.kind().ignored_members();
        self.populate_members(&mut *value, ty, node, ignored, depth, &MemberPath::new(), &anchor);
    }

    fn defer(
        &mut self,
        anchor: &Anchor,
        path: &MemberPath,
        descriptor: ObjectRef,
        required: &'static TypeInfo,
        slot: ObjectRefInfo,
        depth: usize,
    ) {
        log::trace!("`{path}` deferred until `{descriptor}` is known");
        self.pending.push(Fixup {
            anchor: anchor.clone(),
            path: path.clone(),
            descriptor,
            required,
            slot,
            depth,
        });
    }

    /// Second phase: retries every deferred reference against the context.
    fn resolve_pending(&mut self, mut root: Option<&mut dyn Reflect>) {
        let resolver = ReferenceResolver::new(self.env.hooks);
        for fixup in core::mem::take(&mut self.pending) {
            let Fixup {
                anchor,
                path,
                descriptor,
                required,
                slot,
                depth,
            } = fixup;

            let Some(instance) = resolver.resolve(&descriptor, self.context, required) else {
                let err = ReflectError::ReferenceUnresolved {
                    reference: descriptor.to_string(),
                    required: required.type_path(),
                };
                self.recorder.reflect_error(depth, &err);
                continue;
            };

            let value = slot.make(Some(&instance));
            let written = match &anchor {
                Anchor::Root => match root.as_deref_mut() {
                    Some(root) => path.set_at(root, value).map_err(|err| err.to_string()),
                    None => Err(String::from("the root value is gone")),
                },
                Anchor::Instance(owner) => match owner.try_borrow_mut() {
                    Ok(mut owner) => path.set_at(&mut *owner, value).map_err(|err| err.to_string()),
                    Err(_) => Err(String::from("the owning object is borrowed")),
                },
            };
            match written {
                Ok(()) => self
                    .recorder
                    .info(depth, format!("`{path}` set to `{descriptor}` after the walk")),
                Err(reason) => {
                    let err = ReflectError::conversion(path.to_string(), reason);
                    self.recorder.reflect_error(depth, &err);
                }
            }
        }
    }
}

fn alive(target: RefTarget) -> Option<Instance> {
    match target {
        RefTarget::Alive(instance) => Some(instance),
        RefTarget::Null | RefTarget::Destroyed { .. } => None,
    }
}
