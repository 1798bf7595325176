use alloc::string::String;

use crate::info::TypeInfo;
use crate::object::Instance;
use crate::refs::{DeserializationContext, HostHooks, ObjectRef};

// -----------------------------------------------------------------------------
// ReferenceResolver

/// Maps reference descriptors to live objects.
///
/// Lookup order is the call context, then the handle, the path and the
/// content id. A hit only counts when the object is assignable to the
/// required type. When every direct lookup misses, the objects stored
/// alongside at the same location are searched for an assignable one: a
/// texture asset may keep its sprite as a sub-asset, for example.
#[derive(Clone, Copy)]
pub struct ReferenceResolver<'a> {
    hooks: &'a dyn HostHooks,
}

impl<'a> ReferenceResolver<'a> {
    #[inline]
    pub fn new(hooks: &'a dyn HostHooks) -> Self {
        Self { hooks }
    }

    /// Resolves `descriptor` to an object assignable to `required`.
    pub fn resolve(
        &self,
        descriptor: &ObjectRef,
        context: &DeserializationContext,
        required: &TypeInfo,
    ) -> Option<Instance> {
        if descriptor.is_null() {
            return None;
        }
        let accept = |found: Instance| found.is_assignable_to(required).then_some(found);

        if let Some(found) = context.lookup(descriptor).and_then(accept) {
            log::trace!("`{descriptor}` found in context as {}", required.type_path());
            return Some(found);
        }

        // Where to look for sub-assets when no direct hit is assignable.
        let mut location: Option<String> = None;

        if descriptor.instance_id != 0
            && let Some(found) = self.hooks.resolve_by_handle(descriptor.instance_id)
        {
            if found.is_assignable_to(required) {
                return Some(found);
            }
            location = self.hooks.asset_path_of(&found);
        }

        if let Some(path) = descriptor.asset_path() {
            if let Some(found) = self.hooks.resolve_by_path(path, required).and_then(accept) {
                return Some(found);
            }
            location.get_or_insert_with(|| path.into());
        }

        if let Some(guid) = descriptor.asset_guid() {
            if let Some(found) = self.hooks.resolve_by_content_id(guid, required) {
                if found.is_assignable_to(required) {
                    return Some(found);
                }
                if location.is_none() {
                    location = self.hooks.asset_path_of(&found);
                }
            }
            if location.is_none() {
                location = self.hooks.path_of_content_id(guid);
            }
        }

        let path = location?;
        let found = self
            .hooks
            .sub_assets_at(&path)
            .into_iter()
            .find(|candidate| candidate.is_assignable_to(required));
        if found.is_some() {
            log::trace!("`{descriptor}` resolved among the sub-assets at `{path}`");
        }
        found
    }

    /// Registers `instance` in `context` under the keys of `descriptor` and
    /// under the path and content id the host knows for it.
    pub fn register(
        &self,
        context: &mut DeserializationContext,
        instance: &Instance,
        descriptor: &ObjectRef,
    ) {
        context.register(instance, descriptor);
        context.register(instance, &self.describe(instance));
    }

    /// Builds the descriptor written for a live object.
    pub fn describe(&self, instance: &Instance) -> ObjectRef {
        ObjectRef {
            instance_id: instance.id(),
            asset_path: self.hooks.asset_path_of(instance),
            asset_guid: self.hooks.content_id_of(instance),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
