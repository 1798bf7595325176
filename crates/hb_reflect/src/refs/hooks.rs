use alloc::string::String;
use alloc::vec::Vec;

use crate::info::{MemberFlags, MemberInfo, TypeInfo};
use crate::object::Instance;
use crate::refs::ObjectRef;

// -----------------------------------------------------------------------------
// HostHooks

/// Capabilities the host lends to the codec for one call.
///
/// Every method has a conservative default, so a host only overrides what
/// it can actually answer. Lookups by path and content id receive the
/// required type: a host that keeps several representations at one location
/// may use it to pick the right one, but the resolver filters the result
/// by assignability either way.
pub trait HostHooks {
    /// Whether `member` of `owner` takes part in serialization.
    ///
    /// The default skips members flagged [`MemberFlags::OBSOLETE`] or
    /// [`MemberFlags::NON_SERIALIZED`].
    fn is_serializable_member(&self, owner: &TypeInfo, member: &MemberInfo) -> bool {
        let _ = owner;
        !member
            .flags()
            .intersects(MemberFlags::OBSOLETE | MemberFlags::NON_SERIALIZED)
    }

    /// Finds a live object by numeric handle.
    fn resolve_by_handle(&self, instance_id: i64) -> Option<Instance> {
        let _ = instance_id;
        None
    }

    /// Loads the main object stored at `path`.
    fn resolve_by_path(&self, path: &str, required: &TypeInfo) -> Option<Instance> {
        let _ = (path, required);
        None
    }

    /// Loads the object with the given content id.
    fn resolve_by_content_id(&self, guid: &str, required: &TypeInfo) -> Option<Instance> {
        let _ = (guid, required);
        None
    }

    /// Every object stored at `path`, main object included.
    fn sub_assets_at(&self, path: &str) -> Vec<Instance> {
        let _ = path;
        Vec::new()
    }

    /// Location of the object with the given content id.
    fn path_of_content_id(&self, guid: &str) -> Option<String> {
        let _ = guid;
        None
    }

    /// Location of a persisted object, `None` for scene objects.
    fn asset_path_of(&self, instance: &Instance) -> Option<String> {
        let _ = instance;
        None
    }

    /// Content id of a persisted object.
    fn content_id_of(&self, instance: &Instance) -> Option<String> {
        let _ = instance;
        None
    }

    /// Creates a new host object of type `ty` for a reference that could
    /// not be resolved but carries a body to populate.
    fn instantiate(&self, ty: &'static TypeInfo, descriptor: &ObjectRef) -> Option<Instance> {
        let _ = (ty, descriptor);
        None
    }
}

/// A host that answers no lookups.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl HostHooks for NoHooks {}
