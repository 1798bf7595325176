use core::fmt;

use hb_utils::hash::HashMap;

use crate::object::Instance;
use crate::refs::{ObjectRef, ReferenceKey};

// -----------------------------------------------------------------------------
// DeserializationContext

/// Per-call map from reference descriptors to resolved live objects.
///
/// An object is registered under all of its descriptors before the walk
/// descends into it, so a reference to it met deeper in the same tree
/// (a cycle, or a forward reference) resolves to the same instance.
///
/// # Examples
///
/// ```
/// use hb_reflect::Instance;
/// use hb_reflect::refs::{DeserializationContext, ObjectRef};
///
/// let mut context = DeserializationContext::new();
/// let object = Instance::new(3, 1.5_f32);
/// context.register(&object, &ObjectRef::default().with_asset_path("Assets/a.asset"));
///
/// let found = context.lookup(&ObjectRef::from_handle(3)).unwrap();
/// assert!(found.ptr_eq(&object));
/// assert!(context.lookup(&ObjectRef::default().with_asset_path("Assets/a.asset")).is_some());
/// ```
#[derive(Default)]
pub struct DeserializationContext {
    resolved: HashMap<ReferenceKey, Instance>,
}

impl DeserializationContext {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `instance` under every key of `descriptor` and under its own handle.
    ///
    /// Existing entries are replaced.
    pub fn register(&mut self, instance: &Instance, descriptor: &ObjectRef) {
        for key in descriptor.keys() {
            self.resolved.insert(key, instance.clone());
        }
        if instance.id() != 0 {
            self.resolved
                .insert(ReferenceKey::InstanceHandle(instance.id()), instance.clone());
        }
    }

    /// First registered object matching a key of `descriptor`, in key precedence.
    pub fn lookup(&self, descriptor: &ObjectRef) -> Option<Instance> {
        descriptor.keys().find_map(|key| self.get(&key))
    }

    #[inline]
    pub fn get(&self, key: &ReferenceKey) -> Option<Instance> {
        self.resolved.get(key).cloned()
    }

    #[inline]
    pub fn contains(&self, key: &ReferenceKey) -> bool {
        self.resolved.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    pub fn clear(&mut self) {
        self.resolved.clear();
    }
}

impl fmt::Debug for DeserializationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.resolved.iter().map(|(k, v)| (k, v.id())))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
