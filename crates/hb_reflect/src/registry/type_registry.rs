use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use hb_utils::TypeIdMap;
use hb_utils::hash::{HashMap, HashSet};

use crate::info::{TypeInfo, TypeKind, Typed};
use crate::wire;

// -----------------------------------------------------------------------------
// RegistryError

/// A type name that does not designate exactly one registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    Unknown(String),
    /// The short name is shared by several registered types.
    Ambiguous(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(name) => write!(f, "type `{name}` is not registered"),
            Self::Ambiguous(name) => write!(
                f,
                "type name `{name}` is ambiguous, use the full type path"
            ),
        }
    }
}

impl core::error::Error for RegistryError {}

// -----------------------------------------------------------------------------
// TypeRegistry

/// Known types, addressable by [`TypeId`], full type path or short name.
///
/// Serialized nodes name their type by path. The registry turns that name
/// back into a descriptor when a node carries a more derived type than the
/// declared one, or when a value is created from a tree alone.
///
/// # Example
///
/// ```
/// use hb_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let info = registry.get_with_type_name("Vector3").unwrap();
/// assert_eq!(info.type_path(), "hb_reflect::wire::Vector3");
/// assert!(registry.get_with_type_path("hb_reflect::wire::Vector3").is_some());
/// ```
pub struct TypeRegistry {
    types: TypeIdMap<&'static TypeInfo>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub fn empty() -> Self {
        Self {
            types: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// Create a type registry with the built-in types registered.
    ///
    /// - `bool` `i32` `i64` `u8` `u32` `u64` `f32` `f64` `String`
    /// - every structured value type of [`wire`]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<u8>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<wire::Vector2>();
        registry.register::<wire::Vector3>();
        registry.register::<wire::Vector4>();
        registry.register::<wire::Vector2Int>();
        registry.register::<wire::Vector3Int>();
        registry.register::<wire::Quaternion>();
        registry.register::<wire::Color>();
        registry.register::<wire::Color32>();
        registry.register::<wire::Rect>();
        registry.register::<wire::RectInt>();
        registry.register::<wire::Bounds>();
        registry.register::<wire::BoundsInt>();
        registry.register::<wire::Matrix4x4>();
        registry
    }

    /// Registers `T` together with its member, item, target and base types.
    ///
    /// Returns `false` if `T` was already registered.
    #[inline]
    pub fn register<T: Typed>(&mut self) -> bool {
        self.register_info(T::type_info())
    }

    /// See [`register`](Self::register).
    pub fn register_info(&mut self, info: &'static TypeInfo) -> bool {
        if !self.types.try_insert(info.type_id(), || info) {
            return false;
        }
        self.add_indices(info);

        let mut dependencies: Vec<&'static TypeInfo> = info
            .fields()
            .iter()
            .chain(info.properties())
            .map(|m| m.type_info())
            .collect();
        dependencies.extend(info.base());
        match info.kind() {
            TypeKind::List(list) => dependencies.push(list.item()),
            TypeKind::ObjectRef(slot) => dependencies.push(slot.target()),
            _ => {}
        }
        for dependency in dependencies {
            self.register_info(dependency);
        }
        true
    }

    fn add_indices(&mut self, info: &'static TypeInfo) {
        let type_name = info.type_name();
        if !self.ambiguous_names.contains(type_name) {
            if self.type_name_to_id.contains_key(type_name) {
                self.type_name_to_id.remove(type_name);
                self.ambiguous_names.insert(type_name);
            } else {
                self.type_name_to_id.insert(type_name, info.type_id());
            }
        }
        self.type_path_to_id.insert(info.type_path(), info.type_id());
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.types.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.types.get(&type_id).copied()
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static TypeInfo> {
        self.type_path_to_id
            .get(type_path)
            .and_then(|id| self.get(*id))
    }

    pub fn get_with_type_name(&self, type_name: &str) -> Option<&'static TypeInfo> {
        self.type_name_to_id
            .get(type_name)
            .and_then(|id| self.get(*id))
    }

    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Looks a name up as a full path first, then as a short name.
    pub fn resolve_name(&self, name: &str) -> Result<&'static TypeInfo, RegistryError> {
        if let Some(info) = self.get_with_type_path(name) {
            return Ok(info);
        }
        if self.is_ambiguous(name) {
            return Err(RegistryError::Ambiguous(name.into()));
        }
        self.get_with_type_name(name)
            .ok_or_else(|| RegistryError::Unknown(name.into()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &'static TypeInfo> + '_ {
        self.types.values().copied()
    }
}

// -----------------------------------------------------------------------------
// Tests
