use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use serde_json::Value;

use crate::error::WireError;
use crate::info::{MemberInfo, MemberKind, Typed};
use crate::object::Instance;
use crate::options::NumberHandling;
use crate::reflection::Reflect;

// -----------------------------------------------------------------------------
// TypeInfo

/// Explicit descriptor of a reflected type.
///
/// Lists the structural [`TypeKind`] of the type, its fields and properties,
/// an optional base type used for assignability checks, and an optional
/// default constructor.
///
/// The base chain is a pure "is-a" declaration: members are never inherited
/// through it, a derived type lists all of its members itself.
pub struct TypeInfo {
    type_id: TypeId,
    type_path: &'static str,
    type_name: &'static str,
    kind: TypeKind,
    base: Option<fn() -> &'static TypeInfo>,
    default: Option<fn() -> Box<dyn Reflect>>,
    fields: Vec<MemberInfo>,
    properties: Vec<MemberInfo>,
}

fn default_of<T: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

/// Returns the last segment of a `::` or `.` separated path.
///
/// Generic arguments are kept, so `alloc::vec::Vec<f32>` gives `Vec<f32>`.
pub fn short_type_name(type_path: &str) -> &str {
    let head = match type_path.find('<') {
        Some(index) => &type_path[..index],
        None => type_path,
    };
    let start = head.rfind([':', '.']).map_or(0, |index| index + 1);
    &type_path[start..]
}

impl TypeInfo {
    /// Creates a descriptor of `T` with the given kind and no members.
    pub fn new<T: Typed>(type_path: &'static str, kind: TypeKind) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path,
            type_name: short_type_name(type_path),
            kind,
            base: None,
            default: None,
            fields: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// A plain data type, walked member by member.
    #[inline]
    pub fn composite<T: Typed>(type_path: &'static str) -> Self {
        Self::new::<T>(type_path, TypeKind::Composite)
    }

    /// A host-managed object type, only ever shared through [`Instance`].
    #[inline]
    pub fn object<T: Typed>(type_path: &'static str) -> Self {
        Self::new::<T>(type_path, TypeKind::Object)
    }

    #[inline]
    pub fn with_name(mut self, type_name: &'static str) -> Self {
        self.type_name = type_name;
        self
    }

    /// Declares `B` as the direct base of this type.
    #[inline]
    pub fn with_base<B: Typed>(mut self) -> Self {
        self.base = Some(B::type_info);
        self
    }

    #[inline]
    pub fn with_default<T: Reflect + Default>(mut self) -> Self {
        self.default = Some(default_of::<T>);
        self
    }

    pub fn with_field(mut self, member: MemberInfo) -> Self {
        debug_assert_eq!(member.kind(), MemberKind::Field);
        self.fields.push(member);
        self
    }

    pub fn with_property(mut self, member: MemberInfo) -> Self {
        debug_assert_eq!(member.kind(), MemberKind::Property);
        self.properties.push(member);
        self
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full path, e.g. `Game.Player`.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Last path segment, e.g. `Player`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    #[inline]
    pub fn base(&self) -> Option<&'static TypeInfo> {
        self.base.map(|f| f())
    }

    #[inline]
    pub fn fields(&self) -> &[MemberInfo] {
        &self.fields
    }

    #[inline]
    pub fn properties(&self) -> &[MemberInfo] {
        &self.properties
    }

    pub fn members(&self, kind: MemberKind) -> &[MemberInfo] {
        match kind {
            MemberKind::Field => &self.fields,
            MemberKind::Property => &self.properties,
        }
    }

    pub fn field(&self, name: &str) -> Option<&MemberInfo> {
        self.fields.iter().find(|m| m.name() == name)
    }

    pub fn property(&self, name: &str) -> Option<&MemberInfo> {
        self.properties.iter().find(|m| m.name() == name)
    }

    pub fn member(&self, kind: MemberKind, name: &str) -> Option<&MemberInfo> {
        self.members(kind).iter().find(|m| m.name() == name)
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Constructs the default value, if the type declared one.
    #[inline]
    pub fn default_value(&self) -> Option<Box<dyn Reflect>> {
        self.default.map(|f| f())
    }

    /// Number of base steps from `self` up to `target`, `0` for the same type.
    pub fn distance_to(&self, target: TypeId) -> Option<usize> {
        let mut current = Some(self);
        let mut distance = 0;
        while let Some(info) = current {
            if info.type_id == target {
                return Some(distance);
            }
            current = info.base();
            distance += 1;
        }
        None
    }

    /// Whether a value of this type can stand in for `target`.
    #[inline]
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        self.distance_to(target.type_id).is_some()
    }

    /// For reference slots, the referenced type, otherwise `self`.
    pub fn effective(&'static self) -> &'static TypeInfo {
        match &self.kind {
            TypeKind::ObjectRef(info) => info.target(),
            _ => self,
        }
    }
}

impl PartialEq for TypeInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_path", &self.type_path)
            .field("kind", &self.kind)
            .field("fields", &self.fields)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeKind

/// Structural shape of a type, with the hooks needed to convert it.
pub enum TypeKind {
    /// Scalars and strings, carried as a single JSON value.
    Primitive(CodecInfo),
    /// Fieldless enums, carried by variant name.
    Enum(EnumInfo),
    /// Small numeric aggregates with a hand-written wire form.
    Value(CodecInfo),
    /// Ordered collections.
    List(ListInfo),
    /// Host-managed objects, reached through [`Instance`].
    Object,
    /// Slots holding a reference to a host-managed object.
    ObjectRef(ObjectRefInfo),
    /// Plain data walked member by member.
    Composite,
}

impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primitive(_) => "Primitive",
            Self::Enum(_) => "Enum",
            Self::Value(_) => "Value",
            Self::List(_) => "List",
            Self::Object => "Object",
            Self::ObjectRef(_) => "ObjectRef",
            Self::Composite => "Composite",
        })
    }
}

// -----------------------------------------------------------------------------
// CodecInfo

/// Encode and decode hooks of a type carried as one JSON value.
#[derive(Clone, Copy)]
pub struct CodecInfo {
    encode: fn(&dyn Reflect, NumberHandling) -> Result<Value, WireError>,
    decode: fn(&Value, NumberHandling) -> Result<Box<dyn Reflect>, WireError>,
    schema: fn() -> Value,
}

impl CodecInfo {
    pub const fn new(
        encode: fn(&dyn Reflect, NumberHandling) -> Result<Value, WireError>,
        decode: fn(&Value, NumberHandling) -> Result<Box<dyn Reflect>, WireError>,
        schema: fn() -> Value,
    ) -> Self {
        Self {
            encode,
            decode,
            schema,
        }
    }

    #[inline]
    pub fn encode(&self, value: &dyn Reflect, handling: NumberHandling) -> Result<Value, WireError> {
        (self.encode)(value, handling)
    }

    #[inline]
    pub fn decode(
        &self,
        value: &Value,
        handling: NumberHandling,
    ) -> Result<Box<dyn Reflect>, WireError> {
        (self.decode)(value, handling)
    }

    #[inline]
    pub fn schema(&self) -> Value {
        (self.schema)()
    }
}

// -----------------------------------------------------------------------------
// EnumInfo

#[derive(Clone, Copy)]
pub struct EnumInfo {
    variants: &'static [&'static str],
    name_of: fn(&dyn Reflect) -> Option<&'static str>,
    from_name: fn(&str) -> Option<Box<dyn Reflect>>,
}

impl EnumInfo {
    pub const fn new(
        variants: &'static [&'static str],
        name_of: fn(&dyn Reflect) -> Option<&'static str>,
        from_name: fn(&str) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            variants,
            name_of,
            from_name,
        }
    }

    #[inline]
    pub fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    #[inline]
    pub fn variant_name(&self, value: &dyn Reflect) -> Option<&'static str> {
        (self.name_of)(value)
    }

    /// Decodes a variant from its name, matched exactly first and then
    /// ignoring ASCII case, or from its declaration index.
    pub fn decode(&self, value: &Value) -> Result<Box<dyn Reflect>, WireError> {
        let name = match value {
            Value::String(name) => self
                .variants
                .iter()
                .find(|v| **v == name.as_str())
                .or_else(|| self.variants.iter().find(|v| v.eq_ignore_ascii_case(name))),
            Value::Number(index) => index
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| self.variants.get(i)),
            _ => None,
        };
        name.and_then(|name| (self.from_name)(name)).ok_or_else(|| {
            WireError::mismatch(format_args!(
                "`{value}` is not one of {:?}",
                self.variants
            ))
        })
    }
}

// -----------------------------------------------------------------------------
// ListInfo

#[derive(Clone, Copy)]
pub struct ListInfo {
    item: fn() -> &'static TypeInfo,
    len: fn(&dyn Reflect) -> usize,
    get: fn(&dyn Reflect, usize) -> Option<Box<dyn Reflect>>,
    set: fn(&mut dyn Reflect, usize, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>,
    from_items: fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl ListInfo {
    pub const fn new(
        item: fn() -> &'static TypeInfo,
        len: fn(&dyn Reflect) -> usize,
        get: fn(&dyn Reflect, usize) -> Option<Box<dyn Reflect>>,
        set: fn(&mut dyn Reflect, usize, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>,
        from_items: fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    ) -> Self {
        Self {
            item,
            len,
            get,
            set,
            from_items,
        }
    }

    /// Declared type of the elements.
    #[inline]
    pub fn item(&self) -> &'static TypeInfo {
        (self.item)()
    }

    #[inline]
    pub fn len(&self, list: &dyn Reflect) -> usize {
        (self.len)(list)
    }

    /// Clones the element at `index`.
    #[inline]
    pub fn get(&self, list: &dyn Reflect, index: usize) -> Option<Box<dyn Reflect>> {
        (self.get)(list, index)
    }

    #[inline]
    pub fn set(
        &self,
        list: &mut dyn Reflect,
        index: usize,
        value: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>> {
        (self.set)(list, index, value)
    }

    /// Builds a list from its elements, returning the first mistyped one.
    #[inline]
    pub fn from_items(
        &self,
        items: Vec<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.from_items)(items)
    }
}

// -----------------------------------------------------------------------------
// ObjectRefInfo

/// What a reference slot currently points at.
pub enum RefTarget {
    Null,
    /// The host destroyed the object after the reference was taken.
    Destroyed { id: i64 },
    Alive(Instance),
}

#[derive(Clone, Copy)]
pub struct ObjectRefInfo {
    target: fn() -> &'static TypeInfo,
    target_of: fn(&dyn Reflect) -> RefTarget,
    make: fn(Option<&Instance>) -> Box<dyn Reflect>,
}

impl ObjectRefInfo {
    pub const fn new(
        target: fn() -> &'static TypeInfo,
        target_of: fn(&dyn Reflect) -> RefTarget,
        make: fn(Option<&Instance>) -> Box<dyn Reflect>,
    ) -> Self {
        Self {
            target,
            target_of,
            make,
        }
    }

    /// Declared type of the referenced objects.
    #[inline]
    pub fn target(&self) -> &'static TypeInfo {
        (self.target)()
    }

    #[inline]
    pub fn target_of(&self, slot: &dyn Reflect) -> RefTarget {
        (self.target_of)(slot)
    }

    /// Builds a slot value pointing at `instance`, or a null slot.
    #[inline]
    pub fn make(&self, instance: Option<&Instance>) -> Box<dyn Reflect> {
        (self.make)(instance)
    }
}

// -----------------------------------------------------------------------------
// Tests
