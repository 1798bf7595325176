use alloc::vec::Vec;
use core::fmt;

use crate::info::{CodecInfo, TypeCategory, TypeInfo};

// -----------------------------------------------------------------------------
// Priorities

/// Priority of a converter matching by [`TypeCategory`].
pub const CATEGORY_PRIORITY: u32 = 1;
/// Priority of a converter matching the exact type.
pub const EXACT_PRIORITY: u32 = 20_000;
/// Priority of a converter matching a base type at distance `0`.
///
/// Each base step away from the target lowers it by one.
pub const DERIVED_PRIORITY: u32 = 10_000;

/// Member names the object converter skips by default.
///
/// They point back at the owning scene structure, and following them would
/// serialize the whole hierarchy.
pub const DEFAULT_IGNORED_OBJECT_MEMBERS: &[&str] = &["gameObject", "transform", "scene"];

// -----------------------------------------------------------------------------
// ConverterTarget

/// What a converter declares it can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterTarget {
    /// Every type of a structural category.
    Category(TypeCategory),
    /// Exactly one type.
    Exact(&'static TypeInfo),
    /// A type and everything whose base chain reaches it.
    Derived(&'static TypeInfo),
}

impl ConverterTarget {
    /// Priority of this target for `ty`, `None` when it does not apply.
    pub fn priority(&self, ty: &TypeInfo) -> Option<u32> {
        match self {
            Self::Category(category) => {
                (TypeCategory::of(ty) == *category).then_some(CATEGORY_PRIORITY)
            }
            Self::Exact(target) => (ty.type_id() == target.type_id()).then_some(EXACT_PRIORITY),
            Self::Derived(target) => {
                let distance = ty.distance_to(target.type_id())?;
                let distance = u32::try_from(distance).unwrap_or(DERIVED_PRIORITY);
                Some(DERIVED_PRIORITY.saturating_sub(distance))
            }
        }
    }
}

impl fmt::Display for ConverterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(category) => write!(f, "any {category}"),
            Self::Exact(target) => f.write_str(target.type_path()),
            Self::Derived(target) => write!(f, "{} and derived", target.type_path()),
        }
    }
}

// -----------------------------------------------------------------------------
// ConverterKind

/// How a converter turns values into nodes and back.
#[derive(Clone)]
pub enum ConverterKind {
    /// The primitive codec of the type.
    Primitive,
    /// The variant name.
    Enumeration,
    /// The fixed wire codec of a structured value type.
    Structured,
    /// Element-wise, each element with its own converter.
    Collection,
    /// Member by member.
    Composite { ignored: Vec<&'static str> },
    /// Reference descriptors, with the members of the root object expanded.
    Object { ignored: Vec<&'static str> },
    /// A caller-supplied codec carried as a single value.
    Custom(CodecInfo),
}

impl ConverterKind {
    /// Member names this converter never reads or writes.
    pub fn ignored_members(&self) -> &[&'static str] {
        match self {
            Self::Composite { ignored } | Self::Object { ignored } => ignored,
            _ => &[],
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "Primitive",
            Self::Enumeration => "Enumeration",
            Self::Structured => "Structured",
            Self::Collection => "Collection",
            Self::Composite { .. } => "Composite",
            Self::Object { .. } => "Object",
            Self::Custom(_) => "Custom",
        }
    }
}

impl fmt::Debug for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composite { ignored } | Self::Object { ignored } => f
                .debug_struct(self.as_str())
                .field("ignored", ignored)
                .finish(),
            _ => f.write_str(self.as_str()),
        }
    }
}

// -----------------------------------------------------------------------------
// Converter

/// A registered converter: a name, the types it handles and how.
///
/// # Examples
///
/// ```
/// use hb_reflect::info::{TypeCategory, Typed};
/// use hb_reflect::registry::{Converter, ConverterKind};
///
/// let c = Converter::category("Floats", TypeCategory::Primitive, ConverterKind::Primitive);
/// assert_eq!(c.priority(f32::type_info()), Some(1));
/// assert_eq!(c.priority(Vec::<f32>::type_info()), None);
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    name: &'static str,
    target: ConverterTarget,
    kind: ConverterKind,
}

impl Converter {
    #[inline]
    pub const fn new(name: &'static str, target: ConverterTarget, kind: ConverterKind) -> Self {
        Self { name, target, kind }
    }

    #[inline]
    pub const fn category(name: &'static str, category: TypeCategory, kind: ConverterKind) -> Self {
        Self::new(name, ConverterTarget::Category(category), kind)
    }

    #[inline]
    pub const fn exact(name: &'static str, target: &'static TypeInfo, kind: ConverterKind) -> Self {
        Self::new(name, ConverterTarget::Exact(target), kind)
    }

    #[inline]
    pub const fn derived(name: &'static str, target: &'static TypeInfo, kind: ConverterKind) -> Self {
        Self::new(name, ConverterTarget::Derived(target), kind)
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn target(&self) -> &ConverterTarget {
        &self.target
    }

    #[inline]
    pub fn kind(&self) -> &ConverterKind {
        &self.kind
    }

    #[inline]
    pub fn priority(&self, ty: &TypeInfo) -> Option<u32> {
        self.target.priority(ty)
    }
}
