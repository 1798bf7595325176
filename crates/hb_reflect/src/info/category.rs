use core::fmt;

use crate::info::{TypeInfo, TypeKind};

/// Structural category a type belongs to, as seen by the converter registry.
///
/// Both host object types and reference slots classify as
/// [`ObjectReference`](TypeCategory::ObjectReference): the serializer never
/// embeds one object in another, it only emits descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Primitive,
    Enum,
    StructuredValue,
    Collection,
    ObjectReference,
    Composite,
}

impl TypeCategory {
    /// Classifies a type. Stateless and total.
    pub fn of(info: &TypeInfo) -> Self {
        match info.kind() {
            TypeKind::Primitive(_) => Self::Primitive,
            TypeKind::Enum(_) => Self::Enum,
            TypeKind::Value(_) => Self::StructuredValue,
            TypeKind::List(_) => Self::Collection,
            TypeKind::Object | TypeKind::ObjectRef(_) => Self::ObjectReference,
            TypeKind::Composite => Self::Composite,
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Enum => "enum",
            Self::StructuredValue => "structured value",
            Self::Collection => "collection",
            Self::ObjectReference => "object reference",
            Self::Composite => "composite",
        }
    }
}

impl fmt::Display for TypeCategory {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
