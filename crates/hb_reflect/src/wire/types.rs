use crate::impls::TypeInfoCell;
use crate::info::{CodecInfo, MemberInfo, TypeInfo, TypeKind, Typed};
use crate::reflection::Reflect;

use super::aggregate::{Aggregate, decode_reflect, encode_reflect, impl_nested_component, schema};

// -----------------------------------------------------------------------------
// Descriptor

/// Builds the descriptor of a structured value type.
///
/// The components are exposed as fields so a partial tree can patch a single
/// component of an existing value.
pub fn aggregate_type_info<A>(type_path: &'static str) -> TypeInfo
where
    A: Aggregate + Reflect + Typed,
    A::Component: Reflect + Typed,
{
    let codec = CodecInfo::new(encode_reflect::<A>, decode_reflect::<A>, schema::<A>);
    A::COMPONENTS.iter().enumerate().fold(
        TypeInfo::new::<A>(type_path, TypeKind::Value(codec)).with_default::<A>(),
        |info, (index, name)| {
            info.with_field(MemberInfo::component::<A, A::Component>(
                *name,
                index,
                A::component,
                A::set_component,
            ))
        },
    )
}

macro_rules! impl_value_type {
    (
        $(#[$meta:meta])*
        $ty:ident: $component:ty, $path:literal, [$($field:ident),+ $(,)?]
        $(, bounds = $bounds:expr)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $ty {
            $(pub $field: $component,)+
        }

        impl $ty {
            #[inline]
            pub const fn new($($field: $component),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl Aggregate for $ty {
            type Component = $component;

            const TYPE_NAME: &'static str = stringify!($ty);
            const COMPONENTS: &'static [&'static str] = &[$(stringify!($field)),+];
            $(const BOUNDS: Option<(f64, f64)> = Some($bounds);)?

            fn component(&self, index: usize) -> $component {
                let values = [$(self.$field),+];
                values.get(index).copied().unwrap_or_default()
            }

            fn set_component(&mut self, index: usize, value: $component) {
                let mut slots = [$(&mut self.$field),+];
                if let Some(slot) = slots.get_mut(index) {
                    **slot = value;
                }
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: TypeInfoCell = TypeInfoCell::new();
                CELL.get_or_init(|| aggregate_type_info::<Self>($path))
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Vectors

impl_value_type! {
    /// A 2-component float vector.
    #[derive(Default)]
    Vector2: f32, "hb_reflect::wire::Vector2", [x, y]
}

impl_value_type! {
    /// A 3-component float vector.
    #[derive(Default)]
    Vector3: f32, "hb_reflect::wire::Vector3", [x, y, z]
}

impl_value_type! {
    #[derive(Default)]
    Vector4: f32, "hb_reflect::wire::Vector4", [x, y, z, w]
}

impl_value_type! {
    /// A rotation. The wire form carries the raw components, the
    /// default value is all zeros rather than the identity.
    #[derive(Default)]
    Quaternion: f32, "hb_reflect::wire::Quaternion", [x, y, z, w]
}

impl_value_type! {
    #[derive(Default)]
    Vector2Int: i32, "hb_reflect::wire::Vector2Int", [x, y]
}

impl_value_type! {
    #[derive(Default)]
    Vector3Int: i32, "hb_reflect::wire::Vector3Int", [x, y, z]
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);
}

// -----------------------------------------------------------------------------
// Colors

impl_value_type! {
    /// A linear color with components in `0..=1`.
    ///
    /// A missing alpha decodes as opaque.
    Color: f32, "hb_reflect::wire::Color", [r, g, b, a], bounds = (0.0, 1.0)
}

impl_value_type! {
    /// A 32-bit color with byte components.
    Color32: u8, "hb_reflect::wire::Color32", [r, g, b, a]
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
}

impl Default for Color32 {
    fn default() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

// -----------------------------------------------------------------------------
// Rects

impl_value_type! {
    #[derive(Default)]
    Rect: f32, "hb_reflect::wire::Rect", [x, y, width, height]
}

impl_value_type! {
    #[derive(Default)]
    RectInt: i32, "hb_reflect::wire::RectInt", [x, y, width, height]
}

// -----------------------------------------------------------------------------
// Bounds

impl_nested_component!(Vector3, Vector3Int);

impl_value_type! {
    /// An axis-aligned box. The wire form nests two vector objects.
    #[derive(Default)]
    Bounds: Vector3, "hb_reflect::wire::Bounds", [center, size]
}

impl_value_type! {
    #[derive(Default)]
    BoundsInt: Vector3Int, "hb_reflect::wire::BoundsInt", [position, size]
}

// -----------------------------------------------------------------------------
// Matrix4x4

/// A 4x4 float matrix, stored row-major as `m00`, `m01` .. `m33`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4x4 {
    pub m: [f32; 16],
}

impl Matrix4x4 {
    pub const ZERO: Self = Self { m: [0.0; 16] };

    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    #[inline]
    pub const fn from_rows(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Element at `row`, `column`.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> f32 {
        self.m[row * 4 + column]
    }
}

impl Default for Matrix4x4 {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl Aggregate for Matrix4x4 {
    type Component = f32;

    const TYPE_NAME: &'static str = "Matrix4x4";
    const COMPONENTS: &'static [&'static str] = &[
        "m00", "m01", "m02", "m03", //
        "m10", "m11", "m12", "m13", //
        "m20", "m21", "m22", "m23", //
        "m30", "m31", "m32", "m33",
    ];

    #[inline]
    fn component(&self, index: usize) -> f32 {
        self.m.get(index).copied().unwrap_or_default()
    }

    #[inline]
    fn set_component(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.m.get_mut(index) {
            *slot = value;
        }
    }
}

impl Typed for Matrix4x4 {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| aggregate_type_info::<Self>("hb_reflect::wire::Matrix4x4"))
    }
}
