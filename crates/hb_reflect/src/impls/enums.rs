/// Implements [`Typed`](crate::info::Typed) for a fieldless enum.
///
/// Every variant must be listed, in declaration order: the position in the
/// list is the index accepted on decode. The enum must implement `Clone`.
///
/// # Examples
///
/// ```
/// use hb_reflect::info::{TypeKind, Typed};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Team {
///     Red,
///     Blue,
/// }
///
/// hb_reflect::impl_reflect_enum!(Team, "Game.Team", [Red, Blue]);
///
/// let TypeKind::Enum(info) = Team::type_info().kind() else { unreachable!() };
/// assert_eq!(info.variants(), ["Red", "Blue"]);
/// assert_eq!(info.variant_name(&Team::Blue), Some("Blue"));
/// ```
#[macro_export]
macro_rules! impl_reflect_enum {
    ($ty:ident, $path:expr, [$($variant:ident),+ $(,)?]) => {
        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                const VARIANTS: &[&str] = &[$(stringify!($variant)),+];

                fn name_of(value: &dyn $crate::Reflect) -> ::core::option::Option<&'static str> {
                    match value.downcast_ref::<$ty>()? {
                        $($ty::$variant => ::core::option::Option::Some(stringify!($variant)),)+
                    }
                }

                fn from_name(
                    name: &str,
                ) -> ::core::option::Option<$crate::__macro_exports::Box<dyn $crate::Reflect>> {
                    let index = VARIANTS.iter().position(|v| *v == name)?;
                    let values = [$($ty::$variant),+];
                    values
                        .get(index)
                        .cloned()
                        .map(|v| $crate::__macro_exports::Box::new(v) as $crate::__macro_exports::Box<dyn $crate::Reflect>)
                }

                static CELL: $crate::impls::TypeInfoCell = $crate::impls::TypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::new::<Self>(
                        $path,
                        $crate::info::TypeKind::Enum($crate::info::EnumInfo::new(
                            VARIANTS, name_of, from_name,
                        )),
                    )
                })
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Tests
