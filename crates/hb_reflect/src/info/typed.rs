use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to the [`TypeInfo`] descriptor of a type.
///
/// Descriptors are built once and cached in a static cell. Non-generic types
/// use [`TypeInfoCell`], generic ones [`GenericTypeInfoCell`], which keeps one
/// descriptor per monomorphized type.
///
/// # Examples
///
/// ```
/// use hb_reflect::impls::TypeInfoCell;
/// use hb_reflect::info::{MemberInfo, TypeInfo, Typed};
///
/// #[derive(Clone, Default)]
/// struct Spawn {
///     count: i32,
///     delay: f32,
/// }
///
/// impl Typed for Spawn {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| {
///             TypeInfo::composite::<Self>("Game.Spawn")
///                 .with_default::<Self>()
///                 .with_field(MemberInfo::field::<Self, i32>("count", |s| &s.count, |s| &mut s.count))
///                 .with_field(MemberInfo::field::<Self, f32>("delay", |s| &s.delay, |s| &mut s.delay))
///         })
///     }
/// }
///
/// let info = Spawn::type_info();
/// assert_eq!(info.type_name(), "Spawn");
/// assert!(info.field("delay").is_some());
/// ```
///
/// [`TypeInfoCell`]: crate::impls::TypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: 'static {
    fn type_info() -> &'static TypeInfo;
}
