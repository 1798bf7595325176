//! Explicit type descriptors.
//!
//! Every reflected type carries a [`TypeInfo`] listing its structural kind
//! and its members, each with a getter and an optional setter. No runtime
//! reflection is involved: descriptors are written by hand, or by the
//! registration macros in [`impls`](crate::impls).

// -----------------------------------------------------------------------------
// Modules

mod category;
mod member_info;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use category::TypeCategory;
pub use member_info::{MemberFlags, MemberInfo, MemberKind, SetMemberError};
pub use type_info::{CodecInfo, EnumInfo, ListInfo, ObjectRefInfo, RefTarget};
pub use type_info::{TypeInfo, TypeKind, short_type_name};
pub use typed::Typed;
