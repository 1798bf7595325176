//! Descriptors of built-in types, and the helpers used to write new ones.
//!
//! - [`TypeInfoCell`]: Used to implement [`Typed`] for non-generic types.
//! - [`GenericTypeInfoCell`]: Used to implement [`Typed`] for generic types.
//! - [`impl_reflect_enum!`]: Implements [`Typed`] for a fieldless enum.
//!
//! ## Implemented Menu
//!
//! - primitives: `bool`, `i32`, `i64`, `u8`, `u32`, `u64`, `f32`, `f64`, `String`
//! - collections: `Vec<T>`
//! - references: [`ObjRef<T>`](crate::ObjRef)
//! - structured values: everything in [`wire`](crate::wire)
//!
//! [`Typed`]: crate::info::Typed
//! [`impl_reflect_enum!`]: crate::impl_reflect_enum

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod enums;
mod list;
mod primitives;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, TypeInfoCell};
