//! Host object references.
//!
//! Host objects are never serialized by value. A reference slot travels as
//! an [`ObjectRef`] descriptor and is re-attached on the receiving side by
//! the [`ReferenceResolver`], through the lookups the host lends in
//! [`HostHooks`]. Objects met during one call are remembered in a
//! [`DeserializationContext`], which is what makes forward and cyclic
//! references resolve.

// -----------------------------------------------------------------------------
// Modules

mod context;
mod descriptor;
mod hooks;
mod resolver;

// -----------------------------------------------------------------------------
// Exports

pub use context::DeserializationContext;
pub use descriptor::{ObjectRef, ReferenceKey};
pub use hooks::{HostHooks, NoHooks};
pub use resolver::ReferenceResolver;
