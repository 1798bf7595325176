//! Converter and type registries.
//!
//! - [`ConverterRegistry`]: picks the converter of a type by priority, and
//!   holds the type denylist.
//! - [`TypeRegistry`]: turns type names found in serialized trees back into
//!   descriptors.

// -----------------------------------------------------------------------------
// Modules

mod converter;
mod converter_registry;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use converter::{CATEGORY_PRIORITY, DERIVED_PRIORITY, EXACT_PRIORITY};
pub use converter::{Converter, ConverterKind, ConverterTarget, DEFAULT_IGNORED_OBJECT_MEMBERS};
pub use converter_registry::ConverterRegistry;
pub use type_registry::{RegistryError, TypeRegistry};
