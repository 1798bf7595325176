//! The two walks of the codec.
//!
//! [`Serializer`] turns a live value into a [`SerializedNode`] tree and
//! [`Populator`] applies such a tree back onto a live value. Both share an
//! [`Env`]: the registries, the host hooks and the options of one call.
//!
//! [`SerializedNode`]: crate::SerializedNode

// -----------------------------------------------------------------------------
// Modules

mod populate;
mod recorder;
mod serialize;
mod stack;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use populate::Populator;
pub(crate) use serialize::Serializer;

use recorder::Recorder;

// -----------------------------------------------------------------------------
// Env

use crate::options::CodecOptions;
use crate::refs::HostHooks;
use crate::registry::{ConverterRegistry, TypeRegistry};

/// Read-only state shared by every step of a walk.
#[derive(Clone, Copy)]
pub(crate) struct Env<'a> {
    pub converters: &'a ConverterRegistry,
    pub types: &'a TypeRegistry,
    pub hooks: &'a dyn HostHooks,
    pub options: CodecOptions,
}
