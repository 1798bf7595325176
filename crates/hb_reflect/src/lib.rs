#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Compilation config

/// Keeps the wrapped tokens only when the `debug` feature is on in a debug build.
///
/// `cfg_debug! { if { .. } else { .. } }` picks one of the two branches.
#[cfg(all(debug_assertions, feature = "debug"))]
macro_rules! cfg_debug {
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($p)* };
    ($($p:tt)*) => { $($p)* };
}

#[cfg(not(all(debug_assertions, feature = "debug")))]
macro_rules! cfg_debug {
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($n)* };
    ($($p:tt)*) => {};
}

pub(crate) use cfg_debug;

// -----------------------------------------------------------------------------
// Extern Self

extern crate alloc;
extern crate self as hb_reflect;

// -----------------------------------------------------------------------------
// Modules

mod convert;
mod error;
mod logs;
mod node;
mod object;
mod options;
mod reflection;
mod reflector;
mod thread;

pub mod access;
pub mod impls;
pub mod info;
pub mod refs;
pub mod registry;
pub mod schema;
pub mod wire;

#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::boxed::Box;
}

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{ReflectError, ReflectErrorKind, WireError};
pub use logs::{LogEntry, LogLevel, LogSink, Logs};
pub use node::SerializedNode;
pub use object::{Instance, ObjRef, WeakInstance};
pub use options::{CodecOptions, NumberHandling};
pub use reflection::Reflect;
pub use reflector::{PopulateReport, Reflector};
pub use thread::MainThread;
