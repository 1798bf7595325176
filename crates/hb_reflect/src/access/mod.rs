//! Addressing slots below a root value.
//!
//! A [`MemberPath`] records how the walk reached a member, e.g.
//! `items[2].target`. The populator keeps one per pending reference so the
//! slot can be written once the referenced object is known.

// -----------------------------------------------------------------------------
// Modules

mod path;

// -----------------------------------------------------------------------------
// Exports

pub use path::{MemberPath, PathError, PathSegment};
