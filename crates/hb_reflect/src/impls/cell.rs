//! Containers for static storage of type information.
//!
//! For non-generic types, [`TypeInfoCell`] wraps a [`OnceLock`].
//!
//! For generic types the `static CELL` inside the function is shared by every
//! instantiation, so [`GenericTypeInfoCell`] keeps a [`TypeIdMap`] behind a
//! [`RwLock`] and leaks one descriptor per type.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use hb_utils::TypeIdMap;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// TypeInfoCell

/// Lazily initialized [`TypeInfo`] of a non-generic type.
pub struct TypeInfoCell(OnceLock<TypeInfo>);

impl TypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeInfoCell

/// Lazily initialized [`TypeInfo`] of every instantiation of a generic type.
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        let cached = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        match cached {
            Some(info) => info,
            // `f` runs without the lock held: building a descriptor may
            // request the descriptor of another instantiation.
            None => {
                let info = f();
                *self
                    .0
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get_or_insert(type_id, || Box::leak(Box::new(info)))
            }
        }
    }
}
