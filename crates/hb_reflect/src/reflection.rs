use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Reflect

/// Type-erased access to a value described by a [`TypeInfo`].
///
/// Implemented for every `Typed + Clone` type. Member getters hand out owned
/// clones, which is what lets the populator read a nested aggregate, patch
/// a few of its members and write it back without touching the rest.
///
/// Note that [`Any::type_id`] on a `Box<dyn Reflect>` returns the id of the
/// box. Use [`Reflect::ty_id`] to get the id of the inner value.
///
/// # Examples
///
/// ```
/// use hb_reflect::Reflect;
///
/// let value: Box<dyn Reflect> = Box::new(3.5_f32);
/// assert!(value.is::<f32>());
/// assert_eq!(value.reflect_type_info().type_name(), "f32");
/// assert_eq!(value.take::<f32>(), Some(3.5));
/// ```
pub trait Reflect: Any {
    /// Returns the [`TypeId`] of the underlying value.
    fn ty_id(&self) -> TypeId;

    /// Returns the descriptor of the concrete type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect>;

    /// Clones the value behind the trait object.
    fn reflect_clone(&self) -> Box<dyn Reflect>;

    /// Replaces `self` with `value`, handing it back on a type mismatch.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}

impl<T: Typed + Clone> Reflect for T {
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }

    #[inline]
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }

    #[inline]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect {
        self
    }

    #[inline]
    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect> {
        self
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        if !value.is::<T>() {
            return Err(value);
        }
        if let Some(value) = value.take::<T>() {
            *self = value;
        }
        Ok(())
    }
}

impl dyn Reflect {
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Moves the value out, or returns `None` on a type mismatch.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Option<T> {
        let any: Box<dyn Any> = self;
        any.downcast::<T>().ok().map(|v| *v)
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Reflect<{}>", self.type_path())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::Reflect;

    #[test]
    fn set_checks_type() {
        let mut value = 1_i32;
        let target: &mut dyn Reflect = &mut value;

        assert!(target.set(Box::new(7_i32)).is_ok());
        let rejected = target.set(Box::new(String::from("x"))).unwrap_err();

        assert_eq!(value, 7);
        assert!(rejected.is::<String>());
    }

    #[test]
    fn take_mismatch_is_none() {
        let value: Box<dyn Reflect> = Box::new(1_u8);
        assert_eq!(value.take::<i32>(), None);
    }
}
