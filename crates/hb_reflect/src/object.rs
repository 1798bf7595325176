use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use core::fmt;
use core::marker::PhantomData;

use crate::impls::GenericTypeInfoCell;
use crate::info::{ObjectRefInfo, RefTarget, TypeInfo, TypeKind, Typed};
use crate::reflection::Reflect;

// -----------------------------------------------------------------------------
// Instance

/// A live, host-managed object.
///
/// The host owns its objects and hands out strong [`Instance`] handles while
/// a call runs. Reference slots only keep a [`WeakInstance`], so an object
/// the host destroyed shows up as a dead reference rather than being kept
/// alive by the data that points at it.
#[derive(Clone)]
pub struct Instance {
    id: i64,
    info: &'static TypeInfo,
    cell: Rc<RefCell<Box<dyn Reflect>>>,
}

impl Instance {
    /// Wraps `value` as the live object with host handle `id`.
    #[inline]
    pub fn new<T: Reflect>(id: i64, value: T) -> Self {
        Self::from_boxed(id, Box::new(value))
    }

    /// Wraps a boxed value, e.g. one built from a [`TypeInfo`] default.
    pub fn from_boxed(id: i64, value: Box<dyn Reflect>) -> Self {
        Self {
            id,
            info: value.reflect_type_info(),
            cell: Rc::new(RefCell::new(value)),
        }
    }

    /// Host handle of the object. Never `0` for a live object.
    #[inline]
    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline]
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        self.info.is_assignable_to(target)
    }

    #[inline]
    pub fn try_borrow(&self) -> Result<Ref<'_, dyn Reflect>, BorrowError> {
        self.cell.try_borrow().map(|r| Ref::map(r, |b| &**b))
    }

    #[inline]
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, dyn Reflect>, BorrowMutError> {
        self.cell
            .try_borrow_mut()
            .map(|r| RefMut::map(r, |b| &mut **b))
    }

    /// Runs `f` on the object if it is a `T` and not mutably borrowed.
    pub fn with<T: Reflect, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let value = self.try_borrow().ok()?;
        value.downcast_ref::<T>().map(f)
    }

    /// Runs `f` on the object if it is a `T` and not borrowed.
    pub fn with_mut<T: Reflect, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut value = self.try_borrow_mut().ok()?;
        value.downcast_mut::<T>().map(f)
    }

    #[inline]
    pub fn downgrade(&self) -> WeakInstance {
        WeakInstance {
            id: self.id,
            info: self.info,
            cell: Rc::downgrade(&self.cell),
        }
    }

    /// Whether both handles point at the same object.
    #[inline]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("type", &self.info.type_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// WeakInstance

/// Non-owning handle to a host object.
#[derive(Clone)]
pub struct WeakInstance {
    id: i64,
    info: &'static TypeInfo,
    cell: Weak<RefCell<Box<dyn Reflect>>>,
}

impl WeakInstance {
    #[inline]
    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// Returns the object, or `None` if the host destroyed it.
    pub fn upgrade(&self) -> Option<Instance> {
        self.cell.upgrade().map(|cell| Instance {
            id: self.id,
            info: self.info,
            cell,
        })
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.cell.strong_count() > 0
    }
}

impl fmt::Debug for WeakInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakInstance")
            .field("id", &self.id)
            .field("type", &self.info.type_path())
            .field("alive", &self.is_alive())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ObjRef

/// A member slot referencing a host object of type `T` (or a type derived
/// from it).
///
/// Serializes as a reference descriptor, never as the object's value. The
/// slot can be null, and it turns dead when the host destroys the object.
///
/// # Examples
///
/// ```
/// use hb_reflect::{Instance, ObjRef};
/// use hb_reflect::wire::Vector3;
///
/// let object = Instance::new(12, Vector3::new(1.0, 2.0, 3.0));
/// let slot = ObjRef::<Vector3>::new(&object);
/// assert_eq!(slot.id(), 12);
///
/// drop(object);
/// assert!(slot.is_destroyed());
/// ```
pub struct ObjRef<T: Typed> {
    target: Option<WeakInstance>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Typed> ObjRef<T> {
    #[inline]
    pub const fn null() -> Self {
        Self {
            target: None,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn new(instance: &Instance) -> Self {
        Self {
            target: Some(instance.downgrade()),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.target.is_none()
    }

    /// The slot pointed at an object that no longer exists.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.target.as_ref().is_some_and(|t| !t.is_alive())
    }

    /// Host handle of the referenced object, `0` when null.
    #[inline]
    pub fn id(&self) -> i64 {
        self.target.as_ref().map_or(0, WeakInstance::id)
    }

    /// The live object, if any.
    #[inline]
    pub fn get(&self) -> Option<Instance> {
        self.target.as_ref().and_then(WeakInstance::upgrade)
    }

    pub fn target(&self) -> RefTarget {
        match &self.target {
            None => RefTarget::Null,
            Some(weak) => match weak.upgrade() {
                Some(instance) => RefTarget::Alive(instance),
                None => RefTarget::Destroyed { id: weak.id() },
            },
        }
    }
}

impl<T: Typed> Default for ObjRef<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T: Typed> Clone for ObjRef<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Typed> fmt::Debug for ObjRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            None => f.write_str("ObjRef(null)"),
            Some(weak) => f.debug_tuple("ObjRef").field(weak).finish(),
        }
    }
}

fn ref_target_of<T: Typed>(slot: &dyn Reflect) -> RefTarget {
    slot.downcast_ref::<ObjRef<T>>()
        .map_or(RefTarget::Null, ObjRef::target)
}

fn make_ref<T: Typed>(instance: Option<&Instance>) -> Box<dyn Reflect> {
    Box::new(instance.map_or_else(ObjRef::<T>::null, ObjRef::<T>::new))
}

impl<T: Typed> Typed for ObjRef<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let target = T::type_info();
            let path: &'static str =
                Box::leak(alloc::format!("hb_reflect::ObjRef<{}>", target.type_path()).into_boxed_str());
            TypeInfo::new::<Self>(
                path,
                TypeKind::ObjectRef(ObjectRefInfo::new(
                    T::type_info,
                    ref_target_of::<T>,
                    make_ref::<T>,
                )),
            )
            .with_default::<Self>()
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Instance, ObjRef};
    use crate::info::{RefTarget, Typed};
    use crate::wire::Vector2;

    #[test]
    fn dead_reference_after_drop() {
        let object = Instance::new(5, Vector2::new(1.0, 2.0));
        let slot = ObjRef::<Vector2>::new(&object);
        assert!(matches!(slot.target(), RefTarget::Alive(i) if i.id() == 5));

        drop(object);
        assert!(matches!(slot.target(), RefTarget::Destroyed { id: 5 }));
        assert!(ObjRef::<Vector2>::null().is_null());
    }

    #[test]
    fn boxed_instance_keeps_inner_type() {
        let boxed = Vector2::type_info().default_value().unwrap();
        let object = Instance::from_boxed(9, boxed);

        assert!(object.type_info().is::<Vector2>());
        assert_eq!(object.with(|v: &Vector2| v.x), Some(0.0));
        object.with_mut(|v: &mut Vector2| v.y = 4.0);
        assert_eq!(object.with(|v: &Vector2| v.y), Some(4.0));
    }

    #[test]
    fn ref_type_path_names_target() {
        assert_eq!(
            ObjRef::<Vector2>::type_info().type_name(),
            "ObjRef<hb_reflect::wire::Vector2>"
        );
    }
}
