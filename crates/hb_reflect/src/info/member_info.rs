use alloc::boxed::Box;
use core::fmt;

use bitflags::bitflags;

use crate::info::{TypeInfo, Typed};
use crate::reflection::Reflect;

// -----------------------------------------------------------------------------
// MemberFlags

bitflags! {
    /// Host annotations consulted by the default member policy.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberFlags: u8 {
        /// The member is deprecated and skipped by default.
        const OBSOLETE = 1 << 0;
        /// The member is explicitly excluded from serialization.
        const NON_SERIALIZED = 1 << 1;
    }
}

// -----------------------------------------------------------------------------
// MemberKind

/// The two member namespaces of a serialized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

impl MemberKind {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Property => "property",
        }
    }
}

impl fmt::Display for MemberKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// MemberInfo

/// Failure of [`MemberInfo::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMemberError {
    /// The member has no setter.
    NotWritable,
    /// The owner is not of the declaring type.
    OwnerMismatch,
    /// The value is not of the member type.
    ValueMismatch { found: &'static str },
}

type Getter = Box<dyn Fn(&dyn Reflect) -> Option<Box<dyn Reflect>> + Send + Sync>;
type Setter = Box<dyn Fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), SetMemberError> + Send + Sync>;

/// Name, type and accessors of a single field or property.
///
/// Getters return owned clones. Properties may omit the setter, in which case
/// the populator reports them as not writable.
pub struct MemberInfo {
    name: &'static str,
    kind: MemberKind,
    type_info: fn() -> &'static TypeInfo,
    flags: MemberFlags,
    getter: Getter,
    setter: Option<Setter>,
}

fn set_boxed<O: Reflect, T: Reflect>(
    owner: &mut dyn Reflect,
    value: Box<dyn Reflect>,
    set: impl FnOnce(&mut O, T),
) -> Result<(), SetMemberError> {
    let Some(owner) = owner.downcast_mut::<O>() else {
        return Err(SetMemberError::OwnerMismatch);
    };
    let found = value.type_path();
    match value.take::<T>() {
        Some(value) => {
            set(owner, value);
            Ok(())
        }
        None => Err(SetMemberError::ValueMismatch { found }),
    }
}

impl MemberInfo {
    /// A stored field of `O`, readable and writable.
    pub fn field<O: Reflect, T: Reflect + Typed>(
        name: &'static str,
        get: fn(&O) -> &T,
        get_mut: fn(&mut O) -> &mut T,
    ) -> Self {
        Self {
            name,
            kind: MemberKind::Field,
            type_info: T::type_info,
            flags: MemberFlags::empty(),
            getter: Box::new(move |owner: &dyn Reflect| {
                owner
                    .downcast_ref::<O>()
                    .map(|o| get(o).reflect_clone())
            }),
            setter: Some(Box::new(move |owner: &mut dyn Reflect, value| {
                set_boxed::<O, T>(owner, value, |o, v| *get_mut(o) = v)
            })),
        }
    }

    /// A computed property of `O`, read-only until [`with_setter`](Self::with_setter).
    pub fn property<O: Reflect, T: Reflect + Typed>(
        name: &'static str,
        get: impl Fn(&O) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            kind: MemberKind::Property,
            type_info: T::type_info,
            flags: MemberFlags::empty(),
            getter: Box::new(move |owner: &dyn Reflect| {
                owner
                    .downcast_ref::<O>()
                    .map(|o| Box::new(get(o)) as Box<dyn Reflect>)
            }),
            setter: None,
        }
    }

    /// One component of an aggregate, addressed by index.
    pub fn component<O: Reflect, T: Reflect + Typed>(
        name: &'static str,
        index: usize,
        get: fn(&O, usize) -> T,
        set: fn(&mut O, usize, T),
    ) -> Self {
        Self {
            name,
            kind: MemberKind::Field,
            type_info: T::type_info,
            flags: MemberFlags::empty(),
            getter: Box::new(move |owner: &dyn Reflect| {
                owner
                    .downcast_ref::<O>()
                    .map(|o| Box::new(get(o, index)) as Box<dyn Reflect>)
            }),
            setter: Some(Box::new(move |owner: &mut dyn Reflect, value| {
                set_boxed::<O, T>(owner, value, |o, v| set(o, index, v))
            })),
        }
    }

    /// Adds a setter, `O` and `T` must match the getter.
    pub fn with_setter<O: Reflect, T: Reflect>(
        mut self,
        set: impl Fn(&mut O, T) + Send + Sync + 'static,
    ) -> Self {
        self.setter = Some(Box::new(move |owner: &mut dyn Reflect, value| {
            set_boxed::<O, T>(owner, value, &set)
        }));
        self
    }

    #[inline]
    pub fn with_flags(mut self, flags: MemberFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Declared type of the member.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn flags(&self) -> MemberFlags {
        self.flags
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Clones the current value out of `owner`.
    #[inline]
    pub fn get(&self, owner: &dyn Reflect) -> Option<Box<dyn Reflect>> {
        (self.getter)(owner)
    }

    pub fn set(&self, owner: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), SetMemberError> {
        match &self.setter {
            Some(setter) => setter(owner, value),
            None => Err(SetMemberError::NotWritable),
        }
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("type", &self.type_info().type_path())
            .field("flags", &self.flags)
            .field("writable", &self.is_writable())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::{MemberFlags, MemberInfo, SetMemberError};
    use crate::Reflect;

    #[derive(Clone)]
    struct Stats {
        hp: i32,
    }

    #[test]
    fn field_get_and_set() {
        let member = MemberInfo::field::<Stats, i32>("hp", |s| &s.hp, |s| &mut s.hp);
        let mut stats = Stats { hp: 3 };

        let value = member.get(&stats as &dyn Reflect).unwrap();
        assert_eq!(value.take::<i32>(), Some(3));

        member.set(&mut stats, Box::new(10_i32)).unwrap();
        assert_eq!(stats.hp, 10);

        let err = member.set(&mut stats, Box::new(String::new())).unwrap_err();
        assert!(matches!(err, SetMemberError::ValueMismatch { .. }));
    }

    #[test]
    fn read_only_property() {
        let member = MemberInfo::property::<Stats, bool>("alive", |s| s.hp > 0)
            .with_flags(MemberFlags::NON_SERIALIZED);
        let mut stats = Stats { hp: 1 };

        assert!(!member.is_writable());
        assert!(member.flags().contains(MemberFlags::NON_SERIALIZED));
        assert_eq!(
            member.set(&mut stats, Box::new(false)),
            Err(SetMemberError::NotWritable)
        );
    }

    impl crate::info::Typed for Stats {
        fn type_info() -> &'static crate::info::TypeInfo {
            static CELL: crate::impls::TypeInfoCell = crate::impls::TypeInfoCell::new();
            CELL.get_or_init(|| crate::info::TypeInfo::composite::<Self>("Test.Stats"))
        }
    }
}
