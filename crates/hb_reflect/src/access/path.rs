use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Reflect;
use crate::info::{MemberKind, SetMemberError, TypeKind};

// -----------------------------------------------------------------------------
// Error

/// An error returned from a failed [`MemberPath`] write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// No member or element at the given segment.
    NotFound { segment: PathSegment },
    /// The member at the given segment has no setter.
    NotWritable { segment: PathSegment },
    /// The value does not fit the slot at the end of the path.
    Mismatch { found: &'static str },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { segment } => write!(f, "nothing at `{segment}`"),
            Self::NotWritable { segment } => write!(f, "`{segment}` is not writable"),
            Self::Mismatch { found } => write!(f, "a `{found}` does not fit the slot"),
        }
    }
}

impl core::error::Error for PathError {}

// -----------------------------------------------------------------------------
// PathSegment

/// One step of a [`MemberPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Property(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) | Self::Property(name) => f.write_str(name),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

// -----------------------------------------------------------------------------
// MemberPath

/// Location of a slot below a root value.
///
/// Members are reached through owned clones, so writing at a path reads
/// each intermediate value, writes into it, and stores it back.
///
/// # Examples
///
/// ```
/// use hb_reflect::access::MemberPath;
/// use hb_reflect::wire::{Bounds, Vector3};
///
/// let mut bounds = Bounds::default();
/// let path = MemberPath::new().field("size").field("y");
/// assert_eq!(path.to_string(), "size.y");
///
/// path.set_at(&mut bounds, Box::new(2.5_f32)).unwrap();
/// assert_eq!(bounds.size, Vector3::new(0.0, 2.5, 0.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPath {
    segments: Vec<PathSegment>,
}

impl MemberPath {
    /// The empty path, designating the root itself.
    #[inline]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn with(mut self, segment: PathSegment) -> Self {
        self.segments.push(segment);
        self
    }

    #[inline]
    pub fn field(self, name: impl Into<String>) -> Self {
        self.with(PathSegment::Field(name.into()))
    }

    #[inline]
    pub fn property(self, name: impl Into<String>) -> Self {
        self.with(PathSegment::Property(name.into()))
    }

    #[inline]
    pub fn index(self, index: usize) -> Self {
        self.with(PathSegment::Index(index))
    }

    /// The path of a member of the value at `self`.
    pub fn member(&self, kind: MemberKind, name: &str) -> Self {
        let segment = match kind {
            MemberKind::Field => PathSegment::Field(name.into()),
            MemberKind::Property => PathSegment::Property(name.into()),
        };
        self.clone().with(segment)
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Clones the value at this path.
    pub fn get_at(&self, root: &dyn Reflect) -> Option<Box<dyn Reflect>> {
        let mut current = root.reflect_clone();
        for segment in &self.segments {
            current = get_child(&*current, segment)?;
        }
        Some(current)
    }

    /// Replaces the value at this path.
    pub fn set_at(&self, root: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), PathError> {
        set_in(root, &self.segments, value)
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Index(_) => write!(f, "{segment}")?,
                _ if i == 0 => write!(f, "{segment}")?,
                _ => write!(f, ".{segment}")?,
            }
        }
        Ok(())
    }
}

fn get_child(owner: &dyn Reflect, segment: &PathSegment) -> Option<Box<dyn Reflect>> {
    let info = owner.reflect_type_info();
    match segment {
        PathSegment::Field(name) => info.field(name)?.get(owner),
        PathSegment::Property(name) => info.property(name)?.get(owner),
        PathSegment::Index(index) => match info.kind() {
            TypeKind::List(list) => list.get(owner, *index),
            _ => None,
        },
    }
}

fn set_child(
    owner: &mut dyn Reflect,
    segment: &PathSegment,
    value: Box<dyn Reflect>,
) -> Result<(), PathError> {
    let info = owner.reflect_type_info();
    let not_found = || PathError::NotFound {
        segment: segment.clone(),
    };
    let member = match segment {
        PathSegment::Field(name) => info.field(name),
        PathSegment::Property(name) => info.property(name),
        PathSegment::Index(index) => {
            let TypeKind::List(list) = info.kind() else {
                return Err(not_found());
            };
            if *index >= list.len(owner) {
                return Err(not_found());
            }
            return list
                .set(owner, *index, value)
                .map_err(|v| PathError::Mismatch { found: v.type_path() });
        }
    };
    match member.ok_or_else(not_found)?.set(owner, value) {
        Ok(()) => Ok(()),
        Err(SetMemberError::NotWritable) => Err(PathError::NotWritable {
            segment: segment.clone(),
        }),
        Err(SetMemberError::OwnerMismatch) => Err(not_found()),
        Err(SetMemberError::ValueMismatch { found }) => Err(PathError::Mismatch { found }),
    }
}

fn set_in(
    owner: &mut dyn Reflect,
    segments: &[PathSegment],
    value: Box<dyn Reflect>,
) -> Result<(), PathError> {
    match segments {
        [] => owner
            .set(value)
            .map_err(|v| PathError::Mismatch { found: v.type_path() }),
        [last] => set_child(owner, last, value),
        [first, rest @ ..] => {
            let mut child = get_child(owner, first).ok_or_else(|| PathError::NotFound {
                segment: first.clone(),
            })?;
            set_in(&mut *child, rest, value)?;
            set_child(owner, first, child)
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{MemberPath, PathError, PathSegment};
    use crate::wire::{Vector2, Vector3};

    #[test]
    fn display() {
        let path = MemberPath::new().field("items").index(2).property("name");
        assert_eq!(path.to_string(), "items[2].name");
        assert_eq!(MemberPath::new().to_string(), "");
    }

    #[test]
    fn write_into_list_element() {
        let mut list: Vec<Vector2> = vec![Vector2::default(); 2];
        MemberPath::new()
            .index(1)
            .field("x")
            .set_at(&mut list, Box::new(3.0_f32))
            .unwrap();
        assert_eq!(list[1], Vector2::new(3.0, 0.0));

        let read = MemberPath::new().index(1).field("x").get_at(&list).unwrap();
        assert_eq!(read.take::<f32>(), Some(3.0));
    }

    #[test]
    fn write_errors() {
        let mut v = Vector3::default();
        assert_eq!(
            MemberPath::new().field("w").set_at(&mut v, Box::new(1.0_f32)),
            Err(PathError::NotFound {
                segment: PathSegment::Field("w".into())
            })
        );
        assert!(matches!(
            MemberPath::new().field("x").set_at(&mut v, Box::new(1_i32)),
            Err(PathError::Mismatch { found: "i32" })
        ));

        let mut list: Vec<i32> = Vec::new();
        assert!(MemberPath::new().index(0).set_at(&mut list, Box::new(1_i32)).is_err());
    }
}
