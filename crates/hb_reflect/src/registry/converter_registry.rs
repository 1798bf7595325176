use alloc::string::String;
use alloc::vec::Vec;

use hb_utils::hash::HashSet;

use crate::info::{TypeCategory, TypeInfo, TypeKind, Typed};
use crate::registry::{Converter, ConverterKind, ConverterTarget, DEFAULT_IGNORED_OBJECT_MEMBERS};

// -----------------------------------------------------------------------------
// ConverterRegistry

/// An ordered set of converters and a type denylist.
///
/// [`resolve`](Self::resolve) picks the applicable converter with the highest
/// priority. Among equal priorities the one registered last wins, so a
/// caller can override a default by registering a converter with the same
/// target.
///
/// The registry is a plain value: build it once, then share it read-only
/// between calls.
///
/// # Examples
///
/// ```
/// use hb_reflect::info::Typed;
/// use hb_reflect::registry::{Converter, ConverterKind, ConverterRegistry};
///
/// let mut registry = ConverterRegistry::new();
/// assert_eq!(registry.resolve(f32::type_info()).unwrap().name(), "Primitive");
///
/// registry.register(Converter::exact("Float", f32::type_info(), ConverterKind::Primitive));
/// assert_eq!(registry.resolve(f32::type_info()).unwrap().name(), "Float");
/// assert_eq!(registry.resolve(i32::type_info()).unwrap().name(), "Primitive");
/// ```
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    converters: Vec<Converter>,
    denylist: HashSet<String>,
}

impl Default for ConverterRegistry {
    /// See [`ConverterRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterRegistry {
    /// Creates a registry with no converters.
    #[inline]
    pub fn empty() -> Self {
        Self {
            converters: Vec::new(),
            denylist: HashSet::default(),
        }
    }

    /// Creates a registry with one converter per [`TypeCategory`].
    ///
    /// - `Primitive`, `Enum`, `StructuredValue`, `Collection`, `Composite`
    /// - `Object`: ignores [`DEFAULT_IGNORED_OBJECT_MEMBERS`]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Converter::category(
                "Primitive",
                TypeCategory::Primitive,
                ConverterKind::Primitive,
            ))
            .register(Converter::category(
                "Enum",
                TypeCategory::Enum,
                ConverterKind::Enumeration,
            ))
            .register(Converter::category(
                "StructuredValue",
                TypeCategory::StructuredValue,
                ConverterKind::Structured,
            ))
            .register(Converter::category(
                "Collection",
                TypeCategory::Collection,
                ConverterKind::Collection,
            ))
            .register(Converter::category(
                "Object",
                TypeCategory::ObjectReference,
                ConverterKind::Object {
                    ignored: DEFAULT_IGNORED_OBJECT_MEMBERS.to_vec(),
                },
            ))
            .register(Converter::category(
                "Composite",
                TypeCategory::Composite,
                ConverterKind::Composite {
                    ignored: Vec::new(),
                },
            ));
        registry
    }

    /// Appends a converter.
    pub fn register(&mut self, converter: Converter) -> &mut Self {
        self.converters.push(converter);
        self
    }

    /// Removes every converter declared for `target`, returning how many.
    pub fn remove(&mut self, target: &ConverterTarget) -> usize {
        let before = self.converters.len();
        self.converters.retain(|c| c.target() != target);
        before - self.converters.len()
    }

    /// Removes the converters declared for exactly `T`.
    #[inline]
    pub fn remove_type<T: Typed>(&mut self) -> usize {
        self.remove(&ConverterTarget::Exact(T::type_info()))
    }

    /// The converter for `ty`.
    ///
    /// Reference slots resolve through the type they point at. Returns
    /// `None` when nothing applies, which is not an error by itself.
    pub fn resolve(&self, ty: &'static TypeInfo) -> Option<&Converter> {
        let effective = ty.effective();
        let mut best: Option<(u32, &Converter)> = None;
        for converter in &self.converters {
            let Some(priority) = converter.priority(effective) else {
                continue;
            };
            if best.is_none_or(|(p, _)| priority >= p) {
                best = Some((priority, converter));
            }
        }
        match best {
            Some((priority, converter)) => {
                log::trace!(
                    "converter `{}` ({priority}) resolved for `{}`",
                    converter.name(),
                    ty.type_path()
                );
                Some(converter)
            }
            None => {
                log::trace!("no converter for `{}`", ty.type_path());
                None
            }
        }
    }

    #[inline]
    pub fn converters(&self) -> &[Converter] {
        &self.converters
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    // -------------------------------------------------------------------------
    // Denylist

    /// Excludes `T` and everything derived from it from serialization.
    #[inline]
    pub fn denylist_type<T: Typed>(&mut self) -> &mut Self {
        self.denylist_type_name(T::type_info().type_path())
    }

    /// Excludes a type by path. The type does not have to be known yet.
    pub fn denylist_type_name(&mut self, type_path: impl Into<String>) -> &mut Self {
        self.denylist.insert(type_path.into());
        self
    }

    /// Returns `true` if the path was denylisted.
    pub fn remove_denylisted_type(&mut self, type_path: &str) -> bool {
        self.denylist.remove(type_path)
    }

    /// Whether `ty` is excluded.
    ///
    /// Checks the type and its base chain, the target of a reference slot
    /// and the item type of a collection.
    pub fn is_denylisted(&self, ty: &TypeInfo) -> bool {
        if self.denylist.is_empty() {
            return false;
        }
        let mut current = Some(ty);
        while let Some(info) = current {
            if self.denylist.contains(info.type_path()) {
                return true;
            }
            current = info.base();
        }
        match ty.kind() {
            TypeKind::ObjectRef(info) => self.is_denylisted(info.target()),
            TypeKind::List(info) => self.is_denylisted(info.item()),
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
