use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::fmt;
use core::marker::PhantomData;

use serde_core::de::{DeserializeSeed, Error as DeError, MapAccess, Visitor};
use serde_core::ser::SerializeStruct;
use serde_core::{Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use super::number::{read_f32, read_integer, write_float};
use crate::error::WireError;
use crate::options::NumberHandling;
use crate::reflection::Reflect;

// -----------------------------------------------------------------------------
// Component

/// A single named slot of an [`Aggregate`].
pub trait Component: Copy + Default + PartialEq + fmt::Debug + 'static {
    fn write<S: Serializer>(&self, handling: NumberHandling, serializer: S)
    -> Result<S::Ok, S::Error>;

    fn read<'de, D: Deserializer<'de>>(
        handling: NumberHandling,
        deserializer: D,
    ) -> Result<Self, D::Error>;

    /// Schema of the component, with optional inclusive numeric bounds.
    fn schema(bounds: Option<(f64, f64)>) -> Value;

    /// First non-finite scalar, as its display form.
    #[inline]
    fn non_finite(&self) -> Option<String> {
        None
    }
}

fn number_schema(kind: &str, bounds: Option<(f64, f64)>) -> Value {
    match bounds {
        Some((min, max)) => json!({ "type": kind, "minimum": min, "maximum": max }),
        None => json!({ "type": kind }),
    }
}

impl Component for f32 {
    #[inline]
    fn write<S: Serializer>(
        &self,
        handling: NumberHandling,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        if self.is_finite() {
            serializer.serialize_f32(*self)
        } else {
            write_float(f64::from(*self), handling, serializer)
        }
    }

    #[inline]
    fn read<'de, D: Deserializer<'de>>(
        handling: NumberHandling,
        deserializer: D,
    ) -> Result<Self, D::Error> {
        read_f32(handling, deserializer)
    }

    fn schema(bounds: Option<(f64, f64)>) -> Value {
        number_schema("number", bounds)
    }

    fn non_finite(&self) -> Option<String> {
        (!self.is_finite()).then(|| format!("{self}"))
    }
}

macro_rules! impl_integer_component {
    ($($ty:ty),*) => {$(
        impl Component for $ty {
            #[inline]
            fn write<S: Serializer>(
                &self,
                _handling: NumberHandling,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                Serialize::serialize(self, serializer)
            }

            fn read<'de, D: Deserializer<'de>>(
                _handling: NumberHandling,
                deserializer: D,
            ) -> Result<Self, D::Error> {
                let v = read_integer(deserializer)?;
                <$ty>::try_from(v).map_err(|_| {
                    D::Error::custom(format!(
                        "`{v}` is out of range for {}",
                        stringify!($ty)
                    ))
                })
            }

            fn schema(bounds: Option<(f64, f64)>) -> Value {
                number_schema("integer", bounds)
            }
        }
    )*};
}

impl_integer_component!(i32, u8);

// -----------------------------------------------------------------------------
// Aggregate

/// A fixed-shape numeric aggregate with a hand-written wire form.
///
/// The wire form is a JSON object with exactly the names in
/// [`COMPONENTS`](Aggregate::COMPONENTS). Reading accepts the components in
/// any order, rejects unknown names and starts from [`Default`], so an
/// omitted component keeps its default. Writing emits every component in
/// canonical order.
pub trait Aggregate: Clone + Default + PartialEq + fmt::Debug + 'static {
    type Component: Component;

    /// Short name, also used as the `$defs` key of the schema.
    const TYPE_NAME: &'static str;
    const COMPONENTS: &'static [&'static str];
    /// Inclusive bounds advertised for every component.
    const BOUNDS: Option<(f64, f64)> = None;

    fn component(&self, index: usize) -> Self::Component;

    fn set_component(&mut self, index: usize, value: Self::Component);
}

// -----------------------------------------------------------------------------
// Writer

/// Serializes an [`Aggregate`] with the given number handling.
pub struct Wire<'a, A: Aggregate> {
    value: &'a A,
    handling: NumberHandling,
}

impl<'a, A: Aggregate> Wire<'a, A> {
    #[inline]
    pub const fn new(value: &'a A, handling: NumberHandling) -> Self {
        Self { value, handling }
    }
}

struct ComponentWire<C: Component>(C, NumberHandling);

impl<C: Component> Serialize for ComponentWire<C> {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.write(self.1, serializer)
    }
}

impl<A: Aggregate> Serialize for Wire<'_, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct(A::TYPE_NAME, A::COMPONENTS.len())?;
        for (index, name) in A::COMPONENTS.iter().enumerate() {
            let component = ComponentWire(self.value.component(index), self.handling);
            state.serialize_field(*name, &component)?;
        }
        state.end()
    }
}

// -----------------------------------------------------------------------------
// Reader

/// Deserializes an [`Aggregate`] with the given number handling.
pub struct WireSeed<A: Aggregate> {
    handling: NumberHandling,
    _marker: PhantomData<fn() -> A>,
}

impl<A: Aggregate> WireSeed<A> {
    #[inline]
    pub const fn new(handling: NumberHandling) -> Self {
        Self {
            handling,
            _marker: PhantomData,
        }
    }
}

impl<'de, A: Aggregate> DeserializeSeed<'de> for WireSeed<A> {
    type Value = A;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<A, D::Error> {
        deserializer.deserialize_struct(A::TYPE_NAME, A::COMPONENTS, AggregateVisitor(self))
    }
}

struct AggregateVisitor<A: Aggregate>(WireSeed<A>);

impl<'de, A: Aggregate> Visitor<'de> for AggregateVisitor<A> {
    type Value = A;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a {} object", A::TYPE_NAME)
    }

    fn visit_map<V: MapAccess<'de>>(self, mut map: V) -> Result<A, V::Error> {
        let mut value = A::default();
        while let Some(index) = map.next_key_seed(ComponentKey::<A>(PhantomData))? {
            let component = map.next_value_seed(ComponentSeed::<A::Component>(
                self.0.handling,
                PhantomData,
            ))?;
            value.set_component(index, component);
        }
        Ok(value)
    }
}

/// Maps a component name to its index.
struct ComponentKey<A>(PhantomData<fn() -> A>);

impl<'de, A: Aggregate> DeserializeSeed<'de> for ComponentKey<A> {
    type Value = usize;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<usize, D::Error> {
        deserializer.deserialize_identifier(self)
    }
}

impl<'de, A: Aggregate> Visitor<'de> for ComponentKey<A> {
    type Value = usize;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a component name of {}", A::TYPE_NAME)
    }

    fn visit_str<E: DeError>(self, v: &str) -> Result<usize, E> {
        A::COMPONENTS
            .iter()
            .position(|name| *name == v)
            .ok_or_else(|| E::unknown_field(v, A::COMPONENTS))
    }
}

struct ComponentSeed<C>(NumberHandling, PhantomData<fn() -> C>);

impl<'de, C: Component> DeserializeSeed<'de> for ComponentSeed<C> {
    type Value = C;

    #[inline]
    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<C, D::Error> {
        C::read(self.0, deserializer)
    }
}

// -----------------------------------------------------------------------------
// Entry points

fn check_finite<A: Aggregate>(value: &A, handling: NumberHandling) -> Result<(), WireError> {
    if handling.allows_named_literals() {
        return Ok(());
    }
    for (index, name) in A::COMPONENTS.iter().enumerate() {
        if let Some(v) = value.component(index).non_finite() {
            return Err(WireError::NonFinite {
                value: format!("{}.{name} = {v}", A::TYPE_NAME),
            });
        }
    }
    Ok(())
}

/// Encodes `value` as a JSON object.
pub fn encode_value<A: Aggregate>(value: &A, handling: NumberHandling) -> Result<Value, WireError> {
    check_finite(value, handling)?;
    serde_json::to_value(Wire::new(value, handling)).map_err(|e| WireError::Encode(e.to_string()))
}

/// Encodes `value` as JSON text.
pub fn encode_string<A: Aggregate>(value: &A, handling: NumberHandling) -> Result<String, WireError> {
    check_finite(value, handling)?;
    serde_json::to_string(&Wire::new(value, handling)).map_err(|e| WireError::Encode(e.to_string()))
}

/// Decodes a value from a JSON object.
pub fn decode_value<A: Aggregate>(value: &Value, handling: NumberHandling) -> Result<A, WireError> {
    WireSeed::<A>::new(handling)
        .deserialize(value)
        .map_err(WireError::from)
}

/// Decodes a value from JSON text, rejecting trailing input.
pub fn decode_str<A: Aggregate>(text: &str, handling: NumberHandling) -> Result<A, WireError> {
    let mut de = serde_json::Deserializer::from_str(text);
    let value = WireSeed::<A>::new(handling).deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// Schema of the wire object: every component required, nothing else allowed.
pub fn schema<A: Aggregate>() -> Value {
    let mut properties = Map::new();
    for name in A::COMPONENTS {
        properties.insert(String::from(*name), A::Component::schema(A::BOUNDS));
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": A::COMPONENTS,
        "additionalProperties": false,
    })
}

/// Reference to the schema registered under `$defs`.
pub fn schema_ref<A: Aggregate>() -> Value {
    json!({ "$ref": format!("#/$defs/{}", A::TYPE_NAME) })
}

// -----------------------------------------------------------------------------
// Reflection glue

pub(crate) fn encode_reflect<A: Aggregate>(
    value: &dyn Reflect,
    handling: NumberHandling,
) -> Result<Value, WireError> {
    match value.downcast_ref::<A>() {
        Some(value) => encode_value(value, handling),
        None => Err(WireError::Encode(format!(
            "expected {}, found {}",
            A::TYPE_NAME,
            value.type_path()
        ))),
    }
}

pub(crate) fn decode_reflect<A: Aggregate + Reflect>(
    value: &Value,
    handling: NumberHandling,
) -> Result<Box<dyn Reflect>, WireError> {
    decode_value::<A>(value, handling).map(|v| Box::new(v) as Box<dyn Reflect>)
}

/// A nested aggregate used as the component of another one.
macro_rules! impl_nested_component {
    ($($ty:ty),*) => {$(
        impl $crate::wire::Component for $ty {
            #[inline]
            fn write<S: ::serde_core::Serializer>(
                &self,
                handling: $crate::NumberHandling,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                ::serde_core::Serialize::serialize(
                    &$crate::wire::Wire::new(self, handling),
                    serializer,
                )
            }

            #[inline]
            fn read<'de, D: ::serde_core::Deserializer<'de>>(
                handling: $crate::NumberHandling,
                deserializer: D,
            ) -> Result<Self, D::Error> {
                ::serde_core::de::DeserializeSeed::deserialize(
                    $crate::wire::WireSeed::<$ty>::new(handling),
                    deserializer,
                )
            }

            #[inline]
            fn schema(_bounds: Option<(f64, f64)>) -> ::serde_json::Value {
                $crate::wire::schema::<$ty>()
            }

            fn non_finite(&self) -> Option<::alloc::string::String> {
                (0..<$ty as $crate::wire::Aggregate>::COMPONENTS.len()).find_map(|i| {
                    $crate::wire::Component::non_finite(
                        &<$ty as $crate::wire::Aggregate>::component(self, i),
                    )
                })
            }
        }
    )*};
}

pub(crate) use impl_nested_component;
