use alloc::format;
use core::fmt;

use serde_core::de::{Error as DeError, Visitor};
use serde_core::ser::Error as SerError;
use serde_core::{Deserializer, Serializer};
use serde_json::{Number, Value};

use crate::error::WireError;
use crate::options::NumberHandling;

// -----------------------------------------------------------------------------
// Named literals

pub const NAN_LITERAL: &str = "NaN";
pub const INFINITY_LITERAL: &str = "Infinity";
pub const NEG_INFINITY_LITERAL: &str = "-Infinity";

/// Returns the string token of a non-finite value.
pub fn named_literal(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some(NAN_LITERAL)
    } else if value == f64::INFINITY {
        Some(INFINITY_LITERAL)
    } else if value == f64::NEG_INFINITY {
        Some(NEG_INFINITY_LITERAL)
    } else {
        None
    }
}

/// Parses one of the three string tokens. Matching is case-sensitive.
pub fn parse_named_literal(token: &str) -> Option<f64> {
    match token {
        NAN_LITERAL => Some(f64::NAN),
        INFINITY_LITERAL => Some(f64::INFINITY),
        NEG_INFINITY_LITERAL => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Serde routines

pub(crate) fn write_float<S: Serializer>(
    value: f64,
    handling: NumberHandling,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match named_literal(value) {
        None => serializer.serialize_f64(value),
        Some(token) if handling.allows_named_literals() => serializer.serialize_str(token),
        Some(token) => Err(S::Error::custom(format!(
            "non-finite value `{token}` cannot be written without named float literals"
        ))),
    }
}

pub(crate) fn read_float<'de, D: Deserializer<'de>>(
    handling: NumberHandling,
    deserializer: D,
) -> Result<f64, D::Error> {
    deserializer.deserialize_any(FloatVisitor(handling))
}

/// Reads a float and narrows it to `f32`.
///
/// A finite number outside the `f32` range is an error, never an infinity.
pub(crate) fn read_f32<'de, D: Deserializer<'de>>(
    handling: NumberHandling,
    deserializer: D,
) -> Result<f32, D::Error> {
    let wide = read_float(handling, deserializer)?;
    let narrow = wide as f32;
    if wide.is_finite() && !narrow.is_finite() {
        return Err(D::Error::custom(format!("`{wide}` is out of range for f32")));
    }
    Ok(narrow)
}

struct FloatVisitor(NumberHandling);

impl<'de> Visitor<'de> for FloatVisitor {
    type Value = f64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        if self.0.allows_named_literals() {
            formatter.write_str("a number, \"NaN\", \"Infinity\" or \"-Infinity\"")
        } else {
            formatter.write_str("a number")
        }
    }

    #[inline]
    fn visit_f64<E: DeError>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    #[inline]
    fn visit_i64<E: DeError>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    #[inline]
    fn visit_u64<E: DeError>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: DeError>(self, v: &str) -> Result<f64, E> {
        if !self.0.allows_named_literals() {
            return Err(E::custom(format!(
                "string token `{v}` where a number is expected, named float literals are disabled"
            )));
        }
        parse_named_literal(v).ok_or_else(|| {
            E::custom(format!(
                "unrecognized floating-point literal `{v}`, expected \"NaN\", \"Infinity\" or \"-Infinity\""
            ))
        })
    }
}

/// Reads an integer, also accepting floats without a fractional part.
pub(crate) fn read_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(IntegerVisitor)
}

struct IntegerVisitor;

impl<'de> Visitor<'de> for IntegerVisitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer")
    }

    #[inline]
    fn visit_i64<E: DeError>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: DeError>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::custom(format!("integer `{v}` is out of range")))
    }

    fn visit_f64<E: DeError>(self, v: f64) -> Result<i64, E> {
        if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
            Ok(v as i64)
        } else {
            Err(E::custom(format!("`{v}` is not an integer")))
        }
    }
}

// -----------------------------------------------------------------------------
// Value routines

/// Encodes a float as a JSON value.
pub fn float_to_value(value: f64, handling: NumberHandling) -> Result<Value, WireError> {
    if let Some(number) = Number::from_f64(value) {
        return Ok(Value::Number(number));
    }
    match named_literal(value) {
        Some(token) if handling.allows_named_literals() => Ok(Value::from(token)),
        _ => Err(WireError::NonFinite {
            value: format!("{value}"),
        }),
    }
}

/// Decodes a float from a JSON value.
pub fn float_from_value(value: &Value, handling: NumberHandling) -> Result<f64, WireError> {
    read_float(handling, value).map_err(WireError::from)
}

// -----------------------------------------------------------------------------
// Tests
