//! Hand-written wire codec of structured value types.
//!
//! Vectors, colors, rects, bounds and matrices travel as flat JSON objects
//! of named components, e.g. `{"x":1,"y":"Infinity","z":"NaN"}` for a
//! [`Vector3`]. They never go through the generic member walk: the reader and
//! writer are fixed per type so that NaN and the infinities round-trip.
//!
//! ```
//! use hb_reflect::NumberHandling;
//! use hb_reflect::wire::{self, Vector3};
//!
//! let v = Vector3::new(1.0, f32::INFINITY, f32::NAN);
//! let json = wire::encode_string(&v, NumberHandling::AllowNamedFloatLiterals).unwrap();
//! assert_eq!(json, r#"{"x":1.0,"y":"Infinity","z":"NaN"}"#);
//!
//! let back: Vector3 = wire::decode_str(&json, NumberHandling::AllowNamedFloatLiterals).unwrap();
//! assert_eq!(back.y, f32::INFINITY);
//! assert!(back.z.is_nan());
//!
//! assert!(wire::decode_str::<Vector3>(&json, NumberHandling::Strict).is_err());
//! ```

// -----------------------------------------------------------------------------
// Modules

mod aggregate;
mod number;
mod types;

// -----------------------------------------------------------------------------
// Exports

pub use aggregate::{Aggregate, Component, Wire, WireSeed};
pub use aggregate::{decode_str, decode_value, encode_string, encode_value, schema, schema_ref};
pub use number::{INFINITY_LITERAL, NAN_LITERAL, NEG_INFINITY_LITERAL};
pub use number::{float_from_value, float_to_value, named_literal, parse_named_literal};
pub use types::{Bounds, BoundsInt, Color, Color32, Matrix4x4, Quaternion};
pub use types::{Rect, RectInt, Vector2, Vector2Int, Vector3, Vector3Int, Vector4};
pub use types::aggregate_type_info;

pub(crate) use number::{read_f32, read_float, read_integer};

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::NumberHandling::{AllowNamedFloatLiterals as Named, Strict};
    use crate::WireError;

    #[test]
    fn vector3_named_literals() {
        let v = Vector3::new(1.0, f32::INFINITY, f32::NAN);
        let encoded = encode_value(&v, Named).unwrap();

        assert_eq!(encoded["x"].as_f64(), Some(1.0));
        assert_eq!(encoded["y"], json!("Infinity"));
        assert_eq!(encoded["z"], json!("NaN"));

        let back: Vector3 = decode_value(&encoded, Named).unwrap();
        assert_eq!(back.x, 1.0);
        assert_eq!(back.y, f32::INFINITY);
        assert!(back.z.is_nan());
    }

    #[test]
    fn strict_mode_rejects_non_finite() {
        let v = Vector2::new(f32::NEG_INFINITY, 0.0);
        assert!(matches!(
            encode_value(&v, Strict),
            Err(WireError::NonFinite { .. })
        ));
        assert!(decode_value::<Vector2>(&json!({"x": "-Infinity", "y": 0}), Strict).is_err());
    }

    #[test]
    fn components_in_any_order() {
        let c: Color = decode_value(&json!({"a": 0.5, "b": 0.25, "g": 0, "r": 1}), Named).unwrap();
        assert_eq!(c, Color::new(1.0, 0.0, 0.25, 0.5));
    }

    #[test]
    fn missing_components_keep_defaults() {
        let c: Color = decode_value(&json!({"r": 1}), Named).unwrap();
        assert_eq!(c, Color::new(1.0, 0.0, 0.0, 1.0));

        let q: Quaternion = decode_value(&json!({"w": 1}), Named).unwrap();
        assert_eq!(q, Quaternion::IDENTITY);
    }

    #[test]
    fn unknown_component_is_rejected() {
        let err = decode_value::<Vector3>(&json!({"x": 1, "y": 2, "q": 3}), Named).unwrap_err();
        assert!(matches!(err, WireError::Mismatch(msg) if msg.contains("unknown field `q`")));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(decode_str::<Vector3>(r#"{"x": 1, "y": 2"#, Named).is_err());
        assert!(decode_str::<Vector3>(r#"[1, 2, 3]"#, Named).is_err());
        assert!(decode_str::<Vector3>(r#"{"x": 1} {"#, Named).is_err());
        assert!(decode_str::<Vector3>(r#"{"x": true}"#, Named).is_err());
        assert!(decode_str::<Vector3>(r#""NaN""#, Named).is_err());
    }

    #[test]
    fn integer_components() {
        let v: Vector3Int = decode_value(&json!({"x": 1, "y": -2, "z": 3.0}), Strict).unwrap();
        assert_eq!(v, Vector3Int::new(1, -2, 3));
        assert!(decode_value::<Vector2Int>(&json!({"x": 1.5, "y": 0}), Strict).is_err());
        assert!(decode_value::<Color32>(&json!({"r": 256}), Strict).is_err());
    }

    #[test]
    fn matrix_round_trip() {
        let mut m = Matrix4x4::IDENTITY;
        m.m[3] = f32::NAN;
        m.m[14] = -7.5;

        let text = encode_string(&m, Named).unwrap();
        assert!(text.starts_with(r#"{"m00":1.0,"m01":0.0,"m02":0.0,"m03":"NaN""#));

        let back: Matrix4x4 = decode_str(&text, Named).unwrap();
        assert!(back.get(0, 3).is_nan());
        assert_eq!(back.get(3, 2), -7.5);
        assert_eq!(back.get(2, 2), 1.0);
    }

    #[test]
    fn bounds_nest_vectors() {
        let b = Bounds::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(f32::INFINITY, 1.0, 1.0));
        let encoded = encode_value(&b, Named).unwrap();
        assert_eq!(encoded["size"]["x"], json!("Infinity"));

        let back: Bounds = decode_value(&encoded, Named).unwrap();
        assert_eq!(back, b);
        assert!(matches!(encode_value(&b, Strict), Err(WireError::NonFinite { .. })));
    }

    fn round_trip<A: Aggregate>(value: A) {
        let text = encode_string(&value, Named).unwrap();
        let back: A = decode_str(&text, Named).unwrap();
        assert_eq!(back, value, "{}: {text}", A::TYPE_NAME);
    }

    #[test]
    fn every_aggregate_round_trips() {
        round_trip(Vector2::new(-1.5, f32::INFINITY));
        round_trip(Vector3::new(0.25, f32::NEG_INFINITY, 3.0e38));
        round_trip(Vector4::new(1.0, 2.0, -3.0, f32::MIN_POSITIVE));
        round_trip(Quaternion::new(0.1, 0.2, 0.3, 0.9));
        round_trip(Color::new(1.0, 0.5, 0.0, 0.75));
        round_trip(Color32::new(255, 128, 0, 7));
        round_trip(Vector2Int::new(i32::MIN, i32::MAX));
        round_trip(Vector3Int::new(-4, 0, 9));
        round_trip(Rect::new(1.0, -2.0, 640.0, 480.0));
        round_trip(RectInt::new(-10, 20, 30, 40));
        round_trip(Bounds::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.5, f32::INFINITY, 0.0)));
        round_trip(BoundsInt::new(Vector3Int::new(1, 2, 3), Vector3Int::new(-4, 5, -6)));
        round_trip(Matrix4x4 {
            m: core::array::from_fn(|i| i as f32 * -0.5),
        });
        round_trip(Matrix4x4::IDENTITY);
    }

    #[test]
    fn wide_floats_do_not_become_infinite() {
        for handling in [Strict, Named] {
            let err = decode_value::<Vector3>(&json!({"x": 1e300, "y": 0, "z": 0}), handling);
            assert!(err.is_err(), "{handling:?}");
        }
        assert!(decode_value::<Vector2>(&json!({"x": -1e39, "y": 0}), Named).is_err());

        let v: Vector2 = decode_value(&json!({"x": f32::MAX, "y": "-Infinity"}), Named).unwrap();
        assert_eq!(v, Vector2::new(f32::MAX, f32::NEG_INFINITY));
    }

    #[test]
    fn schema_shape() {
        let s = schema::<Color>();
        assert_eq!(s["type"], json!("object"));
        assert_eq!(s["required"], json!(["r", "g", "b", "a"]));
        assert_eq!(s["additionalProperties"], json!(false));
        assert_eq!(s["properties"]["g"]["maximum"].as_f64(), Some(1.0));

        let s = schema::<BoundsInt>();
        assert_eq!(s["properties"]["size"]["required"], json!(["x", "y", "z"]));
        assert_eq!(s["properties"]["size"]["properties"]["x"]["type"], json!("integer"));

        assert_eq!(schema_ref::<Matrix4x4>(), json!({"$ref": "#/$defs/Matrix4x4"}));
    }
}
