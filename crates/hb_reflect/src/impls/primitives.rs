use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use serde_json::{Value, json};

use super::TypeInfoCell;
use crate::error::WireError;
use crate::info::{CodecInfo, TypeInfo, TypeKind, Typed};
use crate::options::NumberHandling;
use crate::reflection::Reflect;
use crate::wire::{float_to_value, read_f32, read_float, read_integer};

fn expect<T: Reflect + Typed>(value: &dyn Reflect) -> Result<&T, WireError> {
    value.downcast_ref::<T>().ok_or_else(|| {
        WireError::Encode(format!(
            "expected {}, found {}",
            T::type_info().type_path(),
            value.type_path()
        ))
    })
}

macro_rules! impl_primitive {
    ($ty:ty, $path:expr, $json_type:literal, $encode:expr, $decode:expr) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: TypeInfoCell = TypeInfoCell::new();
                CELL.get_or_init(|| {
                    fn encode(v: &dyn Reflect, h: NumberHandling) -> Result<Value, WireError> {
                        let f: fn($ty, NumberHandling) -> Result<Value, WireError> = $encode;
                        f(expect::<$ty>(v)?.clone(), h)
                    }
                    fn decode(v: &Value, h: NumberHandling) -> Result<Box<dyn Reflect>, WireError> {
                        let f: fn(&Value, NumberHandling) -> Result<$ty, WireError> = $decode;
                        f(v, h).map(|v| Box::new(v) as Box<dyn Reflect>)
                    }
                    fn schema() -> Value {
                        json!({ "type": $json_type })
                    }
                    TypeInfo::new::<Self>($path, TypeKind::Primitive(CodecInfo::new(encode, decode, schema)))
                        .with_default::<Self>()
                })
            }
        }
    };
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {$(
        impl_primitive!(
            $ty,
            stringify!($ty),
            "integer",
            |v, _| Ok(Value::from(v)),
            |v, _| {
                let n = read_integer(v)?;
                <$ty>::try_from(n).map_err(|_| {
                    WireError::mismatch(format_args!("`{n}` is out of range for {}", stringify!($ty)))
                })
            }
        );
    )*};
}

impl_integer!(i32, i64, u8, u32, u64);

impl_primitive!(
    f32,
    "f32",
    "number",
    |v, h| float_to_value(f64::from(v), h),
    |v, h| Ok(read_f32(h, v)?)
);

impl_primitive!(
    f64,
    "f64",
    "number",
    float_to_value,
    |v, h| Ok(read_float(h, v)?)
);

impl_primitive!(bool, "bool", "boolean", |v, _| Ok(Value::Bool(v)), |v, _| {
    v.as_bool()
        .ok_or_else(|| WireError::mismatch(format_args!("expected a boolean, found `{v}`")))
});

impl_primitive!(
    String,
    "alloc::string::String",
    "string",
    |v, _| Ok(Value::String(v)),
    |v, _| match v {
        Value::String(s) => Ok(s.clone()),
        _ => Err(WireError::mismatch(format_args!("expected a string, found `{v}`"))),
    }
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use serde_json::json;

    use crate::NumberHandling::{AllowNamedFloatLiterals as Named, Strict};
    use crate::WireError;
    use crate::info::{TypeKind, Typed};

    fn codec<T: Typed>() -> crate::info::CodecInfo {
        match T::type_info().kind() {
            TypeKind::Primitive(codec) => *codec,
            kind => panic!("unexpected kind {kind:?}"),
        }
    }

    #[test]
    fn integer_range_is_checked() {
        let c = codec::<u8>();
        assert!(c.decode(&json!(255), Strict).is_ok());
        assert!(c.decode(&json!(256), Strict).is_err());
        assert!(c.decode(&json!("1"), Strict).is_err());
        assert_eq!(c.encode(&7_u8, Strict).unwrap(), json!(7));
    }

    #[test]
    fn float_named_literals() {
        let c = codec::<f32>();
        assert_eq!(c.encode(&f32::NEG_INFINITY, Named).unwrap(), json!("-Infinity"));
        assert!(c.encode(&f32::NAN, Strict).is_err());

        let v = c.decode(&json!("NaN"), Named).unwrap().take::<f32>().unwrap();
        assert!(v.is_nan());
        assert!(c.decode(&json!("NaN"), Strict).is_err());
    }

    #[test]
    fn float_out_of_f32_range() {
        let c = codec::<f32>();
        assert!(c.decode(&json!(1e300), Strict).is_err());
        assert!(c.decode(&json!(-1e39), Named).is_err());

        let v = c.decode(&json!("-Infinity"), Named).unwrap().take::<f32>().unwrap();
        assert_eq!(v, f32::NEG_INFINITY);
        let wide = codec::<f64>().decode(&json!(1e300), Strict).unwrap().take::<f64>().unwrap();
        assert_eq!(wide, 1e300);
    }

    #[test]
    fn encode_names_the_expected_type() {
        let err = codec::<i32>().encode(&String::from("x"), Strict).unwrap_err();
        assert!(matches!(&err, WireError::Encode(msg) if msg.contains("expected i32")), "{err}");
    }

    #[test]
    fn string_and_bool() {
        let s = codec::<String>().decode(&json!("hello"), Strict).unwrap();
        assert_eq!(s.take::<String>().as_deref(), Some("hello"));
        assert!(codec::<bool>().decode(&json!(1), Strict).is_err());
        assert_eq!(String::type_info().type_name(), "String");
    }
}
