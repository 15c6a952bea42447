//! Scalar conversion for QuickJS values
//!
//! | Scalar  | JavaScript            |
//! |---------|-----------------------|
//! | `Bool`  | boolean               |
//! | `Int`   | int-tagged number     |
//! | `Long`  | `BigInt`              |
//! | `Float` | float-tagged number   |
//! | `Str`   | string (copied)       |
//!
//! Everything else (undefined, null, objects, functions, symbols) is unsupported.

use crate::exception;
use rquickjs::{qjs, BigInt, Ctx, Type, Value};
use tether_core::{BridgeError, Scalar, ScalarCodec, ValueKind};

/// Codec bound to one entered context.
pub struct JsCodec<'js> {
    ctx: Ctx<'js>,
}

impl<'js> JsCodec<'js> {
    pub fn new(ctx: &Ctx<'js>) -> Self {
        Self { ctx: ctx.clone() }
    }
}

impl<'js> ScalarCodec for JsCodec<'js> {
    type Foreign = Value<'js>;

    fn probe(&self, value: &Value<'js>, kind: ValueKind) -> bool {
        match kind {
            ValueKind::Bool => value.is_bool(),
            ValueKind::Int => value.is_int(),
            ValueKind::Long => value.type_of() == Type::BigInt,
            ValueKind::Float => value.is_float(),
            ValueKind::Str => value.is_string(),
            ValueKind::Unsupported => false,
        }
    }

    fn describe(&self, value: &Value<'js>) -> String {
        value.type_of().as_str().to_string()
    }

    fn to_foreign(&self, value: &Scalar) -> Result<Value<'js>, BridgeError> {
        let ctx = self.ctx.clone();
        match value {
            Scalar::Bool(v) => Ok(Value::new_bool(ctx, *v)),
            Scalar::Int(v) => Ok(Value::new_int(ctx, *v)),
            Scalar::Float(v) => Ok(float_value(ctx, *v)),
            Scalar::Long(v) => BigInt::from_i64(ctx, *v)
                .map(|big| big.into_value())
                .map_err(|err| exception::translate(&self.ctx, err)),
            Scalar::Str(v) => rquickjs::String::from_str(ctx, v)
                .map(|text| text.into_value())
                .map_err(|err| exception::translate(&self.ctx, err)),
        }
    }

    fn extract(&self, value: &Value<'js>, kind: ValueKind) -> Result<Scalar, BridgeError> {
        let scalar = match kind {
            ValueKind::Bool => value.as_bool().map(Scalar::Bool),
            ValueKind::Int => value.as_int().map(Scalar::Int),
            ValueKind::Float => value.as_float().map(Scalar::Float),
            ValueKind::Long => {
                let big = value
                    .get::<BigInt<'js>>()
                    .and_then(|big| big.to_i64())
                    .map_err(|err| exception::translate(&self.ctx, err))?;
                Some(Scalar::Long(big))
            }
            ValueKind::Str => {
                let text = value
                    .get::<String>()
                    .map_err(|err| exception::translate(&self.ctx, err))?;
                Some(Scalar::Str(text))
            }
            ValueKind::Unsupported => None,
        };
        scalar.ok_or_else(|| BridgeError::unsupported(self.describe(value)))
    }
}

/// A float-tagged number, even for whole values.
///
/// `Value::new_float` stores whole doubles with the int tag, which would read
/// back as `Int`.
fn float_value(ctx: Ctx<'_>, value: f64) -> Value<'_> {
    // SAFETY: float64 values carry no reference count, and the value is owned.
    unsafe { Value::from_raw(ctx, qjs::__JS_NewFloat64(value)) }
}
