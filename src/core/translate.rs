//! Translation of typed fields into the engine's native representation
//!
//! Every [`FieldValue`] variant has exactly one arm in [`translate_into`], so
//! adding a kind without teaching the translator about it fails to compile.
//! This is the only place lazy values (stringers, errors, reflected values)
//! are rendered, and none of those renderings can abort the record: panics and
//! serialization failures are reported in the record under `<key>Error`.

use super::error::panic_message;
use super::log_context::LogContext;
use super::timestamp::{DurationFormat, TimestampFormat};
use crate::fields::{Complex, Field, FieldValue};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::error::Error as StdError;
use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Suffix of the key holding a rendering or serialization failure
pub const ERROR_KEY_SUFFIX: &str = "Error";
/// Suffix of the key holding an error's full cause chain
pub const VERBOSE_KEY_SUFFIX: &str = "Verbose";

/// How time-like field values are encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub time_format: TimestampFormat,
    pub duration_format: DurationFormat,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            time_format: TimestampFormat::Iso8601Nanos,
            duration_format: DurationFormat::String,
        }
    }
}

/// Translate a field sequence into a fresh context
pub fn translate<I>(fields: I, config: &EncoderConfig) -> LogContext
where
    I: IntoIterator<Item = Field>,
{
    let mut context = LogContext::new();
    translate_into(&mut context, fields, config);
    context
}

/// Append a field sequence to `context`.
///
/// A namespace field nests every later field of the same sequence under its
/// key; the scope closes when the sequence ends.
pub fn translate_into<I>(context: &mut LogContext, fields: I, config: &EncoderConfig)
where
    I: IntoIterator<Item = Field>,
{
    encode_sequence(&mut fields.into_iter(), context.fields_mut(), config);
}

fn encode_sequence<I>(fields: &mut I, target: &mut Map<String, Value>, config: &EncoderConfig)
where
    I: Iterator<Item = Field>,
{
    while let Some(field) = fields.next() {
        let (key, value) = field.into_parts();
        let encoded = match value {
            FieldValue::Skip => continue,
            FieldValue::Namespace => {
                let mut nested = Map::new();
                encode_sequence(fields, &mut nested, config);
                Value::Object(nested)
            }
            FieldValue::Error(err) => {
                encode_error(target, key, err.as_ref());
                continue;
            }
            FieldValue::Stringer(stringer) => match render(&stringer) {
                Ok(s) => Value::String(s),
                Err(failure) => {
                    target.insert(format!("{}{}", key, ERROR_KEY_SUFFIX), Value::String(failure));
                    continue;
                }
            },
            FieldValue::Reflect(None) => Value::Null,
            FieldValue::Reflect(Some(reflected)) => {
                let outcome = catch_unwind(AssertUnwindSafe(|| reflected.encode()));
                match outcome {
                    Ok(Ok(value)) => value,
                    Ok(Err(e)) => {
                        target.insert(format!("{}{}", key, ERROR_KEY_SUFFIX), Value::String(e.to_string()));
                        continue;
                    }
                    Err(payload) => {
                        target.insert(
                            format!("{}{}", key, ERROR_KEY_SUFFIX),
                            Value::String(format!("PANIC={}", panic_message(payload.as_ref()))),
                        );
                        continue;
                    }
                }
            }

            FieldValue::Binary(bytes) => Value::String(STANDARD.encode(&bytes)),
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::ByteString(bytes) => byte_string(&bytes),
            FieldValue::Complex128(c) => complex(c),
            FieldValue::Complex64(c) => complex(c),
            FieldValue::Duration(d) => config.duration_format.to_json(&d),
            FieldValue::Float64(f) => float64(f),
            FieldValue::Float32(f) => float32(f),
            FieldValue::Int64(i) => Value::from(i),
            FieldValue::Int32(i) => Value::from(i),
            FieldValue::Int16(i) => Value::from(i),
            FieldValue::Int8(i) => Value::from(i),
            FieldValue::Int(i) => Value::from(i),
            FieldValue::String(s) => Value::String(s),
            FieldValue::Time(t) => config.time_format.to_json(&t),
            FieldValue::Uint64(u) => Value::from(u),
            FieldValue::Uint32(u) => Value::from(u),
            FieldValue::Uint16(u) => Value::from(u),
            FieldValue::Uint8(u) => Value::from(u),
            FieldValue::Uint(u) => Value::from(u),
            FieldValue::Uintptr(u) => Value::from(u),

            FieldValue::Bools(v) => array(v, Value::Bool),
            FieldValue::ByteStrings(v) => array(v, |b| byte_string(&b)),
            FieldValue::Complex128s(v) => array(v, complex),
            FieldValue::Complex64s(v) => array(v, complex),
            FieldValue::Durations(v) => array(v, |d| config.duration_format.to_json(&d)),
            FieldValue::Float64s(v) => array(v, float64),
            FieldValue::Float32s(v) => array(v, float32),
            FieldValue::Int64s(v) => array(v, Value::from),
            FieldValue::Int32s(v) => array(v, Value::from),
            FieldValue::Int16s(v) => array(v, Value::from),
            FieldValue::Int8s(v) => array(v, Value::from),
            FieldValue::Ints(v) => array(v, Value::from),
            FieldValue::Strings(v) => array(v, Value::String),
            FieldValue::Times(v) => array(v, |t| config.time_format.to_json(&t)),
            FieldValue::Uint64s(v) => array(v, Value::from),
            FieldValue::Uint32s(v) => array(v, Value::from),
            FieldValue::Uint16s(v) => array(v, Value::from),
            FieldValue::Uint8s(v) => array(v, Value::from),
            FieldValue::Uints(v) => array(v, Value::from),
            FieldValue::Uintptrs(v) => array(v, Value::from),
        };
        target.insert(key, encoded);
    }
}

fn array<T>(values: Vec<T>, encode: impl FnMut(T) -> Value) -> Value {
    Value::Array(values.into_iter().map(encode).collect())
}

/// Render a lazy `Display` value, turning a panic into `PANIC=<message>`
fn render(value: &dyn Display) -> Result<String, String> {
    catch_unwind(AssertUnwindSafe(|| value.to_string()))
        .map_err(|payload| format!("PANIC={}", panic_message(payload.as_ref())))
}

fn encode_error(target: &mut Map<String, Value>, key: String, err: &(dyn StdError + 'static)) {
    let message = match render(&err) {
        Ok(message) => message,
        Err(failure) => {
            target.insert(format!("{}{}", key, ERROR_KEY_SUFFIX), Value::String(failure));
            return;
        }
    };

    let mut chain = message.clone();
    let mut source = err.source();
    while let Some(cause) = source {
        match render(&cause) {
            Ok(text) => {
                chain.push_str(": ");
                chain.push_str(&text);
            }
            Err(_) => break,
        }
        source = cause.source();
    }

    let has_cause = err.source().is_some();
    target.insert(key.clone(), Value::String(message));
    if has_cause {
        target.insert(format!("{}{}", key, VERBOSE_KEY_SUFFIX), Value::String(chain));
    }
}

fn non_finite(f: f64) -> Value {
    let text = if f.is_nan() {
        "NaN"
    } else if f.is_sign_positive() {
        "+Inf"
    } else {
        "-Inf"
    };
    Value::String(text.to_string())
}

fn float64(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or_else(|| non_finite(f))
}

/// Encode through the shortest decimal form so `0.1_f32` stays `0.1`
fn float32(f: f32) -> Value {
    if !f.is_finite() {
        return non_finite(f64::from(f));
    }
    let widened = f.to_string().parse::<f64>().unwrap_or(f64::from(f));
    float64(widened)
}

fn complex<T>(c: Complex<T>) -> Value
where
    Complex<T>: Display,
{
    Value::String(c.to_string())
}

fn byte_string(bytes: &[u8]) -> Value {
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}
