//! Field constructors
//!
//! One constructor per `(kind, shape)` pair. None of them validate, render or
//! serialize anything: they box the value and tag it. The only exception is
//! [`stack`], which must capture the call stack where it is invoked.
//!
//! Numeric, time and duration kinds come in three shapes generated by
//! `typed_constructors!`:
//!
//! - `int64(key, v)`: the scalar
//! - `int64_opt(key, Option<v>)`: `None` becomes an explicit null
//! - `int64s(key, vec)`: the ordered sequence

use super::stack::capture_frames;
use super::value::{Complex, Field, FieldValue, Reflect, Serialized, SharedError, Stringer};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

macro_rules! typed_constructors {
    ($($ty:ty => $scalar:ident / $variant:ident, $opt:ident, $many:ident / $many_variant:ident;)+) => {
        $(
            #[doc = concat!("Constructs a field that carries a `", stringify!($ty), "`.")]
            #[inline]
            pub fn $scalar(key: impl Into<String>, val: $ty) -> Field {
                Field::new(key, FieldValue::$variant(val))
            }

            #[doc = concat!(
                "Constructs a field from an optional `", stringify!($ty),
                "`. `None` is logged as an explicit null under the key."
            )]
            #[inline]
            pub fn $opt(key: impl Into<String>, val: Option<$ty>) -> Field {
                match val {
                    Some(val) => $scalar(key, val),
                    None => null(key),
                }
            }

            #[doc = concat!("Constructs a field that carries an ordered sequence of `", stringify!($ty), "`.")]
            #[inline]
            pub fn $many(key: impl Into<String>, vals: impl Into<Vec<$ty>>) -> Field {
                Field::new(key, FieldValue::$many_variant(vals.into()))
            }
        )+
    };
}

typed_constructors! {
    bool => bool / Bool, bool_opt, bools / Bools;
    Complex<f64> => complex128 / Complex128, complex128_opt, complex128s / Complex128s;
    Complex<f32> => complex64 / Complex64, complex64_opt, complex64s / Complex64s;
    f64 => float64 / Float64, float64_opt, float64s / Float64s;
    f32 => float32 / Float32, float32_opt, float32s / Float32s;
    isize => int / Int, int_opt, ints / Ints;
    i64 => int64 / Int64, int64_opt, int64s / Int64s;
    i32 => int32 / Int32, int32_opt, int32s / Int32s;
    i16 => int16 / Int16, int16_opt, int16s / Int16s;
    i8 => int8 / Int8, int8_opt, int8s / Int8s;
    usize => uint / Uint, uint_opt, uints / Uints;
    u64 => uint64 / Uint64, uint64_opt, uint64s / Uint64s;
    u32 => uint32 / Uint32, uint32_opt, uint32s / Uint32s;
    u16 => uint16 / Uint16, uint16_opt, uint16s / Uint16s;
    u8 => uint8 / Uint8, uint8_opt, uint8s / Uint8s;
    usize => uintptr / Uintptr, uintptr_opt, uintptrs / Uintptrs;
    DateTime<Utc> => time / Time, time_opt, times / Times;
    chrono::Duration => duration / Duration, duration_opt, durations / Durations;
}

/// Constructs the no-op field. It carries no key and vanishes from the
/// record, so call sites can always pass a fixed number of fields.
#[inline]
pub const fn skip() -> Field {
    Field::skip()
}

/// Constructs a field that is logged as an explicit null
#[inline]
pub fn null(key: impl Into<String>) -> Field {
    Field::new(key, FieldValue::Reflect(None))
}

/// Constructs a field that carries UTF-8 text.
pub fn string(key: impl Into<String>, val: impl Into<String>) -> Field {
    Field::new(key, FieldValue::String(val.into()))
}

/// Constructs a field from optional text; `None` is logged as null.
pub fn string_opt<S: Into<String>>(key: impl Into<String>, val: Option<S>) -> Field {
    match val {
        Some(val) => string(key, val),
        None => null(key),
    }
}

/// Constructs a field that carries an ordered sequence of strings.
pub fn strings<I, S>(key: impl Into<String>, vals: I) -> Field
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Field::new(
        key,
        FieldValue::Strings(vals.into_iter().map(Into::into).collect()),
    )
}

/// Constructs a field that carries an opaque binary blob.
///
/// Blobs are encoded in an encoding-appropriate way (base64 in JSON). Use
/// [`byte_string`] for bytes that are UTF-8 text.
pub fn binary(key: impl Into<String>, val: impl Into<Vec<u8>>) -> Field {
    Field::new(key, FieldValue::Binary(val.into()))
}

/// Constructs a field that carries UTF-8 encoded text as bytes.
pub fn byte_string(key: impl Into<String>, val: impl Into<Vec<u8>>) -> Field {
    Field::new(key, FieldValue::ByteString(val.into()))
}

/// Constructs a field that carries a sequence of UTF-8 byte strings.
pub fn byte_strings<I, B>(key: impl Into<String>, vals: I) -> Field
where
    I: IntoIterator<Item = B>,
    B: Into<Vec<u8>>,
{
    Field::new(
        key,
        FieldValue::ByteStrings(vals.into_iter().map(Into::into).collect()),
    )
}

/// Constructs a field whose value is serialized with `serde` when the record
/// is written. Serialization errors end up inside the record under
/// `<key>Error`.
pub fn reflect<T>(key: impl Into<String>, val: T) -> Field
where
    T: Serialize + fmt::Debug + Send + Sync + 'static,
{
    Field::new(key, FieldValue::Reflect(Some(Arc::new(Serialized(val)))))
}

/// Constructs a reflect field from an already-built JSON value.
pub fn reflect_json(key: impl Into<String>, val: serde_json::Value) -> Field {
    Field::new(key, FieldValue::Reflect(Some(Arc::new(val))))
}

/// Constructs a reflect field from any custom [`Reflect`] implementation.
pub fn reflect_with(key: impl Into<String>, val: Arc<dyn Reflect>) -> Field {
    Field::new(key, FieldValue::Reflect(Some(val)))
}

/// Opens a named, isolated scope: every field that follows in the same list
/// is nested under `key`.
pub fn namespace(key: impl Into<String>) -> Field {
    Field::new(key, FieldValue::Namespace)
}

/// Constructs a field holding a value whose `Display` output is produced
/// lazily, only if the record is written.
pub fn stringer<T>(key: impl Into<String>, val: T) -> Field
where
    T: fmt::Display + Send + Sync + 'static,
{
    Field::new(key, FieldValue::Stringer(Stringer::new(val)))
}

/// Constructs a field holding the call stack of the current thread, captured
/// right here (and not when the record is written). Frames are formatted as
/// `file:Lline`, starting at the caller, at most 32 of them.
#[track_caller]
pub fn stack(key: impl Into<String>) -> Field {
    strings(key, capture_frames(std::panic::Location::caller()))
}

/// Shorthand for `named_error("error", err)`.
pub fn err(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Field {
    named_error("error", err)
}

/// Shorthand for `named_error_opt("error", err)`.
pub fn err_opt<E>(err: Option<E>) -> Field
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    named_error_opt("error", err)
}

/// Constructs a field that stores `err` and renders it at encode time.
///
/// When the error has a `source()` chain, the full chain is also written
/// under `<key>Verbose`.
pub fn named_error(key: impl Into<String>, err: impl Into<Box<dyn StdError + Send + Sync>>) -> Field {
    shared_error(key, Arc::from(err.into()))
}

/// Like [`named_error`], but `None` produces the no-op field so a possibly
/// absent error can be passed without branching.
pub fn named_error_opt<E>(key: impl Into<String>, err: Option<E>) -> Field
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    match err {
        Some(err) => named_error(key, err),
        None => skip(),
    }
}

/// Constructs an error field from an already shared error
pub fn shared_error(key: impl Into<String>, err: SharedError) -> Field {
    Field::new(key, FieldValue::Error(err))
}
