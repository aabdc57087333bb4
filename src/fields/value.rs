//! Field values and the `Field` type itself

use super::kind::FieldKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Complex number carried by `Complex64`/`Complex128` fields
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

impl<T: fmt::Display + PartialOrd + Default> fmt::Display for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < T::default() {
            write!(f, "{}{}i", self.re, self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

/// A pointer-width integer.
///
/// `usize` already stands for the platform-width unsigned integer, so the
/// pointer-width kind gets its own type to stay distinguishable during
/// [`any`](super::any) inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uintptr(pub usize);

impl<T> From<*const T> for Uintptr {
    fn from(ptr: *const T) -> Self {
        Uintptr(ptr as usize)
    }
}

impl From<usize> for Uintptr {
    fn from(value: usize) -> Self {
        Uintptr(value)
    }
}

/// Value serialized through a generic, reflection-like path at encode time.
///
/// Encoding failures are not fatal: the translator reports them inside the
/// record under `<key>Error`.
pub trait Reflect: fmt::Debug + Send + Sync {
    fn encode(&self) -> serde_json::Result<serde_json::Value>;
}

/// Adapter that serializes any `serde::Serialize` value lazily
#[derive(Debug, Clone)]
pub struct Serialized<T>(pub T);

impl<T> Reflect for Serialized<T>
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn encode(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.0)
    }
}

impl Reflect for serde_json::Value {
    fn encode(&self) -> serde_json::Result<serde_json::Value> {
        Ok(self.clone())
    }
}

/// Value rendered through `Display` only when the field is actually encoded
#[derive(Clone)]
pub struct Stringer(Arc<dyn fmt::Display + Send + Sync>);

impl Stringer {
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }

    pub fn from_arc(value: Arc<dyn fmt::Display + Send + Sync>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Stringer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Stringer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Rendering here would defeat the laziness
        f.write_str("Stringer(..)")
    }
}

/// Shared, type-erased error carried by `Error` fields
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// The tagged union of everything a field can carry
#[derive(Debug, Clone)]
pub enum FieldValue {
    Binary(Vec<u8>),
    Bool(bool),
    ByteString(Vec<u8>),
    Complex128(Complex<f64>),
    Complex64(Complex<f32>),
    Duration(chrono::Duration),
    Float64(f64),
    Float32(f32),
    Int64(i64),
    Int32(i32),
    Int16(i16),
    Int8(i8),
    Int(isize),
    String(String),
    Time(DateTime<Utc>),
    Uint64(u64),
    Uint32(u32),
    Uint16(u16),
    Uint8(u8),
    Uint(usize),
    Uintptr(usize),
    /// `None` is the explicit null produced by absent optional inputs
    Reflect(Option<Arc<dyn Reflect>>),
    Namespace,
    Stringer(Stringer),
    Error(SharedError),
    Skip,

    Bools(Vec<bool>),
    ByteStrings(Vec<Vec<u8>>),
    Complex128s(Vec<Complex<f64>>),
    Complex64s(Vec<Complex<f32>>),
    Durations(Vec<chrono::Duration>),
    Float64s(Vec<f64>),
    Float32s(Vec<f32>),
    Int64s(Vec<i64>),
    Int32s(Vec<i32>),
    Int16s(Vec<i16>),
    Int8s(Vec<i8>),
    Ints(Vec<isize>),
    Strings(Vec<String>),
    Times(Vec<DateTime<Utc>>),
    Uint64s(Vec<u64>),
    Uint32s(Vec<u32>),
    Uint16s(Vec<u16>),
    Uint8s(Vec<u8>),
    Uints(Vec<usize>),
    Uintptrs(Vec<usize>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Binary(_) => FieldKind::Binary,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::ByteString(_) => FieldKind::ByteString,
            FieldValue::Complex128(_) => FieldKind::Complex128,
            FieldValue::Complex64(_) => FieldKind::Complex64,
            FieldValue::Duration(_) => FieldKind::Duration,
            FieldValue::Float64(_) => FieldKind::Float64,
            FieldValue::Float32(_) => FieldKind::Float32,
            FieldValue::Int64(_) => FieldKind::Int64,
            FieldValue::Int32(_) => FieldKind::Int32,
            FieldValue::Int16(_) => FieldKind::Int16,
            FieldValue::Int8(_) => FieldKind::Int8,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Time(_) => FieldKind::Time,
            FieldValue::Uint64(_) => FieldKind::Uint64,
            FieldValue::Uint32(_) => FieldKind::Uint32,
            FieldValue::Uint16(_) => FieldKind::Uint16,
            FieldValue::Uint8(_) => FieldKind::Uint8,
            FieldValue::Uint(_) => FieldKind::Uint,
            FieldValue::Uintptr(_) => FieldKind::Uintptr,
            FieldValue::Reflect(_) => FieldKind::Reflect,
            FieldValue::Namespace => FieldKind::Namespace,
            FieldValue::Stringer(_) => FieldKind::Stringer,
            FieldValue::Error(_) => FieldKind::Error,
            FieldValue::Skip => FieldKind::Skip,
            FieldValue::Bools(_) => FieldKind::Bools,
            FieldValue::ByteStrings(_) => FieldKind::ByteStrings,
            FieldValue::Complex128s(_) => FieldKind::Complex128s,
            FieldValue::Complex64s(_) => FieldKind::Complex64s,
            FieldValue::Durations(_) => FieldKind::Durations,
            FieldValue::Float64s(_) => FieldKind::Float64s,
            FieldValue::Float32s(_) => FieldKind::Float32s,
            FieldValue::Int64s(_) => FieldKind::Int64s,
            FieldValue::Int32s(_) => FieldKind::Int32s,
            FieldValue::Int16s(_) => FieldKind::Int16s,
            FieldValue::Int8s(_) => FieldKind::Int8s,
            FieldValue::Ints(_) => FieldKind::Ints,
            FieldValue::Strings(_) => FieldKind::Strings,
            FieldValue::Times(_) => FieldKind::Times,
            FieldValue::Uint64s(_) => FieldKind::Uint64s,
            FieldValue::Uint32s(_) => FieldKind::Uint32s,
            FieldValue::Uint16s(_) => FieldKind::Uint16s,
            FieldValue::Uint8s(_) => FieldKind::Uint8s,
            FieldValue::Uints(_) => FieldKind::Uints,
            FieldValue::Uintptrs(_) => FieldKind::Uintptrs,
        }
    }

    /// True for the explicit null carried by absent optional inputs
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Reflect(None))
    }
}

/// A single typed key/value logging attribute.
///
/// Fields are cheap to build: nothing is rendered or serialized until the
/// logger has decided the record will be written.
#[derive(Debug, Clone)]
pub struct Field {
    key: String,
    value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// The no-op field: no key, no value, no output
    pub const fn skip() -> Self {
        Self {
            key: String::new(),
            value: FieldValue::Skip,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    pub fn is_skip(&self) -> bool {
        matches!(self.value, FieldValue::Skip)
    }

    pub fn into_parts(self) -> (String, FieldValue) {
        (self.key, self.value)
    }
}
