//! Field kind tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying which shape a [`Field`](super::Field) value has and how it
/// is serialized.
///
/// The set is closed inside this crate: every variant of
/// [`FieldValue`](super::FieldValue) maps onto exactly one kind. The enum is
/// `#[non_exhaustive]` so that consumers matching on it outside the crate
/// keep a fallback arm for kinds added later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FieldKind {
    Binary,
    Bool,
    ByteString,
    Complex128,
    Complex64,
    Duration,
    Float64,
    Float32,
    Int64,
    Int32,
    Int16,
    Int8,
    Int,
    String,
    /// Absolute time, representable as nanoseconds since the Unix epoch
    Time,
    Uint64,
    Uint32,
    Uint16,
    Uint8,
    Uint,
    Uintptr,
    /// Arbitrary value serialized lazily; also the explicit-null carrier
    Reflect,
    /// Opens a nested scope for the remaining fields of the same list
    Namespace,
    /// Value rendered through `Display` at encode time
    Stringer,
    Error,
    /// No-op; never reaches the record
    Skip,

    Bools,
    ByteStrings,
    Complex128s,
    Complex64s,
    Durations,
    Float64s,
    Float32s,
    Int64s,
    Int32s,
    Int16s,
    Int8s,
    Ints,
    Strings,
    Times,
    Uint64s,
    Uint32s,
    Uint16s,
    Uint8s,
    Uints,
    Uintptrs,
}

impl FieldKind {
    /// All kinds, scalar family first.
    pub const ALL: [FieldKind; 46] = [
        FieldKind::Binary,
        FieldKind::Bool,
        FieldKind::ByteString,
        FieldKind::Complex128,
        FieldKind::Complex64,
        FieldKind::Duration,
        FieldKind::Float64,
        FieldKind::Float32,
        FieldKind::Int64,
        FieldKind::Int32,
        FieldKind::Int16,
        FieldKind::Int8,
        FieldKind::Int,
        FieldKind::String,
        FieldKind::Time,
        FieldKind::Uint64,
        FieldKind::Uint32,
        FieldKind::Uint16,
        FieldKind::Uint8,
        FieldKind::Uint,
        FieldKind::Uintptr,
        FieldKind::Reflect,
        FieldKind::Namespace,
        FieldKind::Stringer,
        FieldKind::Error,
        FieldKind::Skip,
        FieldKind::Bools,
        FieldKind::ByteStrings,
        FieldKind::Complex128s,
        FieldKind::Complex64s,
        FieldKind::Durations,
        FieldKind::Float64s,
        FieldKind::Float32s,
        FieldKind::Int64s,
        FieldKind::Int32s,
        FieldKind::Int16s,
        FieldKind::Int8s,
        FieldKind::Ints,
        FieldKind::Strings,
        FieldKind::Times,
        FieldKind::Uint64s,
        FieldKind::Uint32s,
        FieldKind::Uint16s,
        FieldKind::Uint8s,
        FieldKind::Uints,
        FieldKind::Uintptrs,
    ];

    /// Whether this kind carries an ordered sequence of scalars
    pub fn is_repeated(&self) -> bool {
        matches!(
            self,
            FieldKind::Bools
                | FieldKind::ByteStrings
                | FieldKind::Complex128s
                | FieldKind::Complex64s
                | FieldKind::Durations
                | FieldKind::Float64s
                | FieldKind::Float32s
                | FieldKind::Int64s
                | FieldKind::Int32s
                | FieldKind::Int16s
                | FieldKind::Int8s
                | FieldKind::Ints
                | FieldKind::Strings
                | FieldKind::Times
                | FieldKind::Uint64s
                | FieldKind::Uint32s
                | FieldKind::Uint16s
                | FieldKind::Uint8s
                | FieldKind::Uints
                | FieldKind::Uintptrs
        )
    }

    /// The repeated counterpart of a scalar kind, if there is one
    pub fn repeated(&self) -> Option<FieldKind> {
        let kind = match self {
            FieldKind::Bool => FieldKind::Bools,
            FieldKind::ByteString => FieldKind::ByteStrings,
            FieldKind::Complex128 => FieldKind::Complex128s,
            FieldKind::Complex64 => FieldKind::Complex64s,
            FieldKind::Duration => FieldKind::Durations,
            FieldKind::Float64 => FieldKind::Float64s,
            FieldKind::Float32 => FieldKind::Float32s,
            FieldKind::Int64 => FieldKind::Int64s,
            FieldKind::Int32 => FieldKind::Int32s,
            FieldKind::Int16 => FieldKind::Int16s,
            FieldKind::Int8 => FieldKind::Int8s,
            FieldKind::Int => FieldKind::Ints,
            FieldKind::String => FieldKind::Strings,
            FieldKind::Time => FieldKind::Times,
            FieldKind::Uint64 => FieldKind::Uint64s,
            FieldKind::Uint32 => FieldKind::Uint32s,
            FieldKind::Uint16 => FieldKind::Uint16s,
            FieldKind::Uint8 => FieldKind::Uint8s,
            FieldKind::Uint => FieldKind::Uints,
            FieldKind::Uintptr => FieldKind::Uintptrs,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
