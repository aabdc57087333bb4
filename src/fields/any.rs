//! Best-effort kind inference for untyped values
//!
//! [`any`] picks the most specific field kind by exact type match, checked in
//! a fixed order: bool, complex, float, signed integers, string, unsigned
//! integers, byte blob, pointer-width integer, time, duration, error,
//! stringer, and finally a reflection fallback. `Option<T>` and `Vec<T>` of a
//! scalar are matched in the same tier as `T`. The order is a compatibility
//! contract, not an implementation detail:
//!
//! - `Vec<u8>` is always a binary blob, never a sequence of `u8`
//! - `char` is logged as an `Int32`
//! - a shared error is an `Error` field even though it is also `Display`

use super::constructors::*;
use super::value::{Complex, Field, Reflect, SharedError, Stringer, Uintptr};
use chrono::{DateTime, Utc};
use std::any::Any;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

trait Slot: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T> Slot for Option<T>
where
    T: Any + fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Some(value) => value.fmt(f),
            None => f.write_str("<moved>"),
        }
    }
}

/// A type-erased value whose field kind is decided by inference.
///
/// This is the loosely-typed input of the sugared logging methods.
pub struct Untyped {
    slot: Box<dyn Slot>,
}

impl Untyped {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + fmt::Debug + Send + Sync,
    {
        Self {
            slot: Box::new(Some(value)),
        }
    }

    /// Borrow the value if it has exactly type `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.slot
            .as_any()
            .downcast_ref::<Option<T>>()
            .and_then(Option::as_ref)
    }

    /// Take the value out if it has exactly type `T`
    pub fn take<T: Any>(&mut self) -> Option<T> {
        self.slot
            .as_any_mut()
            .downcast_mut::<Option<T>>()
            .and_then(Option::take)
    }

    /// The string content of a `String`, `&'static str` or `Cow<'static, str>`
    pub fn as_str(&self) -> Option<&str> {
        if let Some(s) = self.downcast_ref::<String>() {
            return Some(s);
        }
        if let Some(s) = self.downcast_ref::<&'static str>() {
            return Some(s);
        }
        self.downcast_ref::<Cow<'static, str>>().map(|s| s.as_ref())
    }

    /// Infer the field kind and build the field
    pub fn into_field(self, key: impl Into<String>) -> Field {
        infer(key.into(), self)
    }
}

impl fmt::Debug for Untyped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.slot.fmt_value(f)
    }
}

impl Reflect for Untyped {
    fn encode(&self) -> serde_json::Result<serde_json::Value> {
        Ok(serde_json::Value::String(format!("{:?}", self)))
    }
}

/// Chooses the best field kind for an arbitrary value, falling back to a
/// `Debug` rendering only when nothing more specific matches.
pub fn any<T>(key: impl Into<String>, value: T) -> Field
where
    T: Any + fmt::Debug + Send + Sync,
{
    infer(key.into(), Untyped::new(value))
}

macro_rules! infer_in_order {
    ($slot:ident, $key:ident; $($ty:ty => $ctor:expr,)+) => {
        $(
            if let Some(inner) = $slot.downcast_mut::<Option<$ty>>() {
                if let Some(val) = inner.take() {
                    let ctor: fn(String, $ty) -> Field = $ctor;
                    return ctor($key, val);
                }
            }
        )+
    };
}

fn std_duration(d: std::time::Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or(chrono::Duration::MAX)
}

fn infer(key: String, mut value: Untyped) -> Field {
    let slot = value.slot.as_any_mut();

    infer_in_order! { slot, key;
        bool => bool,
        Option<bool> => bool_opt,
        Vec<bool> => bools,

        Complex<f64> => complex128,
        Option<Complex<f64>> => complex128_opt,
        Vec<Complex<f64>> => complex128s,
        Complex<f32> => complex64,
        Option<Complex<f32>> => complex64_opt,
        Vec<Complex<f32>> => complex64s,

        f64 => float64,
        Option<f64> => float64_opt,
        Vec<f64> => float64s,
        f32 => float32,
        Option<f32> => float32_opt,
        Vec<f32> => float32s,

        isize => int,
        Option<isize> => int_opt,
        Vec<isize> => ints,
        i64 => int64,
        Option<i64> => int64_opt,
        Vec<i64> => int64s,
        i32 => int32,
        Option<i32> => int32_opt,
        Vec<i32> => int32s,
        char => |k, c: char| int32(k, c as i32),
        Option<char> => |k, c: Option<char>| int32_opt(k, c.map(|c| c as i32)),
        Vec<char> => |k, cs: Vec<char>| int32s(k, cs.into_iter().map(|c| c as i32).collect::<Vec<_>>()),
        i16 => int16,
        Option<i16> => int16_opt,
        Vec<i16> => int16s,
        i8 => int8,
        Option<i8> => int8_opt,
        Vec<i8> => int8s,

        String => |k, s: String| string(k, s),
        &'static str => |k, s: &'static str| string(k, s),
        Cow<'static, str> => |k, s: Cow<'static, str>| string(k, s),
        Option<String> => |k, s: Option<String>| string_opt(k, s),
        Option<&'static str> => |k, s: Option<&'static str>| string_opt(k, s),
        Vec<String> => |k, ss: Vec<String>| strings(k, ss),
        Vec<&'static str> => |k, ss: Vec<&'static str>| strings(k, ss),

        usize => uint,
        Option<usize> => uint_opt,
        Vec<usize> => uints,
        u64 => uint64,
        Option<u64> => uint64_opt,
        Vec<u64> => uint64s,
        u32 => uint32,
        Option<u32> => uint32_opt,
        Vec<u32> => uint32s,
        u16 => uint16,
        Option<u16> => uint16_opt,
        Vec<u16> => uint16s,
        u8 => uint8,
        Option<u8> => uint8_opt,
        Vec<u8> => |k, b: Vec<u8>| binary(k, b),
        &'static [u8] => |k, b: &'static [u8]| binary(k, b),

        Uintptr => |k, p: Uintptr| uintptr(k, p.0),
        Option<Uintptr> => |k, p: Option<Uintptr>| uintptr_opt(k, p.map(|p| p.0)),
        Vec<Uintptr> => |k, ps: Vec<Uintptr>| uintptrs(k, ps.into_iter().map(|p| p.0).collect::<Vec<_>>()),

        DateTime<Utc> => time,
        Option<DateTime<Utc>> => time_opt,
        Vec<DateTime<Utc>> => times,
        SystemTime => |k, t: SystemTime| time(k, DateTime::<Utc>::from(t)),
        Option<SystemTime> => |k, t: Option<SystemTime>| time_opt(k, t.map(DateTime::<Utc>::from)),

        chrono::Duration => duration,
        Option<chrono::Duration> => duration_opt,
        Vec<chrono::Duration> => durations,
        std::time::Duration => |k, d| duration(k, std_duration(d)),
        Option<std::time::Duration> => |k, d: Option<std::time::Duration>| duration_opt(k, d.map(std_duration)),
        Vec<std::time::Duration> => |k, ds: Vec<std::time::Duration>| durations(k, ds.into_iter().map(std_duration).collect::<Vec<_>>()),

        SharedError => |k, e: SharedError| shared_error(k, e),
        Box<dyn StdError + Send + Sync> => |k, e: Box<dyn StdError + Send + Sync>| named_error(k, e),
        std::io::Error => |k, e: std::io::Error| named_error(k, e),

        Stringer => |k, s: Stringer| Field::new(k, super::FieldValue::Stringer(s)),

        serde_json::Value => |k, v: serde_json::Value| reflect_json(k, v),
    }

    reflect_with(key, Arc::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldKind, FieldValue};
    use std::io;

    #[test]
    fn test_scalars_pick_their_kind() {
        assert_eq!(any("k", true).kind(), FieldKind::Bool);
        assert_eq!(any("k", Complex::new(1.0_f64, 1.0)).kind(), FieldKind::Complex128);
        assert_eq!(any("k", Complex::new(1.0_f32, 1.0)).kind(), FieldKind::Complex64);
        assert_eq!(any("k", 1.0_f64).kind(), FieldKind::Float64);
        assert_eq!(any("k", 1.0_f32).kind(), FieldKind::Float32);
        assert_eq!(any("k", 1_isize).kind(), FieldKind::Int);
        assert_eq!(any("k", 1_i64).kind(), FieldKind::Int64);
        assert_eq!(any("k", 1_i32).kind(), FieldKind::Int32);
        assert_eq!(any("k", 1_i16).kind(), FieldKind::Int16);
        assert_eq!(any("k", 1_i8).kind(), FieldKind::Int8);
        assert_eq!(any("k", "text").kind(), FieldKind::String);
        assert_eq!(any("k", String::from("text")).kind(), FieldKind::String);
        assert_eq!(any("k", 1_usize).kind(), FieldKind::Uint);
        assert_eq!(any("k", 1_u64).kind(), FieldKind::Uint64);
        assert_eq!(any("k", 1_u32).kind(), FieldKind::Uint32);
        assert_eq!(any("k", 1_u16).kind(), FieldKind::Uint16);
        assert_eq!(any("k", 1_u8).kind(), FieldKind::Uint8);
        assert_eq!(any("k", Uintptr(8)).kind(), FieldKind::Uintptr);
        assert_eq!(any("k", Utc::now()).kind(), FieldKind::Time);
        assert_eq!(any("k", SystemTime::now()).kind(), FieldKind::Time);
        assert_eq!(any("k", chrono::Duration::seconds(3)).kind(), FieldKind::Duration);
        assert_eq!(any("k", std::time::Duration::from_millis(3)).kind(), FieldKind::Duration);
    }

    #[test]
    fn test_slices_and_options_share_the_scalar_tier() {
        assert_eq!(any("k", vec![true]).kind(), FieldKind::Bools);
        assert_eq!(any("k", vec![1_i64]).kind(), FieldKind::Int64s);
        assert_eq!(any("k", vec![1_u16]).kind(), FieldKind::Uint16s);
        assert_eq!(any("k", vec!["a"]).kind(), FieldKind::Strings);
        assert_eq!(any("k", Some(2_u32)).kind(), FieldKind::Uint32);
        assert!(any("k", None::<u32>).value().is_null());
        assert!(any("k", None::<String>).value().is_null());
    }

    #[test]
    fn test_byte_vectors_are_binary() {
        let field = any("k", vec![1_u8, 2, 3]);
        assert_eq!(field.kind(), FieldKind::Binary);
        assert_ne!(field.kind(), FieldKind::Uint8s);

        let field = any("k", &b"raw"[..]);
        assert_eq!(field.kind(), FieldKind::Binary);
    }

    #[test]
    fn test_chars_are_integers() {
        match any("k", 'a').value() {
            FieldValue::Int32(v) => assert_eq!(*v, 97),
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_error_wins_over_stringer() {
        let shared: SharedError = Arc::new(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(any("k", shared).kind(), FieldKind::Error);

        let boxed: Box<dyn StdError + Send + Sync> = "boxed".into();
        assert_eq!(any("k", boxed).kind(), FieldKind::Error);

        assert_eq!(any("k", io::Error::new(io::ErrorKind::Other, "io")).kind(), FieldKind::Error);

        let display: Arc<dyn fmt::Display + Send + Sync> = Arc::new(42);
        assert_eq!(any("k", Stringer::from_arc(display)).kind(), FieldKind::Stringer);
        assert_eq!(any("k", Stringer::new("s")).kind(), FieldKind::Stringer);
    }

    #[test]
    fn test_fallback_is_reflection() {
        #[derive(Debug)]
        struct Custom {
            id: u32,
        }

        let field = any("k", Custom { id: 7 });
        assert_eq!(field.kind(), FieldKind::Reflect);
        match field.value() {
            FieldValue::Reflect(Some(value)) => {
                assert_eq!(value.encode().unwrap(), serde_json::json!("Custom { id: 7 }"));
            }
            other => panic!("unexpected value {:?}", other),
        }

        let field = any("k", serde_json::json!({"a": 1}));
        match field.value() {
            FieldValue::Reflect(Some(value)) => {
                assert_eq!(value.encode().unwrap(), serde_json::json!({"a": 1}));
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_untyped_accessors() {
        let mut value = Untyped::new(String::from("key"));
        assert_eq!(value.as_str(), Some("key"));
        assert!(value.downcast_ref::<i32>().is_none());
        assert_eq!(value.take::<String>(), Some("key".to_string()));
        assert!(value.take::<String>().is_none());

        assert_eq!(Untyped::new("static").as_str(), Some("static"));
        assert_eq!(format!("{:?}", Untyped::new(5)), "5");
    }
}
