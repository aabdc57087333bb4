//! Typed field model
//!
//! A [`Field`] is a key plus a [`FieldValue`], a closed tagged union whose tag
//! is exposed as [`FieldKind`]. Constructors live at the module root:
//!
//! ```
//! use structured_logger::fields;
//!
//! let request = vec![
//!     fields::string("method", "GET"),
//!     fields::uint16("status", 200),
//!     fields::duration("elapsed", chrono::Duration::milliseconds(12)),
//!     fields::err_opt(None::<std::io::Error>),
//!     fields::any("attempt", 3_i32),
//! ];
//! assert!(request[3].is_skip());
//! ```

pub mod any;
pub mod constructors;
pub mod kind;
pub mod stack;
pub mod value;

pub use any::{any, Untyped};
pub use constructors::*;
pub use kind::FieldKind;
pub use stack::MAX_STACK_FRAMES;
pub use value::{Complex, Field, FieldValue, Reflect, Serialized, SharedError, Stringer, Uintptr};
