//! Request-scoped values handed to dynamic field providers
//!
//! A `Context` is an immutable chain of typed values. Deriving a child never
//! touches the parent, and looking up a type returns the value closest to the
//! leaf, so an inner scope can shadow an outer one.
//!
//! ```
//! use structured_logger::Context;
//!
//! #[derive(Debug, PartialEq)]
//! struct RequestId(String);
//!
//! let root = Context::background();
//! let request = root.with_value(RequestId("req-42".into()));
//!
//! assert_eq!(request.value::<RequestId>(), Some(&RequestId("req-42".into())));
//! assert!(root.value::<RequestId>().is_none());
//! ```

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

struct Node {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
    parent: Option<Arc<Node>>,
}

#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// The empty root context
    pub fn background() -> Self {
        Self { head: None }
    }

    /// Derive a child carrying `value`
    #[must_use]
    pub fn with_value<T>(&self, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            head: Some(Arc::new(Node {
                value: Box::new(value),
                type_name: type_name::<T>(),
                parent: self.head.clone(),
            })),
        }
    }

    /// The innermost value of type `T`
    pub fn value<T: Any>(&self) -> Option<&T> {
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            if let Some(value) = current.value.downcast_ref::<T>() {
                return Some(value);
            }
            node = current.parent.as_deref();
        }
        None
    }

    pub fn is_background(&self) -> bool {
        self.head.is_none()
    }

    fn type_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            names.push(current.type_name);
            node = current.parent.as_deref();
        }
        names
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.type_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct TraceId(u64);

    #[derive(Debug, PartialEq)]
    struct User(&'static str);

    #[test]
    fn test_background_is_empty() {
        let ctx = Context::background();
        assert!(ctx.is_background());
        assert!(ctx.value::<TraceId>().is_none());
    }

    #[test]
    fn test_innermost_value_wins() {
        let outer = Context::background().with_value(TraceId(1)).with_value(User("ana"));
        let inner = outer.with_value(TraceId(2));

        assert_eq!(inner.value::<TraceId>(), Some(&TraceId(2)));
        assert_eq!(inner.value::<User>(), Some(&User("ana")));
        assert_eq!(outer.value::<TraceId>(), Some(&TraceId(1)));
    }

    #[test]
    fn test_clone_is_shared_and_sendable() {
        let ctx = Context::background().with_value(TraceId(9));
        let moved = ctx.clone();
        let seen = std::thread::spawn(move || moved.value::<TraceId>().map(|t| t.0))
            .join()
            .unwrap();
        assert_eq!(seen, Some(9));
    }

    #[test]
    fn test_debug_lists_types() {
        let ctx = Context::background().with_value(TraceId(1));
        assert!(format!("{:?}", ctx).contains("TraceId"));
    }
}
