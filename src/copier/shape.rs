//! Shape classification for copy operands
//!
//! Every type that takes part in a copy reports whether it is a mapping, a
//! record, or something else. Wrappers (`Box`, `Arc`, `&T`, `Option`)
//! delegate to the value they hold, so a `T` and a pointer to `T` always
//! classify the same way.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

/// Base kind of a copy operand, after unwrapping indirection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Key/value container (`HashMap`, `BTreeMap`, JSON object)
    Mapping,
    /// Named fields (user structs registered with [`impl_record!`](crate::impl_record))
    Record,
    /// Primitives, sequences, null
    Other,
}

/// A value the copier can read from or write into
pub trait Copyable: Serialize {
    fn shape(&self) -> Shape;
}

impl<K: Serialize, V: Serialize, S: BuildHasher> Copyable for HashMap<K, V, S> {
    fn shape(&self) -> Shape {
        Shape::Mapping
    }
}

impl<K: Serialize, V: Serialize> Copyable for BTreeMap<K, V> {
    fn shape(&self) -> Shape {
        Shape::Mapping
    }
}

impl Copyable for Map<String, Value> {
    fn shape(&self) -> Shape {
        Shape::Mapping
    }
}

impl Copyable for Value {
    fn shape(&self) -> Shape {
        match self {
            Value::Object(_) => Shape::Mapping,
            _ => Shape::Other,
        }
    }
}

impl<T: Copyable + ?Sized> Copyable for &T {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

impl<T: Copyable> Copyable for Box<T> {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

impl<T: Copyable + ?Sized> Copyable for Arc<T> {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

impl<T: Copyable> Copyable for Option<T> {
    fn shape(&self) -> Shape {
        match self {
            Some(inner) => inner.shape(),
            None => Shape::Other,
        }
    }
}

impl<T: Serialize> Copyable for Vec<T> {
    fn shape(&self) -> Shape {
        Shape::Other
    }
}

impl Copyable for str {
    fn shape(&self) -> Shape {
        Shape::Other
    }
}

macro_rules! impl_other {
    ($($ty:ty),+ $(,)?) => {
        $(impl Copyable for $ty {
            fn shape(&self) -> Shape {
                Shape::Other
            }
        })+
    };
}

impl_other!(
    (),
    bool,
    char,
    String,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
);

/// Register struct types as records so they can be copied.
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize, Default)]
/// struct Person { name: String, age: u32 }
///
/// kitbag::impl_record!(Person);
/// ```
#[macro_export]
macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(impl $crate::copier::Copyable for $ty {
            fn shape(&self) -> $crate::copier::Shape {
                $crate::copier::Shape::Record
            }
        })+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Point {
        x: i32,
    }

    crate::impl_record!(Point);

    #[test]
    fn test_maps_are_mappings() {
        assert_eq!(HashMap::<String, i32>::new().shape(), Shape::Mapping);
        assert_eq!(BTreeMap::<i32, String>::new().shape(), Shape::Mapping);
        assert_eq!(Map::new().shape(), Shape::Mapping);
    }

    #[test]
    fn test_json_value_shape_follows_variant() {
        assert_eq!(json!({"a": 1}).shape(), Shape::Mapping);
        assert_eq!(json!([1, 2]).shape(), Shape::Other);
        assert_eq!(json!(null).shape(), Shape::Other);
    }

    #[test]
    fn test_indirection_does_not_change_shape() {
        let p = Point { x: 1 };
        assert_eq!(p.shape(), Shape::Record);
        assert_eq!((&p).shape(), Shape::Record);
        assert_eq!(Box::new(Point { x: 2 }).shape(), Shape::Record);
        assert_eq!(Arc::new(Point { x: 4 }).shape(), Shape::Record);
        assert_eq!(Some(Point { x: 3 }).shape(), Shape::Record);
        assert_eq!(None::<Point>.shape(), Shape::Other);
    }

    #[test]
    fn test_primitives_are_other() {
        assert_eq!(42i64.shape(), Shape::Other);
        assert_eq!("text".shape(), Shape::Other);
        assert_eq!(vec![1, 2, 3].shape(), Shape::Other);
    }
}
