//! Provides a dynamic value type abstraction.
//!
//! This module gives access to the dynamically typed [`Value`] which
//! templates consume during rendering.  The context passed to a render
//! call is a value, section iteration walks over values and lambdas are
//! values too.
//!
//! # Converting Data
//!
//! Values are typically created indirectly: everything passed to
//! [`render`](crate::Template::render) or collected with the
//! [`context!`](crate::context) macro goes through [serde] and comes out
//! the other end as a [`Value`].  Direct construction is possible as well
//! through a range of `From` implementations and [`Value::from_serialize`]:
//!
//! ```
//! use ministache::value::Value;
//!
//! let plain = Value::from("hello");
//! let nested = Value::from_serialize(&vec![1, 2, 3]);
//! ```
//!
//! # Lambdas
//!
//! Mustache lambdas are values created with [`Value::from_lambda`].  In
//! section position the callable receives the raw text between the
//! section tags; in interpolation position it receives an empty string.
//! Whatever it returns is treated as template source and rendered against
//! the current context:
//!
//! ```
//! use ministache::value::Value;
//!
//! let wrapped = Value::from_lambda(|text: &str| format!("<b>{text}</b>"));
//! ```
use std::fmt;
use std::sync::Arc;

mod argtypes;
mod serialize;

pub use crate::value::serialize::serializing_for_value;

#[cfg(feature = "preserve_order")]
pub(crate) type ValueMap = indexmap::IndexMap<Arc<str>, Value>;

#[cfg(not(feature = "preserve_order"))]
pub(crate) type ValueMap = std::collections::BTreeMap<Arc<str>, Value>;

#[inline(always)]
pub(crate) fn value_map_with_capacity(capacity: usize) -> ValueMap {
    #[cfg(not(feature = "preserve_order"))]
    {
        let _ = capacity;
        ValueMap::new()
    }
    #[cfg(feature = "preserve_order")]
    {
        ValueMap::with_capacity(crate::utils::untrusted_size_hint(capacity))
    }
}

/// Describes the kind of value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[non_exhaustive]
pub enum ValueKind {
    /// The value is null.
    Null,
    /// The value is a [`bool`].
    Bool,
    /// The value is a number of a supported type.
    Number,
    /// The value is a string.
    String,
    /// The value is a list of other values.
    List,
    /// The value is a key/value mapping.
    Map,
    /// The value is a callable lambda.
    Lambda,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Lambda => "lambda",
        })
    }
}

#[derive(Clone)]
pub(crate) enum ValueRepr {
    Null,
    Bool(bool),
    U64(u64),
    I64(i64),
    F64(f64),
    String(Arc<str>),
    List(Arc<Vec<Value>>),
    Map(Arc<ValueMap>),
    Lambda(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl fmt::Debug for ValueRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRepr::Null => f.write_str("null"),
            ValueRepr::Bool(val) => fmt::Debug::fmt(val, f),
            ValueRepr::U64(val) => fmt::Debug::fmt(val, f),
            ValueRepr::I64(val) => fmt::Debug::fmt(val, f),
            ValueRepr::F64(val) => fmt::Debug::fmt(val, f),
            ValueRepr::String(val) => fmt::Debug::fmt(val, f),
            ValueRepr::List(val) => fmt::Debug::fmt(val, f),
            ValueRepr::Map(val) => fmt::Debug::fmt(val, f),
            ValueRepr::Lambda(_) => f.write_str("<lambda>"),
        }
    }
}

/// Represents a dynamically typed value in the template engine.
#[derive(Clone)]
pub struct Value(pub(crate) ValueRepr);

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl Default for Value {
    fn default() -> Value {
        Value(ValueRepr::Null)
    }
}

enum CoerceResult {
    I128(i128, i128),
    F64(f64, f64),
}

fn coerce(a: &ValueRepr, b: &ValueRepr) -> Option<CoerceResult> {
    Some(match (a, b) {
        (ValueRepr::U64(a), ValueRepr::U64(b)) => CoerceResult::I128(*a as i128, *b as i128),
        (ValueRepr::U64(a), ValueRepr::I64(b)) => CoerceResult::I128(*a as i128, *b as i128),
        (ValueRepr::I64(a), ValueRepr::U64(b)) => CoerceResult::I128(*a as i128, *b as i128),
        (ValueRepr::I64(a), ValueRepr::I64(b)) => CoerceResult::I128(*a as i128, *b as i128),
        (ValueRepr::F64(a), ValueRepr::F64(b)) => CoerceResult::F64(*a, *b),
        (ValueRepr::F64(a), ValueRepr::U64(b)) => CoerceResult::F64(*a, *b as f64),
        (ValueRepr::F64(a), ValueRepr::I64(b)) => CoerceResult::F64(*a, *b as f64),
        (ValueRepr::U64(a), ValueRepr::F64(b)) => CoerceResult::F64(*a as f64, *b),
        (ValueRepr::I64(a), ValueRepr::F64(b)) => CoerceResult::F64(*a as f64, *b),
        _ => return None,
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (ValueRepr::Null, ValueRepr::Null) => true,
            (ValueRepr::Bool(a), ValueRepr::Bool(b)) => a == b,
            (ValueRepr::String(a), ValueRepr::String(b)) => a == b,
            (ValueRepr::List(a), ValueRepr::List(b)) => a == b,
            (ValueRepr::Map(a), ValueRepr::Map(b)) => a == b,
            // lambdas are opaque and never compare equal
            _ => match coerce(&self.0, &other.0) {
                Some(CoerceResult::I128(a, b)) => a == b,
                Some(CoerceResult::F64(a, b)) => a == b,
                None => false,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ValueRepr::Null => Ok(()),
            ValueRepr::Bool(val) => val.fmt(f),
            ValueRepr::U64(val) => val.fmt(f),
            ValueRepr::I64(val) => val.fmt(f),
            ValueRepr::F64(val) => val.fmt(f),
            ValueRepr::String(val) => f.write_str(val),
            ValueRepr::List(items) => {
                ok!(f.write_str("["));
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        ok!(f.write_str(", "));
                    }
                    ok!(write!(f, "{item:?}"));
                }
                f.write_str("]")
            }
            ValueRepr::Map(map) => {
                ok!(f.write_str("{"));
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        ok!(f.write_str(", "));
                    }
                    ok!(write!(f, "{key:?}: {value:?}"));
                }
                f.write_str("}")
            }
            ValueRepr::Lambda(_) => Ok(()),
        }
    }
}

impl Value {
    /// The null value.
    pub const NULL: Value = Value(ValueRepr::Null);

    /// Creates a callable value from a lambda.
    ///
    /// When a section resolves to a lambda the callable is invoked with
    /// the raw, unrendered text between the section tags.  For a variable
    /// tag the input is an empty string.  The returned string is parsed
    /// and rendered against the current context before it is emitted.
    ///
    /// ```
    /// use ministache::{context, Engine};
    /// use ministache::value::Value;
    ///
    /// let engine = Engine::new();
    /// let rv = engine.render_str(
    ///     "{{#shout}}hello {{name}}{{/shout}}",
    ///     context! {
    ///         name => "world",
    ///         shout => Value::from_lambda(|text: &str| format!("{text}!!!")),
    ///     },
    /// ).unwrap();
    /// assert_eq!(rv, "hello world!!!");
    /// ```
    pub fn from_lambda<F>(f: F) -> Value
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Value(ValueRepr::Lambda(Arc::new(f)))
    }

    /// Returns the kind of the value.
    ///
    /// This can be used to determine what kind of value something is in
    /// tests or debug output.
    ///
    /// ```
    /// use ministache::value::{Value, ValueKind};
    /// assert_eq!(Value::from(42).kind(), ValueKind::Number);
    /// assert_eq!(Value::from("a").kind(), ValueKind::String);
    /// ```
    pub fn kind(&self) -> ValueKind {
        match self.0 {
            ValueRepr::Null => ValueKind::Null,
            ValueRepr::Bool(_) => ValueKind::Bool,
            ValueRepr::U64(_) | ValueRepr::I64(_) | ValueRepr::F64(_) => ValueKind::Number,
            ValueRepr::String(_) => ValueKind::String,
            ValueRepr::List(_) => ValueKind::List,
            ValueRepr::Map(_) => ValueKind::Map,
            ValueRepr::Lambda(_) => ValueKind::Lambda,
        }
    }

    /// Returns `true` if the value is truthy in section position.
    ///
    /// Null and `false` are falsy, so are empty strings and empty lists.
    /// Everything else renders a section, including the number zero and
    /// empty maps.
    pub fn is_true(&self) -> bool {
        match &self.0 {
            ValueRepr::Null => false,
            ValueRepr::Bool(val) => *val,
            ValueRepr::U64(_) | ValueRepr::I64(_) | ValueRepr::F64(_) => true,
            ValueRepr::String(val) => !val.is_empty(),
            ValueRepr::List(items) => !items.is_empty(),
            ValueRepr::Map(_) => true,
            ValueRepr::Lambda(_) => true,
        }
    }

    /// Returns `true` if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self.0, ValueRepr::Null)
    }

    /// If the value is a string, returns it.
    pub fn as_str(&self) -> Option<&str> {
        match &self.0 {
            ValueRepr::String(val) => Some(val as &str),
            _ => None,
        }
    }

    /// Looks up a key of a map value.
    ///
    /// Returns `None` if the value is not a map or the key is absent.
    ///
    /// ```
    /// # use ministache::value::Value;
    /// let ctx = Value::from_serialize(&std::collections::BTreeMap::from([("x", 42)]));
    /// assert_eq!(ctx.get_attr("x"), Some(Value::from(42)));
    /// ```
    pub fn get_attr(&self, key: &str) -> Option<Value> {
        match &self.0 {
            ValueRepr::Map(map) => map.get(key).cloned(),
            _ => None,
        }
    }

    /// Looks up an element of a list value by index.
    pub fn get_item_by_index(&self, idx: usize) -> Option<Value> {
        match &self.0 {
            ValueRepr::List(items) => items.get(idx).cloned(),
            _ => None,
        }
    }

    pub(crate) fn as_lambda(&self) -> Option<&(dyn Fn(&str) -> String + Send + Sync)> {
        match &self.0 {
            ValueRepr::Lambda(f) => Some(&**f),
            _ => None,
        }
    }
}
