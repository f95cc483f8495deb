use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::value::{value_map_with_capacity, Value, ValueRepr};

impl From<ValueRepr> for Value {
    #[inline(always)]
    fn from(val: ValueRepr) -> Value {
        Value(val)
    }
}

impl<'a> From<&'a str> for Value {
    #[inline(always)]
    fn from(val: &'a str) -> Self {
        ValueRepr::String(Arc::from(val)).into()
    }
}

impl From<String> for Value {
    #[inline(always)]
    fn from(val: String) -> Self {
        ValueRepr::String(Arc::from(val)).into()
    }
}

impl From<Arc<str>> for Value {
    fn from(val: Arc<str>) -> Self {
        ValueRepr::String(val).into()
    }
}

impl<'a> From<Cow<'a, str>> for Value {
    fn from(val: Cow<'a, str>) -> Self {
        match val {
            Cow::Borrowed(val) => val.into(),
            Cow::Owned(val) => val.into(),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        ValueRepr::Null.into()
    }
}

impl From<char> for Value {
    fn from(val: char) -> Self {
        Value::from(val.to_string())
    }
}

impl<V: Into<Value>> FromIterator<V> for Value {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        ValueRepr::List(Arc::new(iter.into_iter().map(Into::into).collect())).into()
    }
}

impl<K: Into<Arc<str>>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut rv = value_map_with_capacity(iter.size_hint().0);
        for (key, value) in iter {
            rv.insert(key.into(), value.into());
        }
        ValueRepr::Map(Arc::new(rv)).into()
    }
}

impl<K: Into<Arc<str>>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(val: BTreeMap<K, V>) -> Self {
        val.into_iter().collect()
    }
}

impl<K: Into<Arc<str>>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(val: HashMap<K, V>) -> Self {
        val.into_iter().collect()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(val: Vec<T>) -> Self {
        val.into_iter().collect()
    }
}

macro_rules! value_from {
    ($src:ty, $dst:ident) => {
        impl From<$src> for Value {
            #[inline(always)]
            fn from(val: $src) -> Self {
                ValueRepr::$dst(val as _).into()
            }
        }
    };
}

value_from!(bool, Bool);
value_from!(u8, U64);
value_from!(u16, U64);
value_from!(u32, U64);
value_from!(u64, U64);
value_from!(usize, U64);
value_from!(i8, I64);
value_from!(i16, I64);
value_from!(i32, I64);
value_from!(i64, I64);
value_from!(isize, I64);
value_from!(f32, F64);
value_from!(f64, F64);

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn test_collections() {
        let list = Value::from(vec!["a", "b"]);
        assert_eq!(list.get_item_by_index(1), Some(Value::from("b")));

        let map: Value = [("one", 1), ("two", 2)].into_iter().collect();
        assert_eq!(map.get_attr("two"), Some(Value::from(2)));

        let map = Value::from(BTreeMap::from([("key", "value")]));
        assert_eq!(map.get_attr("key"), Some(Value::from("value")));
    }

    #[test]
    fn test_option_via_serde() {
        assert!(Value::from_serialize(&None::<i32>).is_null());
        assert_eq!(Value::from_serialize(&Some(1)), Value::from(1));
    }
}
