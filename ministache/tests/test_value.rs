use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use similar_asserts::assert_eq;

use ministache::value::{serializing_for_value, Value, ValueKind};
use ministache::{context, Engine};

#[test]
fn test_conversions() {
    assert_eq!(Value::from('x'), Value::from("x"));
    assert!(Value::from(()).is_null());
    assert_eq!(Value::from(42u8), Value::from(42i64));
    assert_eq!(
        Value::from(std::borrow::Cow::Borrowed("borrowed")),
        Value::from("borrowed")
    );
}

#[test]
fn test_kind() {
    assert_eq!(Value::NULL.kind(), ValueKind::Null);
    assert_eq!(Value::from(true).kind(), ValueKind::Bool);
    assert_eq!(Value::from(1.5).kind(), ValueKind::Number);
    assert_eq!(Value::from("x").kind(), ValueKind::String);
    assert_eq!(Value::from(vec![1]).kind(), ValueKind::List);
    assert_eq!(context!(x => 1).kind(), ValueKind::Map);
    assert_eq!(
        Value::from_lambda(|_: &str| String::new()).kind(),
        ValueKind::Lambda
    );
    assert_eq!(ValueKind::Lambda.to_string(), "lambda");
}

#[test]
fn test_debug_repr() {
    let values = vec![
        Value::NULL,
        Value::from(true),
        Value::from(42),
        Value::from(1.5),
        Value::from("text"),
        Value::from_lambda(|_: &str| String::new()),
    ];
    insta::assert_debug_snapshot!(&values, @r###"
    [
        null,
        true,
        42,
        1.5,
        "text",
        <lambda>,
    ]
    "###);
}

#[test]
fn test_from_serialize_struct() {
    #[derive(Serialize)]
    struct Post {
        title: &'static str,
        tags: Vec<&'static str>,
        draft: bool,
    }

    let post = Value::from_serialize(&Post {
        title: "Hello",
        tags: vec!["a", "b"],
        draft: false,
    });
    assert_eq!(post.kind(), ValueKind::Map);
    assert_eq!(post.get_attr("title"), Some(Value::from("Hello")));
    assert_eq!(
        post.get_attr("tags").unwrap().get_item_by_index(1),
        Some(Value::from("b"))
    );
    assert_eq!(post.get_attr("draft"), Some(Value::from(false)));
    assert_eq!(post.get_attr("missing"), None);
}

#[test]
fn test_from_serialize_enum() {
    #[derive(Serialize)]
    enum Shape {
        Unit,
        Newtype(u32),
        Struct { x: u32 },
    }

    assert_eq!(Value::from_serialize(&Shape::Unit), Value::from("Unit"));
    let newtype = Value::from_serialize(&Shape::Newtype(42));
    assert_eq!(newtype.get_attr("Newtype"), Some(Value::from(42)));
    let strukt = Value::from_serialize(&Shape::Struct { x: 1 });
    assert_eq!(
        strukt.get_attr("Struct").unwrap().get_attr("x"),
        Some(Value::from(1))
    );
}

#[test]
fn test_lambda_roundtrip() {
    // a lambda passed through serde must come out callable again
    let bold = Value::from_lambda(|text: &str| format!("<b>{text}</b>"));
    let roundtripped = Value::from_serialize(&bold);
    assert_eq!(roundtripped.kind(), ValueKind::Lambda);

    #[derive(Serialize)]
    struct Ctx {
        name: &'static str,
        bold: Value,
    }

    let rv = Engine::new()
        .render_str("{{#bold}}{{name}}{{/bold}}", Ctx { name: "John", bold })
        .unwrap();
    assert_eq!(rv, "<b>John</b>");
}

#[test]
fn test_value_serialization() {
    // make sure if we serialize to json we get regular values
    assert_eq!(serde_json::to_string(&Value::NULL).unwrap(), "null");
    assert_eq!(
        serde_json::to_string(&Value::from_lambda(|_: &str| String::new())).unwrap(),
        "null"
    );
    assert_eq!(
        serde_json::to_string(&Value::from("foo")).unwrap(),
        "\"foo\""
    );
    assert_eq!(
        serde_json::to_string(&Value::from(vec![1, 2, 3])).unwrap(),
        "[1,2,3]"
    );
    assert_eq!(
        serde_json::to_string(&context!(a => 1)).unwrap(),
        "{\"a\":1}"
    );
}

#[test]
fn test_serializing_for_value() {
    struct Probe;

    impl Serialize for Probe {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bool(serializing_for_value())
        }
    }

    assert!(!serializing_for_value());
    assert_eq!(Value::from_serialize(&Probe), Value::from(true));
    assert_eq!(serde_json::to_string(&Probe).unwrap(), "false");
}

#[test]
fn test_map_key_stringification() {
    let map = Value::from_serialize(&BTreeMap::from([(1, "one"), (2, "two")]));
    assert_eq!(map.get_attr("2"), Some(Value::from("two")));

    let rv = Engine::new().render_str("{{map.1}}", context!(map)).unwrap();
    assert_eq!(rv, "one");
}

#[test]
fn test_non_string_keys_are_dropped() {
    let map = Value::from_serialize(&BTreeMap::from([((1, 2), "x")]));
    assert_eq!(map.kind(), ValueKind::Map);
    assert_eq!(map.to_string(), "{}");
}

#[test]
fn test_wide_integers() {
    assert_eq!(Value::from_serialize(&42i128), Value::from(42));
    assert_eq!(Value::from_serialize(&u64::MAX), Value::from(u64::MAX));
    assert_eq!(Value::from_serialize(&u128::MAX).kind(), ValueKind::Number);
}

#[test]
fn test_bytes_become_strings() {
    struct Raw(&'static [u8]);

    impl Serialize for Raw {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.0)
        }
    }

    assert_eq!(Value::from_serialize(&Raw(b"hello")), Value::from("hello"));
}
