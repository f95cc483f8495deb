use std::sync::atomic::{AtomicUsize, Ordering};

use similar_asserts::assert_eq;

use ministache::value::Value;
use ministache::{context, render, Engine, ErrorKind};

#[test]
fn test_interpolation_lambda() {
    let lambda = Value::from_lambda(|_: &str| "world".to_string());
    assert_eq!(render!("Hello, {{lambda}}!", lambda), "Hello, world!");
}

#[test]
fn test_interpolation_lambda_result_is_parsed() {
    let lambda = Value::from_lambda(|_: &str| "{{planet}}".to_string());
    assert_eq!(
        render!("Hello, {{lambda}}!", lambda, planet => "world"),
        "Hello, world!"
    );
}

#[test]
fn test_interpolation_lambda_uses_default_delimiters() {
    // the lambda result always parses with `{{` `}}`, even though the
    // template switched delimiters before the tag
    let lambda = Value::from_lambda(|_: &str| "|planet| => {{planet}}".to_string());
    assert_eq!(
        render!("{{= | | =}}\nHello, (|&lambda|)!", lambda, planet => "world"),
        "Hello, (|planet| => world)!"
    );
}

#[test]
fn test_interpolation_lambda_is_called_each_time() {
    let calls = AtomicUsize::new(0);
    let lambda = Value::from_lambda(move |_: &str| {
        (calls.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    });
    assert_eq!(
        render!("{{lambda}} == {{{lambda}}} == {{lambda}}", lambda),
        "1 == 2 == 3"
    );
}

#[test]
fn test_escaping_applies_to_expanded_result() {
    let lambda = Value::from_lambda(|_: &str| ">".to_string());
    assert_eq!(render!("<{{lambda}}{{{lambda}}}", lambda), "<&gt;>");
}

#[test]
fn test_section_lambda_receives_raw_body() {
    let lambda = Value::from_lambda(|text: &str| {
        if text == "{{x}}" { "yes" } else { "no" }.to_string()
    });
    assert_eq!(render!("<{{#lambda}}{{x}}{{/lambda}}>", lambda), "<yes>");
}

#[test]
fn test_section_lambda_result_is_parsed() {
    let lambda = Value::from_lambda(|text: &str| format!("{text}{{{{planet}}}}{text}"));
    assert_eq!(
        render!("<{{#lambda}}-{{/lambda}}>", lambda, planet => "Earth"),
        "<-Earth->"
    );
}

#[test]
fn test_section_lambda_is_called_per_section() {
    let lambda = Value::from_lambda(|text: &str| format!("__{text}__"));
    assert_eq!(
        render!("{{#lambda}}FILE{{/lambda}} != {{#lambda}}LINE{{/lambda}}", lambda),
        "__FILE__ != __LINE__"
    );
}

#[test]
fn test_section_lambda_uses_current_delimiters() {
    // a section lambda's result parses with the delimiters that were
    // active at the opening tag
    let lambda = Value::from_lambda(|text: &str| format!("{text}{{{{planet}}}} => |planet|{text}"));
    assert_eq!(
        render!("{{= | | =}}<|#lambda|-|/lambda|>", lambda, planet => "Earth"),
        "<-{{planet}} => Earth->"
    );
}

#[test]
fn test_section_lambda_body_is_verbatim() {
    // standalone trimming affects the rendered body, not the text the
    // lambda receives
    let lambda = Value::from_lambda(|text: &str| {
        assert_eq!(text, "\n  body\n");
        text.to_uppercase()
    });
    assert_eq!(
        render!("{{#lambda}}\n  body\n{{/lambda}}", lambda),
        "\n  BODY\n"
    );
}

#[test]
fn test_lambda_recursion_guard() {
    let engine = Engine::new();
    let lambda = Value::from_lambda(|_: &str| "{{#lambda}}x{{/lambda}}".to_string());
    let err = engine
        .render_str("{{#lambda}}x{{/lambda}}", context!(lambda))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RecursionLimitExceeded);
}
