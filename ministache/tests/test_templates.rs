use serde::Serialize;
use similar_asserts::assert_eq;

use ministache::value::Value;
use ministache::{context, render, Engine};

#[test]
fn test_interpolation() {
    assert_eq!(
        render!("Hello {{name}}!", name => "World"),
        "Hello World!"
    );
    assert_eq!(render!("Hello {{missing}}!"), "Hello !");
    assert_eq!(
        render!("\"{{mph}} miles an hour!\"", mph => 85),
        "\"85 miles an hour!\""
    );
}

#[test]
fn test_escaping() {
    let forbidden = "& \" < >";
    assert_eq!(
        render!("escaped: {{forbidden}}", forbidden),
        "escaped: &amp; &quot; &lt; &gt;"
    );
    assert_eq!(
        render!("verbatim: {{{forbidden}}}", forbidden),
        "verbatim: & \" < >"
    );
    assert_eq!(
        render!("verbatim: {{&forbidden}}", forbidden),
        "verbatim: & \" < >"
    );
    assert_eq!(
        render!("{{markup}}", markup => "<b>'quoted'</b>"),
        "&lt;b&gt;&#x27;quoted&#x27;&lt;/b&gt;"
    );
}

#[test]
fn test_number_display() {
    // floats render the way serde_json prints them, without a forced
    // fraction on round numbers
    assert_eq!(
        render!("{{a}} {{b}} {{c}}", a => 3.0, b => 1.21, c => -1),
        "3 1.21 -1"
    );
}

#[test]
fn test_null_and_bool_display() {
    assert_eq!(
        render!("I ({{cannot}}) be seen!", cannot => Option::<String>::None),
        "I () be seen!"
    );
    assert_eq!(render!("{{x}}", x => false), "false");
    assert_eq!(render!("{{x}}", x => true), "true");
}

#[test]
fn test_section_truthiness() {
    assert_eq!(render!("{{#t}}yes{{/t}}{{^t}}no{{/t}}", t => true), "yes");
    assert_eq!(render!("{{#t}}yes{{/t}}{{^t}}no{{/t}}", t => false), "no");
    assert_eq!(render!("{{#s}}yes{{/s}}{{^s}}no{{/s}}", s => ""), "no");
    assert_eq!(render!("{{#s}}yes{{/s}}{{^s}}no{{/s}}", s => "x"), "yes");
    assert_eq!(
        render!("{{#l}}yes{{/l}}{{^l}}no{{/l}}", l => Vec::<u32>::new()),
        "no"
    );
    assert_eq!(
        render!("{{#n}}yes{{/n}}{{^n}}no{{/n}}", n => Option::<u32>::None),
        "no"
    );
    // all numbers are truthy, zero included
    assert_eq!(render!("{{#n}}yes{{/n}}{{^n}}no{{/n}}", n => 0), "yes");
    // an absent name skips the section silently
    assert_eq!(render!("[{{#missing}}boom{{/missing}}]"), "[]");
}

#[test]
fn test_section_iteration() {
    assert_eq!(
        render!("{{#items}}({{.}}){{/items}}", items => vec![1, 2, 3]),
        "(1)(2)(3)"
    );
    assert_eq!(
        render!("{{#items}}* {{name}}\n{{/items}}", items => vec![
            context!(name => "a"),
            context!(name => "b"),
        ]),
        "* a\n* b\n"
    );
}

#[test]
fn test_section_pushes_context() {
    assert_eq!(
        render!(
            "{{#person}}{{name}} lives in {{city}}{{/person}}",
            person => context!(name => "Peter", city => "Berlin")
        ),
        "Peter lives in Berlin"
    );
    // the innermost frame containing the name wins
    assert_eq!(
        render!(
            "{{#inner}}{{a}}{{b}}{{/inner}}",
            a => "outer-a",
            b => "outer-b",
            inner => context!(b => "inner-b")
        ),
        "outer-ainner-b"
    );
}

#[test]
fn test_section_scalar_keeps_stack() {
    // a truthy scalar renders the body against the unchanged stack
    assert_eq!(
        render!("{{#flag}}{{name}}{{/flag}}", flag => true, name => "Rust"),
        "Rust"
    );
}

#[test]
fn test_inverted_section_keeps_stack() {
    assert_eq!(
        render!("{{^missing}}{{name}}{{/missing}}", name => "Rust"),
        "Rust"
    );
}

#[test]
fn test_inverted_section_never_calls_lambdas() {
    let lambda = Value::from_lambda(|_: &str| "boom".to_string());
    assert_eq!(render!("<{{^lambda}}static{{/lambda}}>", lambda), "<>");
}

#[test]
fn test_dotted_names() {
    assert_eq!(
        render!(
            "\"{{person.name}}\" == \"{{#person}}{{name}}{{/person}}\"",
            person => context!(name => "Joe")
        ),
        "\"Joe\" == \"Joe\""
    );
    assert_eq!(
        render!(
            "{{a.b.c}}",
            a => context!(b => context!(c => "deep"))
        ),
        "deep"
    );
    assert_eq!(
        render!("{{#a.b.c}}Here{{/a.b.c}}", a => context!(b => context!(c => true))),
        "Here"
    );
    // a numeric segment indexes into lists
    assert_eq!(
        render!("{{items.1}}", items => vec!["zero", "one"]),
        "one"
    );
}

#[test]
fn test_dotted_names_do_not_fall_back() {
    // once the first segment resolved, the remaining segments must
    // resolve inside that value; outer frames are no longer consulted
    assert_eq!(
        render!(
            "{{#a}}{{b.c}}{{/a}}",
            a => context!(b => context!()),
            b => context!(c => "ERROR")
        ),
        ""
    );
}

#[test]
fn test_standalone_section_lines() {
    assert_eq!(
        render!("Begin.\n{{#x}}\nHi\n{{/x}}\nEnd.", x => true),
        "Begin.\nHi\nEnd."
    );
    assert_eq!(
        render!(" {{#x}}\nHi\n {{/x}}\n", x => true),
        "Hi\n"
    );
}

#[test]
fn test_inline_sections_keep_whitespace() {
    assert_eq!(
        render!(" | {{#t}}\t|\t{{/t}} | \n", t => true),
        " | \t|\t | \n"
    );
}

#[test]
fn test_standalone_crlf_line_endings() {
    assert_eq!(
        render!("|\r\n{{#t}}\r\n{{/t}}\r\n|", t => true),
        "|\r\n|"
    );
    assert_eq!(render!("|\r\n{{! comment }}\r\n|"), "|\r\n|");
}

#[test]
fn test_standalone_at_input_edges() {
    // the start and the end of input both count as line boundaries
    assert_eq!(
        render!("  {{#t}}\n#{{/t}}\n/", t => true),
        "#\n/"
    );
    assert_eq!(
        render!("#{{#t}}\n/\n  {{/t}}", t => true),
        "#\n/\n"
    );
}

#[test]
fn test_variables_are_never_standalone() {
    assert_eq!(render!("  {{string}}\n", string => "---"), "  ---\n");
}

#[test]
fn test_two_tags_on_one_line_are_not_standalone() {
    assert_eq!(
        render!(" {{#a}}x{{/a}}\ny", a => true),
        " x\ny"
    );
}

#[test]
fn test_comments() {
    assert_eq!(render!("12345{{! Comment Block! }}67890"), "1234567890");
    assert_eq!(render!("Begin.\n{{! Comment Block! }}\nEnd."), "Begin.\nEnd.");
    assert_eq!(
        render!("Begin.\n  {{! Indented Comment }}\nEnd."),
        "Begin.\nEnd."
    );
    assert_eq!(
        render!("Begin.\n{{!\nSomething's going on here...\n}}\nEnd."),
        "Begin.\nEnd."
    );
}

#[test]
fn test_delimiter_change() {
    assert_eq!(
        render!("{{=<% %>=}}(<%text%>)", text => "Hey!"),
        "(Hey!)"
    );
    // tags in the old style become plain text after the swap
    assert_eq!(render!("{{=<% %>=}}<%x%>{{x}}", x => "ok"), "ok{{x}}");
    // and a second swap brings them back
    assert_eq!(
        render!("{{=<% %>=}}<%text%><%={{ }}=%>{{text}}", text => "Hey"),
        "HeyHey"
    );
    assert_eq!(
        render!("{{=<% %>=}}<%#t%>yes<%/t%>", t => true),
        "yes"
    );
}

#[test]
fn test_standalone_delimiter_change() {
    assert_eq!(render!("Begin.\n{{=@ @=}}\nEnd."), "Begin.\nEnd.");
}

#[test]
fn test_template_reuse() {
    let engine = Engine::new();
    let tmpl = engine.template_from_str("Hello {{name}}!").unwrap();
    assert_eq!(tmpl.render(context!(name => "A")).unwrap(), "Hello A!");
    assert_eq!(tmpl.render(context!(name => "B")).unwrap(), "Hello B!");
    assert_eq!(tmpl.name(), "<string>");
    assert_eq!(tmpl.source(), "Hello {{name}}!");
}

#[test]
fn test_derived_struct_context() {
    #[derive(Serialize)]
    struct Repo {
        name: String,
        stars: u32,
    }

    let repos = vec![
        Repo {
            name: "one".into(),
            stars: 100,
        },
        Repo {
            name: "two".into(),
            stars: 5,
        },
    ];
    assert_eq!(
        render!("{{#repos}}{{name}}: {{stars}}\n{{/repos}}", repos),
        "one: 100\ntwo: 5\n"
    );
}

#[test]
fn test_empty_template() {
    assert_eq!(render!(""), "");
}
