//! <div align=center>
//!   <p><strong>MiniStache: a logic-less template engine for Rust with minimal dependencies</strong></p>
//! </div>
//!
//! MiniStache is a small dependency template engine for Rust which is based
//! on the syntax and behavior of logic-less
//! [Mustache](https://mustache.github.io/) templates.  It's implemented on
//! top of [`serde`].  Templates contain no expressions and no control flow;
//! every rendering decision is driven by the shape of the data, which keeps
//! templates portable and safe to hand to non-programmers.
//!
//! ```mustache
//! {{#users}}
//!   <li>{{name}}</li>
//! {{/users}}
//! ```
//!
//! # Why MiniStache
//!
//! MiniStache by its name wants to be a good default choice if you need a
//! little bit of logic-less templating with minimal dependencies.  It has
//! the following goals:
//!
//! * Well documented, compact API
//! * Minimal dependencies and reasonable compile times
//! * Stay as close as possible to what other mustache implementations do
//! * Support for all `serde` compatible types
//! * Excellent test coverage
//!
//! # Template Usage
//!
//! To use MiniStache one creates an [`Engine`], optionally registers
//! partials on it, and compiles and renders templates through it.  To pass
//! data one can pass any serde serializable value.  The [`context!`] macro
//! can be used to quickly construct template data:
//!
//! ```
//! use ministache::{Engine, context};
//!
//! let mut engine = Engine::new();
//! engine.add_partial("user", "<li>{{name}}</li>").unwrap();
//! let tmpl = engine
//!     .template_from_str("<ul>{{#users}}{{>user}}{{/users}}</ul>")
//!     .unwrap();
//! let users = vec![context!(name => "John"), context!(name => "Jane")];
//! println!("{}", tmpl.render(context!(users)).unwrap());
//! ```
//!
//! ```plain
//! <ul><li>John</li><li>Jane</li></ul>
//! ```
//!
//! For super trivial cases where you need to render a string once, you can
//! also use the [`render!`] macro which acts a bit like a replacement for
//! the [`format!`] macro.
//!
//! # Lambdas
//!
//! Logic that cannot be expressed as plain data can be attached to the data
//! as a lambda.  A lambda in a section position receives the raw block text
//! and its return value is rendered in the block's place, which is enough
//! for wrapping, highlighting or caching:
//!
//! ```
//! use ministache::{render, value::Value};
//!
//! let rv = render!(
//!     "{{#bold}}Hello {{name}}!{{/bold}}",
//!     name => "World",
//!     bold => Value::from_lambda(|text: &str| format!("<b>{text}</b>"))
//! );
//! assert_eq!(rv, "<b>Hello World!</b>");
//! ```
//!
//! # Learn more
//!
//! - [`Engine`]: the main API entry point.  Teaches you how to configure the engine.
//! - [`Template`]: the template object API.  Shows you how templates can be rendered.
//! - [`syntax`]: provides documentation of the template syntax.
//! - [`value`]: describes the runtime value model templates render against.
//!
//! # Error Handling
//!
//! MiniStache tries to give you good errors out of the box.  Parse errors
//! and strict mode failures carry the template name and line they came
//! from, and if the `debug` feature is enabled (which it is by default)
//! rendering the error with the alternative format (`{:#}`) includes the
//! failing template source.  For more information see [`Error`] with an
//! example.
//!
//! # Optional Features
//!
//! MiniStache comes with a small set of optional features:
//!
//! <details><summary><strong style="cursor: pointer">Configurable Features</strong></summary>
//!
//! - `debug`: if this feature is removed some debug functionality of the
//!   engine is removed as well.  This mainly affects the quality of error
//!   reporting.
//! - `preserve_order`: when enabled the internal value implementation uses
//!   an indexmap which preserves the original order of maps and structs.
//!
//! </details>
#![deny(missing_docs)]

#[macro_use]
mod macros;

mod ast;
mod context;
mod engine;
mod error;
mod lexer;
mod loader;
mod output;
mod parser;
mod renderer;
mod template;
mod tokens;
mod utils;

pub mod syntax;
pub mod value;

#[cfg(feature = "debug")]
mod debug;

pub use self::engine::Engine;
pub use self::error::{Error, ErrorKind};
pub use self::loader::path_loader;
pub use self::template::Template;
pub use self::utils::{HtmlEscape, UndefinedBehavior};

/// Re-export for convenience.
pub use self::value::Value;

pub use self::macros::__context;
