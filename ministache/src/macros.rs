// Internal shorthands for `?`.  These keep the generated code small and
// make it easy to spot every point where an error or a `None` leaves a
// function.
macro_rules! ok {
    ($expr:expr) => {
        match $expr {
            Ok(rv) => rv,
            Err(err) => return Err(err),
        }
    };
}

macro_rules! some {
    ($expr:expr) => {
        match $expr {
            Some(rv) => rv,
            None => return None,
        }
    };
}

/// Hidden utility module for the [`context!`](crate::context!) macro.
#[doc(hidden)]
pub mod __context {
    use std::sync::Arc;

    use crate::value::{Value, ValueMap, ValueRepr};

    #[inline(always)]
    pub fn make() -> ValueMap {
        ValueMap::default()
    }

    #[inline(always)]
    pub fn add(ctx: &mut ValueMap, key: &'static str, value: Value) {
        ctx.insert(key.into(), value);
    }

    #[inline(always)]
    pub fn build(ctx: ValueMap) -> Value {
        Value(ValueRepr::Map(Arc::new(ctx)))
    }
}

/// Creates a template context from keys and values.
///
/// ```rust
/// # use ministache::context;
/// let ctx = context! {
///     name => "Peter",
///     location => "World",
/// };
/// ```
///
/// Alternatively if the variable name matches the key name it can
/// be omitted:
///
/// ```rust
/// # use ministache::context;
/// let name = "Peter";
/// let ctx = context! { name };
/// ```
///
/// The return value is a [`Value`](crate::value::Value) holding a map.
/// Each value is converted with [`Value::from_serialize`](crate::value::Value::from_serialize),
/// so anything serializable can appear on the right hand side, including
/// already constructed [`Value`](crate::value::Value)s such as lambdas:
///
/// ```rust
/// # use ministache::{context, value::Value};
/// let ctx = context! {
///     wrapped => Value::from_lambda(|text: &str| format!("<b>{text}</b>")),
/// };
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::__context::build($crate::__context::make())
    };
    (
        $($key:ident $(=> $value:expr)?),* $(,)?
    ) => {{
        let mut ctx = $crate::__context::make();
        $(
            $crate::__context_pair!(ctx, $key $(, $value)?);
        )*
        $crate::__context::build(ctx)
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! __context_pair {
    ($ctx:ident, $key:ident) => {{
        $crate::__context_pair!($ctx, $key, $key);
    }};
    ($ctx:ident, $key:ident, $value:expr) => {
        $crate::__context::add(
            &mut $ctx,
            stringify!($key),
            $crate::value::Value::from_serialize(&$value),
        );
    };
}

/// A convenience macro to render a template string inline.
///
/// ```rust
/// # use ministache::render;
/// let rv = render!("Hello {{name}}!", name => "World");
/// assert_eq!(rv, "Hello World!");
/// ```
///
/// By default an empty [`Engine`](crate::Engine) is used.  To render with a
/// configured engine (for instance one that has partials registered) use the
/// `in` form:
///
/// ```rust
/// # use ministache::{render, Engine};
/// let mut engine = Engine::new();
/// engine.add_partial("bold", "<b>{{title}}</b>").unwrap();
/// let rv = render!(in engine, "{{>bold}}", title => "Hi");
/// assert_eq!(rv, "<b>Hi</b>");
/// ```
///
/// # Panics
///
/// This macro panics if the template does not parse or render.  For error
/// handling use [`Engine::render_str`](crate::Engine::render_str).
#[macro_export]
macro_rules! render {
    (
        in $engine:expr,
        $tmpl:expr
        $(, $key:ident $(=> $value:expr)?)* $(,)?
    ) => {
        ($engine).render_str($tmpl, $crate::context! { $($key $(=> $value)? ,)* })
            .expect("failed to render template")
    };
    (
        $tmpl:expr
        $(, $key:ident $(=> $value:expr)?)* $(,)?
    ) => {
        $crate::render!(in $crate::Engine::new(), $tmpl $(, $key $(=> $value)?)*)
    };
}
