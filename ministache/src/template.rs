use std::fmt;

use serde::Serialize;

use crate::ast::Node;
use crate::context::Context;
use crate::engine::Engine;
use crate::error::Error;
use crate::output::Output;
use crate::parser::parse;
use crate::renderer::Renderer;
use crate::value::Value;

/// A parsed template with its name and source.
///
/// The node tree is immutable once construction succeeded.  Parse
/// failure never yields a partial tree.
pub(crate) struct CompiledTemplate<'source> {
    pub(crate) name: &'source str,
    pub(crate) source: &'source str,
    pub(crate) nodes: Vec<Node<'source>>,
}

impl<'source> CompiledTemplate<'source> {
    pub(crate) fn new(
        name: &'source str,
        source: &'source str,
    ) -> Result<CompiledTemplate<'source>, Error> {
        attach_basic_debug_info(CompiledTemplate::new_impl(name, source), source)
    }

    fn new_impl(
        name: &'source str,
        source: &'source str,
    ) -> Result<CompiledTemplate<'source>, Error> {
        let nodes = ok!(parse(source, name));
        Ok(CompiledTemplate {
            name,
            source,
            nodes,
        })
    }
}

fn attach_basic_debug_info<T>(rv: Result<T, Error>, source: &str) -> Result<T, Error> {
    #[cfg(feature = "debug")]
    {
        match rv {
            Ok(rv) => Ok(rv),
            Err(mut err) => {
                err.debug_info = Some(crate::debug::DebugInfo {
                    template_source: Some(source.to_string()),
                    ..Default::default()
                });
                Err(err)
            }
        }
    }
    #[cfg(not(feature = "debug"))]
    {
        let _ = source;
        rv
    }
}

/// Represents a handle to a template.
///
/// Templates are created from an [`Engine`] via
/// [`template_from_str`](Engine::template_from_str) or
/// [`template_from_named_str`](Engine::template_from_named_str).  A
/// template borrows the engine it came from and can be rendered any
/// number of times.
///
/// ```
/// # use ministache::{context, Engine};
/// let engine = Engine::new();
/// let tmpl = engine.template_from_str("Hello {{name}}!").unwrap();
/// let rv = tmpl.render(context! { name => "World" }).unwrap();
/// assert_eq!(rv, "Hello World!");
/// ```
pub struct Template<'env, 'source> {
    engine: &'env Engine<'source>,
    compiled: CompiledTemplate<'source>,
}

impl fmt::Debug for Template<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name())
            .finish()
    }
}

impl<'env, 'source> Template<'env, 'source> {
    pub(crate) fn new(
        engine: &'env Engine<'source>,
        compiled: CompiledTemplate<'source>,
    ) -> Template<'env, 'source> {
        Template { engine, compiled }
    }

    /// Returns the name of the template.
    pub fn name(&self) -> &str {
        self.compiled.name
    }

    /// Returns the source code of the template.
    pub fn source(&self) -> &str {
        self.compiled.source
    }

    /// Renders the template into a string.
    ///
    /// The provided value is the root of the context stack.  It may be
    /// any serializable value; typically it is created with the
    /// [`context!`](crate::context) macro.
    ///
    /// ```
    /// # use ministache::{context, Engine};
    /// let engine = Engine::new();
    /// let tmpl = engine
    ///     .template_from_str("{{#items}}{{.}} {{/items}}")
    ///     .unwrap();
    /// let rv = tmpl.render(context! { items => vec![1, 2, 3] }).unwrap();
    /// assert_eq!(rv, "1 2 3 ");
    /// ```
    ///
    /// # Errors
    ///
    /// Fails when a lambda returns text that does not parse, when the
    /// expansion recursion limit is hit, or in
    /// [strict mode](crate::UndefinedBehavior::Strict) when a name or
    /// partial cannot be resolved.
    pub fn render<S: Serialize>(&self, ctx: S) -> Result<String, Error> {
        render_to_string(self.engine, &self.compiled, Value::from_serialize(&ctx))
    }
}

pub(crate) fn render_to_string(
    engine: &Engine<'_>,
    compiled: &CompiledTemplate<'_>,
    root: Value,
) -> Result<String, Error> {
    let mut rv = String::new();
    let renderer = Renderer::new(engine, compiled.name);
    let mut ctx = Context::new(root.clone());
    let mut out = Output::with_string(&mut rv);
    match renderer.render(&compiled.nodes, &mut ctx, &mut out) {
        Ok(()) => Ok(rv),
        Err(err) => Err(attach_render_debug_info(err, compiled, root)),
    }
}

fn attach_render_debug_info(mut err: Error, compiled: &CompiledTemplate<'_>, root: Value) -> Error {
    #[cfg(feature = "debug")]
    {
        if err.debug_info.is_none() {
            err.debug_info = Some(crate::debug::DebugInfo {
                template_source: Some(compiled.source.to_string()),
                context: Some(root),
                referenced_names: Some(crate::debug::collect_referenced_names(&compiled.nodes)),
            });
        }
    }
    #[cfg(not(feature = "debug"))]
    {
        let _ = (compiled, root);
    }
    err
}
