use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Error;
use crate::loader::LoadFunc;
use crate::template::{render_to_string, CompiledTemplate, Template};
use crate::utils::{BTreeMapKeysDebug, UndefinedBehavior};
use crate::value::Value;

/// An abstraction that holds the engine configuration.
///
/// This object holds the registered partials, the optional partial
/// loader and the undefined-name policy.  Rendering never mutates the
/// engine, so one configured engine can serve any number of renders.
///
/// The engine holds references to the sources the partials were
/// registered from.  That makes it inconvenient to pass around unless
/// the partial sources are static strings; for partials that live on
/// disk or elsewhere use
/// [`set_partial_loader`](Engine::set_partial_loader) instead.
#[derive(Clone)]
pub struct Engine<'source> {
    partials: BTreeMap<&'source str, &'source str>,
    loader: Option<Arc<LoadFunc>>,
    undefined_behavior: UndefinedBehavior,
}

impl<'source> Default for Engine<'source> {
    fn default() -> Self {
        Engine::new()
    }
}

impl<'source> fmt::Debug for Engine<'source> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("partials", &BTreeMapKeysDebug(&self.partials))
            .field("undefined_behavior", &self.undefined_behavior)
            .finish()
    }
}

impl<'source> Engine<'source> {
    /// Creates a new engine with sensible defaults.
    ///
    /// The engine does not contain any partials and resolves unknown
    /// names leniently.
    pub fn new() -> Engine<'source> {
        Engine {
            partials: BTreeMap::new(),
            loader: None,
            undefined_behavior: UndefinedBehavior::default(),
        }
    }

    /// Registers a partial under a name.
    ///
    /// The source must be valid template syntax; parse errors surface
    /// at registration rather than at first use.  Name and source are
    /// borrowed for the lifetime of the engine.
    ///
    /// ```
    /// # use ministache::{context, Engine};
    /// let mut engine = Engine::new();
    /// engine.add_partial("user", "<strong>{{name}}</strong>").unwrap();
    /// let rv = engine
    ///     .render_str("{{>user}}", context! { name => "John" })
    ///     .unwrap();
    /// assert_eq!(rv, "<strong>John</strong>");
    /// ```
    pub fn add_partial(&mut self, name: &'source str, source: &'source str) -> Result<(), Error> {
        ok!(CompiledTemplate::new(name, source));
        self.partials.insert(name, source);
        Ok(())
    }

    /// Removes a registered partial by name.
    pub fn remove_partial(&mut self, name: &str) {
        self.partials.remove(name);
    }

    /// Removes all registered partials.
    pub fn clear_partials(&mut self) {
        self.partials.clear();
    }

    /// Sets a callback to resolve partials the engine does not know.
    ///
    /// The callback receives the partial name and returns the partial
    /// source, `Ok(None)` when the name does not resolve, or an error.
    /// Registered partials take precedence over the loader.  An
    /// unresolved name renders as empty output unless the engine
    /// operates in [strict mode](UndefinedBehavior::Strict).
    ///
    /// The [`path_loader`](crate::path_loader) function creates a
    /// loader that reads partials from a directory:
    ///
    /// ```
    /// # use ministache::{path_loader, Engine};
    /// let mut engine = Engine::new();
    /// engine.set_partial_loader(path_loader("path/to/partials"));
    /// ```
    pub fn set_partial_loader<F>(&mut self, f: F)
    where
        F: Fn(&str) -> Result<Option<String>, Error> + Send + Sync + 'static,
    {
        self.loader = Some(Arc::new(f));
    }

    /// Reconfigures the runtime behavior of undefined names.
    ///
    /// This defaults to [`UndefinedBehavior::Lenient`].
    ///
    /// ```
    /// # use ministache::{Engine, UndefinedBehavior};
    /// let mut engine = Engine::new();
    /// engine.set_undefined_behavior(UndefinedBehavior::Strict);
    /// assert!(engine.render_str("{{missing}}", ()).is_err());
    /// ```
    pub fn set_undefined_behavior(&mut self, behavior: UndefinedBehavior) {
        self.undefined_behavior = behavior;
    }

    /// Returns the current undefined behavior.
    pub fn undefined_behavior(&self) -> UndefinedBehavior {
        self.undefined_behavior
    }

    /// Compiles a template from a string.
    ///
    /// The internal name of the template is `<string>`.  The returned
    /// template borrows the engine and the source and can be rendered
    /// any number of times.
    ///
    /// ```
    /// # use ministache::{context, Engine};
    /// let engine = Engine::new();
    /// let tmpl = engine.template_from_str("Hello {{name}}!").unwrap();
    /// let rv = tmpl.render(context! { name => "World" }).unwrap();
    /// assert_eq!(rv, "Hello World!");
    /// ```
    pub fn template_from_str(&self, source: &'source str) -> Result<Template<'_, 'source>, Error> {
        self.template_from_named_str("<string>", source)
    }

    /// Compiles a template from a name and a string.
    ///
    /// Like [`template_from_str`](Self::template_from_str), but the
    /// template gets an explicit name which shows up in error
    /// locations.
    pub fn template_from_named_str(
        &self,
        name: &'source str,
        source: &'source str,
    ) -> Result<Template<'_, 'source>, Error> {
        Ok(Template::new(self, ok!(CompiledTemplate::new(name, source))))
    }

    /// Parses and renders a template from a string in one go.
    ///
    /// In some cases you really only need a template to be rendered
    /// once from a string and returned.  The internal name of the
    /// template is `<string>`.
    ///
    /// ```
    /// # use ministache::{context, Engine};
    /// let engine = Engine::new();
    /// let rv = engine.render_str("Hello {{name}}", context! { name => "World" });
    /// println!("{}", rv.unwrap());
    /// ```
    pub fn render_str<S: Serialize>(&self, source: &str, ctx: S) -> Result<String, Error> {
        // keep the monomorphized surface small, the body is shared
        self._render_str("<string>", source, Value::from_serialize(&ctx))
    }

    /// Parses and renders a template from a string in one go with name.
    ///
    /// Like [`render_str`](Self::render_str), but provide a name for
    /// the template to be used instead of the default `<string>`.
    pub fn render_named_str<S: Serialize>(
        &self,
        name: &str,
        source: &str,
        ctx: S,
    ) -> Result<String, Error> {
        self._render_str(name, source, Value::from_serialize(&ctx))
    }

    fn _render_str(&self, name: &str, source: &str, root: Value) -> Result<String, Error> {
        let compiled = ok!(CompiledTemplate::new(name, source));
        render_to_string(self, &compiled, root)
    }

    /// Looks up the source of a partial.
    ///
    /// Registered partials win over the loader.
    pub(crate) fn partial_source(&self, name: &str) -> Result<Option<Cow<'source, str>>, Error> {
        if let Some(&source) = self.partials.get(name) {
            return Ok(Some(Cow::Borrowed(source)));
        }
        match self.loader {
            Some(ref loader) => Ok(ok!(loader(name)).map(Cow::Owned)),
            None => Ok(None),
        }
    }
}
