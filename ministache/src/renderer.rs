use crate::ast::{self, Node};
use crate::context::Context;
use crate::engine::Engine;
use crate::error::{Error, ErrorKind};
use crate::lexer::{DEFAULT_CLOSE, DEFAULT_OPEN};
use crate::output::Output;
use crate::parser::parse_with_delimiters;
use crate::tokens::Span;
use crate::utils::{write_escaped, HtmlEscape, UndefinedBehavior};
use crate::value::{Value, ValueRepr};

/// How deep template expansion may nest.
///
/// Every partial expansion and every lambda result adds a level.  The
/// limit exists to turn self-referential partials into an error instead
/// of a stack overflow.
const MAX_RECURSION: usize = 100;

/// Walks a parsed template and writes the output.
///
/// The renderer is a plain recursive tree walk.  The only mutable state
/// is the context stack which follows a strict push/pop discipline, so
/// nothing leaks out of a render call.
pub struct Renderer<'a, 'source> {
    engine: &'a Engine<'source>,
    name: &'a str,
}

impl<'a, 'source> Renderer<'a, 'source> {
    pub fn new(engine: &'a Engine<'source>, name: &'a str) -> Renderer<'a, 'source> {
        Renderer { engine, name }
    }

    pub fn render(
        &self,
        nodes: &[Node<'_>],
        ctx: &mut Context,
        out: &mut Output,
    ) -> Result<(), Error> {
        self.render_nodes(nodes, ctx, out, 0)
    }

    fn render_nodes(
        &self,
        nodes: &[Node<'_>],
        ctx: &mut Context,
        out: &mut Output,
        depth: usize,
    ) -> Result<(), Error> {
        for node in nodes {
            match node {
                Node::Text(text) => {
                    ok!(out.write_str(text.text).map_err(Error::from));
                }
                Node::Variable(var) => {
                    ok!(self
                        .render_variable(var, ctx, out, depth)
                        .map_err(|err| self.attach_location(err, var.span())));
                }
                Node::Section(section) => {
                    ok!(self
                        .render_section(section, ctx, out, depth)
                        .map_err(|err| self.attach_location(err, section.span())));
                }
                Node::Partial(partial) => {
                    ok!(self
                        .render_partial(partial, ctx, out, depth)
                        .map_err(|err| self.attach_location(err, partial.span())));
                }
                Node::Comment(_) | Node::DelimiterChange(_) => {}
            }
        }
        Ok(())
    }

    fn render_variable(
        &self,
        var: &ast::Variable<'_>,
        ctx: &mut Context,
        out: &mut Output,
        depth: usize,
    ) -> Result<(), Error> {
        let value = match ctx.resolve(var.path) {
            Some(value) => value,
            None => {
                return match self.engine.undefined_behavior() {
                    UndefinedBehavior::Lenient => Ok(()),
                    UndefinedBehavior::Strict => Err(Error::new(
                        ErrorKind::UndefinedVariable,
                        format!("{} is undefined", var.path),
                    )),
                };
            }
        };

        // a lambda in variable position is called with an empty string
        // and its result goes through a fresh parse with the default
        // delimiters
        if let Some(lambda) = value.as_lambda() {
            let expanded = lambda("");
            return self.render_lambda_result(&expanded, var.escape, ctx, out, depth);
        }

        if var.escape {
            write_escaped(out, &value)
        } else {
            write!(out, "{value}").map_err(Error::from)
        }
    }

    fn render_section(
        &self,
        section: &ast::Section<'_>,
        ctx: &mut Context,
        out: &mut Output,
        depth: usize,
    ) -> Result<(), Error> {
        let value = ctx.resolve(section.path);

        if section.inverted {
            // inverted sections render on falsy or absent names and
            // never invoke lambdas
            if !value.as_ref().map_or(false, Value::is_true) {
                ok!(self.render_nodes(&section.body, ctx, out, depth));
            }
            return Ok(());
        }

        let value = match value {
            Some(value) => value,
            None => return Ok(()),
        };

        if let Some(lambda) = value.as_lambda() {
            // the lambda sees the verbatim body text and its result is
            // parsed with the delimiters that were active at the open tag
            let expanded = lambda(section.raw_body);
            return self.expand(
                &expanded,
                section.open_delim,
                section.close_delim,
                ctx,
                out,
                depth,
            );
        }

        match &value.0 {
            ValueRepr::List(items) => {
                for item in items.iter() {
                    ctx.push(item.clone());
                    let rv = self.render_nodes(&section.body, ctx, out, depth);
                    ctx.pop();
                    ok!(rv);
                }
            }
            ValueRepr::Map(_) => {
                ctx.push(value.clone());
                let rv = self.render_nodes(&section.body, ctx, out, depth);
                ctx.pop();
                ok!(rv);
            }
            // scalars render the body once against the unchanged stack
            _ => {
                if value.is_true() {
                    ok!(self.render_nodes(&section.body, ctx, out, depth));
                }
            }
        }
        Ok(())
    }

    fn render_partial(
        &self,
        partial: &ast::Partial<'_>,
        ctx: &mut Context,
        out: &mut Output,
        depth: usize,
    ) -> Result<(), Error> {
        let source = match ok!(self.engine.partial_source(partial.name)) {
            Some(source) => source,
            None => {
                return match self.engine.undefined_behavior() {
                    UndefinedBehavior::Lenient => Ok(()),
                    UndefinedBehavior::Strict => Err(Error::partial_not_found(partial.name)),
                };
            }
        };

        if partial.indent.is_empty() {
            return self.expand(&source, DEFAULT_OPEN, DEFAULT_CLOSE, ctx, out, depth);
        }

        // a standalone partial's indentation applies to every line of
        // the rendered expansion, the first one included; the empty
        // remainder after a final newline stays untouched
        let mut buf = String::new();
        let mut nested = Output::with_string(&mut buf);
        ok!(self.expand(&source, DEFAULT_OPEN, DEFAULT_CLOSE, ctx, &mut nested, depth));
        for line in buf.split_inclusive('\n') {
            ok!(out.write_str(partial.indent).map_err(Error::from));
            ok!(out.write_str(line).map_err(Error::from));
        }
        Ok(())
    }

    fn render_lambda_result(
        &self,
        source: &str,
        escape: bool,
        ctx: &mut Context,
        out: &mut Output,
        depth: usize,
    ) -> Result<(), Error> {
        if escape {
            // escaping applies to the fully expanded result, not to the
            // text the lambda returned
            let mut buf = String::new();
            let mut nested = Output::with_string(&mut buf);
            ok!(self.expand(source, DEFAULT_OPEN, DEFAULT_CLOSE, ctx, &mut nested, depth));
            write!(out, "{}", HtmlEscape(&buf)).map_err(Error::from)
        } else {
            self.expand(source, DEFAULT_OPEN, DEFAULT_CLOSE, ctx, out, depth)
        }
    }

    fn expand(
        &self,
        source: &str,
        open: &str,
        close: &str,
        ctx: &mut Context,
        out: &mut Output,
        depth: usize,
    ) -> Result<(), Error> {
        if depth >= MAX_RECURSION {
            return Err(Error::new(
                ErrorKind::RecursionLimitExceeded,
                "template expansion nested too deeply",
            ));
        }
        let nodes = ok!(parse_with_delimiters(source, self.name, open, close));
        self.render_nodes(&nodes, ctx, out, depth + 1)
    }

    fn attach_location(&self, mut err: Error, span: Span) -> Error {
        if err.line().is_none() {
            err.set_location_and_span(self.name, span);
        }
        err
    }
}
