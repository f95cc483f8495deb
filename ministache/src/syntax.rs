//! Documents the syntax for templates.
//!
//! <details><summary><strong style="cursor: pointer">Table of Contents</strong></summary>
//!
//! - [Synopsis](#synopsis)
//! - [Variables](#variables)
//! - [Sections](#sections)
//! - [Inverted Sections](#inverted-sections)
//! - [Comments](#comments)
//! - [Partials](#partials)
//! - [Set Delimiter](#set-delimiter)
//! - [Standalone Lines](#standalone-lines)
//! - [Name Resolution](#name-resolution)
//! - [Lambdas](#lambdas)
//!
//! </details>
//!
//! # Synopsis
//!
//! A template is simply text.  The engine can generate any text-based
//! format (HTML, XML, configuration files, source code, etc.).  Logic
//! lives in the data, not in the template: there are no if statements,
//! no loops and no expressions.  Instead the template contains **tags**
//! which either expand to values from the data or delimit blocks whose
//! rendering the data controls.
//!
//! This is a minimal template that illustrates a few basics:
//!
//! ```mustache
//! Hello {{name}}!
//! You have just won {{value}} dollars.
//! {{#in_ca}}
//! Well, {{taxed_value}} dollars, after taxes.
//! {{/in_ca}}
//! ```
//!
//! # Variables
//!
//! A `{{name}}` tag looks up `name` in the current context and inserts
//! its value.  Missing names expand to nothing (but see
//! [`UndefinedBehavior::Strict`](crate::UndefinedBehavior::Strict)).
//! The inserted text is HTML-escaped: the characters `&`, `<`, `>`,
//! `"` and `'` are replaced by entities.
//!
//! To insert a value unescaped, use triple braces or an ampersand:
//!
//! ```mustache
//! escaped:   {{markup}}
//! unescaped: {{{markup}}}
//! unescaped: {{&markup}}
//! ```
//!
//! A single dot names the value the innermost section is currently
//! rendering, which makes lists of scalars convenient:
//!
//! ```mustache
//! {{#names}}* {{.}}
//! {{/names}}
//! ```
//!
//! # Sections
//!
//! A section renders its block zero or more times, depending on the
//! value its name resolves to.  It begins with a pound tag and ends
//! with a matching slash tag:
//!
//! ```mustache
//! {{#repo}}
//!   <b>{{name}}</b>
//! {{/repo}}
//! ```
//!
//! - A **false** value (`false`, null, an empty string, an empty list,
//!   or a name that does not resolve) renders the block not at all.
//! - A **list** renders the block once per element.  Each element is
//!   pushed onto the context stack for its iteration, so tags inside
//!   the block see the element's fields first.
//! - A **map** renders the block once with the map pushed onto the
//!   context stack.
//! - Any other **truthy** value (`true`, a non-empty string, any
//!   number including zero) renders the block once without changing
//!   the context stack.
//! - A **lambda** receives the raw block text; see
//!   [Lambdas](#lambdas).
//!
//! # Inverted Sections
//!
//! An inverted section begins with a caret and renders its block
//! exactly when the plain section would not render at all:
//!
//! ```mustache
//! {{#repos}}<b>{{name}}</b>{{/repos}}
//! {{^repos}}No repos :({{/repos}}
//! ```
//!
//! Inverted sections never iterate and never push onto the context
//! stack.
//!
//! # Comments
//!
//! A bang tag is ignored entirely.  Comments may span multiple lines:
//!
//! ```mustache
//! <h1>Today{{! ignore me }}.</h1>
//! ```
//!
//! # Partials
//!
//! A greater-than tag expands another template, called a partial, in
//! place.  Partials are registered on the engine with
//! [`add_partial`](crate::Engine::add_partial) or resolved dynamically
//! through a [partial loader](crate::Engine::set_partial_loader):
//!
//! ```mustache
//! <h2>Names</h2>
//! {{#names}}
//!   {{>user}}
//! {{/names}}
//! ```
//!
//! The partial renders against the caller's current context stack, so
//! recursive partials can walk recursive data.  When a partial tag
//! stands alone on a line, its leading whitespace is applied to every
//! line the partial produces.  Partials always parse with the default
//! `{{` `}}` delimiters, no matter what delimiters the caller has
//! switched to.
//!
//! # Set Delimiter
//!
//! An equals tag swaps the tag delimiters for the rest of the template,
//! which helps when the output format itself is full of braces:
//!
//! ```mustache
//! * {{default_tags}}
//! {{=<% %>=}}
//! * <%erb_style_tags%>
//! <%={{ }}=%>
//! * {{back_to_default}}
//! ```
//!
//! The new delimiters must not contain whitespace or the equals sign.
//! The change applies from the tag to the end of the template.  It
//! never leaks into or out of a partial, and when a lambda expands a
//! section its result is parsed with the delimiters that were active
//! at the section's opening tag.
//!
//! # Standalone Lines
//!
//! A section, comment, partial or set-delimiter tag that stands alone
//! on a line, surrounded by nothing but spaces and tabs, disappears
//! together with that line.  This keeps block structure from
//! introducing blank lines into the output:
//!
//! ```mustache
//! Begin.
//! {{#truthy}}
//! Middle.
//! {{/truthy}}
//! End.
//! ```
//!
//! renders as three lines, not five.  Variable tags are never treated
//! this way, and a line carrying two or more tags keeps its newline.
//!
//! # Name Resolution
//!
//! Sections push values onto a context stack.  A name resolves by
//! searching that stack from the innermost frame outwards; the first
//! frame that is a map *containing* the name wins.  Dotted names like
//! `a.b.c` resolve the first segment that way and then walk the
//! remaining segments into the found value, where a numeric segment
//! indexes into a list.  If any step of the walk fails the whole name
//! resolves to null and renders as nothing; the walk does not resume
//! in outer frames, and strict mode only concerns itself with the
//! first segment.
//!
//! # Lambdas
//!
//! A callable value turns a tag into a programmable hook.  A lambda in
//! a section position receives the raw, unrendered block text, and
//! whatever it returns is parsed and rendered in the block's place.  A
//! lambda in a variable position is called with an empty string.  See
//! [`Value::from_lambda`](crate::value::Value::from_lambda) for how to
//! construct one from Rust.
