use std::borrow::Cow;
use std::fmt;

use crate::tokens::Span;

/// Represents template errors.
///
/// If the `debug` feature is enabled (which it is by default) errors
/// carry additional information such as the template source around the
/// failing line and a snapshot of the context.  That information is
/// rendered by the alternative formatting (`format!("{:#}", err)`).
///
/// # Example
///
/// Here is an example of how you might want to render errors:
///
/// ```rust
/// # let engine = ministache::Engine::new();
/// # let template = engine.template_from_str("").unwrap();
/// # let ctx = ();
/// match template.render(ctx) {
///     Ok(result) => println!("{}", result),
///     Err(err) => {
///         eprintln!("could not render template:");
///         eprintln!("  {:#}", err);
///     }
/// }
/// ```
pub struct Error {
    kind: ErrorKind,
    detail: Option<Cow<'static, str>>,
    name: Option<String>,
    lineno: usize,
    span: Option<Span>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    #[cfg(feature = "debug")]
    pub(crate) debug_info: Option<crate::debug::DebugInfo>,
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("detail", &self.detail)
            .field("name", &self.name)
            .field("lineno", &self.lineno)
            .field("source", &self.source)
            .finish()
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
    }
}

impl Eq for Error {}

/// An enum describing the error kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A tag was opened but its closing delimiter never showed up.
    UnterminatedTag,
    /// A section was closed that was not open, closed with the wrong
    /// name, or never closed at all.
    UnbalancedSection,
    /// A tag contained nothing but whitespace.
    EmptyTag,
    /// A `{{= =}}` tag did not contain exactly two delimiters.
    InvalidDelimiters,
    /// A variable did not resolve while the engine operates in
    /// [strict mode](crate::UndefinedBehavior::Strict).
    UndefinedVariable,
    /// A partial was referenced that the engine cannot resolve while the
    /// engine operates in [strict mode](crate::UndefinedBehavior::Strict).
    PartialNotFound,
    /// Partial or lambda expansion nested deeper than the engine allows.
    RecursionLimitExceeded,
    /// An operation such as loading a partial from disk failed.
    InvalidOperation,
    /// The output failed to accept written data.
    WriteFailure,
}

impl ErrorKind {
    fn description(self) -> &'static str {
        match self {
            ErrorKind::UnterminatedTag => "unterminated tag",
            ErrorKind::UnbalancedSection => "unbalanced section",
            ErrorKind::EmptyTag => "empty tag",
            ErrorKind::InvalidDelimiters => "invalid delimiters",
            ErrorKind::UndefinedVariable => "undefined variable",
            ErrorKind::PartialNotFound => "partial not found",
            ErrorKind::RecursionLimitExceeded => "recursion limit exceeded",
            ErrorKind::InvalidOperation => "invalid operation",
            ErrorKind::WriteFailure => "could not write output",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref detail) = self.detail {
            ok!(write!(f, "{}: {}", self.kind, detail));
        } else {
            ok!(write!(f, "{}", self.kind));
        }
        if let Some(ref filename) = self.name {
            ok!(write!(f, " (in {}:{})", filename, self.lineno));
        }
        #[cfg(feature = "debug")]
        {
            if f.alternate() {
                if let Some(ref debug_info) = self.debug_info {
                    ok!(crate::debug::render_debug_info(
                        f,
                        self.name(),
                        self.kind(),
                        self.line(),
                        self.span,
                        debug_info,
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Error {
    /// Creates a new error with kind and detail.
    pub fn new<D: Into<Cow<'static, str>>>(kind: ErrorKind, detail: D) -> Error {
        Error {
            kind,
            detail: Some(detail.into()),
            name: None,
            lineno: 0,
            span: None,
            source: None,
            #[cfg(feature = "debug")]
            debug_info: None,
        }
    }

    pub(crate) fn set_location(&mut self, filename: &str, lineno: usize) {
        self.name = Some(filename.into());
        self.lineno = lineno;
    }

    pub(crate) fn set_location_and_span(&mut self, filename: &str, span: Span) {
        self.set_location(filename, span.start_line as usize);
        self.span = Some(span);
    }

    pub(crate) fn partial_not_found(name: &str) -> Error {
        Error::new(
            ErrorKind::PartialNotFound,
            format!("partial {name:?} does not exist"),
        )
    }

    /// Attaches another error as source to this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the detail message if available.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the name of the template that failed.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the line of the template where the error happened.
    pub fn line(&self) -> Option<usize> {
        self.name.as_ref().map(|_| self.lineno)
    }

    /// Returns the template source if debug information is available.
    ///
    /// This is only present when the `debug` feature is enabled and the
    /// error came out of compiling or rendering a template.
    pub fn template_source(&self) -> Option<&str> {
        #[cfg(feature = "debug")]
        {
            self.debug_info
                .as_ref()
                .and_then(|x| x.template_source.as_deref())
        }
        #[cfg(not(feature = "debug"))]
        {
            None
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|err| err.as_ref() as _)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error {
            kind,
            detail: None,
            name: None,
            lineno: 0,
            span: None,
            source: None,
            #[cfg(feature = "debug")]
            debug_info: None,
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::new(ErrorKind::WriteFailure, "formatting failed")
    }
}
