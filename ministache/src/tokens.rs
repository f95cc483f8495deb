use std::fmt;

/// A token produced by the [`Tokenizer`](crate::lexer::Tokenizer).
///
/// Tags are atomic in mustache so every tag becomes a single token.  The
/// tokenizer already applies the standalone line trimming which is why the
/// text surrounding a standalone tag never shows up in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Raw template text emitted verbatim.
    Text(&'a str),
    /// A `{{name}}`, `{{{name}}}` or `{{&name}}` tag.
    Variable {
        /// The dotted name between the delimiters.
        path: &'a str,
        /// `false` for the `{{{ }}}` and `{{& }}` forms.
        escape: bool,
    },
    /// A `{{#name}}` or `{{^name}}` tag.
    SectionOpen {
        /// The dotted name of the section.
        path: &'a str,
        /// `true` for the `{{^name}}` form.
        inverted: bool,
        /// The open delimiter active when this tag was scanned.
        open_delim: &'a str,
        /// The close delimiter active when this tag was scanned.
        close_delim: &'a str,
    },
    /// A `{{/name}}` tag.
    SectionClose {
        /// The dotted name that must match the open tag.
        path: &'a str,
    },
    /// A `{{>name}}` tag.
    Partial {
        /// The name of the referenced partial.
        name: &'a str,
        /// For a standalone partial the whitespace preceding the tag on
        /// its line, otherwise empty.
        indent: &'a str,
    },
    /// A `{{! ... }}` tag.  The contents are discarded.
    Comment,
    /// A `{{=<% %>=}}` tag.  The rebinding happens inside the tokenizer,
    /// the token itself only marks where it occurred.
    DelimiterChange,
}

/// Records the location of a token or node in the template source.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub start_offset: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub end_offset: u32,
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " @ {}:{}-{}:{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}
