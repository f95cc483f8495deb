use crate::error::{Error, ErrorKind};
use crate::tokens::{Span, Token};
use crate::utils::memstr;

pub(crate) const DEFAULT_OPEN: &str = "{{";
pub(crate) const DEFAULT_CLOSE: &str = "}}";

type Loc = (u32, u32, u32);

fn span_between(start: Loc, end: Loc) -> Span {
    Span {
        start_line: start.0,
        start_col: start.1,
        start_offset: start.2,
        end_line: end.0,
        end_col: end.1,
        end_offset: end.2,
    }
}

/// Tokenizes template source.
///
/// The tokenizer owns the delimiter state.  A `{{= =}}` tag rebinds the
/// delimiters the moment it is scanned, which is exactly the "rest of the
/// template" scoping mustache wants, and it never leaks into nested
/// parses because every parse constructs a fresh tokenizer.
///
/// Standalone lines are resolved here as well: a line that holds nothing
/// but a single comment, section, partial or delimiter tag disappears
/// from the text stream entirely.  For partials the swallowed indentation
/// is kept on the token because rendering needs it.
pub struct Tokenizer<'s> {
    rest: &'s str,
    failed: bool,
    pending: Option<(Token<'s>, Span)>,
    open: &'s str,
    close: &'s str,
    line_tainted: bool,
    current_line: u32,
    current_col: u32,
    current_offset: u32,
}

impl<'s> Tokenizer<'s> {
    /// Creates a tokenizer over `source` starting with the given delimiters.
    pub fn new(source: &'s str, open: &'s str, close: &'s str) -> Tokenizer<'s> {
        Tokenizer {
            rest: source,
            failed: false,
            pending: None,
            open,
            close,
            line_tainted: false,
            current_line: 1,
            current_col: 0,
            current_offset: 0,
        }
    }

    /// Produces the next token or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<(Token<'s>, Span)>, Error> {
        if let Some(pending) = self.pending.take() {
            return Ok(Some(pending));
        }
        if self.failed || self.rest.is_empty() {
            return Ok(None);
        }
        let offset = match memstr(self.rest.as_bytes(), self.open.as_bytes()) {
            Some(offset) => offset,
            None => {
                let start = self.loc();
                let text = self.advance(self.rest.len());
                return Ok(Some((Token::Text(text), self.span(start))));
            }
        };

        // The whitespace after the last newline in the preceding text is
        // the candidate indentation of the tag's line.  It is only part of
        // the output if the tag turns out not to be standalone.
        let chunk = &self.rest[..offset];
        let indent_start = chunk.rfind('\n').map(|pos| pos + 1).unwrap_or(0);
        let indent = &chunk[indent_start..];
        let ws_before = indent.bytes().all(|b| b == b' ' || b == b'\t')
            && (indent_start > 0 || !self.line_tainted);

        let text_start = self.loc();
        self.advance(indent_start);
        let trimmed_end = self.loc();
        self.advance(indent.len());
        let tag_start = self.loc();

        let (token, span, eligible) = ok!(self.tokenize_tag());
        let standalone = eligible && ws_before && self.eat_standalone_tail();
        let token = match (standalone, token) {
            (true, Token::Partial { name, .. }) => Token::Partial { name, indent },
            (_, token) => token,
        };
        self.line_tainted = !standalone;

        let (text, text_span) = if standalone {
            (&chunk[..indent_start], span_between(text_start, trimmed_end))
        } else {
            (chunk, span_between(text_start, tag_start))
        };
        if text.is_empty() {
            Ok(Some((token, span)))
        } else {
            self.pending = Some((token, span));
            Ok(Some((Token::Text(text), text_span)))
        }
    }

    /// The line the tokenizer is currently on, for error reporting.
    pub fn current_line(&self) -> usize {
        self.current_line as usize
    }

    fn tokenize_tag(&mut self) -> Result<(Token<'s>, Span, bool), Error> {
        let start = self.loc();
        let rest = self.rest;

        // `{{{name}}}` only exists while the default delimiters are active.
        if self.open == DEFAULT_OPEN && rest[DEFAULT_OPEN.len()..].starts_with('{') {
            let end = match memstr(rest.as_bytes(), b"}}}") {
                Some(end) => end,
                None => {
                    return Err(
                        self.syntax_error(ErrorKind::UnterminatedTag, "unclosed triple stache")
                    )
                }
            };
            let path = rest[DEFAULT_OPEN.len() + 1..end].trim();
            if path.is_empty() {
                return Err(self.syntax_error(ErrorKind::EmptyTag, "tag without a name"));
            }
            self.advance(end + 3);
            return Ok((Token::Variable { path, escape: false }, self.span(start), false));
        }

        let body_start = self.open.len();
        let rel = match memstr(&rest.as_bytes()[body_start..], self.close.as_bytes()) {
            Some(rel) => rel,
            None => {
                return Err(self.syntax_error(
                    ErrorKind::UnterminatedTag,
                    "tag is missing its closing delimiter",
                ))
            }
        };
        let body = rest[body_start..body_start + rel].trim();
        let total = body_start + rel + self.close.len();

        if body.is_empty() {
            return Err(self.syntax_error(ErrorKind::EmptyTag, "tag without a name"));
        }

        let (token, eligible) = if let Some(name) = body.strip_prefix('#') {
            (
                Token::SectionOpen {
                    path: ok!(self.tag_name(name)),
                    inverted: false,
                    open_delim: self.open,
                    close_delim: self.close,
                },
                true,
            )
        } else if let Some(name) = body.strip_prefix('^') {
            (
                Token::SectionOpen {
                    path: ok!(self.tag_name(name)),
                    inverted: true,
                    open_delim: self.open,
                    close_delim: self.close,
                },
                true,
            )
        } else if let Some(name) = body.strip_prefix('/') {
            (
                Token::SectionClose {
                    path: ok!(self.tag_name(name)),
                },
                true,
            )
        } else if body.starts_with('!') {
            (Token::Comment, true)
        } else if let Some(name) = body.strip_prefix('>') {
            (
                Token::Partial {
                    name: ok!(self.tag_name(name)),
                    indent: "",
                },
                true,
            )
        } else if let Some(name) = body.strip_prefix('&') {
            (
                Token::Variable {
                    path: ok!(self.tag_name(name)),
                    escape: false,
                },
                false,
            )
        } else if let Some(spec) = body.strip_prefix('=') {
            ok!(self.change_delimiters(spec));
            (Token::DelimiterChange, true)
        } else {
            (
                Token::Variable {
                    path: body,
                    escape: true,
                },
                false,
            )
        };

        self.advance(total);
        Ok((token, self.span(start), eligible))
    }

    fn tag_name(&mut self, name: &'s str) -> Result<&'s str, Error> {
        let name = name.trim();
        if name.is_empty() {
            Err(self.syntax_error(ErrorKind::EmptyTag, "tag without a name"))
        } else {
            Ok(name)
        }
    }

    fn change_delimiters(&mut self, spec: &'s str) -> Result<(), Error> {
        let inner = match spec.strip_suffix('=') {
            Some(inner) => inner,
            None => {
                return Err(self.syntax_error(
                    ErrorKind::InvalidDelimiters,
                    "delimiter tag must end in `=`",
                ))
            }
        };
        let mut parts = inner.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(open), Some(close), None) => {
                self.open = open;
                self.close = close;
                Ok(())
            }
            _ => Err(self.syntax_error(
                ErrorKind::InvalidDelimiters,
                "expected exactly two delimiters",
            )),
        }
    }

    /// Consumes trailing whitespace and the line ending after a standalone
    /// tag.  The end of input counts as a line ending.
    fn eat_standalone_tail(&mut self) -> bool {
        let bytes = self.rest.as_bytes();
        let mut i = 0;
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        let tail = if i == bytes.len() {
            Some(i)
        } else if bytes[i] == b'\n' {
            Some(i + 1)
        } else if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
            Some(i + 2)
        } else {
            None
        };
        match tail {
            Some(len) => {
                self.advance(len);
                true
            }
            None => false,
        }
    }

    fn syntax_error(&mut self, kind: ErrorKind, detail: &'static str) -> Error {
        self.failed = true;
        Error::new(kind, detail)
    }

    fn advance(&mut self, bytes: usize) -> &'s str {
        let (skipped, new_rest) = self.rest.split_at(bytes);
        for c in skipped.chars() {
            match c {
                '\n' => {
                    self.current_line += 1;
                    self.current_col = 0;
                }
                _ => self.current_col += 1,
            }
            self.current_offset += c.len_utf8() as u32;
        }
        self.rest = new_rest;
        skipped
    }

    #[inline(always)]
    fn loc(&self) -> Loc {
        (self.current_line, self.current_col, self.current_offset)
    }

    fn span(&self, start: Loc) -> Span {
        span_between(start, self.loc())
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    fn tokenize(source: &str) -> Result<Vec<Token<'_>>, Error> {
        let mut tokenizer = Tokenizer::new(source, DEFAULT_OPEN, DEFAULT_CLOSE);
        let mut rv = Vec::new();
        while let Some((token, _)) = ok!(tokenizer.next_token()) {
            rv.push(token);
        }
        Ok(rv)
    }

    #[test]
    fn test_basic() {
        let tokens = tokenize("Hello {{name}}!").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("Hello "),
                Token::Variable {
                    path: "name",
                    escape: true
                },
                Token::Text("!"),
            ]
        );
    }

    #[test]
    fn test_unescaped_forms() {
        let tokens = tokenize("{{{raw}}} {{& other }}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Variable {
                    path: "raw",
                    escape: false
                },
                Token::Text(" "),
                Token::Variable {
                    path: "other",
                    escape: false
                },
            ]
        );
    }

    #[test]
    fn test_standalone_section_lines() {
        let tokens = tokenize("a\n  {{#s}}  \nb\n{{/s}}\n").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("a\n"),
                Token::SectionOpen {
                    path: "s",
                    inverted: false,
                    open_delim: "{{",
                    close_delim: "}}",
                },
                Token::Text("b\n"),
                Token::SectionClose { path: "s" },
            ]
        );
    }

    #[test]
    fn test_inline_section_keeps_whitespace() {
        let tokens = tokenize("a {{#s}}b{{/s}}\n").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("a "),
                Token::SectionOpen {
                    path: "s",
                    inverted: false,
                    open_delim: "{{",
                    close_delim: "}}",
                },
                Token::Text("b"),
                Token::SectionClose { path: "s" },
                Token::Text("\n"),
            ]
        );
    }

    #[test]
    fn test_standalone_partial_indent() {
        let tokens = tokenize("x\n  {{> p}}\ny").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("x\n"),
                Token::Partial {
                    name: "p",
                    indent: "  "
                },
                Token::Text("y"),
            ]
        );
    }

    #[test]
    fn test_comment_standalone_at_eof() {
        let tokens = tokenize("!\n  {{! still standalone }}").unwrap();
        assert_eq!(tokens, vec![Token::Text("!\n"), Token::Comment]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let tokens = tokenize("|\r\n{{>p}}\r\n|").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("|\r\n"),
                Token::Partial {
                    name: "p",
                    indent: ""
                },
                Token::Text("|"),
            ]
        );
    }

    #[test]
    fn test_delimiter_change_inline() {
        let tokens = tokenize("{{=<% %>=}}(<%text%>)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::DelimiterChange,
                Token::Text("("),
                Token::Variable {
                    path: "text",
                    escape: true
                },
                Token::Text(")"),
            ]
        );
    }

    #[test]
    fn test_delimiter_change_standalone() {
        let tokens = tokenize("Begin.\n{{=@ @=}}\nEnd.").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("Begin.\n"),
                Token::DelimiterChange,
                Token::Text("End."),
            ]
        );
    }

    #[test]
    fn test_two_tags_on_one_line_are_not_standalone() {
        let tokens = tokenize("{{#a}}{{/a}}\n").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::SectionOpen {
                    path: "a",
                    inverted: false,
                    open_delim: "{{",
                    close_delim: "}}",
                },
                Token::SectionClose { path: "a" },
                Token::Text("\n"),
            ]
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            tokenize("{{name").unwrap_err().kind(),
            ErrorKind::UnterminatedTag
        );
        assert_eq!(tokenize("{{}}").unwrap_err().kind(), ErrorKind::EmptyTag);
        assert_eq!(tokenize("{{ }}").unwrap_err().kind(), ErrorKind::EmptyTag);
        assert_eq!(tokenize("{{#}}").unwrap_err().kind(), ErrorKind::EmptyTag);
        assert_eq!(
            tokenize("{{=|=}}").unwrap_err().kind(),
            ErrorKind::InvalidDelimiters
        );
        assert_eq!(
            tokenize("{{=| | |=}}").unwrap_err().kind(),
            ErrorKind::InvalidDelimiters
        );
    }

    #[test]
    fn test_spans() {
        let mut tokenizer = Tokenizer::new("x{{name}}", DEFAULT_OPEN, DEFAULT_CLOSE);
        let (token, span) = tokenizer.next_token().unwrap().unwrap();
        assert_eq!(token, Token::Text("x"));
        assert_eq!(format!("{span:?}"), " @ 1:0-1:1");
        let (token, span) = tokenizer.next_token().unwrap().unwrap();
        assert_eq!(
            token,
            Token::Variable {
                path: "name",
                escape: true
            }
        );
        assert_eq!(format!("{span:?}"), " @ 1:1-1:9");
        assert_eq!(span.start_offset, 1);
        assert_eq!(span.end_offset, 9);
    }
}
