use std::mem;

use crate::ast::{self, Node, Spanned};
use crate::error::{Error, ErrorKind};
use crate::lexer::{Tokenizer, DEFAULT_CLOSE, DEFAULT_OPEN};
use crate::tokens::{Span, Token};

const MAX_RECURSION: usize = 150;

/// Parses a template into a list of nodes.
pub fn parse<'a>(source: &'a str, name: &'a str) -> Result<Vec<Node<'a>>, Error> {
    parse_with_delimiters(source, name, DEFAULT_OPEN, DEFAULT_CLOSE)
}

/// Parses with explicit starting delimiters.
///
/// The text a lambda returns is parsed with the delimiters that were
/// active at the section's open tag rather than the defaults, which is
/// what this entry point exists for.
pub fn parse_with_delimiters<'a>(
    source: &'a str,
    name: &'a str,
    open: &'a str,
    close: &'a str,
) -> Result<Vec<Node<'a>>, Error> {
    let mut parser = Parser::new(source, name, open, close);
    parser.parse().map_err(|mut err| {
        if err.line().is_none() {
            err.set_location(name, parser.current_line());
        }
        err
    })
}

struct PendingSection<'a> {
    path: &'a str,
    inverted: bool,
    open_delim: &'a str,
    close_delim: &'a str,
    span: Span,
    children: Vec<Node<'a>>,
}

struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    source: &'a str,
    name: &'a str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, name: &'a str, open: &'a str, close: &'a str) -> Parser<'a> {
        Parser {
            tokenizer: Tokenizer::new(source, open, close),
            source,
            name,
        }
    }

    fn parse(&mut self) -> Result<Vec<Node<'a>>, Error> {
        let mut nodes = Vec::new();
        let mut stack: Vec<PendingSection<'a>> = Vec::new();

        while let Some((token, span)) = ok!(self.tokenizer.next_token()) {
            match token {
                Token::Text(text) => {
                    nodes.push(Node::Text(Spanned::new(ast::Text { text }, span)));
                }
                Token::Variable { path, escape } => {
                    nodes.push(Node::Variable(Spanned::new(
                        ast::Variable { path, escape },
                        span,
                    )));
                }
                Token::SectionOpen {
                    path,
                    inverted,
                    open_delim,
                    close_delim,
                } => {
                    if stack.len() >= MAX_RECURSION {
                        return Err(self.error_at(
                            ErrorKind::RecursionLimitExceeded,
                            "sections nested too deeply".into(),
                            span,
                        ));
                    }
                    // the children collected so far belong to the parent;
                    // they come back when the section closes
                    stack.push(PendingSection {
                        path,
                        inverted,
                        open_delim,
                        close_delim,
                        span,
                        children: mem::take(&mut nodes),
                    });
                }
                Token::SectionClose { path } => {
                    let pending = match stack.pop() {
                        Some(pending) => pending,
                        None => {
                            return Err(self.error_at(
                                ErrorKind::UnbalancedSection,
                                format!("closing tag for section {path:?} which is not open"),
                                span,
                            ));
                        }
                    };
                    if pending.path != path {
                        return Err(self.error_at(
                            ErrorKind::UnbalancedSection,
                            format!("section {:?} was closed by {:?}", pending.path, path),
                            span,
                        ));
                    }
                    let body = mem::replace(&mut nodes, pending.children);
                    let raw_body =
                        &self.source[pending.span.end_offset as usize..span.start_offset as usize];
                    nodes.push(Node::Section(Spanned::new(
                        ast::Section {
                            path,
                            inverted: pending.inverted,
                            body,
                            raw_body,
                            open_delim: pending.open_delim,
                            close_delim: pending.close_delim,
                        },
                        Span {
                            start_line: pending.span.start_line,
                            start_col: pending.span.start_col,
                            start_offset: pending.span.start_offset,
                            end_line: span.end_line,
                            end_col: span.end_col,
                            end_offset: span.end_offset,
                        },
                    )));
                }
                Token::Partial { name, indent } => {
                    nodes.push(Node::Partial(Spanned::new(
                        ast::Partial { name, indent },
                        span,
                    )));
                }
                Token::Comment => {
                    nodes.push(Node::Comment(Spanned::new(ast::Comment, span)));
                }
                Token::DelimiterChange => {
                    nodes.push(Node::DelimiterChange(Spanned::new(
                        ast::DelimiterChange,
                        span,
                    )));
                }
            }
        }

        if let Some(pending) = stack.pop() {
            return Err(self.error_at(
                ErrorKind::UnbalancedSection,
                format!("section {:?} was never closed", pending.path),
                pending.span,
            ));
        }
        Ok(nodes)
    }

    fn error_at(&self, kind: ErrorKind, detail: String, span: Span) -> Error {
        let mut err = Error::new(kind, detail);
        err.set_location_and_span(self.name, span);
        err
    }

    fn current_line(&self) -> usize {
        self.tokenizer.current_line()
    }
}
