use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::tokens::Span;

/// Container for nodes with location info.
///
/// This container fulfills two purposes: it adds location information
/// to nodes, but it also ensures the nodes are heap allocated.  The
/// latter is useful to ensure that enum variants do not cause the enum
/// to become too large.
pub struct Spanned<T> {
    node: Box<T>,
    span: Span,
}

impl<T> Spanned<T> {
    /// Creates a new spanned node.
    pub fn new(node: T, span: Span) -> Spanned<T> {
        Spanned {
            node: Box::new(node),
            span,
        }
    }

    /// Accesses the span.
    pub fn span(&self) -> Span {
        self.span
    }
}

impl<T> Deref for Spanned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.node
    }
}

impl<T> DerefMut for Spanned<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.node
    }
}

impl<T: fmt::Debug> fmt::Debug for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ok!(fmt::Debug::fmt(&self.node, f));
        write!(f, "{:?}", self.span)
    }
}

/// A node in a parsed template.
pub enum Node<'a> {
    Text(Spanned<Text<'a>>),
    Variable(Spanned<Variable<'a>>),
    Section(Spanned<Section<'a>>),
    Partial(Spanned<Partial<'a>>),
    Comment(Spanned<Comment>),
    DelimiterChange(Spanned<DelimiterChange>),
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(node) => fmt::Debug::fmt(node, f),
            Node::Variable(node) => fmt::Debug::fmt(node, f),
            Node::Section(node) => fmt::Debug::fmt(node, f),
            Node::Partial(node) => fmt::Debug::fmt(node, f),
            Node::Comment(node) => fmt::Debug::fmt(node, f),
            Node::DelimiterChange(node) => fmt::Debug::fmt(node, f),
        }
    }
}

/// Raw template text emitted verbatim.
#[derive(Debug)]
pub struct Text<'a> {
    pub text: &'a str,
}

/// A variable interpolation tag.
#[derive(Debug)]
pub struct Variable<'a> {
    pub path: &'a str,
    pub escape: bool,
}

/// A section with its parsed subtree.
///
/// `raw_body` is the verbatim source between the open and the close tag.
/// It is what a lambda receives instead of the parsed body, together
/// with the delimiters that were active at the open tag so that the
/// returned text can be parsed the same way the body would have been.
#[derive(Debug)]
pub struct Section<'a> {
    pub path: &'a str,
    pub inverted: bool,
    pub body: Vec<Node<'a>>,
    pub raw_body: &'a str,
    pub open_delim: &'a str,
    pub close_delim: &'a str,
}

/// A reference to a partial.
///
/// `indent` is the whitespace that preceded a standalone partial tag.
/// It gets prepended to every line the partial renders.
#[derive(Debug)]
pub struct Partial<'a> {
    pub name: &'a str,
    pub indent: &'a str,
}

/// A comment tag.  Produces no output.
#[derive(Debug)]
pub struct Comment;

/// A delimiter change tag.
///
/// The delimiter switch itself already happened during tokenization;
/// the node only remains so that the tree accounts for every tag.
#[derive(Debug)]
pub struct DelimiterChange;
