use std::fmt;

use crate::ast::Node;
use crate::error::ErrorKind;
use crate::tokens::Span;
use crate::value::Value;

/// A snapshot of the information the engine had when an error happened.
#[derive(Default)]
pub(crate) struct DebugInfo {
    pub(crate) template_source: Option<String>,
    pub(crate) context: Option<Value>,
    pub(crate) referenced_names: Option<Vec<String>>,
}

struct VarPrinter<'x>(Value, &'x [String]);

impl fmt::Debug for VarPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_struct("Referenced variables:");
        let mut vars = self.1.to_owned();
        vars.sort();
        for var in &vars {
            match self.0.get_attr(var) {
                Some(val) => m.field(var, &val),
                None => m.field(var, &Value::NULL),
            };
        }
        m.finish()
    }
}

/// Collects the names a template looks up, for the error printout.
pub(crate) fn collect_referenced_names(nodes: &[Node<'_>]) -> Vec<String> {
    fn walk(nodes: &[Node<'_>], rv: &mut Vec<String>) {
        for node in nodes {
            let path = match node {
                Node::Variable(var) => var.path,
                Node::Section(section) => {
                    walk(&section.body, rv);
                    section.path
                }
                _ => continue,
            };
            if path == "." {
                continue;
            }
            let first = path.split('.').next().unwrap_or(path);
            if !first.is_empty() && !rv.iter().any(|x| x == first) {
                rv.push(first.to_string());
            }
        }
    }
    let mut rv = Vec::new();
    walk(nodes, &mut rv);
    rv
}

pub(crate) fn render_debug_info(
    f: &mut fmt::Formatter,
    name: Option<&str>,
    kind: ErrorKind,
    line: Option<usize>,
    span: Option<Span>,
    info: &DebugInfo,
) -> fmt::Result {
    if let Some(source) = info.template_source.as_deref() {
        let title = format!(
            " {} ",
            name.unwrap_or_default()
                .rsplit(&['/', '\\'])
                .next()
                .unwrap_or("Template Source")
        );
        ok!(writeln!(f));
        ok!(writeln!(f, "{:-^1$}", title, 79));
        let lines: Vec<_> = source.lines().enumerate().collect();
        let idx = line.unwrap_or(1).saturating_sub(1);
        let skip = idx.saturating_sub(3);
        let pre = lines.iter().skip(skip).take(3.min(idx)).collect::<Vec<_>>();
        let post = lines.iter().skip(idx + 1).take(3).collect::<Vec<_>>();
        for (idx, line) in pre {
            ok!(writeln!(f, "{:>4} | {}", idx + 1, line));
        }
        if let Some((idx, line)) = lines.get(idx) {
            ok!(writeln!(f, "{:>4} > {}", idx + 1, line));
            if let Some(span) = span {
                if span.start_line == span.end_line {
                    ok!(writeln!(
                        f,
                        "     i {}{} {}",
                        " ".repeat(span.start_col as usize),
                        "^".repeat((span.end_col - span.start_col) as usize),
                        kind,
                    ));
                }
            }
        }
        for (idx, line) in post {
            ok!(writeln!(f, "{:>4} | {}", idx + 1, line));
        }
        ok!(write!(f, "{:~^1$}", "", 79));
    }
    if let Some(ref ctx) = info.context {
        if let Some(ref vars) = info.referenced_names {
            ok!(writeln!(f));
            ok!(writeln!(f, "{:#?}", VarPrinter(ctx.clone(), vars)));
            ok!(write!(f, "{:-^1$}", "", 79));
        }
    }
    Ok(())
}
