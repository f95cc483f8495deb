use crate::value::Value;

/// The runtime scope stack.
///
/// Entering a section pushes the section's value, leaving it pops.  A
/// render call owns exactly one of these; nothing is shared between
/// renders.
#[derive(Debug)]
pub struct Context {
    stack: Vec<Value>,
}

impl Context {
    pub fn new(root: Value) -> Context {
        Context { stack: vec![root] }
    }

    pub fn push(&mut self, frame: Value) {
        self.stack.push(frame);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Resolves a dotted name against the stack.
    ///
    /// The first segment is looked up frame by frame from the innermost
    /// outwards and only a map frame that actually contains the key
    /// wins.  The remaining segments then step into the found value
    /// without ever consulting the stack again; a chain that breaks
    /// below the first segment short-circuits to null rather than
    /// falling back to an outer frame.  `None` is returned only when
    /// the first segment matches no frame.  `.` names the innermost
    /// frame itself.
    pub fn resolve(&self, path: &str) -> Option<Value> {
        if path == "." {
            return self.stack.last().cloned();
        }
        let mut segments = path.split('.');
        let mut current = some!(segments.next().and_then(|first| self.lookup(first)));
        for segment in segments {
            current = match step(&current, segment) {
                Some(hit) => hit,
                None => return Some(Value::NULL),
            };
        }
        Some(current)
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        self.stack
            .iter()
            .rev()
            .find_map(|frame| frame.get_attr(key))
    }
}

fn step(value: &Value, segment: &str) -> Option<Value> {
    match value.get_attr(segment) {
        Some(hit) => Some(hit),
        None => segment
            .parse::<usize>()
            .ok()
            .and_then(|idx| value.get_item_by_index(idx)),
    }
}
