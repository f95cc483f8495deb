use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind};

pub(crate) type LoadFunc = dyn for<'a> Fn(&'a str) -> Result<Option<String>, Error> + Send + Sync;

/// Safely joins two paths.
fn safe_join(base: &Path, name: &str) -> Option<PathBuf> {
    let mut rv = base.to_path_buf();
    for segment in name.split('/') {
        if segment.starts_with('.') || segment.contains('\\') {
            return None;
        }
        rv.push(segment);
    }
    Some(rv)
}

/// Helper to load partials from a given directory.
///
/// This creates a dynamic partial loader which looks up partials in the
/// given directory.  Names that start with a dot (`.`) or are contained
/// in a folder starting with a dot cannot be loaded.  A name that does
/// not resolve to a file is reported as not found, which renders as
/// empty output unless the engine operates in
/// [strict mode](crate::UndefinedBehavior::Strict).
///
/// # Example
///
/// ```rust
/// # use ministache::{path_loader, Engine};
/// fn create_engine() -> Engine<'static> {
///     let mut engine = Engine::new();
///     engine.set_partial_loader(path_loader("path/to/partials"));
///     engine
/// }
/// ```
pub fn path_loader<'x, P: AsRef<Path> + 'x>(
    dir: P,
) -> impl for<'a> Fn(&'a str) -> Result<Option<String>, Error> + Send + Sync + 'static {
    let dir = dir.as_ref().to_path_buf();
    move |name| {
        let path = match safe_join(&dir, name) {
            Some(path) => path,
            None => return Ok(None),
        };
        match fs::read_to_string(path) {
            Ok(result) => Ok(Some(result)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(
                Error::new(ErrorKind::InvalidOperation, "could not read partial").with_source(err),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use similar_asserts::assert_eq;

    #[test]
    fn test_safe_join() {
        assert_eq!(
            safe_join(Path::new("foo"), "bar/baz"),
            Some(PathBuf::from("foo").join("bar").join("baz"))
        );
        assert_eq!(safe_join(Path::new("foo"), ".bar/baz"), None);
        assert_eq!(safe_join(Path::new("foo"), "bar/.baz"), None);
        assert_eq!(safe_join(Path::new("foo"), "bar/../baz"), None);
    }
}
