use std::collections::BTreeMap;
use std::fmt;

use crate::error::Error;
use crate::output::Output;
use crate::value::Value;

pub(crate) struct BTreeMapKeysDebug<'a, K: fmt::Debug, V>(pub &'a BTreeMap<K, V>);

impl<'a, K: fmt::Debug, V> fmt::Debug for BTreeMapKeysDebug<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(|x| x.0)).finish()
    }
}

pub(crate) struct OnDrop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> OnDrop<F> {
    pub fn new(f: F) -> Self {
        Self(Some(f))
    }
}

impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

// serde length hints are not trustworthy for preallocation
#[inline(always)]
pub(crate) fn untrusted_size_hint(value: usize) -> usize {
    value.min(1024)
}

/// Finds a needle in a haystack of bytes.
pub(crate) fn memstr(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Controls how missing names behave during rendering.
///
/// Mustache is lenient by default: a name that cannot be resolved renders
/// as nothing and an unknown partial expands to the empty string.  Strict
/// mode turns both into errors which is useful to catch typos in templates
/// during development.
///
/// Section tags are not affected: testing an absent name for truthiness is
/// how optional blocks are written in mustache, so `{{#missing}}` simply
/// skips its body in either mode.
///
/// ```rust
/// # use ministache::{Engine, UndefinedBehavior};
/// let mut engine = Engine::new();
/// engine.set_undefined_behavior(UndefinedBehavior::Strict);
/// assert!(engine.render_str("{{typo}}", ()).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedBehavior {
    /// Missing names render as nothing, unknown partials as the empty
    /// string.  This is the default and what other mustache
    /// implementations do.
    #[default]
    Lenient,
    /// A variable tag whose first path segment matches no frame fails
    /// with [`UndefinedVariable`](crate::ErrorKind::UndefinedVariable)
    /// and an unknown partial fails with
    /// [`PartialNotFound`](crate::ErrorKind::PartialNotFound).  A
    /// dotted chain that breaks below the first segment still renders
    /// empty.
    Strict,
}

/// Helper to HTML escape a string.
///
/// The escape set is the one interpolation uses: `&`, `<`, `>`, `"` and
/// `'`.  The struct wraps a `&str` and implements [`Display`](fmt::Display)
/// emitting the escaped form.
///
/// ```rust
/// # use ministache::HtmlEscape;
/// assert_eq!(HtmlEscape("<b>").to_string(), "&lt;b&gt;");
/// ```
pub struct HtmlEscape<'a>(pub &'a str);

impl fmt::Display for HtmlEscape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.as_bytes();
        let mut start = 0;
        for (i, b) in bytes.iter().enumerate() {
            macro_rules! escaping_body {
                ($quote:expr) => {{
                    if start < i {
                        // split points are on ascii bytes so the slice
                        // stays valid utf-8
                        ok!(f.write_str(unsafe {
                            std::str::from_utf8_unchecked(&bytes[start..i])
                        }));
                    }
                    ok!(f.write_str($quote));
                    start = i + 1;
                }};
            }
            match *b {
                b'<' => escaping_body!("&lt;"),
                b'>' => escaping_body!("&gt;"),
                b'&' => escaping_body!("&amp;"),
                b'"' => escaping_body!("&quot;"),
                b'\'' => escaping_body!("&#x27;"),
                _ => {}
            }
        }
        if start < bytes.len() {
            f.write_str(unsafe { std::str::from_utf8_unchecked(&bytes[start..]) })
        } else {
            Ok(())
        }
    }
}

/// Writes the display form of a value escaped into the output.
pub(crate) fn write_escaped(out: &mut Output, value: &Value) -> Result<(), Error> {
    let rv = match value.as_str() {
        Some(s) => write!(out, "{}", HtmlEscape(s)),
        None => write!(out, "{}", HtmlEscape(&value.to_string())),
    };
    rv.map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn test_html_escape() {
        let input = "<>&\"'/";
        let rv = HtmlEscape(input).to_string();
        assert_eq!(rv, "&lt;&gt;&amp;&quot;&#x27;/");
    }

    #[test]
    fn test_html_escape_passthrough() {
        let input = "hello köln";
        let rv = HtmlEscape(input).to_string();
        assert_eq!(rv, input);
    }

    #[test]
    fn test_memstr() {
        assert_eq!(memstr(b"a{{b", b"{{"), Some(1));
        assert_eq!(memstr(b"a{b", b"{{"), None);
        assert_eq!(memstr(b"", b"}}"), None);
    }
}
