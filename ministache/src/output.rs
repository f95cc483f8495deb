use std::fmt;

/// An abstraction over the output target of the renderer.
///
/// This is a utility type which can be written into like one writes
/// into an [`std::fmt::Write`] value.  Rendering collects into a
/// [`String`] buffer behind it.
pub struct Output<'a> {
    buf: &'a mut String,
}

impl<'a> Output<'a> {
    /// Creates an output writing into a string buffer.
    pub fn with_string(buf: &'a mut String) -> Output<'a> {
        Output { buf }
    }

    #[inline]
    pub fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }

    #[inline]
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        fmt::Write::write_fmt(&mut *self.buf, args)
    }
}

impl fmt::Write for Output<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        self.buf.push(c);
        Ok(())
    }
}
