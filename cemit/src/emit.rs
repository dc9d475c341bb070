use cemit_core::CodeWriter;

use crate::Context;

/// Anything that renders as source text against an arena.
///
/// Emission never mutates the arena; the same node renders the same text
/// every time.
pub trait Emit {
    fn emit(&self, cx: &Context, w: &mut CodeWriter);

    /// Render into a fresh string.
    fn to_code(&self, cx: &Context) -> String {
        CodeWriter::capture(|w| self.emit(cx, w))
    }
}

impl<T: Emit + ?Sized> Emit for &T {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        (**self).emit(cx, w);
    }
}
