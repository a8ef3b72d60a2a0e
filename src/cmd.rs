use crate::math::Vec2f;

/// Capture events, consumed in order by [`CaptureEngine::handle`].
///
/// [`CaptureEngine::handle`]: crate::capture::CaptureEngine::handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cmd {
    /// Pointer went down; starts a new stroke.
    Begin {
        /// Pointer position in canvas pixels.
        position: Vec2f,
    },
    /// Pointer moved while down.
    Move { position: Vec2f },
    /// Pointer went up or left the canvas.
    End,

    Undo,
    Clear,
}
