use serde::Deserialize;

use crate::{cmd::Cmd, math::Vec2f};

/// One continuous pointer gesture, in the order the points were recorded.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Stroke {
    pub points: Vec<Vec2f>,
}

impl Stroke {
    pub fn new(start: Vec2f) -> Self {
        Self {
            points: vec![start],
        }
    }

    /// Whether this stroke produces any ink. Single-point strokes are kept for undo but never drawn.
    pub fn is_visible(&self) -> bool {
        self.points.len() >= 2
    }
}

/// All strokes of one character attempt, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Drawing {
    pub strokes: Vec<Stroke>,
}

impl Drawing {
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }
}

impl From<Vec<Stroke>> for Drawing {
    fn from(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }
}

/// Owns the drawing that is currently being written.
///
/// Mutation happens either through the direct methods or by feeding [`Cmd`]s into
/// [`CaptureEngine::handle`]. Downstream rendering only ever sees a [`CaptureEngine::snapshot`].
#[derive(Debug, Default)]
pub struct CaptureEngine {
    drawing: Drawing,
    /// Whether a `Cmd::Begin` is open and the last stroke is still being extended.
    active: bool,
}

impl CaptureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_stroke(&mut self, point: Vec2f) {
        self.drawing.strokes.push(Stroke::new(point));
    }

    /// Appends `point` to the last stroke. Does nothing if there are no strokes yet.
    pub fn extend_stroke(&mut self, point: Vec2f) {
        match self.drawing.strokes.last_mut() {
            Some(stroke) => stroke.points.push(point),
            None => log::trace!("ignoring point {point:?}: no stroke to extend"),
        }
    }

    pub fn undo(&mut self) {
        self.active = false;
        if self.drawing.strokes.pop().is_some() {
            log::debug!("undo; {} strokes left", self.drawing.len());
        }
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.drawing = Drawing::default();
    }

    /// Returns a detached copy of the current strokes.
    pub fn snapshot(&self) -> Drawing {
        self.drawing.clone()
    }

    pub fn stroke_count(&self) -> usize {
        self.drawing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawing.is_empty()
    }

    /// Applies one capture event.
    ///
    /// `Move` events outside of a `Begin`..`End` gesture are dropped, as are repeated `End`s.
    pub fn handle(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::Begin { position } => {
                if self.active {
                    log::trace!("`Begin` while a gesture is open; closing it first");
                }
                self.begin_stroke(position);
                self.active = true;
            }
            Cmd::Move { position } => {
                if self.active {
                    self.extend_stroke(position);
                } else {
                    log::trace!("ignoring `Move` outside of a gesture");
                }
            }
            Cmd::End => self.active = false,
            Cmd::Undo => self.undo(),
            Cmd::Clear => {
                log::info!("clearing drawing");
                self.clear();
            }
        }
    }

    /// Applies every event from `cmds` in order until the sender side hangs up.
    pub fn drain(&mut self, cmds: impl IntoIterator<Item = Cmd>) {
        for cmd in cmds {
            self.handle(cmd);
        }
    }
}
