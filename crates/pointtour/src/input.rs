//! Pointer input.

use glam::Vec2;

/// Threshold for distinguishing click from drag (in pixels).
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button or single touch: orbit, click.
    Primary,
    /// Right button: pan.
    Secondary,
}

/// Input the viewer reacts to, in window pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A press and release without significant motion.
    Click {
        /// Pointer position (origin top-left).
        position: Vec2,
    },
    /// Pointer motion with a button held.
    Drag {
        /// Motion since the previous event, in pixels.
        delta: Vec2,
        /// Button held during the motion.
        button: PointerButton,
    },
    /// Wheel motion; positive values zoom in.
    Scroll {
        /// Wheel delta in lines.
        delta: f32,
    },
    /// The window was resized.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}

/// Turns raw button and motion events into [`InputEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Vec2,
    held: Option<PointerButton>,
    drag_distance: f32,
}

impl PointerTracker {
    /// Creates a tracker with no button held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Records a button press.
    pub fn press(&mut self, button: PointerButton, position: Vec2) {
        self.position = position;
        self.held = Some(button);
        self.drag_distance = 0.0;
    }

    /// Records pointer motion; yields a drag while a button is held.
    pub fn motion(&mut self, position: Vec2) -> Option<InputEvent> {
        let delta = position - self.position;
        self.position = position;
        let button = self.held?;
        self.drag_distance += delta.x.abs() + delta.y.abs();
        Some(InputEvent::Drag { delta, button })
    }

    /// Records a button release; yields a click if the primary button barely
    /// moved while held.
    pub fn release(&mut self, button: PointerButton, position: Vec2) -> Option<InputEvent> {
        let delta = position - self.position;
        self.drag_distance += delta.x.abs() + delta.y.abs();
        self.position = position;
        if self.held != Some(button) {
            return None;
        }
        self.held = None;

        (button == PointerButton::Primary && self.drag_distance < DRAG_THRESHOLD)
            .then_some(InputEvent::Click { position })
    }
}
