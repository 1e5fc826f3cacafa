/// Pointer input understood by [`PickGesture`](super::PickGesture).
///
/// Positions are window pixels with a top-left origin, the same space the
/// pick rectangle is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute window position.
    CursorMoved {
        /// Column in pixels.
        x: f32,
        /// Row in pixels.
        y: f32,
    },
    /// A button went down or up.
    MouseButton {
        /// Button that changed.
        button: MouseButton,
        /// `true` on press.
        pressed: bool,
    },
    /// Alt went down or up. Alt turns drags into camera orbits.
    ModifiersChanged {
        /// Alt held.
        alt: bool,
    },
}

impl InputEvent {
    /// Press (`true`) or release of the primary button.
    #[must_use]
    pub const fn primary(pressed: bool) -> Self {
        Self::MouseButton {
            button: MouseButton::Left,
            pressed,
        }
    }
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Drives picking.
    Left,
    /// Ignored by the pick gesture.
    Right,
    /// Ignored by the pick gesture.
    Middle,
}

impl MouseButton {
    /// Whether this button starts and ends pick gestures.
    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::Left)
    }
}
