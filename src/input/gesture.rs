use glam::{IVec2, Vec2};

use super::event::InputEvent;

/// Degrees of camera rotation per pixel of alt-drag.
const ORBIT_DEGREES_PER_PIXEL: f32 = 1.0;

/// What the caller should do after an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Nothing to do.
    None,
    /// The marquee changed; redraw it.
    Marquee {
        /// Press position.
        start: IVec2,
        /// Current cursor position.
        end: IVec2,
    },
    /// Run a pick over `start..end` (a click when both are equal).
    Pick {
        /// Press position.
        start: IVec2,
        /// Release position.
        end: IVec2,
    },
    /// Rotate the camera by this many degrees (around y, then x).
    Orbit {
        /// Rotation delta.
        delta: Vec2,
    },
}

/// Press/drag/release state machine for pick gestures.
///
/// Press records `start = end`; moves update `end`; release yields a pick and
/// resets both corners. While alt is held, moves orbit the camera instead and
/// release does not pick. Letting go of alt mid-drag resumes the marquee from
/// the press position.
#[derive(Debug, Default)]
pub struct PickGesture {
    cursor: Vec2,
    alt: bool,
    pressed: bool,
    start: IVec2,
    end: IVec2,
}

impl PickGesture {
    /// Idle gesture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the primary button is down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pressed
    }

    /// Current drag rectangle, while the button is down and alt is not.
    #[must_use]
    pub fn marquee(&self) -> Option<(IVec2, IVec2)> {
        (self.pressed && !self.alt).then_some((self.start, self.end))
    }

    /// Feed one event.
    pub fn handle_event(&mut self, event: InputEvent) -> GestureOutcome {
        match event {
            InputEvent::CursorMoved { x, y } => {
                let position = Vec2::new(x, y);
                let delta = position - self.cursor;
                self.cursor = position;
                self.handle_move(delta)
            }
            InputEvent::MouseButton { button, pressed } => {
                if !button.is_primary() {
                    GestureOutcome::None
                } else if pressed {
                    self.handle_press()
                } else {
                    self.handle_release()
                }
            }
            InputEvent::ModifiersChanged { alt } => {
                self.alt = alt;
                GestureOutcome::None
            }
        }
    }

    fn cursor_pixel(&self) -> IVec2 {
        self.cursor.floor().as_ivec2()
    }

    fn handle_press(&mut self) -> GestureOutcome {
        self.pressed = true;
        self.start = self.cursor_pixel();
        self.end = self.start;
        if self.alt {
            return GestureOutcome::None;
        }
        GestureOutcome::Marquee {
            start: self.start,
            end: self.end,
        }
    }

    fn handle_move(&mut self, delta: Vec2) -> GestureOutcome {
        if !self.pressed {
            return GestureOutcome::None;
        }
        if self.alt {
            return GestureOutcome::Orbit {
                delta: delta * ORBIT_DEGREES_PER_PIXEL,
            };
        }
        self.end = self.cursor_pixel();
        GestureOutcome::Marquee {
            start: self.start,
            end: self.end,
        }
    }

    fn handle_release(&mut self) -> GestureOutcome {
        if !self.pressed {
            return GestureOutcome::None;
        }
        self.pressed = false;
        let outcome = if self.alt {
            GestureOutcome::None
        } else {
            GestureOutcome::Pick {
                start: self.start,
                end: self.cursor_pixel(),
            }
        };
        self.start = IVec2::ZERO;
        self.end = IVec2::ZERO;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;

    fn move_to(g: &mut PickGesture, x: f32, y: f32) -> GestureOutcome {
        g.handle_event(InputEvent::CursorMoved { x, y })
    }

    fn left(g: &mut PickGesture, pressed: bool) -> GestureOutcome {
        g.handle_event(InputEvent::primary(pressed))
    }

    #[test]
    fn click_picks_a_single_point() {
        let mut g = PickGesture::new();
        let _ = move_to(&mut g, 10.4, 20.9);
        let _ = left(&mut g, true);
        let outcome = left(&mut g, false);
        let p = IVec2::new(10, 20);
        assert_eq!(outcome, GestureOutcome::Pick { start: p, end: p });
        assert!(!g.is_active());
    }

    #[test]
    fn drag_updates_marquee_and_picks_on_release() {
        let mut g = PickGesture::new();
        let _ = move_to(&mut g, 100.0, 100.0);
        let _ = left(&mut g, true);
        let outcome = move_to(&mut g, 50.0, 140.0);
        let start = IVec2::new(100, 100);
        let end = IVec2::new(50, 140);
        assert_eq!(outcome, GestureOutcome::Marquee { start, end });
        assert_eq!(g.marquee(), Some((start, end)));
        assert_eq!(left(&mut g, false), GestureOutcome::Pick { start, end });
        assert_eq!(g.marquee(), None);
    }

    #[test]
    fn alt_drag_orbits_without_picking() {
        let mut g = PickGesture::new();
        let _ = g.handle_event(InputEvent::ModifiersChanged { alt: true });
        let _ = move_to(&mut g, 10.0, 10.0);
        let _ = left(&mut g, true);
        let outcome = move_to(&mut g, 15.0, 8.0);
        assert_eq!(
            outcome,
            GestureOutcome::Orbit {
                delta: Vec2::new(5.0, -2.0)
            }
        );
        assert_eq!(g.marquee(), None);
        assert_eq!(left(&mut g, false), GestureOutcome::None);
    }

    #[test]
    fn alt_released_mid_drag_picks_from_the_press_position() {
        let mut g = PickGesture::new();
        let _ = move_to(&mut g, 100.0, 100.0);
        let _ = left(&mut g, true);
        let _ = left(&mut g, false);

        let _ = g.handle_event(InputEvent::ModifiersChanged { alt: true });
        let _ = move_to(&mut g, 10.0, 10.0);
        let _ = left(&mut g, true);
        let _ = g.handle_event(InputEvent::ModifiersChanged { alt: false });
        let _ = move_to(&mut g, 12.0, 12.0);
        assert_eq!(
            left(&mut g, false),
            GestureOutcome::Pick {
                start: IVec2::new(10, 10),
                end: IVec2::new(12, 12),
            }
        );
        assert_eq!(g.marquee(), None);
    }

    #[test]
    fn other_buttons_and_idle_moves_are_ignored() {
        let mut g = PickGesture::new();
        assert_eq!(move_to(&mut g, 3.0, 3.0), GestureOutcome::None);
        assert_eq!(
            g.handle_event(InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: true,
            }),
            GestureOutcome::None
        );
        assert_eq!(left(&mut g, false), GestureOutcome::None);
    }
}
