//! Input handling: event types and the pick gesture state machine that
//! converts raw pointer events into marquee updates and picks.

/// Platform-agnostic input events.
pub mod event;
/// Press/drag/release tracking for pick rectangles.
pub mod gesture;

pub use event::{InputEvent, MouseButton};
pub use gesture::{GestureOutcome, PickGesture};
