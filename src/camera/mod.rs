//! Camera system for the picking harness.
//!
//! Provides the view frustum used to build (and narrow) projections, clip
//! plane extraction for culling, and the rotate/translate test camera.

/// Rotate/translate camera producing the view matrix.
pub mod core;
/// Clip plane extraction and intersection tests.
pub mod culling;
/// Projection frustum with an explicit window, for narrowed pick projections.
pub mod frustum;

pub use self::core::TestCamera;
pub use culling::ClipPlanes;
pub use frustum::{Frustum, ProjectionKind};
