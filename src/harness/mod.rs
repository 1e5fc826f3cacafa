//! Drawing harness and the scripted repr/refine picking scenario.

/// Mouse-driven drawing harness around the engine.
pub mod driver;
/// The scripted scenario and its report.
pub mod scenario;
/// Non-fatal oracle checks.
pub mod verify;

pub use driver::TestDriver;
pub use scenario::{run_repr_refine_scenario, ScenarioReport, StepReport};
pub use verify::Verifier;
