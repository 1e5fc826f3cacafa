// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![warn(unused_results)]
#![warn(unused_qualifications)]
// Cast hygiene
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]

//! ID-buffer picking over two independently styled render collections.
//!
//! A scene of objects is drawn through a *display* collection (`geometry`)
//! and picked through a separate *pick* collection (`pickables`). Each
//! collection carries its own representation selector, so the pick pass can
//! request refined geometry while the display draws a coarse hull. Per-object
//! authored representations override either collection default.
//!
//! # Key entry points
//!
//! - [`engine::PickEngine`] - render/pick orchestration
//! - [`picking`] - pick resolution math, hit resolution, selections
//! - [`render_index::RenderIndex`] - scene, change tracking and draw batches
//! - [`options::Options`] - TOML-backed configuration
//! - [`harness`] - the scripted repr/refine picking scenario
//!
//! # Invalidation
//!
//! Style edits (refine level, representation name) mark the object dirty and
//! request garbage collection. The next render or pick bumps every registered
//! collection, so both draw batch caches rebuild wholesale before drawing.

pub mod camera;
pub mod change_tracker;
pub mod collection;
pub mod engine;
pub mod error;
pub mod harness;
pub mod input;
pub mod options;
pub mod picking;
pub mod render;
pub mod render_index;
pub mod repr;
pub mod scene;

pub use error::PickError;
