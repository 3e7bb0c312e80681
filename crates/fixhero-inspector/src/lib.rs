//! # fixhero-inspector
//!
//! The capture workflow: an explicit state machine for inspection mode
//! (hover-highlight, click-to-capture), assembly of captured material into
//! [`fixhero_core::Issue`] records, and the command/event contract with the
//! host driving the inspector.
//!
//! The crate is platform-free. The pieces that touch a real page are
//! abstracted behind two narrow traits: [`InspectionSurface`] (highlighting,
//! listener wiring, element capture) and [`IssueSink`] (where finished
//! issues go). `fixhero-browser` provides the CDP implementations.

mod assembly;
mod commands;
mod controller;
mod state;

pub use assembly::{IssueAssembler, IssueSink};
pub use commands::{InspectorCommand, InspectorEvent};
pub use controller::{CapturedElement, InspectionController, InspectionSurface};
pub use state::{transition, Effect, InspectionEvent, InspectionState, NodeHandle};
