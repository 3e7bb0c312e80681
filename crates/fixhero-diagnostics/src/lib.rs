//! # fixhero-diagnostics
//!
//! Console/network error context for captured issues.
//!
//! The page-side hooks (installed by `fixhero-browser`) observe
//! `console.error` calls and failed requests; this crate owns where those
//! events go: a [`DiagnosticsCollector`] backed by bounded ring buffers with
//! overwrite-oldest eviction, shared by cheap-clone handle between the
//! instrumentation that appends and the issue assembly that reads the most
//! recent entries.
//!
//! The interception mechanism itself stays behind the [`Instrumentation`]
//! trait so the collector is unit-testable without any global patching: see
//! [`ManualInstrumentation`].

mod collector;
mod instrument;
mod ring;

pub use collector::{line_number_from_stack, DiagnosticsCollector};
pub use instrument::{
    attach, ConsoleErrorHandler, Instrumentation, ManualInstrumentation, NetworkErrorHandler,
};
pub use ring::RingBuffer;
