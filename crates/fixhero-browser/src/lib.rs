//! Browser boundary for FixHero captures
//!
//! Everything that touches a live page goes through this crate, over the
//! Chrome DevTools Protocol:
//!
//! - **Session management**: launch or connect to Chrome, navigate, evaluate
//! - **Page instrumentation**: install the console/fetch/XHR hooks once per
//!   page and pump buffered events into a diagnostics collector
//! - **DOM extraction**: pull a pruned element tree out of the page for the
//!   pure locator/snapshot code in `fixhero-dom`
//! - **Screenshots**: viewport or element PNGs as base64 data URLs
//! - **Inspection**: the [`fixhero_inspector::InspectionSurface`]
//!   implementation plus a polling runner for interactive hover/click
//!   capture sessions
//!
//! # Requirements
//!
//! Chrome or Chromium installed; for connecting to an existing browser run
//! it with `--remote-debugging-port=9222`.

pub mod instrument;
pub mod screenshot;
pub mod session;

mod dom_reader;
mod inspect;
mod scripts;

pub use dom_reader::extract_dom;
pub use inspect::{capture_by_selector, InspectionRunner, PageSurface};
pub use instrument::PageInstrumentation;
pub use screenshot::{capture_data_url, capture_png, to_data_url, ScreenshotOptions};
pub use session::{BrowserConfig, BrowserSession};
