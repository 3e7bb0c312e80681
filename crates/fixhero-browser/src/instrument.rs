//! Page instrumentation over CDP
//!
//! Implements the [`Instrumentation`] registration surface for real pages.
//! The hooks (`console.error`, `fetch`, `XMLHttpRequest`) are installed in
//! the page exactly once per load and buffer events there; [`pump`] drains
//! the buffers and fans each event out to the registered handlers — in the
//! normal wiring, into a `DiagnosticsCollector`.
//!
//! [`pump`]: PageInstrumentation::pump

use chrono::{DateTime, TimeZone, Utc};
use fixhero_core::{ConsoleErrorRecord, NetworkErrorRecord, Result};
use fixhero_diagnostics::{
    line_number_from_stack, ConsoleErrorHandler, Instrumentation, NetworkErrorHandler,
};
use serde::Deserialize;
use tracing::debug;

use crate::scripts;
use crate::session::BrowserSession;

/// Console event as buffered by the page hook
#[derive(Debug, Deserialize)]
struct RawConsoleEvent {
    message: String,
    #[serde(default)]
    stack: String,
    ts: i64,
}

/// Network event as buffered by the page hooks
#[derive(Debug, Deserialize)]
struct RawNetworkEvent {
    url: String,
    status: u16,
    #[serde(default)]
    status_text: String,
    method: String,
    ts: i64,
}

#[derive(Debug, Default, Deserialize)]
struct DrainedEvents {
    #[serde(default)]
    console: Vec<RawConsoleEvent>,
    #[serde(default)]
    network: Vec<RawNetworkEvent>,
}

/// CDP-backed instrumentation for one browser session
#[derive(Default)]
pub struct PageInstrumentation {
    console_handlers: Vec<ConsoleErrorHandler>,
    network_handlers: Vec<NetworkErrorHandler>,
    installed: bool,
}

impl PageInstrumentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Install the page hooks. Safe to call repeatedly: both this guard and
    /// the page script itself refuse to wrap twice.
    pub async fn install(&mut self, session: &BrowserSession) -> Result<()> {
        if self.installed {
            return Ok(());
        }
        let outcome = session.evaluate_script(scripts::DIAGNOSTICS_INSTALL).await?;
        debug!(
            "diagnostics hooks: {}",
            outcome.as_str().unwrap_or("unknown")
        );
        self.installed = true;
        Ok(())
    }

    /// Drain buffered page events into the registered handlers.
    ///
    /// Returns `(console, network)` event counts for this drain.
    pub async fn pump(&self, session: &BrowserSession) -> Result<(usize, usize)> {
        let drained: DrainedEvents = session.evaluate_json(scripts::DIAGNOSTICS_DRAIN).await?;
        Ok(self.dispatch(drained))
    }

    fn dispatch(&self, drained: DrainedEvents) -> (usize, usize) {
        let counts = (drained.console.len(), drained.network.len());

        for event in drained.console {
            let record = console_record(event);
            for handler in &self.console_handlers {
                handler(record.clone());
            }
        }
        for event in drained.network {
            let record = network_record(event);
            for handler in &self.network_handlers {
                handler(record.clone());
            }
        }
        counts
    }
}

impl Instrumentation for PageInstrumentation {
    fn on_console_error(&mut self, handler: ConsoleErrorHandler) {
        self.console_handlers.push(handler);
    }

    fn on_network_error(&mut self, handler: NetworkErrorHandler) {
        self.network_handlers.push(handler);
    }
}

fn console_record(event: RawConsoleEvent) -> ConsoleErrorRecord {
    ConsoleErrorRecord {
        message: event.message,
        timestamp: timestamp_from_millis(event.ts),
        source: "console".to_string(),
        line_number: line_number_from_stack(&event.stack),
    }
}

fn network_record(event: RawNetworkEvent) -> NetworkErrorRecord {
    NetworkErrorRecord {
        url: event.url,
        status: event.status,
        status_text: event.status_text,
        method: event.method,
        timestamp: timestamp_from_millis(event.ts),
    }
}

fn timestamp_from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now)
}
