//! Instrumentation adapter interface
//!
//! Whatever observes `console.error` and failed requests implements
//! [`Instrumentation`]; the core only ever registers handlers. The browser
//! implementation lives at the platform boundary in `fixhero-browser`;
//! [`ManualInstrumentation`] is the in-process double for tests and
//! non-browser hosts.

use fixhero_core::{ConsoleErrorRecord, NetworkErrorRecord};

use crate::collector::DiagnosticsCollector;

pub type ConsoleErrorHandler = Box<dyn Fn(ConsoleErrorRecord) + Send + Sync>;
pub type NetworkErrorHandler = Box<dyn Fn(NetworkErrorRecord) + Send + Sync>;

/// Registration surface for error-event sources
pub trait Instrumentation {
    fn on_console_error(&mut self, handler: ConsoleErrorHandler);
    fn on_network_error(&mut self, handler: NetworkErrorHandler);
}

/// Route every event from `instrumentation` into `collector`
pub fn attach(instrumentation: &mut dyn Instrumentation, collector: &DiagnosticsCollector) {
    let console_sink = collector.clone();
    instrumentation.on_console_error(Box::new(move |record| console_sink.record_console(record)));

    let network_sink = collector.clone();
    instrumentation.on_network_error(Box::new(move |record| network_sink.record_network(record)));
}

/// Hand-driven instrumentation for tests and embedding without a browser
#[derive(Default)]
pub struct ManualInstrumentation {
    console_handlers: Vec<ConsoleErrorHandler>,
    network_handlers: Vec<NetworkErrorHandler>,
}

impl ManualInstrumentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_console(&self, record: ConsoleErrorRecord) {
        for handler in &self.console_handlers {
            handler(record.clone());
        }
    }

    pub fn emit_network(&self, record: NetworkErrorRecord) {
        for handler in &self.network_handlers {
            handler(record.clone());
        }
    }
}

impl Instrumentation for ManualInstrumentation {
    fn on_console_error(&mut self, handler: ConsoleErrorHandler) {
        self.console_handlers.push(handler);
    }

    fn on_network_error(&mut self, handler: NetworkErrorHandler) {
        self.network_handlers.push(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_routes_console_events() {
        let collector = DiagnosticsCollector::default();
        let mut instrumentation = ManualInstrumentation::new();
        attach(&mut instrumentation, &collector);

        instrumentation.emit_console(ConsoleErrorRecord::new("Uncaught TypeError", 12));

        let recent = collector.recent_console(5);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].message, "Uncaught TypeError");
        assert_eq!(recent[0].line_number, 12);
        assert_eq!(recent[0].source, "console");
    }

    #[test]
    fn test_failed_response_grows_network_buffer_by_one() {
        let collector = DiagnosticsCollector::default();
        let mut instrumentation = ManualInstrumentation::new();
        attach(&mut instrumentation, &collector);

        let before = collector.network_len();
        instrumentation.emit_network(NetworkErrorRecord::new(
            "https://api.test/users",
            404,
            "Not Found",
            "GET",
        ));

        assert_eq!(collector.network_len(), before + 1);
        let record = &collector.recent_network(1)[0];
        assert_eq!(record.url, "https://api.test/users");
        assert_eq!(record.status, 404);
        assert_eq!(record.status_text, "Not Found");
        assert_eq!(record.method, "GET");
    }

    #[test]
    fn test_events_before_attach_are_dropped() {
        let collector = DiagnosticsCollector::default();
        let instrumentation = ManualInstrumentation::new();

        instrumentation.emit_console(ConsoleErrorRecord::new("unseen", 0));
        assert_eq!(collector.console_len(), 0);
    }
}
