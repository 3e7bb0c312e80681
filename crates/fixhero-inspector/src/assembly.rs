//! Issue assembly
//!
//! Merges a captured element snapshot, an optional screenshot, and the most
//! recent buffered errors into an [`Issue`], then hands it to the injected
//! [`IssueSink`]. Assembly never owns persistence: a sink failure is logged
//! and the issue is dropped from the publish path, with no retry and no
//! durable fallback here.

use async_trait::async_trait;
use fixhero_core::fail_open::fail_open;
use fixhero_core::{ElementSnapshot, Issue, PageContext, Result};
use fixhero_diagnostics::DiagnosticsCollector;
use std::sync::Arc;
use tracing::{debug, info};

/// Where assembled issues are published
#[async_trait]
pub trait IssueSink: Send + Sync {
    async fn publish(&self, issue: &Issue) -> Result<()>;
}

/// Builds and publishes issues for one capture session
#[derive(Clone)]
pub struct IssueAssembler {
    collector: DiagnosticsCollector,
    sink: Arc<dyn IssueSink>,
    /// How many recent errors of each kind to attach
    error_context: usize,
}

impl IssueAssembler {
    pub fn new(collector: DiagnosticsCollector, sink: Arc<dyn IssueSink>) -> Self {
        Self {
            collector,
            sink,
            error_context: 5,
        }
    }

    pub fn with_error_context(mut self, error_context: usize) -> Self {
        self.error_context = error_context;
        self
    }

    /// Assemble an issue from the capture material and the error buffers.
    ///
    /// Stamps the id (base-36 millisecond token), capture timestamp, page
    /// url/title, and the default severity/status.
    pub fn assemble(
        &self,
        page: &PageContext,
        element: Option<ElementSnapshot>,
        screenshot: Option<String>,
    ) -> Issue {
        let mut issue = Issue::new(page.url.clone(), page.title.clone());
        issue.element = element;
        issue.screenshot = screenshot;
        issue.console_errors = self.collector.recent_console(self.error_context);
        issue.network_errors = self.collector.recent_network(self.error_context);

        debug!(
            "assembled issue {} ({} console, {} network errors)",
            issue.id,
            issue.console_errors.len(),
            issue.network_errors.len()
        );
        issue
    }

    /// Publish through the sink; on failure, log a warning and drop.
    ///
    /// Returns the issue either way so callers can still display it.
    pub async fn publish_or_drop(&self, issue: Issue) -> Issue {
        let published = fail_open("issue sink publish", || self.sink.publish(&issue))
            .await
            .is_some();
        if published {
            info!("issue {} published", issue.id);
        }
        issue
    }

    /// Assemble and publish in one step
    pub async fn submit(
        &self,
        page: &PageContext,
        element: Option<ElementSnapshot>,
        screenshot: Option<String>,
    ) -> Issue {
        let issue = self.assemble(page, element, screenshot);
        self.publish_or_drop(issue).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixhero_core::{ConsoleErrorRecord, InspectorError, NetworkErrorRecord, Severity};
    use std::sync::Mutex;

    /// Sink double that records published issues
    #[derive(Default)]
    struct RecordingSink {
        published: Mutex<Vec<Issue>>,
        fail: bool,
    }

    impl RecordingSink {
        fn failing() -> Self {
            Self {
                published: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn count(&self) -> usize {
            self.published.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl IssueSink for RecordingSink {
        async fn publish(&self, issue: &Issue) -> Result<()> {
            if self.fail {
                return Err(InspectorError::Sink("host channel unavailable".to_string()));
            }
            self.published.lock().unwrap().push(issue.clone());
            Ok(())
        }
    }

    fn assembler_with(sink: Arc<RecordingSink>) -> (IssueAssembler, DiagnosticsCollector) {
        let collector = DiagnosticsCollector::default();
        let assembler = IssueAssembler::new(collector.clone(), sink);
        (assembler, collector)
    }

    #[test]
    fn test_assemble_slices_last_five_of_each_buffer() {
        let (assembler, collector) = assembler_with(Arc::new(RecordingSink::default()));

        for i in 0..8 {
            collector.record_console(ConsoleErrorRecord::new(format!("c{}", i), 0));
        }
        for i in 0..3 {
            collector.record_network(NetworkErrorRecord::new(
                format!("https://api.test/{}", i),
                500,
                "Internal Server Error",
                "GET",
            ));
        }

        let page = PageContext::new("https://app.test/cart", "Cart");
        let issue = assembler.assemble(&page, None, None);

        assert_eq!(issue.console_errors.len(), 5);
        assert_eq!(issue.console_errors[0].message, "c3");
        assert_eq!(issue.console_errors[4].message, "c7");
        assert_eq!(issue.network_errors.len(), 3);
    }

    #[test]
    fn test_assemble_stamps_identity_and_defaults() {
        let (assembler, _) = assembler_with(Arc::new(RecordingSink::default()));
        let page = PageContext::new("https://app.test/checkout", "Checkout — App");

        let issue = assembler.assemble(&page, None, None);

        assert_eq!(issue.url, "https://app.test/checkout");
        assert_eq!(issue.title, "Checkout — App");
        assert_eq!(issue.severity, Severity::Medium);
        let millis = u64::from_str_radix(&issue.id, 36).unwrap();
        assert_eq!(millis as i64, issue.timestamp.timestamp_millis());
    }

    #[tokio::test]
    async fn test_publish_delivers_to_sink() {
        let sink = Arc::new(RecordingSink::default());
        let (assembler, _) = assembler_with(sink.clone());

        let page = PageContext::new("https://app.test", "App");
        assembler.submit(&page, None, None).await;

        assert_eq!(sink.count(), 1);
    }

    #[tokio::test]
    async fn test_sink_failure_drops_without_error() {
        let sink = Arc::new(RecordingSink::failing());
        let (assembler, _) = assembler_with(sink.clone());

        let page = PageContext::new("https://app.test", "App");
        let issue = assembler.submit(&page, None, None).await;

        // Dropped from the publish path, still returned for display.
        assert_eq!(sink.count(), 0);
        assert!(!issue.id.is_empty());
    }

    #[test]
    fn test_error_context_window_is_configurable() {
        let (assembler, collector) = assembler_with(Arc::new(RecordingSink::default()));
        let assembler = assembler.with_error_context(2);

        for i in 0..4 {
            collector.record_console(ConsoleErrorRecord::new(format!("c{}", i), 0));
        }

        let issue = assembler.assemble(&PageContext::default(), None, None);
        assert_eq!(issue.console_errors.len(), 2);
        assert_eq!(issue.console_errors[0].message, "c2");
    }
}
