//! Interactive inspection over CDP
//!
//! [`PageSurface`] implements the controller's effect surface: highlight
//! toggling, listener wiring, and element capture all run as page scripts.
//! [`InspectionRunner`] owns the polling loop that turns queued page events
//! into state-machine events, and dispatches host commands.

use async_trait::async_trait;
use fixhero_core::config::CaptureConfig;
use fixhero_core::fail_open::fail_open;
use fixhero_core::{InspectorError, Issue, Result};
use fixhero_diagnostics::DiagnosticsCollector;
use fixhero_inspector::{
    CapturedElement, InspectionController, InspectionEvent, InspectionSurface, InspectorCommand,
    InspectorEvent, IssueAssembler, IssueSink, NodeHandle,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::dom_reader::extract_dom;
use crate::instrument::PageInstrumentation;
use crate::screenshot::{capture_data_url, ScreenshotOptions};
use crate::scripts;
use crate::session::BrowserSession;

const POLL_INTERVAL: Duration = Duration::from_millis(150);

/// Pointer event as queued by the page listeners
#[derive(Debug, Deserialize)]
struct RawInspectEvent {
    kind: String,
    #[serde(default)]
    handle: Option<String>,
}

fn to_inspection_event(raw: RawInspectEvent) -> Option<InspectionEvent> {
    match (raw.kind.as_str(), raw.handle) {
        ("over", Some(handle)) => Some(InspectionEvent::PointerOver(handle)),
        ("out", Some(handle)) => Some(InspectionEvent::PointerOut(handle)),
        ("click", _) => Some(InspectionEvent::Click),
        (kind, _) => {
            debug!("Ignoring unknown page event kind: {}", kind);
            None
        }
    }
}

/// Capture an element by CSS selector: snapshot, page context, and (fail-
/// open) screenshot.
pub async fn capture_by_selector(
    session: &BrowserSession,
    selector: &str,
    with_screenshot: bool,
) -> Result<CapturedElement> {
    let capture = extract_dom(session, selector).await?;
    let snapshot = fixhero_dom::snapshot::build_snapshot(&capture.root, &capture.target_path);
    let page = session.page_context().await?;

    let screenshot = if with_screenshot {
        fail_open("element screenshot", || {
            capture_data_url(session, ScreenshotOptions::element(selector))
        })
        .await
    } else {
        None
    };

    Ok(CapturedElement {
        page,
        snapshot,
        screenshot,
    })
}

/// [`InspectionSurface`] implementation backed by page scripts
pub struct PageSurface {
    session: Arc<BrowserSession>,
    screenshots: bool,
}

impl PageSurface {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self {
            session,
            screenshots: true,
        }
    }

    pub fn with_screenshots(mut self, screenshots: bool) -> Self {
        self.screenshots = screenshots;
        self
    }
}

#[async_trait]
impl InspectionSurface for PageSurface {
    async fn attach_listeners(&self) -> Result<()> {
        let outcome = self.session.evaluate_script(scripts::LISTENERS_ATTACH).await?;
        match outcome.as_str() {
            Some("missing") => Err(InspectorError::Browser(
                "page instrumentation not installed".to_string(),
            )),
            other => {
                debug!("inspection listeners: {}", other.unwrap_or("unknown"));
                Ok(())
            }
        }
    }

    async fn detach_listeners(&self) -> Result<()> {
        self.session.evaluate_script(scripts::LISTENERS_DETACH).await?;
        Ok(())
    }

    async fn highlight(&self, handle: &NodeHandle) -> Result<()> {
        // "missing" means the element left the DOM mid-hover; nothing to do.
        self.session.evaluate_script(&scripts::highlight(handle)).await?;
        Ok(())
    }

    async fn unhighlight(&self, handle: &NodeHandle) -> Result<()> {
        self.session.evaluate_script(&scripts::unhighlight(handle)).await?;
        Ok(())
    }

    async fn capture(&self, handle: &NodeHandle) -> Result<CapturedElement> {
        capture_by_selector(
            &self.session,
            &scripts::handle_selector(handle),
            self.screenshots,
        )
        .await
    }
}

/// Drives interactive inspection and host commands for one session
pub struct InspectionRunner {
    session: Arc<BrowserSession>,
    controller: InspectionController<PageSurface>,
    assembler: IssueAssembler,
    screenshots: bool,
}

impl InspectionRunner {
    pub fn new(
        session: Arc<BrowserSession>,
        collector: DiagnosticsCollector,
        sink: Arc<dyn IssueSink>,
        config: &CaptureConfig,
    ) -> Self {
        let assembler =
            IssueAssembler::new(collector, sink).with_error_context(config.error_context);
        let surface = PageSurface::new(session.clone()).with_screenshots(config.screenshot);
        let controller = InspectionController::new(surface, assembler.clone());

        Self {
            session,
            controller,
            assembler,
            screenshots: config.screenshot,
        }
    }

    pub fn is_inspecting(&self) -> bool {
        self.controller.is_inspecting()
    }

    /// Handle one host command, returning the outbound event if the command
    /// produced an issue.
    pub async fn dispatch(&mut self, command: InspectorCommand) -> Result<Option<InspectorEvent>> {
        match command {
            InspectorCommand::StartInspection => {
                self.controller.start().await?;
                Ok(None)
            }
            InspectorCommand::StopInspection => {
                self.controller.stop().await?;
                Ok(None)
            }
            InspectorCommand::CaptureElement { selector } => {
                let CapturedElement {
                    page,
                    snapshot,
                    screenshot,
                } = capture_by_selector(&self.session, &selector, self.screenshots).await?;
                let issue = self.assembler.submit(&page, Some(snapshot), screenshot).await;
                Ok(Some(InspectorEvent::AddIssue { issue }))
            }
            InspectorCommand::TakeScreenshot => {
                let page = self.session.page_context().await?;
                let screenshot =
                    capture_data_url(&self.session, ScreenshotOptions::viewport()).await?;
                let issue = self.assembler.submit(&page, None, Some(screenshot)).await;
                Ok(Some(InspectorEvent::AddIssue { issue }))
            }
            InspectorCommand::AddNote { note } => {
                let page = self.session.page_context().await?;
                let mut issue = self.assembler.assemble(&page, None, None);
                if !note.is_empty() {
                    issue.title = note;
                }
                let issue = self.assembler.publish_or_drop(issue).await;
                Ok(Some(InspectorEvent::AddIssue { issue }))
            }
        }
    }

    /// Drain queued pointer events through the state machine.
    ///
    /// Returns the published issue when one of the events completed a
    /// capture.
    pub async fn poll_once(&mut self) -> Result<Option<Issue>> {
        let raw: Vec<RawInspectEvent> = self.session.evaluate_json(scripts::INSPECT_DRAIN).await?;
        for event in raw.into_iter().filter_map(to_inspection_event) {
            if let Some(issue) = self.controller.handle(event).await? {
                return Ok(Some(issue));
            }
        }
        Ok(None)
    }

    /// Enter inspection mode and poll until a capture lands or `timeout`
    /// expires. Inspection auto-stops on capture; on timeout it is stopped
    /// explicitly. Diagnostics are pumped every cycle so the assembled
    /// issue sees errors raised right up to the click.
    pub async fn run_until_capture(
        &mut self,
        instrumentation: &PageInstrumentation,
        timeout: Duration,
    ) -> Result<Option<Issue>> {
        self.controller.start().await?;
        info!("Inspection started; hover and click an element in the browser");

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            instrumentation.pump(&self.session).await?;
            if let Some(issue) = self.poll_once().await? {
                return Ok(Some(issue));
            }
            if !self.controller.is_inspecting() {
                return Ok(None);
            }
            if tokio::time::Instant::now() >= deadline {
                info!("Inspection timed out after {:?}", timeout);
                self.controller.stop().await?;
                return Ok(None);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: &str, handle: Option<&str>) -> RawInspectEvent {
        RawInspectEvent {
            kind: kind.to_string(),
            handle: handle.map(String::from),
        }
    }

    #[test]
    fn test_raw_events_map_to_state_machine_events() {
        assert_eq!(
            to_inspection_event(raw("over", Some("4"))),
            Some(InspectionEvent::PointerOver("4".to_string()))
        );
        assert_eq!(
            to_inspection_event(raw("out", Some("4"))),
            Some(InspectionEvent::PointerOut("4".to_string()))
        );
        assert_eq!(to_inspection_event(raw("click", None)), Some(InspectionEvent::Click));
    }

    #[test]
    fn test_malformed_events_are_dropped() {
        assert_eq!(to_inspection_event(raw("over", None)), None);
        assert_eq!(to_inspection_event(raw("wheel", Some("4"))), None);
    }

    #[test]
    fn test_event_queue_parses() {
        let raw: Vec<RawInspectEvent> = serde_json::from_str(
            r#"[{"kind": "over", "handle": "1"}, {"kind": "click"}]"#,
        )
        .unwrap();
        let events: Vec<_> = raw.into_iter().filter_map(to_inspection_event).collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], InspectionEvent::Click);
    }
}
