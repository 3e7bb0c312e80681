//! Inspection controller
//!
//! Owns the state machine and executes its effects against an injected
//! [`InspectionSurface`]. The surface is whatever can toggle highlights,
//! wire pointer listeners, and capture an element on a real page; the
//! controller itself never touches a platform API.

use async_trait::async_trait;
use fixhero_core::{ElementSnapshot, Issue, PageContext, Result};
use tracing::debug;

use crate::assembly::IssueAssembler;
use crate::state::{transition, Effect, InspectionEvent, InspectionState, NodeHandle};

/// Everything the surface hands back for one captured element.
///
/// `screenshot` is already fail-open at the boundary: a rasterization
/// failure arrives here as `None`, never as an error.
#[derive(Debug, Clone)]
pub struct CapturedElement {
    pub page: PageContext,
    pub snapshot: ElementSnapshot,
    pub screenshot: Option<String>,
}

/// Platform operations the controller drives
#[async_trait]
pub trait InspectionSurface: Send + Sync {
    async fn attach_listeners(&self) -> Result<()>;
    async fn detach_listeners(&self) -> Result<()>;
    async fn highlight(&self, handle: &NodeHandle) -> Result<()>;
    async fn unhighlight(&self, handle: &NodeHandle) -> Result<()>;
    /// Snapshot the element addressed by `handle`, with page context and an
    /// optional screenshot
    async fn capture(&self, handle: &NodeHandle) -> Result<CapturedElement>;
}

/// Drives inspection mode over a surface and publishes captures
pub struct InspectionController<S: InspectionSurface> {
    state: InspectionState,
    surface: S,
    assembler: IssueAssembler,
}

impl<S: InspectionSurface> InspectionController<S> {
    pub fn new(surface: S, assembler: IssueAssembler) -> Self {
        Self {
            state: InspectionState::Idle,
            surface,
            assembler,
        }
    }

    pub fn state(&self) -> &InspectionState {
        &self.state
    }

    pub fn is_inspecting(&self) -> bool {
        self.state.is_inspecting()
    }

    pub async fn start(&mut self) -> Result<Option<Issue>> {
        self.handle(InspectionEvent::Start).await
    }

    pub async fn stop(&mut self) -> Result<Option<Issue>> {
        self.handle(InspectionEvent::Stop).await
    }

    /// Feed one event through the state machine and run its effects.
    ///
    /// Returns the published issue when the event completed a capture.
    /// Snapshot failure aborts the capture with an error; it indicates the
    /// surface lost the element, which start/stop bookkeeping cannot fix.
    pub async fn handle(&mut self, event: InspectionEvent) -> Result<Option<Issue>> {
        let (next, effects) = transition(self.state.clone(), event);
        debug!("inspection transition -> {:?} ({} effects)", next, effects.len());
        self.state = next;

        let mut captured = None;
        for effect in effects {
            match effect {
                Effect::AttachListeners => self.surface.attach_listeners().await?,
                Effect::DetachListeners => self.surface.detach_listeners().await?,
                Effect::Highlight(handle) => self.surface.highlight(&handle).await?,
                Effect::Unhighlight(handle) => self.surface.unhighlight(&handle).await?,
                Effect::Capture(handle) => {
                    let CapturedElement {
                        page,
                        snapshot,
                        screenshot,
                    } = self.surface.capture(&handle).await?;
                    let issue = self.assembler.submit(&page, Some(snapshot), screenshot).await;
                    captured = Some(issue);
                }
            }
        }
        Ok(captured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixhero_core::InspectorError;
    use fixhero_diagnostics::DiagnosticsCollector;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeSurface {
        highlighted: Mutex<HashSet<NodeHandle>>,
        listeners_attached: Mutex<bool>,
        captures: Mutex<Vec<NodeHandle>>,
        fail_screenshot: bool,
    }

    impl FakeSurface {
        fn highlighted_count(&self) -> usize {
            self.highlighted.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl InspectionSurface for FakeSurface {
        async fn attach_listeners(&self) -> Result<()> {
            *self.listeners_attached.lock().unwrap() = true;
            Ok(())
        }

        async fn detach_listeners(&self) -> Result<()> {
            *self.listeners_attached.lock().unwrap() = false;
            Ok(())
        }

        async fn highlight(&self, handle: &NodeHandle) -> Result<()> {
            self.highlighted.lock().unwrap().insert(handle.clone());
            Ok(())
        }

        async fn unhighlight(&self, handle: &NodeHandle) -> Result<()> {
            self.highlighted.lock().unwrap().remove(handle);
            Ok(())
        }

        async fn capture(&self, handle: &NodeHandle) -> Result<CapturedElement> {
            self.captures.lock().unwrap().push(handle.clone());
            Ok(CapturedElement {
                page: PageContext::new("https://app.test", "App"),
                snapshot: ElementSnapshot {
                    selector: format!("#{}", handle),
                    xpath: "/html/body/div[1]".to_string(),
                    attributes: Default::default(),
                    computed_styles: Default::default(),
                    bounding_rect: Default::default(),
                    outer_html: String::new(),
                },
                screenshot: if self.fail_screenshot {
                    None
                } else {
                    Some("data:image/png;base64,aGk=".to_string())
                },
            })
        }
    }

    struct NullSink;

    #[async_trait]
    impl crate::IssueSink for NullSink {
        async fn publish(&self, _issue: &Issue) -> Result<()> {
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl crate::IssueSink for FailingSink {
        async fn publish(&self, _issue: &Issue) -> Result<()> {
            Err(InspectorError::Sink("gone".to_string()))
        }
    }

    fn controller(surface: FakeSurface) -> InspectionController<FakeSurface> {
        let assembler = IssueAssembler::new(DiagnosticsCollector::default(), Arc::new(NullSink));
        InspectionController::new(surface, assembler)
    }

    #[tokio::test]
    async fn test_hover_keeps_single_highlight() {
        let mut controller = controller(FakeSurface::default());
        controller.start().await.unwrap();

        controller
            .handle(InspectionEvent::PointerOver("a".to_string()))
            .await
            .unwrap();
        assert_eq!(controller.surface.highlighted_count(), 1);

        controller
            .handle(InspectionEvent::PointerOver("b".to_string()))
            .await
            .unwrap();
        assert_eq!(controller.surface.highlighted_count(), 1);
        assert!(controller.surface.highlighted.lock().unwrap().contains("b"));
    }

    #[tokio::test]
    async fn test_click_emits_one_issue_and_goes_idle() {
        let mut controller = controller(FakeSurface::default());
        controller.start().await.unwrap();
        controller
            .handle(InspectionEvent::PointerOver("submit".to_string()))
            .await
            .unwrap();

        let issue = controller.handle(InspectionEvent::Click).await.unwrap();
        let issue = issue.expect("click over a hovered element captures");
        assert_eq!(issue.element.as_ref().unwrap().selector, "#submit");
        assert!(!controller.is_inspecting());
        assert!(!*controller.surface.listeners_attached.lock().unwrap());

        // Second click without a new start: nothing happens.
        let again = controller.handle(InspectionEvent::Click).await.unwrap();
        assert!(again.is_none());
        assert_eq!(controller.surface.captures.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_screenshot_still_captures() {
        let surface = FakeSurface {
            fail_screenshot: true,
            ..Default::default()
        };
        let mut controller = controller(surface);
        controller.start().await.unwrap();
        controller
            .handle(InspectionEvent::PointerOver("x".to_string()))
            .await
            .unwrap();

        let issue = controller
            .handle(InspectionEvent::Click)
            .await
            .unwrap()
            .unwrap();
        assert!(issue.screenshot.is_none());
        assert!(issue.element.is_some());
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_abort_capture() {
        let assembler =
            IssueAssembler::new(DiagnosticsCollector::default(), Arc::new(FailingSink));
        let mut controller = InspectionController::new(FakeSurface::default(), assembler);

        controller.start().await.unwrap();
        controller
            .handle(InspectionEvent::PointerOver("x".to_string()))
            .await
            .unwrap();

        let issue = controller.handle(InspectionEvent::Click).await.unwrap();
        assert!(issue.is_some());
        assert!(!controller.is_inspecting());
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut controller = controller(FakeSurface::default());
        controller.stop().await.unwrap();
        assert!(!controller.is_inspecting());

        controller.start().await.unwrap();
        controller.stop().await.unwrap();
        controller.stop().await.unwrap();
        assert!(!controller.is_inspecting());
        assert_eq!(controller.surface.highlighted_count(), 0);
    }
}
