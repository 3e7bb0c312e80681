//! DOM extraction
//!
//! Pulls a pruned element tree out of the live page: the target element in
//! full detail (attributes, allow-listed computed styles, geometry, direct
//! text, subtree), every ancestor up to `body`, and shallow entries for all
//! siblings along that chain so selector/xpath derivation can count same-tag
//! positions without asking the page anything else.

use fixhero_core::{InspectorError, Result};
use fixhero_dom::snapshot::STYLE_ALLOWLIST;
use fixhero_dom::DomCapture;
use tracing::debug;

use crate::scripts;
use crate::session::BrowserSession;

/// Extract the capture tree for the first element matching `selector`.
///
/// Fails with [`InspectorError::ElementNotFound`] when nothing matches or
/// the element is detached from the document body.
pub async fn extract_dom(session: &BrowserSession, selector: &str) -> Result<DomCapture> {
    debug!("Extracting DOM for {}", selector);

    let script = scripts::dom_capture(selector, &STYLE_ALLOWLIST);
    let capture: Option<DomCapture> = session.evaluate_json(&script).await?;

    let capture = capture.ok_or_else(|| InspectorError::ElementNotFound(selector.to_string()))?;
    if capture.target().is_none() {
        return Err(InspectorError::DomCapture(format!(
            "extracted tree has no node at target path for {}",
            selector
        )));
    }
    Ok(capture)
}

#[cfg(test)]
mod tests {
    use fixhero_dom::snapshot::build_snapshot;
    use fixhero_dom::DomCapture;

    /// The exact JSON shape the page script produces
    const PAGE_FIXTURE: &str = r#"{
        "root": {
            "tag": "body",
            "attributes": [],
            "children": [
                {"tag": "nav", "attributes": [["class", "top"]]},
                {
                    "tag": "main",
                    "attributes": [],
                    "children": [
                        {"tag": "ul", "attributes": []},
                        {
                            "tag": "ul",
                            "attributes": [],
                            "children": [
                                {"tag": "li", "attributes": []},
                                {
                                    "tag": "li",
                                    "attributes": [["data-item", "2"]],
                                    "styles": {"display": "list-item", "color": "rgb(0, 0, 0)"},
                                    "rect": {"top": 120.5, "left": 40.0, "width": 300.0, "height": 24.0},
                                    "text": "Second item",
                                    "children": []
                                },
                                {"tag": "li", "attributes": []}
                            ]
                        }
                    ]
                }
            ]
        },
        "target_path": [1, 1, 1]
    }"#;

    #[test]
    fn test_fixture_parses_and_targets() {
        let capture: DomCapture = serde_json::from_str(PAGE_FIXTURE).unwrap();
        let target = capture.target().unwrap();
        assert_eq!(target.tag, "li");
        assert_eq!(target.text, "Second item");
    }

    #[test]
    fn test_snapshot_from_extracted_tree() {
        let capture: DomCapture = serde_json::from_str(PAGE_FIXTURE).unwrap();
        let snapshot = build_snapshot(&capture.root, &capture.target_path);

        // No id or class on the element: tag fallback with same-tag index.
        assert_eq!(snapshot.selector, "li:nth-child(2)");
        // Second ul under main, second li within it.
        assert_eq!(snapshot.xpath, "/html/body/main[1]/ul[2]/li[2]");
        assert_eq!(snapshot.attributes.get("data-item").unwrap(), "2");
        assert_eq!(snapshot.computed_styles["display"], "list-item");
        assert_eq!(snapshot.bounding_rect.top, 120.5);
        assert_eq!(snapshot.outer_html, r#"<li data-item="2">Second item</li>"#);
    }
}
