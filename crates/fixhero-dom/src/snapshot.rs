//! Element snapshot builder
//!
//! Synchronously gathers everything an Issue records about one element:
//! attributes, an allow-listed subset of computed styles, viewport geometry,
//! and serialized markup. Pure DOM reads, no side effects.

use fixhero_core::ElementSnapshot;
use std::collections::HashMap;

use crate::locator;
use crate::node::DomNode;

/// Computed style properties captured with every snapshot.
///
/// Absent properties still appear in the snapshot map, with empty values.
pub const STYLE_ALLOWLIST: [&str; 15] = [
    "display",
    "position",
    "width",
    "height",
    "margin",
    "padding",
    "color",
    "background-color",
    "font-size",
    "font-family",
    "border",
    "border-radius",
    "z-index",
    "opacity",
    "visibility",
];

/// Elements serialized without a closing tag
const VOID_TAGS: [&str; 8] = ["area", "br", "col", "hr", "img", "input", "link", "meta"];

/// Build a snapshot of the node at `path`.
///
/// The selector and xpath are derived on the spot, so they resolve back to
/// the node as long as the tree reflects the live document. No truncation is
/// applied to `outer_html`.
///
/// # Panics
/// Panics if `path` does not address a node under `root`.
pub fn build_snapshot(root: &DomNode, path: &[usize]) -> ElementSnapshot {
    let target = root
        .node_at(path)
        .expect("snapshot path must address a node");

    let attributes: HashMap<String, String> = target
        .attributes
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let computed_styles: HashMap<String, String> = STYLE_ALLOWLIST
        .iter()
        .map(|&property| {
            let value = target.styles.get(property).cloned().unwrap_or_default();
            (property.to_string(), value)
        })
        .collect();

    ElementSnapshot {
        selector: locator::css_selector(root, path),
        xpath: locator::xpath(root, path),
        attributes,
        computed_styles,
        bounding_rect: target.rect,
        outer_html: outer_html(target),
    }
}

/// Serialize a node and its subtree as markup.
///
/// Direct text renders before child elements; this is the shape the capture
/// boundary produces, not a general HTML serializer.
pub fn outer_html(node: &DomNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &DomNode, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);
    for (name, value) in &node.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');

    if VOID_TAGS.contains(&node.tag.as_str()) {
        return;
    }

    out.push_str(&escape_text(&node.text));
    for child in &node.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&node.tag);
    out.push('>');
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
