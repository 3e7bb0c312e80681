//! DOM locator: CSS selector and XPath derivation
//!
//! Produces a `selector` and `xpath` for a node, favoring stability and
//! brevity. The `id`/class fast paths do not check document-wide uniqueness;
//! the returned selector is best-effort and callers must tolerate
//! multi-match. The resolvers in this module implement the same minimal
//! dialect and return the first match in document order.

use crate::node::DomNode;

/// Derive a best-effort CSS selector for the node at `path`.
///
/// Fast paths: `#id` when the element has a non-empty id, a compound class
/// selector when it has class names. Fallback: the tag name, with
/// `:nth-child(i)` appended (1-based position among same-tag siblings) when
/// the element shares its tag with a sibling. The fallback does not recurse
/// into ancestors, so deeply nested anonymous elements may not be globally
/// unique.
///
/// # Panics
/// Panics if `path` does not address a node under `root`.
pub fn css_selector(root: &DomNode, path: &[usize]) -> String {
    let target = node_at(root, path);

    if let Some(id) = target.id() {
        return format!("#{}", id);
    }

    let classes = target.class_names();
    if !classes.is_empty() {
        return format!(".{}", classes.join("."));
    }

    let mut selector = target.tag.clone();
    if let Some((&last, parent_path)) = path.split_last() {
        let parent = node_at(root, parent_path);
        let (index, count) = same_tag_position(parent, last);
        if count > 1 {
            selector.push_str(&format!(":nth-child({})", index));
        }
    }
    selector
}

/// Derive the absolute XPath for the node at `path`.
///
/// The tree root is the document body, so the empty path yields
/// `/html/body`. Every deeper segment carries a 1-based same-tag sibling
/// index: `/html/body/ul[1]/li[3]`.
///
/// # Panics
/// Panics if `path` does not address a node under `root`.
pub fn xpath(root: &DomNode, path: &[usize]) -> String {
    let mut out = String::from("/html/body");
    let mut parent = root;
    for &index in path {
        let child = &parent.children[index];
        let (position, _) = same_tag_position(parent, index);
        out.push_str(&format!("/{}[{}]", child.tag, position));
        parent = child;
    }
    out
}

/// Resolve a selector in the minimal dialect emitted by [`css_selector`].
///
/// Returns the first matching node in document order; `None` when nothing
/// matches or the selector uses syntax outside the dialect.
pub fn resolve_css_selector<'a>(root: &'a DomNode, selector: &str) -> Option<&'a DomNode> {
    if let Some(id) = selector.strip_prefix('#') {
        return first_match(root, |node, _| node.id() == Some(id));
    }

    if selector.starts_with('.') {
        let wanted: Vec<&str> = selector.split('.').filter(|c| !c.is_empty()).collect();
        if wanted.is_empty() {
            return None;
        }
        return first_match(root, |node, _| {
            let classes = node.class_names();
            wanted.iter().all(|w| classes.contains(w))
        });
    }

    let (tag, nth) = match selector.split_once(":nth-child(") {
        Some((tag, rest)) => {
            let n: usize = rest.strip_suffix(')')?.parse().ok()?;
            (tag, Some(n))
        }
        None => (selector, None),
    };

    first_match(root, |node, position| {
        node.tag == tag && nth.map(|n| n == position).unwrap_or(true)
    })
}

/// Resolve an absolute XPath in the dialect emitted by [`xpath`].
pub fn resolve_xpath<'a>(root: &'a DomNode, xpath: &str) -> Option<&'a DomNode> {
    let rest = xpath.strip_prefix("/html/body")?;
    let mut node = root;

    for segment in rest.split('/').filter(|s| !s.is_empty()) {
        let (tag, index) = match segment.split_once('[') {
            Some((tag, rest)) => (tag, rest.strip_suffix(']')?.parse::<usize>().ok()?),
            None => (segment, 1),
        };
        node = node
            .children
            .iter()
            .filter(|c| c.tag == tag)
            .nth(index.checked_sub(1)?)?;
    }
    Some(node)
}

fn node_at<'a>(root: &'a DomNode, path: &[usize]) -> &'a DomNode {
    let mut node = root;
    for &index in path {
        node = &node.children[index];
    }
    node
}

/// 1-based position of `child_index` among its same-tag siblings, plus the
/// total same-tag sibling count.
fn same_tag_position(parent: &DomNode, child_index: usize) -> (usize, usize) {
    let tag = &parent.children[child_index].tag;
    let mut position = 0;
    let mut count = 0;
    for (i, sibling) in parent.children.iter().enumerate() {
        if &sibling.tag == tag {
            count += 1;
            if i <= child_index {
                position += 1;
            }
        }
    }
    (position, count)
}

/// First node (document order) whose `(node, same_tag_position)` satisfies
/// the predicate. The root's position is 1 by convention.
fn first_match<'a, F>(root: &'a DomNode, predicate: F) -> Option<&'a DomNode>
where
    F: Fn(&DomNode, usize) -> bool,
{
    for (path, node) in root.walk() {
        let position = match path.split_last() {
            Some((&last, parent_path)) => same_tag_position(node_at(root, parent_path), last).0,
            None => 1,
        };
        if predicate(node, position) {
            return Some(node);
        }
    }
    None
}
