//! DOM tree model
//!
//! A pruned, serializable snapshot of page structure. The platform boundary
//! extracts one of these per capture: the target element in full detail plus
//! enough sibling/ancestor context for selector and XPath derivation.

use fixhero_core::BoundingRect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One element in a captured DOM tree
///
/// `attributes` preserves document order; duplicate names keep the last
/// occurrence when flattened into a snapshot map. `text` is the element's
/// direct text content, not including descendants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomNode {
    pub tag: String,
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    #[serde(default)]
    pub styles: HashMap<String, String>,
    #[serde(default)]
    pub rect: BoundingRect,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<DomNode>,
}

impl DomNode {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(name.into(), value.into());
        self
    }

    pub fn with_rect(mut self, rect: BoundingRect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `id` attribute, if present and non-empty
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|v| !v.is_empty())
    }

    /// Whitespace-split class names from the `class` attribute
    pub fn class_names(&self) -> Vec<&str> {
        self.attr("class")
            .map(|v| v.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Walk a child-index path from this node
    pub fn node_at(&self, path: &[usize]) -> Option<&DomNode> {
        let mut node = self;
        for &index in path {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    /// Iterate the tree depth-first, yielding each node with its path
    pub fn walk(&self) -> Vec<(Vec<usize>, &DomNode)> {
        let mut out = Vec::new();
        let mut stack = vec![(Vec::new(), self)];
        while let Some((path, node)) = stack.pop() {
            out.push((path.clone(), node));
            for (i, child) in node.children.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child_path, child));
            }
        }
        out
    }
}

/// A captured tree together with the path of the capture target
///
/// The root node is the document `body`. The target path addresses the
/// element the user captured; sibling context along the path is retained so
/// locator derivation can count same-tag positions itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomCapture {
    pub root: DomNode,
    pub target_path: Vec<usize>,
}

impl DomCapture {
    pub fn new(root: DomNode, target_path: Vec<usize>) -> Self {
        Self { root, target_path }
    }

    /// The captured element, if the path addresses a node
    pub fn target(&self) -> Option<&DomNode> {
        self.root.node_at(&self.target_path)
    }
}
