//! Document nodes as the host hands them over.

use serde::{Deserialize, Serialize};

use crate::host::RegionId;

/// What a document node is, as far as summaries care.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Named, linkable area.
    #[default]
    Region,
    /// Anything else (shapes, text, groups). Skipped at every level.
    Other,
}

/// Nesting role of a region relative to its enclosing node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionRole {
    /// Direct region child of a page.
    TopLevel,
    /// Direct region child of a top-level region.
    Nested,
}

/// Document node: a page child, or a child of one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocNode {
    pub id: RegionId,
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocNode>,
}

impl DocNode {
    pub fn region(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: RegionId(id.into()),
            name: name.into(),
            kind: NodeKind::Region,
            children: Vec::new(),
        }
    }

    pub fn other(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Other,
            ..Self::region(id, name)
        }
    }

    pub fn with_children(mut self, children: Vec<DocNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_region(&self) -> bool {
        self.kind == NodeKind::Region
    }

    /// Direct region children in document order. Deeper levels are not visited.
    pub fn child_regions(&self) -> impl Iterator<Item = &DocNode> {
        regions(&self.children)
    }
}

/// Region nodes among `nodes`, order preserved.
pub fn regions(nodes: &[DocNode]) -> impl Iterator<Item = &DocNode> {
    nodes.iter().filter(|node| node.is_region())
}
