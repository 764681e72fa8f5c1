//! Host boundary.
//!
//! The host owns the document, renders primitives, loads fonts and shows UI
//! chrome. This crate only talks to it through the traits below. All host
//! futures are `?Send`: execution is single-threaded and cooperative, host
//! async calls are suspension points rather than parallel work.

use core::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::DocNode;
use crate::error::HostError;
use crate::fonts::FontRef;
use crate::layout::{ContainerProps, DividerNode, LabelNode};

/// Stable page identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub String);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable document node identifier; regions are linked through it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub String);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a node created on the host canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

/// Page handle with its display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub id: PageId,
    pub name: String,
}

impl PageRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PageId(id.into()),
            name: name.into(),
        }
    }
}

/// Opaque deep-link token a label carries to jump to a region.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeepLink(String);

impl DeepLink {
    /// Link straight to a document node by id.
    pub fn to_node(region: &RegionId) -> Self {
        Self(region.0.clone())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Canvas coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Read side of the document model.
#[async_trait(?Send)]
pub trait DocumentSource {
    fn document_name(&self) -> String;

    /// All pages in document order.
    fn pages(&self) -> Vec<PageRef>;

    /// The page the user is looking at.
    fn current_page(&self) -> PageRef;

    /// Load a page and return its direct children, each with its own direct
    /// children. May suspend.
    async fn load_page(&self, page: &PageId) -> Result<Vec<DocNode>, HostError>;

    /// Reference resolver for region deep-links.
    fn deep_link(&self, region: &RegionId) -> Result<DeepLink, HostError> {
        if region.0.is_empty() {
            return Err(HostError::new("deep_link", "empty node id"));
        }
        Ok(DeepLink::to_node(region))
    }
}

/// Host font loading.
#[async_trait(?Send)]
pub trait FontLoader {
    async fn load_font(&self, font: &FontRef) -> Result<(), HostError>;
}

/// Write side of the document model: primitive creation, placement, search.
pub trait Canvas {
    fn create_container(&mut self, props: &ContainerProps) -> Result<NodeId, HostError>;
    fn create_text(&mut self, label: &LabelNode) -> Result<NodeId, HostError>;
    fn create_line(&mut self, divider: &DividerNode) -> Result<NodeId, HostError>;
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError>;
    fn attach_to_page(&mut self, page: &PageId, node: NodeId) -> Result<(), HostError>;

    fn viewport_center(&self) -> Point;
    fn position(&self, node: NodeId) -> Result<Point, HostError>;
    fn set_position(&mut self, node: NodeId, at: Point) -> Result<(), HostError>;
    /// Size after host auto-layout.
    fn size(&self, node: NodeId) -> Result<Size, HostError>;

    /// First node on `page` (pre-order) whose name equals `name`.
    fn find_named(&self, page: &PageId, name: &str) -> Option<NodeId>;
    /// Characters of the first text leaf under `node` (pre-order).
    fn first_text(&self, node: NodeId) -> Option<String>;
    /// Remove `node` and its subtree from the document.
    fn remove(&mut self, node: NodeId) -> Result<(), HostError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Progress,
    Success,
    Error,
}

/// Transient notice shown by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// UI chrome around one command run.
pub trait Session {
    fn notify(&mut self, notice: Notice);
    fn scroll_into_view(&mut self, node: NodeId);
    /// Tell the host `command` can be relaunched for `page`.
    fn offer_relaunch(&mut self, page: &PageId, command: &str);
    /// End the session. Called exactly once per command.
    fn close(&mut self);
}

/// Everything a command needs from its host.
pub trait Host: DocumentSource + FontLoader + Canvas + Session {}

impl<T> Host for T where T: DocumentSource + FontLoader + Canvas + Session + ?Sized {}
