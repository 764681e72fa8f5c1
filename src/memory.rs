//! In-memory host.
//!
//! Implements every host trait over a plain document value, so summaries can
//! be generated, updated and inspected without a real editor. Used by the
//! preview tool and the test suite.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::DocNode;
use crate::error::HostError;
use crate::fonts::FontRef;
use crate::host::{
    Canvas, DocumentSource, FontLoader, Notice, NodeId, PageId, PageRef, Point, Session, Size,
};
use crate::layout::{ContainerNode, ContainerProps, DividerNode, LabelNode, LayoutNode};

/// Approximate glyph advance as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f64 = 0.6;
/// Line box height as a multiple of the font size.
const LINE_HEIGHT_RATIO: f64 = 1.25;

/// Document held by a [`MemoryHost`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
    pub name: String,
    pub pages: Vec<MemoryPage>,
    /// Index into `pages`.
    #[serde(default)]
    pub current_page: usize,
}

impl MemoryDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: MemoryPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Parse a document. A document without pages is rejected.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let document: Self = serde_json::from_str(json)?;
        if document.pages.is_empty() {
            return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                "document '{}' has no pages",
                document.name
            )));
        }
        Ok(document)
    }

    pub fn page_mut(&mut self, id: &str) -> Option<&mut MemoryPage> {
        self.pages.iter_mut().find(|page| page.id.0 == id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryPage {
    pub id: PageId,
    pub name: String,
    #[serde(default)]
    pub children: Vec<DocNode>,
}

impl MemoryPage {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PageId(id.into()),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<DocNode>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Clone, Debug)]
enum SceneKind {
    Container(ContainerProps),
    Text(LabelNode),
    Line(DividerNode),
}

#[derive(Clone, Debug)]
struct SceneNode {
    kind: SceneKind,
    parent: Option<NodeId>,
    page: Option<PageId>,
    children: Vec<NodeId>,
    position: Point,
}

/// Everything the session chrome was asked to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionLog {
    pub notices: Vec<Notice>,
    pub scrolled_to: Option<NodeId>,
    pub relaunch: Vec<(PageId, String)>,
    pub close_count: usize,
}

/// In-memory implementation of the host traits.
#[derive(Debug)]
pub struct MemoryHost {
    document: MemoryDocument,
    scene: HashMap<NodeId, SceneNode>,
    page_roots: HashMap<PageId, Vec<NodeId>>,
    next_id: u64,
    viewport_center: Point,
    unavailable_fonts: HashSet<FontRef>,
    failing_pages: HashSet<PageId>,
    load_delays: HashMap<PageId, Duration>,
    locked_nodes: HashSet<NodeId>,
    loaded_fonts: RefCell<Vec<FontRef>>,
    load_completions: RefCell<Vec<PageId>>,
    session: SessionLog,
}

impl MemoryHost {
    pub fn new(document: MemoryDocument) -> Self {
        Self {
            document,
            scene: HashMap::new(),
            page_roots: HashMap::new(),
            next_id: 1,
            viewport_center: Point::default(),
            unavailable_fonts: HashSet::new(),
            failing_pages: HashSet::new(),
            load_delays: HashMap::new(),
            locked_nodes: HashSet::new(),
            loaded_fonts: RefCell::new(Vec::new()),
            load_completions: RefCell::new(Vec::new()),
            session: SessionLog::default(),
        }
    }

    pub fn with_viewport_center(mut self, center: Point) -> Self {
        self.viewport_center = center;
        self
    }

    /// Make `font` fail to load.
    pub fn with_unavailable_font(mut self, font: FontRef) -> Self {
        self.unavailable_fonts.insert(font);
        self
    }

    /// Make `font` fail to load from now on.
    pub fn set_font_unavailable(&mut self, font: FontRef) {
        self.unavailable_fonts.insert(font);
    }

    /// Make loading page `id` fail.
    pub fn with_failing_page(mut self, id: &str) -> Self {
        self.failing_pages.insert(PageId(id.to_string()));
        self
    }

    /// Delay loading page `id` by `delay` (on the tokio timer).
    pub fn with_load_delay(mut self, id: &str, delay: Duration) -> Self {
        self.load_delays.insert(PageId(id.to_string()), delay);
        self
    }

    pub fn document(&self) -> &MemoryDocument {
        &self.document
    }

    /// Edit the document between commands.
    pub fn document_mut(&mut self) -> &mut MemoryDocument {
        &mut self.document
    }

    pub fn set_current_page(&mut self, index: usize) {
        self.document.current_page = index;
    }

    pub fn set_viewport_center(&mut self, center: Point) {
        self.viewport_center = center;
    }

    /// Make `remove(node)` fail.
    pub fn lock_node(&mut self, node: NodeId) {
        self.locked_nodes.insert(node);
    }

    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    /// Fonts loaded successfully, in load order.
    pub fn loaded_fonts(&self) -> Vec<FontRef> {
        self.loaded_fonts.borrow().clone()
    }

    /// Pages in the order their loads completed.
    pub fn load_completions(&self) -> Vec<PageId> {
        self.load_completions.borrow().clone()
    }

    /// Top-level nodes attached to `page`, in insertion order.
    pub fn page_nodes(&self, page: &PageId) -> &[NodeId] {
        self.page_roots.get(page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of live scene nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.scene.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.scene.contains_key(&node)
    }

    /// Read a materialized subtree back as a layout tree.
    pub fn snapshot(&self, node: NodeId) -> Option<LayoutNode> {
        let scene = self.scene.get(&node)?;
        let layout = match &scene.kind {
            SceneKind::Text(label) => LayoutNode::Label(label.clone()),
            SceneKind::Line(divider) => LayoutNode::Divider(divider.clone()),
            SceneKind::Container(props) => LayoutNode::Container(ContainerNode {
                props: props.clone(),
                children: scene
                    .children
                    .iter()
                    .filter_map(|child| self.snapshot(*child))
                    .collect(),
            }),
        };
        Some(layout)
    }

    fn page(&self, id: &PageId) -> Option<&MemoryPage> {
        self.document.pages.iter().find(|page| &page.id == id)
    }

    fn insert(&mut self, kind: SceneKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.scene.insert(
            id,
            SceneNode {
                kind,
                parent: None,
                page: None,
                children: Vec::new(),
                position: Point::default(),
            },
        );
        id
    }

    fn node(&self, node: NodeId, op: &'static str) -> Result<&SceneNode, HostError> {
        self.scene
            .get(&node)
            .ok_or_else(|| HostError::new(op, format!("unknown node {:?}", node)))
    }

    fn detach(&mut self, node: NodeId) {
        let Some(scene) = self.scene.get_mut(&node) else {
            return;
        };
        let parent = scene.parent.take();
        let page = scene.page.take();
        if let Some(parent) = parent.and_then(|parent| self.scene.get_mut(&parent)) {
            parent.children.retain(|child| *child != node);
        }
        if let Some(roots) = page.and_then(|page| self.page_roots.get_mut(&page)) {
            roots.retain(|root| *root != node);
        }
    }

    fn drop_subtree(&mut self, node: NodeId) {
        if let Some(scene) = self.scene.remove(&node) {
            for child in scene.children {
                self.drop_subtree(child);
            }
        }
    }

    fn find_in(&self, nodes: &[NodeId], name: &str) -> Option<NodeId> {
        nodes.iter().find_map(|node| {
            let scene = self.scene.get(node)?;
            match &scene.kind {
                SceneKind::Container(props) if props.name.as_deref() == Some(name) => Some(*node),
                SceneKind::Container(_) => self.find_in(&scene.children, name),
                _ => None,
            }
        })
    }

    fn measure(&self, node: NodeId) -> Size {
        let Some(scene) = self.scene.get(&node) else {
            return Size::default();
        };
        match &scene.kind {
            SceneKind::Text(label) => Size {
                width: label.text.chars().count() as f64 * label.size * GLYPH_WIDTH_RATIO,
                height: label.size * LINE_HEIGHT_RATIO,
            },
            // Stretched lines take the container width, not their own.
            SceneKind::Line(divider) => Size {
                width: 0.0,
                height: divider.thickness,
            },
            SceneKind::Container(props) => {
                let sizes: Vec<Size> = scene
                    .children
                    .iter()
                    .map(|child| self.measure(*child))
                    .collect();
                let gaps = sizes.len().saturating_sub(1) as f64 * props.spacing;
                let width = sizes.iter().map(|s| s.width).fold(0.0, f64::max);
                let height = sizes.iter().map(|s| s.height).sum::<f64>() + gaps;
                Size {
                    width: width + props.padding * 2.0,
                    height: height + props.padding * 2.0,
                }
            }
        }
    }
}

#[async_trait(?Send)]
impl DocumentSource for MemoryHost {
    fn document_name(&self) -> String {
        self.document.name.clone()
    }

    fn pages(&self) -> Vec<PageRef> {
        self.document
            .pages
            .iter()
            .map(|page| PageRef {
                id: page.id.clone(),
                name: page.name.clone(),
            })
            .collect()
    }

    fn current_page(&self) -> PageRef {
        let page = self
            .document
            .pages
            .get(self.document.current_page)
            .or_else(|| self.document.pages.first());
        match page {
            Some(page) => PageRef {
                id: page.id.clone(),
                name: page.name.clone(),
            },
            None => PageRef::new("", ""),
        }
    }

    async fn load_page(&self, page: &PageId) -> Result<Vec<DocNode>, HostError> {
        if let Some(delay) = self.load_delays.get(page) {
            tokio::time::sleep(*delay).await;
        }
        self.load_completions.borrow_mut().push(page.clone());
        if self.failing_pages.contains(page) {
            return Err(HostError::new("load_page", format!("page {} failed to load", page)));
        }
        self.page(page)
            .map(|page| page.children.clone())
            .ok_or_else(|| HostError::new("load_page", format!("unknown page {}", page)))
    }
}

#[async_trait(?Send)]
impl FontLoader for MemoryHost {
    async fn load_font(&self, font: &FontRef) -> Result<(), HostError> {
        if self.unavailable_fonts.contains(font) {
            return Err(HostError::new("load_font", format!("{} is not installed", font)));
        }
        self.loaded_fonts.borrow_mut().push(font.clone());
        Ok(())
    }
}

impl Canvas for MemoryHost {
    fn create_container(&mut self, props: &ContainerProps) -> Result<NodeId, HostError> {
        Ok(self.insert(SceneKind::Container(props.clone())))
    }

    fn create_text(&mut self, label: &LabelNode) -> Result<NodeId, HostError> {
        if self.unavailable_fonts.contains(&label.font) {
            return Err(HostError::new(
                "create_text",
                format!("font {} is not loaded", label.font),
            ));
        }
        Ok(self.insert(SceneKind::Text(label.clone())))
    }

    fn create_line(&mut self, divider: &DividerNode) -> Result<NodeId, HostError> {
        Ok(self.insert(SceneKind::Line(divider.clone())))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        if !matches!(
            self.node(parent, "append_child")?.kind,
            SceneKind::Container(_)
        ) {
            return Err(HostError::new(
                "append_child",
                format!("{:?} cannot hold children", parent),
            ));
        }
        self.node(child, "append_child")?;
        self.detach(child);
        if let Some(scene) = self.scene.get_mut(&child) {
            scene.parent = Some(parent);
        }
        if let Some(scene) = self.scene.get_mut(&parent) {
            scene.children.push(child);
        }
        Ok(())
    }

    fn attach_to_page(&mut self, page: &PageId, node: NodeId) -> Result<(), HostError> {
        if self.document.pages.is_empty() {
            return Err(HostError::new(
                "attach_to_page",
                format!("document '{}' has no pages", self.document.name),
            ));
        }
        if self.page(page).is_none() {
            return Err(HostError::new(
                "attach_to_page",
                format!("unknown page {}", page),
            ));
        }
        self.node(node, "attach_to_page")?;
        self.detach(node);
        if let Some(scene) = self.scene.get_mut(&node) {
            scene.page = Some(page.clone());
        }
        self.page_roots.entry(page.clone()).or_default().push(node);
        Ok(())
    }

    fn viewport_center(&self) -> Point {
        self.viewport_center
    }

    fn position(&self, node: NodeId) -> Result<Point, HostError> {
        Ok(self.node(node, "position")?.position)
    }

    fn set_position(&mut self, node: NodeId, at: Point) -> Result<(), HostError> {
        let scene = self
            .scene
            .get_mut(&node)
            .ok_or_else(|| HostError::new("set_position", format!("unknown node {:?}", node)))?;
        scene.position = at;
        Ok(())
    }

    fn size(&self, node: NodeId) -> Result<Size, HostError> {
        self.node(node, "size")?;
        Ok(self.measure(node))
    }

    fn find_named(&self, page: &PageId, name: &str) -> Option<NodeId> {
        self.find_in(self.page_nodes(page), name)
    }

    fn first_text(&self, node: NodeId) -> Option<String> {
        let scene = self.scene.get(&node)?;
        match &scene.kind {
            SceneKind::Text(label) => Some(label.text.clone()),
            SceneKind::Line(_) => None,
            SceneKind::Container(_) => scene
                .children
                .iter()
                .find_map(|child| self.first_text(*child)),
        }
    }

    fn remove(&mut self, node: NodeId) -> Result<(), HostError> {
        self.node(node, "remove")?;
        if self.locked_nodes.contains(&node) {
            return Err(HostError::new("remove", format!("{:?} is locked", node)));
        }
        self.detach(node);
        self.drop_subtree(node);
        Ok(())
    }
}

impl Session for MemoryHost {
    fn notify(&mut self, notice: Notice) {
        self.session.notices.push(notice);
    }

    fn scroll_into_view(&mut self, node: NodeId) {
        self.session.scrolled_to = Some(node);
    }

    fn offer_relaunch(&mut self, page: &PageId, command: &str) {
        self.session.relaunch.push((page.clone(), command.to_string()));
    }

    fn close(&mut self) {
        self.session.close_count += 1;
    }
}
