//! Summary composition: page traversal, tree assembly, placement.

use core::fmt;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::config::SummaryConfig;
use crate::error::{HostError, SummaryError};
use crate::fonts::{resolve_fonts, FontPair};
use crate::grouper::{build_page_block, PageOutcome};
use crate::host::{Canvas, DocumentSource, FontLoader, NodeId, PageId, PageRef, Point, Size};
use crate::layout::{
    make_label, ContainerNode, ContainerProps, DividerNode, DividerWeight, LayoutNode,
    OutlineEntry,
};

/// Which pages a summary covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    AllPages,
    CurrentPage,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllPages => f.write_str("all pages"),
            Self::CurrentPage => f.write_str("current page"),
        }
    }
}

/// A summary built in memory, not yet handed to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryTree {
    pub scope: Scope,
    pub root: ContainerNode,
}

impl SummaryTree {
    /// Title text (first label).
    pub fn title(&self) -> Option<&str> {
        self.root.first_label().map(|label| label.text.as_str())
    }

    /// Page blocks in summary order.
    pub fn page_blocks(&self) -> impl Iterator<Item = &ContainerNode> {
        self.root
            .children
            .iter()
            .filter_map(LayoutNode::as_container)
    }

    pub fn outline(&self) -> Vec<OutlineEntry> {
        self.root.outline()
    }

    pub fn fingerprint(&self) -> u32 {
        self.root.fingerprint()
    }
}

/// A summary materialized and attached on the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedSummary {
    pub node: NodeId,
    pub page: PageId,
    pub scope: Scope,
    pub position: Point,
    pub fingerprint: u32,
}

/// Title text for a summary: the document name, plus the page name for a
/// current-page summary.
pub fn summary_title(document: &str, page: Option<&str>, config: &SummaryConfig) -> String {
    match page {
        Some(page) => format!("{}{}{}", document, config.title_separator, page),
        None => document.to_string(),
    }
}

/// Build the summary tree for `scope` from current document state.
///
/// Pages are loaded concurrently for [`Scope::AllPages`]; blocks are appended
/// in page order regardless of completion order. Pages that fail to load are
/// logged and left out.
pub async fn build_summary<H>(host: &H, config: &SummaryConfig, scope: Scope) -> SummaryTree
where
    H: DocumentSource + FontLoader + ?Sized,
{
    let fonts = resolve_fonts(host, config).await;
    let document = host.document_name();
    let current = host.current_page();

    let mut root = ContainerNode::new(ContainerProps {
        name: Some(config.marker.clone()),
        padding: config.metrics.padding,
        spacing: config.metrics.spacing,
        corner_radius: config.metrics.corner_radius,
        auto_size: true,
    });
    let title = match scope {
        Scope::AllPages => summary_title(&document, None, config),
        Scope::CurrentPage => summary_title(&document, Some(&current.name), config),
    };
    root.push(make_label(
        title,
        config.sizes.title,
        &fonts.accent,
        Some(config.colors.title),
        None,
    ));
    root.push(divider(DividerWeight::Full, config));

    let pages = match scope {
        Scope::AllPages => host.pages(),
        Scope::CurrentPage => vec![current],
    };
    let outcomes = join_all(
        pages
            .iter()
            .map(|page| build_page_block(host, page, &fonts, config)),
    )
    .await;

    let blocks: Vec<(PageRef, ContainerNode)> = pages
        .into_iter()
        .zip(outcomes)
        .filter_map(|(page, outcome)| match outcome {
            Ok(PageOutcome::Block(block)) => Some((page, block)),
            Ok(PageOutcome::Omitted) => None,
            Err(failure) => {
                log::warn!("{}; leaving it out of the summary", failure);
                None
            }
        })
        .collect();

    let last = blocks.len().saturating_sub(1);
    for (idx, (page, mut block)) in blocks.into_iter().enumerate() {
        block.prepend(page_title(&page, &fonts, config));
        root.push(block);
        if idx < last {
            root.push(divider(DividerWeight::Light, config));
        }
    }

    SummaryTree { scope, root }
}

fn page_title(page: &PageRef, fonts: &FontPair, config: &SummaryConfig) -> LayoutNode {
    make_label(
        page.name.as_str(),
        config.sizes.page_title,
        &fonts.accent,
        Some(config.colors.title),
        None,
    )
    .into()
}

fn divider(weight: DividerWeight, config: &SummaryConfig) -> DividerNode {
    DividerNode {
        weight,
        thickness: match weight {
            DividerWeight::Full => config.metrics.full_divider,
            DividerWeight::Light => config.metrics.light_divider,
        },
        color: config.colors.divider,
        stretch: true,
    }
}

/// Translate a layout tree into host primitives.
///
/// On failure, whatever part of this subtree was already created is removed
/// again (best effort) before the error is returned.
pub fn materialize<C>(canvas: &mut C, node: &LayoutNode) -> Result<NodeId, HostError>
where
    C: Canvas + ?Sized,
{
    match node {
        LayoutNode::Label(label) => canvas.create_text(label),
        LayoutNode::Divider(divider) => canvas.create_line(divider),
        LayoutNode::Container(container) => materialize_container(canvas, container),
    }
}

fn materialize_container<C>(canvas: &mut C, container: &ContainerNode) -> Result<NodeId, HostError>
where
    C: Canvas + ?Sized,
{
    let id = canvas.create_container(&container.props)?;
    for child in &container.children {
        let child_id = match materialize(canvas, child) {
            Ok(child_id) => child_id,
            Err(err) => {
                discard(canvas, id);
                return Err(err);
            }
        };
        if let Err(err) = canvas.append_child(id, child_id) {
            discard(canvas, child_id);
            discard(canvas, id);
            return Err(err);
        }
    }
    log::debug!(
        "materialized container {:?} with {} children",
        id,
        container.children.len()
    );
    Ok(id)
}

/// Materialize `tree` and attach it to `page`. Not positioned yet.
pub(crate) fn attach_tree<C>(
    canvas: &mut C,
    tree: &SummaryTree,
    page: &PageId,
) -> Result<NodeId, HostError>
where
    C: Canvas + ?Sized,
{
    let node = materialize_container(canvas, &tree.root)?;
    if let Err(err) = canvas.attach_to_page(page, node) {
        discard(canvas, node);
        return Err(err);
    }
    Ok(node)
}

/// Remove a node we created, logging instead of failing.
pub(crate) fn discard<C>(canvas: &mut C, node: NodeId)
where
    C: Canvas + ?Sized,
{
    if let Err(err) = canvas.remove(node) {
        log::warn!("could not clean up node {:?}: {}", node, err);
    }
}

/// Top-left position that centers a node of `size` on `center`.
pub fn centered_position(center: Point, size: Size) -> Point {
    Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0)
}

fn center_in_viewport<C>(canvas: &mut C, node: NodeId) -> Result<Point, HostError>
where
    C: Canvas + ?Sized,
{
    let position = centered_position(canvas.viewport_center(), canvas.size(node)?);
    canvas.set_position(node, position)?;
    Ok(position)
}

/// Build a summary for `scope`, attach it to the current page and center it in
/// the viewport.
pub async fn compose_summary<H>(
    host: &mut H,
    config: &SummaryConfig,
    scope: Scope,
) -> Result<PlacedSummary, SummaryError>
where
    H: DocumentSource + FontLoader + Canvas + ?Sized,
{
    let tree = build_summary(&*host, config, scope).await;
    let page = host.current_page();
    let node = attach_tree(host, &tree, &page.id)?;

    let position = match center_in_viewport(host, node) {
        Ok(position) => position,
        Err(err) => {
            discard(host, node);
            return Err(err.into());
        }
    };

    let fingerprint = tree.fingerprint();
    log::info!(
        "composed summary for {} on page '{}' ({} page blocks, fingerprint {:08x})",
        scope,
        page.name,
        tree.page_blocks().count(),
        fingerprint
    );
    Ok(PlacedSummary {
        node,
        page: page.id,
        scope,
        position,
        fingerprint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_page_title_joins_with_separator() {
        let config = SummaryConfig::default();
        assert_eq!(summary_title("Doc", Some("Foo"), &config), "Doc - Foo");
        assert_eq!(summary_title("Doc", None, &config), "Doc");
    }

    #[test]
    fn centered_position_offsets_by_half_size() {
        let at = centered_position(
            Point::new(100.0, 50.0),
            Size {
                width: 40.0,
                height: 20.0,
            },
        );
        assert_eq!(at, Point::new(80.0, 40.0));
    }

    #[test]
    fn page_blocks_skip_labels_and_dividers() {
        let config = SummaryConfig::default();
        let font = config.fonts.fallback.clone();
        let mut root = ContainerNode::new(ContainerProps::default());
        root.push(make_label("Doc", 10.0, &font, None, None));
        root.push(divider(DividerWeight::Full, &config));
        root.push(ContainerNode::new(ContainerProps::stack(1.0)));
        let tree = SummaryTree {
            scope: Scope::AllPages,
            root,
        };
        assert_eq!(tree.title(), Some("Doc"));
        assert_eq!(tree.page_blocks().count(), 1);
        let full = divider(DividerWeight::Full, &config);
        let light = divider(DividerWeight::Light, &config);
        assert!(full.thickness > light.thickness);
    }
}
