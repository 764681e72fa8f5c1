//! Per-page region grouping.

use smallvec::SmallVec;

use crate::config::SummaryConfig;
use crate::document::{regions, DocNode, RegionRole};
use crate::error::{HostError, TraversalFailure};
use crate::fonts::FontPair;
use crate::host::{DocumentSource, PageRef};
use crate::layout::{make_label, ContainerNode, ContainerProps, LabelNode};

/// A top-level region with its direct region children.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionGroup<'a> {
    pub region: &'a DocNode,
    pub nested: SmallVec<[&'a DocNode; 4]>,
}

/// Result of summarizing one page.
#[derive(Clone, Debug, PartialEq)]
pub enum PageOutcome {
    /// Stack of region blocks, in region order. The page title is not included.
    Block(ContainerNode),
    /// No top-level regions; the page is left out of the summary.
    Omitted,
}

/// Group a page's direct children: top-level regions in order, each with its
/// direct region children in order. Non-region nodes are skipped.
pub fn group_regions(children: &[DocNode]) -> Vec<RegionGroup<'_>> {
    regions(children)
        .map(|region| RegionGroup {
            region,
            nested: region.child_regions().collect(),
        })
        .collect()
}

/// Load `page` and build its block.
///
/// Load and traversal failures come back as [`TraversalFailure`] so the caller
/// can drop just this page.
pub async fn build_page_block<S>(
    source: &S,
    page: &PageRef,
    fonts: &FontPair,
    config: &SummaryConfig,
) -> Result<PageOutcome, TraversalFailure>
where
    S: DocumentSource + ?Sized,
{
    let children = source
        .load_page(&page.id)
        .await
        .map_err(|err| TraversalFailure::new(&page.name, err))?;
    let groups = group_regions(&children);
    if groups.is_empty() {
        log::debug!("page '{}' has no regions; omitting", page.name);
        return Ok(PageOutcome::Omitted);
    }

    let mut block = ContainerNode::new(ContainerProps::stack(config.metrics.page_spacing));
    let mut nested_total = 0usize;
    for group in &groups {
        block.push(
            region_block(source, group, fonts, config)
                .map_err(|err| TraversalFailure::new(&page.name, err))?,
        );
        nested_total += group.nested.len();
    }
    log::debug!(
        "page '{}': {} regions, {} nested",
        page.name,
        groups.len(),
        nested_total
    );
    Ok(PageOutcome::Block(block))
}

fn region_block<S>(
    source: &S,
    group: &RegionGroup<'_>,
    fonts: &FontPair,
    config: &SummaryConfig,
) -> Result<ContainerNode, HostError>
where
    S: DocumentSource + ?Sized,
{
    let mut block = ContainerNode::new(ContainerProps::stack(config.metrics.region_spacing));
    block.push(region_label(
        source,
        group.region,
        RegionRole::TopLevel,
        fonts,
        config,
    )?);
    for child in &group.nested {
        block.push(region_label(source, child, RegionRole::Nested, fonts, config)?);
    }
    Ok(block)
}

fn region_label<S>(
    source: &S,
    region: &DocNode,
    role: RegionRole,
    fonts: &FontPair,
    config: &SummaryConfig,
) -> Result<LabelNode, HostError>
where
    S: DocumentSource + ?Sized,
{
    let link = source.deep_link(&region.id)?;
    let label = match role {
        RegionRole::TopLevel => make_label(
            region.name.as_str(),
            config.sizes.region,
            &fonts.primary,
            Some(config.colors.primary),
            Some(link),
        ),
        RegionRole::Nested => make_label(
            format!("{}{}", config.nested_prefix, region.name),
            config.sizes.nested,
            &fonts.primary,
            Some(config.colors.secondary),
            Some(link),
        ),
    };
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DeepLink, PageId, RegionId};
    use crate::layout::LayoutNode;
    use async_trait::async_trait;

    struct OnePage {
        children: Result<Vec<DocNode>, HostError>,
    }

    #[async_trait(?Send)]
    impl DocumentSource for OnePage {
        fn document_name(&self) -> String {
            "Doc".to_string()
        }

        fn pages(&self) -> Vec<PageRef> {
            vec![self.current_page()]
        }

        fn current_page(&self) -> PageRef {
            PageRef::new("0:1", "Intro")
        }

        async fn load_page(&self, _page: &PageId) -> Result<Vec<DocNode>, HostError> {
            self.children.clone()
        }
    }

    fn fonts() -> FontPair {
        FontPair::uniform(SummaryConfig::default().fonts.fallback)
    }

    fn texts(block: &ContainerNode) -> Vec<String> {
        block
            .outline()
            .into_iter()
            .map(|entry| entry.text)
            .collect()
    }

    #[test]
    fn group_regions_keeps_document_order_and_skips_non_regions() {
        let children = vec![
            DocNode::other("1", "Sticky"),
            DocNode::region("2", "Overview"),
            DocNode::region("3", "Goals").with_children(vec![
                DocNode::region("4", "G1"),
                DocNode::other("5", "Note"),
                DocNode::region("6", "G2"),
            ]),
        ];
        let groups = group_regions(&children);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].region.name, "Overview");
        assert!(groups[0].nested.is_empty());
        let nested: Vec<_> = groups[1].nested.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(nested, ["G1", "G2"]);
    }

    #[tokio::test]
    async fn page_block_is_pre_order_flattening() {
        let source = OnePage {
            children: Ok(vec![
                DocNode::region("2", "Overview"),
                DocNode::region("3", "Goals").with_children(vec![
                    DocNode::region("4", "G1"),
                    DocNode::region("6", "G2"),
                ]),
            ]),
        };
        let config = SummaryConfig::default();
        let outcome = build_page_block(&source, &source.current_page(), &fonts(), &config)
            .await
            .unwrap();
        let PageOutcome::Block(block) = outcome else {
            panic!("expected a block");
        };
        assert_eq!(texts(&block), ["Overview", "Goals", "⤑ G1", "⤑ G2"]);

        let goals = block.children[1].as_container().unwrap();
        let head = goals.children[0].as_label().unwrap();
        let nested = goals.children[1].as_label().unwrap();
        assert_eq!(head.link, Some(DeepLink::to_node(&RegionId("3".to_string()))));
        assert_eq!(head.fill, Some(config.colors.primary));
        assert_eq!(nested.fill, Some(config.colors.secondary));
        assert!(head.size > nested.size);
        assert!(matches!(goals.children[2], LayoutNode::Label(_)));
    }

    #[tokio::test]
    async fn page_without_regions_is_omitted() {
        let source = OnePage {
            children: Ok(vec![DocNode::other("1", "Logo")]),
        };
        let outcome = build_page_block(
            &source,
            &source.current_page(),
            &fonts(),
            &SummaryConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(outcome, PageOutcome::Omitted);
    }

    #[tokio::test]
    async fn load_failure_names_the_page() {
        let source = OnePage {
            children: Err(HostError::new("load_page", "offline")),
        };
        let err = build_page_block(
            &source,
            &source.current_page(),
            &fonts(),
            &SummaryConfig::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.page, "Intro");
        assert_eq!(err.source.message, "offline");
    }

    #[tokio::test]
    async fn unlinkable_region_fails_the_page() {
        let source = OnePage {
            children: Ok(vec![DocNode::region("", "Broken")]),
        };
        let err = build_page_block(
            &source,
            &source.current_page(),
            &fonts(),
            &SummaryConfig::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.source.op, "deep_link");
    }
}
