//! Locating and regenerating an existing summary.

use crate::composer::{attach_tree, build_summary, discard, PlacedSummary, Scope};
use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::host::{Canvas, DocumentSource, FontLoader, NodeId, Point};

/// An existing summary found on the current page.
#[derive(Clone, Debug, PartialEq)]
pub struct LocatedSummary {
    pub node: NodeId,
    /// Scope inferred from the title.
    pub scope: Scope,
    pub position: Point,
}

/// Infer a summary's scope from its title text.
///
/// A title equal to the bare document name means all pages; anything else
/// (document plus page name) means current page. A summary without any text is
/// treated as all pages.
pub fn infer_scope(title: Option<&str>, document_name: &str) -> Scope {
    match title {
        Some(title) if title != document_name => Scope::CurrentPage,
        _ => Scope::AllPages,
    }
}

/// Find the summary on the current page by its identity marker. First match
/// wins. Nothing is modified.
pub fn locate_summary<H>(host: &H, config: &SummaryConfig) -> Result<LocatedSummary, SummaryError>
where
    H: DocumentSource + Canvas + ?Sized,
{
    let page = host.current_page();
    let node = host
        .find_named(&page.id, &config.marker)
        .ok_or_else(|| SummaryError::NotFound {
            marker: config.marker.clone(),
        })?;
    let title = host.first_text(node);
    let scope = infer_scope(title.as_deref(), &host.document_name());
    let position = host.position(node)?;
    log::debug!(
        "found summary {:?} on page '{}' (title {:?}, {})",
        node,
        page.name,
        title,
        scope
    );
    Ok(LocatedSummary {
        node,
        scope,
        position,
    })
}

/// Replace a located summary with one rebuilt from current document state.
///
/// The replacement is fully built, attached and moved to the old position
/// before the old node is removed, so a failure on the way leaves the old
/// summary in place.
pub async fn regenerate_summary<H>(
    host: &mut H,
    config: &SummaryConfig,
    located: &LocatedSummary,
) -> Result<PlacedSummary, SummaryError>
where
    H: DocumentSource + FontLoader + Canvas + ?Sized,
{
    let tree = build_summary(&*host, config, located.scope).await;
    let page = host.current_page();
    let node = attach_tree(host, &tree, &page.id)?;

    let swapped = host
        .set_position(node, located.position)
        .and_then(|()| host.remove(located.node));
    if let Err(err) = swapped {
        discard(host, node);
        return Err(err.into());
    }

    let fingerprint = tree.fingerprint();
    log::info!(
        "regenerated summary for {} on page '{}' at ({}, {}) (fingerprint {:08x})",
        located.scope,
        page.name,
        located.position.x,
        located.position.y,
        fingerprint
    );
    Ok(PlacedSummary {
        node,
        page: page.id,
        scope: located.scope,
        position: located.position,
        fingerprint,
    })
}

/// Locate the current page's summary and regenerate it in place with its
/// previous scope.
pub async fn refresh_summary<H>(
    host: &mut H,
    config: &SummaryConfig,
) -> Result<PlacedSummary, SummaryError>
where
    H: DocumentSource + FontLoader + Canvas + ?Sized,
{
    let located = locate_summary(&*host, config)?;
    regenerate_summary(host, config, &located).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_document_name_means_all_pages() {
        assert_eq!(infer_scope(Some("Spec"), "Spec"), Scope::AllPages);
        assert_eq!(infer_scope(Some("Spec - Intro"), "Spec"), Scope::CurrentPage);
        assert_eq!(infer_scope(None, "Spec"), Scope::AllPages);
    }

    #[test]
    fn renamed_document_reads_as_current_page() {
        // The title still carries the old name, so it no longer matches.
        assert_eq!(infer_scope(Some("Draft"), "Final"), Scope::CurrentPage);
    }
}
