use std::time::Duration;

use region_summary::{DocNode, MemoryDocument, MemoryHost, MemoryPage, Point};

pub const VIEWPORT_CENTER: Point = Point::new(500.0, 400.0);

/// "Spec": Intro with Overview and Goals (G1, G2), Appendix with no regions.
pub fn intro_document() -> MemoryDocument {
    MemoryDocument::new("Spec")
        .with_page(MemoryPage::new("0:1", "Intro").with_children(vec![
            DocNode::region("1:1", "Overview"),
            DocNode::region("1:2", "Goals").with_children(vec![
                DocNode::region("1:3", "G1"),
                DocNode::region("1:4", "G2"),
            ]),
        ]))
        .with_page(
            MemoryPage::new("0:2", "Appendix")
                .with_children(vec![DocNode::other("2:1", "Footnote")]),
        )
}

/// Three linked pages with an empty page in the middle.
pub fn product_document() -> MemoryDocument {
    MemoryDocument::new("Product")
        .with_page(MemoryPage::new("0:1", "Home").with_children(vec![
            DocNode::region("1:1", "Hero"),
            DocNode::other("1:9", "Logo"),
            DocNode::region("1:2", "Pricing").with_children(vec![
                DocNode::region("1:3", "Free"),
                DocNode::other("1:8", "Badge"),
                DocNode::region("1:4", "Pro"),
            ]),
        ]))
        .with_page(MemoryPage::new("0:2", "Scratch"))
        .with_page(MemoryPage::new("0:3", "Checkout").with_children(vec![
            DocNode::region("3:1", "Cart"),
            DocNode::region("3:2", "Payment").with_children(vec![DocNode::region(
                "3:3", "Card",
            )
            .with_children(vec![DocNode::region("3:4", "Too deep")])]),
        ]))
        .with_page(MemoryPage::new("0:4", "Archive").with_children(vec![
            DocNode::region("4:1", "Old flows"),
        ]))
}

pub fn intro_host() -> MemoryHost {
    MemoryHost::new(intro_document()).with_viewport_center(VIEWPORT_CENTER)
}

pub fn product_host() -> MemoryHost {
    MemoryHost::new(product_document()).with_viewport_center(VIEWPORT_CENTER)
}

/// Later pages load first.
pub fn reversed_load_delays(host: MemoryHost) -> MemoryHost {
    let ids: Vec<String> = host
        .document()
        .pages
        .iter()
        .map(|page| page.id.0.clone())
        .collect();
    let count = ids.len() as u64;
    ids.iter().enumerate().fold(host, |host, (idx, id)| {
        host.with_load_delay(id, Duration::from_millis((count - idx as u64) * 5))
    })
}
