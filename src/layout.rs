//! In-memory layout tree for summaries.
//!
//! Summaries are built purely from document data into this tree first and only
//! then translated into host primitives (see [`crate::materialize`]), so
//! grouping and ordering can be checked without a host.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::fonts::FontRef;
use crate::host::DeepLink;

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Vertical auto-sized container settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerProps {
    /// Node name; the summary root carries the identity marker here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub padding: f64,
    pub spacing: f64,
    pub corner_radius: f64,
    /// Hug contents on both axes.
    pub auto_size: bool,
}

impl ContainerProps {
    /// Unnamed, unpadded stack with the given item spacing.
    pub fn stack(spacing: f64) -> Self {
        Self {
            name: None,
            padding: 0.0,
            spacing,
            corner_radius: 0.0,
            auto_size: true,
        }
    }
}

/// Text leaf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelNode {
    pub text: String,
    pub size: f64,
    pub font: FontRef,
    /// Overrides the host default fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<DeepLink>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DividerWeight {
    /// Under the summary title.
    Full,
    /// Between page blocks.
    Light,
}

/// Horizontal line stretched to the container width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DividerNode {
    pub weight: DividerWeight,
    pub thickness: f64,
    pub color: Rgb,
    pub stretch: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutNode {
    Container(ContainerNode),
    Label(LabelNode),
    Divider(DividerNode),
}

impl LayoutNode {
    pub fn as_container(&self) -> Option<&ContainerNode> {
        match self {
            Self::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&LabelNode> {
        match self {
            Self::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_divider(&self) -> Option<&DividerNode> {
        match self {
            Self::Divider(divider) => Some(divider),
            _ => None,
        }
    }

    /// First label in pre-order.
    pub fn first_label(&self) -> Option<&LabelNode> {
        match self {
            Self::Label(label) => Some(label),
            Self::Divider(_) => None,
            Self::Container(container) => container.first_label(),
        }
    }
}

impl From<ContainerNode> for LayoutNode {
    fn from(value: ContainerNode) -> Self {
        Self::Container(value)
    }
}

impl From<LabelNode> for LayoutNode {
    fn from(value: LabelNode) -> Self {
        Self::Label(value)
    }
}

impl From<DividerNode> for LayoutNode {
    fn from(value: DividerNode) -> Self {
        Self::Divider(value)
    }
}

/// Vertical container with ordered children.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerNode {
    pub props: ContainerProps,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

impl ContainerNode {
    pub fn new(props: ContainerProps) -> Self {
        Self {
            props,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, child: impl Into<LayoutNode>) {
        self.children.push(child.into());
    }

    /// Insert before all existing children.
    pub fn prepend(&mut self, child: impl Into<LayoutNode>) {
        self.children.insert(0, child.into());
    }

    pub fn first_label(&self) -> Option<&LabelNode> {
        self.children.iter().find_map(LayoutNode::first_label)
    }

    /// Flat entry list of this container, in reading order.
    ///
    /// Depth is the container nesting level of the label; a label that is not
    /// the leading child of a nested container sits one level deeper than the
    /// leading one (nested region entries under their region).
    pub fn outline(&self) -> Vec<OutlineEntry> {
        let mut out = Vec::with_capacity(8);
        collect_outline(self, 0, &mut out);
        out
    }

    /// CRC-32 over the content of this tree: label text, links, divider
    /// weights and nesting. Styling is not included.
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hash_container(self, 0, &mut hasher);
        hasher.finalize()
    }
}

/// Flattened summary entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// 0 title, 1 page, 2 region, 3 nested region.
    pub depth: usize,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<DeepLink>,
}

fn collect_outline(container: &ContainerNode, level: usize, out: &mut Vec<OutlineEntry>) {
    for (idx, child) in container.children.iter().enumerate() {
        match child {
            LayoutNode::Label(label) => out.push(OutlineEntry {
                depth: level + usize::from(idx > 0 && level > 0),
                text: label.text.clone(),
                link: label.link.clone(),
            }),
            LayoutNode::Container(inner) => collect_outline(inner, level + 1, out),
            LayoutNode::Divider(_) => {}
        }
    }
}

fn hash_container(container: &ContainerNode, level: u8, hasher: &mut crc32fast::Hasher) {
    hasher.update(&[b'[', level]);
    for child in &container.children {
        match child {
            LayoutNode::Label(label) => {
                hasher.update(b"L");
                hasher.update(label.text.as_bytes());
                hasher.update(&[0]);
                if let Some(link) = &label.link {
                    hasher.update(link.as_str().as_bytes());
                }
                hasher.update(&[0]);
            }
            LayoutNode::Divider(divider) => match divider.weight {
                DividerWeight::Full => hasher.update(b"D="),
                DividerWeight::Light => hasher.update(b"D-"),
            },
            LayoutNode::Container(inner) => hash_container(inner, level.saturating_add(1), hasher),
        }
    }
    hasher.update(b"]");
}

/// Build a text leaf.
///
/// `emphasis` overrides the host default fill; `link` makes the label jump to
/// a region when activated.
pub fn make_label(
    text: impl Into<String>,
    size: f64,
    font: &FontRef,
    emphasis: Option<Rgb>,
    link: Option<DeepLink>,
) -> LabelNode {
    LabelNode {
        text: text.into(),
        size,
        font: font.clone(),
        fill: emphasis,
        link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RegionId;

    fn font() -> FontRef {
        FontRef::new("Inter", "Regular")
    }

    fn region_block(name: &str, nested: &[&str]) -> ContainerNode {
        let mut block = ContainerNode::new(ContainerProps::stack(4.0));
        let link = DeepLink::to_node(&RegionId(name.to_string()));
        block.push(make_label(name, 14.0, &font(), None, Some(link)));
        for child in nested {
            block.push(make_label(*child, 12.0, &font(), None, None));
        }
        block
    }

    #[test]
    fn make_label_keeps_optional_parts() {
        let plain = make_label("Intro", 18.0, &font(), None, None);
        assert_eq!(plain.fill, None);
        assert_eq!(plain.link, None);

        let link = DeepLink::to_node(&RegionId("12:3".to_string()));
        let linked = make_label("Goals", 14.0, &font(), Some(Rgb::new(1, 2, 3)), Some(link));
        assert_eq!(linked.fill, Some(Rgb::new(1, 2, 3)));
        assert_eq!(linked.link.as_ref().map(DeepLink::as_str), Some("12:3"));
    }

    #[test]
    fn outline_assigns_depth_by_nesting() {
        let mut page = ContainerNode::new(ContainerProps::stack(8.0));
        page.push(make_label("Intro", 18.0, &font(), None, None));
        page.push(region_block("Goals", &["G1", "G2"]));

        let mut root = ContainerNode::new(ContainerProps::default());
        root.push(make_label("Spec", 24.0, &font(), None, None));
        root.push(DividerNode {
            weight: DividerWeight::Full,
            thickness: 2.0,
            color: Rgb::default(),
            stretch: true,
        });
        root.push(page);

        let entries: Vec<_> = root
            .outline()
            .into_iter()
            .map(|e| (e.depth, e.text))
            .collect();
        assert_eq!(
            entries,
            [
                (0, "Spec".to_string()),
                (1, "Intro".to_string()),
                (2, "Goals".to_string()),
                (3, "G1".to_string()),
                (3, "G2".to_string()),
            ]
        );
    }

    #[test]
    fn fingerprint_tracks_content_not_style() {
        let a = region_block("Goals", &["G1"]);
        let mut restyled = a.clone();
        restyled.props.spacing = 99.0;
        if let Some(LayoutNode::Label(label)) = restyled.children.first_mut() {
            label.size = 40.0;
        }
        assert_eq!(a.fingerprint(), restyled.fingerprint());

        let renamed = region_block("Goals", &["G9"]);
        assert_ne!(a.fingerprint(), renamed.fingerprint());
    }

    #[test]
    fn first_label_searches_depth_first() {
        let mut root = ContainerNode::new(ContainerProps::default());
        root.push(ContainerNode::new(ContainerProps::stack(0.0)));
        root.push(region_block("Deep", &[]));
        assert_eq!(root.first_label().map(|l| l.text.as_str()), Some("Deep"));
        assert_eq!(Rgb::new(0x0d, 0x63, 0xd8).to_string(), "#0d63d8");
    }
}
