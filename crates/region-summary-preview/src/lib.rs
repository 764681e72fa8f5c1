//! Output writers for the `summary-preview` tool.

use core::fmt;
use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use region_summary::{ContainerNode, OutlineEntry};

/// Output format of the preview tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            other => Err(format!(
                "invalid --format value '{}' (expected text|json|html)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
            Self::Html => f.write_str("html"),
        }
    }
}

/// Render a summary in `format`.
pub fn render(summary: &ContainerNode, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Text => Ok(render_text(&summary.outline())),
        OutputFormat::Json => serde_json::to_string_pretty(summary).map_err(|e| e.to_string()),
        OutputFormat::Html => render_html(&summary.outline()),
    }
}

/// Indented outline, one entry per line. Linked entries end with their target.
pub fn render_text(entries: &[OutlineEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        for _ in 0..entry.depth {
            out.push_str("  ");
        }
        out.push_str(&entry.text);
        if let Some(link) = &entry.link {
            out.push_str(" -> #");
            out.push_str(link.as_str());
        }
        out.push('\n');
    }
    out
}

/// Standalone XHTML page: the title as a heading, then one list item per
/// entry with an anchor for linked entries.
pub fn render_html(entries: &[OutlineEntry]) -> Result<String, String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    let title = entries
        .iter()
        .find(|entry| entry.depth == 0)
        .map_or("Summary", |entry| entry.text.as_str());

    let mut events = vec![
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        Event::Start(
            BytesStart::new("html").with_attributes([("xmlns", "http://www.w3.org/1999/xhtml")]),
        ),
        Event::Start(BytesStart::new("head")),
        Event::Start(BytesStart::new("title")),
        Event::Text(BytesText::new(title)),
        Event::End(BytesEnd::new("title")),
        Event::End(BytesEnd::new("head")),
        Event::Start(BytesStart::new("body")),
        Event::Start(BytesStart::new("h1")),
        Event::Text(BytesText::new(title)),
        Event::End(BytesEnd::new("h1")),
        Event::Start(BytesStart::new("ul")),
    ];
    for entry in entries.iter().filter(|entry| entry.depth > 0) {
        let class = format!("depth-{}", entry.depth);
        events.push(Event::Start(
            BytesStart::new("li").with_attributes([("class", class.as_str())]),
        ));
        match &entry.link {
            Some(link) => {
                let href = format!("#{}", link.as_str());
                events.push(Event::Start(
                    BytesStart::new("a").with_attributes([("href", href.as_str())]),
                ));
                events.push(Event::Text(BytesText::new(&entry.text)));
                events.push(Event::End(BytesEnd::new("a")));
            }
            None => events.push(Event::Text(BytesText::new(&entry.text))),
        }
        events.push(Event::End(BytesEnd::new("li")));
    }
    events.push(Event::End(BytesEnd::new("ul")));
    events.push(Event::End(BytesEnd::new("body")));
    events.push(Event::End(BytesEnd::new("html")));

    for event in events {
        writer.write_event(event).map_err(|e| e.to_string())?;
    }
    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use region_summary::{DeepLink, RegionId};

    fn entries() -> Vec<OutlineEntry> {
        vec![
            OutlineEntry {
                depth: 0,
                text: "Spec".to_string(),
                link: None,
            },
            OutlineEntry {
                depth: 1,
                text: "Intro".to_string(),
                link: None,
            },
            OutlineEntry {
                depth: 2,
                text: "Q&A <draft>".to_string(),
                link: Some(DeepLink::to_node(&RegionId("1:2".to_string()))),
            },
        ]
    }

    #[test]
    fn text_outline_indents_by_depth_and_shows_links() {
        assert_eq!(
            render_text(&entries()),
            "Spec\n  Intro\n    Q&A <draft> -> #1:2\n"
        );
    }

    #[test]
    fn html_escapes_entry_text_and_links_regions() {
        let html = render_html(&entries()).unwrap();
        assert!(html.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(html.contains("<h1>Spec</h1>"));
        assert!(html.contains("<a href=\"#1:2\">Q&amp;A &lt;draft&gt;</a>"));
        assert!(html.contains("class=\"depth-1\""));
        assert!(!html.contains("<draft>"));
    }

    #[test]
    fn format_names_parse() {
        assert_eq!(OutputFormat::parse("html"), Ok(OutputFormat::Html));
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert!(OutputFormat::parse("pdf").is_err());
    }
}
