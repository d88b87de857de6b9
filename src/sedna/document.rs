//! Read-only views over a parsed Sedna page.
//!
//! Extractors only need two things from a page: its links, and the flat run
//! of child nodes under a container. [`DocumentReader`] exposes exactly that,
//! so extraction logic can run against hand-built node lists in tests.

use std::sync::LazyLock;

use html_scraper::node::Node;
use html_scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// An `<a href>` element, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

impl Anchor {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// A direct child of a container element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildNode {
    Text(String),
    /// An element with its concatenated descendant text.
    Element { tag: String, text: String },
}

impl ChildNode {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Element { text, .. } => text,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, Self::Element { tag, .. } if tag.eq_ignore_ascii_case("a"))
    }
}

/// Query capability the extractors are written against.
pub trait DocumentReader {
    /// Every link carrying an `href`, in document order.
    fn anchors(&self) -> Vec<Anchor>;

    /// For each element matching `container`, its direct children in order.
    fn child_nodes(&self, container: &str) -> Vec<Vec<ChildNode>>;
}

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static anchor selector"));

/// A page parsed with `scraper`.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

impl DocumentReader for HtmlDocument {
    fn anchors(&self) -> Vec<Anchor> {
        self.html
            .select(&ANCHOR_SELECTOR)
            .filter_map(|anchor| {
                let href = anchor.attr("href")?;
                Some(Anchor::new(href, anchor.text().collect::<String>()))
            })
            .collect()
    }

    fn child_nodes(&self, container: &str) -> Vec<Vec<ChildNode>> {
        let selector = match Selector::parse(container) {
            Ok(selector) => selector,
            Err(e) => {
                warn!(container, error = %e, "Invalid container selector");
                return Vec::new();
            }
        };

        self.html
            .select(&selector)
            .map(|parent| {
                parent
                    .children()
                    .filter_map(|node| match node.value() {
                        Node::Text(text) => Some(ChildNode::Text(String::from(&**text))),
                        Node::Element(element) => {
                            let text = ElementRef::wrap(node)?.text().collect::<String>();
                            Some(ChildNode::Element {
                                tag: element.name().to_string(),
                                text,
                            })
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors_in_document_order() {
        let doc = HtmlDocument::parse(
            r#"<html><body>
                <a href="mselect.jsp?id=1"> First </a>
                <a name="no-href">skipped</a>
                <p><a href="mselect.jsp?id=2">Second</a></p>
            </body></html>"#,
        );
        let anchors = doc.anchors();
        assert_eq!(
            anchors,
            vec![
                Anchor::new("mselect.jsp?id=1", " First "),
                Anchor::new("mselect.jsp?id=2", "Second"),
            ]
        );
    }

    #[test]
    fn test_child_nodes_keeps_text_and_elements_flat() {
        let doc = HtmlDocument::parse(
            "<html><body><font>lu 14 Mar 8h00-10h00<a href=\"#\">Algo<b>rithmics</b></a>(Room 201)<br></font></body></html>",
        );
        let groups = doc.child_nodes("body > font");
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0],
            vec![
                ChildNode::Text("lu 14 Mar 8h00-10h00".into()),
                ChildNode::Element {
                    tag: "a".into(),
                    text: "Algorithmics".into()
                },
                ChildNode::Text("(Room 201)".into()),
                ChildNode::Element {
                    tag: "br".into(),
                    text: String::new()
                },
            ]
        );
    }

    #[test]
    fn test_child_nodes_invalid_selector_is_empty() {
        let doc = HtmlDocument::parse("<html><body><font>x</font></body></html>");
        assert!(doc.child_nodes("body >>> font[").is_empty());
    }

    #[test]
    fn test_anchor_detection() {
        let anchor = ChildNode::Element {
            tag: "A".into(),
            text: "x".into(),
        };
        assert!(anchor.is_anchor());
        assert!(anchor.is_element());
        assert!(!ChildNode::Text("x".into()).is_element());
    }
}
