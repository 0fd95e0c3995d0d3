//! Visible-text extraction over parsed HTML.

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Elements whose text never renders.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Text of `element` and its visible descendants, concatenated as-is.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    parts.concat()
}

/// Whole-document visible text with one space at every text-node boundary,
/// so `<td>5000+</td><td>$0.89</td>` reads `"5000+ $0.89"`.
pub(crate) fn page_text(document: &Html) -> String {
    let mut parts = Vec::new();
    collect_text(document.root_element(), &mut parts);
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Node::Text(text) = child.value() {
            out.push(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !HIDDEN_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, out);
            }
        }
    }
}
