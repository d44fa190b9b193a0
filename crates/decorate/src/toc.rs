// ABOUTME: Table-of-contents decorator: lists every h2 in the page as an ordered list of anchors.
// ABOUTME: Re-running replaces the previous output entirely.

use dom_query::{Document, Selection};

use blogport_dom::{each, escape_attr, escape_text, query, root};

use crate::error::DecorateError;

pub const TOC_TITLE: &str = "Table of Content";

/// One produced list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading id, empty when the heading has none.
    pub id: String,
    pub label: String,
}

impl TocEntry {
    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Replaces the content of `block` with a titled list of links to every `h2`
/// in `doc`, in document order. Headings without an id still get an entry
/// pointing at an empty fragment.
pub fn decorate_toc(doc: &Document, block: &Selection<'_>) -> Vec<TocEntry> {
    block.set_html("");

    let entries: Vec<TocEntry> = each(&doc.select("h2"))
        .iter()
        .map(|heading| TocEntry {
            id: heading.attr("id").map(|id| id.to_string()).unwrap_or_default(),
            label: heading.text().to_string(),
        })
        .collect();

    let mut html = format!(r#"<div class="toc-title">{}</div><ol>"#, TOC_TITLE);
    for entry in &entries {
        html.push_str(&format!(
            r#"<li><a href="{}">{}</a></li>"#,
            escape_attr(&entry.href()),
            escape_text(&entry.label)
        ));
    }
    html.push_str("</ol>");
    block.set_html(html.as_str());
    entries
}

/// Decorates the first block matching `block_css`.
pub fn decorate_toc_block(doc: &Document, block_css: &str) -> Result<Vec<TocEntry>, DecorateError> {
    let block = query(&root(doc), block_css)
        .filter(|b| b.exists())
        .ok_or_else(|| DecorateError::missing_block(block_css, "DecorateToc"))?
        .first();
    Ok(decorate_toc(doc, &block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn links(doc: &Document) -> Vec<(String, String)> {
        each(&doc.select(".toc ol > li > a"))
            .iter()
            .map(|a| {
                (
                    a.attr("href").map(|h| h.to_string()).unwrap_or_default(),
                    a.text().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn lists_h2_in_document_order() {
        let doc = Document::from(
            r#"<html><body><div class="toc"></div>
            <h2 id="intro">Intro</h2><h3 id="skip">Skip</h3>
            <section><h2 id="details">The <em>details</em></h2></section>
            <h2 id="wrap">Wrap up</h2></body></html>"#,
        );
        let entries = decorate_toc_block(&doc, ".toc").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            links(&doc),
            vec![
                ("#intro".to_string(), "Intro".to_string()),
                ("#details".to_string(), "The details".to_string()),
                ("#wrap".to_string(), "Wrap up".to_string()),
            ]
        );
        assert_eq!(doc.select(".toc .toc-title").text().to_string(), TOC_TITLE);
    }

    #[test]
    fn empty_document_keeps_title() {
        let doc = Document::from(r#"<html><body><div class="toc">old</div></body></html>"#);
        let entries = decorate_toc_block(&doc, ".toc").unwrap();
        assert!(entries.is_empty());
        assert_eq!(doc.select(".toc .toc-title").length(), 1);
        assert!(doc.select(".toc ol").exists());
        assert_eq!(doc.select(".toc ol li").length(), 0);
        assert!(!doc.select(".toc").text().contains("old"));
    }

    #[test]
    fn heading_without_id_links_to_empty_fragment() {
        let doc = Document::from(
            r#"<html><body><div class="toc"></div><h2>Nameless</h2><h2>Nameless</h2></body></html>"#,
        );
        decorate_toc_block(&doc, ".toc").unwrap();
        assert_eq!(
            links(&doc),
            vec![
                ("#".to_string(), "Nameless".to_string()),
                ("#".to_string(), "Nameless".to_string()),
            ]
        );
    }

    #[test]
    fn rerun_replaces_previous_output() {
        let doc = Document::from(
            r#"<html><body><div class="toc"></div><h2 id="a">A</h2><h2 id="b">B</h2></body></html>"#,
        );
        decorate_toc_block(&doc, ".toc").unwrap();
        let first = doc.select(".toc").inner_html().to_string();
        decorate_toc_block(&doc, ".toc").unwrap();
        assert_eq!(doc.select(".toc").inner_html().to_string(), first);
        assert_eq!(doc.select(".toc ol li").length(), 2);
    }

    #[test]
    fn label_markup_is_escaped() {
        let doc = Document::from(
            r#"<html><body><div class="toc"></div><h2 id="x">a &lt;b&gt; c</h2></body></html>"#,
        );
        let entries = decorate_toc_block(&doc, ".toc").unwrap();
        assert_eq!(entries[0].label, "a <b> c");
        assert!(!doc.select(".toc b").exists());
    }

    #[test]
    fn missing_block_is_an_error() {
        let doc = Document::from("<html><body></body></html>");
        assert!(decorate_toc_block(&doc, ".toc").unwrap_err().is_missing_block());
    }
}
