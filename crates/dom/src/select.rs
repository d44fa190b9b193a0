// ABOUTME: Selection helpers over dom_query: cached queries, per-node iteration, tag checks.
// ABOUTME: Keeps the decorators and importer on a small, uniform subset of the dom_query API.

//! Query helpers.
//!
//! Key behaviors:
//! - `query` compiles selectors through the shared cache; an invalid selector
//!   yields `None` instead of panicking.
//! - `each` snapshots the matched nodes as single-node selections so callers
//!   can mutate the tree while walking the list.
//! - `first_attr` returns the raw attribute value of the first match,
//!   including empty values.

use dom_query::{Document, Selection};

use crate::compiled::get_or_compile;

/// The document node as a selection, for descendant queries over the whole page.
pub fn root(doc: &Document) -> Selection<'_> {
    Selection::from(doc.root())
}

/// Selects descendants of `scope` matching `css`, or `None` for an invalid selector.
pub fn query<'a>(scope: &Selection<'a>, css: &str) -> Option<Selection<'a>> {
    let matcher = get_or_compile(css)?;
    Some(scope.select_matcher(&matcher))
}

/// Splits a selection into one selection per matched node, in document order.
pub fn each<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes().iter().cloned().map(Selection::from).collect()
}

/// Returns the attribute value of the first element matching `css`.
pub fn first_attr(scope: &Selection<'_>, css: &str, attr: &str) -> Option<String> {
    let found = query(scope, css)?;
    found.first().attr(attr).map(|v| v.to_string())
}

/// Lowercased tag name of the first node in the selection.
pub fn tag_name(sel: &Selection<'_>) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(|node| node.node_name())
        .map(|name| name.to_lowercase())
}

/// Returns true if the first node in the selection is a `tag` element.
pub fn is_tag(sel: &Selection<'_>, tag: &str) -> bool {
    tag_name(sel).is_some_and(|name| name.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <html>
        <head><meta property="og:image" content="https://cdn.example.com/a.png"></head>
        <body>
            <ul class="items"><li>One</li><li>Two</li><li>Three</li></ul>
            <em><a href="/x">x</a></em>
            <meta property="empty" content="">
        </body>
        </html>
    "#;

    #[test]
    fn query_returns_none_for_invalid_selector() {
        let doc = Document::from(SAMPLE_HTML);
        assert!(query(&root(&doc), "[[[invalid").is_none());
    }

    #[test]
    fn each_preserves_document_order() {
        let doc = Document::from(SAMPLE_HTML);
        let items = query(&root(&doc), "ul.items li").unwrap();
        let texts: Vec<String> = each(&items).iter().map(|li| li.text().to_string()).collect();
        assert_eq!(texts, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn first_attr_reads_meta_content() {
        let doc = Document::from(SAMPLE_HTML);
        assert_eq!(
            first_attr(&root(&doc), r#"[property="og:image"]"#, "content").as_deref(),
            Some("https://cdn.example.com/a.png")
        );
        assert_eq!(
            first_attr(&root(&doc), r#"[property="empty"]"#, "content").as_deref(),
            Some("")
        );
        assert_eq!(first_attr(&root(&doc), r#"[property="missing"]"#, "content"), None);
    }

    #[test]
    fn is_tag_checks_parent_element() {
        let doc = Document::from(SAMPLE_HTML);
        let link = doc.select("em a");
        assert!(is_tag(&link.parent(), "em"));
        assert!(is_tag(&link, "A"));
        assert!(!is_tag(&link, "em"));
    }
}
