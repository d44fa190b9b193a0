// ABOUTME: Host-tooling style DOM utilities: selector-list removal and background-to-img conversion.
// ABOUTME: Also derives CSS class names from free text.

use dom_query::{Document, Selection};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::escape::escape_attr;
use crate::select::{query, root};

static BACKGROUND_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)background(?:-image)?\s*:[^;]*?url\(\s*['"]?([^'")]+?)['"]?\s*\)"#)
        .expect("background url pattern")
});

/// Removes every element matching any of `selectors` from the document.
///
/// Invalid selectors are skipped. Returns the number of removed elements.
pub fn remove<S: AsRef<str>>(doc: &Document, selectors: &[S]) -> usize {
    let scope = root(doc);
    let mut removed = 0;
    for css in selectors {
        if let Some(found) = query(&scope, css.as_ref()) {
            removed += found.length();
            found.remove();
        }
    }
    removed
}

/// Reads the image URL from an element's inline `background`/`background-image` style.
pub fn background_image_url(element: &Selection<'_>) -> Option<String> {
    let style = element.attr("style")?;
    BACKGROUND_URL_RE
        .captures(&style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Replaces `element` with an `<img>` built from its CSS background image.
///
/// `preamble` markup is inserted immediately before the new image. Returns the
/// image URL, or `None` (element untouched) when no background image is set.
pub fn replace_background_by_img(element: &Selection<'_>, preamble: &str) -> Option<String> {
    let url = background_image_url(element)?;
    let markup = format!("{}<img src=\"{}\">", preamble, escape_attr(&url));
    element.replace_with_html(markup.as_str());
    Some(url)
}

/// Converts free text into a CSS class name: lowercase, runs of anything
/// outside `[0-9a-z]` collapsed to one `-`, no leading or trailing `-`.
pub fn to_class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_counts_and_drops_matches() {
        let doc = Document::from(
            r#"<html><body><header>h</header><main><p>keep</p><script>x()</script></main>
            <div class="Footer">f</div></body></html>"#,
        );
        let removed = remove(&doc, &["header", "script", ".Footer", ".absent", "[[[bad"]);
        assert_eq!(removed, 3);
        let html = doc.html().to_string();
        assert!(html.contains("keep"));
        assert!(!html.contains("<header>"));
        assert!(!html.contains("x()"));
        assert!(!html.contains("Footer"));
    }

    #[test]
    fn background_url_variants() {
        let doc = Document::from(
            r#"<div id="a" style="background-image: url('/img/a.jpg')"></div>
            <div id="b" style="color: red; background: #fff url(&quot;https://x.io/b.png&quot;) no-repeat"></div>
            <div id="c" style="color: red"></div>"#,
        );
        assert_eq!(background_image_url(&doc.select("#a")).as_deref(), Some("/img/a.jpg"));
        assert_eq!(
            background_image_url(&doc.select("#b")).as_deref(),
            Some("https://x.io/b.png")
        );
        assert_eq!(background_image_url(&doc.select("#c")), None);
    }

    #[test]
    fn replace_background_inserts_preamble_before_img() {
        let doc = Document::from(
            r#"<html><body><section><div class="hero" style="background-image:url(/h.jpg)"></div></section></body></html>"#,
        );
        let url = replace_background_by_img(&doc.select(".hero"), "<h1>Title</h1>");
        assert_eq!(url.as_deref(), Some("/h.jpg"));
        assert_eq!(
            doc.select("section").inner_html().to_string(),
            r#"<h1>Title</h1><img src="/h.jpg">"#
        );
    }

    #[test]
    fn replace_background_without_style_is_noop() {
        let doc = Document::from(r#"<div class="hero">plain</div>"#);
        assert_eq!(replace_background_by_img(&doc.select(".hero"), ""), None);
        assert!(doc.select(".hero").exists());
    }

    #[test]
    fn class_name_from_heading_text() {
        assert_eq!(to_class_name("Products & Services"), "products-services");
        assert_eq!(to_class_name("  Why BambooHR?  "), "why-bamboohr");
        assert_eq!(to_class_name("HR 101"), "hr-101");
    }
}
