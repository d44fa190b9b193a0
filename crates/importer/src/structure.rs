// ABOUTME: Structural extraction stages: headings, hero, related posts, embeds, callouts, TOC placeholder.
// ABOUTME: Each stage is a guarded no-op when its target elements are absent.

use dom_query::{Document, Selection};

use blogport_dom::{
    background_image_url, each, escape_attr, escape_text, replace_background_by_img, Block, Cell,
};

const HERO_SELECTOR: &str = ".blogPostBanner__img";
const RELATED_LINK_SELECTOR: &str = ".blogPostsBlock__titleLink";
const CALLOUT_SELECTOR: &str = ".blogPostContent__ctaContainer";
const CALLOUT_RIGHT_CLASS: &str = "blogPostContent__ctaContainer--right";
const CALLOUT_LEFT_CLASS: &str = "blogPostContent__ctaContainer--left";
const CALLOUT_TEXT_SELECTOR: &str = ".blogPostContent__ctaText";
const CALLOUT_SUBHEADING_SELECTOR: &str = ".blogPostContent__ctaSubheading";
const TOC_SELECTOR: &str = ".blogPostContentToc";

/// Replaces each heading's inner markup with its plain text.
pub fn normalize_headings(main: &Selection<'_>) -> usize {
    let headings = each(&main.select("h1, h2, h3, h4, h5, h6"));
    for heading in &headings {
        let text = heading.text().to_string();
        heading.set_html(escape_text(&text).as_str());
    }
    headings.len()
}

/// Turns the CSS-background banner into an `<img>` and moves the page title
/// right before it. Returns false when there is no banner image.
pub fn place_hero(doc: &Document) -> bool {
    let hero = doc.select(HERO_SELECTOR).first();
    if !hero.exists() || background_image_url(&hero).is_none() {
        return false;
    }

    let title = doc.select("h1").first();
    let mut preamble = String::new();
    if title.exists() {
        preamble = title.html().to_string();
        title.remove();
    }
    replace_background_by_img(&hero, &preamble).is_some()
}

/// Collects related-post title links from anywhere in the page into a
/// `Related Posts` block appended to `main`. Each link's text becomes its href
/// and the link itself moves into the block. Returns the number of links.
pub fn related_posts(doc: &Document, main: &Selection<'_>) -> usize {
    let links = each(&doc.select(RELATED_LINK_SELECTOR));
    if links.is_empty() {
        return 0;
    }

    let mut block = Block::new("Related Posts");
    for link in &links {
        let href = link.attr("href").map(|h| h.to_string()).unwrap_or_default();
        link.set_html(escape_text(&href).as_str());
        block.push_row(vec![Cell::html(link.html().to_string())]);
        link.remove();
    }
    main.append_html(block.to_html().as_str());
    links.len()
}

/// Upgrades protocol-relative URLs to https.
pub fn upgrade_protocol_relative(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{}", src)
    } else {
        src.to_string()
    }
}

/// Replaces every iframe that has a source with an `Embed` block linking to it.
pub fn embeds(main: &Selection<'_>) -> usize {
    let mut replaced = 0;
    for iframe in each(&main.select("iframe")) {
        let Some(src) = iframe.attr("src").map(|s| s.to_string()).filter(|s| !s.is_empty()) else {
            continue;
        };
        let src = upgrade_protocol_relative(&src);
        let link = format!("<a href=\"{}\">{}</a>", escape_attr(&src), escape_text(&src));
        let block = Block::new("Embed").row(vec![Cell::html(link)]);
        iframe.replace_with_html(block.to_html().as_str());
        replaced += 1;
    }
    replaced
}

/// Builds the `Callout` block for one call-to-action container.
///
/// Row two holds a heading from the primary text and a paragraph from the
/// subheading, each only when present. The call-to-action link gets its own
/// row, only when present.
pub fn callout_block(callout: &Selection<'_>) -> Block {
    let mut block = Block::new("Callout");
    if callout.has_class(CALLOUT_RIGHT_CLASS) {
        block = block.with_variant("right");
    } else if callout.has_class(CALLOUT_LEFT_CLASS) {
        block = block.with_variant("left");
    }

    let mut container = String::from("<div>");
    let text = callout.select(CALLOUT_TEXT_SELECTOR).first();
    if text.exists() {
        container.push_str(&format!("<h3>{}</h3>", escape_text(text.text().trim())));
    }
    let sub = callout.select(CALLOUT_SUBHEADING_SELECTOR).first();
    if sub.exists() {
        container.push_str(&format!("<p>{}</p>", sub.inner_html()));
    }
    container.push_str("</div>");
    block.push_row(vec![Cell::html(container)]);

    let cta = callout.select("a").first();
    if cta.exists() {
        block.push_row(vec![Cell::html(cta.html().to_string())]);
    }
    block
}

/// Replaces every call-to-action container in `main` with its `Callout` block.
pub fn callouts(main: &Selection<'_>) -> usize {
    let found = each(&main.select(CALLOUT_SELECTOR));
    for callout in &found {
        let block = callout_block(callout);
        callout.replace_with_html(block.to_html().as_str());
    }
    found.len()
}

/// Replaces the first TOC container with a single-cell `TOC` marker block.
pub fn toc_placeholder(main: &Selection<'_>) -> bool {
    let toc = main.select(TOC_SELECTOR).first();
    if !toc.exists() {
        return false;
    }
    toc.replace_with_html(Block::new("TOC").to_html().as_str());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(body: &str) -> Document {
        Document::from(format!("<html><body>{}</body></html>", body).as_str())
    }

    #[test]
    fn headings_lose_inner_markup() {
        let d = doc(r#"<main><h2 id="a">Why <strong>this</strong> <a href="/x">matters</a></h2><p><b>keep</b></p></main>"#);
        assert_eq!(normalize_headings(&d.select("main")), 1);
        assert_eq!(d.select("h2").inner_html().to_string(), "Why this matters");
        assert_eq!(d.select("h2").attr("id").as_deref(), Some("a"));
        assert!(d.select("p b").exists());
    }

    #[test]
    fn hero_becomes_img_after_title() {
        let d = doc(concat!(
            r#"<div class="blogPostBanner"><div class="blogPostBanner__img" style="background-image: url('/wp/hero.jpg')"></div></div>"#,
            r#"<div class="blogPostMain"><h1>Post title</h1><p>body</p></div>"#
        ));
        assert!(place_hero(&d));
        assert_eq!(
            d.select(".blogPostBanner").inner_html().to_string(),
            r#"<h1>Post title</h1><img src="/wp/hero.jpg">"#
        );
        assert_eq!(d.select("h1").length(), 1);
    }

    #[test]
    fn hero_without_background_is_untouched() {
        let d = doc(r#"<div class="blogPostBanner__img"></div><h1>T</h1>"#);
        assert!(!place_hero(&d));
        assert!(d.select(".blogPostBanner__img").exists());
        assert!(d.select("h1").exists());
    }

    #[test]
    fn related_posts_show_their_urls() {
        let d = doc(concat!(
            r#"<div class="blogPostMain"><p>body</p></div>"#,
            r#"<div class="blogPostsBlock"><a class="blogPostsBlock__titleLink" href="/blog/one">One</a>"#,
            r#"<a class="blogPostsBlock__titleLink" href="/blog/two">Two</a></div>"#
        ));
        let main = d.select(".blogPostMain");
        assert_eq!(related_posts(&d, &main), 2);

        let table = main.select("table").first();
        assert_eq!(table.select("th").text().to_string(), "Related Posts");
        let links: Vec<String> = each(&table.select("td a"))
            .iter()
            .map(|a| a.text().to_string())
            .collect();
        assert_eq!(links, vec!["/blog/one", "/blog/two"]);
        assert!(!d.select(".blogPostsBlock a").exists());
    }

    #[test]
    fn no_related_posts_appends_nothing() {
        let d = doc(r#"<div class="blogPostMain"><p>body</p></div>"#);
        let main = d.select(".blogPostMain");
        assert_eq!(related_posts(&d, &main), 0);
        assert!(!main.select("table").exists());
    }

    #[test]
    fn iframes_become_embed_blocks() {
        let d = doc(concat!(
            r#"<main><iframe src="//www.youtube.com/embed/abc"></iframe>"#,
            r#"<iframe src="https://player.vimeo.com/video/1"></iframe><iframe></iframe></main>"#
        ));
        let main = d.select("main");
        assert_eq!(embeds(&main), 2);
        let hrefs: Vec<String> = each(&main.select("table td a"))
            .iter()
            .map(|a| a.attr("href").map(|h| h.to_string()).unwrap_or_default())
            .collect();
        assert_eq!(
            hrefs,
            vec!["https://www.youtube.com/embed/abc", "https://player.vimeo.com/video/1"]
        );
        assert_eq!(main.select("iframe").length(), 1);
    }

    #[test]
    fn callout_with_only_text_has_two_rows() {
        let d = doc(r#"<div class="blogPostContent__ctaContainer"><div class="blogPostContent__ctaText">Try it</div></div>"#);
        let block = callout_block(&d.select(".blogPostContent__ctaContainer"));
        assert_eq!(block.header(), "Callout");
        assert_eq!(block.row_count(), 2);
        assert_eq!(block.rows()[1], vec![Cell::html("<div><h3>Try it</h3></div>")]);
    }

    #[test]
    fn full_callout_has_three_rows_and_variant() {
        let d = doc(concat!(
            r#"<div class="blogPostContent__ctaContainer blogPostContent__ctaContainer--right">"#,
            r#"<div class="blogPostContent__ctaText"> Free trial </div>"#,
            r#"<div class="blogPostContent__ctaSubheading">No <em>credit card</em></div>"#,
            r#"<a href="/signup" class="btn">Start</a></div>"#
        ));
        let block = callout_block(&d.select(".blogPostContent__ctaContainer"));
        assert_eq!(block.header(), "Callout (right)");
        assert_eq!(block.row_count(), 3);
        assert_eq!(
            block.rows()[1],
            vec![Cell::html("<div><h3>Free trial</h3><p>No <em>credit card</em></p></div>")]
        );
        assert_eq!(block.rows()[2], vec![Cell::html(r#"<a href="/signup" class="btn">Start</a>"#)]);
    }

    #[test]
    fn left_variant_and_replacement() {
        let d = doc(concat!(
            r#"<main><div class="blogPostContent__ctaContainer blogPostContent__ctaContainer--left">"#,
            r#"<div class="blogPostContent__ctaText">Read more</div></div></main>"#
        ));
        let main = d.select("main");
        assert_eq!(callouts(&main), 1);
        assert!(!main.select(".blogPostContent__ctaContainer").exists());
        assert_eq!(main.select("th").text().to_string(), "Callout (left)");
    }

    #[test]
    fn toc_placeholder_replaces_container() {
        let d = doc(r#"<main><div class="blogPostContentToc"><ol><li>x</li></ol></div></main>"#);
        let main = d.select("main");
        assert!(toc_placeholder(&main));
        assert_eq!(main.inner_html().to_string(), "<table><tbody><tr><th>TOC</th></tr></tbody></table>");
        assert!(!toc_placeholder(&main));
    }
}
