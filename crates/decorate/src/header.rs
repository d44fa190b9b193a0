// ABOUTME: Header decorator: fetches the nav fragment and rebuilds it as a collapsible nav tree.
// ABOUTME: Splits sections into brand, expandable groups and button rows, then adds the hamburger.

//! Header decoration.
//!
//! The nav fragment is a sequence of top-level `div` sections. The first is the
//! brand; sections with an `h2` become expandable groups collected into a new
//! `nav-sections` container right after the brand; the rest become button rows.
//! Newsletter links are swapped for an inline form once the tree is attached.

use dom_query::{Document, Selection};

use blogport_dom::{each, escape_attr, escape_text, is_tag, query, root, to_class_name};

use crate::error::DecorateError;
use crate::nav::{mark_expandable_items, nav_groups, NavMenu};
use crate::options::{HeaderOptions, HeaderOptionsBuilder};
use crate::resource::{fetch, resolve};

const HAMBURGER_HTML: &str =
    r#"<div class="nav-hamburger"><div class="nav-hamburger-icon"></div></div>"#;

/// Decorates header blocks with the site navigation.
pub struct HeaderDecorator {
    opts: HeaderOptions,
    http_client: reqwest::Client,
}

impl HeaderDecorator {
    pub fn builder() -> HeaderOptionsBuilder {
        HeaderOptionsBuilder::new()
    }

    /// Create a decorator. Without an injected client, one is built with the
    /// configured timeout and user agent; a build failure is a `Fetch` error.
    pub fn new(opts: HeaderOptions) -> Result<Self, DecorateError> {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| {
                    DecorateError::fetch(
                        &opts.site_origin,
                        "BuildClient",
                        Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                    )
                })?,
        };
        Ok(Self { opts, http_client })
    }

    pub fn options(&self) -> &HeaderOptions {
        &self.opts
    }

    /// Fetches the raw nav fragment. No retry: any failure is returned as is.
    pub async fn fetch_nav(&self) -> Result<String, DecorateError> {
        let url = resolve(&self.opts.site_origin, &self.opts.nav_path)?;
        tracing::debug!(url = %url, "fetching nav fragment");
        let fetched = fetch(&self.http_client, &url).await?;
        Ok(fetched.text())
    }

    /// Fetches the nav and decorates the block matching `block_css` in `doc`.
    pub async fn decorate(
        &self,
        doc: &Document,
        block_css: &str,
    ) -> Result<NavMenu, DecorateError> {
        let nav_html = self.fetch_nav().await?;
        decorate_nav(doc, block_css, &nav_html, &self.opts.newsletter_action)
    }
}

/// Rewrites legacy ordered lists as unordered lists on the raw markup.
pub fn normalize_lists(html: &str) -> String {
    html.replace("<ol>", "<ul>").replace("</ol>", "</ul>")
}

/// Replaces the content of the block matching `block_css` with the decorated nav.
pub fn decorate_nav(
    doc: &Document,
    block_css: &str,
    nav_html: &str,
    newsletter_action: &str,
) -> Result<NavMenu, DecorateError> {
    let block = query(&root(doc), block_css)
        .filter(|b| b.exists())
        .ok_or_else(|| DecorateError::missing_block(block_css, "DecorateHeader"))?
        .first();

    let markup = format!(r#"<div class="nav">{}</div>"#, normalize_lists(nav_html));
    block.set_html(markup.as_str());
    let nav = block.select("div.nav").first();

    let mut leading: Vec<String> = Vec::new();
    let mut brand: Option<String> = None;
    let mut groups: Vec<String> = Vec::new();
    let mut trailing: Vec<String> = Vec::new();
    let mut labels: Vec<String> = Vec::new();

    for section in each(&nav.children()) {
        if !is_tag(&section, "div") {
            let bucket = if brand.is_none() { &mut leading } else { &mut trailing };
            bucket.push(section.html().to_string());
            continue;
        }
        if brand.is_none() {
            section.add_class("nav-brand");
            brand = Some(section.html().to_string());
            continue;
        }
        let heading = section.select("h2").first();
        if heading.exists() {
            labels.push(heading.text().trim().to_string());
            decorate_group(&section, &heading);
            groups.push(section.html().to_string());
        } else {
            decorate_buttons(&section);
            trailing.push(section.html().to_string());
        }
    }

    let mut inner = String::from(HAMBURGER_HTML);
    inner.push_str(&leading.concat());
    if let Some(brand) = brand {
        inner.push_str(&brand);
        inner.push_str(r#"<div class="nav-sections">"#);
        inner.push_str(&groups.concat());
        inner.push_str("</div>");
    }
    inner.push_str(&trailing.concat());
    nav.set_html(inner.as_str());

    // Marked before the newsletter swap so form items never become toggles.
    let item_count = mark_expandable_items(&block);
    let found = nav_groups(&block).len();
    if found != labels.len() {
        tracing::warn!(found, expected = labels.len(), "nav group count does not match headings");
    }

    let forms = insert_newsletter_form(&block, newsletter_action);
    tracing::debug!(groups = labels.len(), items = item_count, forms, "decorated nav");

    let menu = NavMenu::new(block_css, labels, item_count);
    menu.render(doc);
    Ok(menu)
}

fn decorate_group(section: &Selection<'_>, heading: &Selection<'_>) {
    if !section.select("ul").exists() {
        section.add_class(&format!("nav-section-{}", to_class_name(&heading.text())));
        let mut moved = String::new();
        if let Some(node) = heading.nodes().first() {
            while let Some(next) = node.next_element_sibling() {
                moved.push_str(&next.html());
                next.remove_from_parent();
            }
        }
        section.append_html(format!(r#"<div class="nav-section-wrapper">{}</div>"#, moved).as_str());
    }
    section.add_class("nav-section");
}

fn decorate_buttons(section: &Selection<'_>) {
    section.set_attr("class", "nav-buttons");
    for link in each(&section.select("a")) {
        link.add_class("button");
        link.add_class("small");
        if is_tag(&link.parent(), "em") {
            link.add_class("light");
        }
    }
}

/// Swaps every link to `action` for an inline subscription form labeled with
/// the link text. Returns the number of replaced links.
pub fn insert_newsletter_form(scope: &Selection<'_>, action: &str) -> usize {
    let mut replaced = 0;
    for link in each(&scope.select("a[href]")) {
        if link.attr("href").as_deref() != Some(action) {
            continue;
        }
        let form = format!(
            concat!(
                r#"<div><form class="nav-form" action="{action}" method="post">"#,
                r#"<input type="email" name="email" placeholder="Email Address" aria-label="email" autocomplete="off">"#,
                r#"<button type="submit" class="">{label}</button>"#,
                "</form></div>"
            ),
            action = escape_attr(action),
            label = escape_text(&link.text()),
        );
        link.replace_with_html(form.as_str());
        replaced += 1;
    }
    replaced
}
