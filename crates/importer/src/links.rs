// ABOUTME: Link absolutization and image proxying for the extracted main region.
// ABOUTME: Root-relative hrefs resolve against the production origin; images route through the dev proxy.

use dom_query::Selection;
use url::Url;

use blogport_dom::{each, escape_text};

use crate::structure::upgrade_protocol_relative;

/// Rewrites root-relative hrefs in `main` to absolute URLs on `origin`.
///
/// A link whose text was its own href gets the new URL as text too. Absolute
/// hrefs are untouched, so running this twice changes nothing. Returns the
/// number of rewritten links.
pub fn absolutize_links(main: &Selection<'_>, origin: &Url) -> usize {
    let mut rewritten = 0;
    for link in each(&main.select("a[href]")) {
        let Some(href) = link.attr("href").map(|h| h.to_string()) else {
            continue;
        };
        if !href.starts_with('/') {
            continue;
        }
        let absolute = match origin.join(&href) {
            Ok(u) => u.to_string(),
            Err(e) => {
                tracing::warn!(href = %href, "unable to resolve link: {}", e);
                continue;
            }
        };
        if link.text().trim() == href {
            link.set_html(escape_text(&absolute).as_str());
        }
        link.set_attr("href", absolute.as_str());
        rewritten += 1;
    }
    rewritten
}

/// Proxied form of an image `src`, or `None` when it should stay as is.
///
/// `proxy` and `host` are serialized origins without a trailing slash.
/// Root-relative sources keep their path and query. Absolute http(s) sources,
/// protocol-relative ones included, keep only path and query. Sources already
/// served by the proxy are skipped.
pub fn proxy_src(src: &str, proxy: &str, host: &str) -> Option<String> {
    let path_and_query = if src.starts_with('/') && !src.starts_with("//") {
        src.to_string()
    } else {
        let url = match Url::parse(&upgrade_protocol_relative(src)) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(src = %src, "unable to parse image url: {}", e);
                return None;
            }
        };
        if !matches!(url.scheme(), "http" | "https") || url.origin().ascii_serialization() == proxy {
            return None;
        }
        match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        }
    };

    let sep = if path_and_query.contains('?') { '&' } else { '?' };
    Some(format!("{}{}{}host={}", proxy, path_and_query, sep, host))
}

/// Routes every image in `main` through the proxy. Returns the number of
/// rewritten sources.
pub fn proxy_images(main: &Selection<'_>, proxy: &str, host: &str) -> usize {
    let mut rewritten = 0;
    for img in each(&main.select("img[src]")) {
        let Some(src) = img.attr("src").map(|s| s.to_string()) else {
            continue;
        };
        if let Some(proxied) = proxy_src(&src, proxy, host) {
            img.set_attr("src", proxied.as_str());
            rewritten += 1;
        }
    }
    rewritten
}
