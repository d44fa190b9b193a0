// ABOUTME: The import pipeline: ordered DOM transforms from a legacy page to its main content region.
// ABOUTME: Also derives the target document path from the page URL.

use dom_query::{Document, Selection};
use serde::Serialize;
use url::Url;

use blogport_dom::{query, remove, root};

use crate::error::ImportError;
use crate::links::{absolutize_links, proxy_images};
use crate::metadata::{synthesize, Metadata};
use crate::options::{ImportOptions, ImportOptionsBuilder};
use crate::structure::{callouts, embeds, normalize_headings, place_hero, related_posts, toc_placeholder};

/// Per-stage counts for one import, for logging and `--json` output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub stripped: usize,
    pub headings: usize,
    pub hero: bool,
    pub related_posts: usize,
    pub embeds: usize,
    pub callouts: usize,
    pub toc: bool,
    pub metadata_fields: usize,
    pub links: usize,
    pub images: usize,
    pub cleaned: usize,
}

/// The transformed main region together with what was extracted from the page.
pub struct ImportOutput<'a> {
    pub main: Selection<'a>,
    pub metadata: Metadata,
    pub report: ImportReport,
}

impl std::fmt::Debug for ImportOutput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportOutput")
            .field("main", &self.html())
            .field("metadata", &self.metadata)
            .field("report", &self.report)
            .finish()
    }
}

impl ImportOutput<'_> {
    /// Outer HTML of the main region.
    pub fn html(&self) -> String {
        self.main.html().to_string()
    }
}

/// Converts legacy blog pages into block-structured documents.
#[derive(Debug, Clone)]
pub struct Importer {
    opts: ImportOptions,
    origin: Url,
    origin_str: String,
    proxy_str: String,
}

impl Importer {
    /// Create a new options builder.
    pub fn builder() -> ImportOptionsBuilder {
        ImportOptionsBuilder::new()
    }

    /// Create an importer, validating the configured origins.
    pub fn new(opts: ImportOptions) -> Result<Self, ImportError> {
        let origin = parse_origin(&opts.production_origin, "production origin")?;
        let proxy = parse_origin(&opts.proxy_origin, "proxy origin")?;
        Ok(Self {
            origin_str: origin.origin().ascii_serialization(),
            proxy_str: proxy.origin().ascii_serialization(),
            origin,
            opts,
        })
    }

    /// Get the importer options.
    pub fn options(&self) -> &ImportOptions {
        &self.opts
    }

    /// Runs every stage over `doc` in order and returns the main region.
    ///
    /// `html` is the raw page source; structured data is read from it because
    /// the strip stage removes scripts from `doc`. Fails only when the main
    /// region cannot be found.
    pub fn transform_dom<'a>(
        &self,
        doc: &'a Document,
        html: &str,
    ) -> Result<ImportOutput<'a>, ImportError> {
        let mut report = ImportReport {
            stripped: remove(doc, &self.opts.strip_selectors),
            ..ImportReport::default()
        };

        let main = query(&root(doc), &self.opts.main_selector)
            .map(|found| found.first())
            .filter(|found| found.exists())
            .ok_or_else(|| {
                ImportError::extract(
                    &self.opts.main_selector,
                    "locate main region",
                    Some(anyhow::anyhow!("no element matches the main selector")),
                )
            })?;

        report.headings = normalize_headings(&main);
        report.hero = place_hero(doc);
        report.related_posts = related_posts(doc, &main);
        report.embeds = embeds(&main);
        report.callouts = callouts(&main);
        report.toc = toc_placeholder(&main);

        let metadata = synthesize(doc, &main, html);
        report.metadata_fields = metadata.len();
        main.append_html(metadata.to_block().to_html().as_str());

        report.links = absolutize_links(&main, &self.origin);
        report.images = proxy_images(&main, &self.proxy_str, &self.origin_str);
        report.cleaned = remove(doc, &self.opts.cleanup_selectors);

        tracing::debug!(?report, "import complete");
        Ok(ImportOutput {
            main,
            metadata,
            report,
        })
    }
}

fn parse_origin(raw: &str, op: &str) -> Result<Url, ImportError> {
    let url = Url::parse(raw).map_err(|e| ImportError::invalid_url(raw, op, Some(e.into())))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ImportError::invalid_url(
            raw,
            op,
            Some(anyhow::anyhow!("unsupported scheme {}", url.scheme())),
        ));
    }
    Ok(url)
}

/// Target document path for a page: its URL path without one trailing `/`.
pub fn generate_document_path(url: &str) -> Result<String, ImportError> {
    let parsed = Url::parse(url)
        .map_err(|e| ImportError::invalid_url(url, "generate document path", Some(e.into())))?;
    let path = parsed.path();
    Ok(path.strip_suffix('/').unwrap_or(path).to_string())
}
