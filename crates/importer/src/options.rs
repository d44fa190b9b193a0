// ABOUTME: Configuration for the importer: origins, main-region selector and removal lists.
// ABOUTME: ImportOptionsBuilder provides a fluent API; options also deserialize from a JSON config.

use serde::Deserialize;

pub const DEFAULT_PRODUCTION_ORIGIN: &str = "https://www.bamboohr.com";
pub const DEFAULT_PROXY_ORIGIN: &str = "http://localhost:3001";
pub const DEFAULT_MAIN_SELECTOR: &str = ".blogPostMain";

/// Non-content regions stripped from the whole page before extraction.
pub const DEFAULT_STRIP_SELECTORS: &[&str] = &[
    "header",
    "NavbarMobile",
    ".blogSearchIcon__container",
    "script",
    "noscript",
    ".Footer",
    ".blogSearch__overlay",
    ".blogPostBanner__extra",
    ".blogSocial",
    ".blogPostContentSubscribe",
    ".blogPostAuthor",
];

/// Meta-row containers that are redundant once the metadata block exists.
pub const DEFAULT_CLEANUP_SELECTORS: &[&str] =
    &[".blogPostContent__meta", ".blogPostContent__metaTop"];

/// Configuration options for the importer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Origin root-relative links are resolved against.
    pub production_origin: String,
    /// Development proxy that serves images on behalf of the production origin.
    pub proxy_origin: String,
    pub main_selector: String,
    pub strip_selectors: Vec<String>,
    pub cleanup_selectors: Vec<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            production_origin: DEFAULT_PRODUCTION_ORIGIN.to_string(),
            proxy_origin: DEFAULT_PROXY_ORIGIN.to_string(),
            main_selector: DEFAULT_MAIN_SELECTOR.to_string(),
            strip_selectors: DEFAULT_STRIP_SELECTORS.iter().map(|s| s.to_string()).collect(),
            cleanup_selectors: DEFAULT_CLEANUP_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Builder for [`ImportOptions`].
#[derive(Debug, Clone, Default)]
pub struct ImportOptionsBuilder {
    opts: ImportOptions,
}

impl ImportOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing options, e.g. ones loaded from a config file.
    pub fn from_options(opts: ImportOptions) -> Self {
        Self { opts }
    }

    pub fn production_origin(mut self, origin: impl Into<String>) -> Self {
        self.opts.production_origin = origin.into();
        self
    }

    pub fn proxy_origin(mut self, origin: impl Into<String>) -> Self {
        self.opts.proxy_origin = origin.into();
        self
    }

    pub fn main_selector(mut self, selector: impl Into<String>) -> Self {
        self.opts.main_selector = selector.into();
        self
    }

    /// Add a selector to the strip list.
    pub fn strip(mut self, selector: impl Into<String>) -> Self {
        self.opts.strip_selectors.push(selector.into());
        self
    }

    pub fn build(self) -> ImportOptions {
        self.opts
    }
}
