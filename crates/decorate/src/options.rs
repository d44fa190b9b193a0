// ABOUTME: Configuration for the header decorator: site origin, nav path, newsletter action, timeout.
// ABOUTME: HeaderOptionsBuilder provides a fluent API; options also deserialize from a JSON config.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

pub const DEFAULT_SITE_ORIGIN: &str = "https://www.bamboohr.com";
pub const DEFAULT_NAV_PATH: &str = "/nav.plain.html";
pub const DEFAULT_NEWSLETTER_ACTION: &str =
    "https://www.bamboohr.com/ajax/blog-newsletter-form.php";

/// Configuration options for the header decorator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeaderOptions {
    /// Origin the nav fragment is fetched from.
    pub site_origin: String,
    pub nav_path: String,
    /// Links pointing here are swapped for an inline subscription form.
    pub newsletter_action: String,
    #[serde(rename = "timeout_secs", deserialize_with = "duration_from_secs")]
    pub timeout: Duration,
    pub user_agent: String,
    #[serde(skip)]
    pub http_client: Option<reqwest::Client>,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            nav_path: DEFAULT_NAV_PATH.to_string(),
            newsletter_action: DEFAULT_NEWSLETTER_ACTION.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: "blogport/0.1".to_string(),
            http_client: None,
        }
    }
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

/// Builder for [`HeaderOptions`].
#[derive(Debug, Clone, Default)]
pub struct HeaderOptionsBuilder {
    opts: HeaderOptions,
}

impl HeaderOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing options, e.g. ones loaded from a config file.
    pub fn from_options(opts: HeaderOptions) -> Self {
        Self { opts }
    }

    pub fn site_origin(mut self, origin: impl Into<String>) -> Self {
        self.opts.site_origin = origin.into();
        self
    }

    pub fn nav_path(mut self, path: impl Into<String>) -> Self {
        self.opts.nav_path = path.into();
        self
    }

    pub fn newsletter_action(mut self, action: impl Into<String>) -> Self {
        self.opts.newsletter_action = action.into();
        self
    }

    /// Set the nav fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    pub fn build(self) -> HeaderOptions {
        self.opts
    }
}
