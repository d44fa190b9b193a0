// ABOUTME: CLI binary for the blog migration tools: page import, TOC and header decoration.
// ABOUTME: Reads HTML files or fetches pages and writes the transformed HTML or a JSON summary.

mod config;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dom_query::Document;
use serde_json::json;
use url::Url;

use blogport_decorate::resource::fetch;
use blogport_decorate::{decorate_toc_block, HeaderDecorator, HeaderOptionsBuilder};
use blogport_dom::precompile_selectors;
use blogport_importer::{generate_document_path, Importer, ImportOptionsBuilder};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "blogport")]
#[command(about = "Migrate legacy blog pages into block documents")]
struct Args {
    /// JSON config file with "import" and "header" sections
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a legacy blog post into its block-structured main region
    Import {
        /// HTML file to import (requires --url)
        #[arg(long = "html")]
        html: Option<PathBuf>,

        /// Page URL for the HTML file (required with --html)
        #[arg(long = "url")]
        url: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Output JSON with path, metadata and stage counts
        #[arg(long = "json")]
        json_output: bool,

        /// Override the proxy origin images are routed through
        #[arg(long = "proxy")]
        proxy: Option<String>,

        /// URLs to fetch and import
        #[arg()]
        urls: Vec<String>,
    },
    /// Fill a TOC block with links to every h2 in the page
    Toc {
        #[arg(long = "html")]
        html: PathBuf,

        /// Selector of the TOC block
        #[arg(long = "block", default_value = ".toc")]
        block: String,

        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Fetch the site nav and decorate a header block with it
    Header {
        #[arg(long = "html")]
        html: PathBuf,

        /// Selector of the header block
        #[arg(long = "block", default_value = ".header")]
        block: String,

        /// Override the site origin the nav is fetched from
        #[arg(long = "origin")]
        origin: Option<String>,

        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

struct Page {
    url: String,
    html: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Returns false when some but not all pages failed.
async fn run(args: Args) -> Result<bool> {
    let config = Config::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Import {
            html,
            url,
            output,
            json_output,
            proxy,
            urls,
        } => {
            let mut opts = ImportOptionsBuilder::from_options(config.import.clone());
            if let Some(proxy) = proxy {
                opts = opts.proxy_origin(proxy);
            }
            let importer = Importer::new(opts.build())?;
            import(&config, &importer, html, url, urls, output.as_deref(), json_output).await
        }
        Command::Toc {
            html,
            block,
            output,
        } => {
            let doc = read_document(&html)?;
            let entries = decorate_toc_block(&doc, &block)?;
            tracing::debug!(entries = entries.len(), "toc decorated");
            write_output(output.as_deref(), &doc.html())?;
            Ok(true)
        }
        Command::Header {
            html,
            block,
            origin,
            output,
        } => {
            let mut opts = HeaderOptionsBuilder::from_options(config.header.clone());
            if let Some(origin) = origin {
                opts = opts.site_origin(origin);
            }
            let doc = read_document(&html)?;
            let menu = HeaderDecorator::new(opts.build())?.decorate(&doc, &block).await?;
            tracing::debug!(groups = menu.groups().len(), items = menu.item_count(), "header decorated");
            write_output(output.as_deref(), &doc.html())?;
            Ok(true)
        }
    }
}

async fn import(
    config: &Config,
    importer: &Importer,
    html: Option<PathBuf>,
    url: Option<String>,
    urls: Vec<String>,
    output: Option<&Path>,
    json_output: bool,
) -> Result<bool> {
    let pages = match (html, url) {
        (Some(path), Some(url)) => {
            if !urls.is_empty() {
                bail!("cannot use both --html and positional URLs");
            }
            let html = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            vec![Ok(Page { url, html })]
        }
        (Some(_), None) => bail!("--url is required when using --html"),
        (None, Some(_)) => bail!("--url is only valid with --html"),
        (None, _) if urls.is_empty() => {
            bail!("at least one URL is required, or use --html with --url")
        }
        (None, _) => fetch_pages(config, &urls).await?,
    };

    let invalid = precompile_selectors(
        importer
            .options()
            .strip_selectors
            .iter()
            .chain(&importer.options().cleanup_selectors),
    );
    if !invalid.is_empty() {
        eprintln!("warning: skipping invalid selectors: {}", invalid.join(", "));
    }

    let mut rendered = Vec::new();
    let mut had_error = false;
    for page in pages {
        let page = match page {
            Ok(p) => p,
            Err(e) => {
                eprintln!("error: {:#}", e);
                had_error = true;
                continue;
            }
        };
        match import_page(importer, &page, json_output) {
            Ok(out) => rendered.push(out),
            Err(e) => {
                eprintln!("error importing {}: {:#}", page.url, e);
                had_error = true;
            }
        }
    }

    if rendered.is_empty() {
        bail!("no page was imported");
    }
    let joined = if json_output && rendered.len() > 1 {
        format!("[{}]", rendered.join(","))
    } else {
        rendered.join("\n\n")
    };
    write_output(output, &joined)?;
    Ok(!had_error)
}

fn import_page(importer: &Importer, page: &Page, json_output: bool) -> Result<String> {
    let path = generate_document_path(&page.url)?;
    let doc = Document::from(page.html.as_str());
    let out = importer.transform_dom(&doc, &page.html)?;
    tracing::info!(url = %page.url, path = %path, "imported");

    if !json_output {
        return Ok(out.html());
    }
    let value = json!({
        "url": &page.url,
        "path": path,
        "metadata": &out.metadata,
        "report": &out.report,
        "html": out.html(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Fetches every URL with the header options' timeout and user agent. A
/// failed page is reported in place so the rest of the batch still runs.
async fn fetch_pages(config: &Config, urls: &[String]) -> Result<Vec<Result<Page>>> {
    let client = reqwest::Client::builder()
        .user_agent(&config.header.user_agent)
        .timeout(config.header.timeout)
        .build()
        .context("building HTTP client")?;

    let mut pages = Vec::with_capacity(urls.len());
    for raw in urls {
        let page = match Url::parse(raw) {
            Ok(url) => fetch(&client, &url)
                .await
                .map(|fetched| Page {
                    url: raw.clone(),
                    html: fetched.text(),
                })
                .map_err(anyhow::Error::new),
            Err(e) => Err(anyhow::anyhow!("invalid URL {}: {}", raw, e)),
        };
        pages.push(page);
    }
    Ok(pages)
}

fn read_document(path: &Path) -> Result<Document> {
    let html = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Document::from(html.as_str()))
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
