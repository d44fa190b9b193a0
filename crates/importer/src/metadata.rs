// ABOUTME: Metadata record synthesis from head tags, the byline and the structured-data script.
// ABOUTME: Every field is optional; extraction failures omit the field and at most log a warning.

//! Metadata synthesis.
//!
//! Key behaviors:
//! - Fields keep a fixed order (Title first, Card Image last) regardless of
//!   the order they were discovered in.
//! - Absent sources omit the field; nothing is ever set to an empty value by
//!   default.
//! - The author byline is kept as an element and moved into the block.
//! - The card image lives in a JSON-LD graph inside a script tag. Scripts are
//!   stripped from the working document early, so the graph is read from a
//!   separate parse of the raw page HTML.

use std::collections::BTreeMap;

use dom_query::{Document, Selection};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use blogport_dom::{escape_attr, first_attr, root, Block, Cell};

const SCHEMA_GRAPH_MAIN_SELECTOR: &str = "script.yoast-schema-graph--main";
const SCHEMA_GRAPH_SELECTOR: &str = "script.yoast-schema-graph";
const META_TOP_SELECTOR: &str = ".blogPostContent__metaTop";

/// Metadata fields in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataField {
    Title,
    Description,
    Category,
    PublicationDate,
    Author,
    ReadTime,
    Image,
    CardImage,
}

impl MetadataField {
    pub fn label(&self) -> &'static str {
        match self {
            MetadataField::Title => "Title",
            MetadataField::Description => "Description",
            MetadataField::Category => "Category",
            MetadataField::PublicationDate => "Publication Date",
            MetadataField::Author => "Author",
            MetadataField::ReadTime => "Read Time",
            MetadataField::Image => "Image",
            MetadataField::CardImage => "Card Image",
        }
    }
}

/// A field value: plain text or an element's outer HTML.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    Element(String),
}

impl MetaValue {
    /// An `<img>` element pointing at `src`.
    pub fn image(src: &str) -> Self {
        MetaValue::Element(format!("<img src=\"{}\">", escape_attr(src)))
    }

    pub fn as_str(&self) -> &str {
        match self {
            MetaValue::Text(s) | MetaValue::Element(s) => s,
        }
    }

    fn to_cell(&self) -> Cell {
        match self {
            MetaValue::Text(s) => Cell::text(s.clone()),
            MetaValue::Element(s) => Cell::html(s.clone()),
        }
    }
}

/// Ordered field-to-value record for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: BTreeMap<MetadataField, MetaValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: MetadataField, value: MetaValue) {
        self.fields.insert(field, value);
    }

    pub fn get(&self, field: MetadataField) -> Option<&MetaValue> {
        self.fields.get(&field)
    }

    /// The value of `field` as a string slice, whatever its kind.
    pub fn text(&self, field: MetadataField) -> Option<&str> {
        self.get(field).map(MetaValue::as_str)
    }

    pub fn contains(&self, field: MetadataField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &MetaValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Renders the record as a `Metadata` key/value block.
    pub fn to_block(&self) -> Block {
        Block::key_value(
            "Metadata",
            self.iter().map(|(field, value)| (field.label(), value.to_cell())),
        )
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(field, value)| (field.label(), value)))
    }
}

/// Builds the metadata record for a page.
///
/// Reads head tags from `doc`, the byline and meta rows from `main`, and the
/// structured-data graph from `raw_html`. The byline element is removed from
/// `main`; its markup lives on in the returned record.
pub fn synthesize(doc: &Document, main: &Selection<'_>, raw_html: &str) -> Metadata {
    let mut meta = Metadata::new();
    let page = root(doc);

    let title = doc.select("title").first();
    if title.exists() {
        let text: String = title.text().chars().filter(|c| *c != '\n' && *c != '\t').collect();
        meta.insert(MetadataField::Title, MetaValue::Text(text));
    }

    if let Some(desc) = first_attr(&page, r#"[property="og:description"]"#, "content") {
        meta.insert(MetadataField::Description, MetaValue::Text(desc));
    }

    if let Some(category) = first_attr(&page, r#"[property="article:section"]"#, "content") {
        meta.insert(MetadataField::Category, MetaValue::Text(category));
    }

    if let Some(published) = first_attr(&page, r#"[property="article:published_time"]"#, "content")
    {
        meta.insert(
            MetadataField::PublicationDate,
            MetaValue::Text(publication_date(&published).to_string()),
        );
    }

    let author = main.select(r#"[rel="author"]"#).first();
    if author.exists() {
        meta.insert(MetadataField::Author, MetaValue::Element(author.html().to_string()));
        author.remove();
    }

    let meta_top = main.select(META_TOP_SELECTOR).first();
    if meta_top.exists() {
        if let Some(read_time) = read_time(&meta_top.text()) {
            meta.insert(MetadataField::ReadTime, MetaValue::Text(read_time));
        }
    }

    if let Some(image) = first_attr(&page, r#"[property="og:image"]"#, "content") {
        meta.insert(MetadataField::Image, MetaValue::image(&image));
    }

    if let Some(card) = card_image_url(raw_html) {
        meta.insert(MetadataField::CardImage, MetaValue::image(&card));
    }

    meta
}

/// Date portion of an ISO timestamp: everything before the first `T`.
pub fn publication_date(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Read time from the meta row text: the trimmed third line, only when the
/// trimmed text has exactly three lines.
pub fn read_time(meta_top_text: &str) -> Option<String> {
    let lines: Vec<&str> = meta_top_text.trim().split('\n').collect();
    if lines.len() != 3 {
        tracing::debug!(lines = lines.len(), "meta row is not three lines, skipping read time");
        return None;
    }
    Some(lines[2].trim().to_string())
}

/// Locates the structured-data script in the raw page and reads the card image.
pub fn card_image_url(raw_html: &str) -> Option<String> {
    let doc = Document::from(raw_html);
    let mut script = doc.select(SCHEMA_GRAPH_MAIN_SELECTOR).first();
    if !script.exists() {
        script = doc.select(SCHEMA_GRAPH_SELECTOR).first();
    }
    if !script.exists() {
        return None;
    }
    card_image_from_json(&script.text())
}

/// Reads `@graph[2].image.url` from a JSON-LD payload.
///
/// Malformed JSON or a graph without a third node logs a warning and yields
/// `None`; a third node without an image yields `None` quietly.
pub fn card_image_from_json(json: &str) -> Option<String> {
    let value: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("unable to parse schema graph: {}", e);
            return None;
        }
    };
    let Some(node) = value.get("@graph").and_then(|graph| graph.get(2)) else {
        tracing::warn!("schema graph has no @graph[2] node");
        return None;
    };
    node.get("image")
        .and_then(|image| image.get("url"))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}
