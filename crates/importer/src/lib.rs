// ABOUTME: Content importer for legacy blog pages: strips chrome and rebuilds the main region as blocks.
// ABOUTME: Re-exports Importer, its options, the metadata record and the document-path helper.

//! blogport-importer - converts a legacy blog page into a block-structured document.
//!
//! # Example
//!
//! ```no_run
//! use blogport_importer::{generate_document_path, Importer};
//! use dom_query::Document;
//!
//! fn main() -> Result<(), blogport_importer::ImportError> {
//!     let html = std::fs::read_to_string("post.html").unwrap_or_default();
//!     let doc = Document::from(html.as_str());
//!     let importer = Importer::new(Importer::builder().build())?;
//!     let out = importer.transform_dom(&doc, &html)?;
//!     println!("{}", generate_document_path("https://www.bamboohr.com/blog/post/")?);
//!     println!("{}", out.html());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod links;
pub mod metadata;
pub mod options;
pub mod pipeline;
pub mod structure;

pub use crate::error::{ErrorCode, ImportError};
pub use crate::metadata::{MetaValue, Metadata, MetadataField};
pub use crate::options::{ImportOptions, ImportOptionsBuilder};
pub use crate::pipeline::{generate_document_path, ImportOutput, ImportReport, Importer};
