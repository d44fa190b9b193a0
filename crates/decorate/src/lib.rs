// ABOUTME: Page decorators: the navigation header and the table of contents.
// ABOUTME: Re-exports HeaderDecorator, NavMenu and its state machine, and the TOC decorator.

//! blogport-decorate - enhances page fragments after they load.
//!
//! # Example
//!
//! ```no_run
//! use blogport_decorate::{HeaderDecorator, NavEvent};
//! use dom_query::Document;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), blogport_decorate::DecorateError> {
//!     let doc = Document::from("<html><body><header></header></body></html>");
//!     let decorator = HeaderDecorator::new(HeaderDecorator::builder().build())?;
//!     let mut menu = decorator.decorate(&doc, "header").await?;
//!     menu.dispatch(&doc, NavEvent::Hamburger);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod header;
pub mod nav;
pub mod options;
pub mod resource;
pub mod toc;

pub use crate::error::{DecorateError, ErrorCode};
pub use crate::header::{decorate_nav, insert_newsletter_form, normalize_lists, HeaderDecorator};
pub use crate::nav::{Accordion, NavEvent, NavMenu, NavState};
pub use crate::options::{HeaderOptions, HeaderOptionsBuilder};
pub use crate::toc::{decorate_toc, decorate_toc_block, TocEntry, TOC_TITLE};
