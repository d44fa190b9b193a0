// ABOUTME: Shared DOM tooling for the blogport decorators and importer.
// ABOUTME: Re-exports selector helpers, block tables, element removal and escaping.

//! blogport-dom - the small set of DOM utilities every blogport component leans on.
//!
//! The decorators and the importer never touch raw `dom_query` selectors for
//! configurable input; they go through the compiled-selector cache here. Blocks
//! are built as plain data and rendered to the table markup the downstream
//! serializer expects.

pub mod block;
pub mod compiled;
pub mod escape;
pub mod select;
pub mod utils;

pub use crate::block::{Block, Cell};
pub use crate::compiled::{get_or_compile, precompile_selectors};
pub use crate::escape::{escape_attr, escape_text};
pub use crate::select::{each, first_attr, is_tag, query, root, tag_name};
pub use crate::utils::{background_image_url, remove, replace_background_by_img, to_class_name};
