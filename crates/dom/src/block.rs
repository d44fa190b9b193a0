// ABOUTME: Row/cell block model and its table rendering for downstream serialization.
// ABOUTME: The first row's first cell always carries the block type name and optional variant.

use crate::escape::escape_text;

/// A single table cell: either plain text or a serialized element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Html(String),
}

impl Cell {
    /// Wraps plain text.
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Wraps ready-made markup (an element's outer HTML or a built fragment).
    pub fn html(s: impl Into<String>) -> Self {
        Cell::Html(s.into())
    }

    /// Returns the cell as markup, escaping text cells.
    pub fn to_html(&self) -> String {
        match self {
            Cell::Text(s) => escape_text(s),
            Cell::Html(s) => s.clone(),
        }
    }
}

/// A semantic content unit encoded as rows of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    name: String,
    variant: Option<String>,
    rows: Vec<Vec<Cell>>,
}

impl Block {
    /// Creates a block holding only its type row.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            rows: vec![vec![Cell::Text(name.clone())]],
            name,
            variant: None,
        }
    }

    /// Sets the variant suffix, e.g. `Callout (right)`.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        let variant = variant.into();
        self.rows[0][0] = Cell::Text(format!("{} ({})", self.name, variant));
        self.variant = Some(variant);
        self
    }

    /// Builds a two-column key/value block, the shape used for page metadata.
    pub fn key_value<I, K>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Cell)>,
        K: Into<String>,
    {
        let mut block = Self::new(name);
        for (key, value) in pairs {
            block.push_row(vec![Cell::Text(key.into()), value]);
        }
        block
    }

    /// Appends a row.
    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    /// Builder form of [`Block::push_row`].
    pub fn row(mut self, cells: Vec<Cell>) -> Self {
        self.push_row(cells);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// The type row's label, including the variant suffix.
    pub fn header(&self) -> String {
        match &self.rows[0][0] {
            Cell::Text(s) | Cell::Html(s) => s.clone(),
        }
    }

    /// All rows, type row first.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Row count including the type row.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Renders the block as a table.
    ///
    /// The type row uses `<th>`; when it holds a single cell and other rows are
    /// wider, that cell spans the full width.
    pub fn to_html(&self) -> String {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(1);
        let mut out = String::from("<table>");
        for (index, row) in self.rows.iter().enumerate() {
            out.push_str("<tr>");
            let tag = if index == 0 { "th" } else { "td" };
            for cell in row {
                if index == 0 && row.len() == 1 && columns > 1 {
                    out.push_str(&format!("<{tag} colspan=\"{columns}\">"));
                } else {
                    out.push_str(&format!("<{tag}>"));
                }
                out.push_str(&cell.to_html());
                out.push_str(&format!("</{tag}>"));
            }
            out.push_str("</tr>");
        }
        out.push_str("</table>");
        out
    }
}
