// ABOUTME: Finite-state store for the decorated navigation: exclusive accordions and the hamburger.
// ABOUTME: Transitions are pure; NavMenu writes the resulting aria-expanded flags back to the page.

//! Navigation state.
//!
//! Each accordion scope holds a single "currently open" index. Activating the
//! open entry closes it; activating any other entry opens it and implicitly
//! closes the rest, so two entries of one scope are never expanded together.
//!
//! There are two scopes: the top-level nav groups, and every expandable list
//! item across all groups. The hamburger is a plain boolean that also locks
//! page scrolling while the menu is open.

use dom_query::{Document, Selection};

use blogport_dom::{each, is_tag, query, root};

const EXPANDABLE_CLASS: &str = "nav-drop";

/// A single-open accordion scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accordion {
    open: Option<usize>,
}

impl Accordion {
    /// Activates entry `id`: closes it if open, otherwise opens it alone.
    pub fn toggle(self, id: usize) -> Self {
        if self.open == Some(id) {
            Self { open: None }
        } else {
            Self { open: Some(id) }
        }
    }

    pub fn open(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, id: usize) -> bool {
        self.open == Some(id)
    }
}

/// A user activation on the decorated nav.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// Click on the heading of the nth nav group.
    Group(usize),
    /// Click on the nth expandable list item (items without a direct link).
    Item(usize),
    Hamburger,
}

/// Complete nav state. The initial state is fully collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavState {
    pub groups: Accordion,
    pub items: Accordion,
    pub menu_open: bool,
}

impl NavState {
    pub fn apply(self, event: NavEvent) -> Self {
        match event {
            NavEvent::Group(id) => Self {
                groups: self.groups.toggle(id),
                ..self
            },
            NavEvent::Item(id) => Self {
                items: self.items.toggle(id),
                ..self
            },
            NavEvent::Hamburger => Self {
                menu_open: !self.menu_open,
                ..self
            },
        }
    }
}

/// Handle to a decorated nav inside a page.
#[derive(Debug, Clone)]
pub struct NavMenu {
    block_css: String,
    groups: Vec<String>,
    item_count: usize,
    state: NavState,
}

impl NavMenu {
    pub(crate) fn new(block_css: impl Into<String>, groups: Vec<String>, item_count: usize) -> Self {
        Self {
            block_css: block_css.into(),
            groups,
            item_count,
            state: NavState::default(),
        }
    }

    /// Heading labels of the nav groups, in order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    /// Applies an activation and syncs the page.
    ///
    /// Returns false, leaving everything untouched, when the event targets a
    /// group or item that does not exist.
    pub fn dispatch(&mut self, doc: &Document, event: NavEvent) -> bool {
        let in_range = match event {
            NavEvent::Group(id) => id < self.groups.len(),
            NavEvent::Item(id) => id < self.item_count,
            NavEvent::Hamburger => true,
        };
        if !in_range {
            tracing::debug!(?event, "ignoring nav event for unknown target");
            return false;
        }
        self.state = self.state.apply(event);
        self.render(doc)
    }

    /// Writes the current state as `aria-expanded` flags and the body scroll lock.
    pub fn render(&self, doc: &Document) -> bool {
        let Some(block) = query(&root(doc), &self.block_css).filter(|b| b.exists()) else {
            return false;
        };
        let block = block.first();

        block
            .select("div.nav")
            .first()
            .set_attr("aria-expanded", flag(self.state.menu_open));

        for (i, group) in nav_groups(&block).iter().enumerate() {
            group.set_attr("aria-expanded", flag(self.state.groups.is_open(i)));
        }
        for (i, item) in expandable_items(&block).iter().enumerate() {
            item.set_attr("aria-expanded", flag(self.state.items.is_open(i)));
        }

        lock_scroll(&doc.select("body"), self.state.menu_open);
        true
    }
}

fn flag(expanded: bool) -> &'static str {
    if expanded {
        "true"
    } else {
        "false"
    }
}

/// The decorated groups: `div.nav-section` children of the nav's own
/// `div.nav-sections`. Look-alike markup elsewhere in the nav is not a group.
pub(crate) fn nav_groups<'a>(block: &Selection<'a>) -> Vec<Selection<'a>> {
    let nav = block.select("div.nav").first();
    let Some(sections) = each(&nav.children())
        .into_iter()
        .find(|child| child.has_class("nav-sections"))
    else {
        return Vec::new();
    };
    each(&sections.children())
        .into_iter()
        .filter(|child| child.has_class("nav-section"))
        .collect()
}

/// Marks the direct `li` children of each group's direct `ul` that carry no
/// direct link as expandable. Returns how many were marked.
pub(crate) fn mark_expandable_items(block: &Selection<'_>) -> usize {
    let items: Vec<Selection<'_>> = nav_groups(block)
        .iter()
        .flat_map(|group| each(&group.children()))
        .filter(|child| is_tag(child, "ul"))
        .flat_map(|ul| each(&ul.children()))
        .filter(|li| is_tag(li, "li"))
        .filter(|li| !each(&li.children()).iter().any(|child| is_tag(child, "a")))
        .collect();
    for item in &items {
        item.add_class(EXPANDABLE_CLASS);
    }
    items.len()
}

fn expandable_items<'a>(block: &Selection<'a>) -> Vec<Selection<'a>> {
    nav_groups(block)
        .iter()
        .flat_map(|group| each(&group.select(&format!("li.{}", EXPANDABLE_CLASS))))
        .collect()
}

/// Sets or clears `overflow-y: hidden` on the body, keeping other declarations.
fn lock_scroll(body: &Selection<'_>, locked: bool) {
    if !body.exists() {
        return;
    }
    let existing = body.attr("style").map(|s| s.to_string()).unwrap_or_default();
    let mut decls: Vec<String> = existing
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| {
            let prop = d.split(':').next().unwrap_or("").trim();
            !prop.eq_ignore_ascii_case("overflow-y")
        })
        .map(String::from)
        .collect();
    if locked {
        decls.push("overflow-y: hidden".to_string());
    }
    if decls.is_empty() {
        body.remove_attr("style");
    } else {
        body.set_attr("style", &format!("{};", decls.join("; ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accordion_opens_one_at_a_time() {
        let a = Accordion::default().toggle(0);
        assert!(a.is_open(0));
        let b = a.toggle(1);
        assert!(b.is_open(1));
        assert!(!b.is_open(0));
    }

    #[test]
    fn accordion_toggle_same_entry_closes() {
        let a = Accordion::default().toggle(2).toggle(2);
        assert_eq!(a.open(), None);
    }

    #[test]
    fn group_and_item_scopes_are_independent() {
        let state = NavState::default()
            .apply(NavEvent::Group(1))
            .apply(NavEvent::Item(3))
            .apply(NavEvent::Group(0));
        assert_eq!(state.groups.open(), Some(0));
        assert_eq!(state.items.open(), Some(3));
        assert!(!state.menu_open);
    }

    #[test]
    fn hamburger_flips_indefinitely() {
        let mut state = NavState::default();
        for i in 0..5 {
            state = state.apply(NavEvent::Hamburger);
            assert_eq!(state.menu_open, i % 2 == 0);
        }
    }

    #[test]
    fn lock_scroll_preserves_other_styles() {
        let doc = Document::from(r#"<html><body style="color: red"></body></html>"#);
        let body = doc.select("body");
        lock_scroll(&body, true);
        assert_eq!(
            body.attr("style").map(|s| s.to_string()).as_deref(),
            Some("color: red; overflow-y: hidden;")
        );
        lock_scroll(&body, false);
        assert_eq!(body.attr("style").map(|s| s.to_string()).as_deref(), Some("color: red;"));
    }

    #[test]
    fn unlock_removes_empty_style() {
        let doc = Document::from(r#"<html><body></body></html>"#);
        let body = doc.select("body");
        lock_scroll(&body, true);
        lock_scroll(&body, false);
        assert!(body.attr("style").is_none());
    }
}
