// ABOUTME: Compile-once cache for the importer's denylists and configured block selectors.
// ABOUTME: Invalid selectors are cached as None so they are only reported once.

//! Compiled selectors for the importer's per-page denylists.
//!
//! The strip and cleanup lists, plus the configured main and block selectors,
//! are the same strings for every page of a batch. Each string is compiled
//! once; a string that fails to compile is remembered as `None` and reported
//! the first time it is seen, not once per page.

use std::collections::HashMap;
use std::sync::RwLock;

use dom_query::Matcher;
use once_cell::sync::Lazy;

type Cache = HashMap<String, Option<Matcher>>;

static SELECTORS: Lazy<RwLock<Cache>> = Lazy::new(|| RwLock::new(HashMap::new()));

fn compile(css: &str) -> Option<Matcher> {
    match Matcher::new(css) {
        Ok(matcher) => Some(matcher),
        Err(_) => {
            tracing::warn!(selector = css, "ignoring invalid CSS selector");
            None
        }
    }
}

/// The compiled matcher for `css`, or `None` when it does not parse.
pub fn get_or_compile(css: &str) -> Option<Matcher> {
    if let Some(hit) = SELECTORS.read().unwrap_or_else(|e| e.into_inner()).get(css) {
        return hit.clone();
    }
    SELECTORS
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .entry(css.to_string())
        .or_insert_with(|| compile(css))
        .clone()
}

/// Compiles a selector list up front, e.g. a configured denylist before a
/// batch import. Returns the entries that do not parse, in input order.
pub fn precompile_selectors<I, S>(selectors: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cache = SELECTORS.write().unwrap_or_else(|e| e.into_inner());
    let mut invalid = Vec::new();
    for css in selectors {
        let css = css.as_ref();
        let compiled = cache
            .entry(css.to_string())
            .or_insert_with(|| compile(css));
        if compiled.is_none() {
            invalid.push(css.to_string());
        }
    }
    invalid
}
