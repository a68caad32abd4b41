//! Tree-query helpers for scraping result pages
//!
//! Small traversal functions over a parsed [`scraper::Html`] document, kept
//! independent of any one provider layout.

use std::collections::HashSet;

use scraper::{ElementRef, Node, Selector};

use crate::error::PronunciationError;

/// Parse a CSS selector
///
/// # Errors
///
/// Returns a parse error if the selector is invalid.
pub fn selector(css: &str) -> Result<Selector, PronunciationError> {
    Selector::parse(css)
        .map_err(|e| PronunciationError::ParseError(format!("invalid selector {css:?}: {e}")))
}

/// Concatenated text of an element and its descendants
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of an element, skipping everything inside `excluded`
pub fn text_excluding(element: ElementRef<'_>, excluded: Option<ElementRef<'_>>) -> String {
    let Some(excluded) = excluded else {
        return text_of(element);
    };
    let skipped: HashSet<_> = excluded.descendants().map(|node| node.id()).collect();

    element
        .descendants()
        .filter(|node| !skipped.contains(&node.id()))
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect()
}

/// First descendant matching `selector`
pub fn first_match<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Every descendant matching `selector`, paired with the text since the
/// previous match (or the start of `element`)
///
/// Text inside the matches themselves is never part of a label. Whitespace in
/// labels is collapsed to single spaces.
pub fn labelled_matches<'a>(
    element: ElementRef<'a>,
    selector: &Selector,
) -> Vec<(ElementRef<'a>, String)> {
    let matches: Vec<_> = element.select(selector).collect();
    let inside: HashSet<_> = matches
        .iter()
        .flat_map(|matched| matched.descendants().map(|node| node.id()))
        .collect();

    let mut labelled = Vec::with_capacity(matches.len());
    let mut pending = String::new();
    for node in element.descendants() {
        if let Some(matched) = matches.iter().find(|matched| matched.id() == node.id()) {
            labelled.push((*matched, collapse_whitespace(&pending)));
            pending.clear();
            continue;
        }
        let text = match node.value() {
            Node::Text(text) if !inside.contains(&node.id()) => &**text,
            _ => continue,
        };
        pending.push_str(text);
    }
    labelled
}

/// Trim and collapse every whitespace run to a single space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ancestor `levels` steps up (1 is the parent)
pub fn nth_ancestor(element: ElementRef<'_>, levels: usize) -> Option<ElementRef<'_>> {
    element.ancestors().filter_map(ElementRef::wrap).nth(levels.checked_sub(1)?)
}

/// Closest ancestor satisfying `predicate`
pub fn nearest_ancestor<'a>(
    element: ElementRef<'a>,
    predicate: impl Fn(&ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| predicate(ancestor))
}

/// Argument of a `javascript:` link such as `javascript:fnSoundPlay('url');`
///
/// Links that are not wrapped in a call to `function` are returned trimmed
/// but otherwise unchanged.
pub fn js_call_argument(href: &str, function: &str) -> String {
    let href = href.trim();
    let call = href.strip_prefix("javascript:").unwrap_or(href).trim();
    let Some(args) = call
        .strip_prefix(function)
        .and_then(|rest| rest.trim_start().strip_prefix('('))
    else {
        return href.to_string();
    };

    let args = args.trim_end().trim_end_matches(';').trim_end();
    let args = args.strip_suffix(')').unwrap_or(args).trim();
    args.trim_matches(|c| c == '\'' || c == '"').to_string()
}

/// Replace every run of three spaces with a single space
pub fn collapse_triple_spaces(text: &str) -> String {
    text.replace("   ", " ")
}

/// Remove tabs and newlines
pub fn strip_line_breaks(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\n' | '\r' | '\t')).collect()
}

/// Upgrade plain `http://` links to `https://`
pub fn force_https(url: &str) -> String {
    url.strip_prefix("http://")
        .map_or_else(|| url.to_string(), |rest| format!("https://{rest}"))
}
