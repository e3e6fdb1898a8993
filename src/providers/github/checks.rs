use scraper::{Html, Selector};
use std::sync::LazyLock;

/// CSS selector for the per-check "Details" anchors on a pull request page.
pub const STATUS_ACTIONS_SELECTOR: &str = "a.status-actions";

/// Substring that marks a check as the end-to-end job.
const E2E_MARKER: &str = "e2e";

static STATUS_ACTIONS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(STATUS_ACTIONS_SELECTOR).unwrap());

/// A status check anchor found on a pull request page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckLink {
    /// Target of the anchor, if it has one
    pub href: Option<String>,
    /// Visible anchor text, trimmed
    pub label: String,
}

/// Extracts every status check anchor from rendered pull request markup.
///
/// Anchors are returned in document order. Only `<a>` elements carrying the
/// `status-actions` class are considered.
pub fn extract_check_links(html: &str) -> Vec<CheckLink> {
    let document = Html::parse_document(html);

    document
        .select(&STATUS_ACTIONS)
        .map(|element| CheckLink {
            href: element.value().attr("href").map(ToString::to_string),
            label: element.text().collect::<String>().trim().to_string(),
        })
        .collect()
}

/// Returns the target of the first check link pointing at an e2e job.
///
/// The match is a case-sensitive substring test on the link target; anchors
/// without a target are skipped.
pub fn select_e2e_link(checks: &[CheckLink]) -> Option<&str> {
    checks
        .iter()
        .filter_map(|check| check.href.as_deref())
        .find(|href| href.contains(E2E_MARKER))
}
