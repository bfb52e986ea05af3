pub(super) fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty()).map(|s| s.trim().to_string())
}

pub(super) fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| non_empty(Some(v)))
}

/// Trimmed non-blank entries, or `None` when nothing is left.
pub(super) fn non_empty_list(v: Option<Vec<String>>) -> Option<Vec<String>> {
    let items: Vec<String> = v?
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
