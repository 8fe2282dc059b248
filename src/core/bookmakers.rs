/// Split a comma-separated list into trimmed, lowercased, non-empty tokens
/// joined back with commas.
#[inline]
pub fn normalize_list(raw: &str) -> String {
    raw.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Derive the bookmaker selector for an upstream call
///
/// Precedence is `books` (plural, comma-separated), then `book` (legacy
/// singular), then `default_list`. Each candidate is normalized and the first
/// one that is still non-empty wins, so the result is never empty as long as
/// `default_list` itself holds at least one token.
///
/// Duplicates are left for the provider to collapse.
pub fn normalize_bookmakers(
    books_param: Option<&str>,
    book_param: Option<&str>,
    default_list: &str,
) -> String {
    [books_param, book_param]
        .into_iter()
        .flatten()
        .map(normalize_list)
        .find(|list| !list.is_empty())
        .unwrap_or_else(|| normalize_list(default_list))
}
