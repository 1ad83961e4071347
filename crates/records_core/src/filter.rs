use crate::models::DocumentRequest;

/// Case-insensitive substring search over the queue.
///
/// An empty query returns every request. Input order is kept.
/// Debouncing the query is the caller's business.
pub fn filter_requests<'a>(requests: &'a [DocumentRequest], query: &str) -> Vec<&'a DocumentRequest> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return requests.iter().collect();
    }

    requests
        .iter()
        .filter(|request| request.search_text().to_lowercase().contains(&needle))
        .collect()
}
