use crate::models::Entry;

/// Entries whose name contains `query`, ignoring case, in their original order.
///
/// An empty query matches everything. Values are never searched.
pub fn filtered_view<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    if query.is_empty() {
        return entries.iter().collect();
    }

    let needle = query.to_lowercase();
    entries.iter().filter(|entry| entry.name.to_lowercase().contains(&needle)).collect()
}
