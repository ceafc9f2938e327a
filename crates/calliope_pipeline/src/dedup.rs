//! History-based title deduplication.

use calliope_core::HistoryEntry;

/// Collect prior titles generated for a niche, in stored order.
///
/// The niche match is case-insensitive. The returned list is embedded
/// verbatim into the plan-generation instruction so the model avoids
/// repeating exact titles; an empty result means no exclusion
/// instruction is emitted at all.
///
/// # Examples
///
/// ```
/// use calliope_core::HistoryEntry;
/// use calliope_pipeline::titles_for_niche;
///
/// let history = vec![
///     HistoryEntry::new("Coffee Shop".to_string(), "Latte art basics".to_string()),
///     HistoryEntry::new("bakery".to_string(), "Sourdough myths".to_string()),
/// ];
///
/// let titles = titles_for_niche(&history, "coffee shop");
/// assert_eq!(titles, vec!["Latte art basics"]);
/// assert!(titles_for_niche(&history, "florist").is_empty());
/// ```
pub fn titles_for_niche(history: &[HistoryEntry], niche: &str) -> Vec<String> {
    let niche = niche.to_lowercase();
    history
        .iter()
        .filter(|entry| entry.niche.to_lowercase() == niche)
        .map(|entry| entry.title.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<HistoryEntry> {
        vec![
            HistoryEntry::new("coffee shop".to_string(), "Latte art basics".to_string()),
            HistoryEntry::new("Bakery".to_string(), "Sourdough myths".to_string()),
            HistoryEntry::new("COFFEE SHOP".to_string(), "Bean origins".to_string()),
        ]
    }

    #[test]
    fn matches_niche_case_insensitively() {
        let titles = titles_for_niche(&history(), "Coffee Shop");
        assert_eq!(titles, vec!["Latte art basics", "Bean origins"]);
    }

    #[test]
    fn preserves_stored_order() {
        let titles = titles_for_niche(&history(), "coffee shop");
        assert_eq!(titles[0], "Latte art basics");
        assert_eq!(titles[1], "Bean origins");
    }

    #[test]
    fn unrelated_niche_yields_empty() {
        assert!(titles_for_niche(&history(), "florist").is_empty());
    }
}
