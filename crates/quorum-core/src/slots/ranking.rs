//! Suggestion ranking.

use crate::meeting::SuggestedSlot;

/// Select the best suggestions: filter by minimum availability percentage,
/// sort by descending available count (ties broken by ascending start
/// instant), truncate to `limit`.
///
/// `limit == 0` yields an empty list. `min_availability_pct` is honored
/// literally; values outside `[0, 100]` are not clamped.
pub fn top_suggestions(
    slots: &[SuggestedSlot],
    limit: usize,
    min_availability_pct: f64,
) -> Vec<SuggestedSlot> {
    if limit == 0 {
        return Vec::new();
    }
    let mut kept: Vec<SuggestedSlot> = slots
        .iter()
        .filter(|s| s.availability_percentage() >= min_availability_pct)
        .cloned()
        .collect();
    kept.sort_by(|a, b| {
        b.available_count
            .cmp(&a.available_count)
            .then_with(|| a.start.cmp(&b.start))
    });
    kept.truncate(limit);
    kept
}
