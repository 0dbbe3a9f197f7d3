use std::collections::BTreeSet;

/// Next index for the side currently at `current`.
///
/// Scans forward past `current`, then retries previously skipped indices in
/// ascending order, then takes any index that is neither side. Returns
/// `current` only when nothing else qualifies.
pub fn resolve_skip(current: usize, other: usize, skipped: &BTreeSet<usize>, len: usize) -> usize {
    if let Some(next) = (current + 1..len).find(|&i| i != other && !skipped.contains(&i)) {
        return next;
    }

    // A side that came back to a skipped index must still move on
    if let Some(&next) = skipped.iter().find(|&&i| i != other && i != current && i < len) {
        return next;
    }

    (0..len).find(|&i| i != current && i != other).unwrap_or(current)
}
