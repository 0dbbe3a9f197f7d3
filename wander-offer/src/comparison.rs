use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;
use wander_catalog::{DecisionStatus, Offer};
use crate::highlight::Highlighter;
use crate::metrics::ComparisonReport;
use crate::skip::resolve_skip;
use crate::OfferError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl FromStr for Side {
    type Err = OfferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            _ => Err(OfferError::UnknownSide(s.to_string())),
        }
    }
}

/// Indices into the working set plus what each side has already skipped past
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComparisonSelection {
    pub left: usize,
    pub right: usize,
    pub left_skipped: BTreeSet<usize>,
    pub right_skipped: BTreeSet<usize>,
}

impl ComparisonSelection {
    pub fn initial() -> Self {
        Self {
            left: 0,
            right: 1,
            left_skipped: BTreeSet::new(),
            right_skipped: BTreeSet::new(),
        }
    }

    pub fn index(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn parts(&mut self, side: Side) -> (&mut usize, usize, &mut BTreeSet<usize>) {
        match side {
            Side::Left => (&mut self.left, self.right, &mut self.left_skipped),
            Side::Right => (&mut self.right, self.left, &mut self.right_skipped),
        }
    }

    /// Advance one side; returns false when it had nowhere to go
    pub fn skip(&mut self, side: Side, len: usize) -> bool {
        let (current, other, skipped) = self.parts(side);
        let next = resolve_skip(*current, other, skipped, len);
        if next == *current {
            return false;
        }
        skipped.insert(*current);
        *current = next;
        true
    }

    /// Jump one side to `index`, or behave like `skip` when the target is unusable
    pub fn skip_to(&mut self, side: Side, index: usize, len: usize) -> bool {
        if index >= len || index == self.index(opposite(side)) {
            return self.skip(side, len);
        }
        let (current, _, skipped) = self.parts(side);
        if index != *current {
            skipped.insert(*current);
            *current = index;
        }
        true
    }

    /// Account for the entry at `removed` leaving a working set that now has `len` entries
    pub fn remove_index(&mut self, removed: usize, len: usize) {
        let left_lost = self.left == removed;
        let right_lost = self.right == removed;

        for (index, skipped) in [
            (&mut self.left, &mut self.left_skipped),
            (&mut self.right, &mut self.right_skipped),
        ] {
            if *index > removed {
                *index -= 1;
            }
            *skipped = skipped
                .iter()
                .filter(|&&i| i != removed)
                .map(|&i| if i > removed { i - 1 } else { i })
                .collect();
        }

        if len < 2 {
            return;
        }

        if left_lost {
            self.left = first_other_than(self.right, len);
        }
        if right_lost {
            self.right = first_other_than(self.left, len);
        }
    }
}

fn opposite(side: Side) -> Side {
    match side {
        Side::Left => Side::Right,
        Side::Right => Side::Left,
    }
}

fn first_other_than(other: usize, len: usize) -> usize {
    (0..len).find(|&i| i != other).unwrap_or(0)
}

impl Default for ComparisonSelection {
    fn default() -> Self {
        Self::initial()
    }
}

/// What the comparison screen should show
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonView {
    /// Fewer than two offers left to compare
    Insufficient { available: usize },
    Ready { left: Offer, right: Offer },
}

/// Side-by-side comparison over a working set of undecided offers
#[derive(Debug, Clone)]
pub struct Comparison {
    working_set: Vec<Offer>,
    selection: ComparisonSelection,
}

impl Comparison {
    /// Build the working set from the current view and the user's picks.
    ///
    /// Only undecided offers take part. No picks means every undecided offer;
    /// a single pick leads, followed by the rest; two or more picks form the
    /// set on their own, in view order.
    pub fn build(view: &[Offer], picks: &HashSet<Uuid>) -> Self {
        let undecided: Vec<&Offer> = view
            .iter()
            .filter(|o| o.status == DecisionStatus::Undecided)
            .collect();
        let picked: Vec<&Offer> = undecided
            .iter()
            .copied()
            .filter(|o| picks.contains(&o.id))
            .collect();

        let working_set = match picked.len() {
            0 => undecided.into_iter().cloned().collect(),
            1 => {
                let lead = picked[0];
                std::iter::once(lead)
                    .chain(undecided.into_iter().filter(|o| o.id != lead.id))
                    .cloned()
                    .collect()
            }
            _ => picked.into_iter().cloned().collect(),
        };

        Self::from_working_set(working_set)
    }

    pub fn from_working_set(working_set: Vec<Offer>) -> Self {
        Self { working_set, selection: ComparisonSelection::initial() }
    }

    pub fn working_set(&self) -> &[Offer] {
        &self.working_set
    }

    pub fn selection(&self) -> &ComparisonSelection {
        &self.selection
    }

    pub fn len(&self) -> usize {
        self.working_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working_set.is_empty()
    }

    pub fn is_comparable(&self) -> bool {
        self.working_set.len() >= 2
    }

    pub fn offer(&self, side: Side) -> Option<&Offer> {
        if !self.is_comparable() {
            return None;
        }
        self.working_set.get(self.selection.index(side))
    }

    pub fn view(&self) -> ComparisonView {
        match (self.offer(Side::Left), self.offer(Side::Right)) {
            (Some(left), Some(right)) => ComparisonView::Ready {
                left: left.clone(),
                right: right.clone(),
            },
            _ => ComparisonView::Insufficient { available: self.working_set.len() },
        }
    }

    pub fn skip(&mut self, side: Side) -> bool {
        if !self.is_comparable() {
            return false;
        }
        self.selection.skip(side, self.working_set.len())
    }

    pub fn skip_to(&mut self, side: Side, index: usize) -> bool {
        if !self.is_comparable() {
            return false;
        }
        self.selection.skip_to(side, index, self.working_set.len())
    }

    /// Drop an offer from the working set, reselecting a side that pointed at it
    pub fn remove(&mut self, offer_id: Uuid) -> bool {
        let Some(position) = self.working_set.iter().position(|o| o.id == offer_id) else {
            return false;
        };
        self.working_set.remove(position);
        self.selection.remove_index(position, self.working_set.len());
        debug!(%offer_id, remaining = self.working_set.len(), "Offer left comparison working set");
        true
    }

    /// Replace the stored copy of an offer; a decided offer leaves the set
    pub fn refresh_offer(&mut self, offer: &Offer) -> bool {
        if offer.status.is_decided() {
            return self.remove(offer.id);
        }
        match self.working_set.iter_mut().find(|o| o.id == offer.id) {
            Some(slot) => {
                *slot = offer.clone();
                true
            }
            None => false,
        }
    }

    pub fn report(&self, highlighter: &Highlighter) -> Option<ComparisonReport> {
        let left = self.offer(Side::Left)?;
        let right = self.offer(Side::Right)?;
        Some(ComparisonReport::build(left, right, highlighter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offers(names: &[&str]) -> Vec<Offer> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Offer::new(*n, "Brno").with_prices(100 * (i as u32 + 1), 0, None))
            .collect()
    }

    fn ids(comparison: &Comparison) -> Vec<String> {
        comparison.working_set().iter().map(|o| o.destination_name.clone()).collect()
    }

    #[test]
    fn test_build_without_picks_takes_all_undecided() {
        let mut view = offers(&["a", "b", "c"]);
        view[1].status = DecisionStatus::Accepted;
        let comparison = Comparison::build(&view, &HashSet::new());
        assert_eq!(ids(&comparison), vec!["a", "c"]);
    }

    #[test]
    fn test_build_with_single_pick_leads() {
        let view = offers(&["a", "b", "c"]);
        let picks: HashSet<Uuid> = [view[2].id].into_iter().collect();
        let comparison = Comparison::build(&view, &picks);
        assert_eq!(ids(&comparison), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_build_with_many_picks_uses_view_order() {
        let mut view = offers(&["a", "b", "c", "d"]);
        view[0].status = DecisionStatus::Rejected;
        let picks: HashSet<Uuid> = [view[3].id, view[1].id, view[0].id].into_iter().collect();
        let comparison = Comparison::build(&view, &picks);
        // Rejected pick is ignored
        assert_eq!(ids(&comparison), vec!["b", "d"]);
    }

    #[test]
    fn test_insufficient_data() {
        let comparison = Comparison::from_working_set(offers(&["only"]));
        assert_eq!(comparison.view(), ComparisonView::Insufficient { available: 1 });
        assert!(comparison.report(&Highlighter::default()).is_none());
    }

    #[test]
    fn test_initial_selection_and_skip_sequence() {
        let mut comparison = Comparison::from_working_set(offers(&["a", "b", "c", "d"]));
        assert_eq!(comparison.selection().left, 0);
        assert_eq!(comparison.selection().right, 1);

        assert!(comparison.skip(Side::Left));
        assert_eq!(comparison.selection().left, 2);
        assert!(comparison.skip(Side::Left));
        assert_eq!(comparison.selection().left, 3);
        assert!(comparison.skip(Side::Left));
        assert_eq!(comparison.selection().left, 0);
        assert_ne!(comparison.selection().left, comparison.selection().right);
    }

    #[test]
    fn test_skip_to() {
        let mut comparison = Comparison::from_working_set(offers(&["a", "b", "c", "d"]));
        assert!(comparison.skip_to(Side::Right, 3));
        assert_eq!(comparison.selection().right, 3);
        assert!(comparison.selection().right_skipped.contains(&1));

        // Target held by the other side falls back to a regular skip
        assert!(comparison.skip_to(Side::Right, 0));
        assert_eq!(comparison.selection().right, 1);
    }

    #[test]
    fn test_removing_compared_offer_reselects() {
        let set = offers(&["a", "b", "c"]);
        let first = set[0].id;
        let mut comparison = Comparison::from_working_set(set);

        assert!(comparison.remove(first));
        let selection = comparison.selection();
        assert_ne!(selection.left, selection.right);
        assert!(selection.left < 2 && selection.right < 2);
        match comparison.view() {
            ComparisonView::Ready { left, right } => {
                assert_eq!(left.destination_name, "c");
                assert_eq!(right.destination_name, "b");
            }
            other => panic!("expected a pair, got {:?}", other),
        }
    }

    fn selection(left: usize, right: usize, left_skipped: &[usize], right_skipped: &[usize]) -> ComparisonSelection {
        ComparisonSelection {
            left,
            right,
            left_skipped: left_skipped.iter().copied().collect(),
            right_skipped: right_skipped.iter().copied().collect(),
        }
    }

    #[test]
    fn test_remove_index_cases() {
        // (before, removed, len after, expected)
        let cases = vec![
            // removed ahead of both sides: everything shifts down, skips included
            (selection(2, 3, &[0, 1], &[1]), 0, 3, selection(1, 2, &[0], &[0])),
            // removed between the sides
            (selection(0, 3, &[], &[1, 2]), 1, 3, selection(0, 2, &[], &[1])),
            // right side loses its offer and takes the first free index
            (selection(0, 2, &[], &[1]), 2, 3, selection(0, 1, &[], &[1])),
            // left side loses its offer while right sits on 0
            (selection(1, 0, &[2], &[]), 1, 3, selection(1, 0, &[1], &[])),
            // removed index is dropped from the skip sets
            (selection(0, 1, &[2, 3], &[2]), 2, 3, selection(0, 1, &[2], &[])),
            // removed behind both sides leaves them alone
            (selection(0, 1, &[], &[]), 3, 3, selection(0, 1, &[], &[])),
        ];

        for (mut before, removed, len, expected) in cases {
            before.remove_index(removed, len);
            assert_eq!(before, expected, "removing {} leaving {}", removed, len);
        }
    }

    #[test]
    fn test_skip_keeps_moving_after_a_full_lap() {
        let mut comparison = Comparison::from_working_set(offers(&["a", "b", "c", "d"]));
        for _ in 0..3 {
            assert!(comparison.skip(Side::Left));
        }
        assert_eq!(comparison.selection().left, 0);

        assert!(comparison.skip(Side::Left));
        assert_eq!(comparison.selection().left, 2);
    }

    #[test]
    fn test_removal_down_to_one_is_terminal() {
        let set = offers(&["a", "b"]);
        let second = set[1].id;
        let mut comparison = Comparison::from_working_set(set);
        comparison.remove(second);
        assert_eq!(comparison.view(), ComparisonView::Insufficient { available: 1 });
        assert!(!comparison.skip(Side::Left));
    }

    #[test]
    fn test_refresh_offer_with_decision_removes_it() {
        let set = offers(&["a", "b", "c"]);
        let mut accepted = set[1].clone();
        let mut comparison = Comparison::from_working_set(set);

        accepted.status = DecisionStatus::Accepted;
        assert!(comparison.refresh_offer(&accepted));
        assert_eq!(ids(&comparison), vec!["a", "c"]);
        assert_eq!(comparison.selection().left, 0);
        assert_eq!(comparison.selection().right, 1);
    }
}
