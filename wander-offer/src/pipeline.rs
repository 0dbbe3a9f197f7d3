use serde::Serialize;
use wander_catalog::{DecisionStatus, Offer};
use crate::filter::FilterCriteria;
use crate::sort::{sort_offers, SortSpec};

/// Filter `catalog` conjunctively by `criteria`, then order it by `sort`.
///
/// The input is never modified; equal-key offers keep their catalog order, so
/// re-running with unchanged inputs yields the same sequence.
pub fn apply(catalog: &[Offer], criteria: &FilterCriteria, sort: &SortSpec) -> Vec<Offer> {
    let predicates = criteria.predicates();
    let mut view: Vec<Offer> = catalog
        .iter()
        .filter(|offer| predicates.iter().all(|p| p.matches(offer)))
        .cloned()
        .collect();

    sort_offers(&mut view, sort);
    view
}

/// Offers bucketed by decision, each bucket in pipeline order
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusGroups {
    pub accepted: Vec<Offer>,
    pub undecided: Vec<Offer>,
    pub rejected: Vec<Offer>,
}

impl StatusGroups {
    pub fn get(&self, status: DecisionStatus) -> &[Offer] {
        match status {
            DecisionStatus::Accepted => &self.accepted,
            DecisionStatus::Undecided => &self.undecided,
            DecisionStatus::Rejected => &self.rejected,
        }
    }

    pub fn len(&self) -> usize {
        self.accepted.len() + self.undecided.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn group_by_status(view: &[Offer]) -> StatusGroups {
    let mut groups = StatusGroups::default();
    for offer in view {
        match offer.status {
            DecisionStatus::Accepted => groups.accepted.push(offer.clone()),
            DecisionStatus::Undecided => groups.undecided.push(offer.clone()),
            DecisionStatus::Rejected => groups.rejected.push(offer.clone()),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PriceRange;
    use crate::sort::{SortDirection, SortKey};
    use wander_catalog::{Season, StayType};

    fn priced(name: &str, total: u32) -> Offer {
        Offer::new(name, "Prague").with_prices(total, 0, None)
    }

    #[test]
    fn test_price_filter_keeps_catalog_order() {
        let catalog = vec![priced("first", 100), priced("second", 150), priced("third", 400)];
        let criteria = FilterCriteria::with_price(PriceRange::new(0, 200));
        let view = apply(&catalog, &criteria, &SortSpec::new(SortKey::Status, SortDirection::Asc));

        let ids: Vec<_> = view.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![catalog[0].id, catalog[1].id]);
    }

    #[test]
    fn test_every_survivor_satisfies_every_predicate() {
        let catalog = vec![
            priced("Split", 300).with_season(Season::Summer).with_stay_types(vec![StayType::Beach]),
            priced("Zermatt", 900).with_season(Season::Winter),
            priced("Sopot", 250).with_season(Season::Summer).with_status(DecisionStatus::Rejected),
            priced("Hvar", 5000).with_season(Season::Summer).with_stay_types(vec![StayType::Beach]),
        ];
        let criteria = FilterCriteria {
            price: PriceRange::new(0, 1000),
            season: Some(Season::Summer),
            status: Some(DecisionStatus::Undecided),
            ..Default::default()
        };
        let view = apply(&catalog, &criteria, &SortSpec::default());

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].destination_name, "Split");
        for offer in &view {
            assert!(criteria.predicates().iter().all(|p| p.matches(offer)));
            assert!(catalog.iter().any(|c| c.id == offer.id));
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let catalog = vec![
            priced("a", 300),
            priced("b", 100).with_status(DecisionStatus::Accepted),
            priced("c", 300),
            priced("d", 100),
        ];
        let criteria = FilterCriteria::default();
        let sort = SortSpec::new(SortKey::Price, SortDirection::Desc);

        let first = apply(&catalog, &criteria, &sort);
        let second = apply(&catalog, &criteria, &sort);
        assert_eq!(first, second);

        // Re-filtering the output does not reshuffle equal keys either
        let third = apply(&first, &criteria, &sort);
        assert_eq!(first, third);
    }

    #[test]
    fn test_group_by_status() {
        let view = vec![
            priced("a", 1).with_status(DecisionStatus::Accepted),
            priced("u", 2),
            priced("r", 3).with_status(DecisionStatus::Rejected),
            priced("u2", 4),
        ];
        let groups = group_by_status(&view);
        assert_eq!(groups.accepted.len(), 1);
        assert_eq!(groups.get(DecisionStatus::Undecided).len(), 2);
        assert_eq!(groups.undecided[1].destination_name, "u2");
        assert_eq!(groups.len(), 4);
    }
}
