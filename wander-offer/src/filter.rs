use serde::{Deserialize, Serialize};
use wander_catalog::{BoundsConfig, DecisionStatus, Offer, PriceBounds, Season, StayType};

/// Inclusive composite-price window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && price <= self.max
    }

    /// An empty or single-price window counts as inverted
    pub fn is_inverted(&self) -> bool {
        self.min >= self.max
    }

    /// Repair an inverted window against the current bounds.
    ///
    /// First widen to the union with the bounds; if that is still inverted,
    /// fall back to the bounds themselves (at least one unit wide).
    pub fn corrected(self, bounds: &PriceBounds) -> PriceRange {
        if !self.is_inverted() {
            return self;
        }

        let widened = PriceRange::new(self.min.min(bounds.min), self.max.max(bounds.max));
        if !widened.is_inverted() {
            return widened;
        }

        PriceRange::new(bounds.min, bounds.max.max(bounds.min + 1))
    }
}

impl From<PriceBounds> for PriceRange {
    fn from(bounds: PriceBounds) -> Self {
        PriceRange::new(bounds.min, bounds.max)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange::new(0, BoundsConfig::default().fallback_ceiling)
    }
}

/// A single conjunctive condition
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Status(DecisionStatus),
    Price(PriceRange),
    Season(Season),
    StayType(StayType),
    /// Lower-cased needle
    Origin(String),
    /// Lower-cased needle
    Destination(String),
}

impl Predicate {
    pub fn matches(&self, offer: &Offer) -> bool {
        match self {
            Predicate::Status(status) => offer.status == *status,
            Predicate::Price(range) => range.contains(offer.composite_price()),
            Predicate::Season(season) => offer.season == Some(*season),
            Predicate::StayType(stay) => offer.stay_types.contains(stay),
            Predicate::Origin(needle) => offer.origin.to_lowercase().contains(needle.as_str()),
            Predicate::Destination(needle) => {
                offer.destination_where_to.to_lowercase().contains(needle.as_str())
                    || offer.destination_name.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterCriteria {
    #[serde(default)]
    pub status: Option<DecisionStatus>,
    #[serde(default)]
    pub price: PriceRange,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub stay_type: Option<StayType>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

impl FilterCriteria {
    /// Criteria that accept everything inside `price`
    pub fn with_price(price: PriceRange) -> Self {
        Self { price, ..Default::default() }
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = vec![Predicate::Price(self.price)];

        if let Some(status) = self.status {
            predicates.push(Predicate::Status(status));
        }
        if let Some(season) = self.season {
            predicates.push(Predicate::Season(season));
        }
        if let Some(stay) = self.stay_type {
            predicates.push(Predicate::StayType(stay));
        }
        if let Some(origin) = non_blank(&self.origin) {
            predicates.push(Predicate::Origin(origin.to_lowercase()));
        }
        if let Some(destination) = non_blank(&self.destination) {
            predicates.push(Predicate::Destination(destination.to_lowercase()));
        }

        predicates
    }

    pub fn matches(&self, offer: &Offer) -> bool {
        self.predicates().iter().all(|p| p.matches(offer))
    }

    /// Auto-correct an inverted price window
    pub fn normalized(mut self, bounds: &PriceBounds) -> Self {
        self.price = self.price.corrected(bounds);
        self
    }

    /// True when both criteria select the same population before price filtering
    pub fn same_population(&self, other: &FilterCriteria) -> bool {
        self.status == other.status
            && self.season == other.season
            && self.stay_type == other.stay_type
            && non_blank(&self.origin) == non_blank(&other.origin)
            && non_blank(&self.destination) == non_blank(&other.destination)
    }

    /// Copy of these criteria without a price constraint
    pub fn without_price(&self) -> Self {
        Self {
            price: PriceRange::new(0, u64::MAX),
            ..self.clone()
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(origin: &str, destination: &str, total: u32) -> Offer {
        Offer::new(destination, origin).with_prices(total, 0, None)
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let range = PriceRange::new(100, 200);
        assert!(range.contains(100));
        assert!(range.contains(200));
        assert!(!range.contains(201));
    }

    #[test]
    fn test_corrected_widens_with_bounds() {
        let bounds = PriceBounds::new(50, 900);
        let fixed = PriceRange::new(500, 300).corrected(&bounds);
        assert_eq!(fixed, PriceRange::new(50, 900));
    }

    #[test]
    fn test_corrected_keeps_union_when_bounds_are_narrow() {
        let bounds = PriceBounds::new(400, 401);
        let fixed = PriceRange::new(1000, 200).corrected(&bounds);
        assert_eq!(fixed, PriceRange::new(400, 401));
        assert!(!fixed.is_inverted());
    }

    #[test]
    fn test_corrected_falls_back_to_bounds() {
        // Only reachable when the bounds themselves are inverted
        let bounds = PriceBounds::new(700, 100);
        let fixed = PriceRange::new(900, 50).corrected(&bounds);
        assert_eq!(fixed, PriceRange::new(700, 701));
    }

    #[test]
    fn test_valid_range_untouched() {
        let bounds = PriceBounds::new(0, 10);
        assert_eq!(PriceRange::new(300, 500).corrected(&bounds), PriceRange::new(300, 500));
    }

    #[test]
    fn test_single_price_window_is_widened() {
        assert!(PriceRange::new(300, 300).is_inverted());

        let fixed = PriceRange::new(300, 300).corrected(&PriceBounds::new(0, 10));
        assert_eq!(fixed, PriceRange::new(0, 300));

        let fixed = PriceRange::new(300, 300).corrected(&PriceBounds::new(100, 900));
        assert_eq!(fixed, PriceRange::new(100, 900));
    }

    #[test]
    fn test_text_predicates_are_case_insensitive_substrings() {
        let criteria = FilterCriteria {
            origin: Some("PRA".to_string()),
            destination: Some("spl".to_string()),
            ..Default::default()
        };
        assert!(criteria.matches(&offer("Prague", "Split", 300)));
        assert!(!criteria.matches(&offer("Brno", "Split", 300)));
    }

    #[test]
    fn test_blank_text_is_no_constraint() {
        let criteria = FilterCriteria {
            origin: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(criteria.predicates().len(), 1);
        assert!(criteria.matches(&offer("Brno", "Split", 300)));
    }

    #[test]
    fn test_season_and_stay_type() {
        let beach = offer("Brno", "Split", 300)
            .with_season(Season::Summer)
            .with_stay_types(vec![StayType::Beach, StayType::Sightseeing]);
        let criteria = FilterCriteria {
            season: Some(Season::Summer),
            stay_type: Some(StayType::Sightseeing),
            ..Default::default()
        };
        assert!(criteria.matches(&beach));

        let criteria = FilterCriteria { stay_type: Some(StayType::Camping), ..Default::default() };
        assert!(!criteria.matches(&beach));
    }

    #[test]
    fn test_same_population_ignores_price() {
        let a = FilterCriteria::with_price(PriceRange::new(0, 100));
        let mut b = FilterCriteria::with_price(PriceRange::new(50, 900));
        assert!(a.same_population(&b));

        b.origin = Some("Vienna".to_string());
        assert!(!a.same_population(&b));
    }
}
