use serde::{Deserialize, Serialize};
use wander_offer::{FilterCriteria, SortSpec};

/// What the offer source is asked for
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogQuery {
    pub criteria: FilterCriteria,
    #[serde(default)]
    pub sort: SortSpec,
}

impl CatalogQuery {
    pub fn new(criteria: FilterCriteria, sort: SortSpec) -> Self {
        Self { criteria, sort }
    }

    /// Same population, no price window; used to measure bounds
    pub fn without_price(&self) -> Self {
        Self {
            criteria: self.criteria.without_price(),
            sort: self.sort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wander_offer::{PriceRange, SortKey};

    #[test]
    fn test_query_deserialization() {
        let json = r#"
            {
                "criteria": {
                    "origin": "Brno",
                    "price": { "min": 100, "max": 900 }
                },
                "sort": { "key": "price", "direction": "desc" }
            }
        "#;
        let query: CatalogQuery = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(query.criteria.origin.as_deref(), Some("Brno"));
        assert_eq!(query.criteria.price, PriceRange::new(100, 900));
        assert_eq!(query.sort.key, SortKey::Price);
    }

    #[test]
    fn test_without_price_keeps_population() {
        let query = CatalogQuery::new(
            FilterCriteria {
                origin: Some("Vienna".to_string()),
                price: PriceRange::new(10, 20),
                ..Default::default()
            },
            SortSpec::default(),
        );
        let unfiltered = query.without_price();
        assert!(unfiltered.criteria.same_population(&query.criteria));
        assert!(unfiltered.criteria.price.contains(u64::MAX));
    }
}
