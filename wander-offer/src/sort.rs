use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use wander_catalog::{DecisionStatus, Offer};
use crate::OfferError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Status,
    Price,
    Date,
}

impl FromStr for SortKey {
    type Err = OfferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(SortKey::Status),
            "price" => Ok(SortKey::Price),
            "date" => Ok(SortKey::Date),
            _ => Err(OfferError::UnknownSortKey(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = OfferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(OfferError::UnknownSortDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header-click behaviour: same key flips direction, a new key starts ascending
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.flipped())
        } else {
            Self::new(key, SortDirection::Asc)
        }
    }

    pub fn compare(&self, a: &Offer, b: &Offer) -> Ordering {
        match self.key {
            SortKey::Status => self.direction.orient(status_rank(a.status).cmp(&status_rank(b.status))),
            SortKey::Price => self.direction.orient(a.composite_price().cmp(&b.composite_price())),
            // Undated offers trail in both directions
            SortKey::Date => match (a.date_from, b.date_from) {
                (Some(x), Some(y)) => self.direction.orient(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// Grouping rank for the status key; groups, does not alphabetize
pub fn status_rank(status: DecisionStatus) -> u8 {
    match status {
        DecisionStatus::Undecided => 0,
        DecisionStatus::Accepted => 1,
        DecisionStatus::Rejected => 2,
    }
}

/// Stable sort: equal keys keep catalog order
pub fn sort_offers(offers: &mut [Offer], spec: &SortSpec) {
    offers.sort_by(|a, b| spec.compare(a, b));
}
