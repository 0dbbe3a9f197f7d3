use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use crate::CatalogError;

/// Customer decision on an offer
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    #[default]
    Undecided,
    Accepted,
    Rejected,
}

impl DecisionStatus {
    pub const ALL: [DecisionStatus; 3] = [
        DecisionStatus::Undecided,
        DecisionStatus::Accepted,
        DecisionStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Undecided => "UNDECIDED",
            DecisionStatus::Accepted => "ACCEPTED",
            DecisionStatus::Rejected => "REJECTED",
        }
    }

    /// Accepted and rejected offers no longer take part in comparison
    pub fn is_decided(&self) -> bool {
        !matches!(self, DecisionStatus::Undecided)
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNDECIDED" | "" => Ok(DecisionStatus::Undecided),
            "ACCEPTED" => Ok(DecisionStatus::Accepted),
            "REJECTED" => Ok(DecisionStatus::Rejected),
            _ => Err(CatalogError::UnknownStatus(s.to_string())),
        }
    }
}

/// Upstream records may carry `"status": null` or omit it entirely; both mean undecided.
fn status_or_undecided<'de, D>(deserializer: D) -> Result<DecisionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DecisionStatus>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Summer,
    Winter,
    Spring,
    Autumn,
}

impl FromStr for Season {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summer" => Ok(Season::Summer),
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "autumn" | "fall" => Ok(Season::Autumn),
            _ => Err(CatalogError::UnknownSeason(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StayType {
    Beach,
    Sightseeing,
    Camping,
}

impl FromStr for StayType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beach" => Ok(StayType::Beach),
            "sightseeing" => Ok(StayType::Sightseeing),
            "camping" => Ok(StayType::Camping),
            _ => Err(CatalogError::UnknownStayType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    TrainBus,
    Plane,
    CarOwn,
    #[default]
    None,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::TrainBus => "train_bus",
            TransportMode::Plane => "plane",
            TransportMode::CarOwn => "car_own",
            TransportMode::None => "none",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train_bus" | "train" | "bus" => Ok(TransportMode::TrainBus),
            "plane" => Ok(TransportMode::Plane),
            "car_own" | "car" => Ok(TransportMode::CarOwn),
            "none" => Ok(TransportMode::None),
            _ => Err(CatalogError::UnknownTransportMode(s.to_string())),
        }
    }
}

/// A priced travel package as delivered by the offer source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    pub id: Uuid,
    pub destination_name: String,
    #[serde(default)]
    pub country: String,
    pub origin: String,
    #[serde(default)]
    pub destination_where_to: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub extended_description: Option<String>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    pub price_housing: u32,
    #[serde(default)]
    pub price_food: u32,
    #[serde(default)]
    pub price_transport: Option<u32>,
    #[serde(default)]
    pub transport_mode: TransportMode,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub stay_types: Vec<StayType>,
    #[serde(default)]
    pub capacity_total: u32,
    #[serde(default, deserialize_with = "status_or_undecided")]
    pub status: DecisionStatus,
    #[serde(default)]
    pub note: Option<String>,
}

impl Offer {
    /// Create an undated, unpriced offer
    pub fn new(destination_name: impl Into<String>, origin: impl Into<String>) -> Self {
        let destination_name = destination_name.into();
        Self {
            id: Uuid::new_v4(),
            destination_where_to: destination_name.clone(),
            destination_name,
            country: String::new(),
            origin: origin.into(),
            short_description: String::new(),
            extended_description: None,
            date_from: None,
            date_to: None,
            price_housing: 0,
            price_food: 0,
            price_transport: None,
            transport_mode: TransportMode::None,
            season: None,
            stay_types: Vec::new(),
            capacity_total: 0,
            status: DecisionStatus::Undecided,
            note: None,
        }
    }

    pub fn with_prices(mut self, housing: u32, food: u32, transport: Option<u32>) -> Self {
        self.price_housing = housing;
        self.price_food = food;
        self.price_transport = transport;
        self
    }

    pub fn with_dates(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    pub fn with_status(mut self, status: DecisionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_stay_types(mut self, stay_types: Vec<StayType>) -> Self {
        self.stay_types = stay_types;
        self
    }

    pub fn with_transport_mode(mut self, mode: TransportMode) -> Self {
        self.transport_mode = mode;
        self
    }

    pub fn with_capacity(mut self, capacity_total: u32) -> Self {
        self.capacity_total = capacity_total;
        self
    }

    pub fn transport_price(&self) -> u32 {
        self.price_transport.unwrap_or(0)
    }

    /// Housing + food + transport
    pub fn composite_price(&self) -> u64 {
        self.price_housing as u64 + self.price_food as u64 + self.transport_price() as u64
    }

    /// Length of the stay in days, 0 when either end of the range is missing
    pub fn trip_days(&self) -> u32 {
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) => (to - from).num_days().unsigned_abs() as u32,
            _ => 0,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if to <= from {
                return Err(CatalogError::InvalidDateRange { id: self.id.to_string() });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_composite_price_treats_missing_transport_as_zero() {
        let offer = Offer::new("Split", "Prague").with_prices(300, 120, None);
        assert_eq!(offer.composite_price(), 420);

        let offer = offer.with_prices(300, 120, Some(80));
        assert_eq!(offer.composite_price(), 500);
    }

    #[test]
    fn test_trip_days() {
        let offer = Offer::new("Split", "Prague").with_dates(date(2025, 7, 1), date(2025, 7, 8));
        assert_eq!(offer.trip_days(), 7);
        assert_eq!(Offer::new("Split", "Prague").trip_days(), 0);
    }

    #[test]
    fn test_validate_rejects_inverted_dates() {
        let offer = Offer::new("Split", "Prague").with_dates(date(2025, 7, 8), date(2025, 7, 8));
        assert!(matches!(offer.validate(), Err(CatalogError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_null_status_deserializes_as_undecided() {
        let json = r#"
            {
                "id": "6f1c1b7e-4d4e-4a43-9a1f-0d1c3e0b8f11",
                "destination_name": "Lisbon",
                "origin": "Brno",
                "price_housing": 400,
                "status": null
            }
        "#;
        let offer: Offer = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(offer.status, DecisionStatus::Undecided);

        let json = r#"{"id": "6f1c1b7e-4d4e-4a43-9a1f-0d1c3e0b8f11", "destination_name": "Lisbon", "origin": "Brno", "price_housing": 400}"#;
        let offer: Offer = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(offer.status, DecisionStatus::Undecided);
        assert_eq!(offer.transport_mode, TransportMode::None);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("accepted".parse::<DecisionStatus>().unwrap(), DecisionStatus::Accepted);
        assert_eq!(" Rejected ".parse::<DecisionStatus>().unwrap(), DecisionStatus::Rejected);
        assert!("maybe".parse::<DecisionStatus>().is_err());
    }
}
