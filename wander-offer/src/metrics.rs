use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wander_catalog::Offer;
use crate::highlight::{Favorability, HighlightPair, Highlighter};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    TripLength,
    TotalPrice,
    PricePerDay,
    Transport,
    Housing,
    Food,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::TripLength,
        MetricKind::TotalPrice,
        MetricKind::PricePerDay,
        MetricKind::Transport,
        MetricKind::Housing,
        MetricKind::Food,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::TripLength => "Trip length (days)",
            MetricKind::TotalPrice => "Total price",
            MetricKind::PricePerDay => "Price per day",
            MetricKind::Transport => "Transport",
            MetricKind::Housing => "Housing",
            MetricKind::Food => "Food",
        }
    }

    /// A longer trip is the only figure where more is better
    pub fn favorability(&self) -> Favorability {
        match self {
            MetricKind::TripLength => Favorability::HigherIsBetter,
            _ => Favorability::LowerIsBetter,
        }
    }
}

/// Numbers derived from one offer for side-by-side display
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct OfferFigures {
    pub trip_days: u32,
    pub total_price: u64,
    pub price_per_day: f64,
    pub transport: u32,
    pub housing: u32,
    pub food: u32,
}

impl OfferFigures {
    pub fn extract(offer: &Offer) -> Self {
        let trip_days = offer.trip_days();
        let total_price = offer.composite_price();
        let price_per_day = if trip_days > 0 {
            total_price as f64 / trip_days as f64
        } else {
            0.0
        };

        Self {
            trip_days,
            total_price,
            price_per_day,
            transport: offer.transport_price(),
            housing: offer.price_housing,
            food: offer.price_food,
        }
    }

    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::TripLength => self.trip_days as f64,
            MetricKind::TotalPrice => self.total_price as f64,
            MetricKind::PricePerDay => self.price_per_day,
            MetricKind::Transport => self.transport as f64,
            MetricKind::Housing => self.housing as f64,
            MetricKind::Food => self.food as f64,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonMetric {
    pub kind: MetricKind,
    pub left_value: f64,
    pub right_value: f64,
    pub highlight: HighlightPair,
}

/// Every metric row for the current pair, derived on demand
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonReport {
    pub left_id: Uuid,
    pub right_id: Uuid,
    pub metrics: Vec<ComparisonMetric>,
}

impl ComparisonReport {
    pub fn build(left: &Offer, right: &Offer, highlighter: &Highlighter) -> Self {
        let l = OfferFigures::extract(left);
        let r = OfferFigures::extract(right);

        let metrics = MetricKind::ALL
            .iter()
            .map(|&kind| {
                let left_value = l.value(kind);
                let right_value = r.value(kind);
                ComparisonMetric {
                    kind,
                    left_value,
                    right_value,
                    highlight: highlighter.highlight_with(left_value, right_value, kind.favorability()),
                }
            })
            .collect();

        Self { left_id: left.id, right_id: right.id, metrics }
    }

    pub fn metric(&self, kind: MetricKind) -> Option<&ComparisonMetric> {
        self.metrics.iter().find(|m| m.kind == kind)
    }
}
