use serde::{Deserialize, Serialize};
use crate::offer::Offer;

/// Composite-price extremes used to size the price range control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: u64,
    pub max: u64,
}

impl PriceBounds {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && price <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundsConfig {
    /// Upper bound used when there is nothing to measure
    pub fallback_ceiling: u64,

    /// Added to the ceiling when every offer costs the same
    pub degenerate_bump: u64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            fallback_ceiling: 10_000,
            degenerate_bump: 1,
        }
    }
}

/// Computes bounds over an unfiltered catalog.
///
/// Callers must hand in the population *before* price filtering; measuring the
/// price-filtered view would shrink the control every time it is narrowed.
pub struct BoundsCalculator {
    config: BoundsConfig,
}

impl BoundsCalculator {
    pub fn new(config: BoundsConfig) -> Self {
        Self { config }
    }

    pub fn fallback(&self) -> PriceBounds {
        PriceBounds::new(0, self.config.fallback_ceiling)
    }

    pub fn bounds(&self, catalog: &[Offer]) -> PriceBounds {
        let mut prices = catalog.iter().map(Offer::composite_price);
        let Some(first) = prices.next() else {
            return self.fallback();
        };

        let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));

        if min == max {
            return PriceBounds::new(min, max + self.config.degenerate_bump.max(1));
        }

        PriceBounds::new(min, max)
    }
}

impl Default for BoundsCalculator {
    fn default() -> Self {
        Self::new(BoundsConfig::default())
    }
}
