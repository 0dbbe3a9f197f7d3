use serde::{Deserialize, Serialize};
use crate::config::TriageConfig;

/// Cell tint for one side of a metric row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "shift", rename_all = "snake_case")]
pub enum Tint {
    Neutral,
    Favorable(u8),
    Unfavorable(u8),
}

impl Tint {
    pub fn intensity(&self) -> u8 {
        match self {
            Tint::Neutral => 0,
            Tint::Favorable(s) | Tint::Unfavorable(s) => *s,
        }
    }

    /// Favorable shifts red and green, unfavorable shifts red only
    pub fn rgb(&self, base: u8) -> (u8, u8, u8) {
        match self {
            Tint::Neutral => (base, base, base),
            Tint::Favorable(s) => (base.saturating_add(*s), base.saturating_add(*s), base),
            Tint::Unfavorable(s) => (base.saturating_add(*s), base, base),
        }
    }

    pub fn css(&self, base: u8) -> String {
        let (r, g, b) = self.rgb(base);
        format!("rgb({}, {}, {})", r, g, b)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HighlightPair {
    pub left: Tint,
    pub right: Tint,
    pub relative_diff: f64,
}

impl HighlightPair {
    pub fn neutral() -> Self {
        Self { left: Tint::Neutral, right: Tint::Neutral, relative_diff: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Favorability {
    LowerIsBetter,
    HigherIsBetter,
}

pub struct Highlighter {
    cap: f64,
    max_shift: u8,
}

impl Highlighter {
    pub fn new(cap: f64, max_shift: u8) -> Self {
        Self { cap, max_shift }
    }

    pub fn from_config(config: &TriageConfig) -> Self {
        Self::new(config.highlight_cap, config.max_tint_shift)
    }

    /// Half the spread relative to the midpoint, capped
    pub fn relative_diff(&self, left: f64, right: f64) -> f64 {
        let higher = left.max(right);
        let lower = left.min(right);
        let average = (higher + lower) / 2.0;
        if average <= 0.0 {
            return self.cap;
        }
        ((average - lower) / average).min(self.cap)
    }

    /// Tints for a metric where the cheaper side wins
    pub fn highlight(&self, left: f64, right: f64) -> HighlightPair {
        self.highlight_with(left, right, Favorability::LowerIsBetter)
    }

    pub fn highlight_with(&self, left: f64, right: f64, favorability: Favorability) -> HighlightPair {
        if left == right {
            return HighlightPair::neutral();
        }

        let relative_diff = self.relative_diff(left, right);
        let shift = (relative_diff * self.max_shift as f64).round() as u8;

        let left_wins = match favorability {
            Favorability::LowerIsBetter => left < right,
            Favorability::HigherIsBetter => left > right,
        };

        let (left_tint, right_tint) = if left_wins {
            (Tint::Favorable(shift), Tint::Unfavorable(shift))
        } else {
            (Tint::Unfavorable(shift), Tint::Favorable(shift))
        };

        HighlightPair { left: left_tint, right: right_tint, relative_diff }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::from_config(&TriageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_values_are_neutral() {
        let pair = Highlighter::default().highlight(250.0, 250.0);
        assert_eq!(pair.left, Tint::Neutral);
        assert_eq!(pair.right, Tint::Neutral);
    }

    #[test]
    fn test_large_spread_is_capped() {
        // avg 200, diff 100 → 0.5, capped to 0.4 → round(0.4 * 76) = 30
        let pair = Highlighter::default().highlight(100.0, 300.0);
        assert!((pair.relative_diff - 0.4).abs() < f64::EPSILON);
        assert_eq!(pair.left, Tint::Favorable(30));
        assert_eq!(pair.right, Tint::Unfavorable(30));
    }

    #[test]
    fn test_small_spread() {
        // avg 110, diff 10 → 0.0909 → round(6.909) = 7
        let pair = Highlighter::default().highlight(120.0, 100.0);
        assert_eq!(pair.left, Tint::Unfavorable(7));
        assert_eq!(pair.right, Tint::Favorable(7));
    }

    #[test]
    fn test_highlight_is_mirror_symmetric() {
        let h = Highlighter::default();
        for (a, b) in [(10.0, 40.0), (99.0, 101.0), (0.0, 5.0), (700.0, 300.0)] {
            let forward = h.highlight(a, b);
            let backward = h.highlight(b, a);
            assert_eq!(forward.left, backward.right);
            assert_eq!(forward.right, backward.left);
            assert_eq!(forward.left.intensity(), forward.right.intensity());
        }
    }

    #[test]
    fn test_higher_is_better_inverts() {
        let pair = Highlighter::default().highlight_with(3.0, 7.0, Favorability::HigherIsBetter);
        assert!(matches!(pair.left, Tint::Unfavorable(_)));
        assert!(matches!(pair.right, Tint::Favorable(_)));
    }

    #[test]
    fn test_tint_rgb() {
        assert_eq!(Tint::Neutral.rgb(42), (42, 42, 42));
        assert_eq!(Tint::Favorable(30).rgb(42), (72, 72, 42));
        assert_eq!(Tint::Unfavorable(30).css(42), "rgb(72, 42, 42)");
        assert_eq!(Tint::Favorable(30).rgb(250), (255, 255, 250));
    }
}
