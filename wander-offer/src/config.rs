use serde::{Deserialize, Serialize};
use wander_catalog::BoundsConfig;

/// Presentation tuning for triage and comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriageConfig {
    /// Upper limit on the relative difference fed into tinting
    #[serde(default = "default_highlight_cap")]
    pub highlight_cap: f64,

    /// Channel delta reached at a relative difference of 1.0
    #[serde(default = "default_max_tint_shift")]
    pub max_tint_shift: u8,

    /// Channel value of an untinted cell
    #[serde(default = "default_neutral_channel")]
    pub neutral_channel: u8,

    /// Settling window for criteria edits
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_fallback_ceiling")]
    pub fallback_ceiling: u64,

    #[serde(default = "default_degenerate_bump")]
    pub degenerate_bump: u64,
}

fn default_highlight_cap() -> f64 { 0.4 }
fn default_max_tint_shift() -> u8 { 76 }
fn default_neutral_channel() -> u8 { 42 }
fn default_debounce_ms() -> u64 { 400 }
fn default_fallback_ceiling() -> u64 { 10_000 }
fn default_degenerate_bump() -> u64 { 1 }

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            highlight_cap: default_highlight_cap(),
            max_tint_shift: default_max_tint_shift(),
            neutral_channel: default_neutral_channel(),
            debounce_ms: default_debounce_ms(),
            fallback_ceiling: default_fallback_ceiling(),
            degenerate_bump: default_degenerate_bump(),
        }
    }
}

impl TriageConfig {
    pub fn bounds_config(&self) -> BoundsConfig {
        BoundsConfig {
            fallback_ceiling: self.fallback_ceiling,
            degenerate_bump: self.degenerate_bump,
        }
    }

    pub fn debounce_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}
