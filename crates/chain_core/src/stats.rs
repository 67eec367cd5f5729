//! Dispatch statistics: per-handler visit and resolution counters.

use serde::Serialize;

/// Counters for one handler in a chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HandlerStats {
    pub name: String,
    /// Number of requests this handler was asked about.
    pub visits: u64,
    /// Number of those requests it resolved.
    pub resolutions: u64,
}

impl HandlerStats {
    /// Fraction of visits that this handler resolved.
    pub fn hit_ratio(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.resolutions as f64 / self.visits as f64
        }
    }
}

/// Point-in-time snapshot of a chain's counters, in evaluation order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChainStats {
    pub dispatches: u64,
    /// Dispatches that ran off the end of the chain unresolved.
    pub exhausted: u64,
    pub handlers: Vec<HandlerStats>,
}

impl ChainStats {
    pub fn resolved(&self) -> u64 {
        self.dispatches.saturating_sub(self.exhausted)
    }

    pub fn handler(&self, name: &str) -> Option<&HandlerStats> {
        self.handlers.iter().find(|h| h.name == name)
    }
}
