use std::collections::BTreeMap;

use chain_core::chain::Chain;
use chain_core::config::{ChainConfig, TierSpec};
use chain_core::store::StoreKind;
use rand::rngs::StdRng;
use rand::Rng;

/// Randomly generated tier layout plus the ground truth needed to check a dispatch.
#[derive(Clone, Debug)]
pub struct TierLayout {
    pub tiers: Vec<TierSpec>,
}

impl TierLayout {
    /// `tier_count` tiers named `t0..`, each holding a random subset of
    /// `key-0..key-{key_space}` with values tagged by the owning tier.
    pub fn random(rng: &mut StdRng, tier_count: usize, key_space: usize) -> Self {
        let tiers = (0..tier_count)
            .map(|t| {
                let kind = if t == 0 { StoreKind::Fast } else { StoreKind::Slow };
                let entries: BTreeMap<String, String> = (0..key_space)
                    .filter(|_| rng.gen_bool(0.3))
                    .map(|k| (format!("key-{k}"), format!("t{t}:{k}")))
                    .collect();
                TierSpec {
                    kind,
                    name: Some(format!("t{t}")),
                    entries,
                }
            })
            .collect();
        Self { tiers }
    }

    pub fn build(&self) -> Chain {
        ChainConfig {
            tiers: self.tiers.clone(),
        }
        .build()
        .expect("layout has at least one tier")
    }

    /// Index of the first tier holding `key`, if any.
    pub fn first_owner(&self, key: &str) -> Option<usize> {
        self.tiers.iter().position(|t| t.entries.contains_key(key))
    }

    pub fn value(&self, tier: usize, key: &str) -> &str {
        &self.tiers[tier].entries[key]
    }

    pub fn name(&self, tier: usize) -> &str {
        self.tiers[tier].display_name()
    }
}
