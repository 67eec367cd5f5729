//! Serializable chain configuration.
//!
//! A [`ChainConfig`] lists tiers in evaluation order. It is plain data: nothing
//! is dispatched until [`ChainConfig::build`] turns it into a [`Chain`].
//!
//! ```json
//! {
//!   "tiers": [
//!     { "kind": "fast", "entries": { "bar": "baz" } },
//!     { "kind": "slow", "name": "disk", "entries": { "bar": "baz", "foo": "bar" } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chain::Chain;
use crate::error::{ChainError, Result};
use crate::store::{build_handler, StoreKind};

/// One tier: which store variant to build and the mapping it serves.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierSpec {
    #[serde(default)]
    pub kind: StoreKind,
    /// Trace identity; defaults to the variant's name (`FastStorage` / `SlowStorage`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl TierSpec {
    pub fn new(kind: StoreKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Name the built handler will record onto request traces.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.kind.default_name())
    }
}

/// Ordered tier list describing a chain.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainConfig {
    #[serde(default)]
    pub tiers: Vec<TierSpec>,
}

impl ChainConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ChainError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    /// Append a tier after the existing ones.
    pub fn with_tier(mut self, tier: TierSpec) -> Self {
        self.tiers.push(tier);
        self
    }

    /// The two-tier layout used throughout the docs and the `tierctl` default:
    /// `FastStorage{bar: baz}` in front of `SlowStorage{bar: baz, foo: bar}`.
    pub fn fast_slow_demo() -> Self {
        Self::default()
            .with_tier(TierSpec::new(StoreKind::Fast).with_entry("bar", "baz"))
            .with_tier(
                TierSpec::new(StoreKind::Slow)
                    .with_entry("bar", "baz")
                    .with_entry("foo", "bar"),
            )
    }

    /// Build a chain with one handler per tier, in configuration order.
    ///
    /// Fails with [`ChainError::EmptyChain`] when no tiers are configured.
    pub fn build(&self) -> Result<Chain> {
        let mut tiers = self.tiers.iter();
        let head = tiers.next().ok_or(ChainError::EmptyChain)?;

        let mut chain = Chain::new(build_handler(head));
        for tier in tiers {
            chain.append(build_handler(tier));
        }

        info!(
            tiers = chain.handler_count(),
            handlers = ?chain.names().collect::<Vec<_>>(),
            "built chain from configuration"
        );
        Ok(chain)
    }
}
