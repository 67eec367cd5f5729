//! Tiered key-value stores: handlers that resolve `get` requests from an
//! in-memory mapping.
//!
//! Two variants, selectable via [`StoreKind`]:
//!
//! - **`FastStorage`**: the front tier, consulted first in the usual layout.
//! - **`SlowStorage`**: a backing tier, consulted when the front tier misses.
//!
//! Both own an independent mapping supplied at construction and never written
//! afterwards. Which one wins on an overlapping key is decided purely by chain
//! order: the earlier tier answers and the later one is never asked.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::TierSpec;
use crate::handler::Handler;
use crate::request::{Request, Verb};

/// Which store variant a configured tier builds.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Fast,
    Slow,
}

impl StoreKind {
    /// Trace identity used when a tier carries no explicit name.
    pub fn default_name(self) -> &'static str {
        match self {
            StoreKind::Fast => FastStorage::DEFAULT_NAME,
            StoreKind::Slow => SlowStorage::DEFAULT_NAME,
        }
    }
}

/// Named, immutable mapping shared by both store variants.
#[derive(Clone, Debug)]
struct Table {
    name: String,
    data: HashMap<String, String>,
}

impl Table {
    fn new<I, K, V>(name: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.to_string(),
            data: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn lookup(&self, request: &mut Request) -> bool {
        if request.verb != Verb::Get {
            return false;
        }
        match self.data.get(&request.key) {
            Some(value) => {
                request.response = Some(value.clone());
                true
            }
            None => false,
        }
    }
}

/// Front tier of a tiered lookup.
#[derive(Clone, Debug)]
pub struct FastStorage {
    table: Table,
}

impl FastStorage {
    pub const DEFAULT_NAME: &'static str = "FastStorage";

    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: Table::new(Self::DEFAULT_NAME, entries),
        }
    }

    /// Replace the trace identity, e.g. to tell apart two fast tiers in one chain.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.table.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.table.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.data.is_empty()
    }
}

impl Handler for FastStorage {
    fn name(&self) -> &str {
        &self.table.name
    }

    fn processing(&self, request: &mut Request) -> bool {
        self.table.lookup(request)
    }
}

/// Backing tier of a tiered lookup.
#[derive(Clone, Debug)]
pub struct SlowStorage {
    table: Table,
}

impl SlowStorage {
    pub const DEFAULT_NAME: &'static str = "SlowStorage";

    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: Table::new(Self::DEFAULT_NAME, entries),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.table.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.table.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.data.is_empty()
    }
}

impl Handler for SlowStorage {
    fn name(&self) -> &str {
        &self.table.name
    }

    fn processing(&self, request: &mut Request) -> bool {
        self.table.lookup(request)
    }
}

/// Construct a boxed store [`Handler`] from a [`TierSpec`] descriptor.
///
/// A tier with no entries is legal (it never resolves anything) but is almost
/// always a configuration mistake, so it is logged.
pub fn build_handler(spec: &TierSpec) -> Box<dyn Handler> {
    let name = spec.display_name();
    if spec.entries.is_empty() {
        warn!(tier = name, "tier has no entries and will never resolve a request");
    }
    let entries = spec.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()));

    match spec.kind {
        StoreKind::Fast => Box::new(FastStorage::new(entries).with_name(name)),
        StoreKind::Slow => Box::new(SlowStorage::new(entries).with_name(name)),
    }
}
