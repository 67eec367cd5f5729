//! Test helpers for common chain setup.
//!
//! Shared by unit tests, integration tests and benchmarks so every suite builds
//! the same reference chains.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::chain::Chain;
use crate::handler::Handler;
use crate::request::Request;
use crate::store::{FastStorage, SlowStorage};

/// Build the reference two-tier chain:
/// `FastStorage{bar: baz}` → `SlowStorage{bar: baz, foo: bar}`.
pub fn fast_slow_chain() -> Chain {
    Chain::new(Box::new(FastStorage::new([("bar", "baz")])))
        .with(Box::new(SlowStorage::new([("bar", "baz"), ("foo", "bar")])))
}

/// Build a chain of `depth` fast tiers named `tier-0`..`tier-{depth-1}`, where
/// tier `i` holds exactly the key `key-i`.
///
/// # Panics
///
/// Panics if `depth` is zero.
pub fn layered_chain(depth: usize) -> Chain {
    assert!(depth > 0, "a chain needs at least one tier");
    let tier = |i: usize| -> Box<dyn Handler> {
        Box::new(
            FastStorage::new([(format!("key-{i}"), format!("value-{i}"))])
                .with_name(format!("tier-{i}")),
        )
    };
    let mut chain = Chain::new(tier(0));
    for i in 1..depth {
        chain.append(tier(i));
    }
    chain
}

/// Handler that counts how often it is asked to resolve a request.
///
/// Either refuses everything or resolves everything with a fixed value.
#[derive(Debug)]
pub struct ProbeHandler {
    name: String,
    answer: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl ProbeHandler {
    pub fn refusing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            answer: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn resolving(name: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..Self::refusing(name)
        }
    }

    /// Shared call counter; grab it before handing the probe to a chain.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Handler for ProbeHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn processing(&self, request: &mut Request) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Some(answer) => {
                request.response = Some(answer.clone());
                true
            }
            None => false,
        }
    }
}
