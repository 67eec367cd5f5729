//! Ordered-fallback request dispatch.
//!
//! A [`chain::Chain`] asks its [`handler::Handler`]s in append order whether
//! they can resolve a [`request::Request`], stopping at the first that does.
//! The [`store`] module provides the tiered key-value handlers (fast tier in
//! front of slow tier) and [`config`] builds chains from JSON.

pub mod chain;
pub mod config;
pub mod error;
pub mod handler;
pub mod request;
pub mod stats;
pub mod store;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use chain::Chain;
pub use config::{ChainConfig, TierSpec};
pub use error::{ChainError, Result};
pub use handler::Handler;
pub use request::{Request, Verb};
pub use stats::{ChainStats, HandlerStats};
pub use store::{FastStorage, SlowStorage, StoreKind};
