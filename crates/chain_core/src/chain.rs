//! Ordered-fallback dispatch over a sequence of [`Handler`]s.
//!
//! A [`Chain`] owns its handlers in evaluation order. [`Chain::handle`] walks
//! them front to back, stamping each one onto the request's trace before asking
//! it to resolve, and stops at the first handler that does. Handlers appended
//! later therefore only ever see requests every earlier handler refused.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::handler::Handler;
use crate::request::Request;
use crate::stats::{ChainStats, HandlerStats};

/// One handler plus its counters.
struct Link {
    handler: Box<dyn Handler>,
    visits: AtomicU64,
    resolutions: AtomicU64,
}

impl Link {
    fn new(handler: Box<dyn Handler>) -> Self {
        Self {
            handler,
            visits: AtomicU64::new(0),
            resolutions: AtomicU64::new(0),
        }
    }
}

/// A non-empty, append-only sequence of handlers.
///
/// Construction needs `&mut Chain`, dispatch only `&Chain`: once a chain is
/// shared it is frozen, and any number of requests may be dispatched against it
/// concurrently.
pub struct Chain {
    links: Vec<Link>,
    dispatches: AtomicU64,
    exhausted: AtomicU64,
}

impl Chain {
    /// Start a chain with `head` as its first handler.
    pub fn new(head: Box<dyn Handler>) -> Self {
        Self {
            links: vec![Link::new(head)],
            dispatches: AtomicU64::new(0),
            exhausted: AtomicU64::new(0),
        }
    }

    /// Attach `next` after the current tail. Existing links are never
    /// reordered or replaced.
    pub fn append(&mut self, next: Box<dyn Handler>) -> &mut Self {
        self.links.push(Link::new(next));
        self
    }

    /// Builder-style [`Chain::append`].
    pub fn with(mut self, next: Box<dyn Handler>) -> Self {
        self.append(next);
        self
    }

    /// Number of handlers; always at least one.
    pub fn handler_count(&self) -> usize {
        self.links.len()
    }

    /// Handler names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.links.iter().map(|link| link.handler.name())
    }

    /// Dispatch `request` through the chain.
    ///
    /// Returns `true` iff some handler resolved it. Every visited handler is
    /// pushed onto `request.trace`, so afterwards [`Request::handled_by`] names
    /// either the resolver or, on exhaustion, the last handler in the chain.
    pub fn handle(&self, request: &mut Request) -> bool {
        self.dispatches.fetch_add(1, Ordering::Relaxed);

        for link in &self.links {
            let name = link.handler.name();
            request.trace.push(name.to_string());
            link.visits.fetch_add(1, Ordering::Relaxed);
            trace!(handler = name, verb = %request.verb, key = %request.key, "visiting handler");

            if link.handler.processing(request) {
                link.resolutions.fetch_add(1, Ordering::Relaxed);
                debug!(handler = name, key = %request.key, "request resolved");
                return true;
            }
        }

        self.exhausted.fetch_add(1, Ordering::Relaxed);
        debug!(
            key = %request.key,
            handlers = self.links.len(),
            "chain exhausted without resolution"
        );
        false
    }

    /// Dispatch every request in parallel, returning results in input order.
    pub fn handle_batch(&self, requests: &mut [Request]) -> Vec<bool> {
        requests
            .par_iter_mut()
            .map(|request| self.handle(request))
            .collect()
    }

    /// Snapshot of the dispatch counters.
    pub fn stats(&self) -> ChainStats {
        ChainStats {
            dispatches: self.dispatches.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            handlers: self
                .links
                .iter()
                .map(|link| HandlerStats {
                    name: link.handler.name().to_string(),
                    visits: link.visits.load(Ordering::Relaxed),
                    resolutions: link.resolutions.load(Ordering::Relaxed),
                })
                .collect(),
        }
    }

    pub fn reset_stats(&self) {
        self.dispatches.store(0, Ordering::Relaxed);
        self.exhausted.store(0, Ordering::Relaxed);
        for link in &self.links {
            link.visits.store(0, Ordering::Relaxed);
            link.resolutions.store(0, Ordering::Relaxed);
        }
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("handlers", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
