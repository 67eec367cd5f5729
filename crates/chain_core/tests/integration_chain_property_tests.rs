mod support;

use std::sync::atomic::Ordering;

use chain_core::chain::Chain;
use chain_core::request::Request;
use chain_core::test_helpers::{layered_chain, ProbeHandler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use support::tiers::TierLayout;

const LAYOUTS: u64 = 64;
const KEY_SPACE: usize = 40;

fn layouts() -> impl Iterator<Item = TierLayout> {
    (0..LAYOUTS).map(|seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let tier_count = rng.gen_range(1..=6);
        TierLayout::random(&mut rng, tier_count, KEY_SPACE)
    })
}

#[test]
fn earliest_owning_tier_resolves_every_key() {
    for layout in layouts() {
        let chain = layout.build();
        for k in 0..KEY_SPACE {
            let key = format!("key-{k}");
            let mut request = Request::get(key.as_str());
            let resolved = chain.handle(&mut request);

            match layout.first_owner(&key) {
                Some(owner) => {
                    assert!(resolved, "{key} should resolve");
                    assert_eq!(request.response.as_deref(), Some(layout.value(owner, &key)));
                    assert_eq!(request.handled_by(), Some(layout.name(owner)));
                    assert_eq!(request.trace.len(), owner + 1);
                }
                None => {
                    assert!(!resolved, "{key} should exhaust the chain");
                    assert_eq!(request.response, None);
                    assert_eq!(request.handled_by(), Some(layout.name(layout.tiers.len() - 1)));
                    assert_eq!(request.trace.len(), layout.tiers.len());
                }
            }
        }
    }
}

#[test]
fn response_is_set_iff_handle_returns_true() {
    for layout in layouts() {
        let chain = layout.build();
        for k in 0..KEY_SPACE {
            let mut request = Request::get(format!("key-{k}"));
            let resolved = chain.handle(&mut request);
            assert_eq!(resolved, request.is_resolved());
        }
    }
}

#[test]
fn trace_follows_append_order() {
    let mut chain = Chain::new(Box::new(ProbeHandler::refusing("h1")));
    chain.append(Box::new(ProbeHandler::refusing("h2")));
    chain.append(Box::new(ProbeHandler::refusing("h3")));

    let mut request = Request::get("anything");
    assert!(!chain.handle(&mut request));
    assert_eq!(request.trace, ["h1", "h2", "h3"]);
}

#[test]
fn each_handler_processes_at_most_once_and_none_after_resolver() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..32 {
        let depth = rng.gen_range(1..=8);
        let resolver = rng.gen_range(0..=depth);

        let probes: Vec<ProbeHandler> = (0..depth)
            .map(|i| {
                if i == resolver {
                    ProbeHandler::resolving(format!("p{i}"), "hit")
                } else {
                    ProbeHandler::refusing(format!("p{i}"))
                }
            })
            .collect();
        let counters: Vec<_> = probes.iter().map(ProbeHandler::calls).collect();

        let mut probes = probes.into_iter();
        let mut chain = Chain::new(Box::new(probes.next().expect("depth >= 1")));
        for probe in probes {
            chain.append(Box::new(probe));
        }

        let mut request = Request::get("k");
        let resolved = chain.handle(&mut request);
        assert_eq!(resolved, resolver < depth);

        for (i, calls) in counters.iter().enumerate() {
            let expected = usize::from(i <= resolver);
            assert_eq!(calls.load(Ordering::SeqCst), expected, "probe p{i}");
        }
    }
}

#[test]
fn very_long_chain_dispatches_without_recursion() {
    let depth = 200_000;
    let chain = layered_chain(depth);

    let mut request = Request::get(format!("key-{}", depth - 1));
    assert!(chain.handle(&mut request));
    assert_eq!(request.response, Some(format!("value-{}", depth - 1)));
    assert_eq!(request.trace.len(), depth);

    let mut request = Request::get("absent");
    assert!(!chain.handle(&mut request));
    assert_eq!(request.handled_by(), Some(format!("tier-{}", depth - 1).as_str()));
}
