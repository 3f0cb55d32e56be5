//! Property tests for callrec-network: CPT validity, method coverage,
//! ranking postconditions, constructor negation and determinism.

use proptest::prelude::*;

use callrec_core::probability::{strictly_inside_unit, sums_to_one};
use callrec_core::traits::IDiscreteNetwork;
use callrec_core::{MethodName, UsageRecord};
use callrec_network::{NetworkBuilder, UsageNetwork};
use test_fixtures::{m, t};

const TYPE: &str = "Lgen/Subject";
const METHODS: [&str; 6] = [
    "Lgen/Subject.<init>()V",
    "Lgen/Subject.a()V",
    "Lgen/Subject.b(I)V",
    "Lgen/Subject.c()I",
    "Lgen/Subject.d()V",
    "Lgen/Subject.e(Ljava/lang/String;)Z",
];
const CONTEXTS: [&str; 4] = [
    "Lapp/One.run()V",
    "Lapp/Two.run()V",
    "Lapp/Three.run()V",
    "Lapp/Four.run()V",
];

/// One record: a bitmask over METHODS and (context, count) pairs.
fn record_strategy() -> impl Strategy<Value = UsageRecord> {
    (
        0u8..64,
        prop::collection::vec((0..CONTEXTS.len(), 1u32..60), 1..4),
    )
        .prop_map(|(mask, contexts)| {
            let methods = METHODS
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, id)| m(id));
            let contexts = contexts.into_iter().map(|(c, n)| (m(CONTEXTS[c]), n));
            UsageRecord::new(None, methods, contexts)
        })
}

fn records_strategy() -> impl Strategy<Value = Vec<UsageRecord>> {
    prop::collection::vec(record_strategy(), 1..8)
}

fn build(records: &[UsageRecord]) -> UsageNetwork {
    NetworkBuilder::default().build(&t(TYPE), records).unwrap()
}

fn observed(mask: u8) -> Vec<MethodName> {
    METHODS
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, id)| m(id))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cpt_rows_are_valid(records in records_strategy()) {
        let network = build(&records);
        let net = network.network();
        let nodes = network.method_nodes().map(|n| n.id()).chain([
            network.context_node().id(),
            network.availability_node().id(),
            network.pattern_node().id(),
        ]);
        for node in nodes {
            let card = net.outcomes(node).unwrap().len();
            for row in net.cpt(node).unwrap().chunks(card) {
                prop_assert!(sums_to_one(row), "row {:?} does not sum to 1", row);
                if card > 1 {
                    prop_assert!(strictly_inside_unit(row), "row {:?} hits a bound", row);
                }
            }
        }
    }

    #[test]
    fn every_invoked_method_has_a_node(records in records_strategy()) {
        let network = build(&records);
        let known: Vec<&MethodName> = network.method_calls().collect();
        for record in &records {
            for method in &record.invoked_methods {
                prop_assert!(known.contains(&method), "missing node for {}", method);
            }
        }
    }

    #[test]
    fn ranking_postconditions(
        records in records_strategy(),
        mask in 0u8..64,
        context in 0..CONTEXTS.len(),
        min in 0.0f64..0.9,
        max in 1usize..6,
    ) {
        let mut network = build(&records);
        network.set_method_context(&m(CONTEXTS[context])).unwrap();
        network.set_observed_method_calls(None, &observed(mask)).unwrap();
        network.update_beliefs().unwrap();

        let recs = network.recommended_method_calls(min, Some(max)).unwrap();
        prop_assert!(recs.len() <= max);
        for r in &recs {
            prop_assert!(r.probability >= min);
            prop_assert!(!observed(mask).contains(&r.method));
        }
        for pair in recs.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.probability > b.probability
                    || (a.probability == b.probability
                        && a.method.identifier() < b.method.identifier()),
                "{:?} ranked before {:?}", a, b
            );
        }
    }

    #[test]
    fn negated_constructors_never_appear(
        records in records_strategy(),
        mask in 0u8..64,
    ) {
        let mut network = build(&records);
        network.set_observed_method_calls(None, &observed(mask & !1)).unwrap();
        network.negate_constructors().unwrap();
        network.update_beliefs().unwrap();
        let recs = network.recommended_method_calls(0.0, None).unwrap();
        prop_assert!(recs.iter().all(|r| !r.method.is_init()));
    }

    #[test]
    fn fresh_state_replays_identically(
        records in records_strategy(),
        mask in 0u8..64,
        noise in 0u8..64,
    ) {
        let mut network = build(&records);
        let run = |network: &mut UsageNetwork| {
            network.clear_evidence().unwrap();
            network.set_observed_method_calls(None, &observed(mask)).unwrap();
            network.update_beliefs().unwrap();
            network.recommended_method_calls(0.0, None).unwrap()
        };
        let first = run(&mut network);
        network.set_observed_method_calls(None, &observed(noise)).unwrap();
        network.update_beliefs().unwrap();
        let second = run(&mut network);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn marginals_are_distributions(records in records_strategy(), mask in 0u8..64) {
        let mut network = build(&records);
        network.set_observed_method_calls(None, &observed(mask)).unwrap();
        network.update_beliefs().unwrap();
        let net = network.network();
        for node in network.method_nodes().map(|n| n.id()).chain([network.pattern_node().id()]) {
            prop_assert!(sums_to_one(net.marginal(node).unwrap()));
        }
    }
}
