//! Integration tests for network construction and the evidence/query protocol.

use callrec_core::config::{BuilderConfig, QueryConfig};
use callrec_core::constants::{P_MAX, P_MIN, UNKNOWN_CONTEXT};
use callrec_core::probability::{strictly_inside_unit, sums_to_one};
use callrec_core::traits::IDiscreteNetwork;
use callrec_core::{CallRecError, UsageRecord};
use callrec_network::{BeliefNetwork, CallQuery, NetworkBuilder, QueryState, UsageNetwork};
use test_fixtures::{file, file_scenario, file_scenario_with_constructors, m, t};

fn file_network() -> UsageNetwork {
    let scenario = file_scenario();
    NetworkBuilder::default()
        .build(&scenario.type_name, &scenario.records)
        .unwrap()
}

fn ids(network: &UsageNetwork, min: f64) -> Vec<String> {
    network
        .recommended_method_calls(min, None)
        .unwrap()
        .into_iter()
        .map(|r| r.method.identifier().to_string())
        .collect()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn file_scenario_layout() {
    let network = file_network();
    let contexts: Vec<&str> = network.contexts().iter().map(|c| c.identifier()).collect();
    assert_eq!(
        contexts,
        [file::READER_CONTEXT, file::WRITER_CONTEXT, UNKNOWN_CONTEXT]
    );
    assert_eq!(network.patterns(), ["none", "A", "B"]);
    let methods: Vec<&str> = network.method_calls().map(|m| m.identifier()).collect();
    assert_eq!(methods, [file::CLOSE, file::OPEN, file::READ, file::WRITE]);
    assert_eq!(network.network().node_count(), 3 + 4);
    assert_eq!(network.state(), QueryState::BeliefsUpdated);
    assert!(!network.beliefs_stale());
}

#[test]
fn every_cpt_row_is_a_clamped_distribution() {
    let network = file_network();
    let net = network.network();
    for node in network.method_nodes().map(|n| n.id()).chain([
        network.context_node().id(),
        network.availability_node().id(),
        network.pattern_node().id(),
    ]) {
        let card = net.outcomes(node).unwrap().len();
        for row in net.cpt(node).unwrap().chunks(card) {
            assert!(sums_to_one(row), "{row:?}");
            assert!(strictly_inside_unit(row), "{row:?}");
        }
    }
}

#[test]
fn pattern_rows_match_observed_frequencies() {
    let network = file_network();
    let net = network.network();
    let cpt = net.cpt(network.pattern_node().id()).unwrap();
    // (reader context, available): A saw all 30 observations.
    assert!((cpt[1] - (P_MAX - P_MIN)).abs() < 1e-12);
    assert_eq!(cpt[2], P_MIN);
    // (reader context, unavailable): none keeps the mass.
    assert_eq!(&cpt[3..6], &[1.0 - 2.0 * P_MIN, P_MIN, P_MIN]);
}

#[test]
fn standing_evidence_is_availability() {
    let network = file_network();
    let net = network.network();
    assert_eq!(net.evidence(network.availability_node().id()), Some(0));
    assert_eq!(net.evidence(network.context_node().id()), None);
}

#[test]
fn builder_is_deterministic() {
    let a = file_network();
    let b = file_network();
    for (x, y) in a.method_nodes().zip(b.method_nodes()) {
        assert_eq!(x.method(), y.method());
        assert_eq!(
            a.network().cpt(x.id()).unwrap(),
            b.network().cpt(y.id()).unwrap()
        );
    }
}

#[test]
fn empty_records_only_shape_availability() {
    let type_name = t("LWidget");
    let records = vec![
        UsageRecord::new(None, [m("LWidget.show()V")], [(m("LApp.main()V"), 20)]),
        UsageRecord::new(None, [], [(m("LApp.main()V"), 20)]),
    ];
    let network = NetworkBuilder::default().build(&type_name, &records).unwrap();
    assert_eq!(network.patterns(), ["none", "pattern1"]);
    let cpt = network
        .network()
        .cpt(network.availability_node().id())
        .unwrap();
    assert!((cpt[0] - 0.5).abs() < 1e-12);
}

#[test]
fn min_support_is_configurable() {
    let scenario = file_scenario();
    let builder = NetworkBuilder::new(BuilderConfig {
        min_context_support: 26,
    });
    let network = builder.build(&scenario.type_name, &scenario.records).unwrap();
    let contexts: Vec<&str> = network.contexts().iter().map(|c| c.identifier()).collect();
    assert_eq!(contexts, [file::READER_CONTEXT, UNKNOWN_CONTEXT]);
}

#[test]
fn from_network_requires_all_layers() {
    let err = UsageNetwork::from_network(t("LEmpty"), BeliefNetwork::new()).unwrap_err();
    assert!(matches!(err, CallRecError::Network(_)));
}

// =============================================================================
// Evidence and queries
// =============================================================================

#[test]
fn reader_context_ranks_close_and_read_above_write() {
    let mut network = file_network();
    assert!(network.set_method_context(&m(file::READER_CONTEXT)).unwrap());
    let summary = network
        .set_observed_method_calls(None, &[m(file::OPEN)])
        .unwrap();
    assert_eq!(summary.applied, 1);
    network.update_beliefs().unwrap();

    let ranked = ids(&network, 0.0);
    assert_eq!(ranked, [file::CLOSE, file::READ, file::WRITE]);
    let recs = network.recommended_method_calls(0.0, None).unwrap();
    assert!(recs[1].probability > 0.99);
    assert!(recs[2].probability < 0.01);
}

#[test]
fn writer_context_prefers_write() {
    let mut network = file_network();
    network.set_method_context(&m(file::WRITER_CONTEXT)).unwrap();
    network.update_beliefs().unwrap();
    let ranked = ids(&network, 0.5);
    assert!(ranked.contains(&file::WRITE.to_string()));
    assert!(!ranked.contains(&file::READ.to_string()));
}

#[test]
fn without_context_the_prior_decides() {
    let mut network = file_network();
    network.set_called(&m(file::OPEN)).unwrap();
    network.update_beliefs().unwrap();
    let recs = network.recommended_method_calls(0.0, None).unwrap();
    let p = |id: &str| {
        recs.iter()
            .find(|r| r.method.identifier() == id)
            .map(|r| r.probability)
            .unwrap()
    };
    // 30 vs 25 observations.
    assert!(p(file::READ) > p(file::WRITE));
    assert!((p(file::READ) - 30.0 / 55.0).abs() < 0.01);
    assert!(p(file::CLOSE) > 0.99);
}

#[test]
fn unknown_methods_are_reported_not_raised() {
    let mut network = file_network();
    let summary = network
        .set_observed_method_calls(None, &[m(file::OPEN), m("Ljava/io/File.seek(J)V")])
        .unwrap();
    assert_eq!(summary.applied, 1);
    assert_eq!(summary.ignored, vec![m("Ljava/io/File.seek(J)V")]);
    assert!(!summary.is_complete());
}

#[test]
fn rebased_calls_match_the_supertype() {
    let mut network = file_network();
    let sub = m("Lapp/TempFile.open()V");
    let summary = network
        .set_observed_method_calls(Some(&t(file::TYPE)), [&sub])
        .unwrap();
    assert_eq!(summary.applied, 1);
    let open = network
        .method_nodes()
        .find(|n| n.method().identifier() == file::OPEN)
        .unwrap();
    assert!(open.is_observed(network.network()));
}

#[test]
fn merged_context_is_unknown() {
    let scenario = file_scenario_with_constructors();
    let mut network = NetworkBuilder::default()
        .build(&scenario.type_name, &scenario.records)
        .unwrap();
    assert!(!network.set_method_context(&m("Lapp/Health.check()V")).unwrap());
    assert!(!network.set_method_context(&m(UNKNOWN_CONTEXT)).unwrap());
    assert_eq!(network.state(), QueryState::BeliefsUpdated);
    assert_eq!(
        network.network().evidence(network.context_node().id()),
        None
    );
}

#[test]
fn negated_constructors_are_not_recommended() {
    let scenario = file_scenario_with_constructors();
    let mut network = NetworkBuilder::default()
        .build(&scenario.type_name, &scenario.records)
        .unwrap();

    network.set_method_context(&m(file::READER_CONTEXT)).unwrap();
    network.set_called(&m(file::OPEN)).unwrap();
    network.update_beliefs().unwrap();
    assert!(ids(&network, 0.1).contains(&file::INIT.to_string()));

    network.clear_evidence().unwrap();
    network.set_method_context(&m(file::READER_CONTEXT)).unwrap();
    network.set_called(&m(file::OPEN)).unwrap();
    assert_eq!(network.negate_constructors().unwrap(), 1);
    network.update_beliefs().unwrap();
    let ranked = ids(&network, 0.0);
    assert!(ranked.iter().all(|id| !m(id).is_init()));
    assert!(!ranked.is_empty());
}

#[test]
fn pattern_posteriors() {
    let mut network = file_network();
    network.set_called(&m(file::WRITE)).unwrap();
    network.update_beliefs().unwrap();
    let patterns = network.patterns_with_probability(0.01).unwrap();
    assert_eq!(patterns[0].name, "B");
    assert!(patterns[0].probability > 0.99);
    assert!(patterns.iter().all(|p| p.probability >= 0.01));
}

#[test]
fn pattern_evidence() {
    let mut network = file_network();
    assert!(network.set_pattern("A").unwrap());
    assert!(!network.set_pattern("Z").unwrap());
    network.update_beliefs().unwrap();
    assert_eq!(ids(&network, 0.5), [file::CLOSE, file::OPEN, file::READ]);
}

#[test]
fn state_machine_and_staleness() {
    let mut network = file_network();
    network.set_called(&m(file::OPEN)).unwrap();
    assert_eq!(network.state(), QueryState::EvidenceApplied);
    assert!(network.beliefs_stale());

    network.update_beliefs().unwrap();
    assert_eq!(network.state(), QueryState::BeliefsUpdated);
    assert!(!network.beliefs_stale());

    network.clear_evidence().unwrap();
    assert_eq!(network.state(), QueryState::Idle);
    // Marginals still reflect the observed `open`.
    assert!(network.beliefs_stale());
    network.update_beliefs().unwrap();
    network.clear_evidence().unwrap();
    assert!(!network.beliefs_stale());
}

#[test]
fn same_evidence_same_answer() {
    let mut network = file_network();
    let query = CallQuery::new()
        .context(m(file::READER_CONTEXT))
        .observed_calls([m(file::OPEN)])
        .min_probability(0.0)
        .max_recommendations(None);
    let first = query.run(&mut network).unwrap();

    // Perturb, then ask again.
    network.set_called(&m(file::WRITE)).unwrap();
    network.update_beliefs().unwrap();
    let second = query.run(&mut network).unwrap();
    assert_eq!(first, second);

    let third = query.run(&mut file_network()).unwrap();
    assert_eq!(first, third);
}

#[test]
fn call_query_reports_what_it_applied() {
    let mut network = file_network();
    let result = CallQuery::new()
        .context(m("Lapp/Other.x()V"))
        .observed_calls([m(file::OPEN), m("Ljava/io/File.flush()V")])
        .pattern("B")
        .with_patterns(0.5)
        .run(&mut network)
        .unwrap();
    assert!(!result.context_known);
    assert!(result.pattern_known);
    assert_eq!(result.evidence.applied, 1);
    assert_eq!(result.evidence.ignored.len(), 1);
    assert_eq!(result.patterns.len(), 1);
    assert_eq!(result.patterns[0].name, "B");
    let methods: Vec<&str> = result.methods().map(|m| m.identifier()).collect();
    assert_eq!(methods, [file::CLOSE, file::WRITE]);
}

#[test]
fn max_recommendations_truncates() {
    let mut network = file_network();
    let result = CallQuery::new()
        .min_probability(0.0)
        .max_recommendations(Some(2))
        .run(&mut network)
        .unwrap();
    assert_eq!(result.recommendations.len(), 2);
    assert_eq!(result.recommendations[0].method.identifier(), file::CLOSE);
}

#[test]
fn clones_do_not_share_evidence() {
    let template = file_network();
    let mut lent = template.clone();
    lent.set_called(&m(file::READ)).unwrap();
    lent.update_beliefs().unwrap();
    let read = template
        .method_nodes()
        .find(|n| n.method().identifier() == file::READ)
        .unwrap();
    assert!(!read.is_observed(template.network()));
}

#[test]
fn query_results_serialize_for_clients() {
    let mut network = file_network();
    let result = CallQuery::new()
        .context(m(file::READER_CONTEXT))
        .observed_calls([m(file::OPEN)])
        .run(&mut network)
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["recommendations"][0]["method"], file::CLOSE);
    assert_eq!(json["context_known"], true);
    assert_eq!(json["evidence"]["applied"], 1);
}

#[test]
fn configured_pattern_threshold_applies_by_default() {
    let mut network = file_network();
    let config = QueryConfig {
        min_pattern_probability: 0.3,
        ..QueryConfig::default()
    };
    let result = CallQuery::from_config(&config).run(&mut network).unwrap();
    // Prior: A holds 30 of 55 observations, B 25.
    let names: Vec<&str> = result.patterns.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
}

#[test]
fn more_patterns_than_the_floor_allows_still_build() {
    let type_name = t("LWide");
    let context = m("LApp.main()V");
    let records: Vec<UsageRecord> = (0..10_005)
        .map(|i| {
            UsageRecord::new(
                None,
                [m(&format!("LWide.m{}()V", i % 3))],
                [(context.clone(), 1)],
            )
        })
        .collect();
    let network = NetworkBuilder::default().build(&type_name, &records).unwrap();
    assert_eq!(network.patterns().len(), 10_006);

    let net = network.network();
    for node in [network.context_node().id(), network.pattern_node().id()] {
        let card = net.outcomes(node).unwrap().len();
        for row in net.cpt(node).unwrap().chunks(card) {
            assert!(sums_to_one(row));
            assert!(strictly_inside_unit(row));
        }
    }
    assert_eq!(network.recommended_method_calls(0.0, None).unwrap().len(), 3);
}
