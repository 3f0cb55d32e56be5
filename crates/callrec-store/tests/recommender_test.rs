//! CallRecommender over a pooled store.

use std::sync::Arc;

use callrec_core::config::CallRecConfig;
use callrec_core::errors::ModelStoreError;
use callrec_core::CallRecError;
use callrec_network::CallQuery;
use callrec_store::{CallRecommender, InMemoryRecordSource, QueryOutcome};
use test_fixtures::{file, file_scenario, m, t, CountingSource};

fn recommender(config: &CallRecConfig) -> CallRecommender {
    let scenario = file_scenario();
    let source = InMemoryRecordSource::new().with_type(scenario.type_name, scenario.records);
    CallRecommender::from_config(Arc::new(source), config)
}

#[test]
fn ranks_calls_for_a_known_type() {
    let recommender = recommender(&CallRecConfig::default());
    let query = recommender
        .query()
        .context(m(file::READER_CONTEXT))
        .observed_calls([m(file::OPEN)]);
    let outcome = recommender.recommend(&t(file::TYPE), &query).unwrap();
    let result = outcome.ranked().unwrap();
    let methods: Vec<&str> = result.methods().map(|m| m.identifier()).collect();
    // Default threshold 0.1 filters out write.
    assert_eq!(methods, [file::CLOSE, file::READ]);
    assert!(result.context_known);
    assert_eq!(recommender.store().idle_models(), 1);
}

#[test]
fn unknown_type_is_no_model() {
    let recommender = recommender(&CallRecConfig::default());
    let outcome = recommender
        .recommend(&t("Ljava/util/List"), &CallQuery::new())
        .unwrap();
    assert_eq!(outcome, QueryOutcome::NoModel);
    assert!(outcome.ranked().is_none());
}

#[test]
fn exhausted_pool_is_unavailable() {
    let mut config = CallRecConfig::default();
    config.store.max_total_models = 1;
    config.store.max_idle_per_type = 1;
    let source = CountingSource::new().with_synthetic_types(2);
    let recommender = CallRecommender::from_config(Arc::new(source), &config);

    let held = recommender.store().acquire_model(&t("Lgen/T0")).unwrap();
    let outcome = recommender
        .recommend(&t("Lgen/T1"), &recommender.query())
        .unwrap();
    assert_eq!(outcome, QueryOutcome::Unavailable);
    recommender.store().release_model(held);
}

#[test]
fn load_failures_stay_errors() {
    let scenario = file_scenario();
    let source = Arc::new(CountingSource::new().with_scenario(scenario));
    source.fail_loads_of(&t(file::TYPE));
    let recommender = CallRecommender::from_config(source, &CallRecConfig::default());
    let err = recommender
        .recommend(&t(file::TYPE), &recommender.query())
        .unwrap_err();
    assert!(matches!(
        err,
        CallRecError::ModelStore(ModelStoreError::LoadFailed { .. })
    ));
}

#[test]
fn configured_thresholds_apply() {
    let mut config = CallRecConfig::default();
    config.query.min_probability = 0.0;
    config.query.max_recommendations = 1;
    let recommender = recommender(&config);
    let outcome = recommender
        .recommend(&t(file::TYPE), &recommender.query())
        .unwrap();
    assert_eq!(outcome.ranked().unwrap().recommendations.len(), 1);
}

#[test]
fn configured_pattern_threshold_reports_patterns() {
    let mut config = CallRecConfig::default();
    config.query.min_pattern_probability = 0.01;
    let recommender = recommender(&config);
    let query = recommender
        .query()
        .context(m(file::READER_CONTEXT))
        .observed_calls([m(file::OPEN)]);
    let outcome = recommender.recommend(&t(file::TYPE), &query).unwrap();
    let patterns = &outcome.ranked().unwrap().patterns;
    let names: Vec<&str> = patterns.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["A"]);
    assert!(patterns.iter().all(|p| p.probability >= 0.01));

    let quiet = recommender
        .recommend(&t(file::TYPE), &query.without_patterns())
        .unwrap();
    assert!(quiet.ranked().unwrap().patterns.is_empty());
}
