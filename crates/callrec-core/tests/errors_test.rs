use callrec_core::errors::*;

#[test]
fn no_model_carries_type_name() {
    let err = ModelStoreError::NoModel {
        type_name: "Ljava/io/File".into(),
    };
    assert!(err.to_string().contains("Ljava/io/File"));
    assert_eq!(err.error_code(), error_code::NO_MODEL);
}

#[test]
fn pool_exhausted_carries_counts() {
    let err = ModelStoreError::PoolExhausted { live: 100, max: 100 };
    let msg = err.to_string();
    assert!(msg.contains("100"));
    assert_eq!(err.error_code(), error_code::POOL_EXHAUSTED);
}

#[test]
fn invalid_cpt_carries_node_and_reason() {
    let err = NetworkError::InvalidCpt {
        node: "patterns".into(),
        reason: "row 2 sums to 0.9".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("patterns"));
    assert!(msg.contains("row 2"));
}

// --- From impls ---

#[test]
fn store_error_converts_to_callrec_error() {
    let err: CallRecError = ModelStoreError::LoadFailed {
        type_name: "LFoo".into(),
        reason: "disk gone".into(),
    }
    .into();
    assert!(matches!(err, CallRecError::ModelStore(_)));
    assert_eq!(err.error_code(), error_code::LOAD_FAILED);
    assert!(err.to_string().contains("disk gone"));
}

#[test]
fn network_error_converts_to_callrec_error() {
    let err: CallRecError = NetworkError::UnknownNode { node: "m1".into() }.into();
    assert!(matches!(err, CallRecError::Network(_)));
    assert_eq!(err.error_code(), error_code::NETWORK_ERROR);
}

#[test]
fn config_error_converts_to_callrec_error() {
    let err: CallRecError = ConfigError::ValidationFailed {
        field: "store.max_total_models".into(),
        message: "must be greater than 0".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::CONFIG_ERROR);
}

#[test]
fn invalid_name_code() {
    let err = callrec_core::MethodName::new("nope").unwrap_err();
    assert_eq!(err.error_code(), error_code::INVALID_NAME);
    assert!(err.to_string().contains("nope"));
}
