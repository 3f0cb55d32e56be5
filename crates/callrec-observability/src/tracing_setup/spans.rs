//! Span definitions for network construction and recommendation queries.

/// Create a network build span.
#[macro_export]
macro_rules! build_span {
    ($type_name:expr, $records:expr) => {
        tracing::info_span!("callrec.build", type_name = %$type_name, records = $records)
    };
}

/// Create a recommendation query span.
#[macro_export]
macro_rules! query_span {
    ($type_name:expr) => {
        tracing::debug_span!("callrec.query", type_name = %$type_name)
    };
}
