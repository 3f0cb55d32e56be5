//! Structured log events for key system operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a finished network build.
pub fn network_built(type_name: &str, contexts: usize, patterns: usize, methods: usize) {
    tracing::info!(
        event = "network_built",
        type_name = %type_name,
        contexts = contexts,
        patterns = patterns,
        methods = methods,
        "usage network built"
    );
}

/// Log a model hand-out.
pub fn model_acquired(type_name: &str, reused: bool, live: usize) {
    tracing::debug!(
        event = "model_acquired",
        type_name = %type_name,
        reused = reused,
        live = live,
        "model acquired"
    );
}

/// Log a model return.
pub fn model_released(type_name: &str, kept_idle: bool) {
    tracing::debug!(
        event = "model_released",
        type_name = %type_name,
        kept_idle = kept_idle,
        "model released"
    );
}

/// Log a rejected acquisition because every slot is taken.
pub fn pool_exhausted(type_name: &str, live: usize, max: usize) {
    tracing::warn!(
        event = "pool_exhausted",
        type_name = %type_name,
        live = live,
        max = max,
        "model pool exhausted"
    );
}

/// Log an idle instance dropped to make room for another type.
pub fn model_evicted(type_name: &str) {
    tracing::debug!(
        event = "model_evicted",
        type_name = %type_name,
        "idle model evicted"
    );
}

/// Log a failed record load.
pub fn load_failed(type_name: &str, reason: &str) {
    tracing::error!(
        event = "load_failed",
        type_name = %type_name,
        reason = %reason,
        "loading usage records failed"
    );
}

/// Log evidence on a method the network does not know.
pub fn unknown_method_evidence(type_name: &str, method: &str) {
    tracing::debug!(
        event = "unknown_method_evidence",
        type_name = %type_name,
        method = %method,
        "method not found in model"
    );
}

/// Log a calling context the network does not know.
pub fn context_unknown(type_name: &str, context: &str) {
    tracing::debug!(
        event = "context_unknown",
        type_name = %type_name,
        context = %context,
        "calling context not in model"
    );
}

/// Log a read of marginals that predate the current evidence.
pub fn stale_beliefs(type_name: &str) {
    tracing::warn!(
        event = "stale_beliefs",
        type_name = %type_name,
        "recommendations read before beliefs were updated"
    );
}
