//! # Observability & Tracing
//!
//! Structured logging setup for anything built on the ledger. The ledger
//! itself emits `debug!` per attempt and conflict, `info!`-level events are
//! left to callers, and retry exhaustion is logged at `warn!` as a contention
//! signal worth watching in production.
//!
//! Log level is controlled through `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run      # Compact logs
//! RUST_LOG=debug cargo run     # Per-attempt CAS traffic
//! ```

/// Initializes the global tracing subscriber. Call once at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Module paths add noise; events carry their own context
        .compact()
        .init();
}
