//! Shared test-only tracing setup (grounded in the teacher's
//! `crates/stark-sdk/src/bench/mod.rs`, which wires the same
//! `tracing-forest` + `tracing-subscriber` combination around its
//! benchmark harness). Lets a test run with `RUST_LOG=debug` and see the
//! solver's SCC/widening/narrowing trace instead of having to add
//! `println!`s by hand.

use std::sync::Once;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

static INIT: Once = Once::new();

/// Installs a global tracing subscriber once per test binary. Safe to call
/// from every test; only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = Registry::default()
            .with(env_filter)
            .with(tracing_forest::ForestLayer::default());
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
