// ABOUTME: Test support utilities.
// ABOUTME: Local runtime discovery, unique names and tracing setup for live tests.

use playground::runtime::{BollardRuntime, RuntimeConfig};
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Small image with a long-running default command.
#[allow(dead_code)]
pub const TEST_IMAGE: &str = "nginx:alpine";

static TRACING_INIT: Once = Once::new();
static NAME_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("playground=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Connect to the local runtime, or `None` when no daemon answers.
#[allow(dead_code)]
pub async fn local_runtime() -> Option<BollardRuntime> {
    init_tracing();
    playground::runtime::connect(&RuntimeConfig::default())
        .await
        .ok()
}

/// A container name unique to this test process.
#[allow(dead_code)]
pub fn unique_name(prefix: &str) -> String {
    format!(
        "playground-{}-{}-{}",
        prefix,
        std::process::id(),
        NAME_COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}
