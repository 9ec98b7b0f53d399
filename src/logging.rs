use std::io;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "INFER2SARIF_LOG";

/// Initialize stderr logging once per process.
///
/// The level defaults to `warn`; set `INFER2SARIF_LOG` to change it.
pub(crate) fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    });
}
