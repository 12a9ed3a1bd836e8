// 📝 Logging - env_logger setup
// RUST_LOG wins; otherwise info, or debug when the debug flag is on.

use env_logger::Env;

pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Safe to call more than once; later calls are ignored
pub fn init_logging(debug: bool) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter(debug)))
        .format_timestamp_secs()
        .try_init();
}
