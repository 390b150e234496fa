//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events; the embedding application decides
//! whether to install a subscriber. `init_logging` is the convenience path.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG` the crate logs at `debug` when `debug` is set and at
/// `info` otherwise. Returns false if a global subscriber was already set.
pub fn init_logging(debug: bool) -> bool {
    let fallback = if debug {
        "dify_stream=debug"
    } else {
        "dify_stream=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let _ = init_logging(true);
        assert!(!init_logging(false));
    }
}
