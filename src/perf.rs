//! Lightweight performance instrumentation.
//!
//! Timings are emitted as `tracing` events on the `perf` target, so they land
//! wherever the subscriber writes (stderr or `--debug-log`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Times the enclosing scope; reports on drop when enabled.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(target: "perf", name = self.name, elapsed_ms, "scope");
    }
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// The log filter for the binary: `RUST_LOG` plus a WARN floor, with the
/// `perf` target opened up to debug when timings are enabled.
pub fn env_filter(perf: bool) -> Result<EnvFilter, ParseError> {
    with_perf_directive(EnvFilter::from_default_env(), perf)
}

fn with_perf_directive(filter: EnvFilter, perf: bool) -> Result<EnvFilter, ParseError> {
    let filter = filter.add_directive(tracing::Level::WARN.into());
    if !perf {
        return Ok(filter);
    }
    Ok(filter.add_directive("perf=debug".parse()?))
}

/// Record a named event with free-form detail when enabled.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    if !is_enabled() {
        return;
    }
    tracing::debug!(target: "perf", name, detail = detail.as_ref(), "event");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_scope_drop_without_subscriber_is_harmless() {
        set_enabled(true);
        {
            let _scope = scope("test.scope");
            log_event("test.event", "hello world");
        }
        set_enabled(false);
    }

    fn perf_debug_enabled(perf: bool) -> bool {
        let filter = with_perf_directive(EnvFilter::new(""), perf).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::enabled!(target: "perf", tracing::Level::DEBUG)
        })
    }

    #[test]
    fn test_perf_target_passes_filter_when_enabled() {
        assert!(perf_debug_enabled(true));
    }

    #[test]
    fn test_perf_target_filtered_when_disabled() {
        assert!(!perf_debug_enabled(false));
    }

    #[test]
    fn test_perf_directive_keeps_other_targets_at_warn() {
        let filter = with_perf_directive(EnvFilter::new(""), true).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(target: "app", tracing::Level::DEBUG));
            assert!(tracing::enabled!(target: "app", tracing::Level::WARN));
        });
    }
}
