//! Logging setup.
//!
//! Caption output goes to stdout, so every diagnostic line is written to
//! stderr. The base level comes from `logging.level` in the config file
//! (`error`, `warn`, `info`, `debug`, `trace`); `--verbose` forces `debug`
//! and `RUST_LOG` overrides everything.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dagger_core::Config;

/// Initialize the logging subsystem from the resolved configuration.
pub fn init(config: &Config, verbose: bool, json_logs: bool) {
    let level = resolve_level(verbose, &config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let json_format = json_logs || config.logging.format == "json";

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Map the CLI flag and the configured level string to a filter directive.
///
/// Unknown level strings fall back to `info` rather than erroring; logging
/// setup must not be able to kill the process.
fn resolve_level<'a>(verbose: bool, configured: &'a str) -> &'a str {
    if verbose {
        return "debug";
    }
    match configured {
        "error" | "warn" | "info" | "debug" | "trace" => configured,
        _ => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_level_honors_full_scale() {
        for level in ["error", "warn", "info", "debug", "trace"] {
            assert_eq!(resolve_level(false, level), level);
        }
    }

    #[test]
    fn test_resolve_level_verbose_wins() {
        assert_eq!(resolve_level(true, "warn"), "debug");
        assert_eq!(resolve_level(true, "error"), "debug");
    }

    #[test]
    fn test_resolve_level_unknown_falls_back_to_info() {
        assert_eq!(resolve_level(false, "loud"), "info");
        assert_eq!(resolve_level(false, ""), "info");
    }
}
