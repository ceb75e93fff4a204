//! Logging initialization

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Subscriber profile selected by the CLI flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Default CLI mode: human-readable, warnings only unless RUST_LOG says otherwise
    Interactive,
    /// `--verbose`: human-readable with debug events
    Verbose,
    /// `--log-json`: one JSON object per event
    Json,
    /// Tests install their own capture subscriber
    Test,
}

impl Profile {
    fn default_directive(&self) -> &'static str {
        match self {
            Profile::Interactive => "kdev=warn",
            Profile::Verbose => "kdev=debug",
            Profile::Json => "kdev=info",
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber; later calls are no-ops
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = || {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()))
        };
        match profile {
            Profile::Interactive | Profile::Verbose => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_env_filter(filter())
                    .init();
            }
            Profile::Json => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter())
                    .init();
            }
            Profile::Test => {
                // capture is installed by init_test_capture()
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Test);
        init(Profile::Test);
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(Profile::Interactive.default_directive(), "kdev=warn");
        assert_eq!(Profile::Verbose.default_directive(), "kdev=debug");
        assert_eq!(Profile::Json.default_directive(), "kdev=info");
    }
}
