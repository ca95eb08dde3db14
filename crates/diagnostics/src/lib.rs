// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Structured logging shared by the hiveop crates
//!
//! Every crate logs through the macros exported here so that a single
//! environment variable controls the whole workspace:
//! - `HIVEOP_LOG=off` (default) - no logs
//! - `HIVEOP_LOG=info` - store conflicts, created objects
//! - `HIVEOP_LOG=debug` - client lifecycle and schema comparison detail

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable holding the minimum log level
pub const LOG_ENV: &str = "HIVEOP_LOG";

static INIT: Once = Once::new();

/// Minimum level requested by a `HIVEOP_LOG` value.
///
/// `None` means logging is disabled. Unknown values select `Info` and are
/// reported once the emitter is running.
#[must_use]
pub fn parse_level(value: &str) -> Option<(emit::Level, bool)> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" => None,
        "debug" => Some((emit::Level::Debug, true)),
        "info" => Some((emit::Level::Info, true)),
        "warn" => Some((emit::Level::Warn, true)),
        "error" => Some((emit::Level::Error, true)),
        _ => Some((emit::Level::Info, false)),
    }
}

/// Initialize diagnostics based on the `HIVEOP_LOG` environment variable
///
/// Call once at startup; later calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let requested = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());

        let Some((level, recognised)) = parse_level(&requested) else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if !recognised {
            emit::warn!(
                "Unknown {env} value '{requested}', using 'info'",
                env: LOG_ENV,
                requested: requested.as_str()
            );
        }

        // The runtime lives for the rest of the process
        std::mem::forget(rt);
    });
}

/// Log basic operations (created databases, store conflicts)
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (client lifecycle, comparison steps)
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable conditions (failures converted at a catch boundary)
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that stop an operation
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Short form of [`log_info!`]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Short form of [`log_debug!`]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Short form of [`log_warn!`]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Short form of [`log_error!`]
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_multiple_times() {
        init_diagnostics();
        init_diagnostics();
        init();
    }

    #[test]
    fn test_parse_level() {
        assert!(parse_level("off").is_none());
        assert!(parse_level("").is_none());
        assert_eq!(parse_level("DEBUG"), Some((emit::Level::Debug, true)));
        assert_eq!(parse_level(" warn "), Some((emit::Level::Warn, true)));
        assert_eq!(parse_level("error"), Some((emit::Level::Error, true)));
        assert_eq!(parse_level("chatty"), Some((emit::Level::Info, false)));
    }

    #[test]
    fn test_store_events_log_with_properties() {
        init();
        let table = "sales.orders";
        log_info!("Created table {name}", name: table);
        log_debug!("Schema of {name}: {detail}", name: table, detail: "columns differ");
        log_warn!("Operation panicked: {reason}", reason: "store exploded");
        log_error!("Could not acquire metastore client: {reason}", reason: "refused");
        debug!("Acquired memory metastore client, {open} open", open: 1_usize);
    }
}
