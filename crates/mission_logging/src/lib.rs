#![deny(missing_docs)]
//! Shared logging utilities for the SEO missions workspace.
//!
//! Every crate logs through the `mission_*` macros so the facade can be
//! swapped in one place. Binaries install the actual logger; tests call
//! [`initialize_for_tests`].

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! mission_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: "missions", $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! mission_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: "missions", $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! mission_info {
    ($($arg:tt)*) => {{
        log::info!(target: "missions", $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! mission_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: "missions", $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! mission_error {
    ($($arg:tt)*) => {{
        log::error!(target: "missions", $($arg)*);
    }};
}

/// Initializes a terminal logger for unit and integration tests.
///
/// Safe to call from every test: it no-ops when a logger is already installed.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Never,
    )]);
}
