//! Verbosity-gated logging for the solver and layout passes.
//!
//! Nothing is formatted when the verbosity is below the macro's level.
//! Levels:
//! - 0: SILENT
//! - 1: SUMMARY (one line per solve / layout call)
//! - 2: PASSES (fixed-point convergence, zone placement)
//! - 3: DEBUG (per-task decisions)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_PASSES: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at SUMMARY level (verbosity >= 1).
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SUMMARY {
            eprintln!("[netplan] {}", format_args!($($arg)*));
        }
    };
}

/// Log at PASSES level (verbosity >= 2).
///
/// Used for: pass counts of the fixed-point loops, zone row offsets.
#[macro_export]
macro_rules! log_passes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PASSES {
            eprintln!("[netplan]   {}", format_args!($($arg)*));
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: coerced inputs, lane choices.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!("[netplan]     {}", format_args!($($arg)*));
        }
    };
}
