//! Runtime-toggleable logging configuration.
//!
//! With diagnostics off only WARN and ERROR reach the output; turning
//! them on re-enables DEBUG and INFO without rebuilding the logger.

use log::LevelFilter;
use std::sync::atomic::{AtomicBool, Ordering};

static DIAGNOSTICS_ENABLED: AtomicBool = AtomicBool::new(false);

fn level_for(diagnostics: bool) -> LevelFilter {
    if diagnostics {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install the env_logger backend. Safe to call more than once; later
/// calls keep the first logger and only adjust the level.
pub fn init_logging(diagnostics: bool) {
    let _ = env_logger::Builder::new()
        .filter_level(level_for(diagnostics))
        .format_timestamp_millis()
        .format_module_path(true)
        .try_init();

    set_diagnostics_enabled(diagnostics);
}

/// Flip diagnostic logging at runtime.
pub fn set_diagnostics_enabled(enabled: bool) {
    DIAGNOSTICS_ENABLED.store(enabled, Ordering::SeqCst);
    log::set_max_level(level_for(enabled));
}

pub fn is_diagnostics_enabled() -> bool {
    DIAGNOSTICS_ENABLED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_tracks_state_and_level() {
        init_logging(false);
        assert!(!is_diagnostics_enabled());
        assert_eq!(log::max_level(), LevelFilter::Warn);

        set_diagnostics_enabled(true);
        assert!(is_diagnostics_enabled());
        assert_eq!(log::max_level(), LevelFilter::Debug);

        set_diagnostics_enabled(false);
        assert!(!is_diagnostics_enabled());
    }
}
