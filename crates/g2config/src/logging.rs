//! Engine verbosity and its mapping onto `tracing`.
//!
//! The engine does not install a subscriber. Its level is a second gate in
//! front of `tracing`: an event is emitted only when it passes both the
//! engine's level and whatever filter the host application configured.

use std::sync::atomic::{AtomicU8, Ordering};

use g2config_core::LogLevel;
use tracing::level_filters::LevelFilter;

/// Map an engine level onto a `tracing` filter. `fatal` and `panic` have no
/// `tracing` counterpart and collapse to `ERROR`.
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => LevelFilter::ERROR,
    }
}

/// Atomically readable engine level.
pub(crate) struct Verbosity(AtomicU8);

impl Verbosity {
    pub(crate) fn new(level: LogLevel) -> Self {
        Self(AtomicU8::new(level.to_u8()))
    }

    pub(crate) fn get(&self) -> LogLevel {
        LogLevel::from_u8(self.0.load(Ordering::Relaxed)).unwrap_or(LogLevel::Info)
    }

    pub(crate) fn set(&self, level: LogLevel) {
        self.0.store(level.to_u8(), Ordering::Relaxed);
    }

    /// Whether events at `level` pass the engine gate.
    pub(crate) fn enabled(&self, level: LogLevel) -> bool {
        level >= self.get()
    }
}
