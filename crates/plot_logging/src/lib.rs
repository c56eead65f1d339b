#![deny(missing_docs)]
//! Logging for the csvplot crates.
//!
//! The `plot_*` macros forward to `log` and prefix each line with the plot
//! request handled by the current thread, so backend output from concurrent
//! generations can be told apart.

use std::cell::Cell;
use std::fmt;

thread_local! {
    static REQUEST_ID: Cell<u64> = const { Cell::new(0) };
}

/// Records the plot request handled by the current thread. 0 means none.
pub fn set_request_id(request_id: u64) {
    REQUEST_ID.with(|v| v.set(request_id));
}

/// The plot request recorded for the current thread, or 0.
pub fn current_request_id() -> u64 {
    REQUEST_ID.with(|v| v.get())
}

/// Tags the current thread with `request_id` until the guard drops.
pub fn enter_request(request_id: u64) -> RequestGuard {
    let previous = current_request_id();
    set_request_id(request_id);
    RequestGuard { previous }
}

/// Restores the previous request id when dropped, including during unwinding.
#[must_use = "the request id is cleared as soon as the guard drops"]
pub struct RequestGuard {
    previous: u64,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        set_request_id(self.previous);
    }
}

/// Line prefix naming the current request; empty outside a request.
#[doc(hidden)]
pub fn request_tag() -> RequestTag {
    RequestTag(current_request_id())
}

/// Display prefix built by [`request_tag`].
#[doc(hidden)]
pub struct RequestTag(u64);

impl fmt::Display for RequestTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => Ok(()),
            id => write!(f, "[request {id}] "),
        }
    }
}

/// `log::trace!` with the request prefix.
#[macro_export]
macro_rules! plot_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::request_tag(), format_args!($($arg)*));
    }};
}

/// `log::debug!` with the request prefix.
#[macro_export]
macro_rules! plot_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::request_tag(), format_args!($($arg)*));
    }};
}

/// `log::info!` with the request prefix.
#[macro_export]
macro_rules! plot_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::request_tag(), format_args!($($arg)*));
    }};
}

/// `log::warn!` with the request prefix.
#[macro_export]
macro_rules! plot_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::request_tag(), format_args!($($arg)*));
    }};
}

/// `log::error!` with the request prefix.
#[macro_export]
macro_rules! plot_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::request_tag(), format_args!($($arg)*));
    }};
}

/// Installs a terminal logger for tests. A logger installed earlier wins.
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
        ColorChoice::Auto,
    )]);
}
