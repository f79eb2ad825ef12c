/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// Usage:
/// ```ignore
/// log_status!("deploy", "Pushing {} to {}", tag, site);
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

pub mod commands;
pub mod core;
pub mod output;
pub mod utils;

// Re-export core modules so callers can write `terminus_hotfix::gateway`
// instead of `terminus_hotfix::core::gateway`.
pub use crate::core::*;
