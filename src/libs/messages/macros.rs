//! Output macros for user-facing messages.
//!
//! Every macro takes a [`Message`](super::Message), or anything else that
//! implements `Display`, and sends it to one of two places depending on the
//! run mode:
//!
//! - **Normal mode**: plain `println!`/`eprintln!` output with an emoji prefix,
//!   which is what the interactive `watch` loop shows the user.
//! - **Debug mode**: a `tracing` event at the matching level, so messages land
//!   in the same stream as the engine's own diagnostics.
//!
//! ## Debug Mode Detection
//!
//! Debug mode is on when `RESTWATCH_DEBUG` or `RUST_LOG` is set. The check runs
//! once per process and is cached.
//!
//! ## Macros
//!
//! | Macro | Prefix | Stream | Tracing level |
//! |---|---|---|---|
//! | `msg_print!` | none | stdout | info |
//! | `msg_info!` | ℹ️ | stdout | info |
//! | `msg_success!` | ✅ | stdout | info |
//! | `msg_warning!` | ⚠️ | stdout | warn |
//! | `msg_error!` | ❌ | stderr | error |
//!
//! Passing `true` as a second argument surrounds the message with blank lines.
//! `msg_error_anyhow!` builds an `anyhow::Error` from a message instead of
//! printing it.
//!
//! ```rust
//! use restwatch::libs::messages::Message;
//! use restwatch::{msg_info, msg_success};
//!
//! msg_info!(Message::TrackerStarted);
//! msg_success!(Message::ConfigSaved, true);
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Whether messages are routed to `tracing` instead of the terminal.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var_os("RESTWATCH_DEBUG").is_some() || std::env::var_os("RUST_LOG").is_some())
}

/// Shared body of the display macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __msg_emit {
    ($level:ident, $print:ident, $prefix:literal, $msg:expr, $padded:expr) => {{
        let pad = if $padded { "\n" } else { "" };
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::$level!("{}{}{}{}", pad, $prefix, $msg, pad);
        } else {
            $print!("{}{}{}{}", pad, $prefix, $msg, pad);
        }
    }};
}

/// Prints a message without a prefix.
#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "", $msg, false)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "", $msg, true)
    };
}

/// Reports a completed operation.
#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "✅ ", $msg, false)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "✅ ", $msg, true)
    };
}

/// Reports a failure on stderr.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        $crate::__msg_emit!(error, eprintln, "❌ ", $msg, false)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(error, eprintln, "❌ ", $msg, true)
    };
}

/// Warns about something the user should act on, such as a due break.
#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        $crate::__msg_emit!(warn, println, "⚠️ ", $msg, false)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(warn, println, "⚠️ ", $msg, true)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "ℹ️ ", $msg, false)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "ℹ️ ", $msg, true)
    };
}

/// Wraps a message into an `anyhow::Error`.
///
/// ```rust
/// use restwatch::libs::messages::Message;
/// use restwatch::msg_error_anyhow;
///
/// let error = msg_error_anyhow!(Message::ConfigInvalid("tick_interval".to_string()));
/// assert!(error.to_string().contains("tick_interval"));
/// ```
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}
