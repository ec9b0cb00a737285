// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! The surface of the PAM framework that the account check relies on.
//!
//! The check itself only ever talks to a [`PamHost`]. The real implementation backed by a
//! `pam_handle_t` lives in [`ffi`] and is only built with the `pam` feature; tests use
//! [`crate::test_env::FakeHost`].

#[cfg(feature = "pam")]
pub mod ffi;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use nix::libc;

/// Flag passed by the application asking modules not to emit any messages.
pub const PAM_SILENT: i32 = 0x8000;

/// Return codes handed back to the PAM framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PamReturn {
    Success,
    SystemErr,
    PermDenied,
    Ignore,
}

impl PamReturn {
    /// The Linux-PAM numeric value of this return code.
    pub fn code(&self) -> i32 {
        match self {
            PamReturn::Success => 0,
            PamReturn::SystemErr => 4,
            PamReturn::PermDenied => 6,
            PamReturn::Ignore => 25,
        }
    }
}

impl fmt::Display for PamReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PamReturn::Success => "PAM_SUCCESS",
                PamReturn::SystemErr => "PAM_SYSTEM_ERR",
                PamReturn::PermDenied => "PAM_PERM_DENIED",
                PamReturn::Ignore => "PAM_IGNORE",
            }
        )
    }
}

/// Run a module call, turning a panic into `PAM_SYSTEM_ERR` so it never unwinds into libpam.
pub fn catch_panic(call: impl FnOnce() -> PamReturn) -> PamReturn {
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or(PamReturn::SystemErr)
}

/// Syslog priorities used by the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Notice,
    Info,
}

impl Severity {
    pub fn priority(&self) -> libc::c_int {
        match self {
            Severity::Error => libc::LOG_ERR,
            Severity::Warning => libc::LOG_WARNING,
            Severity::Notice => libc::LOG_NOTICE,
            Severity::Info => libc::LOG_INFO,
        }
    }
}

/// Somewhere to send operator-facing log records.
pub trait Syslog {
    fn syslog(&self, severity: Severity, message: &str);
}

/// Why a conversation message could not be delivered.
#[derive(Debug, thiserror::Error)]
pub enum ConvError {
    #[error("no conversation function available")]
    Unavailable,
    #[error("message contains a NUL byte")]
    InvalidMessage,
    #[error("conversation failed with PAM error {0}")]
    Failed(i32),
}

/// The calling PAM stack, as seen from inside the account check.
pub trait PamHost: Syslog {
    /// The user the session is being established for, if the application set one.
    fn user(&self) -> Option<String>;

    /// Show an error message to the user through the application's conversation function.
    fn send_error(&self, message: &str) -> Result<(), ConvError>;
}
