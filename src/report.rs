// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use log::debug;

use crate::decision::Outcome;
use crate::pam::PamHost;

/// Name the module identifies itself with in messages to users.
pub const MODULE_NAME: &str = "pam_slurm_drained";

/// The message shown to a user whose session was denied.
pub fn denial_message(reason: &str) -> String {
    format!("Access denied by {MODULE_NAME}: {reason}")
}

/// Log the outcome of a check and, for denials, tell the user why unless `silent` is set.
///
/// Failing to reach the user is not an error: the outcome stands either way.
pub fn report(outcome: &Outcome, silent: bool, host: &impl PamHost) {
    host.syslog(outcome.severity(), outcome.reason());

    if let Outcome::Deny(reason) = outcome {
        if silent {
            return;
        }
        if let Err(e) = host.send_error(&denial_message(reason)) {
            debug!("could not send denial message: {e}");
        }
    }
}
