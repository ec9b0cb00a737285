// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! The access decision. Everything in here is pure; the caller gathers the inputs and acts on
//! the [`Outcome`].

use crate::node_state::NodeRecord;
use crate::options::Options;
use crate::pam::{PamReturn, Severity};

/// The account that may be exempted from the check with `ignore_root`.
pub const PRIVILEGED_USER: &str = "root";

/// The result of an access check along with the reason for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Allow(String),
    Deny(String),
    Ignore(String),
    SystemError(String),
}

impl Outcome {
    pub fn reason(&self) -> &str {
        match self {
            Outcome::Allow(reason)
            | Outcome::Deny(reason)
            | Outcome::Ignore(reason)
            | Outcome::SystemError(reason) => reason,
        }
    }

    pub fn pam_return(&self) -> PamReturn {
        match self {
            Outcome::Allow(_) => PamReturn::Success,
            Outcome::Deny(_) => PamReturn::PermDenied,
            Outcome::Ignore(_) => PamReturn::Ignore,
            Outcome::SystemError(_) => PamReturn::SystemErr,
        }
    }

    /// The syslog priority the outcome is reported at.
    pub fn severity(&self) -> Severity {
        match self {
            Outcome::SystemError(_) => Severity::Error,
            Outcome::Deny(_) => Severity::Notice,
            Outcome::Allow(_) | Outcome::Ignore(_) => Severity::Info,
        }
    }
}

/// Returns an outcome when `user` does not need to be checked against Slurm at all.
///
/// This never needs Slurm, so it runs before the Slurm client is set up: root can still log
/// in to a node whose controller is unreachable.
pub fn exempt(user: Option<&str>, options: &Options) -> Option<Outcome> {
    match user {
        Some(PRIVILEGED_USER) if options.ignore_root => {
            Some(Outcome::Ignore(format!("Ignoring {PRIVILEGED_USER} user")))
        }
        _ => None,
    }
}

/// Decide whether `user` may start a session on `node`.
///
/// A node admits sessions only once it is marked DRAIN and no longer has jobs on it. Base
/// states this module does not know about count as having no jobs.
pub fn decide(user: Option<&str>, node: &NodeRecord, options: &Options) -> Outcome {
    if let Some(outcome) = exempt(user, options) {
        return outcome;
    }

    if !node.state.is_draining() {
        return Outcome::Deny(format!("Node {} is not draining", node.hostname));
    }

    if node.state.base().has_jobs() {
        return Outcome::Deny(format!("Host {} is not drained yet", node.hostname));
    }

    Outcome::Allow(format!("Node {} is drained, allowing access", node.hostname))
}
