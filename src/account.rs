// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! The account check run for every session: parse the options, look up this node in Slurm,
//! decide, and report.

use crate::decision::{self, Outcome};
use crate::options::Options;
use crate::pam::{PamHost, PamReturn, PAM_SILENT};
use crate::report;
use crate::slurm::{self, Hostname, Session, SlurmApi};

/// Run the account check and return the code to hand back to PAM.
pub fn check_account<S: AsRef<str>>(
    host: &impl PamHost,
    slurm: &impl SlurmApi,
    hostname: &impl Hostname,
    flags: i32,
    args: &[S],
) -> PamReturn {
    let options = Options::parse(args, host);
    let outcome = evaluate(host, slurm, hostname, &options);

    report::report(&outcome, flags & PAM_SILENT != 0, host);

    outcome.pam_return()
}

/// Decide the outcome for the current user without reporting it.
pub fn evaluate(
    host: &impl PamHost,
    slurm: &impl SlurmApi,
    hostname: &impl Hostname,
    options: &Options,
) -> Outcome {
    let user = host.user();
    if let Some(outcome) = decision::exempt(user.as_deref(), options) {
        return outcome;
    }

    let session = Session::open(slurm, options.slurm_conf.as_deref(), host);
    match slurm::query_local_node(&session, hostname) {
        Ok(node) => decision::decide(user.as_deref(), &node, options),
        Err(e) => Outcome::SystemError(e.to_string()),
    }
}
