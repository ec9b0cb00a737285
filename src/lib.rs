// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! A PAM account module that only lets sessions onto a node once Slurm reports it as drained.
//!
//! Built with the `pam` feature, the `cdylib` exports `pam_sm_acct_mgmt` and can be listed in
//! a PAM stack:
//!
//! ```text
//! account sufficient pam_slurm_drained.so [slurm_conf=<path>] [ignore_root=0]
//! ```

pub mod account;
pub mod decision;
pub mod node_state;
pub mod options;
pub mod pam;
pub mod report;
pub mod slurm;
pub mod test_env;

