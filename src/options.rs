// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use crate::pam::{Severity, Syslog};

/// Options given to the module on its line in the PAM configuration, e.g.
///
/// ```text
/// account required pam_slurm_drained.so slurm_conf=/etc/slurm/slurm.conf ignore_root=0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Path of the Slurm configuration file. When unset, Slurm finds its own configuration.
    pub slurm_conf: Option<String>,
    /// Let root through without asking Slurm.
    pub ignore_root: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            slurm_conf: None,
            ignore_root: true,
        }
    }
}

impl Options {
    /// Parse the module arguments. Unrecognized arguments are logged as warnings and
    /// otherwise ignored.
    pub fn parse<S: AsRef<str>>(args: &[S], log: &impl Syslog) -> Self {
        let mut options = Options::default();

        for arg in args.iter().map(AsRef::as_ref) {
            if let Some(path) = strip_prefix_ignore_case(arg, "slurm_conf=") {
                options.slurm_conf = Some(path.to_string());
            } else if let Some(value) = strip_prefix_ignore_case(arg, "ignore_root=") {
                if value == "0" {
                    options.ignore_root = false;
                }
            } else {
                log.syslog(Severity::Warning, &format!("unknown option: {arg}"));
            }
        }

        options
    }
}

fn strip_prefix_ignore_case<'a>(arg: &'a str, prefix: &str) -> Option<&'a str> {
    let head = arg.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&arg[prefix.len()..])
    } else {
        None
    }
}
