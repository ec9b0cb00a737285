// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use clap::Parser;
use log::{error, info, warn};

use pam_slurm_drained::{
    account,
    pam::{ConvError, PamHost, Severity, Syslog, PAM_SILENT},
    slurm::{ffi::Slurm, SystemHostname},
};

/// Show what pam_slurm_drained would decide for a session on this node.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Slurm configuration file to load instead of the default one.
    #[arg(long)]
    slurm_conf: Option<String>,

    /// User the session would be for.
    #[arg(short, long)]
    user: Option<String>,

    /// Check root like any other user.
    #[arg(long)]
    no_ignore_root: bool,

    /// Don't print the message a denied user would see.
    #[arg(short, long)]
    silent: bool,
}

impl Cli {
    /// The module arguments equivalent to these command line options.
    fn module_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(conf) = &self.slurm_conf {
            args.push(format!("slurm_conf={conf}"));
        }
        if self.no_ignore_root {
            args.push("ignore_root=0".to_string());
        }
        args
    }
}

/// Stands in for the PAM stack: log records go to the logger and user messages to stderr.
struct Terminal {
    user: Option<String>,
}

impl Syslog for Terminal {
    fn syslog(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => error!("{message}"),
            Severity::Warning | Severity::Notice => warn!("{message}"),
            Severity::Info => info!("{message}"),
        }
    }
}

impl PamHost for Terminal {
    fn user(&self) -> Option<String> {
        self.user.clone()
    }

    fn send_error(&self, message: &str) -> Result<(), ConvError> {
        eprintln!("{message}");
        Ok(())
    }
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("PAM_SLURM_DRAINED_LOG", "info"),
    )
    .init();

    let cli = Cli::parse();
    let flags = if cli.silent { PAM_SILENT } else { 0 };
    let terminal = Terminal {
        user: cli.user.clone(),
    };

    let result = account::check_account(
        &terminal,
        &Slurm,
        &SystemHostname,
        flags,
        cli.module_args().as_slice(),
    );

    println!("{result}");
    std::process::exit(result.code());
}
