// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! Access to the Slurm controller: the client configuration lifetime and the lookup of the
//! local node's state.

#[cfg(feature = "slurm")]
pub mod ffi;

use log::debug;

use crate::node_state::{NodeRecord, NodeState};
use crate::pam::{Severity, Syslog};

/// A response to a node query. The response is released when it is dropped.
pub trait NodeInfo {
    fn record_count(&self) -> usize;

    /// The state word of the record at `index`, if there is one.
    fn node_state(&self, index: usize) -> Option<u32>;
}

/// The calls this module makes into the Slurm client library.
pub trait SlurmApi {
    type NodeInfo: NodeInfo;

    /// Load the Slurm configuration from `path`, or from the default location when `None`.
    /// Fails with a Slurm error code, most commonly because the configuration was already
    /// loaded by someone else in this process.
    fn init_config(&self, path: Option<&str>) -> Result<(), i32>;

    fn destroy_config(&self);

    /// Ask the controller for every record of `hostname`. `Ok(None)` means the call
    /// succeeded without returning a response.
    fn load_node(&self, hostname: &str) -> Result<Option<Self::NodeInfo>, i32>;

    fn strerror(&self, code: i32) -> String;
}

/// A loaded Slurm client configuration.
///
/// If the configuration was already loaded when the session was opened, the session does not
/// own it and leaves it alone when closed. Otherwise dropping the session destroys it.
pub struct Session<'a, S: SlurmApi> {
    api: &'a S,
    owned: bool,
}

impl<'a, S: SlurmApi> Session<'a, S> {
    pub fn open(api: &'a S, path: Option<&str>, log: &impl Syslog) -> Self {
        let owned = match api.init_config(path) {
            Ok(()) => true,
            Err(code) => {
                log.syslog(
                    Severity::Warning,
                    &format!(
                        "Slurm configuration not loaded here ({}), using the existing one",
                        api.strerror(code)
                    ),
                );
                false
            }
        };
        debug!("opened Slurm session, owned: {owned}");

        Session { api, owned }
    }

    pub fn owned(&self) -> bool {
        self.owned
    }

    pub fn api(&self) -> &'a S {
        self.api
    }

    /// Close the session now instead of at the end of scope.
    pub fn close(self) {}
}

impl<S: SlurmApi> Drop for Session<'_, S> {
    fn drop(&mut self) {
        if self.owned {
            debug!("destroying Slurm configuration");
            self.api.destroy_config();
        }
    }
}

/// Run a libslurm call that reports failures through errno, returning its result along with
/// the errno it left behind. errno is cleared first because Slurm does not set it on every
/// failure.
pub fn call_with_errno<T>(call: impl FnOnce() -> T) -> (T, i32) {
    nix::errno::Errno::clear();
    let result = call();
    (result, nix::errno::Errno::last_raw())
}

/// The error code to report for a failed libslurm call: errno when the call set it, the
/// return code otherwise.
pub fn error_code(rc: i32, errno: i32) -> i32 {
    if errno != 0 {
        errno
    } else {
        rc
    }
}

/// The name this node goes by, which is also its name in Slurm.
pub trait Hostname {
    fn hostname(&self) -> Result<String, nix::Error>;
}

/// Longest hostname that will be read.
pub const HOST_NAME_MAX: usize = 255;

/// Reads the hostname from the kernel.
pub struct SystemHostname;

impl Hostname for SystemHostname {
    fn hostname(&self) -> Result<String, nix::Error> {
        let name = nix::unistd::gethostname()?
            .into_string()
            .map_err(|_| nix::Error::EINVAL)?;
        Ok(truncate(name, HOST_NAME_MAX))
    }
}

fn truncate(mut name: String, max: usize) -> String {
    if name.len() > max {
        let mut end = max;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
    }
    name
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Failed to get hostname")]
    Hostname(#[source] nix::Error),
    #[error("Failed to load node information from Slurm: {message} ({code})")]
    Load { message: String, code: i32 },
    #[error("Can't get node info")]
    NoNodeInfo,
    #[error("Can't find {0} in cluster")]
    NotFound(String),
}

/// Look up this node in Slurm.
///
/// The query asks for a single hostname, so Slurm answers with at most one record. If more
/// come back the first one is used.
pub fn query_local_node<S: SlurmApi>(
    session: &Session<'_, S>,
    hostname: &impl Hostname,
) -> Result<NodeRecord, QueryError> {
    let hostname = hostname.hostname().map_err(QueryError::Hostname)?;
    let api = session.api();

    let node_info = api
        .load_node(&hostname)
        .map_err(|code| QueryError::Load {
            message: api.strerror(code),
            code,
        })?
        .ok_or(QueryError::NoNodeInfo)?;

    if node_info.record_count() == 0 {
        return Err(QueryError::NotFound(hostname));
    }
    let state = node_info
        .node_state(0)
        .ok_or_else(|| QueryError::NotFound(hostname.clone()))?;

    debug!("node {hostname} has state {state:#x}");

    Ok(NodeRecord {
        hostname,
        state: NodeState::from(state),
    })
}
