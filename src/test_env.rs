// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! Stand-ins for PAM, Slurm, and the kernel hostname so that the account check can run
//! without either library present.
//!
//! Every fake records what was asked of it so tests can assert on the side effects of a check,
//! not just its return code.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::pam::{ConvError, PamHost, Severity, Syslog};
use crate::slurm::{Hostname, NodeInfo, SlurmApi};

/// A PAM stack that records log lines and conversation messages.
#[derive(Default)]
pub struct FakeHost {
    user: Option<String>,
    conversation_fails: bool,
    logs: RefCell<Vec<(Severity, String)>>,
    messages: RefCell<Vec<String>>,
}

impl FakeHost {
    pub fn new(user: Option<&str>) -> Self {
        FakeHost {
            user: user.map(str::to_string),
            ..Default::default()
        }
    }

    /// Make every conversation attempt fail.
    pub fn with_failing_conversation(mut self) -> Self {
        self.conversation_fails = true;
        self
    }

    pub fn logs(&self) -> Vec<(Severity, String)> {
        self.logs.borrow().clone()
    }

    /// Logged messages at the given severity.
    pub fn logs_at(&self, severity: Severity) -> Vec<String> {
        self.logs
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Messages that were delivered to the user.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Syslog for FakeHost {
    fn syslog(&self, severity: Severity, message: &str) {
        self.logs.borrow_mut().push((severity, message.to_string()));
    }
}

impl PamHost for FakeHost {
    fn user(&self) -> Option<String> {
        self.user.clone()
    }

    fn send_error(&self, message: &str) -> Result<(), ConvError> {
        if self.conversation_fails {
            return Err(ConvError::Failed(19));
        }
        self.messages.borrow_mut().push(message.to_string());
        Ok(())
    }
}

/// A hostname source that returns a fixed name, or fails when given none.
pub struct FakeHostname(pub Option<String>);

impl FakeHostname {
    pub fn new(name: &str) -> Self {
        FakeHostname(Some(name.to_string()))
    }

    pub fn failing() -> Self {
        FakeHostname(None)
    }
}

impl Hostname for FakeHostname {
    fn hostname(&self) -> Result<String, nix::Error> {
        self.0.clone().ok_or(nix::Error::ENAMETOOLONG)
    }
}

/// What the fake controller answers to a node query.
#[derive(Debug, Clone)]
pub enum NodeReply {
    /// A response holding one record per state.
    Records(Vec<u32>),
    /// A successful call with no response.
    Empty,
    /// The call fails with this Slurm error code.
    Error(i32),
}

/// A node query response that counts how often it was freed.
pub struct FakeNodeInfo {
    states: Vec<u32>,
    freed: Rc<Cell<usize>>,
}

impl NodeInfo for FakeNodeInfo {
    fn record_count(&self) -> usize {
        self.states.len()
    }

    fn node_state(&self, index: usize) -> Option<u32> {
        self.states.get(index).copied()
    }
}

impl Drop for FakeNodeInfo {
    fn drop(&mut self) {
        self.freed.set(self.freed.get() + 1);
    }
}

/// Slurm error code the fake uses for an already loaded configuration.
pub const ALREADY_INITIALIZED: i32 = 2019;

/// A Slurm client whose answers are set by the test.
pub struct FakeSlurm {
    reply: NodeReply,
    init_result: Result<(), i32>,
    pub init_calls: RefCell<Vec<Option<String>>>,
    pub destroy_calls: Cell<usize>,
    pub queried: RefCell<Vec<String>>,
    freed: Rc<Cell<usize>>,
    responses: Cell<usize>,
}

impl FakeSlurm {
    pub fn new(reply: NodeReply) -> Self {
        FakeSlurm {
            reply,
            init_result: Ok(()),
            init_calls: RefCell::new(Vec::new()),
            destroy_calls: Cell::new(0),
            queried: RefCell::new(Vec::new()),
            freed: Rc::new(Cell::new(0)),
            responses: Cell::new(0),
        }
    }

    /// A controller that knows this node with the given state.
    pub fn with_state(state: u32) -> Self {
        Self::new(NodeReply::Records(vec![state]))
    }

    /// Pretend the Slurm configuration was already loaded elsewhere in the process.
    pub fn already_initialized(mut self) -> Self {
        self.init_result = Err(ALREADY_INITIALIZED);
        self
    }

    pub fn init_count(&self) -> usize {
        self.init_calls.borrow().len()
    }

    pub fn destroy_count(&self) -> usize {
        self.destroy_calls.get()
    }

    /// Number of responses handed out that have not been freed yet.
    pub fn outstanding_responses(&self) -> usize {
        self.responses.get() - self.freed.get()
    }
}

impl SlurmApi for FakeSlurm {
    type NodeInfo = FakeNodeInfo;

    fn init_config(&self, path: Option<&str>) -> Result<(), i32> {
        self.init_calls.borrow_mut().push(path.map(str::to_string));
        self.init_result
    }

    fn destroy_config(&self) {
        self.destroy_calls.set(self.destroy_calls.get() + 1);
    }

    fn load_node(&self, hostname: &str) -> Result<Option<FakeNodeInfo>, i32> {
        self.queried.borrow_mut().push(hostname.to_string());
        match &self.reply {
            NodeReply::Records(states) => {
                self.responses.set(self.responses.get() + 1);
                Ok(Some(FakeNodeInfo {
                    states: states.clone(),
                    freed: Rc::clone(&self.freed),
                }))
            }
            NodeReply::Empty => Ok(None),
            NodeReply::Error(code) => Err(*code),
        }
    }

    fn strerror(&self, code: i32) -> String {
        match code {
            ALREADY_INITIALIZED => "Slurm configuration already loaded".to_string(),
            1008 => "Unable to contact slurm controller (connect failure)".to_string(),
            other => format!("Unknown error {other}"),
        }
    }
}
