// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! Typed view of the node state word that Slurm reports for a node.
//!
//! The low four bits hold the base state, a mutually exclusive value such as IDLE or
//! ALLOCATED. Every bit above that is an independent flag (DRAIN, COMPLETING, ...) that is
//! OR-ed on top of the base state.

use std::fmt;

use bitflags::bitflags;

/// Mask selecting the base state sub-range of a node state word.
pub const NODE_STATE_BASE: u32 = 0x0000_000f;

bitflags! {
    /// A Slurm node state word. Only the flag bits are named here; the base state is read
    /// through [`NodeState::base`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeState: u32 {
        const NET = 0x0000_0010;
        const RES = 0x0000_0020;
        const UNDRAIN = 0x0000_0040;
        const CLOUD = 0x0000_0080;
        const RESUME = 0x0000_0100;
        const DRAIN = 0x0000_0200;
        const COMPLETING = 0x0000_0400;
        const NO_RESPOND = 0x0000_0800;
        const POWERED_DOWN = 0x0000_1000;
        const FAIL = 0x0000_2000;
        const POWERING_UP = 0x0000_4000;
        const MAINT = 0x0000_8000;
        const REBOOT_REQUESTED = 0x0001_0000;
        const REBOOT_CANCEL = 0x0002_0000;
        const POWERING_DOWN = 0x0004_0000;
        const DYNAMIC_FUTURE = 0x0008_0000;
        const REBOOT_ISSUED = 0x0010_0000;
        const PLANNED = 0x0020_0000;
        const INVALID_REG = 0x0040_0000;
        const POWER_DOWN = 0x0080_0000;
        const POWER_UP = 0x0100_0000;
        const POWER_DRAIN = 0x0200_0000;
        const DYNAMIC_NORM = 0x0400_0000;

        // Base state bits are carried through untouched.
        const _ = !0;
    }
}

/// The mutually exclusive base state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseState {
    Unknown,
    Down,
    Idle,
    Allocated,
    Error,
    Mixed,
    Future,
    /// A value in the base state range that this module does not know about.
    Other(u32),
}

impl From<u32> for BaseState {
    fn from(bits: u32) -> Self {
        match bits & NODE_STATE_BASE {
            0 => BaseState::Unknown,
            1 => BaseState::Down,
            2 => BaseState::Idle,
            3 => BaseState::Allocated,
            4 => BaseState::Error,
            5 => BaseState::Mixed,
            6 => BaseState::Future,
            other => BaseState::Other(other),
        }
    }
}

impl BaseState {
    pub fn bits(&self) -> u32 {
        match self {
            BaseState::Unknown => 0,
            BaseState::Down => 1,
            BaseState::Idle => 2,
            BaseState::Allocated => 3,
            BaseState::Error => 4,
            BaseState::Mixed => 5,
            BaseState::Future => 6,
            BaseState::Other(bits) => *bits & NODE_STATE_BASE,
        }
    }

    /// True when jobs are still running on the node.
    pub fn has_jobs(&self) -> bool {
        matches!(self, BaseState::Allocated | BaseState::Mixed)
    }
}

impl fmt::Display for BaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseState::Unknown => write!(f, "UNKNOWN"),
            BaseState::Down => write!(f, "DOWN"),
            BaseState::Idle => write!(f, "IDLE"),
            BaseState::Allocated => write!(f, "ALLOCATED"),
            BaseState::Error => write!(f, "ERROR"),
            BaseState::Mixed => write!(f, "MIXED"),
            BaseState::Future => write!(f, "FUTURE"),
            BaseState::Other(bits) => write!(f, "BASE({bits:#x})"),
        }
    }
}

impl NodeState {
    /// Build a state word from a base state and a set of flags.
    pub fn new(base: BaseState, flags: NodeState) -> Self {
        NodeState::from_bits_retain((flags.bits() & !NODE_STATE_BASE) | base.bits())
    }

    pub fn base(&self) -> BaseState {
        BaseState::from(self.bits())
    }

    pub fn is_draining(&self) -> bool {
        self.contains(NodeState::DRAIN)
    }
}

impl From<u32> for NodeState {
    fn from(bits: u32) -> Self {
        NodeState::from_bits_retain(bits)
    }
}

/// The state of one node as reported by Slurm.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub hostname: String,
    pub state: NodeState,
}

impl NodeRecord {
    pub fn new(hostname: &str, state: impl Into<NodeState>) -> Self {
        NodeRecord {
            hostname: hostname.to_string(),
            state: state.into(),
        }
    }
}
