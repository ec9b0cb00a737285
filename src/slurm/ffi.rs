// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! [`SlurmApi`] backed by libslurm.

use std::ffi::{CStr, CString};
use std::ptr;

use nix::libc;

use super::{call_with_errno, error_code, NodeInfo, SlurmApi};

#[allow(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    dead_code,
    clippy::all
)]
mod bindings {
    include!(concat!(env!("OUT_DIR"), "/slurm_bindings.rs"));
}

// The flag values used by `node_state` must agree with the installed Slurm headers.
const _: () = assert!(crate::node_state::NODE_STATE_BASE == bindings::NODE_STATE_BASE);
const _: () = assert!(crate::node_state::NodeState::DRAIN.bits() == bindings::NODE_STATE_DRAIN);

// Exported by libslurm but not declared in its public headers.
extern "C" {
    fn slurm_conf_init(file_name: *const libc::c_char) -> libc::c_int;
    fn slurm_conf_destroy() -> libc::c_int;
}

const SLURM_SUCCESS: libc::c_int = 0;

/// Slurm error code for an argument that can't be handed to C.
const SLURM_ERROR: i32 = -1;

/// The process-wide Slurm client library.
pub struct Slurm;

impl SlurmApi for Slurm {
    type NodeInfo = NodeInfoMsg;

    fn init_config(&self, path: Option<&str>) -> Result<(), i32> {
        let path = path
            .map(CString::new)
            .transpose()
            .map_err(|_| SLURM_ERROR)?;
        let path_ptr = path.as_ref().map_or(ptr::null(), |p| p.as_ptr());

        // SAFETY: `path_ptr` is either null or points into `path`, which outlives the call.
        let (rc, errno) = call_with_errno(|| unsafe { slurm_conf_init(path_ptr) });
        if rc == SLURM_SUCCESS {
            Ok(())
        } else {
            Err(error_code(rc, errno))
        }
    }

    fn destroy_config(&self) {
        // SAFETY: only called by a session that initialized the configuration.
        unsafe {
            slurm_conf_destroy();
        }
    }

    fn load_node(&self, hostname: &str) -> Result<Option<NodeInfoMsg>, i32> {
        let hostname = CString::new(hostname).map_err(|_| SLURM_ERROR)?;
        let mut msg: *mut bindings::node_info_msg_t = ptr::null_mut();

        // SAFETY: slurm_load_node_single does not modify the node name despite taking it as
        // `char *`, and fills in `msg` with a response we own.
        let (rc, errno) = call_with_errno(|| unsafe {
            bindings::slurm_load_node_single(
                &mut msg,
                hostname.as_ptr() as *mut libc::c_char,
                bindings::SHOW_ALL as u16,
            )
        });
        // Wrap before checking `rc` so that a partial response is still freed.
        let node_info = NodeInfoMsg(msg);
        if rc != SLURM_SUCCESS {
            return Err(error_code(rc, errno));
        }

        if node_info.0.is_null() {
            Ok(None)
        } else {
            Ok(Some(node_info))
        }
    }

    fn strerror(&self, code: i32) -> String {
        // SAFETY: slurm_strerror returns a pointer to a static string.
        unsafe {
            let message = bindings::slurm_strerror(code);
            if message.is_null() {
                format!("unknown error {code}")
            } else {
                CStr::from_ptr(message).to_string_lossy().into_owned()
            }
        }
    }
}

/// An owned `node_info_msg_t`, freed on drop.
pub struct NodeInfoMsg(*mut bindings::node_info_msg_t);

impl NodeInfo for NodeInfoMsg {
    fn record_count(&self) -> usize {
        if self.0.is_null() {
            return 0;
        }
        // SAFETY: non-null pointer returned by slurm_load_node_single.
        unsafe { (*self.0).record_count as usize }
    }

    fn node_state(&self, index: usize) -> Option<u32> {
        if index >= self.record_count() {
            return None;
        }
        // SAFETY: `node_array` holds `record_count` records.
        unsafe {
            let array = (*self.0).node_array;
            if array.is_null() {
                return None;
            }
            Some((*array.add(index)).node_state)
        }
    }
}

impl Drop for NodeInfoMsg {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: the message came from slurm_load_node_single and is freed exactly once.
            unsafe { bindings::slurm_free_node_info_msg(self.0) };
        }
    }
}
