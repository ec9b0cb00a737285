// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

//! The exported PAM entry point and a [`PamHost`] over a raw `pam_handle_t`.

use std::ffi::{CStr, CString};
use std::ptr;

use nix::libc;

use super::{catch_panic, ConvError, PamHost, Severity, Syslog};

const PAM_SUCCESS: libc::c_int = 0;
const PAM_USER: libc::c_int = 2;
const PAM_CONV: libc::c_int = 5;
const PAM_ERROR_MSG: libc::c_int = 3;

#[repr(C)]
pub struct PamHandleT {
    _private: [u8; 0],
}

#[repr(C)]
struct PamMessage {
    msg_style: libc::c_int,
    msg: *const libc::c_char,
}

#[repr(C)]
#[allow(dead_code)]
struct PamResponse {
    resp: *mut libc::c_char,
    resp_retcode: libc::c_int,
}

#[repr(C)]
struct PamConv {
    conv: Option<
        unsafe extern "C" fn(
            num_msg: libc::c_int,
            msg: *mut *const PamMessage,
            resp: *mut *mut PamResponse,
            appdata_ptr: *mut libc::c_void,
        ) -> libc::c_int,
    >,
    appdata_ptr: *mut libc::c_void,
}

#[link(name = "pam")]
extern "C" {
    fn pam_get_item(
        pamh: *const PamHandleT,
        item_type: libc::c_int,
        item: *mut *const libc::c_void,
    ) -> libc::c_int;

    fn pam_syslog(pamh: *const PamHandleT, priority: libc::c_int, fmt: *const libc::c_char, ...);
}

/// The PAM handle of the running transaction.
pub struct PamHandle {
    pamh: *const PamHandleT,
}

impl PamHandle {
    /// # Safety
    ///
    /// `pamh` must be the handle PAM passed to the current module call.
    pub unsafe fn from_raw(pamh: *const PamHandleT) -> Self {
        PamHandle { pamh }
    }

    fn get_item(&self, item_type: libc::c_int) -> Option<*const libc::c_void> {
        let mut item: *const libc::c_void = ptr::null();
        // SAFETY: `pamh` is valid for the duration of the module call.
        let rc = unsafe { pam_get_item(self.pamh, item_type, &mut item) };
        if rc == PAM_SUCCESS && !item.is_null() {
            Some(item)
        } else {
            None
        }
    }
}

impl Syslog for PamHandle {
    fn syslog(&self, severity: Severity, message: &str) {
        let Ok(message) = CString::new(message.replace('\0', "")) else {
            return;
        };
        // SAFETY: the format string consumes exactly one C string argument.
        unsafe {
            pam_syslog(self.pamh, severity.priority(), c"%s".as_ptr(), message.as_ptr());
        }
    }
}

impl PamHost for PamHandle {
    fn user(&self) -> Option<String> {
        let user = self.get_item(PAM_USER)?;
        // SAFETY: PAM_USER items are NUL-terminated strings owned by PAM.
        let user = unsafe { CStr::from_ptr(user as *const libc::c_char) };
        user.to_str().ok().map(str::to_string)
    }

    fn send_error(&self, message: &str) -> Result<(), ConvError> {
        let conv = self.get_item(PAM_CONV).ok_or(ConvError::Unavailable)?;
        // SAFETY: PAM_CONV items point at a `struct pam_conv` owned by the application.
        let conv = unsafe { &*(conv as *const PamConv) };
        let conv_fn = conv.conv.ok_or(ConvError::Unavailable)?;

        let text = CString::new(message).map_err(|_| ConvError::InvalidMessage)?;
        let msg = PamMessage {
            msg_style: PAM_ERROR_MSG,
            msg: text.as_ptr(),
        };
        let mut msg_ptr: *const PamMessage = &msg;
        let mut resp: *mut PamResponse = ptr::null_mut();

        // SAFETY: one message is passed, matching `num_msg`.
        let rc = unsafe { conv_fn(1, &mut msg_ptr, &mut resp, conv.appdata_ptr) };

        if !resp.is_null() {
            // SAFETY: the application allocates one response per message with malloc and
            // hands ownership to the module.
            unsafe {
                if !(*resp).resp.is_null() {
                    libc::free((*resp).resp as *mut libc::c_void);
                }
                libc::free(resp as *mut libc::c_void);
            }
        }

        if rc == PAM_SUCCESS {
            Ok(())
        } else {
            Err(ConvError::Failed(rc))
        }
    }
}

/// Collect the module arguments PAM hands over as `argc`/`argv`.
///
/// # Safety
///
/// `argv` must hold `argc` valid NUL-terminated strings.
unsafe fn collect_args(argc: libc::c_int, argv: *const *const libc::c_char) -> Vec<String> {
    if argv.is_null() || argc <= 0 {
        return Vec::new();
    }
    (0..argc as usize)
        .map(|i| *argv.add(i))
        .filter(|arg| !arg.is_null())
        .map(|arg| CStr::from_ptr(arg).to_string_lossy().into_owned())
        .collect()
}

/// Account management: allow a session only on a node that Slurm reports as drained.
///
/// # Safety
///
/// Called by libpam with a valid handle and argument vector.
#[no_mangle]
pub unsafe extern "C" fn pam_sm_acct_mgmt(
    pamh: *const PamHandleT,
    flags: libc::c_int,
    argc: libc::c_int,
    argv: *const *const libc::c_char,
) -> libc::c_int {
    let host = PamHandle::from_raw(pamh);
    let args = collect_args(argc, argv);

    catch_panic(|| {
        crate::account::check_account(
            &host,
            &crate::slurm::ffi::Slurm,
            &crate::slurm::SystemHostname,
            flags,
            args.as_slice(),
        )
    })
    .code()
}
