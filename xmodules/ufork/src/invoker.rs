//! Clone invoker.
//!
//! Issues the clone request with the fixed flag set and turns the returned
//! status into a [`CloneOutcome`].

use core::ffi::c_void;
use core::mem;
use core::ptr;

use ucore::{CloneOutcome, ForkResult, ProcessCloner, ProcessIdentity};

use crate::config::{CLONE_ENTRY, CLONE_FLAGS, CLONE_MODULE, RTL_CLONE_CHILD, RTL_CLONE_PARENT};
use crate::resolver::{self, RawEntry};

#[repr(C)]
#[derive(Clone, Copy)]
struct ClientId {
    unique_process: *mut c_void,
    unique_thread: *mut c_void,
}

#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
struct SectionImageInformation {
    transfer_address: *mut c_void,
    zero_bits: u32,
    maximum_stack_size: usize,
    committed_stack_size: usize,
    sub_system_type: u32,
    sub_system_version: u32,
    gp_value: u32,
    image_characteristics: u16,
    dll_characteristics: u16,
    machine: u16,
    image_contains_code: u8,
    image_flags: u8,
    loader_flags: u32,
    image_file_size: u32,
    check_sum: u32,
}

/// Process-information record filled in by the clone call.
///
/// Only meaningful in the original, after the parent sentinel was returned.
#[repr(C)]
#[allow(dead_code)]
pub(crate) struct RtlUserProcessInformation {
    size: u32,
    process: *mut c_void,
    thread: *mut c_void,
    client_id: ClientId,
    image_information: SectionImageInformation,
}

impl RtlUserProcessInformation {
    fn empty() -> Self {
        Self {
            size: mem::size_of::<Self>() as u32,
            process: ptr::null_mut(),
            thread: ptr::null_mut(),
            client_id: ClientId {
                unique_process: ptr::null_mut(),
                unique_thread: ptr::null_mut(),
            },
            image_information: SectionImageInformation {
                transfer_address: ptr::null_mut(),
                zero_bits: 0,
                maximum_stack_size: 0,
                committed_stack_size: 0,
                sub_system_type: 0,
                sub_system_version: 0,
                gp_value: 0,
                image_characteristics: 0,
                dll_characteristics: 0,
                machine: 0,
                image_contains_code: 0,
                image_flags: 0,
                loader_flags: 0,
                image_file_size: 0,
                check_sum: 0,
            },
        }
    }

    /// The duplicate's ids. Client ids are handle-sized but always fit in 32 bits.
    fn identity(&self) -> ProcessIdentity {
        ProcessIdentity::new(
            self.client_id.unique_process as usize as u32,
            self.client_id.unique_thread as usize as u32,
        )
    }
}

type RtlCloneUserProcessFn = unsafe extern "system" fn(
    process_flags: u32,
    process_security_descriptor: *mut c_void,
    thread_security_descriptor: *mut c_void,
    debug_port: *mut c_void,
    process_information: *mut RtlUserProcessInformation,
) -> i32;

/// Maps a raw clone status onto the continuation this execution must take.
///
/// `identity` is only carried forward for the parent sentinel.
pub fn classify(status: i32, identity: ProcessIdentity) -> CloneOutcome {
    match status {
        RTL_CLONE_PARENT => CloneOutcome::Original(identity),
        RTL_CLONE_CHILD => CloneOutcome::Duplicate,
        other => CloneOutcome::Failed(other),
    }
}

/// [`ProcessCloner`] backed by `RtlCloneUserProcess`.
pub struct NtCloner {
    entry: RtlCloneUserProcessFn,
}

impl NtCloner {
    /// Resolves the clone entry point of the running OS.
    pub fn resolve() -> ForkResult<Self> {
        let entry = resolver::lookup(CLONE_MODULE, CLONE_ENTRY)?;
        // SAFETY: `RtlCloneUserProcess` has had this signature since NT 6.0.
        let entry = unsafe { mem::transmute::<RawEntry, RtlCloneUserProcessFn>(entry) };
        Ok(Self { entry })
    }
}

impl ProcessCloner for NtCloner {
    fn clone_process(&self) -> CloneOutcome {
        let mut info = RtlUserProcessInformation::empty();
        // SAFETY: no security descriptors, no debug port; `info` outlives the call.
        let status = unsafe {
            (self.entry)(
                CLONE_FLAGS,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                &mut info,
            )
        };

        // 复制进程中此时还不能做任何 I/O
        let outcome = classify(status, info.identity());
        if let CloneOutcome::Original(_) = outcome {
            release_returned_handles(&info);
        }
        outcome
    }
}

/// Closes the handles the clone call wrote into `info`. Repair re-opens the
/// duplicate by id.
#[cfg(windows)]
fn release_returned_handles(info: &RtlUserProcessInformation) {
    use windows_sys::Win32::Foundation::CloseHandle;

    for handle in [info.thread, info.process] {
        if !handle.is_null() {
            // SAFETY: both handles were opened for us by the clone call.
            unsafe { CloseHandle(handle) };
        }
    }
}

#[cfg(not(windows))]
fn release_returned_handles(_info: &RtlUserProcessInformation) {}

#[cfg(test)]
pub(crate) fn record_layout() -> (usize, usize) {
    (
        mem::size_of::<RtlUserProcessInformation>(),
        mem::size_of::<SectionImageInformation>(),
    )
}

#[cfg(test)]
pub(crate) fn identity_of(pid: usize, tid: usize) -> ProcessIdentity {
    let mut info = RtlUserProcessInformation::empty();
    info.client_id.unique_process = pid as *mut c_void;
    info.client_id.unique_thread = tid as *mut c_void;
    info.identity()
}
