//! Compile-time constants of the clone service.

use core::ffi::CStr;

/// Module exporting the clone entry point.
pub const CLONE_MODULE: &CStr = c"ntdll.dll";
/// Name of the clone entry point.
pub const CLONE_ENTRY: &CStr = c"RtlCloneUserProcess";

pub const RTL_CLONE_PROCESS_FLAGS_CREATE_SUSPENDED: u32 = 0x0000_0001;
pub const RTL_CLONE_PROCESS_FLAGS_INHERIT_HANDLES: u32 = 0x0000_0002;
pub const RTL_CLONE_PROCESS_FLAGS_NO_SYNCHRONIZE: u32 = 0x0000_0004;

/// The only supported mode: suspended start, inherited handle table.
pub const CLONE_FLAGS: u32 =
    RTL_CLONE_PROCESS_FLAGS_CREATE_SUSPENDED | RTL_CLONE_PROCESS_FLAGS_INHERIT_HANDLES;

/// Status seen by the original.
pub const RTL_CLONE_PARENT: i32 = 0;
/// Status seen by the duplicate (`STATUS_PROCESS_CLONED`).
pub const RTL_CLONE_CHILD: i32 = 297;

/// Exit code given to a suspended duplicate torn down after a failed resume.
pub const ORPHAN_EXIT_CODE: u32 = 1;
