//! 用户态 C 接口绑定层
//!
//! Exposes the process calls under their POSIX names. Only exported on
//! Windows, where the C runtime has no symbols of its own by these names.

#[cfg(windows)]
use crate::syscall;

#[cfg(windows)]
#[no_mangle]
pub extern "C" fn fork() -> i32 {
    syscall::sys_fork()
}

#[cfg(windows)]
#[no_mangle]
pub extern "C" fn getppid() -> i32 {
    syscall::sys_getppid()
}

/// # Safety
///
/// `wstatus` must be null or point to writable memory for an `i32`.
#[cfg(windows)]
#[no_mangle]
pub unsafe extern "C" fn waitpid(pid: i32, wstatus: *mut i32, options: i32) -> i32 {
    // SAFETY: guaranteed by the caller.
    syscall::sys_waitpid(pid, unsafe { wstatus.as_mut() }, options)
}
