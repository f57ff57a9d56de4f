//! fork() emulation for Windows.
//!
//! The calling process is duplicated with the NT clone primitive
//! (`RtlCloneUserProcess`), which returns once in the original and once in
//! the duplicate. The routine runs in four steps:
//!
//! - [`resolver`] locates the clone entry point at runtime.
//! - [`invoker`] issues the clone call with a suspended start and inherited
//!   handles.
//! - [`dispatch`] branches on the outcome.
//! - state repair resumes the duplicate in the original and reattaches the
//!   console in the duplicate.
//!
//! On other platforms the resolver reports the service as unavailable and
//! [`fork`] fails without creating a process.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
extern crate log;

pub mod config;
pub mod dispatch;
pub mod invoker;
pub mod registry;
pub mod resolver;
mod repair;

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod win;
        pub use win::{Win32Console, Win32Handles};
    }
}

pub use dispatch::{Fork, Forker};
pub use invoker::NtCloner;
pub use registry::{Registry, REGISTRY};
pub use ucore::{ForkError, ForkResult, ProcessIdentity};

/// Initialize the fork module.
pub fn init() {
    info!("[UFork] Initializing process duplication...");
    match resolver::lookup(config::CLONE_MODULE, config::CLONE_ENTRY) {
        Ok(_) => info!("[UFork] clone service available"),
        Err(_) => warn!("[UFork] clone service unavailable, fork() will fail with ENOSYS"),
    }
}

/// Duplicates the calling process.
///
/// Returns [`Fork::Original`] in the caller and [`Fork::Duplicate`] in the
/// new process.
#[cfg(windows)]
pub fn fork() -> ForkResult<Fork> {
    let cloner = NtCloner::resolve()?;
    Forker::new(cloner, Win32Handles, Win32Console).fork()
}

/// Duplicates the calling process.
///
/// Always fails: this platform has no clone primitive.
#[cfg(not(windows))]
pub fn fork() -> ForkResult<Fork> {
    // 解析总是失败，不会创建任何进程
    NtCloner::resolve()?;
    Err(ForkError::ServiceUnavailable)
}

/// Blocks until the duplicate `pid` exits and returns its exit code.
#[cfg(windows)]
pub fn wait(pid: u32) -> ForkResult<u32> {
    REGISTRY.wait(&Win32Handles, pid)
}

/// Blocks until the duplicate `pid` exits and returns its exit code.
#[cfg(not(windows))]
pub fn wait(pid: u32) -> ForkResult<u32> {
    // 此平台上不会产生复制进程
    Err(ForkError::NotADuplicate { pid })
}

/// Reaps the duplicate `pid` if it has exited. `None` while it still runs.
#[cfg(windows)]
pub fn try_wait(pid: u32) -> ForkResult<Option<u32>> {
    REGISTRY.try_wait(&Win32Handles, pid)
}

/// Reaps the duplicate `pid` if it has exited. `None` while it still runs.
#[cfg(not(windows))]
pub fn try_wait(pid: u32) -> ForkResult<Option<u32>> {
    Err(ForkError::NotADuplicate { pid })
}

/// ID of the calling process.
#[cfg(windows)]
pub fn current_id() -> ForkResult<u32> {
    use ucore::HandleServices;

    Ok(Win32Handles.current_process_id())
}

/// ID of the calling process.
///
/// Fails with [`ForkError::ServiceUnavailable`] like every other process
/// service on this platform.
#[cfg(not(windows))]
pub fn current_id() -> ForkResult<u32> {
    Err(ForkError::ServiceUnavailable)
}

/// The original's pid if the calling process is a duplicate.
pub fn parent_id() -> Option<u32> {
    REGISTRY.parent()
}
