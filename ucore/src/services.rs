//! OS services consumed by the duplication routine.
//!
//! Each trait names one external collaborator. The Win32 bindings live in
//! `ufork::win`; tests supply recording doubles.

use crate::error::OsError;
use crate::process::{CloneOutcome, RawHandle};

/// A mechanism that duplicates the calling process.
///
/// `clone_process` returns twice: once in the original and once in the
/// duplicate, each time with the outcome that execution context must follow.
pub trait ProcessCloner {
    fn clone_process(&self) -> CloneOutcome;
}

/// Process and thread handle services.
///
/// Handles returned in `Ok` are never null and stay owned by the caller until
/// passed to [`HandleServices::close_handle`].
pub trait HandleServices {
    /// ID of the calling process.
    fn current_process_id(&self) -> u32;

    /// Opens a process by id with full access.
    fn open_process(&self, pid: u32) -> Result<RawHandle, OsError>;

    /// Opens a thread by id with full access.
    fn open_thread(&self, tid: u32) -> Result<RawHandle, OsError>;

    /// Decrements the suspend count of `thread`.
    fn resume_thread(&self, thread: RawHandle) -> Result<(), OsError>;

    fn terminate_process(&self, process: RawHandle, exit_code: u32) -> Result<(), OsError>;

    /// Returns the exit code of `process` once it has exited.
    ///
    /// With `block` set, waits for the exit. Otherwise returns `Ok(None)`
    /// while the process is still running.
    fn wait_for_exit(&self, process: RawHandle, block: bool) -> Result<Option<u32>, OsError>;

    fn close_handle(&self, handle: RawHandle);
}

/// Console session services.
pub trait ConsoleServices {
    /// Detaches the calling process from its console.
    ///
    /// Post: no console is attached.
    fn detach(&self) -> Result<(), OsError>;

    /// Attaches the calling process to the console owned by `pid`.
    ///
    /// Pre: no console is attached.
    fn attach_to(&self, pid: u32) -> Result<(), OsError>;
}

impl<T: ProcessCloner + ?Sized> ProcessCloner for &T {
    fn clone_process(&self) -> CloneOutcome {
        (**self).clone_process()
    }
}

impl<T: HandleServices + ?Sized> HandleServices for &T {
    fn current_process_id(&self) -> u32 {
        (**self).current_process_id()
    }

    fn open_process(&self, pid: u32) -> Result<RawHandle, OsError> {
        (**self).open_process(pid)
    }

    fn open_thread(&self, tid: u32) -> Result<RawHandle, OsError> {
        (**self).open_thread(tid)
    }

    fn resume_thread(&self, thread: RawHandle) -> Result<(), OsError> {
        (**self).resume_thread(thread)
    }

    fn terminate_process(&self, process: RawHandle, exit_code: u32) -> Result<(), OsError> {
        (**self).terminate_process(process, exit_code)
    }

    fn wait_for_exit(&self, process: RawHandle, block: bool) -> Result<Option<u32>, OsError> {
        (**self).wait_for_exit(process, block)
    }

    fn close_handle(&self, handle: RawHandle) {
        (**self).close_handle(handle)
    }
}

impl<T: ConsoleServices + ?Sized> ConsoleServices for &T {
    fn detach(&self) -> Result<(), OsError> {
        (**self).detach()
    }

    fn attach_to(&self, pid: u32) -> Result<(), OsError> {
        (**self).attach_to(pid)
    }
}
