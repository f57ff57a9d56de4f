/// 复制后的进程状态修复
use core::mem;

use ucore::{ConsoleServices, ForkError, ForkResult, HandleServices, ProcessIdentity, RawHandle};

use crate::config::ORPHAN_EXIT_CODE;

/// A handle closed when the scope that opened it ends.
struct ScopedHandle<'a, H: HandleServices> {
    services: &'a H,
    raw: RawHandle,
}

impl<'a, H: HandleServices> ScopedHandle<'a, H> {
    fn new(services: &'a H, raw: RawHandle) -> Self {
        Self { services, raw }
    }

    fn raw(&self) -> RawHandle {
        self.raw
    }
}

impl<H: HandleServices> Drop for ScopedHandle<'_, H> {
    fn drop(&mut self) {
        self.services.close_handle(self.raw);
    }
}

/// Owns the duplicate's process handle. Terminates the suspended duplicate
/// and closes the handle unless [`OrphanGuard::commit`] is called.
struct OrphanGuard<'a, H: HandleServices> {
    services: &'a H,
    process: RawHandle,
    pid: u32,
}

impl<'a, H: HandleServices> OrphanGuard<'a, H> {
    fn new(services: &'a H, process: RawHandle, pid: u32) -> Self {
        Self {
            services,
            process,
            pid,
        }
    }

    /// Hands the process handle over to the caller.
    fn commit(self) -> RawHandle {
        let process = self.process;
        mem::forget(self);
        process
    }
}

impl<H: HandleServices> Drop for OrphanGuard<'_, H> {
    fn drop(&mut self) {
        warn!("[UFork] tearing down orphaned duplicate {}", self.pid);
        if let Err(e) = self
            .services
            .terminate_process(self.process, ORPHAN_EXIT_CODE)
        {
            error!("[UFork] duplicate {} could not be terminated: {}", self.pid, e);
        }
        self.services.close_handle(self.process);
    }
}

/// Original path: opens the suspended duplicate by id and releases its
/// initial thread.
///
/// Returns the duplicate's process handle, which stays open so the duplicate
/// can be waited for after it exits. Every other handle opened here is closed
/// before returning. If the thread cannot be opened or resumed the duplicate
/// is terminated instead of leaked.
pub(crate) fn resume_duplicate<H: HandleServices>(
    handles: &H,
    identity: ProcessIdentity,
) -> ForkResult<RawHandle> {
    let process = handles.open_process(identity.pid).map_err(|e| {
        // 没有进程句柄就无法终止它
        error!(
            "[UFork] cannot open duplicate process {}: {}, it stays suspended",
            identity.pid, e
        );
        ForkError::HandleAcquisitionFailed(e)
    })?;
    let guard = OrphanGuard::new(handles, process, identity.pid);

    let thread = handles.open_thread(identity.tid).map_err(|e| {
        error!("[UFork] cannot open duplicate thread {}: {}", identity.tid, e);
        ForkError::HandleAcquisitionFailed(e)
    })?;
    let thread = ScopedHandle::new(handles, thread);

    handles.resume_thread(thread.raw()).map_err(|e| {
        error!("[UFork] cannot resume duplicate thread {}: {}", identity.tid, e);
        ForkError::ResumeFailed(e)
    })?;

    debug!("[UFork] duplicate {} resumed", identity.pid);
    Ok(guard.commit())
}

/// Duplicate path: moves the standard streams onto the original's console.
///
/// Must run before any other I/O in the duplicate. Failures are logged only:
/// the duplicate exists either way and still has to observe zero.
pub(crate) fn reattach_console<K: ConsoleServices>(console: &K, original: u32) {
    if !cfg!(feature = "console-fixup") {
        return;
    }
    let detached = console.detach();
    let attached = console.attach_to(original);

    if let Err(e) = detached {
        warn!("[UFork] detaching inherited console failed: {}", e);
    }
    if let Err(e) = attached {
        warn!("[UFork] attaching to console of {} failed: {}", original, e);
    }
}
