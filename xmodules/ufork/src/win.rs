/// Win32 绑定
use windows_sys::Win32::Foundation::{CloseHandle, GetLastError, HANDLE, WAIT_FAILED, WAIT_TIMEOUT};
use windows_sys::Win32::System::Console::{AttachConsole, FreeConsole};
use windows_sys::Win32::System::Threading::{
    GetCurrentProcessId, GetExitCodeProcess, OpenProcess, OpenThread, ResumeThread,
    TerminateProcess, WaitForSingleObject, INFINITE, PROCESS_ALL_ACCESS, THREAD_ALL_ACCESS,
};

use ucore::{ConsoleServices, HandleServices, OsError, RawHandle};

/// Handle services of the running Windows process.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Handles;

/// Console services of the running Windows process.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Console;

fn last_error() -> OsError {
    // SAFETY: reads the calling thread's last-error value.
    OsError(unsafe { GetLastError() })
}

fn to_raw(handle: HANDLE) -> Result<RawHandle, OsError> {
    if handle.is_null() {
        Err(last_error())
    } else {
        Ok(RawHandle(handle as usize))
    }
}

fn to_handle(raw: RawHandle) -> HANDLE {
    raw.0 as HANDLE
}

impl HandleServices for Win32Handles {
    fn current_process_id(&self) -> u32 {
        // SAFETY: no preconditions.
        unsafe { GetCurrentProcessId() }
    }

    fn open_process(&self, pid: u32) -> Result<RawHandle, OsError> {
        // SAFETY: a failed open returns null, handled by `to_raw`.
        to_raw(unsafe { OpenProcess(PROCESS_ALL_ACCESS, 0, pid) })
    }

    fn open_thread(&self, tid: u32) -> Result<RawHandle, OsError> {
        // SAFETY: as above.
        to_raw(unsafe { OpenThread(THREAD_ALL_ACCESS, 0, tid) })
    }

    fn resume_thread(&self, thread: RawHandle) -> Result<(), OsError> {
        // SAFETY: `thread` was opened with THREAD_SUSPEND_RESUME.
        let previous = unsafe { ResumeThread(to_handle(thread)) };
        if previous == u32::MAX {
            return Err(last_error());
        }
        trace!("[UFork] previous suspend count {}", previous);
        Ok(())
    }

    fn terminate_process(&self, process: RawHandle, exit_code: u32) -> Result<(), OsError> {
        // SAFETY: `process` was opened with PROCESS_TERMINATE.
        if unsafe { TerminateProcess(to_handle(process), exit_code) } == 0 {
            return Err(last_error());
        }
        Ok(())
    }

    fn wait_for_exit(&self, process: RawHandle, block: bool) -> Result<Option<u32>, OsError> {
        let handle = to_handle(process);
        let timeout = if block { INFINITE } else { 0 };
        // SAFETY: `process` was opened with SYNCHRONIZE.
        match unsafe { WaitForSingleObject(handle, timeout) } {
            WAIT_FAILED => return Err(last_error()),
            WAIT_TIMEOUT => return Ok(None),
            _ => {}
        }
        let mut code = 0u32;
        // SAFETY: `code` is a valid out pointer.
        if unsafe { GetExitCodeProcess(handle, &mut code) } == 0 {
            return Err(last_error());
        }
        Ok(Some(code))
    }

    fn close_handle(&self, handle: RawHandle) {
        // SAFETY: callers close each handle exactly once.
        if unsafe { CloseHandle(to_handle(handle)) } == 0 {
            warn!("[UFork] CloseHandle({:#x}) failed: {}", handle.0, last_error());
        }
    }
}

impl ConsoleServices for Win32Console {
    fn detach(&self) -> Result<(), OsError> {
        // SAFETY: no preconditions.
        if unsafe { FreeConsole() } == 0 {
            return Err(last_error());
        }
        Ok(())
    }

    fn attach_to(&self, pid: u32) -> Result<(), OsError> {
        // SAFETY: no preconditions.
        if unsafe { AttachConsole(pid) } == 0 {
            return Err(last_error());
        }
        Ok(())
    }
}
