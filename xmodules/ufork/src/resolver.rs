//! Runtime lookup of the clone entry point.
//!
//! The entry point is not a linkable symbol, so it is located in the already
//! loaded module by name. A missing module and a missing export both surface
//! as [`ForkError::ServiceUnavailable`].

use core::ffi::CStr;

use ucore::{ForkError, ForkResult};

/// Address of an exported routine, before it is cast to its real signature.
pub type RawEntry = unsafe extern "system" fn() -> isize;

/// Looks up `symbol` in the loaded module `module`.
#[cfg(windows)]
pub fn lookup(module: &CStr, symbol: &CStr) -> ForkResult<RawEntry> {
    use windows_sys::Win32::System::LibraryLoader::{GetModuleHandleA, GetProcAddress};

    // SAFETY: `module` is NUL-terminated. No reference count is taken.
    let handle = unsafe { GetModuleHandleA(module.as_ptr().cast()) };
    if handle.is_null() {
        warn!("[UFork] module {:?} is not loaded", module);
        return Err(ForkError::ServiceUnavailable);
    }

    // SAFETY: `handle` is a loaded module and `symbol` is NUL-terminated.
    let entry = unsafe { GetProcAddress(handle, symbol.as_ptr().cast()) };
    match entry {
        Some(entry) => {
            debug!("[UFork] resolved {:?}!{:?}", module, symbol);
            Ok(entry)
        }
        None => {
            warn!("[UFork] {:?} does not export {:?}", module, symbol);
            Err(ForkError::ServiceUnavailable)
        }
    }
}

/// Looks up `symbol` in the loaded module `module`.
///
/// No module on this platform exports the NT clone primitive.
#[cfg(not(windows))]
pub fn lookup(module: &CStr, symbol: &CStr) -> ForkResult<RawEntry> {
    debug!("[UFork] {:?}!{:?} is not available on this platform", module, symbol);
    Err(ForkError::ServiceUnavailable)
}
