//! Bookkeeping of duplicates created by this process.
//!
//! The original records every duplicate it resumed together with an open
//! process handle, so the duplicate can be reaped even after it exited. A
//! duplicate starts with a memory copy of the original's registry;
//! [`Registry::adopt_parent`] resets that copy and remembers the original.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use spin::Mutex;
use ucore::{ForkError, ForkResult, HandleServices, ProcessIdentity, RawHandle};

/// A live duplicate and the handle that keeps its process object around.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    identity: ProcessIdentity,
    process: RawHandle,
}

pub struct Registry {
    duplicates: Mutex<BTreeMap<u32, Entry>>,
    /// Original's pid, set only inside a duplicate.
    parent: Mutex<Option<u32>>,
}

/// Registry behind the process-wide `fork()`.
pub static REGISTRY: Registry = Registry::new();

impl Registry {
    pub const fn new() -> Self {
        Self {
            duplicates: Mutex::new(BTreeMap::new()),
            parent: Mutex::new(None),
        }
    }

    /// Records a resumed duplicate. The registry takes ownership of `process`.
    pub fn record(&self, identity: ProcessIdentity, process: RawHandle) {
        trace!("[UFork] recording duplicate {:?}", identity);
        self.duplicates
            .lock()
            .insert(identity.pid, Entry { identity, process });
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.duplicates.lock().contains_key(&pid)
    }

    /// Forgets a duplicate without waiting for it and closes its handle.
    pub fn release<H: HandleServices>(&self, handles: &H, pid: u32) -> Option<ProcessIdentity> {
        let entry = self.duplicates.lock().remove(&pid)?;
        handles.close_handle(entry.process);
        Some(entry.identity)
    }

    /// Live duplicates in ascending pid order.
    pub fn duplicates(&self) -> Vec<ProcessIdentity> {
        self.duplicates
            .lock()
            .values()
            .map(|entry| entry.identity)
            .collect()
    }

    /// The original's pid when called inside a duplicate.
    pub fn parent(&self) -> Option<u32> {
        *self.parent.lock()
    }

    /// Turns the inherited copy into the duplicate's own registry.
    ///
    /// The inherited handles belong to the original and are dropped unclosed.
    pub(crate) fn adopt_parent(&self, original: u32) {
        // Only the cloning thread exists in the duplicate. A lock held by any
        // other thread at clone time would never be released.
        if self.duplicates.is_locked() {
            // SAFETY: no other thread of this process can own the lock.
            unsafe { self.duplicates.force_unlock() };
        }
        if self.parent.is_locked() {
            // SAFETY: as above.
            unsafe { self.parent.force_unlock() };
        }
        self.duplicates.lock().clear();
        *self.parent.lock() = Some(original);
    }

    /// Blocks until the duplicate `pid` exits, then forgets it.
    ///
    /// Returns the duplicate's exit code.
    pub fn wait<H: HandleServices>(&self, handles: &H, pid: u32) -> ForkResult<u32> {
        loop {
            if let Some(code) = self.reap(handles, pid, true)? {
                return Ok(code);
            }
        }
    }

    /// Reaps the duplicate `pid` if it has exited, without blocking.
    ///
    /// Returns `None` while the duplicate is still running.
    pub fn try_wait<H: HandleServices>(&self, handles: &H, pid: u32) -> ForkResult<Option<u32>> {
        self.reap(handles, pid, false)
    }

    fn reap<H: HandleServices>(&self, handles: &H, pid: u32, block: bool) -> ForkResult<Option<u32>> {
        // Taken out for the duration of the wait so that no other waiter can
        // close the handle underneath it.
        let entry = self
            .duplicates
            .lock()
            .remove(&pid)
            .ok_or(ForkError::NotADuplicate { pid })?;

        match handles.wait_for_exit(entry.process, block) {
            Ok(Some(code)) => {
                handles.close_handle(entry.process);
                info!("[UFork] duplicate {} exited with {}", pid, code);
                Ok(Some(code))
            }
            Ok(None) => {
                self.duplicates.lock().insert(pid, entry);
                Ok(None)
            }
            Err(e) => {
                warn!("[UFork] waiting for duplicate {} failed: {}", pid, e);
                self.duplicates.lock().insert(pid, entry);
                Err(ForkError::WaitFailed(e))
            }
        }
    }
}

#[cfg(test)]
impl Registry {
    pub(crate) fn hold_duplicates_lock(&self) -> spin::MutexGuard<'_, BTreeMap<u32, Entry>> {
        self.duplicates.lock()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
