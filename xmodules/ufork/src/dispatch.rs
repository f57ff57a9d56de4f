//! Continuation dispatcher.
//!
//! One call to [`Forker::fork`] returns in two processes. The clone outcome
//! picks exactly one path per process:
//!
//! - `Original`: resume the duplicate, return its identity.
//! - `Duplicate`: fix up inherited state, return [`Fork::Duplicate`].
//! - `Failed`: return [`ForkError::CloneFailed`].

use ucore::{
    CloneOutcome, ConsoleServices, ForkError, ForkResult, HandleServices, ProcessCloner,
    ProcessIdentity,
};

use crate::registry::{Registry, REGISTRY};
use crate::repair;

/// The continuation observed by the caller of [`Forker::fork`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Fork {
    /// The caller is the original; the duplicate is running.
    Original { duplicate: ProcessIdentity },
    /// The caller is the duplicate.
    Duplicate,
}

impl Fork {
    /// The value `fork()` returns: the duplicate's pid, or zero.
    pub fn as_raw(&self) -> i32 {
        match self {
            Self::Original { duplicate } => duplicate.pid as i32,
            Self::Duplicate => 0,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

/// Duplicates the calling process through a [`ProcessCloner`] and repairs
/// the state the clone leaves behind.
pub struct Forker<'r, C, H, K> {
    cloner: C,
    handles: H,
    console: K,
    registry: &'r Registry,
}

impl<C, H, K> Forker<'static, C, H, K>
where
    C: ProcessCloner,
    H: HandleServices,
    K: ConsoleServices,
{
    /// A forker recording into the process-wide [`REGISTRY`].
    pub fn new(cloner: C, handles: H, console: K) -> Self {
        Self::with_registry(cloner, handles, console, &REGISTRY)
    }
}

impl<'r, C, H, K> Forker<'r, C, H, K>
where
    C: ProcessCloner,
    H: HandleServices,
    K: ConsoleServices,
{
    pub fn with_registry(cloner: C, handles: H, console: K, registry: &'r Registry) -> Self {
        Self {
            cloner,
            handles,
            console,
            registry,
        }
    }

    /// Duplicates the calling process.
    pub fn fork(&self) -> ForkResult<Fork> {
        // Captured before cloning: afterwards the duplicate cannot tell its own
        // id from the original's.
        let original = self.handles.current_process_id();

        match self.cloner.clone_process() {
            CloneOutcome::Original(duplicate) => {
                trace!("[UFork] {} cloned into {:?}", original, duplicate);
                let process = repair::resume_duplicate(&self.handles, duplicate)?;
                self.registry.record(duplicate, process);
                info!("[UFork] forked duplicate {}", duplicate.pid);
                Ok(Fork::Original { duplicate })
            }
            CloneOutcome::Duplicate => {
                self.registry.adopt_parent(original);
                repair::reattach_console(&self.console, original);
                debug!("[UFork] running as duplicate of {}", original);
                Ok(Fork::Duplicate)
            }
            CloneOutcome::Failed(status) => {
                error!("[UFork] clone returned unrecognised status {:#010x}", status);
                Err(ForkError::CloneFailed { status })
            }
        }
    }

    /// Waits for a duplicate created through this forker's registry.
    pub fn wait(&self, pid: u32) -> ForkResult<u32> {
        self.registry.wait(&self.handles, pid)
    }

    /// Reaps a duplicate if it has exited, without blocking.
    pub fn try_wait(&self, pid: u32) -> ForkResult<Option<u32>> {
        self.registry.try_wait(&self.handles, pid)
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }
}
