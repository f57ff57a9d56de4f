//! 进程标识与复制结果

/// Identifiers of a freshly cloned process and its single initial thread.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct ProcessIdentity {
    /// Process ID of the duplicate.
    pub pid: u32,
    /// Thread ID of the duplicate's initial thread.
    pub tid: u32,
}

impl ProcessIdentity {
    pub const fn new(pid: u32, tid: u32) -> Self {
        Self { pid, tid }
    }
}

/// What the clone primitive reported to the execution context observing it.
///
/// A single clone call returns once in the original and once in the
/// duplicate; each of them sees exactly one of these variants.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CloneOutcome {
    /// This execution is the original. The duplicate is suspended.
    Original(ProcessIdentity),
    /// This execution is the duplicate.
    Duplicate,
    /// The primitive returned a status that is neither sentinel.
    Failed(i32),
}

/// An opaque kernel object reference, meaningful only inside the process
/// that opened it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct RawHandle(pub usize);

impl RawHandle {
    pub const NULL: Self = Self(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}
