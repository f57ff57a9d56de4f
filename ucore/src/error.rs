/// 复制错误类型
use core::fmt;

use axerrno::LinuxError;

/// A raw OS error code as reported by the last failing OS call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct OsError(pub u32);

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "os error {}", self.0)
    }
}

/// Errors of the duplication routine and its companions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ForkError {
    /// The clone entry point is missing from this OS build.
    ServiceUnavailable,
    /// The clone call returned neither the original nor the duplicate sentinel.
    CloneFailed {
        /// Raw status returned by the clone primitive.
        status: i32,
    },
    /// The duplicate's process or thread could not be opened by id.
    HandleAcquisitionFailed(OsError),
    /// The duplicate's initial thread could not be resumed.
    ResumeFailed(OsError),
    /// `pid` was not produced by a fork of this process.
    NotADuplicate {
        pid: u32,
    },
    /// Waiting for a duplicate to exit failed.
    WaitFailed(OsError),
}

/// Result alias used throughout the fork modules.
pub type ForkResult<T> = Result<T, ForkError>;

impl ForkError {
    /// The negative errno returned across the integer call surface.
    ///
    /// `CloneFailed` maps to `-1` (`-EPERM`).
    pub fn errno(&self) -> i32 {
        -(LinuxError::from(*self) as i32)
    }

    /// The OS error code behind this failure, if the OS reported one.
    pub fn os_error(&self) -> Option<OsError> {
        match self {
            Self::HandleAcquisitionFailed(e) | Self::ResumeFailed(e) | Self::WaitFailed(e) => {
                Some(*e)
            }
            _ => None,
        }
    }
}

impl From<ForkError> for LinuxError {
    fn from(err: ForkError) -> Self {
        match err {
            ForkError::ServiceUnavailable => LinuxError::ENOSYS,
            ForkError::CloneFailed { .. } => LinuxError::EPERM,
            ForkError::HandleAcquisitionFailed(_) | ForkError::ResumeFailed(_) => {
                LinuxError::EAGAIN
            }
            ForkError::NotADuplicate { .. } => LinuxError::ECHILD,
            ForkError::WaitFailed(_) => LinuxError::EINVAL,
        }
    }
}

impl fmt::Display for ForkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceUnavailable => f.write_str("process clone service unavailable"),
            Self::CloneFailed { status } => write!(f, "clone failed with status {:#010x}", status),
            Self::HandleAcquisitionFailed(e) => write!(f, "cannot open duplicate: {}", e),
            Self::ResumeFailed(e) => write!(f, "cannot resume duplicate: {}", e),
            Self::NotADuplicate { pid } => write!(f, "process {} is not a duplicate of this process", pid),
            Self::WaitFailed(e) => write!(f, "wait for duplicate failed: {}", e),
        }
    }
}
