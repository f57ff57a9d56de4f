/// 进程相关系统调用实现
use axerrno::LinuxError;

use crate::to_errno;

/// `waitpid` option: return immediately if the duplicate is still running.
pub const WNOHANG: i32 = 1;

/// Encodes an exit code the way `WEXITSTATUS` expects it.
pub fn exit_status(code: u32) -> i32 {
    ((code & 0xff) << 8) as i32
}

/// sys_fork - 复制当前进程
///
/// Positive: the duplicate's pid, seen by the original. Zero: seen by the
/// duplicate. Negative: errno.
pub fn sys_fork() -> i32 {
    to_errno(ufork::fork().map(|fork| fork.as_raw()))
}

/// sys_getpid - 当前进程 ID
pub fn sys_getpid() -> i32 {
    to_errno(ufork::current_id().map(|pid| pid as i32))
}

/// sys_getppid - 原进程 ID，仅在复制进程中有效
pub fn sys_getppid() -> i32 {
    match ufork::parent_id() {
        Some(pid) => pid as i32,
        None => -1,
    }
}

/// sys_waitpid - 等待复制进程退出
///
/// Returns `pid` once the duplicate was reaped, or `0` with [`WNOHANG`] while
/// it still runs. `wstatus` receives the encoded exit status.
pub fn sys_waitpid(pid: i32, wstatus: Option<&mut i32>, options: i32) -> i32 {
    if pid <= 0 {
        log::debug!("sys_waitpid: unsupported pid selector {}", pid);
        return -(LinuxError::EINVAL as i32);
    }
    if options & !WNOHANG != 0 {
        log::debug!("sys_waitpid: unsupported options {:#x}", options);
        return -(LinuxError::EINVAL as i32);
    }

    let result = if options & WNOHANG != 0 {
        ufork::try_wait(pid as u32)
    } else {
        ufork::wait(pid as u32).map(Some)
    };

    match result {
        Ok(Some(code)) => {
            if let Some(status) = wstatus {
                *status = exit_status(code);
            }
            pid
        }
        Ok(None) => 0,
        Err(e) => {
            log::warn!("sys_waitpid({}) failed: {}", pid, e);
            e.errno()
        }
    }
}
