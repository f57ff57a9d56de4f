//! UAPI 整数约定测试

use ucore::{ForkError, OsError};
use uapi::syscall::{exit_status, sys_getppid, sys_waitpid, WNOHANG};
use uapi::to_errno;

#[test]
fn test_to_errno() {
    assert_eq!(to_errno(Ok(2048)), 2048);
    assert_eq!(to_errno(Ok(0)), 0);
    assert_eq!(to_errno(Err(ForkError::ServiceUnavailable)), -38);
    assert_eq!(to_errno(Err(ForkError::CloneFailed { status: 5 })), -1);
    assert_eq!(
        to_errno(Err(ForkError::HandleAcquisitionFailed(OsError(5)))),
        -11
    );
}

#[test]
#[cfg(not(windows))]
fn test_fork_without_clone_service() {
    use uapi::syscall::{sys_fork, sys_getpid};

    assert_eq!(sys_fork(), -38);
    assert_eq!(sys_getpid(), -38);
    // 没有创建任何复制进程
    assert_eq!(sys_waitpid(2048, None, 0), -10);
    assert_eq!(sys_waitpid(2048, None, WNOHANG), -10);
}

#[test]
#[cfg(windows)]
fn test_getpid_matches_process() {
    use uapi::syscall::sys_getpid;

    assert_eq!(sys_getpid(), std::process::id() as i32);
}

#[test]
fn test_exit_status_encoding() {
    // WEXITSTATUS(status) == (status >> 8) & 0xff
    assert_eq!(exit_status(7), 0x700);
    assert_eq!((exit_status(7) >> 8) & 0xff, 7);
    assert_eq!(exit_status(0), 0);
    assert_eq!(exit_status(0x1ff), 0xff00);
    // 低 7 位为 0 表示正常退出
    assert_eq!(exit_status(3) & 0x7f, 0);
}

#[test]
fn test_getppid_outside_duplicate() {
    assert_eq!(sys_getppid(), -1);
}

#[test]
fn test_waitpid_rejects_selectors() {
    let mut status = 0;
    assert_eq!(sys_waitpid(0, Some(&mut status), 0), -22);
    assert_eq!(sys_waitpid(-1, Some(&mut status), 0), -22);
    assert_eq!(status, 0);
}

#[test]
fn test_waitpid_rejects_unknown_options() {
    let mut status = 0;
    // WUNTRACED / WCONTINUED 不支持
    assert_eq!(sys_waitpid(2048, Some(&mut status), 2), -22);
    assert_eq!(sys_waitpid(2048, Some(&mut status), 8 | WNOHANG), -22);
    assert_eq!(status, 0);
}

#[test]
fn test_waitpid_unknown_pid() {
    let mut status = 0;
    assert_eq!(sys_waitpid(4242, Some(&mut status), 0), -10);
    assert_eq!(sys_waitpid(4242, Some(&mut status), WNOHANG), -10);
    assert_eq!(status, 0);
}
