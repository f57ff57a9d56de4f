use axerrno::LinuxError;

use crate::*;

#[test]
fn test_errno_contract() {
    assert_eq!(ForkError::ServiceUnavailable.errno(), -38);
    assert_eq!(ForkError::CloneFailed { status: 0xC000_0017_u32 as i32 }.errno(), -1);
    assert_eq!(ForkError::HandleAcquisitionFailed(OsError(5)).errno(), -11);
    assert_eq!(ForkError::ResumeFailed(OsError(6)).errno(), -11);
    assert_eq!(ForkError::NotADuplicate { pid: 42 }.errno(), -10);
    assert_eq!(ForkError::WaitFailed(OsError(6)).errno(), -22);

    // 所有错误都必须是负值
    assert!(ForkError::ServiceUnavailable.errno() < 0);
}

#[test]
fn test_linux_error_mapping() {
    assert_eq!(LinuxError::from(ForkError::ServiceUnavailable), LinuxError::ENOSYS);
    assert_eq!(
        LinuxError::from(ForkError::NotADuplicate { pid: 1 }),
        LinuxError::ECHILD
    );
}

#[test]
fn test_os_error_is_carried() {
    let err = ForkError::HandleAcquisitionFailed(OsError(87));
    assert_eq!(err.os_error(), Some(OsError(87)));
    assert_eq!(ForkError::ServiceUnavailable.os_error(), None);
    assert_eq!(ForkError::CloneFailed { status: -1 }.os_error(), None);
}

#[test]
fn test_display() {
    assert_eq!(
        ForkError::ServiceUnavailable.to_string(),
        "process clone service unavailable"
    );
    assert_eq!(
        ForkError::ResumeFailed(OsError(5)).to_string(),
        "cannot resume duplicate: os error 5"
    );
    assert_eq!(
        ForkError::CloneFailed { status: 1 }.to_string(),
        "clone failed with status 0x00000001"
    );
}

#[test]
fn test_raw_handle() {
    assert!(RawHandle::NULL.is_null());
    assert!(!RawHandle(0x44).is_null());
    assert_eq!(ProcessIdentity::new(2048, 4096).pid, 2048);
}
