#![cfg_attr(not(test), no_std)]

pub mod interface;
pub mod syscall;

use ucore::ForkResult;

/// 系统调用初始化
pub fn init() {
    log::info!("Initializing winfork UAPI...");
}

/// 错误码转换: `Ok` 原样返回，`Err` 转为负的 errno
pub fn to_errno(result: ForkResult<i32>) -> i32 {
    match result {
        Ok(v) => v,
        Err(e) => e.errno(),
    }
}
