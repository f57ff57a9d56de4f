//! winfork 演示程序
//!
//! Forks once, prints from both processes and has the original wait for the
//! duplicate.

use log::{error, info};
use uapi::syscall::{sys_fork, sys_getppid, sys_waitpid};

const DUPLICATE_EXIT_CODE: i32 = 7;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting winfork demo...");

    ufork::init();
    uapi::init();

    let pid = sys_fork();
    if pid > 0 {
        println!("[original {}] forked duplicate {}", std::process::id(), pid);
        let mut status = 0;
        let reaped = sys_waitpid(pid, Some(&mut status), 0);
        if reaped < 0 {
            error!("waitpid({}) failed: {}", pid, reaped);
            std::process::exit(1);
        }
        println!(
            "[original {}] duplicate {} exited with {}",
            std::process::id(),
            pid,
            (status >> 8) & 0xff
        );
    } else if pid == 0 {
        println!(
            "[duplicate {}] original is {}",
            std::process::id(),
            sys_getppid()
        );
        std::process::exit(DUPLICATE_EXIT_CODE);
    } else {
        error!("fork failed: {}", pid);
        std::process::exit(1);
    }
}
