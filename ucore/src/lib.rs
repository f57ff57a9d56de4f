#![cfg_attr(not(test), no_std)]
//! 进程复制核心抽象
//!
//! Types shared by the clone invoker, the continuation dispatcher and the
//! integer call surface, plus the traits that stand in for the OS services
//! the duplication routine consumes.

pub mod error;
pub mod process;
pub mod services;

pub use error::{ForkError, ForkResult, OsError};
pub use process::{CloneOutcome, ProcessIdentity, RawHandle};
pub use services::{ConsoleServices, HandleServices, ProcessCloner};

#[cfg(test)]
mod tests;
