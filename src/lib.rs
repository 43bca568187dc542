// src/lib.rs
// metacog - session bookkeeping and context reconstruction for assistant hooks

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod capability;
pub mod cli;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod git;
pub mod hooks;
pub mod invocation;
pub mod scan;
pub mod state;
pub mod utils;

pub use error::{MetacogError, Result};
