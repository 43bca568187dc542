// src/config/mod.rs
// Configuration and shared constants

pub mod file;
pub mod ignore;

pub use file::MetacogConfig;
