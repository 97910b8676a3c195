//! CLI module for HDVR

pub mod commands;
pub mod format;

pub use commands::*;
pub use format::*;
