//! Command implementations behind the `healthscope` binary.
pub mod commands;
