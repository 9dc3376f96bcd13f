//! Karaokify CLI library
//!
//! Command implementations behind the `karaokify` binary.

pub mod commands;
