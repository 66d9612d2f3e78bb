//! Command-line host

pub mod commands;
