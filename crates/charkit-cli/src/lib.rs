//! CharKit CLI library.
//!
//! This crate provides the command implementations behind the `charkit`
//! binary: document loading, the per-subcommand entry points, and the
//! plaintext TCP link session used to hand control back and forth with a
//! companion tool.

pub mod commands;
pub mod input;
pub mod link;
pub mod reporting;
