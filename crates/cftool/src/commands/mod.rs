//! Command implementations for the `cftool` binary.
//!
//! Each command returns whether it succeeded; `main` turns that into the
//! exit status.

pub mod check;
pub mod convert;
pub mod list_tags;
pub mod update_stack;
pub mod validate;
