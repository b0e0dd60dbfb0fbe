//! # cftool
//!
//! Command-line front end for converting short-form intrinsic function tags
//! in deployment templates, validating templates offline or through the
//! API, and updating stacks.

pub mod commands;
pub mod config;
pub mod remote;
pub mod report;
pub mod utils;
