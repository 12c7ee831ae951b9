//! Library half of `reelshelfctl`: configuration loading, item manifests and
//! the command implementations the binary dispatches to.
#![allow(missing_docs)]

pub mod commands;
pub mod config;
pub mod manifest;
