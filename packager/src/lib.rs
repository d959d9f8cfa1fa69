//! RTSS Overlay plugin packager library.
//!
//! This crate turns a plugin project directory into a single distributable
//! zip archive named from the project's manifest. It is used by the
//! `rtss-overlay-package` CLI binary and can be driven programmatically for
//! testing or custom release workflows.
//!
//! # Modules
//!
//! - [`archive`] - Archive backends (external tool and in-process zip)
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Packaging configuration and `packager.toml` overrides
//! - [`error`] - Semantic error types
//! - [`executor`] - External command execution with deadlines
//! - [`manifest`] - Plugin manifest loading and validation
//! - [`naming`] - Archive naming conventions
//! - [`output`] - Output directory preparation and console messages
//! - [`pipeline`] - Packaging pipeline orchestration
//! - [`stager`] - Staging of plugin files into a transient tree

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod stager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
