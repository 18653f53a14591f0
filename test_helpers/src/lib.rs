//! Test helpers shared across the workspace.
//!
//! - [`env`] serialises mutations of the process environment, in particular
//!   the POSIX locale variables read by the environment locale context.
//! - [`resources`] lays out message resource files in a temporary directory.

pub mod env;
pub mod resources;
