//! Library interface behind the `msgsource` binary.
//!
//! `msgsource` builds a composite message source from an `i18n.toml`
//! settings file and a directory of `.properties` resources, then resolves,
//! lists, diagnoses or edits messages.

pub mod cli;
pub mod commands;
pub mod error;
