//! Behavioural tests for `message_source` driven by `rstest-bdd`.
//!
//! Step implementations live under [`steps`]; [`scenarios`] binds the
//! `.feature` files in `tests/features` to the shared fixtures.

mod fixtures;
mod scenarios;
mod steps;
