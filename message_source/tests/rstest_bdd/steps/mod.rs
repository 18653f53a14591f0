//! Step modules registered with `rstest-bdd`.

pub mod reload_steps;
pub mod resolution_steps;
