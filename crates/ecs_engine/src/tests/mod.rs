//! Scenario tests spanning several modules

pub mod support;
