//! Shared test fixtures (used by unit and proptest).

pub mod fixtures;
