//! Small stateless helpers shared by the gateway crates.

pub mod uuid;
