//! Adapter implementations of the bridge message ports.

pub mod memory;
pub mod postgres;
