//! Step definitions for relay correlation scenarios.

mod then;
mod when;
pub mod world;
