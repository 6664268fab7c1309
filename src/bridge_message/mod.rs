//! Cross-domain bridge message storage and relay correlation.
//!
//! Records messages observed being sent in either direction between L1 and
//! L2, looks them up by hash or by field filter, and correlates each with
//! the event that relayed it on the destination domain. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
