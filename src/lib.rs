//! Bridge store: persistence for L1/L2 cross-domain bridge messages.
//!
//! This crate records messages observed being sent across the bridge in
//! either direction, answers lookups by hash or by field filter, and
//! correlates each message with the event that relayed it on the
//! destination domain.
//!
//! # Architecture
//!
//! The store follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`, memory)
//!
//! # Modules
//!
//! - [`bridge_message`]: Message model, repositories, and services
//! - [`config`]: Connection settings and pool construction

pub mod bridge_message;
pub mod config;
