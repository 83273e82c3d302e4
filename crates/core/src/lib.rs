//! Goldwallet Core - wallet configuration and blockchain sync policy.
//!
//! This crate holds the persisted wallet settings and the policy that decides
//! when a blockchain sync runs. The host platform plugs in through the
//! [`sync::JobScheduler`], [`sync::DeviceProbe`], [`sync::BlockchainSync`]
//! and [`power::PowerManager`] traits.

pub mod bootstrap;
pub mod constants;
pub mod errors;
pub mod power;
pub mod settings;
pub mod sync;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
