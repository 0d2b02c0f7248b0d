//! Concrete adapters for the domain ports.

#[cfg(feature = "mock")]
pub mod mock;
pub mod postgres;
