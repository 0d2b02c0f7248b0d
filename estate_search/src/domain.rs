//! The search domain: request/response models, the ports it needs, and
//! the engine service built on top of them.

pub mod models;
pub mod ports;
pub mod services;
