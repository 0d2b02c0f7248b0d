#![deny(missing_docs)]
//! The listing discovery engine, laid out following the hexagonal
//! architecture pattern: the domain owns the search policy, the outbound
//! adapters own the storage details.

pub mod domain;
pub mod outbound;
