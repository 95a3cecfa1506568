//! Shared domain types for the Loopline backend.
//!
//! Everything here is plain data and pure logic with no I/O. The database,
//! AI, worker, and API crates all depend on this one.

pub mod ai;
pub mod error;
pub mod pricing;
pub mod roles;
pub mod types;
