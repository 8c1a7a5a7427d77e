//! Shim Logging
//!
//! `log` facade plumbing for a device with no console: messages land in a
//! lock-free ring ([`buffer`]) and stay there until a diagnostic task drains
//! them to a file, or until someone reads them out of a memory dump.

pub mod buffer;
pub mod logger;

pub use logger::init;
