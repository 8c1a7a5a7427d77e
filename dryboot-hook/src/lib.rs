//! # dryboot-hook
//!
//! The resident half of the dryboot shim: code that keeps running after the
//! boot handshake is over.
//!
//! - [`dispatch`]: the hook the scheduler invokes on every task dispatch;
//!   identifies fresh task starts, substitutes the sound-device task, traces.
//! - [`trace`]: the fixed-capacity circular record buffer the hook appends to.
//! - [`logging`]: `log` facade backed by a lock-free ring; there is no
//!   console on this device, so entries are drained to a file by a
//!   diagnostic task or recovered from a memory dump.
//!
//! Everything in the dispatch path is bounded and non-blocking: it runs
//! inside the scheduler itself, where waiting on anything would deadlock the
//! device.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate std;

pub mod dispatch;
pub mod logging;
pub mod trace;

pub use dispatch::{task_dispatch_hook, DispatchConfig};
pub use trace::TraceBuffer;
