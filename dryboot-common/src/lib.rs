//! # dryboot-common
//!
//! Shared types for the dryboot firmware shim.
//!
//! The shim runs inside a single, exact firmware build. Everything the other
//! crates need to know about that build - where the ROM image sits, where the
//! relocated copy goes, which instructions get patched, where the scheduler's
//! hook slots live - is collected here in one constant table,
//! [`FirmwareLayout`], so that supporting a different build means swapping one
//! table rather than hunting through logic.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod addr;
pub mod layout;

pub use addr::FwAddr;
pub use layout::{FirmwareLayout, ACTIVE, FW_5D_111};
