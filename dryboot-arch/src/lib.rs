//! # dryboot-arch
//!
//! ARMv5 architecture support for the dryboot shim.
//!
//! Provides the low-level pieces the boot path needs:
//! - [`instr`]: instruction-word encodings (branch-and-link, return)
//! - [`cache`]: data/instruction cache maintenance for self-modified code
//! - [`cpu`]: CPU control (halt, wait-for-interrupt)
//!
//! The target core is an ARM946E-S: no cache coherence between the data and
//! instruction paths, so any code produced through the data side must be
//! pushed out with [`cache`] operations before it is executed.
//!
//! # Safety
//!
//! The [`cache`] and [`cpu`] modules contain inline assembly and only build
//! for the ARM target. All unsafe operations carry `// SAFETY:` comments
//! explaining the invariants that must be maintained.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate std;

pub mod instr;

#[cfg(target_arch = "arm")]
pub mod cache;
#[cfg(target_arch = "arm")]
pub mod cpu;
