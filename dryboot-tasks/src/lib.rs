//! # dryboot-tasks
//!
//! Custom tasks running under the hooked OS scheduler.
//!
//! - [`init`]: the replacement first task - runs the vendor bring-up, then
//!   spawns the tasks below.
//! - [`diag`]: dumps the dispatch trace and the log ring to a file.
//! - [`audio`]: the audio-level observer and the replacement sound-device
//!   task the dispatch hook substitutes in.
//! - [`version`]: the cosmetic version-tag rewrite.
//!
//! Unlike the dispatch hook, these are ordinary tasks: they may sleep, block
//! on semaphores and write files. Their ordering is whatever the OS priority
//! scheduler provides. Task bodies call OS services and exist only on the
//! target; the pure helpers build everywhere.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate std;

pub mod version;

#[cfg(target_arch = "arm")]
pub mod audio;
#[cfg(target_arch = "arm")]
pub mod diag;
#[cfg(target_arch = "arm")]
pub mod init;
