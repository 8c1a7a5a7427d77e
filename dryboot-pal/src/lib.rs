//! # dryboot-pal
//!
//! Operating-system service bindings for the dryboot shim.
//!
//! The host OS is a closed, ROM-resident kernel; the services the shim
//! consumes - task creation, semaphores, timers, file I/O, the audio device
//! state - are reached through `extern "C"` declarations resolved by the stub
//! table in the firmware link script. None of these symbols exist off-target,
//! so every extern block is gated on `target_arch = "arm"`.
//!
//! The data-layout mirrors ([`task::Task`], [`audio::AudioInfo`]) are plain
//! types and build everywhere; their firmware offsets are asserted on 32-bit
//! targets.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod audio;
pub mod file;
pub mod sem;
pub mod task;
pub mod timer;
pub mod vendor;

pub use file::FileHandle;
pub use sem::Semaphore;
pub use task::{Task, TaskContext, TaskEntry};
