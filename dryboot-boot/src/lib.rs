//! # dryboot-boot
//!
//! The boot half of the dryboot shim: everything that runs exactly once,
//! before the OS scheduler exists.
//!
//! - [`relocate`]: copy the ROM firmware window into RAM and rewrite the
//!   handful of instruction words that hand control to the shim.
//! - [`hooks`]: aim the scheduler's hook slots at the dispatch interceptor.
//! - [`handshake`]: the control-transfer choreography tying it together -
//!   jump into the patched image, regain control, install hooks, leave for
//!   good.
//!
//! # Boot Requirements
//!
//! [`handshake::copy_and_restart`] expects to be entered by the injection
//! stub with the shim's own data segment already in place, interrupts
//! masked, and no OS state existing yet. The sequence is strictly ordered
//! and non-reentrant; there is no second boot attempt and no recovery from a
//! hang.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate std;

pub mod hooks;
pub mod relocate;

#[cfg(target_arch = "arm")]
pub mod handshake;

/// Terminal panic behaviour for the firmware link: there is nothing to
/// unwind into and no surface to report on.
#[cfg(all(target_arch = "arm", not(test)))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    dryboot_arch::cpu::halt()
}
