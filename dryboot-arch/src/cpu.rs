//! CPU Control
//!
//! Minimal CPU operations for the boot path. The shim never returns control
//! to anything once it has jumped into the relocated image; the only CPU
//! state it manages directly is the terminal spin when a one-way transfer
//! has nothing left to do.

use core::arch::asm;

/// Halt the CPU (terminal spin loop).
///
/// Reached only past a control transfer that must not return; there is no
/// supervisor to hand back to.
#[inline]
pub fn halt() -> ! {
    loop {
        wait_for_interrupt();
    }
}

/// Put the core into the low-power wait-for-interrupt state.
#[inline]
pub fn wait_for_interrupt() {
    // SAFETY: the 946's WFI is a CP15 operation with no memory operands.
    unsafe {
        asm!(
            "mcr p15, 0, {zero}, c7, c0, 4",
            zero = in(reg) 0u32,
            options(nomem, nostack),
        );
    }
}
