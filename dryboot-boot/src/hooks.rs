//! Hook Slot Installation
//!
//! The scheduler reads two fixed RAM slots as function pointers before its
//! task-creation and task-dispatch logic. Installation is a one-shot,
//! idempotent pair of raw writes; the slots carry no type information, so no
//! validation is possible.
//!
//! Ordering is a hard invariant, not a preference: the slots live inside the
//! data segment the vendor early-init routine zeroes during the bootstrap
//! handshake. Writing them any earlier means the vendor wipes them again.

#[cfg(target_arch = "arm")]
use dryboot_common::FirmwareLayout;

/// Write the hook address into both scheduler slots.
///
/// # Safety
///
/// Both pointers must be valid, initialised slot locations, and the OS must
/// not be dispatching yet.
pub unsafe fn write_hook_slots(create_slot: *mut u32, dispatch_slot: *mut u32, hook: u32) {
    // SAFETY: per the caller contract; volatile because the OS reads these
    // words outside anything the compiler can see.
    unsafe {
        create_slot.write_volatile(hook);
        dispatch_slot.write_volatile(hook);
    }
}

/// Install the dispatch interceptor in both hook slots of this build.
///
/// # Safety
///
/// Must run after the bootstrap handshake has returned (the slot region is
/// initialised) and before the tail jump into the vendor startup.
#[cfg(target_arch = "arm")]
pub unsafe fn install_dispatch_hooks(layout: &FirmwareLayout) {
    let hook = dryboot_hook::dispatch::task_dispatch_hook as usize as u32;
    // SAFETY: slot addresses are fixed by the build; timing per the caller
    // contract.
    unsafe {
        write_hook_slots(
            layout.hook_slot_create.as_mut_ptr(),
            layout.hook_slot_dispatch.as_mut_ptr(),
            hook,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_slots_written() {
        let mut create_slot = 0u32;
        let mut dispatch_slot = 0u32;
        // SAFETY: both pointers come from live locals.
        unsafe {
            write_hook_slots(&mut create_slot, &mut dispatch_slot, 0x0006_1000);
        }
        assert_eq!(create_slot, 0x0006_1000);
        assert_eq!(dispatch_slot, 0x0006_1000);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let mut create_slot = 0u32;
        let mut dispatch_slot = 0u32;
        // SAFETY: both pointers come from live locals.
        unsafe {
            write_hook_slots(&mut create_slot, &mut dispatch_slot, 0x0006_1000);
            write_hook_slots(&mut create_slot, &mut dispatch_slot, 0x0006_1000);
        }
        assert_eq!(create_slot, 0x0006_1000);
        assert_eq!(dispatch_slot, 0x0006_1000);
    }
}
