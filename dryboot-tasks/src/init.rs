//! Replacement Init Task
//!
//! Runs once, as the first task the OS creates - the relocator pointed the
//! init-task slot here. The contract has three parts, in order:
//!
//! 1. Run the vendor init routine, so the debug manager, terminal drivers,
//!    stdio and the C library all come up exactly as the rest of the
//!    firmware expects.
//! 2. Spawn the shim's own tasks through the normal (now hooked) creation
//!    service.
//! 3. Tag the in-RAM version string - cosmetic, order-independent.

use dryboot_common::layout;
use dryboot_pal::task::create_task;
use dryboot_pal::vendor;

use crate::audio::audio_level_task;
use crate::diag::trace_dump_task;
use crate::version::apply_version_tag;

/// Stack size for the spawned shim tasks, in bytes.
const SHIM_TASK_STACK: u32 = 0x1000;

/// Priority for the spawned shim tasks (low; diagnostics yield to firmware).
const SHIM_TASK_PRIO: u32 = 0x1F;

/// First-task body installed by the relocator.
pub extern "C" fn init_task_shim(_arg: usize) {
    // SAFETY: we are the first task, exactly where the factory init task
    // would run; the vendor routine expects this environment and no other
    // task exists yet.
    unsafe { vendor::init_task() };
    log::info!("vendor init complete");

    // SAFETY: names are NUL-terminated; entries outlive the device.
    unsafe {
        create_task(
            b"trace_dump\0".as_ptr(),
            SHIM_TASK_PRIO,
            SHIM_TASK_STACK,
            trace_dump_task,
            0,
        );
        create_task(
            b"audio_level\0".as_ptr(),
            SHIM_TASK_PRIO,
            SHIM_TASK_STACK,
            audio_level_task,
            0,
        );
    }

    // SAFETY: vendor init has run, so the version string is writable.
    unsafe { apply_version_tag(layout::ACTIVE) };
}
