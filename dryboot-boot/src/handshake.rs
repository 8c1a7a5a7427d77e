//! Bootstrap Handshake
//!
//! The choreography that takes the device from the injection stub to a
//! running, hooked OS. Strictly ordered, runs exactly once, and ends in a
//! transfer that never comes back:
//!
//! 1. Copy and patch the firmware window ([`crate::relocate`]).
//! 2. Publish the patched code to the instruction path
//!    ([`dryboot_arch::cache`]).
//! 3. Call the relocated early-entry routine. Vendor semantics say this call
//!    does not return; it returns *here* because the relocator swapped the
//!    word after its bootstrap work for a return instruction.
//! 4. With the vendor's data segment now live, install the dispatch hooks
//!    and their configuration.
//! 5. Tail-jump into the relocated vendor startup. Nothing returns from
//!    this: if the patched creation path fails to call back into the shim,
//!    the device is inert. No timeout, no recovery - a hang here is the
//!    designed failure mode.

use core::mem;

use dryboot_arch::{cache, cpu};
use dryboot_common::{layout, FirmwareLayout, FwAddr};
use dryboot_hook::dispatch::{self, DispatchConfig};
use dryboot_pal::vendor;

use crate::hooks;
use crate::relocate::{patch_plan, ImageWindow, RedirectTargets};

/// Entry point of the shim, called by the injection stub.
///
/// Expects the shim's own segments in place and no OS state yet.
#[no_mangle]
pub extern "C" fn copy_and_restart() -> ! {
    let layout = layout::ACTIVE;

    dryboot_hook::logging::init();
    log::info!(
        "relocating firmware window {} -> {}",
        layout.rom_base,
        layout.reloc_base
    );

    // SAFETY: pre-scheduler, single-threaded, runs once; the relocation
    // region is reserved for the shim by the build.
    unsafe { relocate_image(layout) };

    // Patched words were produced through the data path; push them out
    // before anything fetches them.
    cache::publish_code();

    // Stage one: call into the relocated image. Returns only because the
    // early-return site was patched to a return instruction.
    // SAFETY: the copy is coherent and complete; the target address is the
    // build's early entry translated into the copy.
    let early_entry: extern "C" fn() =
        unsafe { mem::transmute(layout.relocated(layout.early_entry).as_usize()) };
    early_entry();

    // Handshake postcondition: the vendor routine has copied its data
    // segment, zeroed its BSS, installed the interrupt vectors and handed
    // back. The hook slots now exist and will not be zeroed again.
    dispatch::install(DispatchConfig {
        trampoline: layout.task_trampoline.as_usize(),
        factory_entry: layout.sound_dev_task.as_usize(),
        replacement: dryboot_tasks::audio::sound_dev_task_shim as usize,
    });
    // SAFETY: post-handshake, pre-startup - exactly the window the slot
    // write is valid in.
    unsafe { hooks::install_dispatch_hooks(layout) };
    log::info!("dispatch hooks installed");

    // Stage two: one-way transfer into the relocated vendor startup. Its
    // outbound calls were re-aimed by the patch plan; control never returns.
    // SAFETY: same coherent copy as stage one.
    let cstart: extern "C" fn() =
        unsafe { mem::transmute(layout.relocated(layout.cstart).as_usize()) };
    cstart();

    // Unreachable unless the vendor startup returns, which it never does.
    cpu::halt()
}

/// Copy the ROM window into RAM and apply the patch plan.
///
/// # Safety
///
/// Pre-scheduler only. The ROM window must be readable and the relocation
/// region writable and unused by anything else.
unsafe fn relocate_image(layout: &FirmwareLayout) {
    let words = layout.image_words();
    // SAFETY: both regions are fixed by the build and sized by the layout;
    // they do not overlap.
    let image = unsafe { core::slice::from_raw_parts(layout.rom_base.as_ptr::<u32>(), words) };
    let copy =
        unsafe { core::slice::from_raw_parts_mut(layout.reloc_base.as_mut_ptr::<u32>(), words) };

    let targets = RedirectTargets {
        bzero: FwAddr::new(vendor::bzero32 as usize as u32),
        create_init_task: FwAddr::new(vendor::create_init_task as usize as u32),
        init_task: FwAddr::new(dryboot_tasks::init::init_task_shim as usize as u32),
    };

    let mut window = ImageWindow::new(layout.rom_base, layout.reloc_base, copy);
    window.copy_from(image);
    window.apply_all(&patch_plan(layout, &targets));
}
