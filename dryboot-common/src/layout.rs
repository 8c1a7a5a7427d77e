//! Firmware Layout Constant Table
//!
//! Every absolute address the shim touches is specific to one exact firmware
//! build: the offsets were recovered from a disassembly of that image and
//! hold for no other. They are gathered into a single [`FirmwareLayout`]
//! value so that retargeting means replacing the table, not the code.
//!
//! There is deliberately no runtime probing or validation here. If a constant
//! is wrong the device hangs or corrupts memory with no diagnostic; that is
//! the contract of the environment.

use crate::addr::FwAddr;

/// Fixed addresses and sizes for one firmware build.
///
/// Field groups, in boot order:
/// - the ROM window and its relocation target,
/// - the patch sites rewritten inside the relocated copy,
/// - the scheduler hook slots and task-dispatch addresses read after boot,
/// - leaf addresses consumed by the custom tasks.
#[derive(Debug, Clone, Copy)]
pub struct FirmwareLayout {
    /// Base of the vendor ROM image.
    pub rom_base: FwAddr,
    /// Base of the writable region the image is copied to.
    pub reloc_base: FwAddr,
    /// Length in bytes of the copied window. Must be a multiple of 4.
    pub image_len: u32,

    /// Vendor early-entry routine (runs before the C runtime is up).
    pub early_entry: FwAddr,
    /// Instruction just past the early-entry bootstrap work. Patched to a
    /// return so the otherwise non-returning routine hands control back.
    pub early_return_site: FwAddr,
    /// Vendor C-runtime startup routine, entered via the relocated copy.
    pub cstart: FwAddr,

    /// Literal read by `cstart` for the end of its heap/BSS reservation.
    pub heap_reserve_site: FwAddr,
    /// Replacement value: original reservation plus room for the shim.
    pub heap_reserve_limit: u32,
    /// Call site of the memory-zeroing routine inside `cstart`.
    pub bzero_call_site: FwAddr,
    /// Call site of the task-creation routine inside `cstart`.
    pub create_task_call_site: FwAddr,
    /// Slot holding the entry point of the first task `cstart` creates.
    pub init_task_slot: FwAddr,

    /// Hook slot read by the scheduler before task creation.
    pub hook_slot_create: FwAddr,
    /// Hook slot read by the scheduler before task dispatch.
    pub hook_slot_dispatch: FwAddr,
    /// Generic task-entry trampoline: the saved pc of every task that has
    /// been created but never run.
    pub task_trampoline: FwAddr,
    /// Entry point of the factory sound-device task, the one task the
    /// dispatch hook substitutes.
    pub sound_dev_task: FwAddr,

    /// In-RAM version string, rewritable once the OS is up.
    pub version_tag: FwAddr,
    /// Pointer slot holding the audio subsystem state record.
    pub audio_info_ptr: FwAddr,
    /// Pointer slot holding the sound-device state record.
    pub sound_dev_ptr: FwAddr,
    /// Audio level MMIO register.
    pub audio_level_reg: FwAddr,
}

impl FirmwareLayout {
    /// Translate a ROM address into its location in the relocated copy.
    #[inline]
    #[must_use]
    pub const fn relocated(&self, addr: FwAddr) -> FwAddr {
        FwAddr::new(
            addr.as_u32()
                .wrapping_sub(self.rom_base.as_u32())
                .wrapping_add(self.reloc_base.as_u32()),
        )
    }

    /// Check whether an address falls inside the copied ROM window.
    #[inline]
    #[must_use]
    pub const fn contains_rom(&self, addr: FwAddr) -> bool {
        let off = addr.as_u32().wrapping_sub(self.rom_base.as_u32());
        off < self.image_len
    }

    /// Number of 32-bit words in the copied window.
    #[inline]
    #[must_use]
    pub const fn image_words(&self) -> usize {
        (self.image_len / 4) as usize
    }
}

/// Layout for the 5D body, firmware 1.1.1.
///
/// Offsets recovered from the 1.1.1 ROM dump. The early-entry routine lives
/// at `+0x2A98`, `cstart` at `+0x894`; the hook slots and the version tag sit
/// in the RAM data segment that `cstart` initialises.
pub const FW_5D_111: FirmwareLayout = FirmwareLayout {
    rom_base: FwAddr::new(0xFF81_0000),
    reloc_base: FwAddr::new(0x0005_0000),
    // BSS ends at 0x47750; the copy starts at 0x50000 and spans 256 KiB.
    image_len: 0x0004_0000,

    early_entry: FwAddr::new(0xFF81_2A98),
    early_return_site: FwAddr::new(0xFF81_2AE8),
    cstart: FwAddr::new(0xFF81_0894),

    heap_reserve_site: FwAddr::new(0xFF81_093C),
    heap_reserve_limit: 0x0006_0000,
    bzero_call_site: FwAddr::new(0xFF81_08A4),
    create_task_call_site: FwAddr::new(0xFF81_092C),
    init_task_slot: FwAddr::new(0xFF81_0948),

    hook_slot_create: FwAddr::new(0x0000_1934),
    hook_slot_dispatch: FwAddr::new(0x0000_1938),
    task_trampoline: FwAddr::new(0xFF81_1C64),
    sound_dev_task: FwAddr::new(0xFF86_CBA8),

    version_tag: FwAddr::new(0x0001_1F9C),
    audio_info_ptr: FwAddr::new(0x0000_23E0),
    sound_dev_ptr: FwAddr::new(0x0000_23C4),
    audio_level_reg: FwAddr::new(0xC092_0110),
};

/// The build this shim is linked against.
pub const ACTIVE: &FirmwareLayout = &FW_5D_111;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocated_translation() {
        let l = &FW_5D_111;
        assert_eq!(l.relocated(l.rom_base), l.reloc_base);
        assert_eq!(
            l.relocated(FwAddr::new(0xFF81_08A4)),
            FwAddr::new(0x0005_08A4)
        );
    }

    #[test]
    fn test_window_membership() {
        let l = &FW_5D_111;
        assert!(l.contains_rom(l.early_entry));
        assert!(l.contains_rom(l.cstart));
        assert!(l.contains_rom(l.init_task_slot));
        assert!(!l.contains_rom(l.hook_slot_dispatch));
        assert!(!l.contains_rom(FwAddr::new(0xFF85_0000)));
    }

    #[test]
    fn test_patch_sites_inside_window() {
        // Every site the relocator rewrites must be coverable by the copy.
        let l = &FW_5D_111;
        for site in [
            l.early_return_site,
            l.heap_reserve_site,
            l.bzero_call_site,
            l.create_task_call_site,
            l.init_task_slot,
        ] {
            assert!(l.contains_rom(site), "site {site} outside copy window");
            assert!(site.is_word_aligned());
        }
    }

    #[test]
    fn test_image_words() {
        assert_eq!(FW_5D_111.image_words(), 0x1_0000);
    }
}
