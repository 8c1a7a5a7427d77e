//! Image Relocation and Patching
//!
//! The ROM image cannot be modified, so the shim runs the firmware from a
//! patched copy: a fixed-length window is copied word-by-word into RAM, then
//! a small fixed list of instruction words in the copy is rewritten.
//!
//! # Patch, then publish
//!
//! Patching is two-phase. [`patch_plan`] produces the records, an
//! [`ImageWindow`] applies them all, and only then does the caller perform
//! one cache-coherence operation before any control transfer into the
//! region. Patch application is never interleaved with execution of the
//! code being patched.
//!
//! Addressing note: the window is indexed by *ROM* addresses (the copy keeps
//! the image's internal structure), while branch encodings are computed
//! against the *run* address the patched word will execute at.

use dryboot_arch::instr;
use dryboot_common::{FirmwareLayout, FwAddr};

/// A single rewrite of one 32-bit word in the relocated copy.
pub struct Patch {
    /// ROM address of the word to rewrite.
    pub site: FwAddr,
    /// What to put there.
    pub kind: PatchKind,
}

/// The two forms a patch takes.
pub enum PatchKind {
    /// Poke a literal word: an instruction, a constant, a pointer.
    Word(u32),
    /// Encode a branch-and-link from the site's run address to `dest`.
    Branch { dest: FwAddr },
}

/// Destinations for the redirected call sites and the init-task slot.
///
/// Resolved at boot from real symbol addresses; tests substitute synthetic
/// ones.
pub struct RedirectTargets {
    /// The ROM memory-zeroing routine: the copied relative call no longer
    /// reaches it once the image has moved.
    pub bzero: FwAddr,
    /// The ROM task-creation routine, same situation.
    pub create_init_task: FwAddr,
    /// Entry point to run as the first task instead of the factory one.
    pub init_task: FwAddr,
}

/// Number of words rewritten in the copy.
pub const PATCH_COUNT: usize = 5;

/// The fixed patch list for one firmware build.
pub fn patch_plan(layout: &FirmwareLayout, to: &RedirectTargets) -> [Patch; PATCH_COUNT] {
    [
        // Convert the early-entry routine into one that returns: control
        // comes back to the handshake instead of running the vendor startup.
        Patch {
            site: layout.early_return_site,
            kind: PatchKind::Word(instr::RET_LR),
        },
        // Inflate the heap/BSS reservation so the vendor startup leaves the
        // shim's code and data out of its allocator.
        Patch {
            site: layout.heap_reserve_site,
            kind: PatchKind::Word(layout.heap_reserve_limit),
        },
        // Re-aim the two relative calls that broke when the image moved.
        // Task creation now flows through a path whose init-task slot the
        // shim controls, from the very first task onwards.
        Patch {
            site: layout.bzero_call_site,
            kind: PatchKind::Branch { dest: to.bzero },
        },
        Patch {
            site: layout.create_task_call_site,
            kind: PatchKind::Branch {
                dest: to.create_init_task,
            },
        },
        // Run the replacement init task instead of the factory one.
        Patch {
            site: layout.init_task_slot,
            kind: PatchKind::Word(to.init_task.as_u32()),
        },
    ]
}

/// A writable view over the relocated copy.
///
/// Indexing is by ROM address; `run_base` records where the words actually
/// execute, for branch encoding.
pub struct ImageWindow<'a> {
    rom_base: FwAddr,
    run_base: FwAddr,
    words: &'a mut [u32],
}

impl<'a> ImageWindow<'a> {
    /// Wrap a word buffer holding (or about to hold) the relocated copy.
    #[must_use]
    pub fn new(rom_base: FwAddr, run_base: FwAddr, words: &'a mut [u32]) -> Self {
        Self {
            rom_base,
            run_base,
            words,
        }
    }

    /// Fill the window from the ROM image, whole words at a time.
    pub fn copy_from(&mut self, image: &[u32]) {
        self.words.copy_from_slice(image);
    }

    fn index(&self, addr: FwAddr) -> usize {
        debug_assert!(addr.is_word_aligned());
        (addr.diff(self.rom_base) / 4) as usize
    }

    /// Read the word at a ROM address.
    #[must_use]
    pub fn word(&self, addr: FwAddr) -> u32 {
        self.words[self.index(addr)]
    }

    /// Overwrite the word at a ROM address.
    pub fn poke(&mut self, addr: FwAddr, word: u32) {
        let index = self.index(addr);
        self.words[index] = word;
    }

    /// Address the word at `addr` will execute at.
    #[must_use]
    pub fn run_addr(&self, addr: FwAddr) -> FwAddr {
        FwAddr::new(addr.diff(self.rom_base).wrapping_add(self.run_base.as_u32()))
    }

    /// Apply one patch record.
    pub fn apply(&mut self, patch: &Patch) {
        let word = match patch.kind {
            PatchKind::Word(word) => word,
            PatchKind::Branch { dest } => instr::bl(self.run_addr(patch.site), dest),
        };
        self.poke(patch.site, word);
    }

    /// Apply a full patch list.
    pub fn apply_all(&mut self, patches: &[Patch]) {
        for patch in patches {
            self.apply(patch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A miniature build: 64-word ROM window at 0x8000, run from 0x1000.
    const TEST_LAYOUT: FirmwareLayout = FirmwareLayout {
        rom_base: FwAddr::new(0x8000),
        reloc_base: FwAddr::new(0x1000),
        image_len: 0x100,
        early_entry: FwAddr::new(0x8040),
        early_return_site: FwAddr::new(0x8048),
        cstart: FwAddr::new(0x8010),
        heap_reserve_site: FwAddr::new(0x8020),
        heap_reserve_limit: 0x2000,
        bzero_call_site: FwAddr::new(0x8014),
        create_task_call_site: FwAddr::new(0x8024),
        init_task_slot: FwAddr::new(0x8028),
        hook_slot_create: FwAddr::new(0x334),
        hook_slot_dispatch: FwAddr::new(0x338),
        task_trampoline: FwAddr::new(0x8080),
        sound_dev_task: FwAddr::new(0x80C0),
        version_tag: FwAddr::new(0x500),
        audio_info_ptr: FwAddr::new(0x3E0),
        sound_dev_ptr: FwAddr::new(0x3C4),
        audio_level_reg: FwAddr::new(0xC092_0110),
    };

    const TARGETS: RedirectTargets = RedirectTargets {
        bzero: FwAddr::new(0x9000),
        create_init_task: FwAddr::new(0x9100),
        init_task: FwAddr::new(0x6000),
    };

    fn rom_image() -> [u32; 64] {
        let mut image = [0u32; 64];
        for (i, word) in image.iter_mut().enumerate() {
            *word = 0xE1A0_0000 | i as u32;
        }
        image
    }

    #[test]
    fn test_copy_preserves_every_word() {
        let image = rom_image();
        let mut copy = [0u32; 64];
        let mut window = ImageWindow::new(TEST_LAYOUT.rom_base, TEST_LAYOUT.reloc_base, &mut copy);
        window.copy_from(&image);
        assert_eq!(copy, image);
    }

    #[test]
    fn test_patched_image_matches_expected() {
        let image = rom_image();
        let mut copy = [0u32; 64];
        let mut window = ImageWindow::new(TEST_LAYOUT.rom_base, TEST_LAYOUT.reloc_base, &mut copy);
        window.copy_from(&image);
        window.apply_all(&patch_plan(&TEST_LAYOUT, &TARGETS));

        // Expected image built by hand from the patch list.
        let mut expected = image;
        expected[18] = instr::RET_LR; // 0x8048: early return
        expected[8] = 0x2000; // 0x8020: reserve limit
        expected[5] = 0xEB00_1FF9; // 0x8014: bl 0x9000 from run 0x1014
        expected[9] = 0xEB00_2035; // 0x8024: bl 0x9100 from run 0x1024
        expected[10] = 0x6000; // 0x8028: init task pointer

        assert_eq!(copy, expected);
    }

    #[test]
    fn test_branch_patches_decode_to_targets() {
        let image = rom_image();
        let mut copy = [0u32; 64];
        let mut window = ImageWindow::new(TEST_LAYOUT.rom_base, TEST_LAYOUT.reloc_base, &mut copy);
        window.copy_from(&image);
        window.apply_all(&patch_plan(&TEST_LAYOUT, &TARGETS));

        let bzero_word = window.word(TEST_LAYOUT.bzero_call_site);
        assert!(instr::is_bl(bzero_word));
        assert_eq!(
            instr::bl_target(window.run_addr(TEST_LAYOUT.bzero_call_site), bzero_word),
            TARGETS.bzero
        );

        let create_word = window.word(TEST_LAYOUT.create_task_call_site);
        assert_eq!(
            instr::bl_target(window.run_addr(TEST_LAYOUT.create_task_call_site), create_word),
            TARGETS.create_init_task
        );
    }

    #[test]
    fn test_run_addr_translation() {
        let mut copy = [0u32; 64];
        let window = ImageWindow::new(TEST_LAYOUT.rom_base, TEST_LAYOUT.reloc_base, &mut copy);
        assert_eq!(window.run_addr(FwAddr::new(0x8048)), FwAddr::new(0x1048));
        assert_eq!(
            window.run_addr(TEST_LAYOUT.rom_base),
            TEST_LAYOUT.reloc_base
        );
    }
}
