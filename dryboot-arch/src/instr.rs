//! ARM Instruction Encodings
//!
//! The relocator rewrites individual 32-bit instruction words inside the
//! relocated firmware copy. Two encodings are needed: a plain return, and a
//! branch-and-link computed from the addresses involved.
//!
//! # Displacement contract
//!
//! A BL instruction carries a signed 24-bit word displacement relative to the
//! instruction's own address plus 8 (the ARM pipeline offset), reaching
//! +/-32 MiB. [`bl`] performs no range check: every call site in this shim is
//! a fixed constant pair known to be in range, and the environment offers no
//! channel to report a violation anyway. An out-of-range pair silently
//! truncates - correctness here is a build-time obligation, not a runtime one.

use dryboot_common::FwAddr;

/// `mov pc, lr` - return to caller.
pub const RET_LR: u32 = 0xE1A0_F00E;

/// Opcode bits of an always-executed branch-and-link.
pub const BL_OPCODE: u32 = 0xEB00_0000;

/// Maximum magnitude of a BL displacement in bytes.
pub const BL_RANGE: u32 = 0x0200_0000;

/// Encode a branch-and-link placed at `source` that transfers to `dest`.
///
/// `source` is the address the instruction will *execute* at. For a word
/// inside the relocated copy that is the relocated address, not the ROM
/// address the word was copied from.
#[inline]
#[must_use]
pub const fn bl(source: FwAddr, dest: FwAddr) -> u32 {
    let offset = dest
        .as_u32()
        .wrapping_sub(source.as_u32())
        .wrapping_sub(8);
    BL_OPCODE | ((offset >> 2) & 0x00FF_FFFF)
}

/// Decode the destination of a branch-and-link located at `source`.
///
/// Inverse of [`bl`]; used to verify encodings.
#[inline]
#[must_use]
pub const fn bl_target(source: FwAddr, word: u32) -> FwAddr {
    // Sign-extend the 24-bit immediate, then rescale words to bytes.
    let offset = (((word & 0x00FF_FFFF) << 8) as i32) >> 6;
    FwAddr::new(
        source
            .as_u32()
            .wrapping_add(8)
            .wrapping_add(offset as u32),
    )
}

/// Check whether a word is a branch-and-link encoding.
#[inline]
#[must_use]
pub const fn is_bl(word: u32) -> bool {
    word & 0xFF00_0000 == BL_OPCODE
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bl_golden_forward() {
        // Small forward branch, worked out by hand:
        // offset = 0x200 - 0x100 - 8 = 0xF8 bytes = 0x3E words.
        let word = bl(FwAddr::new(0x100), FwAddr::new(0x200));
        assert_eq!(word, 0xEB00_003E);
    }

    #[test]
    fn test_bl_golden_ram_to_rom() {
        // The shape the relocator produces: a call site executing in the RAM
        // copy, branching back up into ROM.
        let source = FwAddr::new(0x0005_08A4);
        let dest = FwAddr::new(0xFF81_0CA4);
        let word = bl(source, dest);
        assert_eq!(word, 0xEBDF_00FE);
        assert!(is_bl(word));
        assert_eq!(bl_target(source, word), dest);
    }

    #[test]
    fn test_ret_is_not_bl() {
        assert!(!is_bl(RET_LR));
    }

    proptest! {
        #[test]
        fn test_bl_round_trip(
            source in (0u32..0x3FFF_FFF0).prop_map(|a| a & !3),
            words in -(1i32 << 23)..(1i32 << 23),
        ) {
            let source = FwAddr::new(source);
            let dest = FwAddr::new(
                source.as_u32()
                    .wrapping_add(8)
                    .wrapping_add((words << 2) as u32),
            );
            let word = bl(source, dest);
            prop_assert!(is_bl(word));
            prop_assert_eq!(bl_target(source, word), dest);
        }
    }
}
