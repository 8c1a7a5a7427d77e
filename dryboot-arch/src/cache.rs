//! ARM946 Cache Maintenance
//!
//! The relocator writes instruction words through the data path; the CPU
//! fetches them through the instruction path. On the ARM946E-S those paths
//! are not coherent, so every patched region must be cleaned out of the data
//! cache and the instruction cache invalidated before control transfers into
//! it. Skipping this is a correctness bug, not a performance one: the core
//! would execute whatever stale words the I-cache still holds.
//!
//! # Implementation
//!
//! The 946 has no clean-by-range fast path worth using at boot; the data
//! cache is walked by set/way with `c7, c14, 2` (clean and invalidate
//! D-line). The instruction cache is invalidated wholesale with `c7, c5, 0`,
//! and the write buffer drained with `c7, c10, 4`.

use core::arch::asm;

/// Data cache geometry: 4 ways x 256 sets for the 8 KiB cache.
const DCACHE_WAYS: u32 = 4;
const DCACHE_SETS: u32 = 256;

/// Clean and invalidate the entire data cache.
///
/// Walks every set/way index so all dirty lines reach memory.
pub fn clean_dcache() {
    for way in 0..DCACHE_WAYS {
        for set in 0..DCACHE_SETS {
            let index = (way << 30) | (set << 5);
            // SAFETY: clean+invalidate by set/way has no memory operands and
            // is always permitted in a privileged mode.
            unsafe {
                asm!(
                    "mcr p15, 0, {idx}, c7, c14, 2",
                    idx = in(reg) index,
                    options(nostack),
                );
            }
        }
    }
    drain_write_buffer();
}

/// Invalidate the entire instruction cache.
pub fn invalidate_icache() {
    // SAFETY: I-cache invalidate has no memory operands; stale entries are
    // refetched from memory afterwards.
    unsafe {
        asm!(
            "mcr p15, 0, {zero}, c7, c5, 0",
            zero = in(reg) 0u32,
            options(nostack),
        );
    }
}

/// Drain the write buffer so all prior stores are visible to fetches.
pub fn drain_write_buffer() {
    // SAFETY: drain-write-buffer stalls until prior stores complete; no
    // memory operands.
    unsafe {
        asm!(
            "mcr p15, 0, {zero}, c7, c10, 4",
            zero = in(reg) 0u32,
            options(nostack),
        );
    }
}

/// Publish self-modified code: clean data side, drop instruction side.
///
/// Call after the last patch is applied and before any jump into the patched
/// region.
pub fn publish_code() {
    clean_dcache();
    invalidate_icache();
    drain_write_buffer();
}
