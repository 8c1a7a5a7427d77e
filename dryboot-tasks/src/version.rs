//! Version Tag
//!
//! The firmware keeps its version string in RAM once started; appending a
//! shim marker there is the cheapest way to see, from any menu or memory
//! dump, that the shim actually took over the boot. Leaf-level and
//! order-independent - the only requirement is that the vendor init has made
//! the region writable and stable first.

#[cfg(target_arch = "arm")]
use dryboot_common::FirmwareLayout;

/// Marker written over the tail of the version string.
pub const VERSION_TAG: &[u8] = b"-dryboot";

/// Copy the tag into `dest`, truncating if it does not fit.
///
/// Returns the number of bytes written.
pub fn write_version_tag(dest: &mut [u8]) -> usize {
    let n = dest.len().min(VERSION_TAG.len());
    dest[..n].copy_from_slice(&VERSION_TAG[..n]);
    n
}

/// Rewrite the in-RAM version string of this build.
///
/// # Safety
///
/// Target only; the vendor init routine must have run so the string region
/// is writable and stable.
#[cfg(target_arch = "arm")]
pub unsafe fn apply_version_tag(layout: &FirmwareLayout) {
    // SAFETY: fixed in-RAM address per the build; writable per the caller
    // contract.
    let dest = unsafe {
        core::slice::from_raw_parts_mut(layout.version_tag.as_mut_ptr::<u8>(), VERSION_TAG.len())
    };
    write_version_tag(dest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_written_in_full() {
        let mut dest = [b' '; 16];
        let n = write_version_tag(&mut dest);
        assert_eq!(n, VERSION_TAG.len());
        assert_eq!(&dest[..n], VERSION_TAG);
        assert_eq!(dest[n], b' ');
    }

    #[test]
    fn test_tag_truncated_to_destination() {
        let mut dest = [0u8; 3];
        let n = write_version_tag(&mut dest);
        assert_eq!(n, 3);
        assert_eq!(&dest[..], &VERSION_TAG[..3]);
    }
}
