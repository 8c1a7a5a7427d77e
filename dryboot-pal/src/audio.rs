//! Audio Subsystem State
//!
//! The audio path keeps two process-wide records in OS memory: the audio
//! configuration/metering state and the sound-device state. Both are owned by
//! the firmware and reached through pointer slots at fixed addresses; the
//! shim's audio tasks read and mutate them in place.
//!
//! The field layout below is a structural assumption about this firmware
//! build, like [`Task`](crate::task::Task). Fields the shim never touches are
//! carried only to keep the touched ones at their firmware offsets.

#[cfg(target_arch = "arm")]
use dryboot_common::FirmwareLayout;

use crate::sem::Semaphore;

/// Audio configuration and metering state.
#[repr(C)]
pub struct AudioInfo {
    /// Selected input source.
    pub input_source: u8, // 0x00
    /// Pending input source, applied on the next configuration pass.
    pub input_pending: u8, // 0x01
    /// Input volume for the selected source.
    pub input_volume: u8, // 0x02
    pub _pad: u8, // 0x03
    /// Non-zero once the configuration pass has run.
    pub initialized: u32, // 0x04
    /// Non-zero once the ASIF observer has been started.
    pub asif_started: u32, // 0x08
    /// Current gain in dB.
    pub gain: i32, // 0x0C
    /// Samples seen since the last reset.
    pub sample_count: u32, // 0x10
    /// Loudest sample seen since the last reset.
    pub max_sample: u32, // 0x14
    /// Wind-cut filter mode.
    pub windcut_mode: u32, // 0x18
    /// Signalled by the interval timer to pace the metering loop.
    pub sem_interval: Semaphore, // 0x1C
    /// Guards the metering state while a pass is running.
    pub sem_task: Semaphore, // 0x20
}

/// Sound-device state.
#[repr(C)]
pub struct SoundDevice {
    /// Device mode word, owned by the firmware.
    pub mode: u32, // 0x00
    /// Wakeup semaphore, created by the device task on first run.
    pub sem: Semaphore, // 0x04
}

#[cfg(target_arch = "arm")]
extern "C" {
    /// Disable the input filter chain.
    pub fn audio_set_filter_off();
    /// Disable automatic level control.
    pub fn audio_set_alc_off();
    /// Enable automatic level control.
    pub fn audio_set_alc_on();
    /// Select the wind-cut filter mode.
    pub fn audio_set_windcut(mode: u32);
    /// Configure sampling rate, sample width and channel count.
    pub fn audio_set_sampling_param(rate: u32, width: u32, channels: u32);
    /// Set the input volume for a source.
    pub fn audio_set_volume_in(source: u32, volume: u32);
    /// Start the ASIF level observer.
    pub fn audio_start_asif_observer();
    /// Timer callback that releases the metering interval semaphore.
    pub fn audio_interval_unlock(arg: usize);
}

/// Read the audio state record pointer for this build.
///
/// # Safety
///
/// Target only; `layout.audio_info_ptr` must hold a live record pointer,
/// which is true once the vendor init routine has run.
#[cfg(target_arch = "arm")]
#[inline]
#[must_use]
pub unsafe fn audio_state(layout: &FirmwareLayout) -> *mut AudioInfo {
    // SAFETY: the slot address is fixed by the build; the caller guarantees
    // the record behind it is initialised.
    unsafe { layout.audio_info_ptr.as_ptr::<*mut AudioInfo>().read_volatile() }
}

/// Read the sound-device record pointer for this build.
///
/// # Safety
///
/// Target only; same liveness requirement as [`audio_state`].
#[cfg(target_arch = "arm")]
#[inline]
#[must_use]
pub unsafe fn sound_dev_state(layout: &FirmwareLayout) -> *mut SoundDevice {
    // SAFETY: as for `audio_state`.
    unsafe { layout.sound_dev_ptr.as_ptr::<*mut SoundDevice>().read_volatile() }
}

/// Read the current audio level from the metering register.
///
/// # Safety
///
/// Target only; the register address is fixed by the build.
#[cfg(target_arch = "arm")]
#[inline]
#[must_use]
pub unsafe fn audio_read_level(layout: &FirmwareLayout) -> u32 {
    // SAFETY: MMIO read of a device register that is always mapped.
    unsafe { layout.audio_level_reg.as_ptr::<u32>().read_volatile() }
}
