//! Audio Tasks
//!
//! Two task bodies built on the hooked services:
//!
//! - [`sound_dev_task_shim`] replaces the factory sound-device task. The
//!   dispatch hook rewrites the descriptor's entry point before the task's
//!   first run, so the OS trampoline lands here instead of in ROM.
//! - [`audio_level_task`] is a metering loop spawned by the replacement init
//!   task: it configures the audio path on its first pass, then samples the
//!   level register, pacing itself with the interval semaphore and the
//!   one-shot timer.
//!
//! Semaphore-wait failures in both loops are deliberately not escalated -
//! the loops proceed regardless of the wait outcome. That reduced
//! reliability is an accepted property of the diagnostic path, not an
//! oversight.

use core::mem::size_of;
use core::ptr;

use dryboot_common::layout;
use dryboot_pal::audio::{
    audio_interval_unlock, audio_read_level, audio_set_alc_off, audio_set_alc_on,
    audio_set_filter_off, audio_set_sampling_param, audio_set_volume_in, audio_set_windcut,
    audio_start_asif_observer, audio_state, sound_dev_state, AudioInfo, SoundDevice,
};
use dryboot_pal::file::{fio_close_file, fio_create_file, fio_write_file};
use dryboot_pal::sem::{create_named_semaphore, give_semaphore, take_semaphore};
use dryboot_pal::timer::{msleep, oneshot_timer};

/// Sampling parameters for the metering path: 44.1 kHz, 16-bit, mono.
const SAMPLE_RATE: u32 = 0xAC44;
const SAMPLE_WIDTH: u32 = 0x10;
const SAMPLE_CHANNELS: u32 = 1;

/// Initial gain after the configuration pass, in dB.
const INITIAL_GAIN_DB: i32 = -39;

/// Interval-timer delay between metering passes, in ticks.
const METER_INTERVAL: u32 = 0x200;

/// Replacement sound-device task.
///
/// Dumps the device state record once for inspection, creates the wakeup
/// semaphore the firmware expects, then parks in a loop that keeps automatic
/// level control off.
pub extern "C" fn sound_dev_task_shim(_arg: usize) {
    let layout = layout::ACTIVE;
    // SAFETY: we run in place of the factory task, after vendor init, so the
    // device record is live.
    let dev = unsafe { sound_dev_state(layout) };

    log::info!("sound device task replaced");

    // SAFETY: path is NUL-terminated; handle checked before use.
    let file = unsafe { fio_create_file(b"A:/SNDDEV.LOG\0".as_ptr()) };
    if file.is_valid() {
        // SAFETY: `dev` points at a live record of the declared size.
        unsafe {
            fio_write_file(file, dev.cast(), size_of::<SoundDevice>() as u32);
            fio_close_file(file);
        }
    }

    // SAFETY: the record is ours to arm; the OS signals this semaphore.
    unsafe {
        (*dev).sem = create_named_semaphore(ptr::null(), 0);
    }

    loop {
        // Wait outcome ignored; pacing comes from the sleep either way.
        // SAFETY: ordinary task context, record stays live forever.
        unsafe {
            let _ = take_semaphore((*dev).sem, 0);
            msleep(100);
            audio_set_alc_off();
        }
    }
}

/// Audio-level metering task.
pub extern "C" fn audio_level_task(_arg: usize) {
    let layout = layout::ACTIVE;
    // SAFETY: spawned by the init task after vendor init; the record is live.
    let info = unsafe { audio_state(layout) };

    loop {
        // Wait failures deliberately not escalated; the metering loop
        // carries on regardless of the outcome.
        // SAFETY: ordinary task context.
        unsafe {
            let _ = take_semaphore((*info).sem_interval, 0);
            let _ = take_semaphore((*info).sem_task, 0);
        }

        // SAFETY: `info` stays live for the device lifetime; we hold
        // sem_task around the state mutation.
        unsafe {
            if (*info).initialized == 0 {
                configure_audio_path(info);
            }

            if (*info).asif_started == 0 {
                audio_start_asif_observer();
                (*info).asif_started = 1;
            }

            let level = audio_read_level(layout);
            log::trace!("audio level {level:#x}");

            give_semaphore((*info).sem_task);

            // The interval callback releases sem_interval and wakes the next
            // pass.
            oneshot_timer(
                METER_INTERVAL,
                audio_interval_unlock,
                audio_interval_unlock,
                0,
            );
        }
    }
}

/// One-time audio path configuration, run on the first metering pass.
///
/// # Safety
///
/// `info` must point at the live audio state record, with `sem_task` held.
unsafe fn configure_audio_path(info: *mut AudioInfo) {
    // SAFETY: per the function contract.
    unsafe {
        audio_set_filter_off();

        if (*info).input_source == 1 && (*info).input_pending == 0 {
            audio_set_alc_off();
        }
        (*info).input_source = (*info).input_pending;

        audio_set_windcut((*info).windcut_mode);
        audio_set_sampling_param(SAMPLE_RATE, SAMPLE_WIDTH, SAMPLE_CHANNELS);
        audio_set_volume_in((*info).input_source as u32, (*info).input_volume as u32);

        if (*info).input_source == 1 {
            audio_set_alc_on();
        }

        (*info).initialized = 1;
        (*info).gain = INITIAL_GAIN_DB;
        (*info).sample_count = 0;
    }
}
