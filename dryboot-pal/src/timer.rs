//! Sleep and One-Shot Timers
//!
//! The OS offers a millisecond sleep for tasks and a one-shot timer that
//! fires a callback after a tick delay. A callback may reschedule itself
//! from its own body; that is how the audio observer paces its sampling
//! without ever blocking in the dispatch path.

/// Callback signature for one-shot timers.
pub type TimerCallback = unsafe extern "C" fn(usize);

#[cfg(target_arch = "arm")]
extern "C" {
    /// Sleep the calling task for `ms` milliseconds.
    pub fn msleep(ms: u32);

    /// Arm a one-shot timer.
    ///
    /// After `delay` ticks the OS invokes `cbr(arg)`; `overrun_cbr` is called
    /// instead if the timer service missed its slot.
    pub fn oneshot_timer(delay: u32, cbr: TimerCallback, overrun_cbr: TimerCallback, arg: usize)
        -> u32;
}
