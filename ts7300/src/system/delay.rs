//! Busy-wait timing helpers for strobe and datasheet delays.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "arm")] {
        /// Spin for roughly `ns` nanoseconds.
        ///
        /// Loop count assumes ~5 iterations per nanosecond on the EP93xx
        /// core. Not calibrated; treat the duration as a lower bound.
        #[inline]
        pub fn delay_ns(ns: u32) {
            let mut count = ns.saturating_mul(5);
            while count != 0 {
                unsafe { core::arch::asm!("nop") };
                count -= 1;
            }
        }
    } else {
        use std::time::{Duration, Instant};

        /// Spin for roughly `ns` nanoseconds.
        ///
        /// Host fallback driven by the monotonic clock, so builds and tests
        /// off the board behave sensibly.
        #[inline]
        pub fn delay_ns(ns: u32) {
            let deadline = Instant::now() + Duration::from_nanos(u64::from(ns));
            while Instant::now() < deadline {
                std::hint::spin_loop();
            }
        }
    }
}

/// Sleep for at least `us` microseconds.
pub fn delay_us(us: u32) {
    std::thread::sleep(std::time::Duration::from_micros(u64::from(us)));
}
