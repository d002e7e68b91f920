//! Hardware cycle counter.
//!
//! x86/x86_64 read the time-stamp counter fenced on both sides so the read
//! cannot drift into the measured region. aarch64 reads the virtual counter,
//! which ticks at a fixed frequency rather than the core clock.

/// Current value of the monotonic cycle counter.
#[inline(always)]
pub fn read_cycles() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        use core::arch::x86_64::{_mm_lfence, _rdtsc};
        // SAFETY: LFENCE and RDTSC are available on every x86_64 CPU.
        unsafe {
            _mm_lfence();
            let tsc = _rdtsc();
            _mm_lfence();
            tsc
        }
    }

    #[cfg(target_arch = "x86")]
    {
        use core::arch::x86::{_mm_lfence, _rdtsc};
        // SAFETY: requires SSE2 for LFENCE, which every target we build for has.
        unsafe {
            _mm_lfence();
            let tsc = _rdtsc();
            _mm_lfence();
            tsc
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        let ticks: u64;
        // SAFETY: CNTVCT_EL0 is readable from EL0; ISB keeps the read in program order.
        unsafe {
            core::arch::asm!("isb", "mrs {}, cntvct_el0", out(reg) ticks, options(nostack));
        }
        ticks
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64")))]
    {
        compile_error!("ipc-bench needs a cycle counter: x86, x86_64 or aarch64");
    }
}

/// Unit name of [`read_cycles`] on this target, for display.
pub const fn unit_name() -> &'static str {
    if cfg!(target_arch = "aarch64") {
        "ticks"
    } else {
        "cycles"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hint::black_box;

    #[test]
    fn test_read_cycles_monotonic() {
        let mut last = read_cycles();
        for _ in 0..1000 {
            let now = read_cycles();
            // Small skew is tolerated in case the thread migrates between cores.
            assert!(
                now >= last || last - now < 1000,
                "counter went backwards: {} -> {}",
                last,
                now
            );
            last = now;
        }
    }

    #[test]
    fn test_counter_advances_over_work() {
        let start = read_cycles();
        let mut acc = 0u64;
        for i in 0..1_000_000u64 {
            acc = black_box(acc.wrapping_add(black_box(i)));
        }
        let end = read_cycles();
        assert!(acc > 0);
        assert!(end > start, "a million black-boxed adds should move the counter");
    }
}
