//! Millisecond clock sources.
//!
//! Single (non-bulk) PMIC requests carry a timestamp in their last command
//! word. Any monotonic or wall clock works; the remote core only uses it for
//! diagnostics.

/// Source of a millisecond timestamp.
pub trait MillisClock {
    /// Milliseconds since an arbitrary epoch.
    fn now_ms(&self) -> u64;

    /// Timestamp truncated to the 32 bits that fit in a command word.
    #[inline]
    fn stamp(&self) -> u32 {
        self.now_ms() as u32
    }
}

impl<F> MillisClock for F
where
    F: Fn() -> u64,
{
    #[inline]
    fn now_ms(&self) -> u64 {
        self()
    }
}

/// AArch64 generic timer (`CNTVCT_EL0` scaled by `CNTFRQ_EL0`).
#[cfg(target_arch = "aarch64")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericTimer;

#[cfg(target_arch = "aarch64")]
impl GenericTimer {
    #[inline]
    fn current_ticks() -> u64 {
        let cnt: u64;
        // SAFETY: Reading CNTVCT_EL0 (virtual timer count) is a non-privileged
        // AArch64 operation with no side effects.
        unsafe {
            core::arch::asm!("mrs {}, CNTVCT_EL0", out(reg) cnt);
        }
        cnt
    }

    #[inline]
    fn ticks_per_second() -> u64 {
        let freq: u64;
        // SAFETY: Reading CNTFRQ_EL0 returns the system counter frequency.
        // Read-only, no side effects.
        unsafe {
            core::arch::asm!("mrs {}, CNTFRQ_EL0", out(reg) freq);
        }
        freq
    }
}

#[cfg(target_arch = "aarch64")]
impl MillisClock for GenericTimer {
    fn now_ms(&self) -> u64 {
        let freq = Self::ticks_per_second();
        if freq == 0 {
            // Firmware left CNTFRQ_EL0 unprogrammed.
            return 0;
        }
        ((Self::current_ticks() as u128 * 1000) / freq as u128) as u64
    }
}
