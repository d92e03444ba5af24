//! Memory barrier used around mailbox exchanges.
//!
//! The command window is ordinary memory shared with the remote core while
//! the doorbell is a device register, so the stores that fill the window must
//! be globally visible before the doorbell write, and the completion bit must
//! be observed before the response words are read.

/// Full memory fence -- all reads and writes issued before this barrier are
/// globally visible before any reads or writes issued after it.
///
/// * **x86_64**: `core::sync::atomic::fence(SeqCst)` -- MFENCE semantics.
/// * **AArch64**: `dsb sy` -- Data Synchronization Barrier (full system).
/// * **RISC-V**: `fence rw, rw` -- read/write ordering fence.
#[inline(always)]
pub fn memory_fence() {
    #[cfg(target_arch = "aarch64")]
    {
        // SAFETY: `dsb sy` is a data synchronization barrier that ensures all
        // preceding memory accesses are complete before subsequent ones begin.
        // No side effects beyond ordering.
        unsafe {
            core::arch::asm!("dsb sy", options(nostack, preserves_flags));
        }
    }

    #[cfg(target_arch = "riscv64")]
    {
        // SAFETY: `fence rw, rw` ensures all prior reads and writes are ordered
        // before subsequent reads and writes. Standard RISC-V fence instruction.
        unsafe {
            core::arch::asm!("fence rw, rw", options(nostack, preserves_flags));
        }
    }

    #[cfg(not(any(target_arch = "aarch64", target_arch = "riscv64")))]
    {
        core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
    }
}
