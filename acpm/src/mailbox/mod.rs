//! Mailbox transport -- register access, channel handles and the doorbell
//! controller.
//!
//! ```text
//!   MboxController (trait)
//!     +-- ExynosMbox<R: RegisterIo>   -- doorbell-only Exynos mailbox
//!           |-- MmioRegs              -- volatile MMIO on hardware
//!           +-- any RegisterIo        -- simulated register file in tests
//! ```
//!
//! A channel is a lane multiplexed onto one bit of the interrupt generation
//! register. Handles are only minted by the controller that owns them and
//! are checked against that controller on every use.

pub mod exynos;

use core::ptr;

use crate::error::AcpmResult;

pub use exynos::{ExynosMbox, MboxState};

/// Maximum channels a single mailbox can expose (one per bit of a 16-bit
/// generation register).
pub const MAX_CHANS: usize = 16;

/// Exynos mailbox register offsets.
pub mod regs {
    pub const MCUCTRL: usize = 0x00; // Mailbox Control Register
    pub const INTCR0: usize = 0x24; // Interrupt Clear Register 0
    pub const INTMR0: usize = 0x28; // Interrupt Mask Register 0
    pub const INTSR0: usize = 0x2c; // Interrupt Status Register 0
    pub const INTMSR0: usize = 0x30; // Interrupt Mask Status Register 0
    pub const INTGR1: usize = 0x40; // Interrupt Generation Register 1
    pub const INTMR1: usize = 0x48; // Interrupt Mask Register 1
    pub const INTSR1: usize = 0x4c; // Interrupt Status Register 1
    pub const INTMSR1: usize = 0x50; // Interrupt Mask Status Register 1

    /// Size of the register window.
    pub const SIZE: usize = 0x54;
}

/// 32-bit register access at a byte offset.
pub trait RegisterIo {
    fn read32(&self, offset: usize) -> u32;
    fn write32(&self, offset: usize, value: u32);
}

impl<T: RegisterIo + ?Sized> RegisterIo for &T {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

/// Memory-mapped register window.
///
/// # Safety Invariant
///
/// The `base` address must remain valid and mapped as device memory for the
/// lifetime of this struct. All register accesses use volatile reads/writes
/// to prevent the compiler from reordering or eliding MMIO operations.
#[derive(Debug)]
pub struct MmioRegs {
    base: usize,
}

impl MmioRegs {
    /// # Safety
    ///
    /// `base` must point to a mapped Exynos mailbox register window of at
    /// least [`regs::SIZE`] bytes that stays mapped for the lifetime of the
    /// returned value, and nothing else may drive the same registers.
    pub unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub fn base(&self) -> usize {
        self.base
    }
}

impl RegisterIo for MmioRegs {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        // SAFETY: base + offset lies in the register window guaranteed by new().
        unsafe { ptr::read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        // SAFETY: base + offset lies in the register window guaranteed by new().
        unsafe { ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }
}

/// Devicetree channel types (second cell of a gs101 mailbox specifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MboxChanType {
    Doorbell = 0,
    Data = 1,
}

impl TryFrom<u32> for MboxChanType {
    type Error = crate::error::MboxError;

    fn try_from(ty: u32) -> Result<Self, Self::Error> {
        match ty {
            0 => Ok(Self::Doorbell),
            1 => Ok(Self::Data),
            _ => Err(crate::error::MboxError::InvalidChannelType { ty }),
        }
    }
}

/// Handle to one channel of a mailbox controller.
///
/// Only a controller can create handles. Equality covers both the owning
/// controller and the slot, so a handle from another instance never
/// resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MboxChan {
    mbox_id: u32,
    slot: u16,
}

impl MboxChan {
    pub(crate) const fn new(mbox_id: u32, slot: u16) -> Self {
        Self { mbox_id, slot }
    }

    /// Id of the controller instance that minted this handle.
    pub fn mbox_id(&self) -> u32 {
        self.mbox_id
    }
}

/// Channel operations of a mailbox controller.
pub trait MboxController {
    /// Number of channels in the fixed channel set.
    fn num_chans(&self) -> usize;

    /// Handle for the channel at `index`.
    fn channel(&self, index: usize) -> AcpmResult<MboxChan>;

    /// Notify the remote side that `chan` has a pending command.
    fn send_data(&self, chan: &MboxChan) -> AcpmResult<()>;
}
