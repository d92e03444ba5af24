//! Transfer record and the synchronous exchange contract.
//!
//! An implementation of [`AcpmTransfer`] must deliver the buffer to the
//! remote core addressed by the channel, block until a response or a
//! transport fault, and overwrite the same buffer with the response words.
//! Transport faults are returned as [`AcpmError`]; they never look like a
//! PMIC return code.
//!
//! Because the buffer doubles as receive storage, two round trips on the
//! same channel must never overlap. [`ChannelLocks`] provides that
//! serialization.

use bitflags::bitflags;
use spin::{Mutex, MutexGuard};

use super::CmdBuffer;
use crate::{
    error::{AcpmError, AcpmResult, MboxError},
    mailbox::MAX_CHANS,
};

bitflags! {
    /// Caller context for a transfer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct XferFlags: u32 {
        /// The caller may wait for a busy channel. Without it a contended
        /// channel fails with `WouldBlock`.
        const MAY_SLEEP = 1 << 0;
    }
}

/// One synchronous round trip on an ACPM channel.
#[derive(Debug)]
pub struct Xfer<'a> {
    pub acpm_chan_id: u32,
    pub cmd: &'a mut CmdBuffer,
    pub flags: XferFlags,
}

impl<'a> Xfer<'a> {
    pub fn new(acpm_chan_id: u32, cmd: &'a mut CmdBuffer) -> Self {
        Self {
            acpm_chan_id,
            cmd,
            flags: XferFlags::MAY_SLEEP,
        }
    }

    pub fn with_flags(mut self, flags: XferFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Synchronous request/response exchange with the remote core.
pub trait AcpmTransfer {
    fn do_xfer(&self, xfer: &mut Xfer<'_>) -> AcpmResult<()>;
}

impl<T: AcpmTransfer + ?Sized> AcpmTransfer for &T {
    fn do_xfer(&self, xfer: &mut Xfer<'_>) -> AcpmResult<()> {
        (**self).do_xfer(xfer)
    }
}

/// Per-channel command window shared with the remote core.
pub trait CmdSram {
    fn write_cmd(&self, index: usize, cmd: &CmdBuffer);
    fn read_cmd(&self, index: usize, cmd: &mut CmdBuffer);
}

impl<T: CmdSram + ?Sized> CmdSram for &T {
    fn write_cmd(&self, index: usize, cmd: &CmdBuffer) {
        (**self).write_cmd(index, cmd)
    }

    fn read_cmd(&self, index: usize, cmd: &mut CmdBuffer) {
        (**self).read_cmd(index, cmd)
    }
}

/// One lock per channel, held for the whole round trip.
pub struct ChannelLocks {
    locks: [Mutex<()>; MAX_CHANS],
}

impl ChannelLocks {
    pub fn new() -> Self {
        Self {
            locks: core::array::from_fn(|_| Mutex::new(())),
        }
    }

    /// Take the lock for channel `index`.
    ///
    /// Spins while the channel is busy if `flags` allows sleeping, otherwise
    /// returns `WouldBlock` immediately.
    pub fn acquire(&self, index: usize, flags: XferFlags) -> AcpmResult<MutexGuard<'_, ()>> {
        let lock = self.locks.get(index).ok_or(MboxError::InvalidChannel {
            index,
            count: MAX_CHANS,
        })?;

        if flags.contains(XferFlags::MAY_SLEEP) {
            Ok(lock.lock())
        } else {
            lock.try_lock().ok_or(AcpmError::WouldBlock { chan: index as u32 })
        }
    }
}

impl Default for ChannelLocks {
    fn default() -> Self {
        Self::new()
    }
}
