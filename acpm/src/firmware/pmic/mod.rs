//! PMIC register access through ACPM.
//!
//! Two error layers stay separate: a failed round trip is an
//! `Err(AcpmError)` and no PMIC status exists for it, while a round trip
//! that completed returns `Ok` with the remote [`PmicStatus`], which may
//! itself report a firmware error.

pub mod codec;

use log::trace;

pub use codec::{PmicFunc, PmicStatus, PmicTarget, MAX_BULK};

use super::{
    xfer::{AcpmTransfer, Xfer, XferFlags},
    CmdBuffer,
};
use crate::{
    error::{AcpmError, AcpmResult},
    timer::MillisClock,
};

/// Result of a single register read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmicRead {
    pub status: PmicStatus,
    /// Value reported by the remote core; present even when `status` is an
    /// error.
    pub value: u8,
}

/// PMIC operations offered by the ACPM firmware.
pub trait PmicOps {
    fn read_reg(&self, acpm_chan_id: u32, target: PmicTarget) -> AcpmResult<PmicRead>;

    /// Read `buf.len()` consecutive registers. `buf` is only written when the
    /// remote reports success.
    fn bulk_read(
        &self,
        acpm_chan_id: u32,
        target: PmicTarget,
        buf: &mut [u8],
    ) -> AcpmResult<PmicStatus>;

    fn write_reg(&self, acpm_chan_id: u32, target: PmicTarget, value: u8)
        -> AcpmResult<PmicStatus>;

    fn bulk_write(
        &self,
        acpm_chan_id: u32,
        target: PmicTarget,
        data: &[u8],
    ) -> AcpmResult<PmicStatus>;

    /// `reg = (reg & !mask) | (value & mask)`, done by the remote core.
    fn update_reg(
        &self,
        acpm_chan_id: u32,
        target: PmicTarget,
        value: u8,
        mask: u8,
    ) -> AcpmResult<PmicStatus>;
}

/// PMIC client over an ACPM transfer and a millisecond clock.
pub struct AcpmPmic<T: AcpmTransfer, C: MillisClock> {
    xfer: T,
    clock: C,
    flags: XferFlags,
}

impl<T: AcpmTransfer, C: MillisClock> AcpmPmic<T, C> {
    pub fn new(xfer: T, clock: C) -> Self {
        Self {
            xfer,
            clock,
            flags: XferFlags::MAY_SLEEP,
        }
    }

    /// Use `flags` for every transfer, e.g. an empty set from atomic context.
    pub fn with_flags(mut self, flags: XferFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn transfer(&self) -> &T {
        &self.xfer
    }

    fn exchange(&self, acpm_chan_id: u32, cmd: &mut CmdBuffer) -> AcpmResult<()> {
        let mut xfer = Xfer::new(acpm_chan_id, cmd).with_flags(self.flags);
        self.xfer.do_xfer(&mut xfer)
    }
}

fn check_target(target: PmicTarget) -> AcpmResult<()> {
    if target.pmic_type > codec::MAX_NIBBLE {
        return Err(AcpmError::InvalidArgument {
            name: "pmic_type",
            value: "wider than 4 bits",
        });
    }
    if target.chan > codec::MAX_NIBBLE {
        return Err(AcpmError::InvalidArgument {
            name: "chan",
            value: "wider than 4 bits",
        });
    }
    Ok(())
}

fn check_bulk_len(len: usize) -> AcpmResult<u8> {
    match len {
        1..=MAX_BULK => Ok(len as u8),
        0 => Err(AcpmError::InvalidArgument {
            name: "count",
            value: "empty bulk transfer",
        }),
        _ => Err(AcpmError::InvalidArgument {
            name: "count",
            value: "more than 8 registers",
        }),
    }
}

impl<T: AcpmTransfer, C: MillisClock> PmicOps for AcpmPmic<T, C> {
    fn read_reg(&self, acpm_chan_id: u32, target: PmicTarget) -> AcpmResult<PmicRead> {
        check_target(target)?;

        let mut cmd = codec::encode_read(target, self.clock.stamp());
        self.exchange(acpm_chan_id, &mut cmd)?;

        let (status, value) = codec::decode_read(&cmd);
        trace!(
            "[PMIC] read {:?} -> {:#04x} ({})",
            target,
            value,
            status
        );
        Ok(PmicRead { status, value })
    }

    fn bulk_read(
        &self,
        acpm_chan_id: u32,
        target: PmicTarget,
        buf: &mut [u8],
    ) -> AcpmResult<PmicStatus> {
        check_target(target)?;
        let count = check_bulk_len(buf.len())?;

        let mut cmd = codec::encode_bulk_read(target, count);
        self.exchange(acpm_chan_id, &mut cmd)?;

        let status = codec::decode_bulk_read(&cmd, buf);
        trace!("[PMIC] bulk read {:?} x{} ({})", target, count, status);
        Ok(status)
    }

    fn write_reg(
        &self,
        acpm_chan_id: u32,
        target: PmicTarget,
        value: u8,
    ) -> AcpmResult<PmicStatus> {
        check_target(target)?;

        let mut cmd = codec::encode_write(target, value, self.clock.stamp());
        self.exchange(acpm_chan_id, &mut cmd)?;

        let status = codec::decode_write(&cmd);
        trace!("[PMIC] write {:?} <- {:#04x} ({})", target, value, status);
        Ok(status)
    }

    fn bulk_write(
        &self,
        acpm_chan_id: u32,
        target: PmicTarget,
        data: &[u8],
    ) -> AcpmResult<PmicStatus> {
        check_target(target)?;
        check_bulk_len(data.len())?;

        let mut cmd = codec::encode_bulk_write(target, data);
        self.exchange(acpm_chan_id, &mut cmd)?;

        let status = codec::decode_bulk_write(&cmd);
        trace!("[PMIC] bulk write {:?} x{} ({})", target, data.len(), status);
        Ok(status)
    }

    fn update_reg(
        &self,
        acpm_chan_id: u32,
        target: PmicTarget,
        value: u8,
        mask: u8,
    ) -> AcpmResult<PmicStatus> {
        check_target(target)?;

        let mut cmd = codec::encode_update(target, value, mask, self.clock.stamp());
        self.exchange(acpm_chan_id, &mut cmd)?;

        let status = codec::decode_update(&cmd);
        trace!(
            "[PMIC] update {:?} <- {:#04x}/{:#04x} ({})",
            target,
            value,
            mask,
            status
        );
        Ok(status)
    }
}
