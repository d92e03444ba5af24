//! Polling ACPM exchange over the Exynos mailbox.
//!
//! The ACPM channel id is the mailbox channel index. A round trip copies the
//! command into the channel's window, rings the doorbell and polls the
//! inbound status bit until the remote core answers or the budget runs out.

use log::{trace, warn};

use super::{
    xfer::{AcpmTransfer, ChannelLocks, CmdSram, Xfer},
    CmdBuffer,
};
use crate::{
    barriers::memory_fence,
    config::AcpmConfig,
    error::{AcpmError, AcpmResult},
    mailbox::{ExynosMbox, MboxChan, MboxController, RegisterIo},
};

/// Synchronous exchange built on doorbell + completion polling.
pub struct PollingExchange<'m, R: RegisterIo, S: CmdSram> {
    mbox: &'m ExynosMbox<R>,
    sram: S,
    locks: ChannelLocks,
    config: AcpmConfig,
}

impl<'m, R: RegisterIo, S: CmdSram> PollingExchange<'m, R, S> {
    pub fn new(mbox: &'m ExynosMbox<R>, sram: S, config: AcpmConfig) -> Self {
        Self {
            mbox,
            sram,
            locks: ChannelLocks::new(),
            config,
        }
    }

    pub fn mbox(&self) -> &ExynosMbox<R> {
        self.mbox
    }

    fn wait_for_reply(&self, index: usize) -> AcpmResult<()> {
        let mut polls = 0u32;
        while !self.mbox.rx_pending(index)? {
            if polls >= self.config.poll_limit {
                warn!("[ACPM] chan {}: no reply after {} polls", index, polls);
                return Err(AcpmError::Timeout {
                    operation: "ACPM transfer",
                    polls,
                });
            }
            polls += 1;
            core::hint::spin_loop();
        }
        trace!("[ACPM] chan {}: reply after {} polls", index, polls);
        Ok(())
    }

    fn round_trip(&self, index: usize, chan: &MboxChan, cmd: &mut CmdBuffer) -> AcpmResult<()> {
        // Drop a completion left behind by an earlier timed-out transfer.
        self.mbox.ack_rx(index)?;

        self.sram.write_cmd(index, cmd);
        memory_fence();
        self.mbox.send_data(chan)?;

        self.wait_for_reply(index)?;
        self.mbox.ack_rx(index)?;

        memory_fence();
        self.sram.read_cmd(index, cmd);
        Ok(())
    }
}

impl<'m, R: RegisterIo, S: CmdSram> AcpmTransfer for PollingExchange<'m, R, S> {
    fn do_xfer(&self, xfer: &mut Xfer<'_>) -> AcpmResult<()> {
        let index = xfer.acpm_chan_id as usize;
        let chan = self.mbox.channel(index).map_err(|e| {
            warn!("[ACPM] no mailbox channel for ACPM channel {}: {}", index, e);
            e
        })?;

        let _guard = self.locks.acquire(index, xfer.flags).map_err(|e| {
            warn!("[ACPM] chan {}: {}", index, e);
            e
        })?;

        self.round_trip(index, &chan, xfer.cmd)
    }
}
