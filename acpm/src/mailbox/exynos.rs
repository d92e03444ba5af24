//! Exynos ACPM mailbox controller.
//!
//! Doorbell-only: sending on a channel sets the channel's bit in `INTGR1`,
//! which is write-one-to-set, so other channels are unaffected. Inbound
//! interrupts are masked at init and completions are polled through
//! `INTSR0`/`INTCR0`.

use core::sync::atomic::{AtomicU32, Ordering};

use log::{debug, trace, warn};

use super::{regs, MboxChan, MboxChanType, MboxController, RegisterIo, MAX_CHANS};
use crate::{
    config::ExynosMboxConfig,
    error::{AcpmError, AcpmResult, MboxError},
};

static NEXT_MBOX_ID: AtomicU32 = AtomicU32::new(1);

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MboxState {
    /// Registers known, channel set not built yet
    Uninitialized,
    /// Channels resolvable, sends permitted
    Ready,
}

impl MboxState {
    fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
        }
    }
}

/// Exynos mailbox instance.
pub struct ExynosMbox<R: RegisterIo> {
    regs: R,
    config: ExynosMboxConfig,
    id: u32,
    state: MboxState,
    num_chans: usize,
    chans: [MboxChan; MAX_CHANS],
}

impl<R: RegisterIo> ExynosMbox<R> {
    /// Wrap a register window. No register is touched until [`init`].
    ///
    /// [`init`]: ExynosMbox::init
    pub fn new(regs: R, config: &ExynosMboxConfig) -> Self {
        let id = NEXT_MBOX_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            regs,
            config: *config,
            id,
            state: MboxState::Uninitialized,
            num_chans: 0,
            chans: [MboxChan::new(id, u16::MAX); MAX_CHANS],
        }
    }

    /// Build the channel set and switch the local side to polling mode.
    pub fn init(&mut self) -> AcpmResult<()> {
        if self.state != MboxState::Uninitialized {
            return Err(AcpmError::InvalidState {
                expected: MboxState::Uninitialized.name(),
                actual: self.state.name(),
            });
        }

        let count = self.config.chan_count();
        if count == 0 {
            return Err(AcpmError::InvalidArgument {
                name: "intgr1_mask",
                value: "no channels enabled",
            });
        }

        for (slot, chan) in self.chans.iter_mut().enumerate().take(count) {
            *chan = MboxChan::new(self.id, slot as u16);
        }
        self.num_chans = count;

        // Mask out all inbound interrupts; completions are polled.
        self.regs
            .write32(regs::INTMR0, u32::from(self.config.intmr0_mask));

        self.state = MboxState::Ready;
        debug!(
            "[MBOX] {} #{} ready with {} channels",
            self.config.compatible, self.id, count
        );
        Ok(())
    }

    pub fn state(&self) -> MboxState {
        self.state
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn config(&self) -> &ExynosMboxConfig {
        &self.config
    }

    fn ensure_ready(&self) -> AcpmResult<()> {
        match self.state {
            MboxState::Ready => Ok(()),
            other => Err(AcpmError::InvalidState {
                expected: MboxState::Ready.name(),
                actual: other.name(),
            }),
        }
    }

    /// Ordinal of `chan` within the owned channel set.
    pub fn resolve_channel_index(&self, chan: &MboxChan) -> AcpmResult<usize> {
        self.ensure_ready()?;

        self.chans[..self.num_chans]
            .iter()
            .position(|c| c == chan)
            .ok_or_else(|| {
                warn!(
                    "[MBOX] #{}: channel from mailbox #{} not owned here",
                    self.id, chan.mbox_id
                );
                MboxError::ForeignChannel {
                    mbox_id: chan.mbox_id,
                }
                .into()
            })
    }

    /// Translate a two-cell devicetree specifier `<index type>`.
    pub fn xlate(&self, args: &[u32]) -> AcpmResult<MboxChan> {
        let &[index, ty] = args else {
            return Err(MboxError::BadSpecifier { cells: args.len() }.into());
        };

        match MboxChanType::try_from(ty)? {
            MboxChanType::Doorbell => self.channel(index as usize),
            MboxChanType::Data => Err(AcpmError::OperationNotSupported {
                operation: "data channel",
            }),
        }
    }

    /// True when the remote side has raised the completion bit for `index`.
    pub fn rx_pending(&self, index: usize) -> AcpmResult<bool> {
        self.check_index(index)?;
        Ok(self.regs.read32(regs::INTSR0) & (1 << index) != 0)
    }

    /// Clear the completion bit for `index`.
    pub fn ack_rx(&self, index: usize) -> AcpmResult<()> {
        self.check_index(index)?;
        self.regs.write32(regs::INTCR0, 1 << index);
        Ok(())
    }

    fn check_index(&self, index: usize) -> AcpmResult<()> {
        self.ensure_ready()?;
        if index >= self.num_chans {
            return Err(MboxError::InvalidChannel {
                index,
                count: self.num_chans,
            }
            .into());
        }
        Ok(())
    }
}

impl<R: RegisterIo> MboxController for ExynosMbox<R> {
    fn num_chans(&self) -> usize {
        self.num_chans
    }

    fn channel(&self, index: usize) -> AcpmResult<MboxChan> {
        self.check_index(index)?;
        Ok(self.chans[index])
    }

    fn send_data(&self, chan: &MboxChan) -> AcpmResult<()> {
        let index = self.resolve_channel_index(chan)?;

        self.regs.write32(regs::INTGR1, 1 << index);
        trace!("[MBOX] #{} doorbell {}", self.id, index);

        Ok(())
    }
}
