//! ACPM firmware protocol -- command buffer, transfer contract and the PMIC
//! client.
//!
//! ```text
//!   PmicOps (trait)
//!     +-- AcpmPmic<T: AcpmTransfer, C: MillisClock>
//!           |-- pmic::codec        -- pure encode/decode of CmdBuffer
//!           +-- AcpmTransfer       -- synchronous round trip
//!                 +-- PollingExchange -- command window + doorbell + poll
//! ```
//!
//! A [`CmdBuffer`] is both the request and the response storage: it is
//! encoded, lent exclusively to the transfer, overwritten with the reply and
//! then decoded.

pub mod exchange;
pub mod pmic;
pub mod xfer;

pub use exchange::PollingExchange;
pub use xfer::{AcpmTransfer, ChannelLocks, CmdSram, Xfer, XferFlags};

/// Words in an ACPM command buffer.
pub const CMD_WORDS: usize = 4;

/// Fixed-size ACPM command buffer, 16 bytes in native word order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CmdBuffer([u32; CMD_WORDS]);

impl CmdBuffer {
    pub const fn new() -> Self {
        Self([0; CMD_WORDS])
    }

    pub const fn from_words(words: [u32; CMD_WORDS]) -> Self {
        Self(words)
    }

    pub fn words(&self) -> &[u32; CMD_WORDS] {
        &self.0
    }

    pub fn words_mut(&mut self) -> &mut [u32; CMD_WORDS] {
        &mut self.0
    }

    /// Size on the wire in bytes.
    pub const fn len_bytes(&self) -> usize {
        CMD_WORDS * core::mem::size_of::<u32>()
    }
}
