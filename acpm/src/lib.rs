//! Exynos ACPM mailbox transport and PMIC protocol
//!
//! The host side of the ACPM (Alive Clock and Power Manager) firmware
//! interface: a doorbell-only mailbox controller, a polling synchronous
//! exchange on top of it, and the PMIC register-access protocol that packs
//! read/write/update/bulk operations into a 4-word command buffer.
//!
//! ```text
//!   PmicOps::read_reg(..)
//!     -> codec::encode_read         CmdBuffer
//!     -> AcpmTransfer::do_xfer      same CmdBuffer, now the reply
//!          -> ExynosMbox::send_data INTGR1 |= BIT(chan)
//!     -> codec::decode_read         (status, value)
//! ```

#![cfg_attr(not(test), no_std)]

pub mod barriers;
pub mod config;
pub mod error;
pub mod firmware;
pub mod mailbox;
pub mod timer;

#[cfg(test)]
mod testing;

pub use config::{AcpmConfig, ExynosMboxConfig, GS101_MBOX};
pub use error::{AcpmError, AcpmResult, MboxError};
pub use firmware::{
    pmic::{AcpmPmic, PmicOps, PmicRead, PmicStatus, PmicTarget},
    AcpmTransfer, CmdBuffer, PollingExchange, Xfer, XferFlags,
};
pub use mailbox::{ExynosMbox, MboxChan, MboxController, MmioRegs, RegisterIo};
