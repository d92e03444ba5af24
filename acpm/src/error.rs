//! Error types for the ACPM mailbox and protocol layers
//!
//! Only transport-level failures live here. The status byte returned by the
//! remote firmware is protocol data and is carried as
//! [`PmicStatus`](crate::firmware::pmic::PmicStatus) inside `Ok(..)`.

use core::fmt;

/// Main ACPM error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcpmError {
    /// Mailbox controller errors
    MboxError(MboxError),

    /// Object is not in the state the operation needs
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    /// Generic errors
    InvalidArgument {
        name: &'static str,
        value: &'static str,
    },
    OperationNotSupported {
        operation: &'static str,
    },
    WouldBlock {
        chan: u32,
    },
    Timeout {
        operation: &'static str,
        polls: u32,
    },

    /// Hardware errors
    HardwareError {
        device: &'static str,
        code: u32,
    },
}

/// Mailbox-controller specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MboxError {
    /// Channel handle does not belong to this controller
    ForeignChannel { mbox_id: u32 },
    /// Channel index outside the populated channel set
    InvalidChannel { index: usize, count: usize },
    /// Unknown devicetree channel type cell
    InvalidChannelType { ty: u32 },
    /// Specifier has the wrong number of cells
    BadSpecifier { cells: usize },
}

/// Result type alias for ACPM operations
pub type AcpmResult<T> = Result<T, AcpmError>;

impl fmt::Display for AcpmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MboxError(e) => write!(f, "Mailbox error: {}", e),
            Self::InvalidState { expected, actual } => {
                write!(f, "Invalid state: expected {}, got {}", expected, actual)
            }
            Self::InvalidArgument { name, value } => {
                write!(f, "Invalid argument '{}': {}", name, value)
            }
            Self::OperationNotSupported { operation } => {
                write!(f, "Operation not supported: {}", operation)
            }
            Self::WouldBlock { chan } => write!(f, "ACPM channel {} is busy", chan),
            Self::Timeout { operation, polls } => {
                write!(f, "Timeout during {}: gave up after {} polls", operation, polls)
            }
            Self::HardwareError { device, code } => {
                write!(f, "Hardware error on {}: code 0x{:x}", device, code)
            }
        }
    }
}

impl fmt::Display for MboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignChannel { mbox_id } => {
                write!(f, "channel belongs to mailbox {}", mbox_id)
            }
            Self::InvalidChannel { index, count } => {
                write!(f, "channel {} out of range ({} channels)", index, count)
            }
            Self::InvalidChannelType { ty } => write!(f, "unknown channel type {}", ty),
            Self::BadSpecifier { cells } => {
                write!(f, "channel specifier has {} cells, expected 2", cells)
            }
        }
    }
}

// Conversion implementations
//
// Every controller fault is an invalid-argument condition from the caller's
// point of view, but the detail is kept for logging.
impl From<MboxError> for AcpmError {
    fn from(err: MboxError) -> Self {
        Self::MboxError(err)
    }
}

impl AcpmError {
    /// True for errors caused by a bad channel handle or argument, as opposed
    /// to state, contention or hardware faults.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::MboxError(_))
    }
}
