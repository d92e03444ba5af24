//! Static configuration for the mailbox and the ACPM exchange.
//!
//! There is no runtime configuration format. A board selects an
//! [`ExynosMboxConfig`] by its devicetree compatible string and may override
//! the polling budget through [`AcpmConfig`].

/// Per-SoC description of an Exynos mailbox instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExynosMboxConfig {
    /// Devicetree compatible string.
    pub compatible: &'static str,
    /// Usable bits of the interrupt generation register (`INTGR1`). One
    /// channel per set bit.
    pub intgr1_mask: u16,
    /// Value written to `INTMR0` at init. Set bits mask inbound interrupts;
    /// the local side polls instead.
    pub intmr0_mask: u16,
}

impl ExynosMboxConfig {
    /// Number of channels exposed by this mailbox.
    pub const fn chan_count(&self) -> usize {
        self.intgr1_mask.count_ones() as usize
    }
}

/// Google GS101 ACPM mailbox: 16 doorbell channels, all inbound interrupts
/// masked.
pub const GS101_MBOX: ExynosMboxConfig = ExynosMboxConfig {
    compatible: "google,gs101-acpm-mbox",
    intgr1_mask: 0xffff,
    intmr0_mask: 0xffff,
};

/// OF match table.
pub static EXYNOS_MBOX_MATCH: &[ExynosMboxConfig] = &[GS101_MBOX];

/// Look up a mailbox configuration by compatible string.
pub fn match_compatible(compatible: &str) -> Option<&'static ExynosMboxConfig> {
    EXYNOS_MBOX_MATCH
        .iter()
        .find(|cfg| cfg.compatible == compatible)
}

/// Tunables for the polling exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcpmConfig {
    /// Completion polls before a transfer is reported as timed out.
    pub poll_limit: u32,
}

impl AcpmConfig {
    pub const DEFAULT_POLL_LIMIT: u32 = 100_000;
}

impl Default for AcpmConfig {
    fn default() -> Self {
        Self {
            poll_limit: Self::DEFAULT_POLL_LIMIT,
        }
    }
}
