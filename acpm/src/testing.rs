//! Simulated hardware shared by the unit tests.

use std::vec::Vec;

use spin::Mutex;

use crate::{
    firmware::{xfer::CmdSram, CmdBuffer},
    mailbox::{regs, RegisterIo, MAX_CHANS},
};

/// Mailbox register file with Exynos side effects: `INTGR1` is
/// write-one-to-set and `INTCR0` clears bits of `INTSR0`. Every write made
/// through [`RegisterIo`] is logged; [`set`](FakeRegs::set) and
/// [`raise`](FakeRegs::raise) model the hardware/remote side and are not.
pub struct FakeRegs {
    file: Mutex<[u32; regs::SIZE / 4]>,
    log: Mutex<Vec<(usize, u32)>>,
}

impl FakeRegs {
    pub fn new() -> Self {
        Self {
            file: Mutex::new([0; regs::SIZE / 4]),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn get(&self, offset: usize) -> u32 {
        self.file.lock()[offset / 4]
    }

    pub fn set(&self, offset: usize, value: u32) {
        self.file.lock()[offset / 4] = value;
    }

    /// Remote side signals completion on channel `index`.
    pub fn raise(&self, index: usize) {
        self.file.lock()[regs::INTSR0 / 4] |= 1 << index;
    }

    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.log.lock().clone()
    }
}

impl RegisterIo for FakeRegs {
    fn read32(&self, offset: usize) -> u32 {
        self.get(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        self.log.lock().push((offset, value));
        let mut file = self.file.lock();
        match offset {
            regs::INTGR1 => file[offset / 4] |= value,
            regs::INTCR0 => file[regs::INTSR0 / 4] &= !value,
            _ => file[offset / 4] = value,
        }
    }
}

/// Register file plus per-channel command windows, with an optional remote
/// responder that runs when a doorbell rings.
pub struct FakeBoard {
    pub regs: FakeRegs,
    sram: Mutex<[[u32; 4]; MAX_CHANS]>,
    responder: Option<fn(&mut [u32; 4])>,
}

impl FakeBoard {
    pub fn new(responder: Option<fn(&mut [u32; 4])>) -> Self {
        Self {
            regs: FakeRegs::new(),
            sram: Mutex::new([[0; 4]; MAX_CHANS]),
            responder,
        }
    }

    pub fn window(&self, index: usize) -> [u32; 4] {
        self.sram.lock()[index]
    }
}

impl RegisterIo for FakeBoard {
    fn read32(&self, offset: usize) -> u32 {
        self.regs.read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        self.regs.write32(offset, value);
        if offset != regs::INTGR1 {
            return;
        }
        let Some(respond) = self.responder else {
            return;
        };
        for index in (0..MAX_CHANS).filter(|i| value & (1 << i) != 0) {
            respond(&mut self.sram.lock()[index]);
            self.regs.raise(index);
        }
    }
}

impl CmdSram for FakeBoard {
    fn write_cmd(&self, index: usize, cmd: &CmdBuffer) {
        self.sram.lock()[index] = *cmd.words();
    }

    fn read_cmd(&self, index: usize, cmd: &mut CmdBuffer) {
        *cmd.words_mut() = self.sram.lock()[index];
    }
}
