//! PMIC command codec.
//!
//! Word layout of the 4-word command buffer:
//!
//! | Word | 31:24       | 23:16       | 15:8                    | 7:0        |
//! |------|-------------|-------------|-------------------------|------------|
//! | 0    | --          | --          | chan [15:12] type [11:8] | reg       |
//! | 1    | return code | update mask | value                   | func       |
//! | 2    | bulk 3      | bulk 2      | bulk 1                  | bulk 0     |
//! | 3    | timestamp (single ops) or bulk 7..4 (bulk ops)                   |
//!
//! Everything here is pure. Inputs are assumed to fit their fields; values
//! are masked into place without any truncation report.

use core::fmt;

use crate::{
    error::{AcpmError, AcpmResult},
    firmware::CmdBuffer,
};

/// Contiguous bit range `[hi:lo]` of a 32-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    hi: u32,
    lo: u32,
}

impl Field {
    pub const fn new(hi: u32, lo: u32) -> Self {
        assert!(hi < 32 && lo <= hi);
        Self { hi, lo }
    }

    pub const fn mask(self) -> u32 {
        (u32::MAX >> (31 - (self.hi - self.lo))) << self.lo
    }

    /// Place `value` into the field.
    pub const fn prep(self, value: u32) -> u32 {
        (value << self.lo) & self.mask()
    }

    /// Extract the field from `word`.
    pub const fn get(self, word: u32) -> u32 {
        (word & self.mask()) >> self.lo
    }
}

/// Word 0 fields.
pub const PMIC_CHANNEL: Field = Field::new(15, 12);
pub const PMIC_TYPE: Field = Field::new(11, 8);
pub const PMIC_REG: Field = Field::new(7, 0);

/// Word 1 fields.
pub const PMIC_RETURN: Field = Field::new(31, 24);
pub const PMIC_MASK: Field = Field::new(23, 16);
pub const PMIC_VALUE: Field = Field::new(15, 8);
pub const PMIC_FUNC: Field = Field::new(7, 0);

const BULK_SHIFT: u32 = 8;
const BULK_LANE: Field = Field::new(7, 0);
const BULK_LANES_PER_WORD: usize = 4;
const BULK_FIRST_WORD: usize = 2;

/// Largest payload of a bulk command.
pub const MAX_BULK: usize = 8;

/// Largest value of the 4-bit type and channel fields.
pub const MAX_NIBBLE: u8 = 0xf;

/// PMIC operation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PmicFunc {
    Read = 0,
    Write = 1,
    Update = 2,
    BulkRead = 3,
    BulkWrite = 4,
}

impl PmicFunc {
    pub const fn is_bulk(self) -> bool {
        matches!(self, Self::BulkRead | Self::BulkWrite)
    }
}

impl TryFrom<u8> for PmicFunc {
    type Error = AcpmError;

    fn try_from(func: u8) -> AcpmResult<Self> {
        match func {
            0 => Ok(Self::Read),
            1 => Ok(Self::Write),
            2 => Ok(Self::Update),
            3 => Ok(Self::BulkRead),
            4 => Ok(Self::BulkWrite),
            _ => Err(AcpmError::InvalidArgument {
                name: "func",
                value: "unknown PMIC function",
            }),
        }
    }
}

/// Register addressed by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmicTarget {
    pub pmic_type: u8,
    pub reg: u8,
    pub chan: u8,
}

impl PmicTarget {
    pub const fn new(pmic_type: u8, reg: u8, chan: u8) -> Self {
        Self {
            pmic_type,
            reg,
            chan,
        }
    }

    /// Word 0 of a command addressing this register.
    pub const fn header(self) -> u32 {
        PMIC_TYPE.prep(self.pmic_type as u32)
            | PMIC_REG.prep(self.reg as u32)
            | PMIC_CHANNEL.prep(self.chan as u32)
    }

    pub const fn from_header(word: u32) -> Self {
        Self {
            pmic_type: PMIC_TYPE.get(word) as u8,
            reg: PMIC_REG.get(word) as u8,
            chan: PMIC_CHANNEL.get(word) as u8,
        }
    }
}

/// Return code reported by the remote core. Zero is success; any other
/// value is firmware defined and passed through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PmicStatus(pub u8);

impl PmicStatus {
    pub const SUCCESS: Self = Self(0);

    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    pub const fn code(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PmicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            write!(f, "ok")
        } else {
            write!(f, "remote error {}", self.0)
        }
    }
}

impl CmdBuffer {
    pub fn pmic_target(&self) -> PmicTarget {
        PmicTarget::from_header(self.words()[0])
    }

    pub fn pmic_func(&self) -> AcpmResult<PmicFunc> {
        PmicFunc::try_from(PMIC_FUNC.get(self.words()[1]) as u8)
    }

    pub fn pmic_status(&self) -> PmicStatus {
        PmicStatus(PMIC_RETURN.get(self.words()[1]) as u8)
    }

    pub fn pmic_value(&self) -> u8 {
        PMIC_VALUE.get(self.words()[1]) as u8
    }

    pub fn pmic_mask(&self) -> u8 {
        PMIC_MASK.get(self.words()[1]) as u8
    }
}

#[inline]
const fn set_bulk(data: u8, lane: usize) -> u32 {
    BULK_LANE.prep(data as u32) << (BULK_SHIFT * lane as u32)
}

#[inline]
const fn read_bulk(word: u32, lane: usize) -> u8 {
    BULK_LANE.get(word >> (BULK_SHIFT * lane as u32)) as u8
}

/// Pack up to [`MAX_BULK`] bytes into words 2 and 3, lowest lane first.
pub fn pack_bulk(cmd: &mut CmdBuffer, data: &[u8]) {
    let words = cmd.words_mut();
    for (i, &byte) in data.iter().take(MAX_BULK).enumerate() {
        words[BULK_FIRST_WORD + i / BULK_LANES_PER_WORD] |=
            set_bulk(byte, i % BULK_LANES_PER_WORD);
    }
}

/// Unpack `out.len()` (at most [`MAX_BULK`]) bytes from words 2 and 3.
pub fn unpack_bulk(cmd: &CmdBuffer, out: &mut [u8]) {
    let words = cmd.words();
    for (i, byte) in out.iter_mut().take(MAX_BULK).enumerate() {
        *byte = read_bulk(
            words[BULK_FIRST_WORD + i / BULK_LANES_PER_WORD],
            i % BULK_LANES_PER_WORD,
        );
    }
}

fn command(target: PmicTarget, word1: u32) -> CmdBuffer {
    CmdBuffer::from_words([target.header(), word1, 0, 0])
}

pub fn encode_read(target: PmicTarget, stamp: u32) -> CmdBuffer {
    let mut cmd = command(target, PMIC_FUNC.prep(PmicFunc::Read as u32));
    cmd.words_mut()[3] = stamp;
    cmd
}

/// Status and value of a read reply. The value is extracted even when the
/// status reports an error.
pub fn decode_read(cmd: &CmdBuffer) -> (PmicStatus, u8) {
    (cmd.pmic_status(), cmd.pmic_value())
}

pub fn encode_write(target: PmicTarget, value: u8, stamp: u32) -> CmdBuffer {
    let mut cmd = command(
        target,
        PMIC_FUNC.prep(PmicFunc::Write as u32) | PMIC_VALUE.prep(value as u32),
    );
    cmd.words_mut()[3] = stamp;
    cmd
}

pub fn decode_write(cmd: &CmdBuffer) -> PmicStatus {
    cmd.pmic_status()
}

/// Read-modify-write: the remote core computes
/// `reg = (reg & !mask) | (value & mask)`.
pub fn encode_update(target: PmicTarget, value: u8, mask: u8, stamp: u32) -> CmdBuffer {
    let mut cmd = command(
        target,
        PMIC_FUNC.prep(PmicFunc::Update as u32)
            | PMIC_VALUE.prep(value as u32)
            | PMIC_MASK.prep(mask as u32),
    );
    cmd.words_mut()[3] = stamp;
    cmd
}

pub fn decode_update(cmd: &CmdBuffer) -> PmicStatus {
    cmd.pmic_status()
}

/// Bulk commands carry no timestamp; word 3 belongs to the payload.
pub fn encode_bulk_read(target: PmicTarget, count: u8) -> CmdBuffer {
    command(
        target,
        PMIC_FUNC.prep(PmicFunc::BulkRead as u32) | PMIC_VALUE.prep(count as u32),
    )
}

/// Decode a bulk read reply into `out` (`out.len()` is the count).
///
/// On a nonzero status the payload is undefined and `out` is left as is.
pub fn decode_bulk_read(cmd: &CmdBuffer, out: &mut [u8]) -> PmicStatus {
    let status = cmd.pmic_status();
    if !status.is_ok() {
        return status;
    }
    unpack_bulk(cmd, out);
    status
}

pub fn encode_bulk_write(target: PmicTarget, data: &[u8]) -> CmdBuffer {
    let mut cmd = command(
        target,
        PMIC_FUNC.prep(PmicFunc::BulkWrite as u32) | PMIC_VALUE.prep(data.len() as u32),
    );
    pack_bulk(&mut cmd, data);
    cmd
}

pub fn decode_bulk_write(cmd: &CmdBuffer) -> PmicStatus {
    cmd.pmic_status()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: PmicTarget = PmicTarget::new(0x3, 0x5a, 0x1);

    /// What a well-behaved remote does to word 1: keep func and, unless it
    /// is replying with data, the request value; set return code and value.
    fn reply(cmd: &mut CmdBuffer, status: u8, value: u8) {
        let w1 = cmd.words()[1];
        cmd.words_mut()[1] = (w1 & (PMIC_FUNC.mask() | PMIC_MASK.mask()))
            | PMIC_VALUE.prep(value as u32)
            | PMIC_RETURN.prep(status as u32);
    }

    #[test]
    fn test_field_masks() {
        assert_eq!(PMIC_CHANNEL.mask(), 0x0000_f000);
        assert_eq!(PMIC_TYPE.mask(), 0x0000_0f00);
        assert_eq!(PMIC_REG.mask(), 0x0000_00ff);
        assert_eq!(PMIC_RETURN.mask(), 0xff00_0000);
        assert_eq!(PMIC_MASK.mask(), 0x00ff_0000);
        assert_eq!(PMIC_VALUE.mask(), 0x0000_ff00);
        assert_eq!(PMIC_FUNC.mask(), 0x0000_00ff);
        assert_eq!(Field::new(31, 0).mask(), u32::MAX);
    }

    #[test]
    fn test_channel_field() {
        assert_eq!(PMIC_CHANNEL.prep(0xf), 0xf000);
        assert_eq!(PMIC_CHANNEL.get(0xffff_ffff), 0xf);
    }

    #[test]
    fn test_type_field() {
        assert_eq!(PMIC_TYPE.prep(0xa), 0x0a00);
        assert_eq!(PMIC_TYPE.get(0x0a00), 0xa);
    }

    #[test]
    fn test_reg_field() {
        assert_eq!(PMIC_REG.prep(0xff), 0x00ff);
        assert_eq!(PMIC_REG.get(0x1234), 0x34);
    }

    #[test]
    fn test_return_field() {
        assert_eq!(PMIC_RETURN.prep(0x81), 0x8100_0000);
        assert_eq!(PMIC_RETURN.get(0x8100_0000), 0x81);
    }

    #[test]
    fn test_mask_field() {
        assert_eq!(PMIC_MASK.prep(0x0f), 0x000f_0000);
        assert_eq!(PMIC_MASK.get(0x000f_0000), 0x0f);
    }

    #[test]
    fn test_value_field() {
        assert_eq!(PMIC_VALUE.prep(0xaa), 0xaa00);
        assert_eq!(PMIC_VALUE.get(0xaa00), 0xaa);
    }

    #[test]
    fn test_func_field() {
        assert_eq!(PMIC_FUNC.prep(PmicFunc::BulkWrite as u32), 4);
        assert_eq!(PMIC_FUNC.get(0xffff_ff03), 3);
    }

    #[test]
    fn test_header_fields_isolated() {
        assert_eq!(PmicTarget::new(0, 0, 0xf).header(), 0xf000);
        assert_eq!(PmicTarget::new(0xf, 0, 0).header(), 0x0f00);
        assert_eq!(PmicTarget::new(0, 0xff, 0).header(), 0x00ff);
        assert_eq!(PmicTarget::new(0x1, 0x23, 0x4).header(), 0x4123);
    }

    #[test]
    fn test_oversized_nibbles_stay_in_their_field() {
        assert_eq!(PmicTarget::new(0x1f, 0, 0).header(), 0x0f00);
        assert_eq!(PmicTarget::new(0, 0, 0x1f).header(), 0xf000);
    }

    #[test]
    fn test_func_from_raw() {
        assert_eq!(PmicFunc::try_from(2), Ok(PmicFunc::Update));
        assert!(PmicFunc::try_from(5).is_err());
        assert!(PmicFunc::BulkRead.is_bulk());
        assert!(!PmicFunc::Update.is_bulk());
    }

    #[test]
    fn test_encode_read() {
        let cmd = encode_read(TARGET, 0xdead_beef);
        assert_eq!(cmd.words(), &[0x135a, 0, 0, 0xdead_beef]);
        assert_eq!(cmd.pmic_func(), Ok(PmicFunc::Read));
    }

    #[test]
    fn test_decode_read() {
        let mut cmd = encode_read(TARGET, 7);
        reply(&mut cmd, 0, 0x5c);
        assert_eq!(decode_read(&cmd), (PmicStatus::SUCCESS, 0x5c));
        assert_eq!(cmd.pmic_target(), TARGET);
    }

    #[test]
    fn test_read_value_survives_error() {
        let mut cmd = encode_read(TARGET, 7);
        reply(&mut cmd, 0x12, 0x99);
        assert_eq!(decode_read(&cmd), (PmicStatus(0x12), 0x99));
    }

    #[test]
    fn test_encode_write() {
        let cmd = encode_write(TARGET, 0xa5, 1);
        assert_eq!(cmd.words(), &[0x135a, 0xa501, 0, 1]);
        assert_eq!(decode_write(&cmd), PmicStatus::SUCCESS);
    }

    #[test]
    fn test_decode_write_status() {
        let mut cmd = encode_write(TARGET, 0xa5, 1);
        reply(&mut cmd, 0xfe, 0xa5);
        assert_eq!(decode_write(&cmd), PmicStatus(0xfe));
        assert_eq!(cmd.pmic_target(), TARGET);
    }

    #[test]
    fn test_encode_update() {
        let cmd = encode_update(TARGET, 0xaa, 0x0f, 2);
        assert_eq!(cmd.words(), &[0x135a, 0x000f_aa02, 0, 2]);
    }

    #[test]
    fn test_update_echo_keeps_value_and_mask() {
        let mut cmd = encode_update(TARGET, 0xaa, 0x0f, 2);
        reply(&mut cmd, 0, 0xaa);
        assert_eq!(decode_update(&cmd), PmicStatus::SUCCESS);
        assert_eq!(cmd.pmic_value(), 0xaa);
        assert_eq!(cmd.pmic_mask(), 0x0f);
        assert_eq!(cmd.pmic_func(), Ok(PmicFunc::Update));
    }

    #[test]
    fn test_encode_bulk_read_has_no_stamp() {
        let cmd = encode_bulk_read(TARGET, 6);
        assert_eq!(cmd.words(), &[0x135a, 0x0603, 0, 0]);
    }

    #[test]
    fn test_decode_bulk_read() {
        let mut cmd = encode_bulk_read(TARGET, 6);
        cmd.words_mut()[2] = 0x4433_2211;
        cmd.words_mut()[3] = 0x8877_6655;
        let mut out = [0u8; 6];
        assert_eq!(decode_bulk_read(&cmd, &mut out), PmicStatus::SUCCESS);
        assert_eq!(out, [0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
    }

    #[test]
    fn test_bulk_read_error_extracts_nothing() {
        let mut cmd = encode_bulk_read(TARGET, 4);
        cmd.words_mut()[2] = 0x4433_2211;
        reply(&mut cmd, 0x03, 0);
        let mut out = [0xee; 4];
        assert_eq!(decode_bulk_read(&cmd, &mut out), PmicStatus(0x03));
        assert_eq!(out, [0xee; 4]);
    }

    #[test]
    fn test_encode_bulk_write() {
        let cmd = encode_bulk_write(TARGET, &[1, 2, 3, 4, 5]);
        assert_eq!(cmd.words(), &[0x135a, 0x0504, 0x0403_0201, 0x0000_0005]);
        assert_eq!(decode_bulk_write(&cmd), PmicStatus::SUCCESS);
    }

    #[test]
    fn test_bulk_pack_unpack_bijection() {
        let data = [0x00, 0xff, 0x80, 0x7f, 0x01, 0xfe, 0x55, 0xaa];
        for count in 1..=MAX_BULK {
            let mut cmd = CmdBuffer::new();
            pack_bulk(&mut cmd, &data[..count]);
            let mut out = [0u8; MAX_BULK];
            unpack_bulk(&cmd, &mut out[..count]);
            assert_eq!(&out[..count], &data[..count]);
        }
    }

    #[test]
    fn test_bulk_lanes_ignore_excess() {
        let mut cmd = CmdBuffer::new();
        pack_bulk(&mut cmd, &[0xff; 12]);
        assert_eq!(cmd.words(), &[0, 0, u32::MAX, u32::MAX]);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PmicStatus(0).to_string(), "ok");
        assert_eq!(PmicStatus(3).to_string(), "remote error 3");
    }
}
