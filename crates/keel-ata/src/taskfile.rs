//! The ATA task file: the register image a command is issued from, and the
//! returned-register snapshot read back after completion.

use crate::regs::{DEVICE_REG_BASE, DEVICE_REG_LBA_MODE};

/// Register image for one ATA command.
///
/// Constructed zeroed per invocation, consumed once by a CDB encoder, then
/// discarded. For 28-bit commands every `*_ext` field (and ICC/AUX) must stay
/// zero; encoders transmit them only for extended task files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskFile {
    /// Feature register on issue (error register on completion).
    pub feature: u8,
    pub sector_count: u8,
    pub lba_low: u8,
    pub lba_mid: u8,
    pub lba_high: u8,
    pub device: u8,
    /// Command register on issue (status on completion).
    pub command: u8,
    pub device_control: u8,

    // 48-bit shadow ("previous") registers.
    pub feature_ext: u8,
    pub sector_count_ext: u8,
    pub lba_low_ext: u8,
    pub lba_mid_ext: u8,
    pub lba_high_ext: u8,

    /// Isochronous command completion (ACS); most bridges cannot carry it.
    pub icc: u8,
    /// Auxiliary bytes for extended addressing; most bridges cannot carry them.
    pub aux: [u8; 4],
}

impl TaskFile {
    pub fn new(command: u8) -> TaskFile {
        TaskFile {
            command,
            device: DEVICE_REG_BASE,
            ..TaskFile::default()
        }
    }

    /// 28-bit LBA: low 24 bits across the LBA registers, bits 27:24 in the
    /// device register low nibble, LBA mode bit set.
    pub fn set_lba28(&mut self, lba: u32) {
        self.lba_low = lba as u8;
        self.lba_mid = (lba >> 8) as u8;
        self.lba_high = (lba >> 16) as u8;
        self.device = DEVICE_REG_BASE | DEVICE_REG_LBA_MODE | ((lba >> 24) as u8 & 0x0F);
    }

    /// 48-bit LBA: current registers carry bits 23:0, the ext shadows carry
    /// bits 47:24. The device register nibble stays clear.
    pub fn set_lba48(&mut self, lba: u64) {
        self.lba_low = lba as u8;
        self.lba_mid = (lba >> 8) as u8;
        self.lba_high = (lba >> 16) as u8;
        self.lba_low_ext = (lba >> 24) as u8;
        self.lba_mid_ext = (lba >> 32) as u8;
        self.lba_high_ext = (lba >> 40) as u8;
        self.device = DEVICE_REG_BASE | DEVICE_REG_LBA_MODE;
    }

    /// CHS addressing: cylinder in the LBA mid/high pair, head in the device
    /// register low nibble, sector in LBA low.
    pub fn set_chs(&mut self, cylinder: u16, head: u8, sector: u8) {
        self.lba_low = sector;
        self.lba_mid = cylinder as u8;
        self.lba_high = (cylinder >> 8) as u8;
        self.device = DEVICE_REG_BASE | (head & 0x0F);
    }

    /// 16-bit sector count split across current + ext registers.
    pub fn set_sector_count16(&mut self, count: u16) {
        self.sector_count = count as u8;
        self.sector_count_ext = (count >> 8) as u8;
    }

    /// True when any field only an extended task file can carry is populated.
    pub fn uses_ext_fields(&self) -> bool {
        self.feature_ext != 0
            || self.sector_count_ext != 0
            || self.lba_low_ext != 0
            || self.lba_mid_ext != 0
            || self.lba_high_ext != 0
    }

    pub fn uses_icc_or_aux(&self) -> bool {
        self.icc != 0 || self.aux != [0; 4]
    }
}

/// Registers read back after command completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReturnTaskFile {
    pub status: u8,
    pub error: u8,
    pub sector_count: u8,
    pub sector_count_ext: u8,
    pub lba_low: u8,
    pub lba_mid: u8,
    pub lba_high: u8,
    pub lba_low_ext: u8,
    pub lba_mid_ext: u8,
    pub lba_high_ext: u8,
    pub device: u8,
}

impl ReturnTaskFile {
    pub fn lba28(&self) -> u32 {
        u32::from(self.lba_low)
            | u32::from(self.lba_mid) << 8
            | u32::from(self.lba_high) << 16
            | u32::from(self.device & 0x0F) << 24
    }

    pub fn lba48(&self) -> u64 {
        u64::from(self.lba_low)
            | u64::from(self.lba_mid) << 8
            | u64::from(self.lba_high) << 16
            | u64::from(self.lba_low_ext) << 24
            | u64::from(self.lba_mid_ext) << 32
            | u64::from(self.lba_high_ext) << 40
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lba28_sets_device_nibble() {
        let mut tfr = TaskFile::new(0x20);
        tfr.set_lba28(0x0A12_3456);
        assert_eq!(tfr.lba_low, 0x56);
        assert_eq!(tfr.lba_mid, 0x34);
        assert_eq!(tfr.lba_high, 0x12);
        assert_eq!(tfr.device & 0x0F, 0x0A);
        assert!(tfr.device & DEVICE_REG_LBA_MODE != 0);
        assert!(!tfr.uses_ext_fields());
    }

    #[test]
    fn lba48_populates_ext_shadows() {
        let mut tfr = TaskFile::new(0x24);
        tfr.set_lba48(0x0000_8877_6655_4433 & 0x0000_FFFF_FFFF_FFFF);
        assert_eq!(tfr.lba_low, 0x33);
        assert_eq!(tfr.lba_high, 0x55);
        assert_eq!(tfr.lba_low_ext, 0x66);
        assert_eq!(tfr.lba_high_ext, 0x88);
        assert_eq!(tfr.device & 0x0F, 0);
        assert!(tfr.uses_ext_fields());
    }

    #[test]
    fn chs_round_trips_through_registers() {
        let mut tfr = TaskFile::new(0x20);
        tfr.set_chs(0x1234, 0x05, 0x3F);
        assert_eq!(tfr.lba_low, 0x3F);
        assert_eq!(tfr.lba_mid, 0x34);
        assert_eq!(tfr.lba_high, 0x12);
        assert_eq!(tfr.device & 0x0F, 0x05);
    }

    #[test]
    fn return_taskfile_lba_views() {
        let rtfr = ReturnTaskFile {
            lba_low: 0x01,
            lba_mid: 0x02,
            lba_high: 0x03,
            lba_low_ext: 0x04,
            lba_mid_ext: 0x05,
            lba_high_ext: 0x06,
            device: 0xE7,
            ..ReturnTaskFile::default()
        };
        assert_eq!(rtfr.lba28(), 0x0703_0201);
        assert_eq!(rtfr.lba48(), 0x0605_0403_0201);
    }
}
