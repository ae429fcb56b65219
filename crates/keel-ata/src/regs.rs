//! ATA command opcodes and register bit definitions.

use bitflags::bitflags;

// Command opcodes (ACS; legacy opcodes retained where bridges still use them).
pub const ATA_NOP: u8 = 0x00;
pub const ATA_READ_SECT: u8 = 0x20;
pub const ATA_READ_SECT_EXT: u8 = 0x24;
pub const ATA_READ_DMA_EXT: u8 = 0x25;
pub const ATA_READ_MULTIPLE_EXT: u8 = 0x29;
pub const ATA_WRITE_SECT: u8 = 0x30;
pub const ATA_WRITE_SECT_EXT: u8 = 0x34;
pub const ATA_WRITE_DMA_EXT: u8 = 0x35;
pub const ATA_WRITE_MULTIPLE_EXT: u8 = 0x39;
pub const ATA_READ_VERIFY: u8 = 0x40;
pub const ATA_READ_VERIFY_EXT: u8 = 0x42;
pub const ATA_FORMAT_TRACK: u8 = 0x50;
pub const ATA_SEEK: u8 = 0x70;
pub const ATA_IDENTIFY_PACKET: u8 = 0xA1;
pub const ATA_SMART: u8 = 0xB0;
pub const ATA_READ_MULTIPLE: u8 = 0xC4;
pub const ATA_WRITE_MULTIPLE: u8 = 0xC5;
pub const ATA_READ_DMA: u8 = 0xC8;
pub const ATA_WRITE_DMA: u8 = 0xCA;
pub const ATA_STANDBY_IMMEDIATE: u8 = 0xE0;
pub const ATA_CHECK_POWER_MODE: u8 = 0xE5;
pub const ATA_FLUSH_CACHE: u8 = 0xE7;
pub const ATA_FLUSH_CACHE_EXT: u8 = 0xEA;
pub const ATA_IDENTIFY: u8 = 0xEC;
pub const ATA_IDENTIFY_DMA: u8 = 0xEE;
pub const ATA_SET_FEATURES: u8 = 0xEF;

// SMART feature-register subcommands; SMART commands also require the
// 0xC24F key in the LBA mid/high registers.
pub const SMART_READ_DATA: u8 = 0xD0;
pub const SMART_READ_THRESHOLDS: u8 = 0xD1;
pub const SMART_READ_LOG: u8 = 0xD5;
pub const SMART_WRITE_LOG: u8 = 0xD6;
pub const SMART_ENABLE: u8 = 0xD8;
pub const SMART_DISABLE: u8 = 0xD9;
pub const SMART_RETURN_STATUS: u8 = 0xDA;
pub const SMART_LBA_MID_KEY: u8 = 0x4F;
pub const SMART_LBA_HI_KEY: u8 = 0xC2;

/// Device/head register: bits 7 and 5 are obsolete-but-conventionally-set,
/// bit 6 selects LBA addressing, bit 4 selects device 1.
pub const DEVICE_REG_BASE: u8 = 0xA0;
pub const DEVICE_REG_LBA_MODE: u8 = 0x40;
pub const DEVICE_REG_DEV1: u8 = 0x10;

bitflags! {
    /// Status register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AtaStatus: u8 {
        const BUSY = 0x80;
        const READY = 0x40;
        const DEVICE_FAULT = 0x20;
        const SEEK_COMPLETE = 0x10;
        const DATA_REQUEST = 0x08;
        const CORRECTED = 0x04;
        const INDEX = 0x02;
        const ERROR = 0x01;
    }
}

bitflags! {
    /// Error register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AtaError: u8 {
        const INTERFACE_CRC = 0x80;
        const UNCORRECTABLE = 0x40;
        const MEDIA_CHANGE = 0x20;
        const ID_NOT_FOUND = 0x10;
        const MEDIA_CHANGE_REQUEST = 0x08;
        const ABORT = 0x04;
        const TRACK0_NOT_FOUND = 0x02;
        const ADDRESS_MARK_NOT_FOUND = 0x01;
    }
}

/// Status byte value a bridge synthesizes for a passing command when real
/// returned registers are unavailable.
pub const SYNTHESIZED_GOOD_STATUS: u8 = AtaStatus::READY.bits() | AtaStatus::SEEK_COMPLETE.bits();
