//! IDENTIFY DEVICE data helpers: word access, ATA string extraction, and the
//! 0xA5 checksum validation.

use keel_types::le_u16_at;

pub const IDENTIFY_DATA_LEN: usize = 512;

/// Offset of the checksum anchor byte; 0xA5 there means the final byte is a
/// two's-complement checksum over the preceding 511 bytes.
pub const CHECKSUM_ANCHOR_OFFSET: usize = 510;
pub const CHECKSUM_ANCHOR: u8 = 0xA5;

// Well-known identify words.
pub const WORD_GENERAL_CONFIG: usize = 0;
pub const WORD_SERIAL_START: usize = 10;
pub const WORD_SERIAL_END: usize = 19;
pub const WORD_FIRMWARE_START: usize = 23;
pub const WORD_FIRMWARE_END: usize = 26;
pub const WORD_MODEL_START: usize = 27;
pub const WORD_MODEL_END: usize = 46;
pub const WORD_CAPABILITIES: usize = 49;
pub const WORD_MAX_LBA28_LOW: usize = 60;
pub const WORD_MAX_LBA48_LOW: usize = 100;
pub const WORD_SECTOR_SIZE_INFO: usize = 106;

/// Little-endian word at the given identify word index (0 for out-of-range).
pub fn word(buf: &[u8], index: usize) -> u16 {
    le_u16_at(buf, index * 2)
}

/// ATA strings store two characters per word with the bytes swapped relative
/// to the word's little-endian storage; extract and trim the padding.
pub fn ata_string(buf: &[u8], word_start: usize, word_end: usize) -> String {
    let mut out = String::new();
    for idx in word_start..=word_end {
        let w = word(buf, idx);
        out.push((w >> 8) as u8 as char);
        out.push((w & 0xFF) as u8 as char);
    }
    out.trim().chars().filter(|c| !c.is_control()).collect()
}

pub fn model_number(buf: &[u8]) -> String {
    ata_string(buf, WORD_MODEL_START, WORD_MODEL_END)
}

pub fn serial_number(buf: &[u8]) -> String {
    ata_string(buf, WORD_SERIAL_START, WORD_SERIAL_END)
}

pub fn firmware_revision(buf: &[u8]) -> String {
    ata_string(buf, WORD_FIRMWARE_START, WORD_FIRMWARE_END)
}

/// 28-bit addressable sector count (words 60-61).
pub fn max_lba28(buf: &[u8]) -> u32 {
    u32::from(word(buf, WORD_MAX_LBA28_LOW)) | u32::from(word(buf, WORD_MAX_LBA28_LOW + 1)) << 16
}

/// 48-bit addressable sector count (words 100-103).
pub fn max_lba48(buf: &[u8]) -> u64 {
    (0..4).fold(0u64, |acc, i| {
        acc | u64::from(word(buf, WORD_MAX_LBA48_LOW + i)) << (16 * i)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumOutcome {
    Valid,
    Invalid,
    /// The anchor byte is absent; the words carry no checksum to validate.
    NotPresent,
}

/// Validate the identify-data checksum when the 0xA5 anchor is present. An
/// invalid checksum is a warning condition, not a command failure.
pub fn validate_checksum(buf: &[u8]) -> ChecksumOutcome {
    if buf.len() < IDENTIFY_DATA_LEN || buf[CHECKSUM_ANCHOR_OFFSET] != CHECKSUM_ANCHOR {
        return ChecksumOutcome::NotPresent;
    }
    let sum = buf[..IDENTIFY_DATA_LEN]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum == 0 {
        ChecksumOutcome::Valid
    } else {
        ChecksumOutcome::Invalid
    }
}

/// Identify data arrives as little-endian words; on big-endian builds the
/// canonical in-memory buffer is byte-swapped once after a successful read.
#[cfg(target_endian = "big")]
pub fn byte_swap_identify(buf: &mut [u8]) {
    for pair in buf.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

#[cfg(target_endian = "little")]
pub fn byte_swap_identify(_buf: &mut [u8]) {}
