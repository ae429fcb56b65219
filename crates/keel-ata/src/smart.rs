//! SMART wire records: attribute and threshold entries (12 bytes each) and
//! the 512-byte log directory.

use keel_types::le_u16_at;

pub const SMART_ATTRIBUTE_LEN: usize = 12;
pub const SMART_THRESHOLD_LEN: usize = 12;
pub const SMART_LOG_DIRECTORY_LEN: usize = 512;

/// Offset of the first attribute entry within the SMART data sector.
pub const SMART_DATA_ATTRIBUTES_OFFSET: usize = 2;
pub const SMART_MAX_ATTRIBUTES: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartAttribute {
    pub id: u8,
    pub status_flags: u16,
    pub nominal: u8,
    pub worst: u8,
    pub raw: [u8; 6],
    pub vendor: u8,
}

impl SmartAttribute {
    /// Parse one 12-byte attribute entry. An id of zero marks an unused slot.
    pub fn parse(buf: &[u8]) -> Option<SmartAttribute> {
        if buf.len() < SMART_ATTRIBUTE_LEN || buf[0] == 0 {
            return None;
        }
        let mut raw = [0u8; 6];
        raw.copy_from_slice(&buf[5..11]);
        Some(SmartAttribute {
            id: buf[0],
            status_flags: le_u16_at(buf, 1),
            nominal: buf[3],
            worst: buf[4],
            raw,
            vendor: buf[11],
        })
    }

    /// Pre-fail attributes participate in the SMART tripped verdict.
    pub fn is_pre_fail(&self) -> bool {
        self.status_flags & 0x0001 != 0
    }

    /// Low 48-bit raw value as a little-endian integer.
    pub fn raw_value(&self) -> u64 {
        self.raw
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | u64::from(b) << (8 * i))
    }
}

/// Iterate the attribute table embedded in a SMART READ DATA sector.
pub fn attributes(data: &[u8]) -> impl Iterator<Item = SmartAttribute> + '_ {
    (0..SMART_MAX_ATTRIBUTES).filter_map(move |i| {
        let off = SMART_DATA_ATTRIBUTES_OFFSET + i * SMART_ATTRIBUTE_LEN;
        data.get(off..off + SMART_ATTRIBUTE_LEN)
            .and_then(SmartAttribute::parse)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartThreshold {
    pub id: u8,
    pub threshold: u8,
}

impl SmartThreshold {
    pub fn parse(buf: &[u8]) -> Option<SmartThreshold> {
        if buf.len() < SMART_THRESHOLD_LEN || buf[0] == 0 {
            return None;
        }
        Some(SmartThreshold {
            id: buf[0],
            threshold: buf[1],
        })
    }
}

pub fn thresholds(data: &[u8]) -> impl Iterator<Item = SmartThreshold> + '_ {
    (0..SMART_MAX_ATTRIBUTES).filter_map(move |i| {
        let off = SMART_DATA_ATTRIBUTES_OFFSET + i * SMART_THRESHOLD_LEN;
        data.get(off..off + SMART_THRESHOLD_LEN)
            .and_then(SmartThreshold::parse)
    })
}

/// SMART log directory: word-indexed table of per-log sector counts
/// (word N = number of 512-byte sectors in log address N).
#[derive(Debug, Clone)]
pub struct SmartLogDirectory {
    data: [u8; SMART_LOG_DIRECTORY_LEN],
}

impl SmartLogDirectory {
    pub fn parse(buf: &[u8]) -> Option<SmartLogDirectory> {
        let data: [u8; SMART_LOG_DIRECTORY_LEN] = buf.get(..SMART_LOG_DIRECTORY_LEN)?.try_into().ok()?;
        Some(SmartLogDirectory { data })
    }

    /// Directory version (word 0); 0x01 for the multi-sector directory.
    pub fn version(&self) -> u16 {
        le_u16_at(&self.data, 0)
    }

    /// Number of sectors available at `log_address` (0 = log unsupported).
    pub fn sectors_in_log(&self, log_address: u8) -> u16 {
        le_u16_at(&self.data, usize::from(log_address) * 2)
    }
}
