//! Standard INQUIRY payload parsing.

use keel_types::be_u16_at;
use thiserror::Error;

/// Minimum standard inquiry allocation the discovery pipeline requests.
pub const STANDARD_INQUIRY_LEN: usize = 96;

/// Offset of the first version descriptor in the standard inquiry payload.
const VERSION_DESCRIPTOR_OFFSET: usize = 58;
pub const MAX_VERSION_DESCRIPTORS: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InquiryParseError {
    #[error("inquiry payload too short: {0} bytes (need at least 36)")]
    TooShort(usize),
}

/// Initial media-type guess from the inquiry peripheral device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    #[default]
    Disk,
    Tape,
    Optical,
    RaidController,
    Enclosure,
    ZonedDisk,
    Unknown,
}

impl MediaType {
    pub fn from_peripheral_type(peripheral_type: u8) -> MediaType {
        match peripheral_type {
            0x00 => MediaType::Disk,
            0x01 => MediaType::Tape,
            0x04 | 0x05 | 0x07 => MediaType::Optical,
            0x0C => MediaType::RaidController,
            0x0D => MediaType::Enclosure,
            0x14 => MediaType::ZonedDisk,
            _ => MediaType::Unknown,
        }
    }

    /// Types for which SAT probing is pointless.
    pub fn short_circuits_sat(self) -> bool {
        matches!(
            self,
            MediaType::Tape | MediaType::Optical | MediaType::RaidController | MediaType::Enclosure
        )
    }
}

/// Parsed standard INQUIRY data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardInquiry {
    pub peripheral_qualifier: u8,
    pub peripheral_type: u8,
    pub removable: bool,
    /// SPC version claimed in byte 2.
    pub version: u8,
    pub response_data_format: u8,
    pub additional_length: u8,
    pub vendor: String,
    pub product: String,
    pub revision: String,
    /// Version descriptors present within the returned length, zeros skipped.
    pub version_descriptors: Vec<u16>,
    /// Total bytes the device claims for this payload (additional length + 5).
    pub returned_length: usize,
}

impl StandardInquiry {
    pub fn parse(buf: &[u8]) -> Result<StandardInquiry, InquiryParseError> {
        if buf.len() < 36 {
            return Err(InquiryParseError::TooShort(buf.len()));
        }

        let additional_length = buf[4];
        let returned_length = (usize::from(additional_length) + 5).min(buf.len());

        let mut version_descriptors = Vec::new();
        if returned_length > VERSION_DESCRIPTOR_OFFSET {
            for i in 0..MAX_VERSION_DESCRIPTORS {
                let off = VERSION_DESCRIPTOR_OFFSET + i * 2;
                if off + 2 > returned_length {
                    break;
                }
                let code = be_u16_at(buf, off);
                if code != 0 {
                    version_descriptors.push(code);
                }
            }
        }

        Ok(StandardInquiry {
            peripheral_qualifier: buf[0] >> 5,
            peripheral_type: buf[0] & 0x1F,
            removable: buf[1] & 0x80 != 0,
            version: buf[2],
            response_data_format: buf[3] & 0x0F,
            additional_length,
            vendor: ascii_field(&buf[8..16]),
            product: ascii_field(&buf[16..32]),
            revision: ascii_field(&buf[32..36]),
            version_descriptors,
            returned_length,
        })
    }

    pub fn media_type(&self) -> MediaType {
        MediaType::from_peripheral_type(self.peripheral_type)
    }

    /// SPC version byte gates whether 16-byte READ CAPACITY is worth issuing
    /// (SPC-3 and newer).
    pub fn supports_read_capacity_16(&self) -> bool {
        self.version >= 0x05
    }
}

/// Space-padded ASCII field; non-printable bytes are dropped, padding trimmed.
fn ascii_field(bytes: &[u8]) -> String {
    let s: String = bytes
        .iter()
        .filter(|b| b.is_ascii() && !b.is_ascii_control())
        .map(|&b| b as char)
        .collect();
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_inquiry() -> Vec<u8> {
        let mut buf = vec![0u8; 96];
        buf[0] = 0x00; // direct-access
        buf[1] = 0x00;
        buf[2] = 0x06; // SPC-4
        buf[3] = 0x02;
        buf[4] = 91; // additional length -> returned length 96
        buf[8..16].copy_from_slice(b"ACME    ");
        buf[16..32].copy_from_slice(b"USB BRIDGE 3000 ");
        buf[32..36].copy_from_slice(b"1.02");
        // Version descriptors: one SAT, one zero (skipped).
        buf[58..60].copy_from_slice(&0x1EA0u16.to_be_bytes());
        buf
    }

    #[test]
    fn parses_strings_and_descriptors() {
        let inq = StandardInquiry::parse(&sample_inquiry()).unwrap();
        assert_eq!(inq.vendor, "ACME");
        assert_eq!(inq.product, "USB BRIDGE 3000");
        assert_eq!(inq.revision, "1.02");
        assert_eq!(inq.version_descriptors, vec![0x1EA0]);
        assert_eq!(inq.media_type(), MediaType::Disk);
        assert!(inq.supports_read_capacity_16());
    }

    #[test]
    fn descriptors_only_read_within_returned_length() {
        let mut buf = sample_inquiry();
        buf[4] = 52; // returned length 57 < descriptor offset
        let inq = StandardInquiry::parse(&buf).unwrap();
        assert!(inq.version_descriptors.is_empty());
    }

    #[test]
    fn short_buffer_is_an_error() {
        // Compared by value; callers embed this error in their own enums.
        assert_eq!(
            StandardInquiry::parse(&[0u8; 20]).unwrap_err(),
            InquiryParseError::TooShort(20)
        );
    }

    #[test]
    fn peripheral_types_map_to_media() {
        assert_eq!(MediaType::from_peripheral_type(0x01), MediaType::Tape);
        assert_eq!(MediaType::from_peripheral_type(0x05), MediaType::Optical);
        assert!(MediaType::from_peripheral_type(0x0C).short_circuits_sat());
        assert!(!MediaType::from_peripheral_type(0x00).short_circuits_sat());
    }
}
