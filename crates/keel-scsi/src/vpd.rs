//! VPD page constants and the ATA Information page (0x89) parser.

use keel_types::be_u16_at;

pub const VPD_SUPPORTED_PAGES: u8 = 0x00;
pub const VPD_UNIT_SERIAL_NUMBER: u8 = 0x80;
pub const VPD_DEVICE_IDENTIFICATION: u8 = 0x83;
pub const VPD_ATA_INFORMATION: u8 = 0x89;

/// Full size of the ATA Information VPD page (572 bytes).
pub const ATA_INFORMATION_VPD_LEN: usize = 572;

/// Signature command code from the ATA Information page: which identify
/// command the SAT layer issued to the attached device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatSignature {
    /// 0xEC IDENTIFY DEVICE: an ATA device behind the translator.
    Ata,
    /// 0xA1 IDENTIFY PACKET DEVICE: an ATAPI device.
    Atapi,
    Unknown(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtaInformationVpd {
    pub sat_vendor: String,
    pub sat_product: String,
    pub sat_revision: String,
    pub signature: SatSignature,
    /// The embedded 512-byte identify image, when the page carried it whole.
    pub identify_data: Option<[u8; 512]>,
}

impl AtaInformationVpd {
    /// Parse the page, validating that the device echoed the requested page
    /// number (a translator that ignores EVPD returns standard inquiry data
    /// here, which this check rejects).
    pub fn parse(buf: &[u8]) -> Option<AtaInformationVpd> {
        if buf.len() < 60 || buf[1] != VPD_ATA_INFORMATION {
            return None;
        }
        let page_len = usize::from(be_u16_at(buf, 2));
        if page_len < 56 {
            return None;
        }

        let signature = match buf[56] {
            0xEC => SatSignature::Ata,
            0xA1 => SatSignature::Atapi,
            other => SatSignature::Unknown(other),
        };

        let identify_data = buf.get(60..60 + 512).map(|id| {
            let mut out = [0u8; 512];
            out.copy_from_slice(id);
            out
        });

        Some(AtaInformationVpd {
            sat_vendor: ascii_field(&buf[8..16]),
            sat_product: ascii_field(&buf[16..32]),
            sat_revision: ascii_field(&buf[32..36]),
            signature,
            identify_data,
        })
    }
}

fn ascii_field(bytes: &[u8]) -> String {
    let s: String = bytes
        .iter()
        .filter(|b| b.is_ascii() && !b.is_ascii_control())
        .map(|&b| b as char)
        .collect();
    s.trim().to_string()
}
