//! The discovery pipeline.

use keel_passthrough::{
    commands::nvme as nvme_cmds, DataBuffer, NvmeBridgeTransport, ScsiTransport, SENSE_BUFFER_LEN,
};
use keel_scsi::{
    inquiry_cdb, is_ata_descriptor, is_sat_descriptor, is_usb_descriptor, read_capacity_10_cdb,
    read_capacity_16_cdb, sat_identify_16_cdb, AtaInformationVpd, InquiryParseError, SatSignature,
    SenseData, StandardInquiry, ATA_INFORMATION_VPD_LEN, STANDARD_INQUIRY_LEN,
};
use keel_types::{be_u16_at, be_u32_at, be_u64_at, ResultKind};
use thiserror::Error;

use crate::info::{DeviceClass, DeviceInfo, InterfaceKind};
use crate::quirks::{match_bridge, Quirks};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoverError {
    /// The initial inquiry failed; nothing can be learned about the device.
    #[error("standard inquiry failed: {0}")]
    CommandFailure(ResultKind),
    #[error(transparent)]
    MalformedInquiry(#[from] InquiryParseError),
}

const DISCOVERY_TIMEOUT_SECONDS: u32 = 15;

/// ASMedia NVMe bridges echo this additional-length in a secondary inquiry.
/// Vendor-observed on specific firmware; not generalized.
const ASMEDIA_INQUIRY_SIGNATURE: u8 = 0x47;

const READ_CAPACITY_10_LEN: usize = 8;
const READ_CAPACITY_16_LEN: usize = 32;

fn issue(transport: &mut dyn ScsiTransport, cdb: &[u8], buf: &mut [u8]) -> ResultKind {
    let mut sense_buf = [0u8; SENSE_BUFFER_LEN];
    let resp = transport.send_cdb(
        cdb,
        DataBuffer::In(buf),
        &mut sense_buf,
        DISCOVERY_TIMEOUT_SECONDS,
    );
    let sense = SenseData::parse(&sense_buf);
    if sense.valid_structure {
        sense.classify()
    } else {
        resp.result
    }
}

/// Run the discovery pipeline and fill a [`DeviceInfo`].
///
/// Only the opening inquiry is a hard error; every later probe logs its
/// verdict and degrades to plain-SCSI classification when it fails. Pass an
/// NVMe bridge transport to enable the NVMe-over-USB disambiguation probes.
pub fn fill_device_info(
    transport: &mut dyn ScsiTransport,
    mut nvme_bridge: Option<&mut dyn NvmeBridgeTransport>,
) -> Result<DeviceInfo, DiscoverError> {
    let mut info = DeviceInfo::default();

    // Step 1: standard inquiry, the one probe that must pass.
    let mut inq_buf = [0u8; STANDARD_INQUIRY_LEN];
    let result = issue(
        transport,
        &inquiry_cdb(false, 0, STANDARD_INQUIRY_LEN as u16),
        &mut inq_buf,
    );
    if !result.is_success_class() {
        return Err(DiscoverError::CommandFailure(result));
    }
    let inquiry = StandardInquiry::parse(&inq_buf)?;
    info.vendor = inquiry.vendor.clone();
    info.product = inquiry.product.clone();
    info.revision = inquiry.revision.clone();

    // Step 2: peripheral type seeds the media type; some types make SAT
    // probing pointless.
    info.media_type = inquiry.media_type();
    let sat_blocked = info.media_type.short_circuits_sat();

    // Step 3: version descriptor scan.
    let mut saw_usb = false;
    let mut saw_sat = false;
    let mut saw_ata = false;
    for &code in &inquiry.version_descriptors {
        saw_usb |= is_usb_descriptor(code);
        saw_sat |= is_sat_descriptor(code);
        saw_ata |= is_ata_descriptor(code);
    }
    info.interface = if saw_sat {
        InterfaceKind::Sat
    } else if saw_ata {
        InterfaceKind::Ata
    } else if saw_usb {
        InterfaceKind::Usb
    } else {
        InterfaceKind::Scsi
    };
    let sat_plausible = !sat_blocked && (saw_sat || saw_ata || saw_usb);
    tracing::debug!(
        interface = ?info.interface,
        sat_plausible,
        "version descriptor scan"
    );

    // Step 4: bridge-signature quirk table.
    if let Some(hit) = match_bridge(&info.vendor, &info.product, &info.revision) {
        tracing::debug!(quirks = ?hit.quirks, "bridge signature matched");
        info.quirks = hit.quirks;
    }

    // Step 5: SAT probing, VPD page first, direct identify as fallback.
    // Bridges that choke on VPD requests skip straight to the identify.
    let mut vpd_failed = false;
    if sat_plausible {
        if info.quirks.contains(Quirks::NO_VPD_PAGES) {
            probe_sat_identify(transport, &mut info);
        } else {
            vpd_failed = !probe_sat_vpd(transport, &mut info);
            if vpd_failed && !info.quirks.is_nvme_bridge() {
                probe_sat_identify(transport, &mut info);
            }
        }
    }

    // Step 6: NVMe-over-USB disambiguation, only when a bridge transport is
    // available and nothing has confirmed ATA yet.
    if info.class == DeviceClass::Scsi && !sat_blocked {
        if let Some(bridge) = nvme_bridge.as_deref_mut() {
            let confirmed = if info.quirks.is_nvme_bridge() {
                // JMicron/Realtek: a failing ATA VPD page on a matched
                // signature is the corroborating evidence.
                vpd_failed || info.quirks.contains(Quirks::NVME_ASMEDIA)
            } else {
                !saw_sat && !saw_ata && asmedia_signature(transport)
            };
            if confirmed {
                probe_nvme_identify(bridge, &mut info);
            }
        }
    }

    // Step 7: read capacity.
    probe_read_capacity(transport, &inquiry, &mut info);

    Ok(info)
}

/// ATA Information VPD page. Returns false when the page was unsupported or
/// malformed so the caller can fall back.
fn probe_sat_vpd(transport: &mut dyn ScsiTransport, info: &mut DeviceInfo) -> bool {
    let mut buf = [0u8; ATA_INFORMATION_VPD_LEN];
    let cdb = inquiry_cdb(true, keel_scsi::VPD_ATA_INFORMATION, buf.len() as u16);
    let result = issue(transport, &cdb, &mut buf);
    if !result.is_success_class() {
        tracing::debug!(%result, "ata information vpd refused");
        return false;
    }
    let Some(page) = AtaInformationVpd::parse(&buf) else {
        tracing::debug!("ata information vpd malformed");
        return false;
    };
    info.interface = InterfaceKind::Sat;
    info.sat_signature = Some(page.signature);
    info.class = match page.signature {
        SatSignature::Ata => DeviceClass::Ata,
        SatSignature::Atapi => DeviceClass::Atapi,
        SatSignature::Unknown(_) => DeviceClass::Scsi,
    };
    if let Some(identify) = page.identify_data {
        info.serial = keel_ata::identify::serial_number(&identify);
        info.identify_data = Some(Box::new(identify));
    }
    tracing::debug!(signature = ?page.signature, "sat vpd classified device");
    true
}

/// Direct SAT identify when the VPD page is unavailable.
fn probe_sat_identify(transport: &mut dyn ScsiTransport, info: &mut DeviceInfo) {
    let mut identify = [0u8; 512];
    let result = issue(transport, &sat_identify_16_cdb(false), &mut identify);
    if !result.is_success_class() {
        tracing::debug!(%result, "sat identify refused, staying plain scsi");
        return;
    }
    keel_ata::identify::byte_swap_identify(&mut identify);
    info.interface = InterfaceKind::Sat;
    info.class = DeviceClass::Ata;
    info.sat_signature = Some(SatSignature::Ata);
    info.serial = keel_ata::identify::serial_number(&identify);
    info.identify_data = Some(Box::new(identify));
}

/// Secondary-inquiry additional-length check for ASMedia NVMe bridges.
fn asmedia_signature(transport: &mut dyn ScsiTransport) -> bool {
    let mut buf = [0u8; STANDARD_INQUIRY_LEN];
    let result = issue(
        transport,
        &inquiry_cdb(false, 0, STANDARD_INQUIRY_LEN as u16),
        &mut buf,
    );
    result.is_success_class() && buf[4] == ASMEDIA_INQUIRY_SIGNATURE
}

/// Bridge NVMe identify; falls back to plain SCSI classification on failure.
fn probe_nvme_identify(bridge: &mut dyn NvmeBridgeTransport, info: &mut DeviceInfo) {
    let mut identify = Box::new([0u8; 4096]);
    let outcome = nvme_cmds::identify_controller(bridge, &mut identify);
    if !outcome.result.is_success_class() {
        tracing::debug!(result = %outcome.result, "bridge nvme identify refused");
        return;
    }
    info.interface = InterfaceKind::NvmeBridge;
    info.class = DeviceClass::Nvme;
    info.media_type = keel_scsi::MediaType::Disk;
    info.serial = nvme_ascii(&identify[4..24]);
    // Model string beats whatever the bridge put in the inquiry product.
    let model = nvme_ascii(&identify[24..64]);
    if !model.is_empty() {
        info.product = model;
    }
    info.nvme_identify = Some(identify);
}

fn nvme_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| b as char)
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

fn probe_read_capacity(
    transport: &mut dyn ScsiTransport,
    inquiry: &StandardInquiry,
    info: &mut DeviceInfo,
) {
    let mut buf10 = [0u8; READ_CAPACITY_10_LEN];
    let result = issue(transport, &read_capacity_10_cdb(), &mut buf10);
    if result.is_success_class() {
        // Byte 0..4 is the last LBA, not the count.
        info.max_lba = u64::from(be_u32_at(&buf10, 0));
        info.logical_block_size = be_u32_at(&buf10, 4);
        info.physical_block_size = info.logical_block_size;
    } else {
        tracing::debug!(%result, "read capacity 10 refused");
    }

    let wants_16 = inquiry.supports_read_capacity_16() || info.max_lba == u64::from(u32::MAX);
    if !wants_16 {
        return;
    }
    let mut buf16 = [0u8; READ_CAPACITY_16_LEN];
    let cdb = read_capacity_16_cdb(READ_CAPACITY_16_LEN as u32);
    let result = issue(transport, &cdb, &mut buf16);
    if !result.is_success_class() {
        tracing::debug!(%result, "read capacity 16 refused, keeping 10-byte data");
        return;
    }
    let max_lba = be_u64_at(&buf16, 0);
    if max_lba == 0 {
        // No better data; the 10-byte result stands.
        return;
    }
    info.max_lba = max_lba;
    info.logical_block_size = be_u32_at(&buf16, 8);
    let prot = buf16[12];
    info.protection_type = if prot & 0x01 != 0 {
        ((prot >> 1) & 0x07) + 1
    } else {
        0
    };
    let exponent = buf16[13] & 0x0F;
    info.physical_block_size = info.logical_block_size << exponent;
    info.lowest_aligned_lba = be_u16_at(&buf16, 14) & 0x3FFF;
}
