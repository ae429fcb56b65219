//! End-to-end discovery runs against a scripted SCSI device.

use std::time::Duration;

use keel_discover::{fill_device_info, DeviceClass, DiscoverError, InterfaceKind};
use keel_nvme::{CompletionEntry, NvmeCommand};
use keel_passthrough::{
    DataBuffer, NvmeBridgeResponse, NvmeBridgeTransport, ScsiTransport, TransportResponse,
};
use keel_scsi::{opcodes, MediaType, SatSignature, VPD_ATA_INFORMATION};
use keel_types::ResultKind;

/// A device that answers each probe from a canned payload, refusing with
/// `NotSupported` wherever no payload was provided.
#[derive(Default)]
struct FakeDevice {
    fail_inquiry: bool,
    inquiry: Vec<u8>,
    vpd_page: Option<Vec<u8>>,
    sat_identify: Option<Vec<u8>>,
    rc10: Option<[u8; 8]>,
    rc16: Option<[u8; 32]>,
    seen_opcodes: Vec<u8>,
    seen_vpd_pages: Vec<u8>,
}

impl FakeDevice {
    fn answer(&self, payload: Option<&[u8]>, data: DataBuffer<'_>) -> TransportResponse {
        let result = match (payload, data) {
            (Some(src), DataBuffer::In(dst)) => {
                let n = src.len().min(dst.len());
                dst[..n].copy_from_slice(&src[..n]);
                ResultKind::Success
            }
            _ => ResultKind::NotSupported,
        };
        TransportResponse {
            result,
            elapsed: Duration::from_millis(1),
        }
    }
}

impl ScsiTransport for FakeDevice {
    fn send_cdb(
        &mut self,
        cdb: &[u8],
        data: DataBuffer<'_>,
        _sense: &mut [u8],
        _timeout_seconds: u32,
    ) -> TransportResponse {
        self.seen_opcodes.push(cdb[0]);
        match cdb[0] {
            opcodes::INQUIRY if cdb[1] & 0x01 != 0 => {
                self.seen_vpd_pages.push(cdb[2]);
                if cdb[2] == VPD_ATA_INFORMATION {
                    self.answer(self.vpd_page.as_deref(), data)
                } else {
                    self.answer(None, data)
                }
            }
            opcodes::INQUIRY => {
                if self.fail_inquiry {
                    self.answer(None, data)
                } else {
                    self.answer(Some(self.inquiry.as_slice()), data)
                }
            }
            opcodes::ATA_PASSTHROUGH_16 => self.answer(self.sat_identify.as_deref(), data),
            opcodes::READ_CAPACITY_10 => self.answer(self.rc10.as_ref().map(|b| &b[..]), data),
            opcodes::SERVICE_ACTION_IN_16 => self.answer(self.rc16.as_ref().map(|b| &b[..]), data),
            _ => self.answer(None, data),
        }
    }
}

/// Admin-only NVMe bridge returning one canned identify-controller payload.
struct FakeBridge {
    identify: Vec<u8>,
    admin_opcodes: Vec<u8>,
}

impl NvmeBridgeTransport for FakeBridge {
    fn send_admin(
        &mut self,
        command: &NvmeCommand,
        data: DataBuffer<'_>,
        _timeout_seconds: u32,
    ) -> NvmeBridgeResponse {
        self.admin_opcodes.push(command.opcode());
        if let DataBuffer::In(dst) = data {
            let n = self.identify.len().min(dst.len());
            dst[..n].copy_from_slice(&self.identify[..n]);
        }
        NvmeBridgeResponse {
            completion: CompletionEntry::with_all(0, 0, 0, 0),
            result: ResultKind::Success,
            elapsed: Duration::from_millis(2),
        }
    }
}

fn inquiry_payload(
    peripheral_type: u8,
    version: u8,
    vendor: &str,
    product: &str,
    revision: &str,
    descriptors: &[u16],
) -> Vec<u8> {
    let mut buf = vec![0u8; 96];
    buf[0] = peripheral_type;
    buf[2] = version;
    buf[4] = 91;
    fill_ascii(&mut buf[8..16], vendor);
    fill_ascii(&mut buf[16..32], product);
    fill_ascii(&mut buf[32..36], revision);
    for (i, &code) in descriptors.iter().enumerate() {
        buf[58 + i * 2..60 + i * 2].copy_from_slice(&code.to_be_bytes());
    }
    buf
}

fn fill_ascii(slot: &mut [u8], text: &str) {
    slot.fill(b' ');
    let n = text.len().min(slot.len());
    slot[..n].copy_from_slice(&text.as_bytes()[..n]);
}

/// Identify-device image with an ATA string at the serial words.
fn identify_with_serial(serial: &str) -> Vec<u8> {
    let mut buf = vec![0u8; 512];
    let padded: Vec<u8> = serial
        .bytes()
        .chain(std::iter::repeat(b' '))
        .take(20)
        .collect();
    for (i, pair) in padded.chunks(2).enumerate() {
        let off = (10 + i) * 2;
        // ATA strings swap the two characters within each word.
        buf[off] = pair[1];
        buf[off + 1] = pair[0];
    }
    buf
}

fn ata_information_vpd(signature: u8, identify: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; 572];
    buf[1] = VPD_ATA_INFORMATION;
    buf[2..4].copy_from_slice(&568u16.to_be_bytes());
    buf[56] = signature;
    buf[60..60 + 512].copy_from_slice(identify);
    buf
}

fn rc10(max_lba: u32, block_size: u32) -> [u8; 8] {
    let mut buf = [0u8; 8];
    buf[..4].copy_from_slice(&max_lba.to_be_bytes());
    buf[4..].copy_from_slice(&block_size.to_be_bytes());
    buf
}

fn rc16(max_lba: u64, block_size: u32, lbppbe: u8, lowest_aligned: u16) -> [u8; 32] {
    let mut buf = [0u8; 32];
    buf[..8].copy_from_slice(&max_lba.to_be_bytes());
    buf[8..12].copy_from_slice(&block_size.to_be_bytes());
    buf[13] = lbppbe & 0x0F;
    buf[14..16].copy_from_slice(&lowest_aligned.to_be_bytes());
    buf
}

#[test]
fn sat_disk_classified_through_vpd_page() {
    let identify = identify_with_serial("S6PNNS0W123456A");
    let mut dev = FakeDevice {
        inquiry: inquiry_payload(0x00, 0x06, "ATA", "Samsung SSD 870", "1B6Q", &[0x1EA0]),
        vpd_page: Some(ata_information_vpd(0xEC, &identify)),
        rc10: Some(rc10(u32::MAX, 512)),
        rc16: Some(rc16(0x74706DB7, 512, 3, 0)),
        ..FakeDevice::default()
    };

    let info = fill_device_info(&mut dev, None).unwrap();

    assert_eq!(info.vendor, "ATA");
    assert_eq!(info.product, "Samsung SSD 870");
    assert_eq!(info.media_type, MediaType::Disk);
    assert_eq!(info.interface, InterfaceKind::Sat);
    assert_eq!(info.class, DeviceClass::Ata);
    assert_eq!(info.sat_signature, Some(SatSignature::Ata));
    assert_eq!(info.serial, "S6PNNS0W123456A");
    assert!(info.identify_data.is_some());
    assert_eq!(info.max_lba, 0x74706DB7);
    assert_eq!(info.logical_block_size, 512);
    assert_eq!(info.physical_block_size, 4096);
    assert_eq!(info.protection_type, 0);
    assert_eq!(dev.seen_vpd_pages, vec![VPD_ATA_INFORMATION]);
}

#[test]
fn inquiry_failure_aborts_discovery() {
    let mut dev = FakeDevice {
        fail_inquiry: true,
        ..FakeDevice::default()
    };

    let err = fill_device_info(&mut dev, None).unwrap_err();
    assert_eq!(err, DiscoverError::CommandFailure(ResultKind::NotSupported));
    // Nothing past the opening inquiry goes on the wire.
    assert_eq!(dev.seen_opcodes, vec![opcodes::INQUIRY]);
}

#[test]
fn tape_short_circuits_ata_probing() {
    let mut dev = FakeDevice {
        inquiry: inquiry_payload(0x01, 0x06, "HP", "Ultrium 8-SCSI", "J6ES", &[0x1EA0]),
        ..FakeDevice::default()
    };

    let info = fill_device_info(&mut dev, None).unwrap();

    assert_eq!(info.media_type, MediaType::Tape);
    assert_eq!(info.class, DeviceClass::Scsi);
    assert!(info.identify_data.is_none());
    assert!(!dev.seen_opcodes.contains(&opcodes::ATA_PASSTHROUGH_16));
    assert!(dev.seen_vpd_pages.is_empty());
    // Capacity probing still runs; both refusals are tolerated.
    assert!(dev.seen_opcodes.contains(&opcodes::READ_CAPACITY_10));
}

#[test]
fn sat_identify_fallback_when_vpd_refused() {
    let mut dev = FakeDevice {
        inquiry: inquiry_payload(0x00, 0x06, "WDC", "Elements 25A3", "1021", &[0x1EA0]),
        sat_identify: Some(identify_with_serial("WD-WCC7K1234567")),
        rc10: Some(rc10(0x001FFFFF, 512)),
        ..FakeDevice::default()
    };

    let info = fill_device_info(&mut dev, None).unwrap();

    assert_eq!(info.interface, InterfaceKind::Sat);
    assert_eq!(info.class, DeviceClass::Ata);
    assert_eq!(info.serial, "WD-WCC7K1234567");
    assert!(dev.seen_opcodes.contains(&opcodes::ATA_PASSTHROUGH_16));
}

#[test]
fn vpd_averse_bridge_goes_straight_to_identify() {
    // Prolific bridges carry NO_VPD_PAGES; the VPD probe must never hit the
    // wire and the direct identify still classifies the disk as ATA.
    let mut dev = FakeDevice {
        inquiry: inquiry_payload(0x00, 0x06, "Prolific", "ATAPI-6 Bridge C", "0033", &[0x1EA0]),
        vpd_page: Some(ata_information_vpd(0xEC, &identify_with_serial("X"))),
        sat_identify: Some(identify_with_serial("5RY83KWP")),
        rc10: Some(rc10(0x04A8_52AF, 512)),
        ..FakeDevice::default()
    };

    let info = fill_device_info(&mut dev, None).unwrap();

    assert_eq!(info.class, DeviceClass::Ata);
    assert_eq!(info.interface, InterfaceKind::Sat);
    assert_eq!(info.serial, "5RY83KWP");
    assert!(dev.seen_vpd_pages.is_empty());
    assert!(dev.seen_opcodes.contains(&opcodes::ATA_PASSTHROUGH_16));
}

#[test]
fn jmicron_nvme_bridge_disambiguated() {
    let mut dev = FakeDevice {
        inquiry: inquiry_payload(0x00, 0x06, "JMicron", "JMS583", "0204", &[0x1728]),
        rc10: Some(rc10(0x0E8E0887, 512)),
        ..FakeDevice::default()
    };
    let mut identify = vec![0u8; 4096];
    fill_ascii(&mut identify[4..24], "S4EWNX0R123456");
    fill_ascii(&mut identify[24..64], "Samsung SSD 970 EVO 500GB");
    let mut bridge = FakeBridge {
        identify,
        admin_opcodes: Vec::new(),
    };

    let info = fill_device_info(&mut dev, Some(&mut bridge)).unwrap();

    assert_eq!(info.interface, InterfaceKind::NvmeBridge);
    assert_eq!(info.class, DeviceClass::Nvme);
    assert_eq!(info.serial, "S4EWNX0R123456");
    // NVMe model string wins over the bridge's inquiry product.
    assert_eq!(info.product, "Samsung SSD 970 EVO 500GB");
    assert!(info.nvme_identify.is_some());
    // Failed VPD page was the corroborating probe; no raw identify attempt.
    assert_eq!(dev.seen_vpd_pages, vec![VPD_ATA_INFORMATION]);
    assert!(!dev.seen_opcodes.contains(&opcodes::ATA_PASSTHROUGH_16));
    assert_eq!(bridge.admin_opcodes, vec![keel_nvme::ids::ADMIN_IDENTIFY]);
}

#[test]
fn asmedia_signature_detected_without_quirk_match() {
    // No version descriptors, unknown strings: only the secondary-inquiry
    // additional-length signature identifies the bridge.
    let mut inquiry = inquiry_payload(0x00, 0x06, "Generic", "External", "1.00", &[]);
    inquiry[4] = 0x47;
    let mut dev = FakeDevice {
        inquiry,
        ..FakeDevice::default()
    };
    let mut identify = vec![0u8; 4096];
    fill_ascii(&mut identify[4..24], "PHBT81234567");
    fill_ascii(&mut identify[24..64], "INTEL SSDPEKNW512G8");
    let mut bridge = FakeBridge {
        identify,
        admin_opcodes: Vec::new(),
    };

    let info = fill_device_info(&mut dev, Some(&mut bridge)).unwrap();

    assert_eq!(info.class, DeviceClass::Nvme);
    assert_eq!(info.product, "INTEL SSDPEKNW512G8");
    let inquiries = dev
        .seen_opcodes
        .iter()
        .filter(|&&op| op == opcodes::INQUIRY)
        .count();
    assert!(inquiries >= 2);
}

#[test]
fn zero_max_lba_from_rc16_keeps_rc10_data() {
    let mut dev = FakeDevice {
        inquiry: inquiry_payload(0x00, 0x06, "ATA", "OldDisk", "0001", &[]),
        rc10: Some(rc10(0x00A03B5F, 512)),
        rc16: Some(rc16(0, 4096, 0, 0)),
        ..FakeDevice::default()
    };

    let info = fill_device_info(&mut dev, None).unwrap();

    assert_eq!(info.max_lba, 0x00A03B5F);
    assert_eq!(info.logical_block_size, 512);
    assert_eq!(info.physical_block_size, 512);
    assert!(dev.seen_opcodes.contains(&opcodes::SERVICE_ACTION_IN_16));
}
