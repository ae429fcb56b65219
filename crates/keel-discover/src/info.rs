use keel_scsi::{MediaType, SatSignature};

use crate::quirks::Quirks;

/// How the host reaches the device, judged from inquiry version descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterfaceKind {
    /// No marker recognized; treated as a plain SCSI target.
    #[default]
    Scsi,
    /// USB or UAS attachment without a confirmed translation layer.
    Usb,
    /// A SCSI/ATA translation layer answered for the device.
    Sat,
    /// Direct ATA/ACS attachment.
    Ata,
    /// An NVMe device behind a USB bridge chip.
    NvmeBridge,
}

/// What kind of device ultimately answers commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    #[default]
    Scsi,
    Ata,
    Atapi,
    Nvme,
}

/// The discovery record, filled incrementally by the probe pipeline.
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    pub vendor: String,
    pub product: String,
    pub revision: String,
    pub serial: String,

    pub media_type: MediaType,
    pub interface: InterfaceKind,
    pub class: DeviceClass,
    pub quirks: Quirks,

    pub logical_block_size: u32,
    /// Logical size shifted by the exponent read capacity reports; equals
    /// the logical size when the device does not report one.
    pub physical_block_size: u32,
    pub max_lba: u64,
    pub lowest_aligned_lba: u16,
    /// Protection type 1..=3 when protection is enabled, 0 otherwise.
    pub protection_type: u8,

    /// Signature command the translation layer reported, when SAT answered.
    pub sat_signature: Option<SatSignature>,
    /// Raw ATA identify image, from the ATA Information VPD page or a direct
    /// passthrough identify.
    pub identify_data: Option<Box<[u8; 512]>>,
    /// Raw NVMe identify-controller image from a confirmed bridge probe.
    pub nvme_identify: Option<Box<[u8; 4096]>>,
}
