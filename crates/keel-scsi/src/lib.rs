//! SCSI wire formats: sense data, inquiry/VPD payloads, and the CDBs this
//! library needs to build itself.
//!
//! Everything here is a stateless transform over byte buffers. Parsing is
//! deliberately tolerant: a truncated or vendor-specific buffer produces a
//! zero-defaulted record with validity flags cleared, never a panic.

mod cdb;
mod inquiry;
mod sense;
mod version_descriptors;
mod vpd;

pub mod opcodes;

pub use cdb::{
    inquiry_cdb, read_capacity_10_cdb, read_capacity_16_cdb, request_sense_cdb,
    sat_identify_16_cdb, INQUIRY_CDB_LEN, READ_CAPACITY_10_CDB_LEN, READ_CAPACITY_16_CDB_LEN,
    SAT_PASSTHROUGH_16_CDB_LEN,
};
pub use inquiry::{InquiryParseError, MediaType, StandardInquiry, STANDARD_INQUIRY_LEN};
pub use sense::{
    check_sense_key_asc_ascq_and_fru, classify, describe_asc_ascq, describe_sense_key,
    AtaStatusReturnDescriptor, SenseData, SenseKeySpecific,
};
pub use version_descriptors::{
    is_ata_descriptor, is_sat_descriptor, is_usb_descriptor, lookup as lookup_version_descriptor,
};
pub use vpd::{
    AtaInformationVpd, SatSignature, ATA_INFORMATION_VPD_LEN, VPD_ATA_INFORMATION,
    VPD_DEVICE_IDENTIFICATION, VPD_SUPPORTED_PAGES, VPD_UNIT_SERIAL_NUMBER,
};

#[cfg(test)]
mod proptests;
