//! CDB builders for the handful of SCSI commands this library issues itself
//! (discovery probes). Byte layouts per SPC/SBC; all fields big-endian.

use crate::opcodes::{
    ATA_PASSTHROUGH_16, INQUIRY, READ_CAPACITY_10, READ_CAPACITY_16_SERVICE_ACTION, REQUEST_SENSE,
    SERVICE_ACTION_IN_16,
};

pub const INQUIRY_CDB_LEN: usize = 6;
pub const READ_CAPACITY_10_CDB_LEN: usize = 10;
pub const READ_CAPACITY_16_CDB_LEN: usize = 16;
pub const SAT_PASSTHROUGH_16_CDB_LEN: usize = 16;

pub fn inquiry_cdb(evpd: bool, page_code: u8, allocation_length: u16) -> [u8; INQUIRY_CDB_LEN] {
    let mut cdb = [0u8; INQUIRY_CDB_LEN];
    cdb[0] = INQUIRY;
    if evpd {
        cdb[1] = 0x01;
        cdb[2] = page_code;
    }
    cdb[3..5].copy_from_slice(&allocation_length.to_be_bytes());
    cdb
}

pub fn request_sense_cdb(descriptor_format: bool, allocation_length: u8) -> [u8; 6] {
    let mut cdb = [0u8; 6];
    cdb[0] = REQUEST_SENSE;
    if descriptor_format {
        cdb[1] = 0x01;
    }
    cdb[4] = allocation_length;
    cdb
}

pub fn read_capacity_10_cdb() -> [u8; READ_CAPACITY_10_CDB_LEN] {
    let mut cdb = [0u8; READ_CAPACITY_10_CDB_LEN];
    cdb[0] = READ_CAPACITY_10;
    cdb
}

pub fn read_capacity_16_cdb(allocation_length: u32) -> [u8; READ_CAPACITY_16_CDB_LEN] {
    let mut cdb = [0u8; READ_CAPACITY_16_CDB_LEN];
    cdb[0] = SERVICE_ACTION_IN_16;
    cdb[1] = READ_CAPACITY_16_SERVICE_ACTION;
    cdb[10..14].copy_from_slice(&allocation_length.to_be_bytes());
    cdb
}

/// ATA PASS-THROUGH(16) carrying an IDENTIFY DEVICE (or IDENTIFY PACKET
/// DEVICE): PIO data-in, one sector, length in the sector count field.
pub fn sat_identify_16_cdb(packet_device: bool) -> [u8; SAT_PASSTHROUGH_16_CDB_LEN] {
    let mut cdb = [0u8; SAT_PASSTHROUGH_16_CDB_LEN];
    cdb[0] = ATA_PASSTHROUGH_16;
    // Protocol 4 (PIO data-in) in bits 4:1.
    cdb[1] = 4 << 1;
    // T_DIR = in, BYT_BLOK = blocks, T_LENGTH = sector count field.
    cdb[2] = 0x08 | 0x04 | 0x02;
    cdb[6] = 1; // sector count
    cdb[14] = if packet_device { 0xA1 } else { 0xEC };
    cdb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inquiry_cdb_layout() {
        let cdb = inquiry_cdb(false, 0, 96);
        assert_eq!(cdb, [0x12, 0, 0, 0, 96, 0]);

        let cdb = inquiry_cdb(true, 0x89, 572);
        assert_eq!(cdb[1], 0x01);
        assert_eq!(cdb[2], 0x89);
        assert_eq!(u16::from_be_bytes([cdb[3], cdb[4]]), 572);
    }

    #[test]
    fn read_capacity_cdb_layouts() {
        assert_eq!(read_capacity_10_cdb()[0], 0x25);
        let cdb = read_capacity_16_cdb(32);
        assert_eq!(cdb[0], 0x9E);
        assert_eq!(cdb[1], 0x10);
        assert_eq!(u32::from_be_bytes([cdb[10], cdb[11], cdb[12], cdb[13]]), 32);
    }
}
