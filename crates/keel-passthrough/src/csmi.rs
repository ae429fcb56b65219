//! CSMI passthrough CDB: one 16-byte vendor CDB (opcode 0xE0) carrying the
//! complete task file plus a transfer-length word.
//!
//! Layout:
//!
//! ```text
//! 0      opcode (0xE0)
//! 1      protocol id (bits 6:0), bit 7 = length is a 512-byte block count
//! 2..12  register pairs, ext shadow first: feature, sector count,
//!        LBA low / mid / high
//! 12     device
//! 13     command
//! 14..16 big-endian length: word count, zero, or block count per the
//!        command's length policy
//! ```

use keel_ata::{AtaCommand, Direction, LengthPolicy, Protocol};

use crate::error::EncodeError;

pub const CSMI_CDB_LEN: usize = 16;
pub const CSMI_OPCODE: u8 = 0xE0;

const PROTO_BLOCKS_BIT: u8 = 0x80;

// Protocol identifiers, byte 1 bits 6:0.
const PROTO_NON_DATA: u8 = 0x03;
const PROTO_PIO_IN: u8 = 0x04;
const PROTO_PIO_OUT: u8 = 0x05;
const PROTO_DMA: u8 = 0x06;
const PROTO_DMA_QUEUED: u8 = 0x07;
const PROTO_DEVICE_DIAGNOSTIC: u8 = 0x08;
const PROTO_UDMA_IN: u8 = 0x0A;
const PROTO_UDMA_OUT: u8 = 0x0B;
const PROTO_FPDMA: u8 = 0x0C;

fn protocol_id(cmd: &AtaCommand) -> Result<u8, EncodeError> {
    match (cmd.protocol, cmd.direction) {
        (Protocol::NoData, _) => Ok(PROTO_NON_DATA),
        (Protocol::Pio, Direction::In) => Ok(PROTO_PIO_IN),
        (Protocol::Pio, Direction::Out) => Ok(PROTO_PIO_OUT),
        (Protocol::Pio, Direction::None) => Ok(PROTO_NON_DATA),
        (Protocol::Dma, _) => Ok(PROTO_DMA),
        (Protocol::DmaQueued, _) => Ok(PROTO_DMA_QUEUED),
        (Protocol::DeviceDiagnostic, _) => Ok(PROTO_DEVICE_DIAGNOSTIC),
        (Protocol::Udma, Direction::Out) => Ok(PROTO_UDMA_OUT),
        (Protocol::Udma, _) => Ok(PROTO_UDMA_IN),
        (Protocol::Fpdma, _) => Ok(PROTO_FPDMA),
        (Protocol::Packet, _)
        | (Protocol::DeviceReset, _)
        | (Protocol::SoftReset, _)
        | (Protocol::HardReset, _) => {
            Err(EncodeError::NotAvailable("reset/packet protocol"))
        }
    }
}

/// Serialize an [`AtaCommand`] into the CSMI CDB.
///
/// Refuses with `NotAvailable` when the task file carries ICC/AUX bytes,
/// when a byte-count transfer exceeds 65535 words, or when the protocol has
/// no identifier in this CDB family.
pub fn encode(cmd: &AtaCommand) -> Result<[u8; CSMI_CDB_LEN], EncodeError> {
    if cmd.tfr.uses_icc_or_aux() {
        return Err(EncodeError::NotAvailable("ICC/AUX registers"));
    }

    let mut cdb = [0u8; CSMI_CDB_LEN];
    cdb[0] = CSMI_OPCODE;
    cdb[1] = protocol_id(cmd)?;

    let length: u16 = match cmd.length_policy {
        LengthPolicy::NoData => 0,
        LengthPolicy::Bytes => {
            let words = cmd.data_length / 2;
            if words > 0xFFFF {
                return Err(EncodeError::NotAvailable("word count over 16 bits"));
            }
            words as u16
        }
        LengthPolicy::SectorCount | LengthPolicy::Blocks512 => {
            let blocks = cmd.data_length / 512;
            if blocks > 0xFFFF {
                return Err(EncodeError::NotAvailable("block count over 16 bits"));
            }
            cdb[1] |= PROTO_BLOCKS_BIT;
            blocks as u16
        }
    };

    let tfr = &cmd.tfr;
    if cmd.command_type.is_extended() {
        cdb[2] = tfr.feature_ext;
        cdb[4] = tfr.sector_count_ext;
        cdb[6] = tfr.lba_low_ext;
        cdb[8] = tfr.lba_mid_ext;
        cdb[10] = tfr.lba_high_ext;
    }
    cdb[3] = tfr.feature;
    cdb[5] = tfr.sector_count;
    cdb[7] = tfr.lba_low;
    cdb[9] = tfr.lba_mid;
    cdb[11] = tfr.lba_high;
    cdb[12] = tfr.device;
    cdb[13] = tfr.command;
    cdb[14..16].copy_from_slice(&length.to_be_bytes());
    Ok(cdb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_ata::{read_sectors, AtaCommand, Protocol, TaskFile};

    #[test]
    fn repositions_28_bit_registers_unchanged() {
        let cmd = read_sectors(false, 0x0012_3456, 4).unwrap();
        let cdb = encode(&cmd).unwrap();
        assert_eq!(cdb[0], CSMI_OPCODE);
        assert_eq!(cdb[3], cmd.tfr.feature);
        assert_eq!(cdb[5], cmd.tfr.sector_count);
        assert_eq!(cdb[7], cmd.tfr.lba_low);
        assert_eq!(cdb[9], cmd.tfr.lba_mid);
        assert_eq!(cdb[11], cmd.tfr.lba_high);
        assert_eq!(cdb[12], cmd.tfr.device);
        assert_eq!(cdb[13], cmd.tfr.command);
        // Ext bytes stay zero for a 28-bit command.
        assert_eq!([cdb[2], cdb[4], cdb[6], cdb[8], cdb[10]], [0; 5]);
    }

    #[test]
    fn extended_command_carries_ext_shadows() {
        let cmd = read_sectors(true, 0x0001_0000_0000, 0x0200).unwrap();
        let cdb = encode(&cmd).unwrap();
        assert_eq!(cdb[4], cmd.tfr.sector_count_ext);
        assert_eq!(cdb[6], cmd.tfr.lba_low_ext);
        assert_eq!(cdb[10], cmd.tfr.lba_high_ext);
    }

    #[test]
    fn sector_count_policy_sets_blocks_bit_and_count() {
        let cmd = read_sectors(false, 0, 3).unwrap();
        let cdb = encode(&cmd).unwrap();
        assert_ne!(cdb[1] & PROTO_BLOCKS_BIT, 0);
        assert_eq!(u16::from_be_bytes([cdb[14], cdb[15]]), 3);
    }

    #[test]
    fn byte_count_over_16_bit_words_is_not_available() {
        let mut cmd = AtaCommand::data_in(TaskFile::new(0xB0), Protocol::Pio, 0x2_0002);
        cmd.length_policy = LengthPolicy::Bytes;
        assert_eq!(
            encode(&cmd),
            Err(EncodeError::NotAvailable("word count over 16 bits"))
        );
        // One word under the limit encodes.
        cmd.data_length = 0x1_FFFE;
        let cdb = encode(&cmd).unwrap();
        assert_eq!(u16::from_be_bytes([cdb[14], cdb[15]]), 0xFFFF);
        assert_eq!(cdb[1] & PROTO_BLOCKS_BIT, 0);
    }

    #[test]
    fn icc_aux_and_reset_protocols_are_not_available() {
        let mut cmd = AtaCommand::non_data(TaskFile::new(0xE7));
        cmd.tfr.icc = 1;
        assert!(matches!(encode(&cmd), Err(EncodeError::NotAvailable(_))));

        let mut cmd = AtaCommand::non_data(TaskFile::new(0x08));
        cmd.protocol = Protocol::DeviceReset;
        assert!(matches!(encode(&cmd), Err(EncodeError::NotAvailable(_))));
    }
}
