//! TI passthrough: one 16-byte vendor CDB, 28-bit addressing only.
//!
//! The bridge has no way to read registers back after a command, so the
//! return task file is synthesized from the outer transport result alone.
//!
//! Layout:
//!
//! ```text
//! 0  opcode (0x3C, or 0xF0 on old firmware)
//! 1  bit 7 PIO, bit 3 fastest-available, bits 2:0 forced mode number
//! 2  feature       5  LBA mid     8  command
//! 3  sector count  6  LBA high    9..14 reserved
//! 4  LBA low       7  device      14..16 big-endian 512-byte block count
//! ```

use keel_ata::regs::{AtaError, AtaStatus, SYNTHESIZED_GOOD_STATUS};
use keel_ata::{AtaCommand, Protocol, ReturnTaskFile};
use keel_types::ResultKind;

use crate::context::TiConfig;
use crate::error::EncodeError;

pub const TI_CDB_LEN: usize = 16;
pub const TI_OPCODE: u8 = 0x3C;
pub const TI_OPCODE_LEGACY: u8 = 0xF0;

const MODE_PIO_BIT: u8 = 0x80;
const MODE_FASTEST_BIT: u8 = 0x08;

/// Serialize an [`AtaCommand`] into the TI CDB. Extended task files are
/// refused outright with `NotSupported`; the CDB has no room for the shadow
/// registers.
pub fn encode(cmd: &AtaCommand, config: &TiConfig) -> Result<[u8; TI_CDB_LEN], EncodeError> {
    if cmd.command_type.is_extended() || cmd.tfr.uses_ext_fields() {
        return Err(EncodeError::NotSupported("48-bit task file"));
    }

    let mut cdb = [0u8; TI_CDB_LEN];
    cdb[0] = if config.legacy_opcode {
        TI_OPCODE_LEGACY
    } else {
        TI_OPCODE
    };
    if cmd.protocol == Protocol::Pio {
        cdb[1] |= MODE_PIO_BIT;
    }
    match config.forced_mode {
        Some(mode) => cdb[1] |= mode & 0x07,
        None => cdb[1] |= MODE_FASTEST_BIT,
    }
    cdb[2] = cmd.tfr.feature;
    cdb[3] = cmd.tfr.sector_count;
    cdb[4] = cmd.tfr.lba_low;
    cdb[5] = cmd.tfr.lba_mid;
    cdb[6] = cmd.tfr.lba_high;
    cdb[7] = cmd.tfr.device;
    cdb[8] = cmd.tfr.command;
    let blocks = (cmd.data_length >> 9) as u16;
    cdb[14..16].copy_from_slice(&blocks.to_be_bytes());
    Ok(cdb)
}

/// Fabricate a return task file from the transport result. The real
/// registers are unavailable on this hardware.
pub fn synthesize_rtfr(transport_result: ResultKind) -> ReturnTaskFile {
    let mut rtfr = ReturnTaskFile::default();
    match transport_result {
        ResultKind::Success => rtfr.status = SYNTHESIZED_GOOD_STATUS,
        ResultKind::InProgress => rtfr.status = AtaStatus::BUSY.bits(),
        ResultKind::Aborted => {
            rtfr.status = AtaStatus::READY.bits() | AtaStatus::ERROR.bits();
            rtfr.error = AtaError::ABORT.bits();
        }
        _ => rtfr.status = AtaStatus::READY.bits() | AtaStatus::ERROR.bits(),
    }
    rtfr
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_ata::read_sectors;

    #[test]
    fn extended_task_file_is_not_supported() {
        let cmd = read_sectors(true, 0x1_0000_0000, 1).unwrap();
        assert_eq!(
            encode(&cmd, &TiConfig::default()),
            Err(EncodeError::NotSupported("48-bit task file"))
        );
    }

    #[test]
    fn repositions_28_bit_registers_unchanged() {
        let cmd = read_sectors(false, 0x0012_3456, 2).unwrap();
        let cdb = encode(&cmd, &TiConfig::default()).unwrap();
        assert_eq!(cdb[0], TI_OPCODE);
        assert_eq!(cdb[2], cmd.tfr.feature);
        assert_eq!(cdb[3], cmd.tfr.sector_count);
        assert_eq!(cdb[4], cmd.tfr.lba_low);
        assert_eq!(cdb[5], cmd.tfr.lba_mid);
        assert_eq!(cdb[6], cmd.tfr.lba_high);
        assert_eq!(cdb[7], cmd.tfr.device);
        assert_eq!(cdb[8], cmd.tfr.command);
        assert_eq!(u16::from_be_bytes([cdb[14], cdb[15]]), 2);
    }

    #[test]
    fn mode_byte_flags() {
        let cmd = read_sectors(false, 0, 1).unwrap();
        let cdb = encode(&cmd, &TiConfig::default()).unwrap();
        assert_ne!(cdb[1] & MODE_PIO_BIT, 0);
        assert_ne!(cdb[1] & MODE_FASTEST_BIT, 0);

        let forced = TiConfig {
            legacy_opcode: true,
            forced_mode: Some(4),
        };
        let cdb = encode(&cmd, &forced).unwrap();
        assert_eq!(cdb[0], TI_OPCODE_LEGACY);
        assert_eq!(cdb[1] & MODE_FASTEST_BIT, 0);
        assert_eq!(cdb[1] & 0x07, 4);
    }

    #[test]
    fn synthesized_rtfr_tracks_transport_result() {
        assert_eq!(synthesize_rtfr(ResultKind::Success).status, 0x50);
        assert_eq!(synthesize_rtfr(ResultKind::InProgress).status, 0x80);
        let aborted = synthesize_rtfr(ResultKind::Aborted);
        assert_eq!(aborted.status, 0x41);
        assert_eq!(aborted.error, 0x04);
        assert_eq!(synthesize_rtfr(ResultKind::Failure).status, 0x41);
    }
}
