//! Sunplus passthrough: 12-byte vendor CDBs under opcode 0xF8.
//!
//! A command is a short fixed sequence. For an extended task file the "set
//! 48-bit registers" CDB goes first, then the "send ATA command" CDB with
//! the current registers and the data phase, and finally a separate "get
//! status" CDB whose 16-byte response carries the return task file.
//!
//! Low/send CDB layout:
//!
//! ```text
//! 0  opcode (0xF8)   4  feature     8  LBA high
//! 1  reserved        5  sect count  9  device
//! 2  sub-command     6  LBA low     10 command
//! 3  direction       7  LBA mid     11 512-byte block count
//! ```

use keel_ata::regs::{AtaStatus, SYNTHESIZED_GOOD_STATUS};
use keel_ata::{AtaCommand, Direction, ReturnTaskFile};
use keel_types::ResultKind;

pub const SUNPLUS_CDB_LEN: usize = 12;
pub const SUNPLUS_OPCODE: u8 = 0xF8;
/// Length of the response the "get status" CDB reads back.
pub const STATUS_RESPONSE_LEN: usize = 16;

// Sub-commands, byte 2.
const SUB_GET_STATUS: u8 = 0x21;
const SUB_SEND_COMMAND: u8 = 0x22;
const SUB_SET_HIGH_REGISTERS: u8 = 0x23;

// Direction byte values for the send CDB.
const DIR_NONE: u8 = 0x00;
const DIR_IN: u8 = 0x10;
const DIR_OUT: u8 = 0x11;

/// The "set 48-bit registers" CDB, emitted iff the task file is extended.
/// Must reach the device before [`encode_low`]'s CDB.
pub fn encode_high(cmd: &AtaCommand) -> Option<[u8; SUNPLUS_CDB_LEN]> {
    if !cmd.command_type.is_extended() {
        return None;
    }
    let mut cdb = [0u8; SUNPLUS_CDB_LEN];
    cdb[0] = SUNPLUS_OPCODE;
    cdb[2] = SUB_SET_HIGH_REGISTERS;
    cdb[4] = cmd.tfr.feature_ext;
    cdb[5] = cmd.tfr.sector_count_ext;
    cdb[6] = cmd.tfr.lba_low_ext;
    cdb[7] = cmd.tfr.lba_mid_ext;
    cdb[8] = cmd.tfr.lba_high_ext;
    Some(cdb)
}

/// The "send ATA command" CDB: current registers, direction byte, and the
/// transfer length as a count of 512-byte blocks.
pub fn encode_low(cmd: &AtaCommand) -> [u8; SUNPLUS_CDB_LEN] {
    let mut cdb = [0u8; SUNPLUS_CDB_LEN];
    cdb[0] = SUNPLUS_OPCODE;
    cdb[2] = SUB_SEND_COMMAND;
    cdb[3] = match cmd.direction {
        Direction::None => DIR_NONE,
        Direction::In => DIR_IN,
        Direction::Out => DIR_OUT,
    };
    cdb[4] = cmd.tfr.feature;
    cdb[5] = cmd.tfr.sector_count;
    cdb[6] = cmd.tfr.lba_low;
    cdb[7] = cmd.tfr.lba_mid;
    cdb[8] = cmd.tfr.lba_high;
    cdb[9] = cmd.tfr.device;
    cdb[10] = cmd.tfr.command;
    cdb[11] = (cmd.data_length >> 9) as u8;
    cdb
}

/// The "get status" CDB, issued after the data-transfer CDB.
pub fn status_cdb() -> [u8; SUNPLUS_CDB_LEN] {
    let mut cdb = [0u8; SUNPLUS_CDB_LEN];
    cdb[0] = SUNPLUS_OPCODE;
    cdb[2] = SUB_GET_STATUS;
    cdb
}

/// Decode the 16-byte status response into a return task file and a final
/// result.
///
/// An all-zero status byte with a passing transport result is taken to mean
/// the bridge simply did not latch the registers; the decoder assumes
/// success and synthesizes Ready|SeekComplete. This is vendor-observed
/// bridge behavior with no written justification.
pub fn decode_status(response: &[u8], transport_result: ResultKind) -> (ReturnTaskFile, ResultKind) {
    let byte = |i: usize| response.get(i).copied().unwrap_or(0);
    let mut rtfr = ReturnTaskFile {
        status: byte(0),
        error: byte(1),
        sector_count: byte(2),
        lba_low: byte(3),
        lba_mid: byte(4),
        lba_high: byte(5),
        device: byte(6),
        sector_count_ext: byte(7),
        lba_low_ext: byte(8),
        lba_mid_ext: byte(9),
        lba_high_ext: byte(10),
    };

    let good = SYNTHESIZED_GOOD_STATUS;
    let result = if rtfr.status == 0 {
        if transport_result == ResultKind::Success {
            rtfr.status = good;
            ResultKind::Success
        } else {
            transport_result
        }
    } else if rtfr.status & AtaStatus::BUSY.bits() != 0 {
        ResultKind::InProgress
    } else if rtfr.status & (good | AtaStatus::ERROR.bits()) == good {
        ResultKind::Success
    } else if matches!(
        transport_result,
        ResultKind::NotSupported | ResultKind::InProgress
    ) {
        transport_result
    } else {
        ResultKind::Failure
    };
    (rtfr, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_ata::{read_sectors, AtaCommand, TaskFile};

    #[test]
    fn high_cdb_iff_extended() {
        let ext = read_sectors(true, 0x1_0000_0000, 1).unwrap();
        let high = encode_high(&ext).unwrap();
        assert_eq!(high[2], SUB_SET_HIGH_REGISTERS);
        assert_eq!(high[6], ext.tfr.lba_low_ext);

        let short = read_sectors(false, 0x100, 1).unwrap();
        assert!(encode_high(&short).is_none());
    }

    #[test]
    fn low_cdb_repositions_registers_and_block_count() {
        let cmd = read_sectors(false, 0x0012_3456, 4).unwrap();
        let cdb = encode_low(&cmd);
        assert_eq!(cdb[0], SUNPLUS_OPCODE);
        assert_eq!(cdb[3], DIR_IN);
        assert_eq!(cdb[4], cmd.tfr.feature);
        assert_eq!(cdb[5], cmd.tfr.sector_count);
        assert_eq!(cdb[6], cmd.tfr.lba_low);
        assert_eq!(cdb[7], cmd.tfr.lba_mid);
        assert_eq!(cdb[8], cmd.tfr.lba_high);
        assert_eq!(cdb[9], cmd.tfr.device);
        assert_eq!(cdb[10], cmd.tfr.command);
        assert_eq!(cdb[11], 4);
    }

    #[test]
    fn no_data_direction_byte() {
        let cmd = AtaCommand::non_data(TaskFile::new(0xE7));
        let cdb = encode_low(&cmd);
        assert_eq!(cdb[3], DIR_NONE);
        assert_eq!(cdb[11], 0);
    }

    #[test]
    fn all_zero_status_with_passing_transport_synthesizes_success() {
        let resp = [0u8; STATUS_RESPONSE_LEN];
        let (rtfr, result) = decode_status(&resp, ResultKind::Success);
        assert_eq!(result, ResultKind::Success);
        assert_eq!(rtfr.status, 0x50);
    }

    #[test]
    fn all_zero_status_with_failed_transport_keeps_transport_result() {
        let resp = [0u8; STATUS_RESPONSE_LEN];
        let (rtfr, result) = decode_status(&resp, ResultKind::Failure);
        assert_eq!(result, ResultKind::Failure);
        assert_eq!(rtfr.status, 0);
    }

    #[test]
    fn busy_and_error_statuses() {
        let mut resp = [0u8; STATUS_RESPONSE_LEN];
        resp[0] = 0x80;
        assert_eq!(decode_status(&resp, ResultKind::Success).1, ResultKind::InProgress);

        resp[0] = 0x51; // DRDY|DSC|ERR
        resp[1] = 0x04;
        assert_eq!(decode_status(&resp, ResultKind::Success).1, ResultKind::Failure);

        // A raw NotSupported survives an odd status byte.
        assert_eq!(
            decode_status(&resp, ResultKind::NotSupported).1,
            ResultKind::NotSupported
        );

        resp[0] = 0x50;
        resp[1] = 0;
        assert_eq!(decode_status(&resp, ResultKind::Success).1, ResultKind::Success);
    }
}
