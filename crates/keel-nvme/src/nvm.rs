//! NVM I/O command builders.
//!
//! LBA-addressed commands carry the starting LBA in CDW10/CDW11 and a
//! zero-based block count in the low 16 bits of CDW12.

use crate::command::{CommandKind, NvmeCommand};
use crate::ids::*;

fn lba_command(opcode: u8, nsid: u32, lba: u64, blocks: u16) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Nvm, opcode);
    cmd.set_nsid(nsid);
    cmd.set_cdw(0, lba as u32);
    cmd.set_cdw(1, (lba >> 32) as u32);
    cmd.set_cdw(2, u32::from(blocks.wrapping_sub(1)));
    cmd
}

pub fn read(nsid: u32, lba: u64, blocks: u16) -> NvmeCommand {
    lba_command(NVM_READ, nsid, lba, blocks)
}

pub fn write(nsid: u32, lba: u64, blocks: u16, fua: bool, limited_retry: bool) -> NvmeCommand {
    let mut cmd = lba_command(NVM_WRITE, nsid, lba, blocks);
    let mut dw12 = cmd.cdw(2);
    if fua {
        dw12 |= 1 << 30;
    }
    if limited_retry {
        dw12 |= 1 << 31;
    }
    cmd.set_cdw(2, dw12);
    cmd
}

pub fn compare(nsid: u32, lba: u64, blocks: u16) -> NvmeCommand {
    lba_command(NVM_COMPARE, nsid, lba, blocks)
}

pub fn verify(nsid: u32, lba: u64, blocks: u16) -> NvmeCommand {
    lba_command(NVM_VERIFY, nsid, lba, blocks)
}

pub fn flush(nsid: u32) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Nvm, NVM_FLUSH);
    cmd.set_nsid(nsid);
    cmd
}

pub fn write_zeroes(nsid: u32, lba: u64, blocks: u16, deallocate: bool) -> NvmeCommand {
    let mut cmd = lba_command(NVM_WRITE_ZEROES, nsid, lba, blocks);
    if deallocate {
        cmd.set_cdw(2, cmd.cdw(2) | 1 << 25);
    }
    cmd
}

pub fn write_uncorrectable(nsid: u32, lba: u64, blocks: u16) -> NvmeCommand {
    lba_command(NVM_WRITE_UNCORRECTABLE, nsid, lba, blocks)
}

/// DATASET MANAGEMENT with the deallocate attribute set. `range_count` is
/// the number of 16-byte range entries in the data buffer (1..=256).
pub fn dataset_management_deallocate(nsid: u32, range_count: u16) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Nvm, NVM_DATASET_MANAGEMENT);
    cmd.set_nsid(nsid);
    cmd.set_cdw(0, u32::from(range_count.saturating_sub(1)) & 0xFF);
    cmd.set_cdw(1, 1 << 2);
    cmd
}

/// Encode one dataset-management range entry into a 16-byte slot.
pub fn dsm_range(lba: u64, blocks: u32) -> [u8; 16] {
    let mut entry = [0u8; 16];
    entry[4..8].copy_from_slice(&blocks.to_le_bytes());
    entry[8..16].copy_from_slice(&lba.to_le_bytes());
    entry
}

pub fn reservation_register(nsid: u32, action: u8, ignore_existing_key: bool, ptpl: u8) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Nvm, NVM_RESERVATION_REGISTER);
    cmd.set_nsid(nsid);
    let mut dw10 = u32::from(action & 0x07);
    if ignore_existing_key {
        dw10 |= 1 << 3;
    }
    dw10 |= u32::from(ptpl & 0x03) << 30;
    cmd.set_cdw(0, dw10);
    cmd
}

pub fn reservation_report(nsid: u32, length_bytes: u32, extended: bool) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Nvm, NVM_RESERVATION_REPORT);
    cmd.set_nsid(nsid);
    cmd.set_cdw(0, (length_bytes / 4).saturating_sub(1));
    if extended {
        cmd.set_cdw(1, 1);
    }
    cmd
}

pub fn reservation_acquire(nsid: u32, action: u8, reservation_type: u8) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Nvm, NVM_RESERVATION_ACQUIRE);
    cmd.set_nsid(nsid);
    cmd.set_cdw(0, u32::from(action & 0x07) | u32::from(reservation_type) << 8);
    cmd
}

pub fn reservation_release(nsid: u32, action: u8, reservation_type: u8) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Nvm, NVM_RESERVATION_RELEASE);
    cmd.set_nsid(nsid);
    cmd.set_cdw(0, u32::from(action & 0x07) | u32::from(reservation_type) << 8);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_encodes_lba_and_zero_based_count() {
        let cmd = read(3, 0x1_2345_6789, 8);
        assert_eq!(cmd.opcode(), NVM_READ);
        assert_eq!(cmd.nsid(), 3);
        assert_eq!(cmd.cdw(0), 0x2345_6789);
        assert_eq!(cmd.cdw(1), 0x1);
        assert_eq!(cmd.cdw(2), 7);
    }

    #[test]
    fn write_flag_bits() {
        let cmd = write(1, 0, 1, true, true);
        assert_eq!(cmd.cdw(2), 1 << 30 | 1 << 31);
    }

    #[test]
    fn flush_carries_only_nsid() {
        let cmd = flush(2);
        assert_eq!(cmd.opcode(), NVM_FLUSH);
        assert_eq!(cmd.nsid(), 2);
        assert_eq!(cmd.cdw(0), 0);
    }

    #[test]
    fn dsm_range_layout() {
        let entry = dsm_range(0x1122_3344_5566_7788, 0x100);
        assert_eq!(&entry[0..4], &[0, 0, 0, 0]);
        assert_eq!(&entry[4..8], &0x100u32.to_le_bytes());
        assert_eq!(&entry[8..16], &0x1122_3344_5566_7788u64.to_le_bytes());
    }

    #[test]
    fn reservation_acquire_packing() {
        let cmd = reservation_acquire(5, 0x1, 0x02);
        assert_eq!(cmd.cdw(0), 0x1 | 0x02 << 8);
    }
}
