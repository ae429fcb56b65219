//! One builder per concrete ATA command. Each returns a fully-populated
//! [`AtaCommand`] or fails before any transport involvement.

use crate::command::{
    drq_block_exponent, AtaCommand, BuildError, Direction, DmaMode, LengthPolicy, Protocol,
};
use crate::regs::*;
use crate::taskfile::TaskFile;

pub const LOGICAL_SECTOR_SIZE: u32 = 512;

fn sector_data_len(count: u16) -> Result<u32, BuildError> {
    if count == 0 {
        return Err(BuildError::InvalidSectorCount(0));
    }
    Ok(u32::from(count) * LOGICAL_SECTOR_SIZE)
}

fn check_dma(dma_mode: DmaMode) -> Result<Protocol, BuildError> {
    match dma_mode {
        DmaMode::None => Err(BuildError::DmaNotEnabled),
        DmaMode::Mwdma => Ok(Protocol::Dma),
        DmaMode::Udma => Ok(Protocol::Udma),
    }
}

fn sectors_pio(
    opcode28: u8,
    opcode48: u8,
    extended: bool,
    count: u16,
    direction: Direction,
) -> Result<AtaCommand, BuildError> {
    let mut tfr = TaskFile::new(if extended { opcode48 } else { opcode28 });
    if extended {
        tfr.set_sector_count16(count);
    } else {
        if count > 0x100 {
            return Err(BuildError::InvalidSectorCount(u32::from(count)));
        }
        tfr.sector_count = count as u8;
    }
    let data_len = sector_data_len(count)?;
    let mut cmd = match direction {
        Direction::In => AtaCommand::data_in(tfr, Protocol::Pio, data_len),
        Direction::Out => AtaCommand::data_out(tfr, Protocol::Pio, data_len),
        Direction::None => AtaCommand::non_data(tfr),
    };
    if extended {
        cmd = cmd.extended();
    }
    Ok(cmd)
}

/// READ SECTORS / READ SECTORS EXT with CHS addressing.
pub fn read_sectors_chs(
    extended: bool,
    cylinder: u16,
    head: u8,
    sector: u8,
    count: u16,
) -> Result<AtaCommand, BuildError> {
    let mut cmd = sectors_pio(ATA_READ_SECT, ATA_READ_SECT_EXT, extended, count, Direction::In)?;
    cmd.tfr.set_chs(cylinder, head, sector);
    Ok(cmd)
}

/// READ SECTORS / READ SECTORS EXT with LBA addressing.
pub fn read_sectors(extended: bool, lba: u64, count: u16) -> Result<AtaCommand, BuildError> {
    let mut cmd = sectors_pio(ATA_READ_SECT, ATA_READ_SECT_EXT, extended, count, Direction::In)?;
    if extended {
        cmd.tfr.set_lba48(lba);
    } else {
        cmd.tfr.set_lba28(lba as u32);
    }
    Ok(cmd)
}

pub fn write_sectors_chs(
    extended: bool,
    cylinder: u16,
    head: u8,
    sector: u8,
    count: u16,
) -> Result<AtaCommand, BuildError> {
    let mut cmd = sectors_pio(ATA_WRITE_SECT, ATA_WRITE_SECT_EXT, extended, count, Direction::Out)?;
    cmd.tfr.set_chs(cylinder, head, sector);
    Ok(cmd)
}

pub fn write_sectors(extended: bool, lba: u64, count: u16) -> Result<AtaCommand, BuildError> {
    let mut cmd = sectors_pio(ATA_WRITE_SECT, ATA_WRITE_SECT_EXT, extended, count, Direction::Out)?;
    if extended {
        cmd.tfr.set_lba48(lba);
    } else {
        cmd.tfr.set_lba28(lba as u32);
    }
    Ok(cmd)
}

/// READ DMA / READ DMA EXT. Fails before transport when the device's DMA mode
/// is disabled.
pub fn read_dma(
    extended: bool,
    lba: u64,
    count: u16,
    dma_mode: DmaMode,
) -> Result<AtaCommand, BuildError> {
    let protocol = check_dma(dma_mode)?;
    let mut cmd = sectors_pio(ATA_READ_DMA, ATA_READ_DMA_EXT, extended, count, Direction::In)?;
    cmd.protocol = protocol;
    if extended {
        cmd.tfr.set_lba48(lba);
    } else {
        cmd.tfr.set_lba28(lba as u32);
    }
    Ok(cmd)
}

pub fn write_dma(
    extended: bool,
    lba: u64,
    count: u16,
    dma_mode: DmaMode,
) -> Result<AtaCommand, BuildError> {
    let protocol = check_dma(dma_mode)?;
    let mut cmd = sectors_pio(ATA_WRITE_DMA, ATA_WRITE_DMA_EXT, extended, count, Direction::Out)?;
    cmd.protocol = protocol;
    if extended {
        cmd.tfr.set_lba48(lba);
    } else {
        cmd.tfr.set_lba28(lba as u32);
    }
    Ok(cmd)
}

/// READ MULTIPLE / READ MULTIPLE EXT. `sectors_per_drq` is the device's
/// configured logical-sectors-per-DRQ-block setting; it travels as a
/// power-of-two exponent.
pub fn read_multiple(
    extended: bool,
    lba: u64,
    count: u16,
    sectors_per_drq: u16,
) -> Result<AtaCommand, BuildError> {
    let mut cmd = sectors_pio(
        ATA_READ_MULTIPLE,
        ATA_READ_MULTIPLE_EXT,
        extended,
        count,
        Direction::In,
    )?;
    if extended {
        cmd.tfr.set_lba48(lba);
    } else {
        cmd.tfr.set_lba28(lba as u32);
    }
    cmd.multiple_count = drq_block_exponent(sectors_per_drq);
    Ok(cmd)
}

pub fn write_multiple(
    extended: bool,
    lba: u64,
    count: u16,
    sectors_per_drq: u16,
) -> Result<AtaCommand, BuildError> {
    let mut cmd = sectors_pio(
        ATA_WRITE_MULTIPLE,
        ATA_WRITE_MULTIPLE_EXT,
        extended,
        count,
        Direction::Out,
    )?;
    if extended {
        cmd.tfr.set_lba48(lba);
    } else {
        cmd.tfr.set_lba28(lba as u32);
    }
    cmd.multiple_count = drq_block_exponent(sectors_per_drq);
    Ok(cmd)
}

/// READ VERIFY SECTORS: seeks and checks ECC, transfers nothing.
pub fn read_verify(extended: bool, lba: u64, count: u16) -> Result<AtaCommand, BuildError> {
    let mut cmd = sectors_pio(
        ATA_READ_VERIFY,
        ATA_READ_VERIFY_EXT,
        extended,
        count,
        Direction::None,
    )?;
    // Non-data: the sector count register is still meaningful, but nothing
    // crosses the bus.
    cmd.length_policy = LengthPolicy::NoData;
    cmd.data_length = 0;
    if extended {
        cmd.tfr.set_lba48(lba);
    } else {
        cmd.tfr.set_lba28(lba as u32);
    }
    Ok(cmd)
}

/// Legacy SEEK to a CHS position.
pub fn seek_chs(cylinder: u16, head: u8, sector: u8) -> AtaCommand {
    let mut tfr = TaskFile::new(ATA_SEEK);
    tfr.set_chs(cylinder, head, sector);
    AtaCommand::non_data(tfr)
}

/// Legacy SEEK to a 28-bit LBA.
pub fn seek_lba(lba: u32) -> AtaCommand {
    let mut tfr = TaskFile::new(ATA_SEEK);
    tfr.set_lba28(lba);
    AtaCommand::non_data(tfr)
}

/// Legacy FORMAT TRACK. With `data_length == 0` the command is issued
/// non-data; otherwise the caller supplies an interleave table.
pub fn format_track(
    cylinder: u16,
    head: u8,
    sectors_per_track: u8,
    data_length: u32,
) -> Result<AtaCommand, BuildError> {
    let mut tfr = TaskFile::new(ATA_FORMAT_TRACK);
    tfr.set_chs(cylinder, head, 0);
    tfr.sector_count = sectors_per_track;
    if data_length == 0 {
        return Ok(AtaCommand::non_data(tfr));
    }
    if data_length % LOGICAL_SECTOR_SIZE != 0 {
        return Err(BuildError::UnalignedTransfer(data_length));
    }
    Ok(AtaCommand::data_out(tfr, Protocol::Pio, data_length))
}

/// IDENTIFY DEVICE (PIO).
pub fn identify() -> AtaCommand {
    let mut tfr = TaskFile::new(ATA_IDENTIFY);
    tfr.sector_count = 1;
    AtaCommand::data_in(tfr, Protocol::Pio, LOGICAL_SECTOR_SIZE)
}

/// IDENTIFY DEVICE DMA (obsolete but still the fastest probe some legacy
/// bridges accept).
pub fn identify_dma(dma_mode: DmaMode) -> Result<AtaCommand, BuildError> {
    let protocol = check_dma(dma_mode)?;
    let mut tfr = TaskFile::new(ATA_IDENTIFY_DMA);
    tfr.sector_count = 1;
    Ok(AtaCommand::data_in(tfr, protocol, LOGICAL_SECTOR_SIZE))
}

/// IDENTIFY PACKET DEVICE for ATAPI devices.
pub fn identify_packet() -> AtaCommand {
    let tfr = TaskFile::new(ATA_IDENTIFY_PACKET);
    AtaCommand::data_in(tfr, Protocol::Pio, LOGICAL_SECTOR_SIZE)
}

fn smart_tfr(feature: u8) -> TaskFile {
    let mut tfr = TaskFile::new(ATA_SMART);
    tfr.feature = feature;
    tfr.lba_mid = SMART_LBA_MID_KEY;
    tfr.lba_high = SMART_LBA_HI_KEY;
    tfr
}

pub fn smart_read_data() -> AtaCommand {
    let mut tfr = smart_tfr(SMART_READ_DATA);
    tfr.sector_count = 1;
    AtaCommand::data_in(tfr, Protocol::Pio, LOGICAL_SECTOR_SIZE)
}

pub fn smart_read_thresholds() -> AtaCommand {
    let mut tfr = smart_tfr(SMART_READ_THRESHOLDS);
    tfr.sector_count = 1;
    AtaCommand::data_in(tfr, Protocol::Pio, LOGICAL_SECTOR_SIZE)
}

/// SMART READ LOG: `count` 512-byte sectors from `log_address`.
pub fn smart_read_log(log_address: u8, count: u8) -> Result<AtaCommand, BuildError> {
    if count == 0 {
        return Err(BuildError::InvalidSectorCount(0));
    }
    let mut tfr = smart_tfr(SMART_READ_LOG);
    tfr.sector_count = count;
    tfr.lba_low = log_address;
    Ok(AtaCommand::data_in(
        tfr,
        Protocol::Pio,
        u32::from(count) * LOGICAL_SECTOR_SIZE,
    ))
}

/// SMART RETURN STATUS: the verdict comes back in the LBA mid/high registers.
pub fn smart_return_status() -> AtaCommand {
    AtaCommand::non_data(smart_tfr(SMART_RETURN_STATUS))
}

pub fn smart_enable_operations() -> AtaCommand {
    AtaCommand::non_data(smart_tfr(SMART_ENABLE))
}

pub fn flush_cache(extended: bool) -> AtaCommand {
    let tfr = TaskFile::new(if extended { ATA_FLUSH_CACHE_EXT } else { ATA_FLUSH_CACHE });
    let cmd = AtaCommand::non_data(tfr);
    if extended {
        cmd.extended()
    } else {
        cmd
    }
}

pub fn set_features(subcommand: u8, count: u8, lba: u32) -> AtaCommand {
    let mut tfr = TaskFile::new(ATA_SET_FEATURES);
    tfr.feature = subcommand;
    tfr.sector_count = count;
    tfr.lba_low = lba as u8;
    tfr.lba_mid = (lba >> 8) as u8;
    tfr.lba_high = (lba >> 16) as u8;
    AtaCommand::non_data(tfr)
}

pub fn standby_immediate() -> AtaCommand {
    AtaCommand::non_data(TaskFile::new(ATA_STANDBY_IMMEDIATE))
}

/// CHECK POWER MODE: the mode comes back in the sector count register.
pub fn check_power_mode() -> AtaCommand {
    AtaCommand::non_data(TaskFile::new(ATA_CHECK_POWER_MODE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandType;

    #[test]
    fn read_sectors_chs_ext_populates_shadow_count() {
        let cmd = read_sectors_chs(true, 0x0102, 3, 4, 0x0201).unwrap();
        assert_eq!(cmd.tfr.command, ATA_READ_SECT_EXT);
        assert_eq!(cmd.command_type, CommandType::ExtendedTaskFile);
        assert_eq!(cmd.tfr.sector_count, 0x01);
        assert_eq!(cmd.tfr.sector_count_ext, 0x02);
        assert_eq!(cmd.tfr.lba_low, 4);
        assert_eq!(cmd.tfr.lba_mid, 0x02);
        assert_eq!(cmd.tfr.lba_high, 0x01);
    }

    #[test]
    fn read_sectors_chs_28bit_leaves_ext_zero() {
        let cmd = read_sectors_chs(false, 0x0102, 3, 4, 8).unwrap();
        assert_eq!(cmd.tfr.command, ATA_READ_SECT);
        assert_eq!(cmd.command_type, CommandType::TaskFile);
        assert_eq!(cmd.tfr.sector_count, 8);
        assert!(!cmd.tfr.uses_ext_fields());
    }

    #[test]
    fn dma_requires_enabled_mode() {
        assert_eq!(
            read_dma(false, 0, 1, DmaMode::None).unwrap_err(),
            BuildError::DmaNotEnabled
        );
        let cmd = read_dma(false, 0x100, 1, DmaMode::Udma).unwrap();
        assert_eq!(cmd.protocol, Protocol::Udma);
        assert_eq!(cmd.tfr.command, ATA_READ_DMA);
    }

    #[test]
    fn read_multiple_derives_block_exponent() {
        let cmd = read_multiple(false, 0, 8, 16).unwrap();
        assert_eq!(cmd.multiple_count, 4);
        let cmd = read_multiple(false, 0, 8, 1).unwrap();
        assert_eq!(cmd.multiple_count, 0);
    }

    #[test]
    fn smart_commands_carry_the_register_key() {
        let cmd = smart_read_data();
        assert_eq!(cmd.tfr.command, ATA_SMART);
        assert_eq!(cmd.tfr.feature, SMART_READ_DATA);
        assert_eq!(cmd.tfr.lba_mid, 0x4F);
        assert_eq!(cmd.tfr.lba_high, 0xC2);
        assert_eq!(cmd.data_length, 512);

        let status = smart_return_status();
        assert_eq!(status.length_policy, LengthPolicy::NoData);
    }

    #[test]
    fn zero_sector_count_is_rejected() {
        assert!(read_sectors(false, 0, 0).is_err());
        assert!(smart_read_log(0xE0, 0).is_err());
    }

    #[test]
    fn identify_builders() {
        let id = identify();
        assert_eq!(id.tfr.command, ATA_IDENTIFY);
        assert_eq!(id.direction, Direction::In);
        assert_eq!(id.data_length, 512);
        assert!(identify_dma(DmaMode::None).is_err());
        assert_eq!(identify_dma(DmaMode::Mwdma).unwrap().protocol, Protocol::Dma);
    }

    #[test]
    fn verify_is_non_data_with_count_registers() {
        let cmd = read_verify(true, 0x12345678, 16).unwrap();
        assert_eq!(cmd.length_policy, LengthPolicy::NoData);
        assert_eq!(cmd.data_length, 0);
        assert_eq!(cmd.tfr.sector_count, 16);
        assert_eq!(cmd.tfr.command, ATA_READ_VERIFY_EXT);
    }
}
