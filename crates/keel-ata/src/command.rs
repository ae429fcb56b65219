//! The passthrough command descriptor: a task file plus the metadata an
//! encoder needs to serialize it for a specific bridge.

use thiserror::Error;

use crate::taskfile::TaskFile;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("data transfer command requires a data buffer")]
    MissingDataBuffer,
    #[error("DMA command issued but the device DMA mode is disabled")]
    DmaNotEnabled,
    #[error("sector count {0} is not valid for this command")]
    InvalidSectorCount(u32),
    #[error("transfer length {0} bytes is not a multiple of the sector size")]
    UnalignedTransfer(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    /// 28-bit command; ext registers are zero and are not transmitted.
    TaskFile,
    /// 48-bit command; ext registers are populated and transmitted.
    ExtendedTaskFile,
    /// 48-bit command including ICC/AUX registers.
    CompleteTaskFile,
    Packet,
    SoftReset,
    HardReset,
}

impl CommandType {
    pub fn is_extended(self) -> bool {
        matches!(self, CommandType::ExtendedTaskFile | CommandType::CompleteTaskFile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    None,
    In,
    Out,
}

/// Transport protocol hint for the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    NoData,
    Pio,
    Dma,
    Udma,
    Fpdma,
    Packet,
    DmaQueued,
    DeviceDiagnostic,
    DeviceReset,
    SoftReset,
    HardReset,
}

/// Device-side DMA configuration, consulted by DMA-protocol builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DmaMode {
    #[default]
    None,
    Mwdma,
    Udma,
}

/// How the transfer length is communicated on the wire. The four policies are
/// mutually exclusive; every encoder must honor exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPolicy {
    NoData,
    /// Length is implied by the sector count register(s).
    SectorCount,
    /// Explicit byte count.
    Bytes,
    /// Count of 512-byte blocks.
    Blocks512,
}

/// SAT encoding hint: which register pair carries the transfer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferLengthRegister {
    #[default]
    NoneUsed,
    SectorCount,
    Feature,
}

/// A fully-described ATA passthrough command: task file + everything the
/// encoder and dispatcher need. Owned by one call; never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtaCommand {
    pub tfr: TaskFile,
    pub command_type: CommandType,
    pub direction: Direction,
    pub protocol: Protocol,
    pub length_policy: LengthPolicy,
    /// Transfer length in bytes (0 for no-data commands).
    pub data_length: u32,
    pub timeout_seconds: u32,
    /// Power-of-two DRQ block exponent for READ/WRITE MULTIPLE, else 0.
    pub multiple_count: u8,
    pub transfer_length_register: TransferLengthRegister,
    /// Force a specific passthrough CDB size where a transport offers more
    /// than one (SAT 12/16/32).
    pub forced_cdb_size: Option<u8>,
}

pub const DEFAULT_TIMEOUT_SECONDS: u32 = 15;

impl AtaCommand {
    /// No-data command skeleton.
    pub fn non_data(tfr: TaskFile) -> AtaCommand {
        AtaCommand {
            tfr,
            command_type: CommandType::TaskFile,
            direction: Direction::None,
            protocol: Protocol::NoData,
            length_policy: LengthPolicy::NoData,
            data_length: 0,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            multiple_count: 0,
            transfer_length_register: TransferLengthRegister::NoneUsed,
            forced_cdb_size: None,
        }
    }

    /// Data-in command skeleton with sector-count length encoding.
    pub fn data_in(tfr: TaskFile, protocol: Protocol, data_length: u32) -> AtaCommand {
        AtaCommand {
            direction: Direction::In,
            protocol,
            length_policy: LengthPolicy::SectorCount,
            data_length,
            transfer_length_register: TransferLengthRegister::SectorCount,
            ..AtaCommand::non_data(tfr)
        }
    }

    pub fn data_out(tfr: TaskFile, protocol: Protocol, data_length: u32) -> AtaCommand {
        AtaCommand {
            direction: Direction::Out,
            ..AtaCommand::data_in(tfr, protocol, data_length)
        }
    }

    pub fn extended(mut self) -> AtaCommand {
        self.command_type = CommandType::ExtendedTaskFile;
        self
    }

    pub fn is_data_transfer(&self) -> bool {
        self.direction != Direction::None
    }
}

/// The ATA "power-of-two block count" encoding used by READ/WRITE MULTIPLE:
/// log2 of the configured logical sectors per DRQ block, capped at 7.
pub fn drq_block_exponent(sectors_per_drq: u16) -> u8 {
    let mut exponent = 0u8;
    let mut s = sectors_per_drq;
    while s > 1 {
        s >>= 1;
        exponent += 1;
        if exponent == 7 {
            break;
        }
    }
    exponent
}
