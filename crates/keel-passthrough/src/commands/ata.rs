//! ATA entry points: build, validate, dispatch, post-process.
//!
//! Every function validates its parameters before touching the transport; a
//! rejected call returns a `BadParameter` outcome with no side effects on
//! the device context.

use keel_ata::identify::{byte_swap_identify, validate_checksum, ChecksumOutcome};
use keel_ata::regs::{SMART_LBA_HI_KEY, SMART_LBA_MID_KEY};
use keel_ata::{self as builders, AtaCommand, BuildError, ReturnTaskFile, LOGICAL_SECTOR_SIZE};
use keel_types::ResultKind;

use crate::context::DeviceContext;
use crate::dispatch::{send_ata_passthrough, CommandOutcome};
use crate::transport::{DataBuffer, ScsiTransport};

/// SMART RETURN STATUS verdict, read from the LBA mid/high registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartVerdict {
    Healthy,
    ThresholdExceeded,
    /// Registers held neither known signature (or were synthesized).
    Indeterminate,
}

fn rejected(name: &'static str, why: &dyn std::fmt::Display) -> CommandOutcome {
    tracing::debug!(command = name, error = %why, "rejected before transport");
    CommandOutcome::rejected(ResultKind::BadParameter)
}

fn run(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    name: &'static str,
    built: Result<AtaCommand, BuildError>,
    data: DataBuffer<'_>,
) -> CommandOutcome {
    let cmd = match built {
        Ok(cmd) => cmd,
        Err(e) => return rejected(name, &e),
    };
    if cmd.is_data_transfer() {
        if data.is_empty() {
            return rejected(name, &"empty data buffer");
        }
        if data.len() != cmd.data_length as usize {
            return rejected(name, &"data buffer length mismatch");
        }
    }
    let outcome = send_ata_passthrough(ctx, transport, &cmd, data);
    tracing::debug!(command = name, result = %outcome.result);
    outcome
}

fn sector_count_of(buf_len: usize) -> Result<u16, BuildError> {
    if buf_len == 0 || buf_len % LOGICAL_SECTOR_SIZE as usize != 0 {
        return Err(BuildError::UnalignedTransfer(buf_len as u32));
    }
    let count = buf_len / LOGICAL_SECTOR_SIZE as usize;
    if count > u16::MAX as usize {
        return Err(BuildError::InvalidSectorCount(count as u32));
    }
    Ok(count as u16)
}

pub fn read_sectors(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    extended: bool,
    lba: u64,
    buf: &mut [u8],
) -> CommandOutcome {
    let built = sector_count_of(buf.len()).and_then(|n| builders::read_sectors(extended, lba, n));
    run(ctx, transport, "read sectors", built, DataBuffer::In(buf))
}

pub fn write_sectors(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    extended: bool,
    lba: u64,
    buf: &[u8],
) -> CommandOutcome {
    let built = sector_count_of(buf.len()).and_then(|n| builders::write_sectors(extended, lba, n));
    run(ctx, transport, "write sectors", built, DataBuffer::Out(buf))
}

pub fn read_sectors_chs(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    extended: bool,
    cylinder: u16,
    head: u8,
    sector: u8,
    buf: &mut [u8],
) -> CommandOutcome {
    let built = sector_count_of(buf.len())
        .and_then(|n| builders::read_sectors_chs(extended, cylinder, head, sector, n));
    run(ctx, transport, "read sectors chs", built, DataBuffer::In(buf))
}

pub fn write_sectors_chs(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    extended: bool,
    cylinder: u16,
    head: u8,
    sector: u8,
    buf: &[u8],
) -> CommandOutcome {
    let built = sector_count_of(buf.len())
        .and_then(|n| builders::write_sectors_chs(extended, cylinder, head, sector, n));
    run(ctx, transport, "write sectors chs", built, DataBuffer::Out(buf))
}

pub fn read_dma(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    extended: bool,
    lba: u64,
    buf: &mut [u8],
) -> CommandOutcome {
    let dma_mode = ctx.dma_mode;
    let built =
        sector_count_of(buf.len()).and_then(|n| builders::read_dma(extended, lba, n, dma_mode));
    run(ctx, transport, "read dma", built, DataBuffer::In(buf))
}

pub fn write_dma(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    extended: bool,
    lba: u64,
    buf: &[u8],
) -> CommandOutcome {
    let dma_mode = ctx.dma_mode;
    let built =
        sector_count_of(buf.len()).and_then(|n| builders::write_dma(extended, lba, n, dma_mode));
    run(ctx, transport, "write dma", built, DataBuffer::Out(buf))
}

pub fn read_multiple(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    extended: bool,
    lba: u64,
    buf: &mut [u8],
) -> CommandOutcome {
    let drq = ctx.sectors_per_drq;
    let built =
        sector_count_of(buf.len()).and_then(|n| builders::read_multiple(extended, lba, n, drq));
    run(ctx, transport, "read multiple", built, DataBuffer::In(buf))
}

pub fn write_multiple(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    extended: bool,
    lba: u64,
    buf: &[u8],
) -> CommandOutcome {
    let drq = ctx.sectors_per_drq;
    let built =
        sector_count_of(buf.len()).and_then(|n| builders::write_multiple(extended, lba, n, drq));
    run(ctx, transport, "write multiple", built, DataBuffer::Out(buf))
}

pub fn read_verify(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    extended: bool,
    lba: u64,
    count: u16,
) -> CommandOutcome {
    let built = builders::read_verify(extended, lba, count);
    run(ctx, transport, "read verify", built, DataBuffer::None)
}

pub fn seek(ctx: &mut DeviceContext, transport: &mut dyn ScsiTransport, lba: u32) -> CommandOutcome {
    run(ctx, transport, "seek", Ok(builders::seek_lba(lba)), DataBuffer::None)
}

pub fn format_track(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    cylinder: u16,
    head: u8,
    sectors_per_track: u8,
    interleave: &[u8],
) -> CommandOutcome {
    let built = builders::format_track(cylinder, head, sectors_per_track, interleave.len() as u32);
    let data = if interleave.is_empty() {
        DataBuffer::None
    } else {
        DataBuffer::Out(interleave)
    };
    run(ctx, transport, "format track", built, data)
}

/// IDENTIFY DEVICE. On a pass the buffer is normalized to host order and the
/// identify checksum is verified; a bad checksum downgrades the result to
/// `WarnInvalidChecksum` without failing the command.
pub fn identify(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    buf: &mut [u8; 512],
) -> CommandOutcome {
    let outcome = run(ctx, transport, "identify", Ok(builders::identify()), DataBuffer::In(buf));
    finish_identify(buf, outcome)
}

pub fn identify_dma(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    buf: &mut [u8; 512],
) -> CommandOutcome {
    let built = builders::identify_dma(ctx.dma_mode);
    let outcome = run(ctx, transport, "identify dma", built, DataBuffer::In(buf));
    finish_identify(buf, outcome)
}

pub fn identify_packet(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    buf: &mut [u8; 512],
) -> CommandOutcome {
    let outcome = run(
        ctx,
        transport,
        "identify packet",
        Ok(builders::identify_packet()),
        DataBuffer::In(buf),
    );
    finish_identify(buf, outcome)
}

fn finish_identify(buf: &mut [u8; 512], mut outcome: CommandOutcome) -> CommandOutcome {
    if !outcome.result.is_success_class() {
        return outcome;
    }
    byte_swap_identify(buf);
    if validate_checksum(buf) == ChecksumOutcome::Invalid {
        outcome.result = ResultKind::WarnInvalidChecksum;
    }
    outcome
}

pub fn smart_read_data(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    buf: &mut [u8; 512],
) -> CommandOutcome {
    run(
        ctx,
        transport,
        "smart read data",
        Ok(builders::smart_read_data()),
        DataBuffer::In(buf),
    )
}

pub fn smart_read_thresholds(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    buf: &mut [u8; 512],
) -> CommandOutcome {
    run(
        ctx,
        transport,
        "smart read thresholds",
        Ok(builders::smart_read_thresholds()),
        DataBuffer::In(buf),
    )
}

pub fn smart_read_log(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    log_address: u8,
    buf: &mut [u8],
) -> CommandOutcome {
    let built = sector_count_of(buf.len()).and_then(|n| {
        if n > 0xFF {
            Err(BuildError::InvalidSectorCount(u32::from(n)))
        } else {
            builders::smart_read_log(log_address, n as u8)
        }
    });
    run(ctx, transport, "smart read log", built, DataBuffer::In(buf))
}

/// SMART RETURN STATUS. Interpret the verdict with [`smart_verdict`].
pub fn smart_return_status(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
) -> CommandOutcome {
    run(
        ctx,
        transport,
        "smart return status",
        Ok(builders::smart_return_status()),
        DataBuffer::None,
    )
}

pub fn smart_enable_operations(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
) -> CommandOutcome {
    run(
        ctx,
        transport,
        "smart enable operations",
        Ok(builders::smart_enable_operations()),
        DataBuffer::None,
    )
}

/// Read the SMART RETURN STATUS verdict out of the returned registers: the
/// command key echoed back means healthy, 0xF4/0x2C means a pre-fail
/// attribute crossed its threshold.
pub fn smart_verdict(rtfr: &ReturnTaskFile) -> SmartVerdict {
    match (rtfr.lba_mid, rtfr.lba_high) {
        (SMART_LBA_MID_KEY, SMART_LBA_HI_KEY) => SmartVerdict::Healthy,
        (0xF4, 0x2C) => SmartVerdict::ThresholdExceeded,
        _ => SmartVerdict::Indeterminate,
    }
}

pub fn flush_cache(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    extended: bool,
) -> CommandOutcome {
    run(
        ctx,
        transport,
        "flush cache",
        Ok(builders::flush_cache(extended)),
        DataBuffer::None,
    )
}

pub fn set_features(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    subcommand: u8,
    count: u8,
    lba: u32,
) -> CommandOutcome {
    run(
        ctx,
        transport,
        "set features",
        Ok(builders::set_features(subcommand, count, lba)),
        DataBuffer::None,
    )
}

pub fn standby_immediate(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
) -> CommandOutcome {
    run(
        ctx,
        transport,
        "standby immediate",
        Ok(builders::standby_immediate()),
        DataBuffer::None,
    )
}

/// CHECK POWER MODE; the power state comes back in the sector count register
/// of the outcome's task file.
pub fn check_power_mode(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
) -> CommandOutcome {
    run(
        ctx,
        transport,
        "check power mode",
        Ok(builders::check_power_mode()),
        DataBuffer::None,
    )
}
