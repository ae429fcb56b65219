//! Command dispatch: pick the encoder for the device's bridge, issue the CDB
//! sequence, classify the response, and record the last-command snapshot.

use std::time::Duration;

use keel_ata::regs::SYNTHESIZED_GOOD_STATUS;
use keel_ata::{AtaCommand, ReturnTaskFile};
use keel_scsi::{AtaStatusReturnDescriptor, SenseData};
use keel_types::ResultKind;

use crate::context::{DeviceContext, PassthroughKind};
use crate::transport::{DataBuffer, ScsiTransport, SENSE_BUFFER_LEN};
use crate::{csmi, sunplus, ti};

/// Everything one dispatched command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub result: ResultKind,
    pub rtfr: ReturnTaskFile,
    pub sense: SenseData,
}

impl CommandOutcome {
    /// Outcome for a command refused before any transport call.
    pub fn rejected(result: ResultKind) -> CommandOutcome {
        CommandOutcome {
            result,
            rtfr: ReturnTaskFile::default(),
            sense: SenseData::default(),
        }
    }
}

/// After-the-fact timeout enforcement: once the whole seconds of elapsed
/// wall-clock time exceed the caller's budget, the verdict is `Timeout` no
/// matter what the transport reported.
pub fn apply_timeout(result: ResultKind, elapsed: Duration, timeout_seconds: u32) -> ResultKind {
    if elapsed.as_secs() > u64::from(timeout_seconds) {
        ResultKind::Timeout
    } else {
        result
    }
}

fn rtfr_from_descriptor(d: &AtaStatusReturnDescriptor) -> ReturnTaskFile {
    ReturnTaskFile {
        status: d.status,
        error: d.error,
        sector_count: d.sector_count as u8,
        sector_count_ext: (d.sector_count >> 8) as u8,
        lba_low: d.lba as u8,
        lba_mid: (d.lba >> 8) as u8,
        lba_high: (d.lba >> 16) as u8,
        lba_low_ext: (d.lba >> 24) as u8,
        lba_mid_ext: (d.lba >> 32) as u8,
        lba_high_ext: (d.lba >> 40) as u8,
        device: d.device,
    }
}

/// Issue one ATA passthrough command through the bridge the context names.
///
/// Encoder refusals return immediately with no transport call and no change
/// to the context snapshot. Otherwise the snapshot (`last_rtfr`,
/// `last_sense`) is overwritten whether the command passed or failed.
pub fn send_ata_passthrough(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    cmd: &AtaCommand,
    data: DataBuffer<'_>,
) -> CommandOutcome {
    let outcome = match ctx.kind {
        PassthroughKind::Csmi => send_csmi(ctx, transport, cmd, data),
        PassthroughKind::Sunplus => send_sunplus(ctx, transport, cmd, data),
        PassthroughKind::Ti => send_ti(ctx, transport, cmd, data),
    };
    tracing::debug!(kind = ?ctx.kind, result = %outcome.result, "passthrough command");
    outcome
}

fn record(ctx: &mut DeviceContext, rtfr: ReturnTaskFile, sense: &[u8]) {
    ctx.last_rtfr = Some(rtfr);
    ctx.last_sense.clear();
    ctx.last_sense.extend_from_slice(sense);
}

fn send_csmi(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    cmd: &AtaCommand,
    data: DataBuffer<'_>,
) -> CommandOutcome {
    let cdb = match csmi::encode(cmd) {
        Ok(cdb) => cdb,
        Err(e) => return CommandOutcome::rejected(e.result_kind()),
    };

    let mut sense_buf = [0u8; SENSE_BUFFER_LEN];
    let resp = transport.send_cdb(&cdb, data, &mut sense_buf, cmd.timeout_seconds);
    let sense = SenseData::parse(&sense_buf);

    let mut result = if sense.valid_structure {
        sense.classify()
    } else {
        resp.result
    };

    // Registers come back through the SAT status-return descriptor. A pass
    // without one still completed, but the caller should know the snapshot
    // is fabricated.
    let rtfr = match sense.ata_status_return.as_ref() {
        Some(d) => rtfr_from_descriptor(d),
        None => {
            let mut rtfr = ReturnTaskFile::default();
            if result == ResultKind::Success {
                rtfr.status = SYNTHESIZED_GOOD_STATUS;
                result = ResultKind::WarnIncompleteRtfrs;
            }
            rtfr
        }
    };

    let result = apply_timeout(result, resp.elapsed, cmd.timeout_seconds);
    record(ctx, rtfr, &sense_buf);
    CommandOutcome { result, rtfr, sense }
}

fn send_sunplus(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    cmd: &AtaCommand,
    data: DataBuffer<'_>,
) -> CommandOutcome {
    let mut total = Duration::ZERO;

    if let Some(high) = sunplus::encode_high(cmd) {
        let mut sense_buf = [0u8; SENSE_BUFFER_LEN];
        let resp = transport.send_cdb(&high, DataBuffer::None, &mut sense_buf, cmd.timeout_seconds);
        total += resp.elapsed;
        if resp.result != ResultKind::Success {
            let sense = SenseData::parse(&sense_buf);
            let result = if sense.valid_structure {
                sense.classify()
            } else {
                resp.result
            };
            let result = apply_timeout(result, total, cmd.timeout_seconds);
            record(ctx, ReturnTaskFile::default(), &sense_buf);
            return CommandOutcome {
                result,
                rtfr: ReturnTaskFile::default(),
                sense,
            };
        }
    }

    let low = sunplus::encode_low(cmd);
    let mut sense_buf = [0u8; SENSE_BUFFER_LEN];
    let resp = transport.send_cdb(&low, data, &mut sense_buf, cmd.timeout_seconds);
    total += resp.elapsed;
    let sense = SenseData::parse(&sense_buf);
    let raw = if sense.valid_structure {
        sense.classify()
    } else {
        resp.result
    };

    let mut status_buf = [0u8; sunplus::STATUS_RESPONSE_LEN];
    let mut status_sense = [0u8; SENSE_BUFFER_LEN];
    let status_resp = transport.send_cdb(
        &sunplus::status_cdb(),
        DataBuffer::In(&mut status_buf),
        &mut status_sense,
        cmd.timeout_seconds,
    );
    total += status_resp.elapsed;

    let (rtfr, result) = if status_resp.result.is_success_class() {
        sunplus::decode_status(&status_buf, raw)
    } else if raw == ResultKind::Success {
        // Command passed but the register fetch did not.
        (ReturnTaskFile::default(), ResultKind::WarnIncompleteRtfrs)
    } else {
        (ReturnTaskFile::default(), raw)
    };

    let result = apply_timeout(result, total, cmd.timeout_seconds);
    record(ctx, rtfr, &sense_buf);
    CommandOutcome { result, rtfr, sense }
}

fn send_ti(
    ctx: &mut DeviceContext,
    transport: &mut dyn ScsiTransport,
    cmd: &AtaCommand,
    data: DataBuffer<'_>,
) -> CommandOutcome {
    let cdb = match ti::encode(cmd, &ctx.ti) {
        Ok(cdb) => cdb,
        Err(e) => return CommandOutcome::rejected(e.result_kind()),
    };

    let mut sense_buf = [0u8; SENSE_BUFFER_LEN];
    let resp = transport.send_cdb(&cdb, data, &mut sense_buf, cmd.timeout_seconds);
    let sense = SenseData::parse(&sense_buf);
    let result = if sense.valid_structure {
        sense.classify()
    } else {
        resp.result
    };
    let result = apply_timeout(result, resp.elapsed, cmd.timeout_seconds);
    let rtfr = ti::synthesize_rtfr(result);
    record(ctx, rtfr, &sense_buf);
    CommandOutcome { result, rtfr, sense }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_overrides_only_past_the_budget() {
        let r = ResultKind::Success;
        assert_eq!(apply_timeout(r, Duration::from_secs(15), 15), r);
        assert_eq!(
            apply_timeout(r, Duration::from_secs(16), 15),
            ResultKind::Timeout
        );
        // Sub-second overshoot truncates to whole seconds.
        assert_eq!(apply_timeout(r, Duration::from_millis(15_900), 15), r);
    }
}
