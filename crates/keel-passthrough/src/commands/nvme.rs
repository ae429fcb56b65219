//! NVMe entry points over a bridge transport, classified through the status
//! table. Admin commands route through `send_admin`, NVM commands through
//! `send_io`; most bridges only implement the former.

use keel_nvme::{admin, nvm, status, CommandKind, CompletionEntry, NvmeCommand};
use keel_types::ResultKind;

use crate::dispatch::apply_timeout;
use crate::transport::{DataBuffer, NvmeBridgeTransport};

pub const DEFAULT_TIMEOUT_SECONDS: u32 = 15;

/// What one bridged NVMe command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NvmeOutcome {
    pub result: ResultKind,
    pub completion: CompletionEntry,
}

fn run(
    transport: &mut dyn NvmeBridgeTransport,
    name: &'static str,
    cmd: &NvmeCommand,
    data: DataBuffer<'_>,
    timeout_seconds: u32,
) -> NvmeOutcome {
    let resp = match cmd.kind {
        CommandKind::Admin => transport.send_admin(cmd, data, timeout_seconds),
        CommandKind::Nvm => transport.send_io(cmd, data, timeout_seconds),
    };
    // The completion status dword is authoritative when the bridge returned
    // one; otherwise the transport verdict stands.
    let result = match resp.completion.status_dword() {
        Some(dw) if resp.result.is_success_class() => status::classify(dw),
        _ => resp.result,
    };
    let result = apply_timeout(result, resp.elapsed, timeout_seconds);
    tracing::debug!(command = name, result = %result);
    NvmeOutcome {
        result,
        completion: resp.completion,
    }
}

pub fn identify_controller(
    transport: &mut dyn NvmeBridgeTransport,
    buf: &mut [u8; 4096],
) -> NvmeOutcome {
    let cmd = admin::identify_controller();
    run(transport, "nvme identify controller", &cmd, DataBuffer::In(buf), DEFAULT_TIMEOUT_SECONDS)
}

pub fn identify_namespace(
    transport: &mut dyn NvmeBridgeTransport,
    nsid: u32,
    buf: &mut [u8; 4096],
) -> NvmeOutcome {
    let cmd = admin::identify_namespace(nsid);
    run(transport, "nvme identify namespace", &cmd, DataBuffer::In(buf), DEFAULT_TIMEOUT_SECONDS)
}

pub fn get_log_page(
    transport: &mut dyn NvmeBridgeTransport,
    log_id: u8,
    nsid: u32,
    offset: u64,
    buf: &mut [u8],
) -> NvmeOutcome {
    let cmd = admin::get_log_page(log_id, nsid, buf.len() as u32, offset);
    run(transport, "nvme get log page", &cmd, DataBuffer::In(buf), DEFAULT_TIMEOUT_SECONDS)
}

/// GET FEATURES; the feature value comes back in completion dword 0.
pub fn get_features(
    transport: &mut dyn NvmeBridgeTransport,
    feature_id: u8,
    select: u8,
) -> NvmeOutcome {
    let cmd = admin::get_features(feature_id, select, 0);
    run(transport, "nvme get features", &cmd, DataBuffer::None, DEFAULT_TIMEOUT_SECONDS)
}

pub fn set_features(
    transport: &mut dyn NvmeBridgeTransport,
    feature_id: u8,
    save: bool,
    value: u32,
) -> NvmeOutcome {
    let cmd = admin::set_features(feature_id, save, value);
    run(transport, "nvme set features", &cmd, DataBuffer::None, DEFAULT_TIMEOUT_SECONDS)
}

#[allow(clippy::too_many_arguments)]
pub fn format_nvm(
    transport: &mut dyn NvmeBridgeTransport,
    nsid: u32,
    lba_format: u8,
    metadata_in_lba: bool,
    protection_type: u8,
    protection_first: bool,
    ses: u8,
    timeout_seconds: u32,
) -> NvmeOutcome {
    let cmd = admin::format_nvm(nsid, lba_format, metadata_in_lba, protection_type, protection_first, ses);
    run(transport, "nvme format", &cmd, DataBuffer::None, timeout_seconds)
}

pub fn sanitize(
    transport: &mut dyn NvmeBridgeTransport,
    action: admin::SanitizeAction,
    overwrite_passes: u8,
    invert_pattern: bool,
    overwrite_pattern: u32,
    timeout_seconds: u32,
) -> NvmeOutcome {
    let cmd = admin::sanitize(action, false, overwrite_passes, invert_pattern, false, overwrite_pattern);
    run(transport, "nvme sanitize", &cmd, DataBuffer::None, timeout_seconds)
}

pub fn firmware_download(
    transport: &mut dyn NvmeBridgeTransport,
    offset_bytes: u32,
    image: &[u8],
) -> NvmeOutcome {
    let cmd = admin::firmware_download(image.len() as u32, offset_bytes);
    run(transport, "nvme firmware download", &cmd, DataBuffer::Out(image), DEFAULT_TIMEOUT_SECONDS)
}

pub fn firmware_commit(
    transport: &mut dyn NvmeBridgeTransport,
    slot: u8,
    commit_action: u8,
) -> NvmeOutcome {
    let cmd = admin::firmware_commit(slot, commit_action);
    run(transport, "nvme firmware commit", &cmd, DataBuffer::None, DEFAULT_TIMEOUT_SECONDS)
}

pub fn read(
    transport: &mut dyn NvmeBridgeTransport,
    nsid: u32,
    lba: u64,
    blocks: u16,
    buf: &mut [u8],
) -> NvmeOutcome {
    let cmd = nvm::read(nsid, lba, blocks);
    run(transport, "nvme read", &cmd, DataBuffer::In(buf), DEFAULT_TIMEOUT_SECONDS)
}

pub fn write(
    transport: &mut dyn NvmeBridgeTransport,
    nsid: u32,
    lba: u64,
    blocks: u16,
    fua: bool,
    buf: &[u8],
) -> NvmeOutcome {
    let cmd = nvm::write(nsid, lba, blocks, fua, false);
    run(transport, "nvme write", &cmd, DataBuffer::Out(buf), DEFAULT_TIMEOUT_SECONDS)
}

pub fn compare(
    transport: &mut dyn NvmeBridgeTransport,
    nsid: u32,
    lba: u64,
    blocks: u16,
    buf: &[u8],
) -> NvmeOutcome {
    let cmd = nvm::compare(nsid, lba, blocks);
    run(transport, "nvme compare", &cmd, DataBuffer::Out(buf), DEFAULT_TIMEOUT_SECONDS)
}

pub fn verify(
    transport: &mut dyn NvmeBridgeTransport,
    nsid: u32,
    lba: u64,
    blocks: u16,
) -> NvmeOutcome {
    let cmd = nvm::verify(nsid, lba, blocks);
    run(transport, "nvme verify", &cmd, DataBuffer::None, DEFAULT_TIMEOUT_SECONDS)
}

pub fn flush(transport: &mut dyn NvmeBridgeTransport, nsid: u32) -> NvmeOutcome {
    let cmd = nvm::flush(nsid);
    run(transport, "nvme flush", &cmd, DataBuffer::None, DEFAULT_TIMEOUT_SECONDS)
}

pub fn reservation_report(
    transport: &mut dyn NvmeBridgeTransport,
    nsid: u32,
    extended: bool,
    buf: &mut [u8],
) -> NvmeOutcome {
    let cmd = nvm::reservation_report(nsid, buf.len() as u32, extended);
    run(transport, "nvme reservation report", &cmd, DataBuffer::In(buf), DEFAULT_TIMEOUT_SECONDS)
}

pub fn reservation_register(
    transport: &mut dyn NvmeBridgeTransport,
    nsid: u32,
    action: u8,
    ignore_existing_key: bool,
    keys: &[u8; 16],
) -> NvmeOutcome {
    let cmd = nvm::reservation_register(nsid, action, ignore_existing_key, 0);
    run(transport, "nvme reservation register", &cmd, DataBuffer::Out(keys), DEFAULT_TIMEOUT_SECONDS)
}

pub fn reservation_acquire(
    transport: &mut dyn NvmeBridgeTransport,
    nsid: u32,
    action: u8,
    reservation_type: u8,
    keys: &[u8; 16],
) -> NvmeOutcome {
    let cmd = nvm::reservation_acquire(nsid, action, reservation_type);
    run(transport, "nvme reservation acquire", &cmd, DataBuffer::Out(keys), DEFAULT_TIMEOUT_SECONDS)
}

pub fn reservation_release(
    transport: &mut dyn NvmeBridgeTransport,
    nsid: u32,
    action: u8,
    reservation_type: u8,
    key: &[u8; 8],
) -> NvmeOutcome {
    let cmd = nvm::reservation_release(nsid, action, reservation_type);
    run(transport, "nvme reservation release", &cmd, DataBuffer::Out(key), DEFAULT_TIMEOUT_SECONDS)
}
