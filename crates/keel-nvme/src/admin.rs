//! Admin command builders.

use crate::command::{CommandKind, NvmeCommand};
use crate::ids::*;

/// IDENTIFY with the given CNS value. `nsid` matters only for
/// namespace-scoped CNS values.
pub fn identify(cns: u8, nsid: u32) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Admin, ADMIN_IDENTIFY);
    cmd.set_nsid(nsid);
    cmd.set_cdw(0, u32::from(cns));
    cmd
}

pub fn identify_controller() -> NvmeCommand {
    identify(CNS_CONTROLLER, 0)
}

pub fn identify_namespace(nsid: u32) -> NvmeCommand {
    identify(CNS_NAMESPACE, nsid)
}

pub fn identify_active_namespace_list(starting_nsid: u32) -> NvmeCommand {
    identify(CNS_ACTIVE_NAMESPACE_LIST, starting_nsid)
}

/// GET LOG PAGE. `length_bytes` must be a dword multiple; the dword count
/// minus one is split across CDW10/CDW11, the byte offset across CDW12/13.
pub fn get_log_page(log_id: u8, nsid: u32, length_bytes: u32, offset: u64) -> NvmeCommand {
    let numd = (length_bytes / 4).saturating_sub(1);
    let mut cmd = NvmeCommand::new(CommandKind::Admin, ADMIN_GET_LOG_PAGE);
    cmd.set_nsid(nsid);
    cmd.set_cdw(0, u32::from(log_id) | (numd & 0xFFFF) << 16);
    cmd.set_cdw(1, numd >> 16);
    cmd.set_cdw(2, offset as u32);
    cmd.set_cdw(3, (offset >> 32) as u32);
    cmd
}

/// GET FEATURES. `select`: 0 current, 1 default, 2 saved, 3 supported caps.
pub fn get_features(feature_id: u8, select: u8, cdw11: u32) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Admin, ADMIN_GET_FEATURES);
    cmd.set_cdw(0, u32::from(feature_id) | u32::from(select & 0x07) << 8);
    cmd.set_cdw(1, cdw11);
    cmd
}

pub fn set_features(feature_id: u8, save: bool, cdw11: u32) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Admin, ADMIN_SET_FEATURES);
    let mut dw10 = u32::from(feature_id);
    if save {
        dw10 |= 1 << 31;
    }
    cmd.set_cdw(0, dw10);
    cmd.set_cdw(1, cdw11);
    cmd
}

/// FORMAT NVM. `ses`: secure erase setting (0 none, 1 user data, 2 crypto).
pub fn format_nvm(
    nsid: u32,
    lba_format: u8,
    metadata_in_lba: bool,
    protection_type: u8,
    protection_first: bool,
    ses: u8,
) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Admin, ADMIN_FORMAT_NVM);
    cmd.set_nsid(nsid);
    let mut dw10 = u32::from(lba_format & 0x0F);
    if metadata_in_lba {
        dw10 |= 1 << 4;
    }
    dw10 |= u32::from(protection_type & 0x07) << 5;
    if protection_first {
        dw10 |= 1 << 8;
    }
    dw10 |= u32::from(ses & 0x07) << 9;
    cmd.set_cdw(0, dw10);
    cmd
}

/// Sanitize action for CDW10 bits 2:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeAction {
    ExitFailureMode,
    BlockErase,
    Overwrite,
    CryptoErase,
}

impl SanitizeAction {
    fn bits(self) -> u32 {
        match self {
            SanitizeAction::ExitFailureMode => 0x1,
            SanitizeAction::BlockErase => 0x2,
            SanitizeAction::Overwrite => 0x3,
            SanitizeAction::CryptoErase => 0x4,
        }
    }
}

pub fn sanitize(
    action: SanitizeAction,
    allow_unrestricted_exit: bool,
    overwrite_passes: u8,
    invert_pattern: bool,
    no_dealloc: bool,
    overwrite_pattern: u32,
) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Admin, ADMIN_SANITIZE);
    let mut dw10 = action.bits();
    if allow_unrestricted_exit {
        dw10 |= 1 << 3;
    }
    dw10 |= u32::from(overwrite_passes & 0x0F) << 4;
    if invert_pattern {
        dw10 |= 1 << 8;
    }
    if no_dealloc {
        dw10 |= 1 << 9;
    }
    cmd.set_cdw(0, dw10);
    cmd.set_cdw(1, overwrite_pattern);
    cmd
}

/// FIRMWARE IMAGE DOWNLOAD: `length_bytes` and `offset_bytes` in dwords - 1 /
/// dwords respectively on the wire.
pub fn firmware_download(length_bytes: u32, offset_bytes: u32) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Admin, ADMIN_FIRMWARE_DOWNLOAD);
    cmd.set_cdw(0, (length_bytes / 4).saturating_sub(1));
    cmd.set_cdw(1, offset_bytes / 4);
    cmd
}

/// FIRMWARE COMMIT. `commit_action` bits 5:3, slot bits 2:0.
pub fn firmware_commit(slot: u8, commit_action: u8) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Admin, ADMIN_FIRMWARE_COMMIT);
    cmd.set_cdw(0, u32::from(slot & 0x07) | u32::from(commit_action & 0x07) << 3);
    cmd
}

pub fn abort(sq_id: u16, command_id: u16) -> NvmeCommand {
    let mut cmd = NvmeCommand::new(CommandKind::Admin, ADMIN_ABORT);
    cmd.set_cdw(0, u32::from(sq_id) | u32::from(command_id) << 16);
    cmd
}
