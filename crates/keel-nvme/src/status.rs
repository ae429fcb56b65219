//! NVMe completion-status decoding and classification.

use keel_types::ResultKind;

/// Fields extracted from the completion status dword (DW3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFields {
    pub do_not_retry: bool,
    pub more: bool,
    /// Status code type, bits 27:25.
    pub status_code_type: u8,
    /// Status code, bits 24:17.
    pub status_code: u8,
    pub phase: bool,
    pub command_id: u16,
}

pub fn fields(status_dword: u32) -> StatusFields {
    StatusFields {
        do_not_retry: status_dword & 0x8000_0000 != 0,
        more: status_dword & 0x4000_0000 != 0,
        status_code_type: ((status_dword >> 25) & 0x07) as u8,
        status_code: ((status_dword >> 17) & 0xFF) as u8,
        phase: status_dword & 0x0001_0000 != 0,
        command_id: status_dword as u16,
    }
}

// Status code types.
pub const SCT_GENERIC: u8 = 0x0;
pub const SCT_COMMAND_SPECIFIC: u8 = 0x1;
pub const SCT_MEDIA_INTEGRITY: u8 = 0x2;
pub const SCT_PATH_RELATED: u8 = 0x3;

struct StatusEntry {
    sct: u8,
    sc: u8,
    kind: ResultKind,
    desc: &'static str,
}

const fn s(sct: u8, sc: u8, kind: ResultKind, desc: &'static str) -> StatusEntry {
    StatusEntry {
        sct,
        sc,
        kind,
        desc,
    }
}

/// Strictly ascending on (sct, sc); binary-searched.
const STATUS_TABLE: &[StatusEntry] = &[
    s(SCT_GENERIC, 0x00, ResultKind::Success, "Successful Completion"),
    s(SCT_GENERIC, 0x01, ResultKind::NotSupported, "Invalid Command Opcode"),
    s(SCT_GENERIC, 0x02, ResultKind::NotSupported, "Invalid Field in Command"),
    s(SCT_GENERIC, 0x03, ResultKind::Failure, "Command ID Conflict"),
    s(SCT_GENERIC, 0x04, ResultKind::Failure, "Data Transfer Error"),
    s(SCT_GENERIC, 0x05, ResultKind::Aborted, "Commands Aborted due to Power Loss Notification"),
    s(SCT_GENERIC, 0x06, ResultKind::Failure, "Internal Error"),
    s(SCT_GENERIC, 0x07, ResultKind::Aborted, "Command Abort Requested"),
    s(SCT_GENERIC, 0x08, ResultKind::Aborted, "Command Aborted due to SQ Deletion"),
    s(SCT_GENERIC, 0x09, ResultKind::Aborted, "Command Aborted due to Failed Fused Command"),
    s(SCT_GENERIC, 0x0A, ResultKind::Aborted, "Command Aborted due to Missing Fused Command"),
    s(SCT_GENERIC, 0x0B, ResultKind::NotSupported, "Invalid Namespace or Format"),
    s(SCT_GENERIC, 0x0C, ResultKind::Failure, "Command Sequence Error"),
    s(SCT_GENERIC, 0x0D, ResultKind::Failure, "Invalid SGL Segment Descriptor"),
    s(SCT_GENERIC, 0x0E, ResultKind::Failure, "Invalid Number of SGL Descriptors"),
    s(SCT_GENERIC, 0x0F, ResultKind::Failure, "Data SGL Length Invalid"),
    s(SCT_GENERIC, 0x10, ResultKind::Failure, "Metadata SGL Length Invalid"),
    s(SCT_GENERIC, 0x11, ResultKind::Failure, "SGL Descriptor Type Invalid"),
    s(SCT_GENERIC, 0x12, ResultKind::Failure, "Invalid Use of Controller Memory Buffer"),
    s(SCT_GENERIC, 0x13, ResultKind::Failure, "PRP Offset Invalid"),
    s(SCT_GENERIC, 0x14, ResultKind::Failure, "Atomic Write Unit Exceeded"),
    s(SCT_GENERIC, 0x15, ResultKind::AccessDenied, "Operation Denied"),
    s(SCT_GENERIC, 0x16, ResultKind::Failure, "SGL Offset Invalid"),
    s(SCT_GENERIC, 0x18, ResultKind::Failure, "Host Identifier Inconsistent Format"),
    s(SCT_GENERIC, 0x19, ResultKind::Failure, "Keep Alive Timer Expired"),
    s(SCT_GENERIC, 0x1A, ResultKind::BadParameter, "Keep Alive Timeout Invalid"),
    s(SCT_GENERIC, 0x1B, ResultKind::Aborted, "Command Aborted due to Preempt and Abort"),
    s(SCT_GENERIC, 0x1C, ResultKind::Failure, "Sanitize Failed"),
    s(SCT_GENERIC, 0x1D, ResultKind::InProgress, "Sanitize In Progress"),
    s(SCT_GENERIC, 0x1E, ResultKind::BadParameter, "SGL Data Block Granularity Invalid"),
    s(SCT_GENERIC, 0x1F, ResultKind::NotSupported, "Command Not Supported for Queue in CMB"),
    s(SCT_GENERIC, 0x20, ResultKind::Failure, "Namespace is Write Protected"),
    s(SCT_GENERIC, 0x21, ResultKind::Aborted, "Command Interrupted"),
    s(SCT_GENERIC, 0x22, ResultKind::Failure, "Transient Transport Error"),
    s(SCT_GENERIC, 0x80, ResultKind::Failure, "LBA Out of Range"),
    s(SCT_GENERIC, 0x81, ResultKind::Failure, "Capacity Exceeded"),
    s(SCT_GENERIC, 0x82, ResultKind::Failure, "Namespace Not Ready"),
    s(SCT_GENERIC, 0x83, ResultKind::AccessDenied, "Reservation Conflict"),
    s(SCT_GENERIC, 0x84, ResultKind::InProgress, "Format In Progress"),
    s(SCT_COMMAND_SPECIFIC, 0x00, ResultKind::BadParameter, "Completion Queue Invalid"),
    s(SCT_COMMAND_SPECIFIC, 0x01, ResultKind::BadParameter, "Invalid Queue Identifier"),
    s(SCT_COMMAND_SPECIFIC, 0x02, ResultKind::BadParameter, "Invalid Queue Size"),
    s(SCT_COMMAND_SPECIFIC, 0x03, ResultKind::Failure, "Abort Command Limit Exceeded"),
    s(SCT_COMMAND_SPECIFIC, 0x05, ResultKind::Failure, "Asynchronous Event Request Limit Exceeded"),
    s(SCT_COMMAND_SPECIFIC, 0x06, ResultKind::BadParameter, "Invalid Firmware Slot"),
    s(SCT_COMMAND_SPECIFIC, 0x07, ResultKind::BadParameter, "Invalid Firmware Image"),
    s(SCT_COMMAND_SPECIFIC, 0x08, ResultKind::BadParameter, "Invalid Interrupt Vector"),
    s(SCT_COMMAND_SPECIFIC, 0x09, ResultKind::BadParameter, "Invalid Log Page"),
    s(SCT_COMMAND_SPECIFIC, 0x0A, ResultKind::BadParameter, "Invalid Format"),
    s(SCT_COMMAND_SPECIFIC, 0x0B, ResultKind::InProgress, "Firmware Activation Requires Conventional Reset"),
    s(SCT_COMMAND_SPECIFIC, 0x0C, ResultKind::BadParameter, "Invalid Queue Deletion"),
    s(SCT_COMMAND_SPECIFIC, 0x0D, ResultKind::Failure, "Feature Identifier Not Saveable"),
    s(SCT_COMMAND_SPECIFIC, 0x0E, ResultKind::NotSupported, "Feature Not Changeable"),
    s(SCT_COMMAND_SPECIFIC, 0x0F, ResultKind::NotSupported, "Feature Not Namespace Specific"),
    s(SCT_COMMAND_SPECIFIC, 0x10, ResultKind::InProgress, "Firmware Activation Requires NVM Subsystem Reset"),
    s(SCT_COMMAND_SPECIFIC, 0x11, ResultKind::InProgress, "Firmware Activation Requires Controller Level Reset"),
    s(SCT_COMMAND_SPECIFIC, 0x12, ResultKind::InProgress, "Firmware Activation Requires Maximum Time Violation"),
    s(SCT_COMMAND_SPECIFIC, 0x13, ResultKind::Failure, "Firmware Activation Prohibited"),
    s(SCT_COMMAND_SPECIFIC, 0x14, ResultKind::Failure, "Overlapping Range"),
    s(SCT_COMMAND_SPECIFIC, 0x15, ResultKind::Failure, "Namespace Insufficient Capacity"),
    s(SCT_COMMAND_SPECIFIC, 0x16, ResultKind::BadParameter, "Namespace Identifier Unavailable"),
    s(SCT_COMMAND_SPECIFIC, 0x18, ResultKind::Failure, "Namespace Already Attached"),
    s(SCT_COMMAND_SPECIFIC, 0x19, ResultKind::Failure, "Namespace Is Private"),
    s(SCT_COMMAND_SPECIFIC, 0x1A, ResultKind::Failure, "Namespace Not Attached"),
    s(SCT_COMMAND_SPECIFIC, 0x1B, ResultKind::NotSupported, "Thin Provisioning Not Supported"),
    s(SCT_COMMAND_SPECIFIC, 0x1C, ResultKind::BadParameter, "Controller List Invalid"),
    s(SCT_COMMAND_SPECIFIC, 0x1D, ResultKind::InProgress, "Device Self-test In Progress"),
    s(SCT_COMMAND_SPECIFIC, 0x1E, ResultKind::AccessDenied, "Boot Partition Write Prohibited"),
    s(SCT_COMMAND_SPECIFIC, 0x82, ResultKind::NotSupported, "Attempted Write to Read Only Range"),
    s(SCT_MEDIA_INTEGRITY, 0x80, ResultKind::Failure, "Write Fault"),
    s(SCT_MEDIA_INTEGRITY, 0x81, ResultKind::Failure, "Unrecovered Read Error"),
    s(SCT_MEDIA_INTEGRITY, 0x82, ResultKind::Failure, "End-to-end Guard Check Error"),
    s(SCT_MEDIA_INTEGRITY, 0x83, ResultKind::Failure, "End-to-end Application Tag Check Error"),
    s(SCT_MEDIA_INTEGRITY, 0x84, ResultKind::Failure, "End-to-end Reference Tag Check Error"),
    s(SCT_MEDIA_INTEGRITY, 0x85, ResultKind::Failure, "Compare Failure"),
    s(SCT_MEDIA_INTEGRITY, 0x86, ResultKind::AccessDenied, "Access Denied"),
    s(SCT_MEDIA_INTEGRITY, 0x87, ResultKind::Failure, "Deallocated or Unwritten Logical Block"),
    s(SCT_PATH_RELATED, 0x00, ResultKind::Failure, "Internal Path Error"),
    s(SCT_PATH_RELATED, 0x01, ResultKind::Failure, "Asymmetric Access Persistent Loss"),
    s(SCT_PATH_RELATED, 0x02, ResultKind::Failure, "Asymmetric Access Inaccessible"),
    s(SCT_PATH_RELATED, 0x03, ResultKind::InProgress, "Asymmetric Access Transition"),
    s(SCT_PATH_RELATED, 0x60, ResultKind::Failure, "Controller Pathing Error"),
    s(SCT_PATH_RELATED, 0x70, ResultKind::Failure, "Host Pathing Error"),
    s(SCT_PATH_RELATED, 0x71, ResultKind::Aborted, "Command Aborted By Host"),
];

fn lookup(sct: u8, sc: u8) -> Option<&'static StatusEntry> {
    STATUS_TABLE
        .binary_search_by(|entry| (entry.sct, entry.sc).cmp(&(sct, sc)))
        .ok()
        .map(|i| &STATUS_TABLE[i])
}

/// Classify a completion status dword. Pairs absent from the table classify
/// as `Unknown`; never fails.
pub fn classify(status_dword: u32) -> ResultKind {
    let f = fields(status_dword);
    match lookup(f.status_code_type, f.status_code) {
        Some(entry) => entry.kind,
        None => ResultKind::Unknown,
    }
}

pub fn describe(sct: u8, sc: u8) -> Option<&'static str> {
    lookup(sct, sc).map(|entry| entry.desc)
}

/// Build a status dword from its parts; used by transports that receive the
/// (type, code) pair out-of-band.
pub fn status_dword_from_parts(sct: u8, sc: u8) -> u32 {
    u32::from(sct & 0x07) << 25 | u32::from(sc) << 17
}
