//! Shared result taxonomy and byte helpers for the keel workspace.
//!
//! Every command issued through a keel transport ultimately resolves to a
//! [`ResultKind`]. The taxonomy is deliberately flat: it mirrors the coarse
//! classification a caller needs to decide "done / retry elsewhere / give up",
//! not the full richness of the underlying sense or status data (that detail
//! travels alongside in the decoded sense/completion records).

use std::fmt;

/// Coarse classification of a completed (or rejected) passthrough command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Success,
    /// Generic failure with no more specific classification.
    Failure,
    /// The device or transport understood the request and refused it.
    NotSupported,
    /// The request cannot be expressed on this transport/bridge.
    NotAvailable,
    BadParameter,
    MemoryFailure,
    /// Long-running operation (format, sanitize, self-test) still running.
    InProgress,
    Aborted,
    AccessDenied,
    /// Elapsed wall-clock time exceeded the caller's timeout budget.
    Timeout,
    /// The command completed but the bridge could not return every register.
    WarnIncompleteRtfrs,
    /// The command completed but the identify-data checksum did not verify.
    WarnInvalidChecksum,
    Unknown,
}

impl ResultKind {
    /// Success plus the warning kinds: the command itself completed.
    pub fn is_success_class(self) -> bool {
        matches!(
            self,
            ResultKind::Success
                | ResultKind::WarnIncompleteRtfrs
                | ResultKind::WarnInvalidChecksum
        )
    }

    pub fn is_failure_class(self) -> bool {
        !self.is_success_class() && self != ResultKind::InProgress
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResultKind::Success => "success",
            ResultKind::Failure => "failure",
            ResultKind::NotSupported => "not supported",
            ResultKind::NotAvailable => "not available on this transport",
            ResultKind::BadParameter => "bad parameter",
            ResultKind::MemoryFailure => "memory failure",
            ResultKind::InProgress => "in progress",
            ResultKind::Aborted => "aborted",
            ResultKind::AccessDenied => "access denied",
            ResultKind::Timeout => "timeout",
            ResultKind::WarnIncompleteRtfrs => "completed (incomplete returned registers)",
            ResultKind::WarnInvalidChecksum => "completed (invalid checksum)",
            ResultKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Big-endian u16 at `offset`, or 0 if the slice is too short.
///
/// Wire-format readers in this workspace tolerate short buffers by reading
/// zero rather than panicking; a device that truncates a response gets
/// zero-defaulted fields, never garbage.
pub fn be_u16_at(buf: &[u8], offset: usize) -> u16 {
    match buf.get(offset..offset + 2) {
        Some(b) => u16::from_be_bytes([b[0], b[1]]),
        None => 0,
    }
}

pub fn be_u32_at(buf: &[u8], offset: usize) -> u32 {
    match buf.get(offset..offset + 4) {
        Some(b) => u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
        None => 0,
    }
}

pub fn be_u64_at(buf: &[u8], offset: usize) -> u64 {
    match buf.get(offset..offset + 8) {
        Some(b) => u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
        None => 0,
    }
}

pub fn le_u16_at(buf: &[u8], offset: usize) -> u16 {
    match buf.get(offset..offset + 2) {
        Some(b) => u16::from_le_bytes([b[0], b[1]]),
        None => 0,
    }
}

pub fn le_u32_at(buf: &[u8], offset: usize) -> u32 {
    match buf.get(offset..offset + 4) {
        Some(b) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        None => 0,
    }
}

pub fn le_u64_at(buf: &[u8], offset: usize) -> u64 {
    match buf.get(offset..offset + 8) {
        Some(b) => u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
        None => 0,
    }
}
