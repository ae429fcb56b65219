//! The external collaborator seams: a SCSI CDB transport and an NVMe admin
//! bridge. Implementations own the device handle and the ioctl plumbing;
//! this crate only produces bytes for them and interprets what they return.

use std::time::Duration;

use keel_nvme::{CompletionEntry, NvmeCommand};
use keel_types::ResultKind;

/// Sense buffer size the dispatcher allocates per call. Large enough for
/// fixed-format sense and every descriptor this crate decodes.
pub const SENSE_BUFFER_LEN: usize = 32;

/// A caller buffer plus its transfer direction.
#[derive(Debug)]
pub enum DataBuffer<'a> {
    None,
    In(&'a mut [u8]),
    Out(&'a [u8]),
}

impl DataBuffer<'_> {
    pub fn len(&self) -> usize {
        match self {
            DataBuffer::None => 0,
            DataBuffer::In(buf) => buf.len(),
            DataBuffer::Out(buf) => buf.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a transport reports back for one CDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    pub result: ResultKind,
    /// Wall-clock time the call took; compared against the caller's timeout
    /// budget after the fact.
    pub elapsed: Duration,
}

/// One synchronous CDB round trip. The implementation fills `sense` with
/// whatever sense bytes the device returned (zeroes if none).
pub trait ScsiTransport {
    fn send_cdb(
        &mut self,
        cdb: &[u8],
        data: DataBuffer<'_>,
        sense: &mut [u8],
        timeout_seconds: u32,
    ) -> TransportResponse;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NvmeBridgeResponse {
    pub completion: CompletionEntry,
    pub result: ResultKind,
    pub elapsed: Duration,
}

impl NvmeBridgeResponse {
    /// A response the bridge refused before touching the device.
    pub fn rejected(result: ResultKind) -> NvmeBridgeResponse {
        NvmeBridgeResponse {
            completion: CompletionEntry::new(),
            result,
            elapsed: Duration::ZERO,
        }
    }
}

/// NVMe command passthrough for USB bridges that tunnel admin (and sometimes
/// NVM) commands. Discovery uses the admin side for its identify probes.
pub trait NvmeBridgeTransport {
    fn send_admin(
        &mut self,
        command: &NvmeCommand,
        data: DataBuffer<'_>,
        timeout_seconds: u32,
    ) -> NvmeBridgeResponse;

    /// NVM (I/O) command passthrough. Most bridges only tunnel admin
    /// commands; the default refuses with `NotAvailable`.
    fn send_io(
        &mut self,
        _command: &NvmeCommand,
        _data: DataBuffer<'_>,
        _timeout_seconds: u32,
    ) -> NvmeBridgeResponse {
        NvmeBridgeResponse::rejected(ResultKind::NotAvailable)
    }
}
