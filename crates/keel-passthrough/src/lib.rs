//! Bridge passthrough: the transport seams, the legacy-bridge CDB encoders
//! (CSMI, Sunplus, TI), and the dispatcher that issues an [`AtaCommand`]
//! through them and classifies what comes back.
//!
//! The library never opens or closes device handles. A caller hands in an
//! implementation of [`ScsiTransport`] (or [`NvmeBridgeTransport`] for the
//! NVMe-over-USB probes) and this crate produces the exact CDB bytes that
//! transport must carry, then decodes the returned sense/status into a
//! [`keel_types::ResultKind`] plus a register snapshot.
//!
//! [`AtaCommand`]: keel_ata::AtaCommand

mod context;
mod dispatch;
mod error;
mod transport;

pub mod commands;
pub mod csmi;
pub mod sunplus;
pub mod ti;

pub use context::{DeviceContext, PassthroughKind, TiConfig};
pub use dispatch::{apply_timeout, send_ata_passthrough, CommandOutcome};
pub use error::EncodeError;
pub use transport::{
    DataBuffer, NvmeBridgeResponse, NvmeBridgeTransport, ScsiTransport, TransportResponse,
    SENSE_BUFFER_LEN,
};
