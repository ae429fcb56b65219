//! Per-device passthrough state.

use keel_ata::{DmaMode, ReturnTaskFile};

/// Which legacy bridge family the device sits behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassthroughKind {
    Csmi,
    Sunplus,
    Ti,
}

/// TI bridge encoding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TiConfig {
    /// Use the legacy 0xF0 opcode instead of 0x3C.
    pub legacy_opcode: bool,
    /// Force a specific transfer mode number (0..=7) instead of letting the
    /// bridge pick the fastest available.
    pub forced_mode: Option<u8>,
}

/// Device-scoped state consulted and mutated by every dispatched command.
///
/// The last-command snapshot (`last_rtfr`, `last_sense`) is overwritten by
/// each call, so a `DeviceContext` is not safe for concurrent use. Callers
/// serialize access per device, one in-flight command at a time.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    pub kind: PassthroughKind,
    /// Configured device DMA mode; DMA-protocol builders fail when `None`.
    pub dma_mode: DmaMode,
    /// Configured logical sectors per DRQ block for READ/WRITE MULTIPLE.
    pub sectors_per_drq: u16,
    pub ti: TiConfig,

    /// Registers returned (or synthesized) by the most recent command.
    pub last_rtfr: Option<ReturnTaskFile>,
    /// Raw sense bytes from the most recent command; empty when the
    /// transport returned none.
    pub last_sense: Vec<u8>,
}

impl DeviceContext {
    pub fn new(kind: PassthroughKind) -> DeviceContext {
        DeviceContext {
            kind,
            dma_mode: DmaMode::None,
            sectors_per_drq: 1,
            ti: TiConfig::default(),
            last_rtfr: None,
            last_sense: Vec::new(),
        }
    }
}
