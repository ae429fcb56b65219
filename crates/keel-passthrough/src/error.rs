use keel_types::ResultKind;
use thiserror::Error;

/// Why an encoder refused a command before any transport call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The command is valid but this bridge's CDB cannot carry it.
    #[error("{0} cannot be expressed on this bridge")]
    NotAvailable(&'static str),
    /// The bridge refuses this command category by design.
    #[error("{0} is not supported by this bridge")]
    NotSupported(&'static str),
}

impl EncodeError {
    pub fn result_kind(self) -> ResultKind {
        match self {
            EncodeError::NotAvailable(_) => ResultKind::NotAvailable,
            EncodeError::NotSupported(_) => ResultKind::NotSupported,
        }
    }
}
