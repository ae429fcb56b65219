//! ATA register-level command model: the task file, the passthrough command
//! descriptor, per-command builders, and the identify/SMART wire records.

mod builders;
mod command;
mod taskfile;

pub mod identify;
pub mod regs;
pub mod smart;

pub use builders::*;
pub use command::{
    AtaCommand, BuildError, CommandType, Direction, DmaMode, LengthPolicy, Protocol,
    TransferLengthRegister,
};
pub use taskfile::{ReturnTaskFile, TaskFile};
