//! NVMe command and completion images, status classification, and builders
//! for the admin/NVM commands this library issues through bridge passthrough.

mod command;

pub mod admin;
pub mod ids;
pub mod nvm;
pub mod status;

pub use command::{CommandKind, CompletionEntry, NvmeCommand, NVME_COMMAND_LEN};

#[cfg(test)]
mod proptests;
