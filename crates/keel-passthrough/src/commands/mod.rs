//! Per-command entry points: keel-ata/keel-nvme builders wired through the
//! dispatcher, with the post-processing each command needs.

pub mod ata;
pub mod nvme;
