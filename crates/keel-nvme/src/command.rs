//! The 64-byte NVMe command image and the completion-queue entry.
//!
//! The command is stored as 16 dwords with named accessors rather than
//! overlapping typed structs; one memory image, byte-exact, no aliasing.

pub const NVME_COMMAND_LEN: usize = 64;

/// Which command-set interpretation of the image is valid for this
/// invocation. Exactly one applies per command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Admin,
    Nvm,
}

/// One NVMe submission-queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NvmeCommand {
    pub kind: CommandKind,
    dwords: [u32; 16],
}

impl NvmeCommand {
    pub fn new(kind: CommandKind, opcode: u8) -> NvmeCommand {
        let mut cmd = NvmeCommand {
            kind,
            dwords: [0; 16],
        };
        cmd.dwords[0] = u32::from(opcode);
        cmd
    }

    pub fn opcode(&self) -> u8 {
        self.dwords[0] as u8
    }

    /// FUSE bits 9:8 and PSDT bits 15:14 of dword 0.
    pub fn flags(&self) -> u8 {
        (self.dwords[0] >> 8) as u8
    }

    pub fn set_flags(&mut self, flags: u8) {
        self.dwords[0] = (self.dwords[0] & !0x0000_FF00) | u32::from(flags) << 8;
    }

    pub fn command_id(&self) -> u16 {
        (self.dwords[0] >> 16) as u16
    }

    pub fn set_command_id(&mut self, cid: u16) {
        self.dwords[0] = (self.dwords[0] & 0x0000_FFFF) | u32::from(cid) << 16;
    }

    pub fn nsid(&self) -> u32 {
        self.dwords[1]
    }

    pub fn set_nsid(&mut self, nsid: u32) {
        self.dwords[1] = nsid;
    }

    pub fn metadata_pointer(&self) -> u64 {
        u64::from(self.dwords[4]) | u64::from(self.dwords[5]) << 32
    }

    pub fn set_metadata_pointer(&mut self, mptr: u64) {
        self.dwords[4] = mptr as u32;
        self.dwords[5] = (mptr >> 32) as u32;
    }

    pub fn prp1(&self) -> u64 {
        u64::from(self.dwords[6]) | u64::from(self.dwords[7]) << 32
    }

    pub fn set_prp1(&mut self, prp: u64) {
        self.dwords[6] = prp as u32;
        self.dwords[7] = (prp >> 32) as u32;
    }

    pub fn prp2(&self) -> u64 {
        u64::from(self.dwords[8]) | u64::from(self.dwords[9]) << 32
    }

    pub fn set_prp2(&mut self, prp: u64) {
        self.dwords[8] = prp as u32;
        self.dwords[9] = (prp >> 32) as u32;
    }

    /// Per-opcode dwords 10 through 15 (index 0 = CDW10).
    pub fn cdw(&self, index: usize) -> u32 {
        assert!(index < 6, "CDW index out of range");
        self.dwords[10 + index]
    }

    pub fn set_cdw(&mut self, index: usize, value: u32) {
        assert!(index < 6, "CDW index out of range");
        self.dwords[10 + index] = value;
    }

    /// Raw dword view of the whole 64-byte image.
    pub fn as_dwords(&self) -> &[u32; 16] {
        &self.dwords
    }

    /// Little-endian byte serialization (the wire layout).
    pub fn to_bytes(&self) -> [u8; NVME_COMMAND_LEN] {
        let mut out = [0u8; NVME_COMMAND_LEN];
        for (i, dw) in self.dwords.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&dw.to_le_bytes());
        }
        out
    }
}

/// Completion-queue entry: up to 4 dwords, each independently present.
///
/// Some transports (notably USB bridge vendor passthroughs) can only return a
/// subset of the completion; consumers must check per-dword validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionEntry {
    dwords: [Option<u32>; 4],
}

impl CompletionEntry {
    pub fn new() -> CompletionEntry {
        CompletionEntry::default()
    }

    pub fn with_all(dw0: u32, dw1: u32, dw2: u32, dw3: u32) -> CompletionEntry {
        CompletionEntry {
            dwords: [Some(dw0), Some(dw1), Some(dw2), Some(dw3)],
        }
    }

    /// A completion where only the status dword (DW3) came back.
    pub fn status_only(dw3: u32) -> CompletionEntry {
        CompletionEntry {
            dwords: [None, None, None, Some(dw3)],
        }
    }

    pub fn set_dword(&mut self, index: usize, value: u32) {
        assert!(index < 4, "completion dword index out of range");
        self.dwords[index] = Some(value);
    }

    pub fn dword(&self, index: usize) -> Option<u32> {
        assert!(index < 4, "completion dword index out of range");
        self.dwords[index]
    }

    /// Command-specific result (DW0).
    pub fn result(&self) -> Option<u32> {
        self.dwords[0]
    }

    pub fn sq_head(&self) -> Option<u16> {
        self.dwords[2].map(|dw| dw as u16)
    }

    pub fn sq_id(&self) -> Option<u16> {
        self.dwords[2].map(|dw| (dw >> 16) as u16)
    }

    pub fn command_id(&self) -> Option<u16> {
        self.dwords[3].map(|dw| dw as u16)
    }

    /// The status dword (DW3); feeds [`crate::status::classify`].
    pub fn status_dword(&self) -> Option<u32> {
        self.dwords[3]
    }

    pub fn is_complete(&self) -> bool {
        self.dwords.iter().all(Option::is_some)
    }
}
