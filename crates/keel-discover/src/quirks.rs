//! Bridge-signature quirk table: an ordered list of (matcher, flag set)
//! pairs evaluated in priority order. Each entry is independently testable;
//! the first match wins.
//!
//! The signatures are vendor-observed on specific bridge firmware, not drawn
//! from any specification.

use bitflags::bitflags;

bitflags! {
    /// Passthrough hacks a bridge is known to need.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Quirks: u32 {
        /// Transfers above 128 KiB hang or truncate.
        const MAX_TRANSFER_128K = 1 << 0;
        /// Only the 12-byte SAT passthrough CDB is accepted.
        const SAT_12_BYTE_ONLY = 1 << 1;
        /// CHECK CONDITION reporting is unreliable; avoid ck_cond probing.
        const NO_CHECK_CONDITION = 1 << 2;
        /// Returned task-file registers are fabricated or stale.
        const UNRELIABLE_RTFRS = 1 << 3;
        /// PIO data commands must transfer one sector at a time.
        const SINGLE_SECTOR_PIO = 1 << 4;
        /// VPD page requests confuse the firmware.
        const NO_VPD_PAGES = 1 << 5;
        /// ASMedia NVMe-over-USB bridge family.
        const NVME_ASMEDIA = 1 << 6;
        /// JMicron NVMe-over-USB bridge family.
        const NVME_JMICRON = 1 << 7;
        /// Realtek NVMe-over-USB bridge family.
        const NVME_REALTEK = 1 << 8;
    }
}

impl Quirks {
    pub fn is_nvme_bridge(self) -> bool {
        self.intersects(Quirks::NVME_ASMEDIA | Quirks::NVME_JMICRON | Quirks::NVME_REALTEK)
    }
}

/// One field pattern: exact, prefix, or substring over the trimmed inquiry
/// string.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    Any,
    Exact(&'static str),
    Prefix(&'static str),
    Contains(&'static str),
}

impl Pattern {
    fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Exact(s) => value == *s,
            Pattern::Prefix(s) => value.starts_with(s),
            Pattern::Contains(s) => value.contains(s),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QuirkEntry {
    pub vendor: Pattern,
    pub product: Pattern,
    pub revision: Pattern,
    pub quirks: Quirks,
}

impl QuirkEntry {
    pub fn matches(&self, vendor: &str, product: &str, revision: &str) -> bool {
        self.vendor.matches(vendor) && self.product.matches(product) && self.revision.matches(revision)
    }
}

const fn entry(vendor: Pattern, product: Pattern, revision: Pattern, quirks: Quirks) -> QuirkEntry {
    QuirkEntry {
        vendor,
        product,
        revision,
        quirks,
    }
}

/// Evaluated top to bottom; more specific entries go first.
pub static BRIDGE_QUIRKS: &[QuirkEntry] = &[
    // ASMedia NVMe bridges enumerate as "ASMT 2362"/"ASMT 236X".
    entry(
        Pattern::Exact("ASMT"),
        Pattern::Prefix("236"),
        Pattern::Any,
        Quirks::NVME_ASMEDIA.union(Quirks::UNRELIABLE_RTFRS),
    ),
    // JMicron JMS583 NVMe enclosures.
    entry(
        Pattern::Exact("JMicron"),
        Pattern::Prefix("JMS58"),
        Pattern::Any,
        Quirks::NVME_JMICRON.union(Quirks::MAX_TRANSFER_128K),
    ),
    // Realtek RTL9210/9210B NVMe enclosures.
    entry(
        Pattern::Any,
        Pattern::Contains("RTL9210"),
        Pattern::Any,
        Quirks::NVME_REALTEK,
    ),
    // JMicron SATA bridges: 16-byte passthrough hangs on old firmware.
    entry(
        Pattern::Exact("JMicron"),
        Pattern::Any,
        Pattern::Any,
        Quirks::SAT_12_BYTE_ONLY.union(Quirks::MAX_TRANSFER_128K),
    ),
    // Early Cypress/Sunplus-era enclosures fabricate their registers.
    entry(
        Pattern::Exact("Sunplus"),
        Pattern::Any,
        Pattern::Any,
        Quirks::UNRELIABLE_RTFRS.union(Quirks::SINGLE_SECTOR_PIO),
    ),
    entry(
        Pattern::Exact("Initio"),
        Pattern::Any,
        Pattern::Any,
        Quirks::NO_CHECK_CONDITION,
    ),
    // Prolific PL2571/3507 family chokes on VPD requests.
    entry(
        Pattern::Exact("Prolific"),
        Pattern::Any,
        Pattern::Any,
        Quirks::NO_VPD_PAGES.union(Quirks::MAX_TRANSFER_128K),
    ),
];

/// First matching quirk entry for the trimmed inquiry strings, if any.
pub fn match_bridge(vendor: &str, product: &str, revision: &str) -> Option<&'static QuirkEntry> {
    BRIDGE_QUIRKS
        .iter()
        .find(|e| e.matches(vendor, product, revision))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins_over_later_vendor_entry() {
        // "JMicron JMS583" must hit the NVMe entry, not the generic SATA one.
        let hit = match_bridge("JMicron", "JMS583", "0204").unwrap();
        assert!(hit.quirks.contains(Quirks::NVME_JMICRON));
        assert!(!hit.quirks.contains(Quirks::SAT_12_BYTE_ONLY));

        let generic = match_bridge("JMicron", "JM20336", "").unwrap();
        assert!(generic.quirks.contains(Quirks::SAT_12_BYTE_ONLY));
    }

    #[test]
    fn substring_and_prefix_patterns() {
        assert!(match_bridge("Realtek", "USB RTL9210 NVME", "")
            .unwrap()
            .quirks
            .contains(Quirks::NVME_REALTEK));
        assert!(match_bridge("ASMT", "2362", "0")
            .unwrap()
            .quirks
            .contains(Quirks::NVME_ASMEDIA));
        assert!(match_bridge("ASMT", "1153E", "0").is_none());
    }

    #[test]
    fn unknown_strings_match_nothing() {
        assert!(match_bridge("ATA", "Samsung SSD 870", "SVT02B6Q").is_none());
    }

    #[test]
    fn nvme_bridge_flag_grouping() {
        assert!(Quirks::NVME_REALTEK.is_nvme_bridge());
        assert!(!Quirks::SAT_12_BYTE_ONLY.is_nvme_bridge());
    }
}
