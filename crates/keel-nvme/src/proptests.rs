use proptest::prelude::*;

use crate::command::{CommandKind, NvmeCommand};
use crate::status;

proptest! {
    #[test]
    fn classify_total_over_status_dwords(dw in any::<u32>()) {
        let _ = status::classify(dw);
        let _ = status::fields(dw);
    }

    #[test]
    fn status_fields_roundtrip(sct in 0u8..8, sc in any::<u8>()) {
        let dw = status::status_dword_from_parts(sct, sc);
        let f = status::fields(dw);
        prop_assert_eq!(f.status_code_type, sct);
        prop_assert_eq!(f.status_code, sc);
        prop_assert!(!f.do_not_retry);
        prop_assert!(!f.more);
    }

    #[test]
    fn command_image_is_little_endian(
        opcode in any::<u8>(),
        nsid in any::<u32>(),
        prp1 in any::<u64>(),
        dw10 in any::<u32>(),
    ) {
        let mut cmd = NvmeCommand::new(CommandKind::Admin, opcode);
        cmd.set_nsid(nsid);
        cmd.set_prp1(prp1);
        cmd.set_cdw(0, dw10);
        let bytes = cmd.to_bytes();
        prop_assert_eq!(bytes.len(), 64);
        prop_assert_eq!(bytes[0], opcode);
        prop_assert_eq!(&bytes[4..8], &nsid.to_le_bytes());
        prop_assert_eq!(&bytes[24..32], &prp1.to_le_bytes());
        prop_assert_eq!(&bytes[40..44], &dw10.to_le_bytes());
    }

    #[test]
    fn lba_builders_never_panic(
        nsid in any::<u32>(),
        lba in any::<u64>(),
        blocks in any::<u16>(),
    ) {
        let _ = crate::nvm::read(nsid, lba, blocks);
        let _ = crate::nvm::write(nsid, lba, blocks, true, false);
        let _ = crate::nvm::write_zeroes(nsid, lba, blocks, true);
    }

    #[test]
    fn get_log_page_never_panics(
        log_id in any::<u8>(),
        len in any::<u32>(),
        offset in any::<u64>(),
    ) {
        let _ = crate::admin::get_log_page(log_id, 0, len, offset);
    }
}
