use proptest::prelude::*;

use crate::sense::{classify, SenseData};
use crate::inquiry::StandardInquiry;
use crate::vpd::AtaInformationVpd;

proptest! {
    #[test]
    fn sense_parse_never_panics(buf in proptest::collection::vec(any::<u8>(), 0..260)) {
        let _ = SenseData::parse(&buf);
    }

    #[test]
    fn classify_never_panics(key in any::<u8>(), asc in any::<u8>(), ascq in any::<u8>()) {
        let _ = classify(key, asc, ascq);
    }

    #[test]
    fn inquiry_parse_never_panics(buf in proptest::collection::vec(any::<u8>(), 0..128)) {
        let _ = StandardInquiry::parse(&buf);
    }

    #[test]
    fn vpd_parse_never_panics(buf in proptest::collection::vec(any::<u8>(), 0..640)) {
        let _ = AtaInformationVpd::parse(&buf);
    }

    #[test]
    fn fixed_format_parse_reads_fixed_offsets(
        key in 0u8..16,
        asc in any::<u8>(),
        ascq in any::<u8>(),
        extra in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut buf = vec![0u8; 18];
        buf[0] = 0x70;
        buf[2] = key;
        buf[7] = 10;
        buf[12] = asc;
        buf[13] = ascq;
        buf.extend_from_slice(&extra);
        let s = SenseData::parse(&buf);
        prop_assert!(s.valid_structure);
        prop_assert_eq!(s.sense_key, key);
        prop_assert_eq!(s.asc, asc);
        prop_assert_eq!(s.ascq, ascq);
    }
}
