//! Encoder properties: 28-bit register repositioning across all three
//! bridges is pure byte movement, no transformation.

use proptest::prelude::*;

use keel_passthrough::{csmi, sunplus, ti, TiConfig};

proptest! {
    #[test]
    fn twenty_eight_bit_registers_survive_every_encoder(
        lba in 0u64..(1 << 28),
        count in 1u16..=0x100,
    ) {
        let cmd = keel_ata::read_sectors(false, lba, count).unwrap();

        let c = csmi::encode(&cmd).unwrap();
        prop_assert_eq!(c[5], cmd.tfr.sector_count);
        prop_assert_eq!(c[7], cmd.tfr.lba_low);
        prop_assert_eq!(c[9], cmd.tfr.lba_mid);
        prop_assert_eq!(c[11], cmd.tfr.lba_high);
        prop_assert_eq!(c[12], cmd.tfr.device);
        prop_assert_eq!(c[13], cmd.tfr.command);

        let s = sunplus::encode_low(&cmd);
        prop_assert_eq!(s[4], cmd.tfr.feature);
        prop_assert_eq!(s[5], cmd.tfr.sector_count);
        prop_assert_eq!(s[6], cmd.tfr.lba_low);
        prop_assert_eq!(s[7], cmd.tfr.lba_mid);
        prop_assert_eq!(s[8], cmd.tfr.lba_high);
        prop_assert_eq!(s[9], cmd.tfr.device);
        prop_assert_eq!(s[10], cmd.tfr.command);
        prop_assert!(sunplus::encode_high(&cmd).is_none());

        let t = ti::encode(&cmd, &TiConfig::default()).unwrap();
        prop_assert_eq!(t[2], cmd.tfr.feature);
        prop_assert_eq!(t[3], cmd.tfr.sector_count);
        prop_assert_eq!(t[4], cmd.tfr.lba_low);
        prop_assert_eq!(t[5], cmd.tfr.lba_mid);
        prop_assert_eq!(t[6], cmd.tfr.lba_high);
        prop_assert_eq!(t[7], cmd.tfr.device);
        prop_assert_eq!(t[8], cmd.tfr.command);
    }

    #[test]
    fn sunplus_status_decode_never_panics(resp in proptest::collection::vec(any::<u8>(), 0..24)) {
        let _ = sunplus::decode_status(&resp, keel_types::ResultKind::Success);
    }
}
