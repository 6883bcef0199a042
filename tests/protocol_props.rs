//! Property tests for the wire encoding.

use proptest::prelude::*;
use usbrelay_ctl::protocol::{self, BoardVariant};

fn known_variants() -> impl Strategy<Value = BoardVariant> {
    prop_oneof![
        Just(BoardVariant::TwoRelay),
        Just(BoardVariant::FourRelay),
        Just(BoardVariant::EightRelay),
    ]
}

/// Mask with only the variant's channels set.
fn clip(variant: BoardVariant, mask: u8) -> u8 {
    mask & (u8::MAX >> (8 - variant.relay_count()))
}

proptest! {
    /// decode(encode(m)) == m for every mask that only uses the
    /// variant's channels.
    #[test]
    fn round_trip_law(variant in known_variants(), mask in any::<u8>()) {
        let mask = clip(variant, mask);
        let wire = protocol::encode_mask(variant, mask);
        prop_assert_eq!(protocol::decode_state(variant, wire), mask);
    }

    /// The per-relay fold and an independently-built bitmask encode to
    /// the same wire byte.
    #[test]
    fn overload_equivalence(
        (variant, relays) in known_variants().prop_flat_map(|v| {
            (
                Just(v),
                proptest::collection::vec(any::<bool>(), v.relay_count() as usize),
            )
        })
    ) {
        let mask = relays
            .iter()
            .enumerate()
            .fold(0u8, |m, (i, &on)| if on { m | (1u8 << i) } else { m });

        prop_assert_eq!(
            protocol::encode_mask(variant, protocol::mask_from_relays(&relays)),
            protocol::encode_mask(variant, mask)
        );
    }

    /// The 2-relay board never sees anything outside its two channels.
    #[test]
    fn two_relay_clips_high_bits(mask in any::<u8>()) {
        let wire = protocol::encode_mask(BoardVariant::TwoRelay, mask);
        prop_assert_eq!(wire & !0b11, 0);
        prop_assert_eq!(wire, mask & 0b11);
    }

    /// Larger boards invert every bit, including the unused ones.
    #[test]
    fn inverting_boards_flip_all_bits(variant in prop_oneof![
        Just(BoardVariant::FourRelay),
        Just(BoardVariant::EightRelay),
    ], mask in any::<u8>()) {
        prop_assert_eq!(protocol::encode_mask(variant, mask), !mask);
    }

    /// Folding booleans and reading bits back agree for any length up
    /// to a full byte.
    #[test]
    fn mask_from_relays_sets_expected_bits(
        relays in proptest::collection::vec(any::<bool>(), 0..=8)
    ) {
        let mask = protocol::mask_from_relays(&relays);
        for (i, &on) in relays.iter().enumerate() {
            prop_assert_eq!(mask & (1u8 << i) != 0, on);
        }
        // No bits beyond the slice length.
        if relays.len() < 8 {
            prop_assert_eq!(mask >> relays.len(), 0);
        }
    }
}
