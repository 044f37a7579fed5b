//! Round-trip properties over the full input space

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use redarc_huffman::{compress, decompress};

proptest! {
    #[test]
    fn prop_roundtrip(input in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let restored = decompress(&compress(&input)).unwrap();
        prop_assert_eq!(restored, input);
    }

    #[test]
    fn prop_deterministic(input in proptest::collection::vec(any::<u8>(), 0..1024)) {
        prop_assert_eq!(compress(&input), compress(&input));
    }
}

#[test]
fn test_one_mebibyte_random_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let input: Vec<u8> = (0..1 << 20).map(|_| rng.random()).collect();
    let packed = compress(&input);
    assert_eq!(decompress(&packed).unwrap(), input);
}

#[test]
fn test_all_symbols_present() {
    let input: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
    assert_eq!(decompress(&compress(&input)).unwrap(), input);
}

#[test]
fn test_two_symbol_extremes() {
    let mut input = vec![0u8; 100_000];
    input.push(255);
    assert_eq!(decompress(&compress(&input)).unwrap(), input);
}
