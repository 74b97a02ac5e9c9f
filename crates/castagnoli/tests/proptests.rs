use castagnoli::{Accumulator, Checksum, Crc32c, accumulate, checksum, equals, finalize, init, kernels};
use proptest::prelude::*;

fn accumulator() -> impl Strategy<Value = Accumulator> {
  any::<[u8; 4]>().prop_map(Accumulator::from_le_bytes)
}

proptest! {
  #[test]
  fn streaming_matches_oneshot(
    data in proptest::collection::vec(any::<u8>(), 0..=4096),
    split in any::<usize>(),
    chunk in 1usize..=257
  ) {
    let split = split % (data.len() + 1);
    let (a, b) = data.split_at(split);
    let oneshot = checksum(&data);

    prop_assert_eq!(finalize(accumulate(accumulate(init(), a), b)), oneshot);

    let mut hasher = Crc32c::new();
    for part in data.chunks(chunk) {
      hasher.update(part);
    }
    prop_assert_eq!(hasher.finalize(), oneshot);
  }

  #[test]
  fn empty_input_is_noop(acc in accumulator()) {
    prop_assert_eq!(accumulate(acc, &[]), acc);
  }

  #[test]
  fn resume_continues(data in proptest::collection::vec(any::<u8>(), 0..=2048), split in any::<usize>()) {
    let split = split % (data.len() + 1);
    let (a, b) = data.split_at(split);
    let resumed = accumulate(Accumulator::resume(checksum(a)), b);
    prop_assert_eq!(finalize(resumed), checksum(&data));
  }

  #[test]
  fn resume_inverts_finalize(acc in accumulator()) {
    prop_assert_eq!(Accumulator::resume(finalize(acc)), acc);
  }

  #[test]
  fn equals_is_value_equality(a in any::<u32>(), b in any::<u32>()) {
    prop_assert!(equals(a, a));
    prop_assert_eq!(equals(a, b), a == b);
    prop_assert_eq!(equals(a, b), equals(b, a));
  }

  #[test]
  fn kernels_agree(data in proptest::collection::vec(any::<u8>(), 0..=2048), crc in any::<u32>()) {
    let expected = (kernels::REFERENCE.func)(crc, &data);
    for kernel in kernels::available() {
      prop_assert_eq!((kernel.func)(crc, &data), expected, "{}", kernel.name);
    }
  }

  #[test]
  fn single_bit_flip_changes_crc(data in proptest::collection::vec(any::<u8>(), 1..=1024), bit in any::<usize>()) {
    let bit = bit % (data.len() * 8);
    let mut flipped = data.clone();
    flipped[bit / 8] ^= 1 << (bit % 8);
    prop_assert_ne!(checksum(&data), checksum(&flipped));
  }
}
