//! First use of the dispatch cell from many threads at once.
//!
//! Kept alone in its own test binary so the cell is still unresolved when
//! the threads start.

use std::{
  sync::{Arc, Barrier},
  thread,
};

use castagnoli::{checksum, dispatch_state, kernels, selected_backend};

const THREADS: usize = 32;
const CALLS: usize = 200;

#[test]
fn concurrent_first_use_is_correct_and_idempotent() {
  #[cfg(feature = "runtime-dispatch")]
  assert_eq!(dispatch_state(), castagnoli::CellState::Unresolved);

  let data: Vec<u8> = (0..4099u32).map(|i| (i * 131 + 7) as u8).collect();
  let expected: Vec<u32> = (0..CALLS)
    .map(|i| (kernels::REFERENCE.func)(0xFFFF_FFFF, &data[..(i * 37) % data.len()]) ^ 0xFFFF_FFFF)
    .collect();

  let barrier = Arc::new(Barrier::new(THREADS));
  let data = Arc::new(data);
  let expected = Arc::new(expected);

  let handles: Vec<_> = (0..THREADS)
    .map(|t| {
      let barrier = Arc::clone(&barrier);
      let data = Arc::clone(&data);
      let expected = Arc::clone(&expected);
      thread::spawn(move || {
        barrier.wait();
        for step in 0..CALLS {
          let i = (step + t) % CALLS;
          let len = (i * 37) % data.len();
          assert_eq!(checksum(&data[..len]), expected[i], "thread {t} len {len}");
        }
        selected_backend()
      })
    })
    .collect();

  let names: Vec<&'static str> = handles.into_iter().map(|h| h.join().unwrap()).collect();

  let state = dispatch_state();
  assert!(state.is_resolved(), "{state}");
  assert!(names.iter().all(|&n| Some(n) == state.name()), "{names:?} vs {state}");
  assert!(kernels::KERNELS.find(names[0]).is_some());
}
