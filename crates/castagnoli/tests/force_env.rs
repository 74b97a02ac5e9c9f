//! `CASTAGNOLI_FORCE` is read once per process, so each setting runs in a
//! fresh copy of this test binary.

#![cfg(all(feature = "std", feature = "runtime-dispatch"))]

use std::{env, process::Command};

use castagnoli::{
  checksum,
  crc32c::config::{self, FORCE_ENV, Force},
  kernels, selected_backend,
};

/// Set in the child so only it runs the checks.
const CHILD_ENV: &str = "CASTAGNOLI_FORCE_CHILD";
const CHILD_TEST: &str = "forced_selection_in_child";
const DONE: &str = "forced selection checked:";

/// What the child should see for the raw variable value.
fn expected_request(raw: &str) -> Force {
  raw.parse().unwrap_or(Force::Auto)
}

#[test]
fn forced_selection_in_child() {
  let Ok(raw) = env::var(CHILD_ENV) else {
    return;
  };
  assert_eq!(env::var(FORCE_ENV).as_deref(), Ok(raw.as_str()));

  let caps = platform::caps();
  let requested = expected_request(&raw);
  let effective = requested.clamp(caps);

  let config = config::get();
  assert_eq!(config.requested, requested, "{raw:?}");
  assert_eq!(config.effective, effective, "{raw:?}");

  let name = selected_backend();
  let chosen = kernels::find(name).expect("selected kernel runs on this CPU");
  assert!(chosen.tier.within(effective.max_tier()), "{raw:?}: {name} is above {effective}");
  assert_eq!(name, backend::select(caps, &kernels::KERNELS, effective.max_tier()).name, "{raw:?}");

  assert_eq!(checksum(b"123456789"), 0xE306_9283, "{raw:?} via {name}");
  println!("{DONE} {raw} -> {name}");
}

/// Run the child under `CASTAGNOLI_FORCE=raw`; return the backend it picked.
fn run_child(raw: &str) -> String {
  let exe = env::current_exe().expect("test binary path");
  let output = Command::new(exe)
    .args(["--exact", CHILD_TEST, "--nocapture", "--test-threads=1", "--quiet"])
    .env(FORCE_ENV, raw)
    .env(CHILD_ENV, raw)
    .output()
    .expect("spawn test binary");

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(
    output.status.success(),
    "{raw:?} failed\nstdout:\n{stdout}\nstderr:\n{}",
    String::from_utf8_lossy(&output.stderr)
  );
  let line = stdout.lines().find_map(|l| l.strip_prefix(DONE)).unwrap_or_else(|| panic!("{raw:?}: child did not run"));
  let (_, name) = line.split_once(" -> ").expect("marker format");
  name.trim().to_owned()
}

#[test]
fn force_caps_the_selected_tier() {
  for raw in ["portable", "sse42", "fold", "WIDE"] {
    run_child(raw);
  }
}

#[test]
fn portable_force_always_picks_the_fallback() {
  assert_eq!(run_child("portable"), kernels::KERNELS.fallback.name);
}

#[test]
fn invalid_force_behaves_like_auto() {
  let auto = run_child("auto");
  assert_eq!(run_child("bogus"), auto);
  assert_eq!(run_child("  "), auto);
}
