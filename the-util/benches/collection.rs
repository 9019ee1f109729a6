//! Benchmarks for positional lookup and splitting in the-util.
//!
//! Run with: `cargo bench -p the-util --bench collection`

use divan::{
  Bencher,
  black_box,
};
use the_util::{
  Key,
  OrderedMap,
  Split,
  collection::{
    drop_keys,
    insert_after_key,
    key_offset,
    merge_after_key,
    pick_keys,
    split_at_key,
    split_at_offset,
  },
};

fn main() {
  divan::main();
}

const SIZES: &[usize] = &[16, 256, 4096];

/// Index keys for the first half, names for the second.
fn mixed(len: usize) -> OrderedMap<usize> {
  (0..len)
    .map(|i| {
      let key = if i < len / 2 {
        Key::Index(i as i64)
      } else {
        Key::Name(format!("field_{i}"))
      };
      (key, i)
    })
    .collect()
}

fn middle_name(len: usize) -> String {
  format!("field_{}", len / 2 + len / 4)
}

// ─────────────────────────────────────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────────────────────────────────────

mod offset {
  use super::*;

  #[divan::bench(args = SIZES)]
  fn index_key(bencher: Bencher, len: usize) {
    let map = mixed(len);
    let key = (len / 4) as i64;
    bencher.bench(|| key_offset(black_box(key), black_box(&map)));
  }

  #[divan::bench(args = SIZES)]
  fn name_key(bencher: Bencher, len: usize) {
    let map = mixed(len);
    let key = middle_name(len);
    bencher.bench(|| key_offset(black_box(key.as_str()), black_box(&map)));
  }

  #[divan::bench(args = SIZES)]
  fn missing(bencher: Bencher, len: usize) {
    let map = mixed(len);
    bencher.bench(|| {
      assert!(key_offset(black_box("absent"), black_box(&map)).is_none());
    });
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Splitting and insertion
// ─────────────────────────────────────────────────────────────────────────────

mod split {
  use super::*;

  #[divan::bench(args = SIZES)]
  fn at_offset(bencher: Bencher, len: usize) {
    let map = mixed(len);
    bencher
      .with_inputs(|| map.clone())
      .bench_values(|map| split_at_offset(map, black_box(len / 3), Split::After));
  }

  #[divan::bench(args = SIZES)]
  fn at_key(bencher: Bencher, len: usize) {
    let map = mixed(len);
    let key = middle_name(len);
    bencher
      .with_inputs(|| map.clone())
      .bench_values(|map| split_at_key(map, black_box(key.as_str()), Split::Before));
  }

  #[divan::bench(args = SIZES)]
  fn insert_after(bencher: Bencher, len: usize) {
    let map = mixed(len);
    bencher
      .with_inputs(|| map.clone())
      .bench_values(|map| insert_after_key(map, black_box(1), usize::MAX));
  }

  #[divan::bench(args = SIZES)]
  fn merge_after(bencher: Bencher, len: usize) {
    let map = mixed(len);
    let values = mixed(8);
    bencher
      .with_inputs(|| (map.clone(), values.clone()))
      .bench_values(|(map, values)| merge_after_key(map, black_box(0), values));
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filtering
// ─────────────────────────────────────────────────────────────────────────────

mod filter {
  use super::*;

  #[divan::bench(args = SIZES)]
  fn pick(bencher: Bencher, len: usize) {
    let map = mixed(len);
    let keys: Vec<Key> = map.keys().step_by(3).cloned().collect();
    bencher
      .with_inputs(|| map.clone())
      .bench_values(|map| pick_keys(map, keys.iter()));
  }

  #[divan::bench(args = SIZES)]
  fn drop(bencher: Bencher, len: usize) {
    let map = mixed(len);
    let keys: Vec<Key> = map.keys().step_by(3).cloned().collect();
    bencher
      .with_inputs(|| map.clone())
      .bench_values(|map| drop_keys(map, keys.iter()));
  }
}
