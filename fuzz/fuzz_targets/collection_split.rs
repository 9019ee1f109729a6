#![no_main]

use libfuzzer_sys::fuzz_target;
use the_util::{
  Key,
  OrderedMap,
  Split,
  collection::{
    drop_keys,
    insert_after_key,
    key_offset,
    split_at_key,
    split_at_offset,
  },
};

const MAX_ENTRIES: usize = 256;

/// Reads `[tag, value]` pairs. Even tags give index keys, odd tags give one of
/// sixteen names, so collisions and reassignments are common.
fn map_from_bytes(data: &[u8]) -> OrderedMap<u8> {
  data
    .chunks_exact(2)
    .take(MAX_ENTRIES)
    .map(|pair| {
      let key = if pair[0] % 2 == 0 {
        Key::Index(i64::from(pair[1]) - 64)
      } else {
        Key::Name(format!("k{}", pair[1] % 16))
      };
      (key, pair[1])
    })
    .collect()
}

fuzz_target!(|data: &[u8]| {
  let Some((&selector, rest)) = data.split_first() else {
    return;
  };
  let map = map_from_bytes(rest);
  let len = map.len();
  let offset = usize::from(selector) % (len + 2);
  let place = if selector & 0x80 == 0 {
    Split::After
  } else {
    Split::Before
  };

  let (head, tail) = split_at_offset(map.clone(), offset, place);
  assert_eq!(head.len() + tail.len(), len);
  let cut = match place {
    Split::Before => offset,
    Split::After => offset + 1,
  };
  assert_eq!(head.len(), cut.min(len));
  assert_eq!(head.merge(tail), map.clone().renumber());

  if map.is_empty() {
    assert_eq!(insert_after_key(map, 0, 0).map(|map| map.len()), Ok(1));
    return;
  }
  let Some(key) = map.get_index(offset.min(len - 1)).map(|(key, _)| key.clone()) else {
    return;
  };
  assert!(key_offset(&key, &map).is_some());

  let (head, tail) = split_at_key(map.clone(), &key, place);
  assert_eq!(head.len() + tail.len(), len);

  let inserted =
    insert_after_key(map.clone(), &key, u8::MAX).expect("keys stay far below i64::MAX");
  assert_eq!(inserted.len(), len + 1);

  let remaining = drop_keys(map, [&key]);
  assert_eq!(remaining.len(), len - 1);
});
