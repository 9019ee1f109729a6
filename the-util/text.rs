//! String splitting and case helpers.

use crate::{
  Split,
  Tendril,
};

/// Characters that end a word for [`pascal_case`].
pub const WORD_SEPARATORS: &str = " \t\r\n\x0C\x0B-_";

/// Splits `subject` in two at the first occurrence of `needle`, keeping the
/// needle on the side `place` asks for. Without a match the whole subject is
/// the head and the tail is empty.
///
/// ```
/// use the_util::{text::{split_around, split_at}, Split};
///
/// assert_eq!(split_at("Jack & Jill", " & ", Split::After), ("Jack & ", "Jill"));
/// assert_eq!(split_around("Jack & Jill", " & "), ("Jack", "Jill"));
/// ```
pub fn split_at<'a>(subject: &'a str, needle: &str, place: Split) -> (&'a str, &'a str) {
  let Some(offset) = subject.find(needle) else {
    return (subject, "");
  };
  let offset = match place {
    Split::Before => offset,
    Split::After => offset + needle.len(),
  };
  subject.split_at(offset)
}

/// Splits `subject` in two around the first occurrence of `needle`, dropping
/// the needle. Always yields two parts, the tail is empty when there is no
/// match.
pub fn split_around<'a>(subject: &'a str, needle: &str) -> (&'a str, &'a str) {
  subject.split_once(needle).unwrap_or((subject, ""))
}

/// Breaks `subject` into words at runs of whitespace.
pub fn split_whitespace(subject: &str) -> Vec<&str> {
  subject.split_whitespace().collect()
}

/// Upper-cases the start of every word and removes the word separators, so
/// `"profile-photo medium"` becomes `"ProfilePhotoMedium"`.
pub fn pascal_case(subject: &str) -> Tendril {
  pascal_case_with(subject, WORD_SEPARATORS)
}

/// Like [`pascal_case`] with a custom set of separator characters.
///
/// Only the first character of each word is touched, the rest keeps its case.
pub fn pascal_case_with(subject: &str, separators: &str) -> Tendril {
  let mut res = Tendril::new();
  to_pascal_case_with(subject.chars(), separators, &mut res);
  res
}

pub fn to_pascal_case_with(text: impl Iterator<Item = char>, separators: &str, buf: &mut Tendril) {
  text.fold(true, |word_start, c| {
    if separators.contains(c) {
      return true;
    }
    if word_start {
      buf.extend(c.to_uppercase());
    } else {
      buf.push(c);
    }
    false
  });
}

#[cfg(test)]
mod test {
  use super::*;

  const EXAMPLE_EMAIL: &str = "j.smith@example.com";
  const EXAMPLE_COLOURS: &str = "green and blue";

  #[test]
  fn split_at_after() {
    assert_eq!(split_at(EXAMPLE_EMAIL, "@", Split::After), ("j.smith@", "example.com"));
    assert_eq!(split_at(EXAMPLE_COLOURS, "and", Split::After), ("green and", " blue"));
  }

  #[test]
  fn split_at_before() {
    assert_eq!(split_at(EXAMPLE_EMAIL, "@", Split::Before), ("j.smith", "@example.com"));
    assert_eq!(split_at(EXAMPLE_COLOURS, "and", Split::Before), ("green ", "and blue"));
  }

  #[test]
  fn split_at_edges() {
    // no match
    assert_eq!(split_at(EXAMPLE_EMAIL, "#", Split::After), (EXAMPLE_EMAIL, ""));
    // match at the very end
    assert_eq!(split_at(EXAMPLE_EMAIL, ".com", Split::After), (EXAMPLE_EMAIL, ""));
    // match at the very start
    assert_eq!(split_at(EXAMPLE_COLOURS, "green", Split::Before), ("", EXAMPLE_COLOURS));
    assert_eq!(split_at("", "x", Split::Before), ("", ""));
  }

  #[test]
  fn split_at_multibyte() {
    assert_eq!(split_at("café→bar", "→", Split::After), ("café→", "bar"));
    assert_eq!(split_at("café→bar", "→", Split::Before), ("café", "→bar"));
  }

  #[test]
  fn split_around_needle() {
    assert_eq!(split_around(EXAMPLE_EMAIL, "@"), ("j.smith", "example.com"));
    assert_eq!(split_around(EXAMPLE_COLOURS, " and "), ("green", "blue"));
    assert_eq!(split_around(EXAMPLE_EMAIL, "#"), (EXAMPLE_EMAIL, ""));
    assert_eq!(split_around(EXAMPLE_COLOURS, "green"), ("", " and blue"));
  }

  #[test]
  fn split_whitespace_runs() {
    assert_eq!(split_whitespace(EXAMPLE_COLOURS), ["green", "and", "blue"]);
    assert_eq!(split_whitespace("One\tTwo\t\tThree"), ["One", "Two", "Three"]);
    assert_eq!(split_whitespace("Now\nthis\r\nthen\nthat"), ["Now", "this", "then", "that"]);
    assert!(split_whitespace(" \t\n").is_empty());
  }

  #[test]
  fn test_pascal_case() {
    assert_eq!(pascal_case("hello").as_str(), "Hello");
    assert_eq!(pascal_case("Lorem ipsum et").as_str(), "LoremIpsumEt");
    assert_eq!(pascal_case("profile-photo-medium").as_str(), "ProfilePhotoMedium");
    assert_eq!(pascal_case("final_final_v2").as_str(), "FinalFinalV2");
    assert_eq!(pascal_case("yes   no").as_str(), "YesNo");
    assert_eq!(pascal_case("keepThis CASE").as_str(), "KeepThisCASE");
    assert_eq!(pascal_case("").as_str(), "");
  }

  #[test]
  fn pascal_case_collapses_outer_whitespace() {
    assert_eq!(pascal_case("  - hi there").as_str(), "HiThere");
    assert_eq!(pascal_case("bye then-  ").as_str(), "ByeThen");
  }

  #[test]
  fn pascal_case_custom_separators() {
    assert_eq!(pascal_case_with("a.b c", ".").as_str(), "AB c");
    assert_eq!(pascal_case_with("über-straße", "-").as_str(), "ÜberStraße");
  }
}
