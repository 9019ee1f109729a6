//! Type introspection for diagnostics.

/// The fully qualified name of `T`, e.g. `the_util::OrderedMap<i32>`.
pub fn type_name<T: ?Sized>() -> &'static str {
  std::any::type_name::<T>()
}

/// The fully qualified name of the type of `value`.
pub fn type_name_of<T: ?Sized>(value: &T) -> &'static str {
  std::any::type_name_of_val(value)
}

/// [`type_name`] without the module path of the outer type, e.g.
/// `OrderedMap<i32>`. Generic arguments are left as they are.
pub fn short_type_name<T: ?Sized>() -> &'static str {
  strip_module_path(type_name::<T>())
}

fn strip_module_path(name: &str) -> &str {
  let outer = name.find('<').map_or(name, |generics| &name[..generics]);
  match outer.rfind("::") {
    Some(sep) => &name[sep + 2..],
    None => name,
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::OrderedMap;

  struct Probe;

  #[test]
  fn names_local_type() {
    assert_eq!(type_name::<Probe>(), "the_util::debug::test::Probe");
    assert_eq!(type_name_of(&Probe), "the_util::debug::test::Probe");
  }

  #[test]
  fn names_std_types() {
    assert_eq!(type_name::<String>(), "alloc::string::String");
    assert_eq!(type_name_of("str"), "str");
    assert_eq!(type_name::<i32>(), "i32");
  }

  #[test]
  fn short_names() {
    assert_eq!(short_type_name::<Probe>(), "Probe");
    assert_eq!(short_type_name::<OrderedMap<i32>>(), "OrderedMap<i32>");
    assert_eq!(short_type_name::<u8>(), "u8");
  }
}
