//! Partial application and receiver binding for closures.
//!
//! `bind` and `apply` take a function of an explicit receiver, `Fn(&O, ..)`.
//! Rust has no bound-method values, so a method belonging to some other type
//! simply does not type-check as such a function and there is nothing to
//! reject at runtime.

/// Fixes the first argument of `f`.
///
/// ```
/// use the_util::func::partial;
///
/// let at_least_100 = partial(i32::max, 100);
/// assert_eq!(at_least_100(42), 100);
/// assert_eq!(at_least_100(120), 120);
/// ```
pub fn partial<A, B, R>(f: impl Fn(A, B) -> R, first: A) -> impl Fn(B) -> R
where
  A: Clone,
{
  move |rest| f(first.clone(), rest)
}

/// Fixes the leading arguments of a function taking an argument slice. The
/// returned function appends its own arguments after the bound ones.
pub fn partial_args<T, R>(
  f: impl Fn(&[T]) -> R,
  bound: impl IntoIterator<Item = T>,
) -> impl Fn(&[T]) -> R
where
  T: Clone,
{
  let bound: Vec<T> = bound.into_iter().collect();
  move |rest: &[T]| {
    let mut args = Vec::with_capacity(bound.len() + rest.len());
    args.extend_from_slice(&bound);
    args.extend_from_slice(rest);
    f(&args)
  }
}

/// Binds `f` to `object`, giving a function that runs `f` against it.
pub fn bind<O, R>(f: impl Fn(&O) -> R, object: O) -> impl Fn() -> R {
  move || f(&object)
}

/// Like [`bind`] for functions that take further arguments after the
/// receiver.
pub fn bind_args<O, A, R>(f: impl Fn(&O, A) -> R, object: O) -> impl Fn(A) -> R {
  move |args| f(&object, args)
}

/// Runs `f` against `object` once.
pub fn apply<O: ?Sized, R>(f: impl FnOnce(&O) -> R, object: &O) -> R {
  f(object)
}
