/// Numbers with a fractional component, the part after the decimal point.
pub trait Fractional: Copy {
  /// The fractional component, carrying the sign of `self`. Always `0.0` for
  /// integers.
  fn fractional(self) -> f64;

  fn has_fractional(self) -> bool {
    self.fractional() != 0.0
  }
}

macro_rules! impl_fractional_int {
  ($($ty:ty),*) => {
    $(
      impl Fractional for $ty {
        #[inline]
        fn fractional(self) -> f64 {
          0.0
        }
      }
    )*
  };
}

impl_fractional_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Fractional for f64 {
  #[inline]
  fn fractional(self) -> f64 {
    self % 1.0
  }
}

impl Fractional for f32 {
  #[inline]
  fn fractional(self) -> f64 {
    (self % 1.0) as f64
  }
}

pub fn get_fractional<N: Fractional>(value: N) -> f64 {
  value.fractional()
}

pub fn has_fractional<N: Fractional>(value: N) -> bool {
  value.has_fractional()
}
