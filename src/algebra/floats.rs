#![allow(non_snake_case)]
use num_traits::FromPrimitive;

/// Main trait for floating point types used throughout the crate.
///
/// All numerical values are generic over `FloatT`.  The bound extends the
/// float trait of the backing LP solver with `Sync`, so that read-only
/// observation data can be shared across worker threads during a batch
/// solve.  Implementations are provided for `f32` and `f64` via the blanket
/// impl below.
pub trait FloatT: clarabel::algebra::FloatT + Sync {}

impl<T> FloatT for T where T: clarabel::algebra::FloatT + Sync {}

/// Trait for converting Rust primitives to [`FloatT`](crate::algebra::FloatT)
///
/// Used internally for converting constant primitives to the generic float
/// type, so that one can write `(0.5).as_T()` rather than the awkward
/// `T::from_f64(0.5).unwrap()`.
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(u64, from_u64);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
