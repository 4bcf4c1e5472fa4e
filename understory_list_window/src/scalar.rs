// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction for heights, offsets, and scroll positions.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// Floating-point scalar used for all row heights and pixel offsets.
///
/// Implemented for `f32` and `f64`. The engine only needs ordering, basic
/// arithmetic, and a handful of predicates used to sanitize host input.
pub trait Scalar:
    Copy
    + Debug
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity.
    fn zero() -> Self;

    /// Converts a small constant into a scalar.
    fn from_u16(value: u16) -> Self;

    /// Returns `true` if the value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Returns `true` for negative values, including `-0.0`.
    fn is_sign_negative(self) -> bool;

    /// The larger of `self` and `other`.
    fn max(self, other: Self) -> Self;

    /// The smaller of `self` and `other`.
    fn min(self, other: Self) -> Self;

    /// Clamps `self` into `[lo, hi]`. If `hi < lo`, `lo` wins.
    fn clamp_to(self, lo: Self, hi: Self) -> Self {
        self.min(hi).max(lo)
    }

    /// Absolute difference between two values.
    fn distance(self, other: Self) -> Self {
        if self > other {
            self - other
        } else {
            other - self
        }
    }
}

macro_rules! impl_scalar {
    ($ty:ty) => {
        impl Scalar for $ty {
            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn from_u16(value: u16) -> Self {
                <$ty>::from(value)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$ty>::is_finite(self)
            }

            #[inline]
            fn is_sign_negative(self) -> bool {
                <$ty>::is_sign_negative(self)
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                <$ty>::max(self, other)
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                <$ty>::min(self, other)
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);
