// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric abstraction for row extents, offsets, and scroll positions.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Floating point scalar used for row extents, offsets, and scroll positions.
///
/// Implemented for `f32` and `f64`. All values handled by this crate are
/// expected to be finite; negative extents are clamped to zero at the edges
/// where they enter the crate.
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Converts a count into the scalar type.
    fn from_usize(n: usize) -> Self;

    /// Returns `true` if the value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Returns `true` if the sign bit is set (including `-0.0`).
    fn is_sign_negative(self) -> bool;

    /// Max of the two values.
    #[must_use]
    fn max(self, other: Self) -> Self;

    /// Min of the two values.
    #[must_use]
    fn min(self, other: Self) -> Self;
}

impl Scalar for f32 {
    #[inline(always)]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    #[allow(
        clippy::cast_precision_loss,
        reason = "Row counts far below 2^24 in practice"
    )]
    fn from_usize(n: usize) -> Self {
        n as Self
    }

    #[inline]
    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    #[inline]
    fn is_sign_negative(self) -> bool {
        Self::is_sign_negative(self)
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        Self::max(self, other)
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        Self::min(self, other)
    }
}

impl Scalar for f64 {
    #[inline(always)]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    #[allow(
        clippy::cast_precision_loss,
        reason = "Row counts far below 2^53 in practice"
    )]
    fn from_usize(n: usize) -> Self {
        n as Self
    }

    #[inline]
    fn is_finite(self) -> bool {
        Self::is_finite(self)
    }

    #[inline]
    fn is_sign_negative(self) -> bool {
        Self::is_sign_negative(self)
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        Self::max(self, other)
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        Self::min(self, other)
    }
}
