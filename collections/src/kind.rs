//! The closed table of default steps, keyed by element kind.
//!
//! Each primitive numeric type declares its [`ElementKind`] through [`Numeric::KIND`]. Only the kinds
//! present in [`ElementKind::default_step`] have a canonical step; the others are nameable but require an
//! explicit step function.

use crate::error::RangeError;
use derive_more::Display;
use std::fmt::Debug;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum ElementKind {
    #[display("i8")]
    I8,
    #[display("i16")]
    I16,
    #[display("i32")]
    I32,
    #[display("i64")]
    I64,
    #[display("i128")]
    I128,
    #[display("u8")]
    U8,
    #[display("u16")]
    U16,
    #[display("u32")]
    U32,
    #[display("u64")]
    U64,
    #[display("f32")]
    F32,
    #[display("f64")]
    F64,
}

/// Magnitude of a canonical step.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum StepDelta {
    /// `+1`
    #[display("+1")]
    One,
    /// `+0.1`, with values kept on the one-decimal grid.
    #[display("+0.1")]
    Tenth,
}

impl ElementKind {
    /// Returns the default step registered for this kind.
    ///
    /// ```
    /// use stepset::{ElementKind, RangeError, StepDelta};
    /// assert_eq!(ElementKind::I16.default_step(), Ok(StepDelta::One));
    /// assert_eq!(ElementKind::F32.default_step(), Ok(StepDelta::Tenth));
    /// assert_eq!(ElementKind::U8.default_step(), Err(RangeError::UnsupportedType(ElementKind::U8)));
    /// ```
    pub const fn default_step(self) -> Result<StepDelta, RangeError> {
        match self {
            ElementKind::I8 | ElementKind::I16 | ElementKind::I32 | ElementKind::I64 => Ok(StepDelta::One),
            ElementKind::F32 | ElementKind::F64 => Ok(StepDelta::Tenth),
            other => Err(RangeError::UnsupportedType(other)),
        }
    }

    pub const fn is_floating_point(self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F64)
    }
}

/// A primitive numeric type that can be stepped with the default step of its kind.
///
/// `canonical_next` and `canonical_count` are only ever invoked for kinds whose
/// [`ElementKind::default_step`] is defined, see [`CanonicalStep`](crate::CanonicalStep).
pub trait Numeric: Copy + PartialOrd + Debug + Send + Sync + 'static {
    const KIND: ElementKind;

    /// Value following `self` under the default step. Always strictly greater than `self`, unless `self`
    /// is the largest value of the type.
    fn canonical_next(self) -> Self;

    /// Number of values produced by stepping from `start` up to `end` (inclusive) with the default step,
    /// or `None` if it cannot be derived from the bounds. Requires `start < end`.
    fn canonical_count(start: Self, end: Self) -> Option<usize>;

    /// Fails if the default step cannot honour its precision between `start` and `end`.
    fn check_canonical_bounds(_start: Self, _end: Self) -> Result<(), RangeError> {
        Ok(())
    }
}

macro_rules! integer_numeric {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(
        impl Numeric for $t {
            const KIND: ElementKind = ElementKind::$kind;

            #[inline]
            fn canonical_next(self) -> Self {
                self + 1
            }

            fn canonical_count(start: Self, end: Self) -> Option<usize> {
                let count = (end as i128)
                    .checked_sub(start as i128)
                    .and_then(|diff| usize::try_from(diff).ok())
                    .and_then(|diff| diff.checked_add(1))
                    .unwrap_or(usize::MAX);
                Some(count)
            }
        }
        )*
    };
}

// Floating point values live on the grid of tenths: stepping first snaps the value to the grid, so that
// repeated additions never drift. The k-th successor of `start` is exactly `(round(10 * start) + k) / 10`
// as long as ten times the values stay below `$limit`, where scaling by ten is accurate enough for the
// rounding to recover the grid index. Bounds beyond it are rejected by `check_canonical_bounds`.
macro_rules! float_numeric {
    ($($t:ty => $kind:ident, $limit:expr);* $(;)?) => {
        $(
        impl Numeric for $t {
            const KIND: ElementKind = ElementKind::$kind;

            #[inline]
            fn canonical_next(self) -> Self {
                let snapped = ((self * 10.0).round() + 1.0) / 10.0;
                if snapped > self {
                    snapped
                } else {
                    self.next_up()
                }
            }

            fn canonical_count(start: Self, end: Self) -> Option<usize> {
                let on_grid = |x: Self| (x * 10.0).abs() < $limit;
                if !on_grid(start) || !on_grid(end) {
                    return None;
                }
                let first = (start * 10.0).round();
                let grid = |k: usize| (first + k as $t) / 10.0;
                // estimate on the scaled grid, then settle on the exact comparisons made by iteration
                let estimate = ((end * 10.0).floor() - first).max(0.0);
                if estimate >= usize::MAX as $t {
                    return Some(usize::MAX);
                }
                let mut steps = estimate as usize;
                while steps > 0 && grid(steps) > end {
                    steps -= 1;
                }
                while let Some(next) = steps.checked_add(1) {
                    if grid(next) > end {
                        break;
                    }
                    steps = next;
                }
                Some(steps.saturating_add(1))
            }

            fn check_canonical_bounds(start: Self, end: Self) -> Result<(), RangeError> {
                if (start * 10.0).abs() < $limit && (end * 10.0).abs() < $limit {
                    Ok(())
                } else {
                    Err(RangeError::InvalidArgument(
                        "bound is beyond the one-decimal precision of the default step",
                    ))
                }
            }
        }
        )*
    };
}

integer_numeric!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
);

float_numeric!(
    f32 => F32, 4_194_304.0;
    f64 => F64, 2_251_799_813_685_248.0;
);
