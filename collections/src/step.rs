use crate::error::RangeError;
use crate::kind::{ElementKind, Numeric, StepDelta};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// A function producing the element following `current`.
///
/// Any `Fn(&T) -> T` is a stepper. A stepper must be strictly increasing and must eventually exceed any
/// upper bound it is used with, otherwise iterating over a range built on it never terminates.
pub trait Stepper<T> {
    fn next_after(&self, current: &T) -> T;

    /// Number of elements reached from `start` up to `end` (inclusive), when it can be derived from
    /// the bounds alone. Requires `start < end`.
    ///
    /// When `None` is returned, the count is obtained by iterating.
    fn count_between(&self, _start: &T, _end: &T) -> Option<usize> {
        None
    }

    /// Rejects bounds the stepper cannot walk between. Called once the bounds are known to be ordered.
    fn check_bounds(&self, _start: &T, _end: &T) -> Result<(), RangeError> {
        Ok(())
    }
}

impl<T, F> Stepper<T> for F
where
    F: Fn(&T) -> T,
{
    #[inline]
    fn next_after(&self, current: &T) -> T {
        self(current)
    }
}

/// The default step of a numeric kind: `+1` for signed integers, `+0.1` on the one-decimal grid for
/// floating point numbers.
///
/// It can only be obtained through [`CanonicalStep::resolve`], which fails for kinds absent from the
/// default step table.
pub struct CanonicalStep<T> {
    delta: StepDelta,
    _phantom: PhantomData<fn(&T) -> T>,
}

impl<T: Numeric> CanonicalStep<T> {
    /// ```
    /// use stepset::{CanonicalStep, ElementKind, RangeError, StepDelta, Stepper};
    /// let step = CanonicalStep::<i64>::resolve().unwrap();
    /// assert_eq!(step.delta(), StepDelta::One);
    /// assert_eq!(step.next_after(&41), 42);
    /// assert!(matches!(CanonicalStep::<u16>::resolve(), Err(RangeError::UnsupportedType(ElementKind::U16))));
    /// ```
    pub fn resolve() -> Result<Self, RangeError> {
        let delta = T::KIND.default_step()?;
        Ok(CanonicalStep {
            delta,
            _phantom: PhantomData,
        })
    }

    pub fn kind(&self) -> ElementKind {
        T::KIND
    }
}

impl<T> CanonicalStep<T> {
    pub fn delta(&self) -> StepDelta {
        self.delta
    }
}

impl<T: Numeric> Stepper<T> for CanonicalStep<T> {
    #[inline]
    fn next_after(&self, current: &T) -> T {
        current.canonical_next()
    }

    fn count_between(&self, start: &T, end: &T) -> Option<usize> {
        T::canonical_count(*start, *end)
    }

    fn check_bounds(&self, start: &T, end: &T) -> Result<(), RangeError> {
        T::check_canonical_bounds(*start, *end)
    }
}

impl<T> Clone for CanonicalStep<T> {
    fn clone(&self) -> Self {
        CanonicalStep {
            delta: self.delta,
            _phantom: PhantomData,
        }
    }
}

impl<T> Copy for CanonicalStep<T> {}

impl<T> Debug for CanonicalStep<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "CanonicalStep({})", self.delta)
    }
}
