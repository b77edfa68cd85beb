use crate::error::RangeError;
use crate::kind::Numeric;
use crate::materialized::MutableRange;
use crate::params::{CHECK_STEP, COUNT_BY_ITERATION};
use crate::set::SteppedSet;
use crate::step::{CanonicalStep, Stepper};
use once_cell::sync::OnceCell;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::iter::FusedIterator;

/// Fails if `value` cannot be compared, the only way for an element to be "absent" (e.g. NaN).
pub(crate) fn ensure_comparable<T: PartialOrd>(value: &T, what: &'static str) -> Result<(), RangeError> {
    match value.partial_cmp(value) {
        Some(_) => Ok(()),
        None => Err(RangeError::InvalidArgument(what)),
    }
}

/// Compares the two bounds of a range, rejecting incomparable values and `start > end`.
pub(crate) fn order_bounds<T: PartialOrd>(start: &T, end: &T) -> Result<Ordering, RangeError> {
    ensure_comparable(start, "start element is not comparable")?;
    ensure_comparable(end, "end element is not comparable")?;
    match start.partial_cmp(end) {
        Some(Ordering::Greater) => Err(RangeError::InvalidArgument("start element is greater than end element")),
        Some(ord) => Ok(ord),
        None => Err(RangeError::InvalidArgument("start and end elements are not comparable")),
    }
}

/// Panics unless `following` is greater than `current`. Only used when the step check is enabled.
pub(crate) fn ensure_increasing<T: PartialOrd>(current: &T, following: &T) {
    if !(following > current) {
        tracing::error!("step function did not produce a greater element");
        panic!("step function is not strictly increasing");
    }
}

#[derive(Clone)]
struct Bounds<T, S> {
    start: T,
    end: T,
    step: S,
}

impl<T: PartialOrd + Clone, S: Stepper<T>> Bounds<T, S> {
    fn count(&self, check_step: bool) -> usize {
        if !COUNT_BY_ITERATION.get() {
            if let Some(n) = self.step.count_between(&self.start, &self.end) {
                return n;
            }
        }
        Iter::over(Some(self), check_step).count()
    }
}

/// A read-only range that only stores its bounds and its step function.
///
/// Elements are derived on demand: iteration replays the step function from `start` each time, and the size
/// is computed on first request (from the bounds when the step allows it, by counting otherwise).
///
/// Membership follows interval semantics: any value between the bounds is contained, whether or not it is
/// reachable by stepping. A range whose bounds are equal is empty.
///
/// ```
/// use stepset::{RangeSet, SteppedSet};
/// let r = RangeSet::of(1, 5).unwrap();
/// assert_eq!(r.len(), 5);
/// assert_eq!(r.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
///
/// let tenths = RangeSet::of(0.0, 1.0).unwrap();
/// assert_eq!(tenths.len(), 11);
/// assert_eq!(tenths.contains(&0.15), Ok(true));
///
/// let powers = RangeSet::of_with(1u32, 100, |x: &u32| x * 2).unwrap();
/// assert_eq!(powers.iter().collect::<Vec<_>>(), vec![1, 2, 4, 8, 16, 32, 64]);
///
/// assert!(RangeSet::of(3, 3).unwrap().is_empty());
/// ```
#[derive(Clone)]
pub struct RangeSet<T, S = CanonicalStep<T>> {
    /// `None` for an empty range.
    bounds: Option<Bounds<T, S>>,
    len: OnceCell<usize>,
    check_step: bool,
}

impl<T: Numeric> RangeSet<T> {
    /// Builds a range stepping with the default step of `T`.
    ///
    /// Fails with [`RangeError::UnsupportedType`] if `T` has no default step, and with
    /// [`RangeError::InvalidArgument`] on invalid bounds.
    pub fn of(start: T, end: T) -> Result<Self, RangeError> {
        let step = CanonicalStep::resolve()?;
        Self::of_with(start, end, step)
    }
}

impl<T: PartialOrd, S: Stepper<T>> RangeSet<T, S> {
    /// Builds a range from `start` to `end` (both inclusive), stepping with `step`.
    ///
    /// Fails with [`RangeError::InvalidArgument`] if a bound is not comparable, if `start > end`, or if
    /// `step` rejects the bounds (see [`Stepper::check_bounds`]).
    pub fn of_with(start: T, end: T, step: S) -> Result<Self, RangeError> {
        Self::from_parts(start, end, step, CHECK_STEP.get())
    }

    fn from_parts(start: T, end: T, step: S, check_step: bool) -> Result<Self, RangeError> {
        let bounds = match order_bounds(&start, &end)? {
            Ordering::Equal => {
                tracing::trace!("equal bounds, building an empty range");
                None
            }
            _ => {
                step.check_bounds(&start, &end)?;
                tracing::trace!(check_step, "building a bounded range");
                Some(Bounds { start, end, step })
            }
        };
        Ok(RangeSet {
            bounds,
            len: OnceCell::new(),
            check_step,
        })
    }
}

impl<T: PartialOrd, S> RangeSet<T, S> {
    /// An empty range.
    pub fn empty() -> Self {
        RangeSet {
            bounds: None,
            len: OnceCell::new(),
            check_step: false,
        }
    }

    /// Lower bound, `None` if the range is empty.
    pub fn start(&self) -> Option<&T> {
        self.bounds.as_ref().map(|b| &b.start)
    }

    /// Upper bound, `None` if the range is empty.
    pub fn end(&self) -> Option<&T> {
        self.bounds.as_ref().map(|b| &b.end)
    }

    /// Step function, `None` if the range is empty.
    pub fn step(&self) -> Option<&S> {
        self.bounds.as_ref().map(|b| &b.step)
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Returns true if `elem` lies between the bounds of the range. This does not check whether `elem`
    /// is reachable by stepping.
    pub fn contains(&self, elem: &T) -> Result<bool, RangeError> {
        ensure_comparable(elem, "element is not comparable")?;
        Ok(match &self.bounds {
            Some(b) => b.start <= *elem && *elem <= b.end,
            None => false,
        })
    }
}

impl<T: PartialOrd + Clone, S: Stepper<T>> RangeSet<T, S> {
    pub fn len(&self) -> usize {
        match &self.bounds {
            Some(bounds) => *self.len.get_or_init(|| bounds.count(self.check_step)),
            None => 0,
        }
    }

    /// A fresh traversal from `start`, independent of any other.
    pub fn iter(&self) -> Iter<'_, T, S> {
        Iter::over(self.bounds.as_ref(), self.check_step)
    }
}

fn read_only<R>(operation: &'static str) -> Result<R, RangeError> {
    tracing::trace!(operation, "rejected mutation of a read-only range");
    Err(RangeError::UnsupportedOperation(operation))
}

impl<T: PartialOrd + Clone, S: Stepper<T>> SteppedSet<T> for RangeSet<T, S> {
    type Iter<'a>
        = Iter<'a, T, S>
    where
        Self: 'a;

    fn len(&self) -> usize {
        RangeSet::len(self)
    }

    fn is_empty(&self) -> bool {
        RangeSet::is_empty(self)
    }

    fn contains(&self, elem: &T) -> Result<bool, RangeError> {
        RangeSet::contains(self, elem)
    }

    fn iter(&self) -> Self::Iter<'_> {
        RangeSet::iter(self)
    }

    fn insert(&mut self, _elem: T) -> Result<bool, RangeError> {
        read_only("insert")
    }

    fn remove(&mut self, _elem: &T) -> Result<bool, RangeError> {
        read_only("remove")
    }

    fn insert_all<I>(&mut self, _elems: I) -> Result<bool, RangeError>
    where
        I: IntoIterator<Item = T>,
    {
        read_only("insert_all")
    }

    fn remove_all<'e, I>(&mut self, _elems: I) -> Result<bool, RangeError>
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        read_only("remove_all")
    }

    fn retain_all<'e, I>(&mut self, _keep: I) -> Result<bool, RangeError>
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        read_only("retain_all")
    }

    fn clear(&mut self) -> Result<(), RangeError> {
        read_only("clear")
    }

    fn to_vec(&self) -> Result<Vec<T>, RangeError> {
        read_only("to_vec")
    }
}

impl<'a, T: PartialOrd + Clone, S: Stepper<T>> IntoIterator for &'a RangeSet<T, S> {
    type Item = T;
    type IntoIter = Iter<'a, T, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Debug, S> Debug for RangeSet<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.bounds {
            Some(b) => f
                .debug_struct("RangeSet")
                .field("start", &b.start)
                .field("end", &b.end)
                .finish_non_exhaustive(),
            None => write!(f, "RangeSet(empty)"),
        }
    }
}

impl<T: Display, S> Display for RangeSet<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.bounds {
            Some(b) => write!(f, "[{}..={}]", b.start, b.end),
            None => write!(f, "[]"),
        }
    }
}

/// Traversal of a [`RangeSet`], owning its own cursor.
pub struct Iter<'a, T, S> {
    bounds: Option<&'a Bounds<T, S>>,
    next: Option<T>,
    check_step: bool,
}

impl<'a, T: Clone, S> Iter<'a, T, S> {
    fn over(bounds: Option<&'a Bounds<T, S>>, check_step: bool) -> Self {
        Iter {
            bounds,
            next: bounds.map(|b| b.start.clone()),
            check_step,
        }
    }
}

impl<T: PartialOrd, S: Stepper<T>> Iterator for Iter<'_, T, S> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let current = self.next.take()?;
        let bounds = self.bounds?;
        // the successor of `end` is never computed, it would exceed `end` anyway
        if current < bounds.end {
            let following = bounds.step.next_after(&current);
            if self.check_step {
                ensure_increasing(&current, &following);
            }
            if following <= bounds.end {
                self.next = Some(following);
            }
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(_) => (1, None),
            None => (0, Some(0)),
        }
    }
}

impl<T: PartialOrd, S: Stepper<T>> FusedIterator for Iter<'_, T, S> {}

/// Builds ranges from parts that may be missing.
///
/// Missing parts are reported as [`RangeError::InvalidArgument`], checked in order start, end, step and
/// before the bounds are compared.
///
/// ```
/// use stepset::{RangeBuilder, RangeError, SteppedSet};
/// let evens = RangeBuilder::new().start(0).end(10).step(|x: &i32| x + 2).build().unwrap();
/// assert_eq!(evens.len(), 6);
///
/// let missing = RangeBuilder::<i32, fn(&i32) -> i32>::new().start(0).end(10).build();
/// assert!(matches!(missing, Err(RangeError::InvalidArgument(_))));
/// ```
pub struct RangeBuilder<T, S> {
    start: Option<T>,
    end: Option<T>,
    step: Option<S>,
    check_step: Option<bool>,
}

impl<T, S> Default for RangeBuilder<T, S> {
    fn default() -> Self {
        RangeBuilder {
            start: None,
            end: None,
            step: None,
            check_step: None,
        }
    }
}

impl<T, S> RangeBuilder<T, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: T) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: T) -> Self {
        self.end = Some(end);
        self
    }

    pub fn step(mut self, step: S) -> Self {
        self.step = Some(step);
        self
    }

    /// Overrides [`CHECK_STEP`] for the range being built.
    pub fn check_step(mut self, check: bool) -> Self {
        self.check_step = Some(check);
        self
    }

    fn into_parts(self) -> Result<(T, T, S), RangeError> {
        let start = self.start.ok_or(RangeError::InvalidArgument("start element cannot be missing"))?;
        let end = self.end.ok_or(RangeError::InvalidArgument("end element cannot be missing"))?;
        let step = self.step.ok_or(RangeError::InvalidArgument("step function cannot be missing"))?;
        Ok((start, end, step))
    }
}

impl<T: PartialOrd, S: Stepper<T>> RangeBuilder<T, S> {
    pub fn build(self) -> Result<RangeSet<T, S>, RangeError> {
        let check_step = self.check_step.unwrap_or_else(|| CHECK_STEP.get());
        let (start, end, step) = self.into_parts()?;
        RangeSet::from_parts(start, end, step, check_step)
    }

    /// Builds a materialized range holding every element from start to end.
    pub fn build_mutable(self) -> Result<MutableRange<T>, RangeError>
    where
        T: Clone,
    {
        let check_step = self.check_step.unwrap_or_else(|| CHECK_STEP.get());
        let (start, end, step) = self.into_parts()?;
        MutableRange::from_parts(start, end, step, check_step)
    }
}
