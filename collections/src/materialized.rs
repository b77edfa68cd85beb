use crate::error::RangeError;
use crate::kind::Numeric;
use crate::params::CHECK_STEP;
use crate::range::{ensure_comparable, ensure_increasing, order_bounds, RangeSet};
use crate::set::SteppedSet;
use crate::step::{CanonicalStep, Stepper};
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::{btree_set, BTreeSet};
use std::fmt::{Debug, Display, Formatter};
use std::iter::FusedIterator;

/// Wrapper giving a total order to the elements of a [`MutableRange`].
/// Incomparable values are rejected before they can be wrapped.
///
/// Values comparing equal are the same element, so `-0.0` and `0.0` share a single slot (the first one
/// inserted is kept).
#[derive(Clone)]
struct Key<T>(T);

impl<T: PartialOrd> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: PartialOrd> Eq for Key<T> {}

impl<T: PartialOrd> PartialOrd for Key<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PartialOrd> Ord for Key<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

fn key<T: PartialOrd + Clone>(elem: &T) -> Result<Key<T>, RangeError> {
    ensure_comparable(elem, "element is not comparable")?;
    Ok(Key(elem.clone()))
}

/// A range whose elements are all computed at construction and stored in an ordered set.
///
/// Unlike [`RangeSet`], membership is exact: only stored values are contained. Elements can be added and
/// removed after construction, including whole start/end/step sequences.
///
/// Not internally synchronized: concurrent mutation must be serialized by the caller.
///
/// ```
/// use stepset::{MutableRange, SteppedSet};
/// let mut r = MutableRange::of(0.0, 1.0).unwrap();
/// assert_eq!(r.len(), 11);
/// assert_eq!(r.contains(&0.5), Ok(true));
/// assert_eq!(r.contains(&0.15), Ok(false));
///
/// r.add_range(10.0, 12.0, |x: &f64| x + 1.0).unwrap();
/// assert_eq!(r.len(), 14);
/// assert_eq!(r.remove(&0.0), Ok(true));
/// assert_eq!(r.first(), Some(&0.1));
/// assert_eq!(r.last(), Some(&12.0));
/// ```
#[derive(Clone)]
pub struct MutableRange<T> {
    elements: BTreeSet<Key<T>>,
}

impl<T> Default for MutableRange<T> {
    fn default() -> Self {
        MutableRange {
            elements: BTreeSet::new(),
        }
    }
}

impl<T: Numeric> MutableRange<T> {
    /// Materializes the range from `start` to `end` with the default step of `T`.
    pub fn of(start: T, end: T) -> Result<Self, RangeError> {
        let mut range = MutableRange::new();
        range.add_default_range(start, end)?;
        Ok(range)
    }

    /// Adds every element from `start` to `end` (inclusive) with the default step of `T`.
    pub fn add_default_range(&mut self, start: T, end: T) -> Result<usize, RangeError> {
        let step = CanonicalStep::resolve()?;
        self.add_range(start, end, step)
    }
}

impl<T: PartialOrd + Clone> MutableRange<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materializes the range from `start` to `end` (inclusive), stepping with `step`.
    ///
    /// Unlike [`RangeSet::of_with`], the step function is not retained.
    pub fn of_with<S: Stepper<T>>(start: T, end: T, step: S) -> Result<Self, RangeError> {
        Self::from_parts(start, end, step, CHECK_STEP.get())
    }

    pub(crate) fn from_parts<S: Stepper<T>>(start: T, end: T, step: S, check_step: bool) -> Result<Self, RangeError> {
        let mut range = MutableRange::new();
        range.insert_range(start, end, &step, check_step)?;
        Ok(range)
    }

    /// Builds a set from arbitrary elements, failing on the first incomparable one.
    pub fn from_elements<I: IntoIterator<Item = T>>(elems: I) -> Result<Self, RangeError> {
        let mut range = MutableRange::new();
        range.insert_all(elems)?;
        Ok(range)
    }

    /// Inserts every element from `start` to `end` (inclusive), stepping with `step`.
    /// Elements already present are left untouched. Equal bounds add nothing.
    ///
    /// Returns the number of elements that were not already present.
    pub fn add_range<S: Stepper<T>>(&mut self, start: T, end: T, step: S) -> Result<usize, RangeError> {
        self.insert_range(start, end, &step, CHECK_STEP.get())
    }

    fn insert_range<S: Stepper<T>>(
        &mut self,
        start: T,
        end: T,
        step: &S,
        check_step: bool,
    ) -> Result<usize, RangeError> {
        if order_bounds(&start, &end)? == Ordering::Equal {
            return Ok(0);
        }
        step.check_bounds(&start, &end)?;
        let before = self.elements.len();
        let mut current = start;
        loop {
            let reached_end = current >= end;
            let following = if reached_end { None } else { Some(step.next_after(&current)) };
            if check_step {
                if let Some(next) = &following {
                    ensure_increasing(&current, next);
                }
            }
            self.elements.insert(Key(current));
            match following {
                Some(next) if next <= end => current = next,
                _ => break,
            }
        }
        let added = self.elements.len() - before;
        tracing::debug!(added, total = self.elements.len(), "materialized range");
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns true if `elem` is one of the stored values.
    pub fn contains(&self, elem: &T) -> Result<bool, RangeError> {
        Ok(self.elements.contains(&key(elem)?))
    }

    pub fn first(&self) -> Option<&T> {
        self.elements.first().map(|k| &k.0)
    }

    pub fn last(&self) -> Option<&T> {
        self.elements.last().map(|k| &k.0)
    }

    pub fn iter(&self) -> MaterializedIter<'_, T> {
        MaterializedIter {
            inner: self.elements.iter(),
        }
    }
}

impl<T: PartialOrd + Clone> SteppedSet<T> for MutableRange<T> {
    type Iter<'a>
        = MaterializedIter<'a, T>
    where
        Self: 'a;

    fn len(&self) -> usize {
        MutableRange::len(self)
    }

    fn is_empty(&self) -> bool {
        MutableRange::is_empty(self)
    }

    fn contains(&self, elem: &T) -> Result<bool, RangeError> {
        MutableRange::contains(self, elem)
    }

    fn iter(&self) -> Self::Iter<'_> {
        MutableRange::iter(self)
    }

    fn insert(&mut self, elem: T) -> Result<bool, RangeError> {
        ensure_comparable(&elem, "element is not comparable")?;
        Ok(self.elements.insert(Key(elem)))
    }

    fn remove(&mut self, elem: &T) -> Result<bool, RangeError> {
        Ok(self.elements.remove(&key(elem)?))
    }

    fn insert_all<I>(&mut self, elems: I) -> Result<bool, RangeError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut changed = false;
        for elem in elems {
            changed |= self.insert(elem)?;
        }
        Ok(changed)
    }

    fn remove_all<'e, I>(&mut self, elems: I) -> Result<bool, RangeError>
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        let mut changed = false;
        for elem in elems {
            changed |= self.remove(elem)?;
        }
        Ok(changed)
    }

    fn retain_all<'e, I>(&mut self, keep: I) -> Result<bool, RangeError>
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        let keep = keep.into_iter().map(key).collect::<Result<BTreeSet<_>, _>>()?;
        let before = self.elements.len();
        self.elements.retain(|k| keep.contains(k));
        Ok(self.elements.len() != before)
    }

    fn clear(&mut self) -> Result<(), RangeError> {
        self.elements.clear();
        Ok(())
    }

    fn to_vec(&self) -> Result<Vec<T>, RangeError> {
        Ok(self.iter().collect())
    }
}

impl<T: PartialOrd + Clone, S: Stepper<T>> From<&RangeSet<T, S>> for MutableRange<T> {
    /// Materializes a lazy range.
    fn from(range: &RangeSet<T, S>) -> Self {
        // elements of a range are comparable: they all lie between its bounds
        let elements: BTreeSet<Key<T>> = range.iter().map(Key).collect();
        tracing::debug!(total = elements.len(), "materialized lazy range");
        MutableRange { elements }
    }
}

impl<T: PartialOrd> PartialEq for MutableRange<T> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl<'a, T: PartialOrd + Clone> IntoIterator for &'a MutableRange<T> {
    type Item = T;
    type IntoIter = MaterializedIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Debug> Debug for MutableRange<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.elements.iter().map(|k| &k.0)).finish()
    }
}

impl<T: Display> Display for MutableRange<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.elements.iter().map(|k| &k.0).format(", "))
    }
}

/// Iterator over the elements of a [`MutableRange`], in increasing order.
pub struct MaterializedIter<'a, T> {
    inner: btree_set::Iter<'a, Key<T>>,
}

impl<T: Clone> Iterator for MaterializedIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|k| k.0.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Clone> DoubleEndedIterator for MaterializedIter<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back().map(|k| k.0.clone())
    }
}

impl<T: Clone> ExactSizeIterator for MaterializedIter<'_, T> {}

impl<T: Clone> FusedIterator for MaterializedIter<'_, T> {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kind::ElementKind;

    #[test]
    fn test_default_steps() {
        let r = MutableRange::of(1, 5).unwrap();
        assert_eq!(r.len(), 5);
        assert_eq!(r.to_vec(), Ok(vec![1, 2, 3, 4, 5]));

        let r = MutableRange::of(1.0, 1.5).unwrap();
        assert_eq!(r.len(), 6);
        assert_eq!(r.to_vec(), Ok(vec![1.0, 1.1, 1.2, 1.3, 1.4, 1.5]));

        assert_eq!(
            MutableRange::of(0u32, 3).map(|r| r.len()),
            Err(RangeError::UnsupportedType(ElementKind::U32))
        );
    }

    #[test]
    fn test_equal_bounds_are_empty() {
        let r = MutableRange::of(4i16, 4).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.contains(&4), Ok(false));
        assert_eq!(r.iter().count(), 0);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(MutableRange::of(2, 1).unwrap_err().is_invalid_argument());
        assert!(MutableRange::of(f32::NAN, 1.0).unwrap_err().is_invalid_argument());

        let mut r = MutableRange::of(0, 2).unwrap();
        assert!(r.add_range(9, 3, |x: &i32| x + 1).unwrap_err().is_invalid_argument());
        // the failed insertion left the set untouched
        assert_eq!(r.to_vec(), Ok(vec![0, 1, 2]));
    }

    #[test]
    fn test_exact_membership() {
        let r = MutableRange::of(0.0, 1.0).unwrap();
        assert_eq!(r.contains(&0.3), Ok(true));
        assert_eq!(r.contains(&0.15), Ok(false));
        assert!(r.contains(&f64::NAN).is_err());

        let sparse = MutableRange::of_with(0, 100, |x: &i32| x + 25).unwrap();
        assert_eq!(sparse.contains(&50), Ok(true));
        assert_eq!(sparse.contains(&13), Ok(false));
        assert_eq!(sparse.contains_all([&0, &25, &100]), Ok(true));
        assert_eq!(sparse.contains_all([&0, &26]), Ok(false));
    }

    #[test]
    fn test_mutation() {
        let mut r = MutableRange::of(1, 3).unwrap();
        assert_eq!(r.insert(10), Ok(true));
        assert_eq!(r.insert(2), Ok(false));
        assert_eq!(r.remove(&1), Ok(true));
        assert_eq!(r.remove(&1), Ok(false));
        assert_eq!(r.to_vec(), Ok(vec![2, 3, 10]));

        assert_eq!(r.insert_all(vec![3, 4]), Ok(true));
        assert_eq!(r.insert_all(vec![3, 4]), Ok(false));
        assert_eq!(r.remove_all([&4, &99]), Ok(true));
        assert_eq!(r.remove_all([&99]), Ok(false));
        assert_eq!(r.to_vec(), Ok(vec![2, 3, 10]));

        assert_eq!(r.retain_all([&3, &10, &11]), Ok(true));
        assert_eq!(r.retain_all([&3, &10]), Ok(false));
        assert_eq!(r.to_vec(), Ok(vec![3, 10]));

        assert_eq!(r.clear(), Ok(()));
        assert!(r.is_empty());

        let mut floats = MutableRange::<f64>::new();
        assert!(floats.insert(f64::NAN).unwrap_err().is_invalid_argument());
        assert!(floats.retain_all([&f64::NAN]).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_overlapping_ranges_collapse() {
        let mut r = MutableRange::of(0, 10).unwrap();
        assert_eq!(r.add_default_range(5, 15), Ok(5));
        assert_eq!(r.len(), 16);
        assert_eq!(r.add_range(0, 20, |x: &i32| x + 10), Ok(1));
        assert_eq!(r.len(), 17);
        assert_eq!(r.add_range(7, 7, |x: &i32| x + 1), Ok(0));
        assert_eq!(r.last(), Some(&20));
    }

    #[test]
    fn test_default_float_precision() {
        let mut r = MutableRange::of(0.0, 0.2).unwrap();
        assert!(r.add_default_range(0.0, 1e20).unwrap_err().is_invalid_argument());
        assert!(MutableRange::of(2_000_000f32, 2_000_001f32).unwrap_err().is_invalid_argument());
        assert_eq!(r.len(), 3);
    }

    #[test]
    #[should_panic(expected = "not strictly increasing")]
    fn test_checked_step() {
        let _ = MutableRange::from_parts(0, 10, |x: &i32| if *x < 5 { x + 1 } else { *x }, true);
    }

    #[test]
    fn test_signed_zeros_are_one_element() {
        let r = MutableRange::from_elements([0.0f64, -0.0]).unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r.contains(&-0.0), Ok(true));
        assert_eq!(r.contains(&0.0), Ok(true));
        assert!(r.first().unwrap().is_sign_positive());
    }

    #[test]
    fn test_end_at_type_maximum() {
        let r = MutableRange::of(i64::MAX - 2, i64::MAX).unwrap();
        assert_eq!(r.to_vec(), Ok(vec![i64::MAX - 2, i64::MAX - 1, i64::MAX]));
    }

    #[test]
    fn test_from_lazy_range() {
        let lazy = RangeSet::of_with(1, 50, |x: &i32| x * 2).unwrap();
        let eager = MutableRange::from(&lazy);
        assert_eq!(eager.len(), lazy.len());
        assert_eq!(eager.to_vec(), Ok(lazy.iter().collect::<Vec<_>>()));
        assert_eq!(eager, MutableRange::from_elements([32, 16, 8, 4, 2, 1]).unwrap());
    }

    #[test]
    fn test_iteration() {
        let r = MutableRange::from_elements([5, 1, 3]).unwrap();
        assert_eq!(r.iter().len(), 3);
        assert_eq!(r.iter().rev().collect::<Vec<_>>(), vec![5, 3, 1]);
        assert_eq!((&r).into_iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_formatting() {
        let r = MutableRange::of(1, 3).unwrap();
        assert_eq!(format!("{}", r), "{1, 2, 3}");
        assert_eq!(format!("{:?}", r), "{1, 2, 3}");
        assert_eq!(format!("{}", MutableRange::<i32>::new()), "{}");
    }
}
