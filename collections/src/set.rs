use crate::error::RangeError;

/// Set-like interface shared by the lazy [`RangeSet`](crate::RangeSet) and the materialized
/// [`MutableRange`](crate::MutableRange).
///
/// The two implementations differ on two points:
///  - membership: `RangeSet` answers by comparing against its bounds (any value between them is
///    contained), `MutableRange` only contains the values it actually stores;
///  - mutation: every mutating method of `RangeSet` fails with [`RangeError::UnsupportedOperation`].
pub trait SteppedSet<T> {
    type Iter<'a>: Iterator<Item = T>
    where
        Self: 'a;

    /// Number of elements, equal to the number of items yielded by [`SteppedSet::iter`].
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails with [`RangeError::InvalidArgument`] if `elem` cannot be compared (e.g. NaN).
    fn contains(&self, elem: &T) -> Result<bool, RangeError>;

    fn contains_all<'e, I>(&self, elems: I) -> Result<bool, RangeError>
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        for elem in elems {
            if !self.contains(elem)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Iterates over all elements in increasing order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Returns true if the element was not already present.
    fn insert(&mut self, elem: T) -> Result<bool, RangeError>;

    /// Returns true if the element was present.
    fn remove(&mut self, elem: &T) -> Result<bool, RangeError>;

    /// Returns true if at least one element was added.
    fn insert_all<I>(&mut self, elems: I) -> Result<bool, RangeError>
    where
        I: IntoIterator<Item = T>;

    /// Returns true if at least one element was removed.
    fn remove_all<'e, I>(&mut self, elems: I) -> Result<bool, RangeError>
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e;

    /// Keeps only the elements that appear in `keep`. Returns true if at least one element was removed.
    fn retain_all<'e, I>(&mut self, keep: I) -> Result<bool, RangeError>
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e;

    fn clear(&mut self) -> Result<(), RangeError>;

    /// Copies all elements into a vector, in increasing order.
    fn to_vec(&self) -> Result<Vec<T>, RangeError>;
}
