use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A counting hash set built on the Robin Hood [`HashTable`].
///
/// Each distinct value is stored once alongside its multiplicity, so
/// inserting the same value repeatedly costs no extra space. [`count`]
/// reports distinct values while [`cardinality`] reports the sum of all
/// multiplicities.
///
/// Operations that may allocate return a [`Result`]. Removing an absent
/// value, or asking an empty multiset for its minimum, also reports an
/// [`Error`] with the matching [`ErrorKind`](crate::error::ErrorKind).
///
/// [`count`]: HashMultiSet::count
/// [`cardinality`]: HashMultiSet::cardinality
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use robin_hash::HashMultiSet;
///
/// let mut words: HashMultiSet<&str> = HashMultiSet::new();
/// for w in "the cat saw the dog and the bird".split(' ') {
///     words.insert(w).unwrap();
/// }
///
/// assert_eq!(words.multiplicity_of(&"the"), 3);
/// assert_eq!(words.count(), 6);
/// assert_eq!(words.cardinality(), 8);
/// # }
/// ```
#[derive(Clone)]
pub struct HashMultiSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    cardinality: usize,
    hash_builder: S,
}

impl<T, S> PartialEq for HashMultiSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Two multisets are equal when they hold the same values with the same
    /// multiplicities. Layout and load factor are not compared.
    fn eq(&self, other: &Self) -> bool {
        if self.count() != other.count() || self.cardinality != other.cardinality {
            return false;
        }
        self.iter().all(|(v, m)| other.multiplicity_of(v) == m)
    }
}

impl<T, S> Eq for HashMultiSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashMultiSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.table.iter()).finish()
    }
}

impl<T, S> HashMultiSet<T, S> {
    /// Returns the number of distinct values.
    pub fn count(&self) -> usize {
        self.table.len()
    }

    /// Returns the sum of all multiplicities.
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Returns `true` if the multiset holds no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the load factor of the underlying table.
    pub fn load(&self) -> f64 {
        self.table.load()
    }

    /// Returns `true` if inserting another distinct value will grow the
    /// table.
    pub fn is_full(&self) -> bool {
        self.table.is_full()
    }

    /// Returns a reference to the multiset's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes every value, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.table.clear();
        self.cardinality = 0;
    }

    /// Returns an iterator over the distinct values and their multiplicities,
    /// in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns a bidirectional cursor positioned at the first value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashMultiSet;
    ///
    /// let set: HashMultiSet<u32> = [1, 2, 3].into_iter().collect();
    /// let mut cursor = set.cursor();
    /// assert!(cursor.go_to(2));
    /// assert_eq!(cursor.index(), 2);
    /// assert!(!cursor.advance(1));
    /// # }
    /// ```
    pub fn cursor(&self) -> Cursor<'_, T> {
        self.table.cursor()
    }

    /// Removes every value, returning them with their multiplicities.
    pub fn drain(&mut self) -> Drain<'_, T> {
        self.cardinality = 0;
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<T, S> HashMultiSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty multiset with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use robin_hash::HashMultiSet;
    ///
    /// let set: HashMultiSet<i32, _> = HashMultiSet::with_hasher(RandomState::new());
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty multiset able to hold `capacity` distinct values
    /// before growing, using the default load factor of 0.6.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            cardinality: 0,
            hash_builder,
        }
    }

    /// Creates an empty multiset with an explicit capacity and load factor.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if `capacity` is zero, `load` is not strictly between 0 and 1, or the
    /// slot count would overflow, and
    /// [`ErrorKind::AllocationFailure`](crate::error::ErrorKind::AllocationFailure)
    /// if the table cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::DefaultHashBuilder;
    /// use robin_hash::HashMultiSet;
    /// use robin_hash::error::ErrorKind;
    ///
    /// let set: HashMultiSet<u8> =
    ///     HashMultiSet::try_with_capacity_and_load(10, 0.5, DefaultHashBuilder::default())
    ///         .unwrap();
    /// assert_eq!(set.load(), 0.5);
    ///
    /// let err = HashMultiSet::<u8>::try_with_capacity_and_load(0, 0.5, DefaultHashBuilder::default())
    ///     .unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// # }
    /// ```
    pub fn try_with_capacity_and_load(
        capacity: usize,
        load: f64,
        hash_builder: S,
    ) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::try_with_capacity_and_load(capacity, load)?,
            cardinality: 0,
            hash_builder,
        })
    }

    /// Adds one occurrence of `value`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::AllocationFailure`](crate::error::ErrorKind::AllocationFailure)
    ///   if the table had to grow and could not.
    /// - [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    ///   if the cardinality would overflow `usize`.
    ///
    /// The multiset is unchanged on error.
    pub fn insert(&mut self, value: T) -> Result<(), Error> {
        self.insert_many(value, 1)
    }

    /// Adds `n` occurrences of `value`. Adding zero occurrences does nothing.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](HashMultiSet::insert).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashMultiSet;
    ///
    /// let mut set: HashMultiSet<char> = HashMultiSet::new();
    /// set.insert_many('x', 3).unwrap();
    /// set.insert_many('x', 2).unwrap();
    /// set.insert_many('y', 0).unwrap();
    ///
    /// assert_eq!(set.multiplicity_of(&'x'), 5);
    /// assert!(!set.contains(&'y'));
    /// # }
    /// ```
    pub fn insert_many(&mut self, value: T, n: usize) -> Result<(), Error> {
        if n == 0 {
            return Ok(());
        }
        // A multiplicity never exceeds the cardinality, so this bounds both.
        let cardinality = self
            .cardinality
            .checked_add(n)
            .ok_or_else(|| Error::cardinality_overflow(self.cardinality, n))?;

        let hash = self.hash_builder.hash_one(&value);
        match self
            .table
            .try_entry(hash, |v| v == &value, |v| self.hash_builder.hash_one(v))?
        {
            TableEntry::Occupied(mut entry) => {
                let m = entry.multiplicity();
                entry.set_multiplicity(m + n);
            }
            TableEntry::Vacant(entry) => {
                entry.insert_with_multiplicity(value, n);
            }
        }
        self.cardinality = cardinality;
        Ok(())
    }

    /// Sets the multiplicity of `value`, inserting it if absent. A
    /// multiplicity of zero removes the value; removing an absent value this
    /// way succeeds.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](HashMultiSet::insert).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashMultiSet;
    ///
    /// let mut set: HashMultiSet<&str> = HashMultiSet::new();
    /// set.insert_many("a", 4).unwrap();
    /// set.update("a", 1).unwrap();
    /// assert_eq!(set.cardinality(), 1);
    ///
    /// set.update("a", 0).unwrap();
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn update(&mut self, value: T, multiplicity: usize) -> Result<(), Error> {
        let hash = self.hash_builder.hash_one(&value);

        if multiplicity == 0 {
            if let Some(entry) = self.table.find_entry(hash, |v| v == &value) {
                let (_, removed) = entry.remove();
                self.cardinality -= removed;
            }
            return Ok(());
        }

        let current = self.table.find_multiplicity(hash, |v| v == &value);
        let cardinality = (self.cardinality - current)
            .checked_add(multiplicity)
            .ok_or_else(|| Error::cardinality_overflow(self.cardinality - current, multiplicity))?;

        match self
            .table
            .try_entry(hash, |v| v == &value, |v| self.hash_builder.hash_one(v))?
        {
            TableEntry::Occupied(mut entry) => {
                entry.set_multiplicity(multiplicity);
            }
            TableEntry::Vacant(entry) => {
                entry.insert_with_multiplicity(value, multiplicity);
            }
        }
        self.cardinality = cardinality;
        Ok(())
    }

    /// Removes one occurrence of `value`. The value disappears once its
    /// multiplicity reaches zero.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Empty`](crate::error::ErrorKind::Empty) if the multiset
    ///   is empty.
    /// - [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if
    ///   `value` is absent.
    pub fn remove(&mut self, value: &T) -> Result<(), Error> {
        if self.is_empty() {
            return Err(Error::empty());
        }

        let hash = self.hash_builder.hash_one(value);
        let mut entry = self
            .table
            .find_entry(hash, |v| v == value)
            .ok_or_else(Error::not_found)?;
        match entry.multiplicity() {
            1 => {
                entry.remove();
            }
            m => entry.set_multiplicity(m - 1),
        }
        self.cardinality -= 1;
        Ok(())
    }

    /// Removes every occurrence of `value`, returning how many there were.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Empty`](crate::error::ErrorKind::Empty) if the multiset
    ///   is empty.
    /// - [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if
    ///   `value` is absent.
    pub fn remove_all(&mut self, value: &T) -> Result<usize, Error> {
        if self.is_empty() {
            return Err(Error::empty());
        }

        let hash = self.hash_builder.hash_one(value);
        let (_, removed) = self
            .table
            .find_entry(hash, |v| v == value)
            .ok_or_else(Error::not_found)?
            .remove();
        self.cardinality -= removed;
        Ok(removed)
    }

    /// Returns `true` if at least one occurrence of `value` is present.
    pub fn contains(&self, value: &T) -> bool {
        self.multiplicity_of(value) > 0
    }

    /// Returns the number of occurrences of `value`, 0 if absent.
    pub fn multiplicity_of(&self, value: &T) -> usize {
        let hash = self.hash_builder.hash_one(value);
        self.table.find_multiplicity(hash, |v| v == value)
    }

    /// Returns the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v == value)
    }

    /// Resizes the table to hold `capacity` distinct values under the current
    /// load factor. The table may shrink as long as every value still fits.
    ///
    /// # Errors
    ///
    /// See [`HashTable::resize`]. The multiset is unchanged on error.
    pub fn resize(&mut self, capacity: usize) -> Result<(), Error> {
        self.table
            .resize(capacity, |v| self.hash_builder.hash_one(v))
    }

    /// Reserves room for at least `additional` more distinct values.
    pub fn reserve(&mut self, additional: usize) {
        self.table
            .reserve(additional, |v| self.hash_builder.hash_one(v));
    }

    /// Shrinks the table as far as the current values and load factor allow,
    /// clearing every tombstone.
    pub fn shrink_to_fit(&mut self) {
        self.table
            .shrink_to_fit(|v| self.hash_builder.hash_one(v));
    }

    /// Keeps only the values for which `f` returns `true`. The predicate
    /// receives each distinct value with its multiplicity.
    pub fn retain(&mut self, mut f: impl FnMut(&T, usize) -> bool) {
        let mut dropped = 0;
        self.table.retain(|v, m| {
            let keep = f(v, m);
            if !keep {
                dropped += m;
            }
            keep
        });
        self.cardinality -= dropped;
    }

    /// Returns `true` if every value in `self` occurs in `other` at least as
    /// many times.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashMultiSet;
    ///
    /// let a: HashMultiSet<char> = ['a'].into_iter().collect();
    /// let b: HashMultiSet<char> = ['a', 'a', 'b'].into_iter().collect();
    ///
    /// assert!(a.is_subset(&b));
    /// assert!(!b.is_subset(&a));
    /// assert!(!a.is_proper_subset(&a));
    /// # }
    /// ```
    pub fn is_subset(&self, other: &Self) -> bool {
        if self.count() > other.count() {
            return false;
        }
        self.iter().all(|(v, m)| m <= other.multiplicity_of(v))
    }

    /// Returns `true` if `other` is a subset of `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if `self` is a subset of `other` and `other` has more
    /// distinct values.
    pub fn is_proper_subset(&self, other: &Self) -> bool {
        self.count() < other.count() && self.is_subset(other)
    }

    /// Returns `true` if `other` is a proper subset of `self`.
    pub fn is_proper_superset(&self, other: &Self) -> bool {
        other.is_proper_subset(self)
    }

    /// Returns `true` if no value of `self` occurs in `other`.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.iter().all(|(v, _)| !other.contains(v))
    }
}

impl<T, S> HashMultiSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// An empty multiset shaped like `self`: same slot count as its capacity
    /// hint, same load factor and hasher.
    fn empty_like(&self) -> Result<Self, Error> {
        Self::try_with_capacity_and_load(
            self.capacity(),
            self.load(),
            self.hash_builder.clone(),
        )
    }

    /// Each value takes the larger of its multiplicities in `self` and
    /// `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::AllocationFailure`](crate::error::ErrorKind::AllocationFailure)
    /// if the result cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashMultiSet;
    ///
    /// let mut a: HashMultiSet<char> = HashMultiSet::new();
    /// a.insert_many('a', 3).unwrap();
    /// a.insert_many('b', 1).unwrap();
    /// let mut b: HashMultiSet<char> = HashMultiSet::new();
    /// b.insert_many('a', 1).unwrap();
    /// b.insert_many('b', 2).unwrap();
    ///
    /// let u = a.union(&b).unwrap();
    /// assert_eq!(u.multiplicity_of(&'a'), 3);
    /// assert_eq!(u.multiplicity_of(&'b'), 2);
    /// # }
    /// ```
    pub fn union(&self, other: &Self) -> Result<Self, Error> {
        let mut result = self.empty_like()?;
        for (v, m1) in self.iter() {
            result.update(v.clone(), m1.max(other.multiplicity_of(v)))?;
        }
        for (v, m2) in other.iter() {
            if !self.contains(v) {
                result.update(v.clone(), m2)?;
            }
        }
        Ok(result)
    }

    /// Each value takes the smaller of its multiplicities in `self` and
    /// `other`; values missing from either side are dropped.
    ///
    /// Only the input with fewer distinct values is walked.
    pub fn intersection(&self, other: &Self) -> Result<Self, Error> {
        let mut result = self.empty_like()?;
        let (small, large) = if self.count() < other.count() {
            (self, other)
        } else {
            (other, self)
        };
        for (v, m1) in small.iter() {
            let m = m1.min(large.multiplicity_of(v));
            if m > 0 {
                result.update(v.clone(), m)?;
            }
        }
        Ok(result)
    }

    /// Each value of `self` keeps the occurrences `other` does not cancel
    /// out; values reaching zero are dropped.
    pub fn difference(&self, other: &Self) -> Result<Self, Error> {
        let mut result = self.empty_like()?;
        for (v, m1) in self.iter() {
            let m2 = other.multiplicity_of(v);
            if m1 > m2 {
                result.update(v.clone(), m1 - m2)?;
            }
        }
        Ok(result)
    }

    /// Each value takes the sum of its multiplicities in `self` and `other`.
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if the summed cardinality overflows `usize`.
    pub fn summation(&self, other: &Self) -> Result<Self, Error> {
        let mut result = self.empty_like()?;
        for (v, m) in self.iter().chain(other.iter()) {
            result.insert_many(v.clone(), m)?;
        }
        Ok(result)
    }

    /// Each value takes the absolute difference of its multiplicities in
    /// `self` and `other`; values with equal multiplicities are dropped.
    pub fn symmetric_difference(&self, other: &Self) -> Result<Self, Error> {
        let mut result = self.empty_like()?;
        for (v, m1) in self.iter() {
            let m2 = other.multiplicity_of(v);
            if m1 != m2 {
                result.update(v.clone(), m1.abs_diff(m2))?;
            }
        }
        for (v, m2) in other.iter() {
            if !self.contains(v) {
                result.update(v.clone(), m2)?;
            }
        }
        Ok(result)
    }
}

impl<T, S> HashMultiSet<T, S>
where
    T: Hash + Eq + Ord,
    S: BuildHasher,
{
    /// Returns the greatest value.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Empty`](crate::error::ErrorKind::Empty) if the
    /// multiset is empty.
    pub fn max(&self) -> Result<&T, Error> {
        self.iter().map(|(v, _)| v).max().ok_or_else(Error::empty)
    }

    /// Returns the least value.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Empty`](crate::error::ErrorKind::Empty) if the
    /// multiset is empty.
    pub fn min(&self) -> Result<&T, Error> {
        self.iter().map(|(v, _)| v).min().ok_or_else(Error::empty)
    }
}

impl<T, S> HashMultiSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty multiset using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashMultiSet;
    ///
    /// let set: HashMultiSet<i32> = HashMultiSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.cardinality(), 0);
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty multiset able to hold `capacity` distinct values
    /// before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<T, S> Default for HashMultiSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the distinct values of a [`HashMultiSet`] and their
/// multiplicities.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A consuming iterator over the distinct values of a [`HashMultiSet`] and
/// their multiplicities.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (T, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

/// A draining iterator over the distinct values of a [`HashMultiSet`] and
/// their multiplicities.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = (T, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, S> IntoIterator for HashMultiSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = (T, usize);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashMultiSet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = (&'a T, usize);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for HashMultiSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = HashMultiSet::new();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashMultiSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Adds one occurrence of each value.
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`](alloc::alloc::handle_alloc_error)
    /// if the table cannot grow. Panics if the cardinality would overflow
    /// `usize`. Use [`insert`](HashMultiSet::insert) to observe either
    /// failure as an error.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            let Some(cardinality) = self.cardinality.checked_add(1) else {
                panic!("multiset cardinality overflow");
            };
            let hash = self.hash_builder.hash_one(&value);
            match self
                .table
                .entry(hash, |v| v == &value, |v| self.hash_builder.hash_one(v))
            {
                TableEntry::Occupied(mut entry) => {
                    let m = entry.multiplicity();
                    entry.set_multiplicity(m + 1);
                }
                TableEntry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
            self.cardinality = cardinality;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::error::ErrorKind;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            Self {
                k1: OsRng.try_next_u64().unwrap_or(0),
                k2: OsRng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type MultiSet<T> = HashMultiSet<T, SipHashBuilder>;

    fn multiset(pairs: &[(char, usize)]) -> MultiSet<char> {
        let mut set = MultiSet::new();
        for &(v, m) in pairs {
            set.insert_many(v, m).unwrap();
        }
        set
    }

    fn sorted(set: &MultiSet<char>) -> Vec<(char, usize)> {
        let mut pairs: Vec<_> = set.iter().map(|(&v, m)| (v, m)).collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn test_count_and_cardinality() {
        let mut set: MultiSet<char> =
            HashMultiSet::try_with_capacity_and_load(2, 0.6, SipHashBuilder::default()).unwrap();
        set.insert_many('A', 3).unwrap();
        set.insert_many('B', 2).unwrap();
        assert_eq!(set.count(), 2);
        assert_eq!(set.cardinality(), 5);

        set.remove(&'A').unwrap();
        assert_eq!(set.multiplicity_of(&'A'), 2);
        assert_eq!(set.cardinality(), 4);

        assert_eq!(set.remove_all(&'A').unwrap(), 2);
        assert!(!set.contains(&'A'));
        assert_eq!(set.count(), 1);
        assert_eq!(set.cardinality(), 2);
    }

    #[test]
    fn test_remove_last_occurrence_drops_value() {
        let mut set = multiset(&[('x', 1), ('y', 1)]);
        set.remove(&'x').unwrap();
        assert!(!set.contains(&'x'));
        assert_eq!(set.count(), 1);
        assert_eq!(set.cardinality(), 1);
    }

    #[test]
    fn test_remove_errors() {
        let mut set: MultiSet<char> = MultiSet::new();
        assert_eq!(set.remove(&'a').unwrap_err().kind(), ErrorKind::Empty);
        assert_eq!(set.remove_all(&'a').unwrap_err().kind(), ErrorKind::Empty);

        set.insert('b').unwrap();
        assert_eq!(set.remove(&'a').unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(set.remove_all(&'a').unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(set.cardinality(), 1);
    }

    #[test]
    fn test_insert_many_zero_is_noop() {
        let mut set: MultiSet<char> = MultiSet::new();
        set.insert_many('z', 0).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.cardinality(), 0);
    }

    #[test]
    fn test_update() {
        let mut set = multiset(&[('a', 5)]);
        set.update('a', 2).unwrap();
        assert_eq!(set.multiplicity_of(&'a'), 2);
        assert_eq!(set.cardinality(), 2);

        set.update('b', 4).unwrap();
        assert_eq!(set.count(), 2);
        assert_eq!(set.cardinality(), 6);

        set.update('a', 0).unwrap();
        assert!(!set.contains(&'a'));
        assert_eq!(set.cardinality(), 4);

        // Zeroing an absent value is fine.
        set.update('q', 0).unwrap();
        assert_eq!(set.count(), 1);
    }

    #[test]
    fn test_shrink_then_grow_respects_load() {
        let mut set: MultiSet<u32> = MultiSet::new();
        for v in 0..=3 {
            set.insert(v).unwrap();
        }
        set.shrink_to_fit();
        set.update(4, 1).unwrap();
        assert!(set.capacity() as f64 * set.load() >= set.count() as f64);

        let capacity = set.capacity();
        let err = set.resize(4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert_eq!(set.capacity(), capacity);
        assert_eq!(set.count(), 5);
    }

    #[test]
    fn test_multiplicity_overflow_is_rejected() {
        let mut set: MultiSet<u32> = MultiSet::new();
        set.insert_many(1, usize::MAX).unwrap();

        assert_eq!(set.insert(1).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(set.insert_many(2, 1).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(set.update(2, 3).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert_eq!(set.multiplicity_of(&1), usize::MAX);
        assert!(!set.contains(&2));
        assert_eq!(set.count(), 1);
        assert_eq!(set.cardinality(), usize::MAX);

        // Replacing the only multiplicity does not overflow.
        set.update(1, 5).unwrap();
        assert_eq!(set.cardinality(), 5);
        set.update(1, usize::MAX).unwrap();
        assert_eq!(set.cardinality(), usize::MAX);
    }

    #[test]
    fn test_summation_overflow_is_rejected() {
        let mut a: MultiSet<u32> = MultiSet::new();
        a.insert_many(7, usize::MAX / 2 + 1).unwrap();
        let err = a.summation(&a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(a.cardinality(), usize::MAX / 2 + 1);
    }

    #[test]
    #[should_panic(expected = "multiset cardinality overflow")]
    fn test_extend_panics_on_overflow() {
        let mut set: MultiSet<u32> = MultiSet::new();
        set.insert_many(1, usize::MAX).unwrap();
        set.extend([2]);
    }

    #[test]
    fn test_invalid_construction() {
        for (capacity, load) in [(0, 0.6), (4, 0.0), (4, 1.0), (4, 2.0)] {
            let err = MultiSet::<u32>::try_with_capacity_and_load(
                capacity,
                load,
                SipHashBuilder::default(),
            )
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let set = multiset(&[('a', 2)]);
        for _ in 0..2 {
            assert!(set.contains(&'a'));
            assert!(!set.contains(&'b'));
            assert_eq!(set.count(), 1);
            assert_eq!(set.cardinality(), 2);
        }
        assert_eq!(set.get(&'a'), Some(&'a'));
    }

    #[test]
    fn test_growth_keeps_multiplicities() {
        let mut set: MultiSet<u32> = MultiSet::with_capacity(1);
        for i in 0..1000u32 {
            set.insert_many(i, (i % 7 + 1) as usize).unwrap();
        }
        assert_eq!(set.count(), 1000);
        for i in 0..1000u32 {
            assert_eq!(set.multiplicity_of(&i), (i % 7 + 1) as usize);
        }
        let total: usize = (0..1000u32).map(|i| (i % 7 + 1) as usize).sum();
        assert_eq!(set.cardinality(), total);
        assert!(set.capacity() as f64 * set.load() >= set.count() as f64);
    }

    #[test]
    fn test_resize_and_shrink() {
        let mut set: MultiSet<u32> = MultiSet::with_capacity(8);
        for i in 0..8u32 {
            set.insert_many(i, 2).unwrap();
        }

        set.resize(1000).unwrap();
        assert!(set.capacity() >= 1000);
        assert_eq!(set.cardinality(), 16);

        let capacity = set.capacity();
        assert_eq!(set.resize(2).unwrap_err().kind(), ErrorKind::Invalid);
        assert_eq!(set.capacity(), capacity);
        assert_eq!(set.count(), 8);

        set.shrink_to_fit();
        assert!(set.capacity() < capacity);
        for i in 0..8u32 {
            assert_eq!(set.multiplicity_of(&i), 2);
        }
    }

    #[test]
    fn test_min_max() {
        let set: MultiSet<i32> = [5, -3, 12, 7, 12].into_iter().collect();
        assert_eq!(set.max().unwrap(), &12);
        assert_eq!(set.min().unwrap(), &-3);

        let empty: MultiSet<i32> = MultiSet::new();
        assert_eq!(empty.max().unwrap_err().kind(), ErrorKind::Empty);
        assert_eq!(empty.min().unwrap_err().kind(), ErrorKind::Empty);
    }

    #[test]
    fn test_clone_and_equality() {
        let set = multiset(&[('a', 3), ('b', 1)]);
        let copy = set.clone();
        assert_eq!(set, copy);
        assert_eq!(set.capacity(), copy.capacity());

        let mut other = multiset(&[('b', 1), ('a', 3)]);
        assert_eq!(set, other);
        other.insert('a').unwrap();
        assert_ne!(set, other);

        // Same distinct values and cardinality, different distribution.
        let shifted = multiset(&[('a', 2), ('b', 2)]);
        assert_ne!(set, shifted);
    }

    #[test]
    fn test_union() {
        let a = multiset(&[('A', 3), ('B', 1)]);
        let b = multiset(&[('A', 1), ('B', 2)]);
        assert_eq!(sorted(&a.union(&b).unwrap()), [('A', 3), ('B', 2)]);

        let c = multiset(&[('C', 4)]);
        assert_eq!(
            sorted(&a.union(&c).unwrap()),
            [('A', 3), ('B', 1), ('C', 4)]
        );
    }

    #[test]
    fn test_intersection() {
        let a = multiset(&[('A', 3), ('B', 1)]);
        let b = multiset(&[('A', 1), ('B', 2)]);
        let i = a.intersection(&b).unwrap();
        assert_eq!(sorted(&i), [('A', 1), ('B', 1)]);
        assert_eq!(i.cardinality(), 2);

        let c = multiset(&[('A', 9), ('Z', 1), ('Y', 1)]);
        assert_eq!(sorted(&a.intersection(&c).unwrap()), [('A', 3)]);
        assert_eq!(sorted(&c.intersection(&a).unwrap()), [('A', 3)]);
    }

    #[test]
    fn test_difference() {
        let a = multiset(&[('A', 3), ('B', 1)]);
        let b = multiset(&[('A', 1), ('B', 2)]);
        assert_eq!(sorted(&a.difference(&b).unwrap()), [('A', 2)]);
        assert_eq!(sorted(&b.difference(&a).unwrap()), [('B', 1)]);
    }

    #[test]
    fn test_summation() {
        let a = multiset(&[('A', 3), ('B', 1)]);
        let b = multiset(&[('A', 1), ('C', 2)]);
        let s = a.summation(&b).unwrap();
        assert_eq!(sorted(&s), [('A', 4), ('B', 1), ('C', 2)]);
        assert_eq!(s.cardinality(), a.cardinality() + b.cardinality());
    }

    #[test]
    fn test_symmetric_difference() {
        let a = multiset(&[('A', 3), ('B', 1)]);
        let b = multiset(&[('A', 1), ('B', 2)]);
        assert_eq!(
            sorted(&a.symmetric_difference(&b).unwrap()),
            [('A', 2), ('B', 1)]
        );

        let c = multiset(&[('A', 3), ('D', 5)]);
        assert_eq!(
            sorted(&a.symmetric_difference(&c).unwrap()),
            [('B', 1), ('D', 5)]
        );
    }

    #[test]
    fn test_algebra_results_use_left_shape() {
        let a: MultiSet<char> =
            HashMultiSet::try_with_capacity_and_load(40, 0.5, SipHashBuilder::default()).unwrap();
        let b = multiset(&[('x', 1)]);
        let u = a.union(&b).unwrap();
        assert_eq!(u.load(), 0.5);
        assert!(u.capacity() >= a.capacity());
    }

    #[test]
    fn test_subset_predicates() {
        let a = multiset(&[('A', 1)]);
        let b = multiset(&[('A', 2), ('B', 1)]);
        assert!(a.is_subset(&b));
        assert!(b.is_superset(&a));
        assert!(a.is_proper_subset(&b));
        assert!(b.is_proper_superset(&a));
        assert!(!b.is_subset(&a));

        assert!(a.is_subset(&a));
        assert!(!a.is_proper_subset(&a));

        let heavy = multiset(&[('A', 5)]);
        assert!(!heavy.is_subset(&b));

        let empty: MultiSet<char> = MultiSet::new();
        assert!(empty.is_subset(&a));
        assert!(empty.is_proper_subset(&a));
        assert!(!empty.is_proper_subset(&empty));
    }

    #[test]
    fn test_disjoint() {
        let a = multiset(&[('A', 4)]);
        let b = multiset(&[('B', 1), ('C', 9)]);
        let c = multiset(&[('C', 1), ('A', 1)]);
        assert!(a.is_disjoint(&b));
        assert!(b.is_disjoint(&a));
        assert!(!a.is_disjoint(&c));
        assert!(!b.is_disjoint(&c));
    }

    #[test]
    fn test_cursor_visits_every_value() {
        let set: MultiSet<u32> = (0..50u32).chain(0..10).collect();
        let mut cursor = set.cursor();
        let mut forward = 0;
        let mut total = 0;
        while !cursor.at_end() {
            forward += 1;
            total += cursor.multiplicity();
            cursor.move_next();
        }
        assert_eq!(forward, set.count());
        assert_eq!(total, set.cardinality());

        let mut backward = 0;
        cursor.to_end();
        while !cursor.at_start() {
            backward += 1;
            cursor.move_prev();
        }
        assert_eq!(backward, set.count());
    }

    #[test]
    fn test_iterators() {
        let set = multiset(&[('a', 2), ('b', 3)]);
        assert_eq!(set.iter().len(), 2);
        assert_eq!(set.iter().map(|(_, m)| m).sum::<usize>(), 5);
        assert_eq!(set.iter().rev().count(), 2);

        let mut owned: Vec<(char, usize)> = set.clone().into_iter().collect();
        owned.sort();
        assert_eq!(owned, [('a', 2), ('b', 3)]);

        let mut by_ref = Vec::new();
        for (v, m) in &set {
            by_ref.push((*v, m));
        }
        by_ref.sort();
        assert_eq!(by_ref, owned);
    }

    #[test]
    fn test_drain_and_clear() {
        let mut set = multiset(&[('a', 2), ('b', 3)]);
        let drained: usize = set.drain().map(|(_, m)| m).sum();
        assert_eq!(drained, 5);
        assert!(set.is_empty());
        assert_eq!(set.cardinality(), 0);

        set.insert('c').unwrap();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.cardinality(), 0);
    }

    #[test]
    fn test_retain() {
        let mut set = multiset(&[('a', 1), ('b', 4), ('c', 2)]);
        set.retain(|_, m| m >= 2);
        assert_eq!(sorted(&set), [('b', 4), ('c', 2)]);
        assert_eq!(set.cardinality(), 6);
    }

    #[test]
    fn test_extend_and_from_iter() {
        let mut set: MultiSet<String> = ["x", "y", "x"].iter().map(|s| s.to_string()).collect();
        set.extend(["x".to_string(), "z".to_string()]);
        assert_eq!(set.multiplicity_of(&"x".to_string()), 3);
        assert_eq!(set.count(), 3);
        assert_eq!(set.cardinality(), 5);
    }

    #[test]
    fn test_debug_shows_multiplicities() {
        let set = multiset(&[('q', 3)]);
        assert_eq!(alloc::format!("{set:?}"), "{'q': 3}");
    }

    #[test]
    fn test_insert_remove_cycle() {
        let mut set: MultiSet<u64> = MultiSet::with_capacity(16);
        for round in 0..20u64 {
            for i in 0..10u64 {
                set.insert(round * 100 + i).unwrap();
            }
            for i in 0..10u64 {
                set.remove(&(round * 100 + i)).unwrap();
            }
        }
        assert!(set.is_empty());
        assert_eq!(set.cardinality(), 0);
        set.insert(7).unwrap();
        assert!(set.contains(&7));
    }
}
