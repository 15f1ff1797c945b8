use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A hash set stored in the Robin Hood [`HashTable`].
///
/// Every value is kept with multiplicity 1; use
/// [`HashMultiSet`](crate::HashMultiSet) to count repeated values.
///
/// Insertion goes through the infallible path of the table and aborts via
/// `handle_alloc_error` if growing fails, like the standard collections.
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> HashSet<T, S> {
    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set holds no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table. The set grows
    /// before a new value would fill more than 60% of them.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes every value, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the values in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes and yields every value. The set is empty afterwards even if
    /// the iterator is dropped early.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let mut set: HashSet<u8> = (0..4).collect();
    /// let mut drained: Vec<_> = set.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, [0, 1, 2, 3]);
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Keeps only the values for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        self.table.retain(|v, _| f(v));
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty set with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty set able to hold `capacity` values before growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use robin_hash::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_capacity_and_hasher(50, RandomState::new());
    /// assert!(set.capacity() >= 50);
    /// # }
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Shrinks the table as far as the current values allow.
    pub fn shrink_to_fit(&mut self) {
        self.table
            .shrink_to_fit(|v| self.hash_builder.hash_one(v));
    }

    /// Reserves room for at least `additional` more values.
    pub fn reserve(&mut self, additional: usize) {
        self.table
            .reserve(additional, |v| self.hash_builder.hash_one(v));
    }

    /// Adds a value. Returns `false` if an equal value was already present,
    /// in which case the set is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let mut set: HashSet<&str> = HashSet::new();
    /// assert!(set.insert("a"));
    /// assert!(!set.insert("a"));
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.hash_builder.hash_one(&value);
        match self
            .table
            .entry(hash, |v| v == &value, |v| self.hash_builder.hash_one(v))
        {
            TableEntry::Occupied(_) => false,
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Adds a value, replacing and returning an equal value if one was
    /// present.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let hash = self.hash_builder.hash_one(&value);
        match self
            .table
            .entry(hash, |v| v == &value, |v| self.hash_builder.hash_one(v))
        {
            TableEntry::Occupied(mut entry) => Some(core::mem::replace(entry.get_mut(), value)),
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v == value)
    }

    /// Removes `value`, returning whether it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let mut set: HashSet<String> = HashSet::new();
    /// set.insert("owned".to_string());
    /// assert_eq!(set.take(&"owned".to_string()).as_deref(), Some("owned"));
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |v| v == value)
    }

    /// Returns `true` if `self` and `other` share no values.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().all(|v| !large.contains(v))
    }

    /// Returns `true` if every value of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if every value of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Lazily yields the values of `self`, then the values of `other` not in
    /// `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let a: HashSet<u8> = [1, 2].into_iter().collect();
    /// let b: HashSet<u8> = [2, 3].into_iter().collect();
    ///
    /// let mut all: Vec<_> = a.union(&b).copied().collect();
    /// all.sort();
    /// assert_eq!(all, [1, 2, 3]);
    /// # }
    /// ```
    pub fn union<'a>(&'a self, other: &'a Self) -> Union<'a, T, S> {
        Union {
            iter: self.iter().chain(other.difference(self)),
        }
    }

    /// Lazily yields the values present in both sets, walking the smaller
    /// one.
    pub fn intersection<'a>(&'a self, other: &'a Self) -> Intersection<'a, T, S> {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        Intersection {
            iter: small.iter(),
            other: large,
        }
    }

    /// Lazily yields the values of `self` that are not in `other`.
    pub fn difference<'a>(&'a self, other: &'a Self) -> Difference<'a, T, S> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Lazily yields the values in exactly one of the two sets.
    pub fn symmetric_difference<'a>(&'a self, other: &'a Self) -> SymmetricDifference<'a, T, S> {
        SymmetricDifference {
            iter: self.difference(other).chain(other.difference(self)),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty set using the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty set able to hold `capacity` values before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the values of a [`HashSet`].
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
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(v, _)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A draining iterator over the values of a [`HashSet`].
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(v, _)| v)
    }
}

/// A consuming iterator over the values of a [`HashSet`].
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(v, _)| v)
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = HashSet::new();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

/// Iterator returned by [`HashSet::union`].
pub struct Union<'a, T, S> {
    iter: core::iter::Chain<Iter<'a, T>, Difference<'a, T, S>>,
}

impl<'a, T, S> Iterator for Union<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

/// Iterator returned by [`HashSet::intersection`].
pub struct Intersection<'a, T, S> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Intersection<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let other = self.other;
        self.iter.find(|v| other.contains(v))
    }
}

/// Iterator returned by [`HashSet::difference`].
pub struct Difference<'a, T, S> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Difference<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let other = self.other;
        self.iter.find(|v| !other.contains(v))
    }
}

/// Iterator returned by [`HashSet::symmetric_difference`].
pub struct SymmetricDifference<'a, T, S> {
    iter: core::iter::Chain<Difference<'a, T, S>, Difference<'a, T, S>>,
}

impl<'a, T, S> Iterator for SymmetricDifference<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

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

    type Set<T> = HashSet<T, SipHashBuilder>;

    fn set_of(values: &[i32]) -> Set<i32> {
        values.iter().copied().collect()
    }

    fn sorted<'a>(values: impl Iterator<Item = &'a i32>) -> Vec<i32> {
        let mut v: Vec<i32> = values.copied().collect();
        v.sort();
        v
    }

    #[test]
    fn test_insert_contains_remove() {
        let mut set: Set<i32> = Set::new();
        assert!(set.insert(10));
        assert!(set.insert(20));
        assert!(!set.insert(10));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&10));
        assert!(!set.contains(&30));

        assert!(set.remove(&10));
        assert!(!set.remove(&10));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&20), Some(&20));
    }

    #[test]
    fn test_replace_and_take() {
        let mut set: Set<String> = Set::new();
        assert_eq!(set.replace("k".to_string()), None);
        assert_eq!(set.replace("k".to_string()), Some("k".to_string()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.take(&"k".to_string()), Some("k".to_string()));
        assert_eq!(set.take(&"k".to_string()), None);
    }

    #[test]
    fn test_growth_and_removal() {
        let mut set: Set<i32> = Set::with_capacity(0);
        for i in 0..2000 {
            assert!(set.insert(i));
        }
        for i in (0..2000).filter(|i| i % 3 == 0) {
            assert!(set.remove(&i));
        }
        for i in 0..2000 {
            assert_eq!(set.contains(&i), i % 3 != 0);
        }
        set.shrink_to_fit();
        assert_eq!(set.len(), 1333);
        assert!(set.contains(&1999));
    }

    #[test]
    fn test_reserve_and_capacity() {
        let mut set: Set<i32> = Set::with_capacity(4);
        set.reserve(500);
        let capacity = set.capacity();
        for i in 0..500 {
            set.insert(i);
        }
        assert_eq!(set.capacity(), capacity);
    }

    #[test]
    fn test_clear_drain_retain() {
        let mut set = set_of(&[1, 2, 3, 4, 5, 6]);
        set.retain(|v| v % 2 == 0);
        assert_eq!(sorted(set.iter()), [2, 4, 6]);

        let mut drained: Vec<i32> = set.drain().collect();
        drained.sort();
        assert_eq!(drained, [2, 4, 6]);
        assert!(set.is_empty());

        set.insert(9);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn test_vec_values() {
        let mut set: Set<Vec<u8>> = Set::new();
        assert!(set.insert(vec![1, 2]));
        assert!(set.insert(vec![]));
        assert!(!set.insert(vec![1, 2]));
        assert!(set.contains(&Vec::new()));
    }

    #[test]
    fn test_equality_and_into_iter() {
        let a = set_of(&[1, 2, 3]);
        let b = set_of(&[3, 2, 1]);
        let c = set_of(&[1, 2]);
        assert!(a == b);
        assert!(a != c);

        let mut owned: Vec<i32> = a.clone().into_iter().collect();
        owned.sort();
        assert_eq!(owned, [1, 2, 3]);
    }

    #[test]
    fn test_predicates() {
        let a = set_of(&[1, 2]);
        let b = set_of(&[1, 2, 3]);
        let c = set_of(&[7, 8]);
        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
        assert!(b.is_superset(&a));
        assert!(a.is_disjoint(&c));
        assert!(!a.is_disjoint(&b));
    }

    #[test]
    fn test_set_operations() {
        let a = set_of(&[1, 2, 3]);
        let b = set_of(&[3, 4, 5]);
        assert_eq!(sorted(a.union(&b)), [1, 2, 3, 4, 5]);
        assert_eq!(sorted(a.intersection(&b)), [3]);
        assert_eq!(sorted(b.intersection(&a)), [3]);
        assert_eq!(sorted(a.difference(&b)), [1, 2]);
        assert_eq!(sorted(a.symmetric_difference(&b)), [1, 2, 4, 5]);
    }

    #[test]
    fn test_debug() {
        let set = set_of(&[5]);
        assert_eq!(alloc::format!("{set:?}"), "{5}");
    }
}
