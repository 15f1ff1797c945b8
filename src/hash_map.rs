use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A key-value map stored in the Robin Hood [`HashTable`].
///
/// Pairs are stored inline as `(K, V)`; only the key is hashed and compared.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use robin_hash::HashMap;
///
/// let mut scores: HashMap<&str, u32> = HashMap::new();
/// scores.insert("ada", 10);
/// *scores.entry("ada").or_insert(0) += 5;
/// *scores.entry("bob").or_default() += 1;
///
/// assert_eq!(scores.get(&"ada"), Some(&15));
/// assert_eq!(scores.get(&"bob"), Some(&1));
/// # }
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Returns the number of pairs in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes every pair, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the pairs in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Removes and yields every pair.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use robin_hash::HashMap;
    /// #
    /// # struct FixedSip;
    /// # impl BuildHasher for FixedSip {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map: HashMap<u32, &str, _> = HashMap::with_hasher(FixedSip);
    /// map.insert(1, "one");
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty map able to hold `capacity` pairs before growing.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Shrinks the table as far as the current pairs allow.
    pub fn shrink_to_fit(&mut self) {
        self.table
            .shrink_to_fit(|(k, _)| self.hash_builder.hash_one(k));
    }

    /// Reserves room for at least `additional` more pairs.
    pub fn reserve(&mut self, additional: usize) {
        self.table
            .reserve(additional, |(k, _)| self.hash_builder.hash_one(k));
    }

    /// Inserts a pair, returning the previous value for the key. The stored
    /// key is kept when the key was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, |(k, _)| k == key)
            .map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map has a value for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and its value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Gets the entry for `key` for in-place manipulation. The table grows
    /// here if the key is absent and the table is full.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(
            hash,
            |(k, _)| k == &key,
            |(k, _)| self.hash_builder.hash_one(k),
        ) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Keeps only the pairs for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &V) -> bool) {
        self.table.retain(|(k, v), _| f(k, v));
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty map using the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map able to hold `capacity` pairs before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single entry of a [`HashMap`], returned by
/// [`HashMap::entry`].
pub enum Entry<'a, K, V> {
    /// The key is absent.
    Vacant(VacantEntry<'a, K, V>),
    /// The key is present.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the key is absent and returns the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the key is absent and returns the
    /// value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Runs `f` on the value if the key is present.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            vacant => vacant,
        }
    }

    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V: Default> Entry<'a, K, V> {
    /// Inserts `V::default()` if the key is absent and returns the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A vacant [`Entry`].
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Returns the key that will be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Gives the key back without inserting.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts `value` under the entry's key.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// An occupied [`Entry`].
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Returns the stored key.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Returns the value.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Returns the value mutably.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the pair, returning the value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Removes the pair, returning the stored key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove().0
    }
}

/// An iterator over the pairs of a [`HashMap`].
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|((k, v), _)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A draining iterator over the pairs of a [`HashMap`].
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(pair, _)| pair)
    }
}

/// A consuming iterator over the pairs of a [`HashMap`].
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(pair, _)| pair)
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

    type Map<K, V> = HashMap<K, V, SipHashBuilder>;

    #[test]
    fn test_insert_get_replace() {
        let mut map: Map<i32, String> = Map::new();
        assert_eq!(map.insert(1, "one".to_string()), None);
        assert_eq!(map.insert(2, "two".to_string()), None);
        assert_eq!(
            map.insert(1, "uno".to_string()),
            Some("one".to_string())
        );
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1).map(String::as_str), Some("uno"));
        assert_eq!(map.get(&3), None);
        assert!(map.contains_key(&2));
    }

    #[test]
    fn test_get_mut_and_remove() {
        let mut map: Map<&str, i32> = Map::new();
        map.insert("a", 1);
        *map.get_mut(&"a").unwrap() += 41;
        assert_eq!(map.get(&"a"), Some(&42));

        assert_eq!(map.remove_entry(&"a"), Some(("a", 42)));
        assert_eq!(map.remove(&"a"), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_entry_api() {
        let mut map: Map<char, usize> = Map::new();
        for c in "mississippi".chars() {
            *map.entry(c).or_default() += 1;
        }
        assert_eq!(map.get(&'s'), Some(&4));
        assert_eq!(map.get(&'m'), Some(&1));

        map.entry('m').and_modify(|n| *n *= 10).or_insert(0);
        map.entry('z').and_modify(|n| *n *= 10).or_insert(7);
        assert_eq!(map.get(&'m'), Some(&10));
        assert_eq!(map.get(&'z'), Some(&7));

        assert_eq!(*map.entry('q').or_insert_with(|| 3), 3);
        assert_eq!(map.entry('q').key(), &'q');
    }

    #[test]
    fn test_occupied_and_vacant_entries() {
        let mut map: Map<u8, u8> = Map::new();
        map.insert(1, 10);

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.insert(11), 10);
                assert_eq!(entry.remove(), 11);
            }
            Entry::Vacant(_) => panic!("expected occupied"),
        }
        assert!(map.is_empty());

        match map.entry(2) {
            Entry::Vacant(entry) => assert_eq!(entry.into_key(), 2),
            Entry::Occupied(_) => panic!("expected vacant"),
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_iterators_and_drain() {
        let mut map: Map<u32, u32> = (0..10).map(|i| (i, i * i)).collect();
        let mut keys: Vec<u32> = map.keys().copied().collect();
        keys.sort();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());
        assert_eq!(map.values().sum::<u32>(), 285);
        assert_eq!(map.iter().len(), 10);

        let mut drained: Vec<(u32, u32)> = map.drain().collect();
        drained.sort();
        assert_eq!(drained[3], (3, 9));
        assert!(map.is_empty());
    }

    #[test]
    fn test_growth_and_retain() {
        let mut map: Map<u64, u64> = Map::with_capacity(0);
        for i in 0..5000u64 {
            map.insert(i, i + 1);
        }
        assert_eq!(map.len(), 5000);
        map.retain(|k, _| k % 10 == 0);
        assert_eq!(map.len(), 500);
        map.shrink_to_fit();
        for i in (0..5000u64).step_by(10) {
            assert_eq!(map.get(&i), Some(&(i + 1)));
        }
        assert_eq!(map.get(&7), None);
    }

    #[test]
    fn test_reserve_clear_equality() {
        let mut a: Map<i32, i32> = Map::new();
        a.reserve(100);
        let capacity = a.capacity();
        a.extend((0..100).map(|i| (i, -i)));
        assert_eq!(a.capacity(), capacity);

        let b: Map<i32, i32> = a.clone().into_iter().collect();
        assert!(a == b);

        a.clear();
        assert!(a.is_empty());
        assert!(a != b);
    }
}
