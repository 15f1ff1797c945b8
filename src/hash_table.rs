//! The Robin Hood open-addressing table shared by every container in this
//! crate.
//!
//! Values carry a multiplicity and the distance from their home slot. A new
//! value takes the slot of any resident that sits closer to its own home,
//! which keeps probe distances short and even.

use alloc::alloc::handle_alloc_error;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;
use core::marker::PhantomData;

use crate::capacity;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::error::ErrorKind;

/// Load factor used by the constructors that do not take one explicitly.
pub const DEFAULT_LOAD: f64 = 0.6;

/// A live value together with its bookkeeping.
#[derive(Clone, Debug)]
pub(crate) struct Bucket<V> {
    pub(crate) value: V,
    /// Number of logical occurrences; always `>= 1` while the slot is filled.
    pub(crate) multiplicity: usize,
    /// Distance from the slot the value hashes to.
    pub(crate) dist: usize,
}

/// One position of the entry store.
///
/// `Deleted` keeps probe chains intact after a removal: lookups step over it,
/// insertions may reuse it.
#[derive(Clone, Debug)]
pub(crate) enum Slot<V> {
    Empty,
    Filled(Bucket<V>),
    Deleted,
}

impl<V> Slot<V> {
    #[inline(always)]
    pub(crate) fn bucket(&self) -> Option<&Bucket<V>> {
        match self {
            Slot::Filled(bucket) => Some(bucket),
            _ => None,
        }
    }

    #[inline(always)]
    pub(crate) fn is_filled(&self) -> bool {
        matches!(self, Slot::Filled(_))
    }
}

fn allocate_slots<V>(slots: usize) -> Result<Vec<Slot<V>>, Error> {
    let mut store = Vec::new();
    if store.try_reserve_exact(slots).is_err() {
        tracing::warn!(slots, "failed to allocate hash table store");
        return Err(
            Error::new(ErrorKind::AllocationFailure, "could not allocate the slot store")
                .with_context("slots", slots),
        );
    }
    store.resize_with(slots, || Slot::Empty);
    Ok(store)
}

#[cold]
fn allocation_failed<V>(slots: usize) -> ! {
    match Layout::array::<Slot<V>>(slots) {
        Ok(layout) => handle_alloc_error(layout),
        Err(_) => panic!("capacity overflow"),
    }
}

/// Robin Hood placement of a value that is known to be absent.
///
/// Returns the index the incoming value ended up in. The caller guarantees at
/// least one slot is not filled.
fn place<V>(slots: &mut [Slot<V>], hash: u64, value: V, multiplicity: usize) -> usize {
    let capacity = slots.len();
    let mut original_pos = (hash % capacity as u64) as usize;
    let mut probe = original_pos;
    let mut carried = Bucket {
        value,
        multiplicity,
        dist: 0,
    };
    let mut landed = None;

    loop {
        let index = probe % capacity;
        let displacement = probe - original_pos;
        match &mut slots[index] {
            Slot::Filled(resident) => {
                if resident.dist < displacement {
                    carried.dist = displacement;
                    core::mem::swap(resident, &mut carried);
                    // The evicted resident continues along its own chain.
                    original_pos = probe - carried.dist;
                    landed.get_or_insert(index);
                }
            }
            vacant => {
                carried.dist = displacement;
                *vacant = Slot::Filled(carried);
                return landed.unwrap_or(index);
            }
        }
        probe += 1;
    }
}

/// An open-addressing hash table using Robin Hood linear probing.
///
/// `HashTable<V>` stores values of type `V`, each with a multiplicity counter.
/// Like a raw table, it does not hash values itself: every operation takes the
/// hash and an equality predicate, and operations that may rehash also take a
/// hasher to recompute hashes of stored values.
///
/// The slot count is always drawn from a table of primes. Removal leaves a
/// tombstone behind; tombstones are only cleared by a resize, so heavy
/// insert/remove churn at a fixed size lengthens probe chains.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use robin_hash::hash_table::Entry;
/// # use robin_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn hash_str(s: &str) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     s.hash(&mut hasher);
/// #     hasher.finish()
/// # }
/// #
/// let mut table: HashTable<String> = HashTable::with_capacity(16);
///
/// match table.entry(hash_str("apple"), |s| s == "apple", |s| hash_str(s)) {
///     Entry::Vacant(entry) => {
///         entry.insert_with_multiplicity("apple".to_string(), 3);
///     }
///     Entry::Occupied(mut entry) => {
///         let m = entry.multiplicity();
///         entry.set_multiplicity(m + 3);
///     }
/// }
///
/// assert_eq!(table.find_multiplicity(hash_str("apple"), |s| s == "apple"), 3);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Slot<V>>,
    populated: usize,
    load: f64,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.slots.len())
            .field("load", &self.load)
            .field(
                "slots",
                &self
                    .slots
                    .chunks(16)
                    .map(|w| {
                        w.iter()
                            .map(|slot| match slot {
                                Slot::Empty => "..".to_string(),
                                Slot::Deleted => "xx".to_string(),
                                Slot::Filled(b) => format!("{:02}", b.dist),
                            })
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<V> HashTable<V> {
    /// Creates a new hash table able to hold `capacity` distinct values before
    /// growing, using [`DEFAULT_LOAD`].
    ///
    /// A capacity of zero is treated as one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert!(table.capacity() as f64 * table.load() >= 100.0);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = capacity::slots_for(capacity.max(1), DEFAULT_LOAD);
        let store = allocate_slots(slots).unwrap_or_else(|_| allocation_failed::<V>(slots));
        Self {
            slots: store,
            populated: 0,
            load: DEFAULT_LOAD,
        }
    }

    /// Creates a new hash table able to hold `capacity` distinct values before
    /// growing once more than `load` of its slots are in use.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidArgument`] if `capacity` is zero, `load` is not
    ///   strictly between 0 and 1, or the slot count would overflow.
    /// - [`ErrorKind::AllocationFailure`] if the store cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::error::ErrorKind;
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u32> = HashTable::try_with_capacity_and_load(10, 0.5).unwrap();
    /// assert_eq!(table.capacity(), 23);
    ///
    /// let err = HashTable::<u32>::try_with_capacity_and_load(10, 1.0).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// ```
    pub fn try_with_capacity_and_load(capacity: usize, load: f64) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "capacity must be greater than zero",
            ));
        }
        if !(load > 0.0 && load < 1.0) {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "load factor must lie strictly between 0 and 1",
            )
            .with_context("load", load));
        }
        if capacity::overflows(capacity, load) {
            return Err(
                Error::new(ErrorKind::InvalidArgument, "capacity overflows the slot count")
                    .with_context("capacity", capacity)
                    .with_context("load", load),
            );
        }

        Ok(Self {
            slots: allocate_slots(capacity::slots_for(capacity, load))?,
            populated: 0,
            load,
        })
    }

    /// Returns the number of distinct values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots in the table.
    ///
    /// The table grows before a new value would push `len()` past
    /// `capacity() * load()`.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the load factor the table was created with.
    pub fn load(&self) -> f64 {
        self.load
    }

    /// Returns `true` if inserting another distinct value will grow the table.
    pub fn is_full(&self) -> bool {
        (self.populated + 1) as f64 > self.slots.len() as f64 * self.load
    }

    /// Removes every value, keeping the slot count.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.populated = 0;
    }

    #[inline(always)]
    fn home(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    /// Walks the probe chain for `hash`, stopping at the first empty slot.
    /// Tombstones are stepped over. At most one full lap is made.
    fn find_index(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }

        let capacity = self.slots.len();
        let home = self.home(hash);
        for offset in 0..capacity {
            let index = (home + offset) % capacity;
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Deleted => {}
                Slot::Filled(bucket) => {
                    if eq(&bucket.value) {
                        return Some(index);
                    }
                }
            }
        }

        None
    }

    #[inline(always)]
    fn filled(&self, index: usize) -> &Bucket<V> {
        match &self.slots[index] {
            Slot::Filled(bucket) => bucket,
            _ => unreachable!("slot {index} is not filled"),
        }
    }

    #[inline(always)]
    fn filled_mut(&mut self, index: usize) -> &mut Bucket<V> {
        match &mut self.slots[index] {
            Slot::Filled(bucket) => bucket,
            _ => unreachable!("slot {index} is not filled"),
        }
    }

    /// Finds a value matching the equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use robin_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table
    ///     .entry(hash_u64(7), |&n| n == 7, |&n| hash_u64(n))
    ///     .or_insert(7u64);
    ///
    /// assert_eq!(table.find(hash_u64(7), |&n| n == 7), Some(&7));
    /// assert_eq!(table.find(hash_u64(8), |&n| n == 8), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.find_index(hash, eq)
            .map(|index| &self.filled(index).value)
    }

    /// Finds a mutable reference to a value matching the equality predicate.
    ///
    /// The caller must not change the value's hash or equality.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.find_index(hash, eq)?;
        Some(&mut self.filled_mut(index).value)
    }

    /// Returns the multiplicity of the matching value, or 0 if it is absent.
    pub fn find_multiplicity(&self, hash: u64, eq: impl Fn(&V) -> bool) -> usize {
        self.find_index(hash, eq)
            .map_or(0, |index| self.filled(index).multiplicity)
    }

    /// Returns an [`OccupiedEntry`] for the matching value, if present.
    ///
    /// Unlike [`entry`](HashTable::entry), this never grows the table.
    pub fn find_entry(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
    ) -> Option<OccupiedEntry<'_, V>> {
        let index = self.find_index(hash, eq)?;
        Some(OccupiedEntry { table: self, index })
    }

    /// Removes the matching value regardless of its multiplicity, leaving a
    /// tombstone in its slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use robin_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table
    ///     .entry(hash_u64(42), |&n| n == 42, |&n| hash_u64(n))
    ///     .or_insert(42u64);
    ///
    /// assert_eq!(table.remove(hash_u64(42), |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(hash_u64(99), |&n| n == 99), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        self.find_entry(hash, eq).map(|entry| entry.remove().0)
    }

    fn tombstone(&mut self, index: usize) -> Bucket<V> {
        match core::mem::replace(&mut self.slots[index], Slot::Deleted) {
            Slot::Filled(bucket) => {
                self.populated -= 1;
                tracing::trace!(index, populated = self.populated, "tombstoned slot");
                bucket
            }
            _ => unreachable!("slot {index} is not filled"),
        }
    }

    /// Gets the entry for the given hash and equality predicate, growing the
    /// table first if the value is absent and the table is full.
    ///
    /// `hasher` recomputes the hash of stored values when the table grows.
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`] if growing the table fails to
    /// allocate. Use [`try_entry`](HashTable::try_entry) to observe the error.
    pub fn entry(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Entry<'_, V> {
        if let Some(index) = self.find_index(hash, &eq) {
            return Entry::Occupied(OccupiedEntry { table: self, index });
        }
        if self.is_full() {
            let slots = self.grown_slots();
            if self.rehash(slots, hasher).is_err() {
                allocation_failed::<V>(slots);
            }
        }
        Entry::Vacant(VacantEntry { table: self, hash })
    }

    /// Gets the entry for the given hash and equality predicate, growing the
    /// table first if the value is absent and the table is full.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::AllocationFailure`] if growing fails. The table is
    /// left exactly as it was.
    pub fn try_entry(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Result<Entry<'_, V>, Error> {
        if let Some(index) = self.find_index(hash, &eq) {
            return Ok(Entry::Occupied(OccupiedEntry { table: self, index }));
        }
        if self.is_full() {
            self.rehash(self.grown_slots(), hasher)?;
        }
        Ok(Entry::Vacant(VacantEntry { table: self, hash }))
    }

    #[inline]
    fn grown_slots(&self) -> usize {
        let wanted = (self.slots.len() + 1).max(self.populated + 1);
        capacity::slots_for(wanted, self.load)
    }

    /// Resizes the table so it can hold `capacity` distinct values under its
    /// load factor. Shrinking is allowed as long as the live values still fit.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidArgument`] if the slot count would overflow.
    /// - [`ErrorKind::Invalid`] if the planned size cannot hold the current
    ///   values under the load factor.
    /// - [`ErrorKind::AllocationFailure`] if the new store cannot be
    ///   allocated.
    ///
    /// On error the table is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use robin_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(4);
    /// for n in 0..4u64 {
    ///     table.entry(hash_u64(n), |&v| v == n, |&v| hash_u64(v)).or_insert(n);
    /// }
    ///
    /// table.resize(1000, |&v| hash_u64(v)).unwrap();
    /// assert!(table.capacity() >= 1000);
    /// assert_eq!(table.find(hash_u64(3), |&v| v == 3), Some(&3));
    ///
    /// assert!(table.resize(1, |&v| hash_u64(v)).is_err());
    /// ```
    pub fn resize(&mut self, capacity: usize, hasher: impl Fn(&V) -> u64) -> Result<(), Error> {
        if capacity::overflows(capacity, self.load) {
            return Err(
                Error::new(ErrorKind::InvalidArgument, "capacity overflows the slot count")
                    .with_context("capacity", capacity),
            );
        }

        let slots = capacity::slots_for(capacity, self.load);
        if (slots as f64) * self.load < self.populated as f64 {
            tracing::warn!(
                requested = capacity,
                slots,
                populated = self.populated,
                "refusing to shrink below the load factor"
            );
            return Err(
                Error::new(ErrorKind::Invalid, "live values do not fit the requested size")
                    .with_context("slots", slots)
                    .with_context("count", self.populated),
            );
        }
        if slots == self.slots.len() {
            return Ok(());
        }

        self.rehash(slots, hasher)
    }

    /// Reserves room for at least `additional` more distinct values.
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`] if allocation fails.
    pub fn reserve(&mut self, additional: usize, hasher: impl Fn(&V) -> u64) {
        let wanted = self.populated.saturating_add(additional);
        let slots = capacity::slots_for(wanted, self.load);
        if slots > self.slots.len() && self.rehash(slots, hasher).is_err() {
            allocation_failed::<V>(slots);
        }
    }

    /// Shrinks the table to the smallest planned size that holds the current
    /// values. Also clears out every tombstone.
    pub fn shrink_to_fit(&mut self, hasher: impl Fn(&V) -> u64) {
        let slots = capacity::slots_for(self.populated.max(1), self.load);
        if slots < self.slots.len() && self.rehash(slots, hasher).is_err() {
            allocation_failed::<V>(slots);
        }
    }

    /// Moves every live bucket into a freshly allocated store of `slots`
    /// slots. The old store is only released once the new one is allocated.
    ///
    /// Every hash is computed before anything moves, so a panicking `hasher`
    /// leaves the table as it was.
    fn rehash(&mut self, slots: usize, hasher: impl Fn(&V) -> u64) -> Result<(), Error> {
        debug_assert!(slots as f64 * self.load >= self.populated as f64);

        let store = allocate_slots(slots)?;
        let mut hashes = Vec::new();
        if hashes.try_reserve_exact(self.populated).is_err() {
            tracing::warn!(populated = self.populated, "failed to allocate rehash buffer");
            return Err(
                Error::new(ErrorKind::AllocationFailure, "failed to allocate rehash buffer")
                    .with_context("count", self.populated),
            );
        }
        hashes.extend(self.slots.iter().filter_map(|slot| match slot {
            Slot::Filled(bucket) => Some(hasher(&bucket.value)),
            _ => None,
        }));

        let old_slots = self.slots.len();
        let tombstones = self
            .slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Deleted))
            .count();
        let mut moved = 0usize;

        let old = core::mem::replace(&mut self.slots, store);
        let buckets = old.into_iter().filter_map(|slot| match slot {
            Slot::Filled(bucket) => Some(bucket),
            _ => None,
        });
        for (bucket, hash) in buckets.zip(hashes) {
            place(&mut self.slots, hash, bucket.value, bucket.multiplicity);
            moved += 1;
        }
        debug_assert_eq!(moved, self.populated);

        tracing::debug!(
            old_slots,
            new_slots = slots,
            populated = self.populated,
            tombstones,
            "rehashed table"
        );
        Ok(())
    }

    /// Returns an iterator over the values and their multiplicities, in slot
    /// order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns a bidirectional cursor positioned at the first value.
    pub fn cursor(&self) -> Cursor<'_, V> {
        Cursor::new(self)
    }

    /// Removes every value, returning them with their multiplicities.
    ///
    /// The slot count is kept. Values not consumed by the iterator are dropped
    /// along with it.
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`] if the replacement store cannot
    /// be allocated.
    pub fn drain(&mut self) -> Drain<'_, V> {
        let slots = self.slots.len();
        let fresh = allocate_slots(slots).unwrap_or_else(|_| allocation_failed::<V>(slots));
        let remaining = core::mem::replace(&mut self.populated, 0);
        Drain {
            inner: IntoIter {
                slots: core::mem::replace(&mut self.slots, fresh).into_iter(),
                remaining,
            },
            _table: PhantomData,
        }
    }

    /// Keeps only the values for which `f` returns `true`. The predicate also
    /// sees each value's multiplicity.
    pub fn retain(&mut self, mut f: impl FnMut(&V, usize) -> bool) {
        for index in 0..self.slots.len() {
            let keep = match &self.slots[index] {
                Slot::Filled(bucket) => f(&bucket.value, bucket.multiplicity),
                _ => true,
            };
            if !keep {
                self.tombstone(index);
            }
        }
    }

    pub(crate) fn slot(&self, index: usize) -> &Slot<V> {
        &self.slots[index]
    }

    pub(crate) fn first_filled(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_filled)
    }

    pub(crate) fn last_filled(&self) -> Option<usize> {
        self.slots.iter().rposition(Slot::is_filled)
    }

    /// Counts filled slots by their distance from their home slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut bins = alloc::vec![0usize; self.max_probe_distance() + 1];
        for bucket in self.slots.iter().filter_map(Slot::bucket) {
            bins[bucket.dist] += 1;
        }
        ProbeHistogram { bins }
    }

    /// Returns the largest distance any value sits from its home slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn max_probe_distance(&self) -> usize {
        self.slots
            .iter()
            .filter_map(Slot::bucket)
            .map(|b| b.dist)
            .max()
            .unwrap_or(0)
    }

    /// Returns the number of tombstones currently in the table.
    #[cfg(any(test, feature = "stats"))]
    pub fn tombstones(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Deleted))
            .count()
    }
}

/// Probe-distance histogram: `bins[d]` is the number of values sitting `d`
/// slots past their home slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct ProbeHistogram {
    /// Values per probe distance.
    pub bins: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Mean probe distance over all values.
    pub fn mean(&self) -> f64 {
        let total: usize = self.bins.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: usize = self.bins.iter().enumerate().map(|(d, n)| d * n).sum();
        weighted as f64 / total as f64
    }

    /// Pretty-print the histogram.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let total: usize = self.bins.iter().sum();
        println!("=== Probe Distance Histogram ===");
        for (dist, &n) in self.bins.iter().enumerate() {
            if n == 0 {
                continue;
            }
            println!(
                "{dist:>4}: {n:>8} ({:.2}%)",
                n as f64 / total.max(1) as f64 * 100.0
            );
        }
        println!("mean: {:.3}", self.mean());
    }
}

/// A view into a single entry of the table, which may be vacant or occupied.
///
/// Returned by [`HashTable::entry`] and [`HashTable::try_entry`].
pub enum Entry<'a, V> {
    /// The value is not present in the table.
    Vacant(VacantEntry<'a, V>),
    /// The value is present in the table.
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant, returning a mutable reference
    /// to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant, returning a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A view into a vacant entry. The table has already been grown if needed, so
/// insertion cannot fail.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts `value` with multiplicity 1.
    pub fn insert(self, value: V) -> &'a mut V {
        self.insert_with_multiplicity(value, 1)
    }

    /// Inserts `value` with the given multiplicity, which must be at least 1.
    ///
    /// Residents that sit closer to their home slot than the incoming value
    /// would are displaced further down the chain.
    pub fn insert_with_multiplicity(self, value: V, multiplicity: usize) -> &'a mut V {
        debug_assert!(multiplicity > 0);
        debug_assert!(self.table.populated < self.table.slots.len());

        let index = place(&mut self.table.slots, self.hash, value, multiplicity);
        self.table.populated += 1;
        &mut self.table.filled_mut(index).value
    }
}

/// A view into an occupied entry.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.filled(self.index).value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.filled_mut(self.index).value
    }

    /// Converts the entry into a mutable reference tied to the table borrow.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.filled_mut(self.index).value
    }

    /// Returns the multiplicity of the value.
    pub fn multiplicity(&self) -> usize {
        self.table.filled(self.index).multiplicity
    }

    /// Overwrites the multiplicity of the value. Must be at least 1; use
    /// [`remove`](OccupiedEntry::remove) to drop the value.
    pub fn set_multiplicity(&mut self, multiplicity: usize) {
        debug_assert!(multiplicity > 0);
        self.table.filled_mut(self.index).multiplicity = multiplicity;
    }

    /// Removes the value, returning it with its multiplicity. The slot becomes
    /// a tombstone.
    pub fn remove(self) -> (V, usize) {
        let bucket = self.table.tombstone(self.index);
        (bucket.value, bucket.multiplicity)
    }
}

/// An iterator over the values of a [`HashTable`] and their multiplicities.
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a V, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let bucket = self.slots.find_map(Slot::bucket)?;
        self.remaining -= 1;
        Some((&bucket.value, bucket.multiplicity))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let bucket = self.slots.rfind(|slot| slot.is_filled())?.bucket()?;
        self.remaining -= 1;
        Some((&bucket.value, bucket.multiplicity))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A consuming iterator over the values of a [`HashTable`] and their
/// multiplicities.
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (V, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (value, multiplicity) = self.slots.find_map(|slot| match slot {
            Slot::Filled(bucket) => Some((bucket.value, bucket.multiplicity)),
            _ => None,
        })?;
        self.remaining -= 1;
        Some((value, multiplicity))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = (V, usize);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_iter(),
            remaining: self.populated,
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = (&'a V, usize);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A draining iterator over the values of a [`HashTable`] and their
/// multiplicities.
pub struct Drain<'a, V> {
    inner: IntoIter<V>,
    _table: PhantomData<&'a mut HashTable<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = (V, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}
