//! A bidirectional, position-aware cursor over a [`HashTable`].
//!
//! Unlike [`Iter`](crate::hash_table::Iter), a cursor can move in both
//! directions, jump by several positions, and report the logical index of
//! the value it points at. Values are visited in slot order.

use crate::hash_table::HashTable;
use crate::hash_table::Slot;

/// A cursor over the values of a [`HashTable`] and their multiplicities.
///
/// The cursor keeps two independent flags. `at_start` is set on creation and
/// whenever a backward step is refused at the first value; `at_end` is set
/// whenever a forward step is refused at the last value. The cursor keeps
/// pointing at a valid value in both cases, so a one-value table reports both
/// flags after a single refused step forward.
///
/// The typical forward walk mirrors a `for` loop that reads the current value
/// before stepping:
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use robin_hash::HashMultiSet;
///
/// let mut set: HashMultiSet<char> = HashMultiSet::new();
/// set.insert_many('a', 2).unwrap();
/// set.insert('b').unwrap();
///
/// let mut cursor = set.cursor();
/// let mut seen = Vec::new();
/// while !cursor.at_end() {
///     seen.push((*cursor.value().unwrap(), cursor.multiplicity()));
///     cursor.move_next();
/// }
/// seen.sort();
/// assert_eq!(seen, [('a', 2), ('b', 1)]);
/// # }
/// ```
#[derive(Debug)]
pub struct Cursor<'a, V> {
    table: &'a HashTable<V>,
    slot: usize,
    index: usize,
    first: usize,
    last: usize,
    start: bool,
    end: bool,
}

impl<V> Clone for Cursor<'_, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, V> Cursor<'a, V> {
    pub(crate) fn new(table: &'a HashTable<V>) -> Self {
        let first = table.first_filled().unwrap_or(0);
        let last = table.last_filled().unwrap_or(0);
        Self {
            table,
            slot: first,
            index: 0,
            first,
            last,
            start: true,
            end: table.is_empty(),
        }
    }

    /// Returns `true` if the cursor sits at the first value and has either
    /// just been created or refused a step backward. Always `true` for an
    /// empty table.
    pub fn at_start(&self) -> bool {
        self.table.is_empty() || self.start
    }

    /// Returns `true` if the cursor refused a step past the last value.
    /// Always `true` for an empty table.
    pub fn at_end(&self) -> bool {
        self.table.is_empty() || self.end
    }

    /// Moves the cursor to the first value.
    pub fn to_start(&mut self) {
        if !self.table.is_empty() {
            self.slot = self.first;
            self.index = 0;
            self.start = true;
            self.end = false;
        }
    }

    /// Moves the cursor to the last value.
    pub fn to_end(&mut self) {
        if !self.table.is_empty() {
            self.slot = self.last;
            self.index = self.table.len() - 1;
            self.start = false;
            self.end = true;
        }
    }

    /// Steps to the next value. Returns `false` and sets the end flag if the
    /// cursor already points at the last value.
    pub fn move_next(&mut self) -> bool {
        if self.end {
            return false;
        }
        if self.index + 1 == self.table.len() {
            self.end = true;
            return false;
        }

        self.start = false;
        self.index += 1;
        loop {
            self.slot += 1;
            if self.table.slot(self.slot).is_filled() {
                return true;
            }
        }
    }

    /// Steps to the previous value. Returns `false` and sets the start flag if
    /// the cursor already points at the first value.
    pub fn move_prev(&mut self) -> bool {
        if self.start {
            return false;
        }
        if self.index == 0 {
            self.start = true;
            return false;
        }

        self.end = false;
        self.index -= 1;
        loop {
            self.slot -= 1;
            if self.table.slot(self.slot).is_filled() {
                return true;
            }
        }
    }

    /// Moves forward by `steps` values.
    ///
    /// Returns `true` only if the cursor moved. A step count that would leave
    /// the range, or zero, leaves the cursor where it is.
    pub fn advance(&mut self, steps: usize) -> bool {
        if self.end {
            return false;
        }
        if self.index + 1 == self.table.len() {
            self.end = true;
            return false;
        }
        if steps == 0 || self.index + steps >= self.table.len() {
            return false;
        }

        for _ in 0..steps {
            self.move_next();
        }
        true
    }

    /// Moves backward by `steps` values.
    ///
    /// Returns `true` only if the cursor moved. A step count that would leave
    /// the range, or zero, leaves the cursor where it is.
    pub fn rewind(&mut self, steps: usize) -> bool {
        if self.start {
            return false;
        }
        if self.index == 0 {
            self.start = true;
            return false;
        }
        if steps == 0 || self.index < steps {
            return false;
        }

        for _ in 0..steps {
            self.move_prev();
        }
        true
    }

    /// Positions the cursor at logical index `index`, moving from the current
    /// position in whichever direction reaches it.
    ///
    /// Returns `false` if `index` is out of range or the move was refused.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.table.len() {
            return false;
        }

        if self.index > index {
            self.rewind(self.index - index)
        } else if self.index < index {
            self.advance(index - self.index)
        } else {
            true
        }
    }

    /// Returns the value under the cursor, or `None` for an empty table.
    pub fn value(&self) -> Option<&'a V> {
        if self.table.is_empty() {
            return None;
        }
        match self.table.slot(self.slot) {
            Slot::Filled(bucket) => Some(&bucket.value),
            _ => None,
        }
    }

    /// Returns the multiplicity of the value under the cursor, or 0 for an
    /// empty table.
    pub fn multiplicity(&self) -> usize {
        if self.table.is_empty() {
            return 0;
        }
        self.table
            .slot(self.slot)
            .bucket()
            .map_or(0, |bucket| bucket.multiplicity)
    }

    /// Returns the logical position of the cursor among the stored values.
    pub fn index(&self) -> usize {
        self.index
    }
}
