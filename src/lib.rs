#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod capacity;

pub mod cursor;

pub mod error;

/// A key-value map on top of the Robin Hood `HashTable`.
pub mod hash_map;

/// A counting multiset with multiset algebra.
pub mod hash_multiset;

/// A hash set on top of the Robin Hood `HashTable`.
pub mod hash_set;

pub mod hash_table;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is given explicitly.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is given explicitly.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder when neither `std` nor `foldhash` is enabled. It does
        /// not implement `BuildHasher`, so a hasher must be passed explicitly.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}

pub use error::Error;
pub use error::ErrorKind;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_multiset::HashMultiSet;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
