use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use clap::Parser;
use robin_hash::HashTable;
use robin_hash::hash_table::Entry;

/// Fill a table to its load limit and report how far values sit from their
/// home slots.
#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    #[arg(short = 'l', long = "load", default_value_t = 0.6)]
    load: f64,

    /// Fraction of values to remove afterwards, to show tombstone build-up.
    #[arg(short = 'r', long = "remove_fraction", default_value_t = 0.0)]
    remove_fraction: f64,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() {
    let args = Args::parse();

    let mut table: HashTable<u64> =
        match HashTable::try_with_capacity_and_load(args.target_capacity, args.load) {
            Ok(table) => table,
            Err(err) => {
                eprintln!("cannot build table: {err}");
                std::process::exit(1);
            }
        };

    println!(
        "Requested capacity {} at load {:.2}: {} slots",
        args.target_capacity,
        table.load(),
        table.capacity()
    );

    let initial_slots = table.capacity();
    let mut value = 0u64;
    while !table.is_full() {
        let hash = hash_u64(value);
        match table.try_entry(hash, |&v| v == value, |&v| hash_u64(v)) {
            Ok(Entry::Vacant(entry)) => {
                entry.insert(value);
            }
            Ok(Entry::Occupied(_)) => unreachable!("value {value} inserted twice"),
            Err(err) => {
                eprintln!("insert failed: {err}");
                break;
            }
        }
        value += 1;
    }
    assert_eq!(table.capacity(), initial_slots);

    println!("Inserted {} values", table.len());
    println!(
        "Occupancy: {:.2}%",
        table.len() as f64 / table.capacity() as f64 * 100.0
    );
    table.probe_histogram().print();

    if args.remove_fraction > 0.0 {
        let to_remove = (table.len() as f64 * args.remove_fraction) as u64;
        for v in 0..to_remove {
            table.remove(hash_u64(v), |&x| x == v);
        }
        println!(
            "Removed {} values, {} tombstones left behind",
            to_remove,
            table.tombstones()
        );
        table.shrink_to_fit(|&v| hash_u64(v));
        println!("After shrink_to_fit: {} slots", table.capacity());
        table.probe_histogram().print();
    }

    println!("Max probe distance: {}", table.max_probe_distance());
}
