//! Insertion-ordered hash table.
//!
//! Bucket counts are primes; the table grows when it reaches its maximum load factor
//! and shrinks again once enough entries are removed. Every entry caches its hash
//! code, so resizing never hashes a key twice.

mod capacity;
mod table;

pub use capacity::{MIN_CAPACITY, next_prime};
pub use table::{DEFAULT_MAX_LOAD_FACTOR, DEFAULT_MIN_LOAD_FACTOR, HashTable};
