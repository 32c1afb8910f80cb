//! Prime bucket counts.

use pcl_error::{Error, ErrorCode, Result};

/// Smallest bucket count a table ever has.
pub const MIN_CAPACITY: usize = 17;

const PRIMES: [usize; 28] = [
    17, 31, 53, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317, 196613, 393241,
    786433, 1572869, 3145739, 6291469, 12582917, 25165843, 50331653, 100663319, 201326611,
    402653189, 805306457, 1610612741,
];

/// Returns the first prime bucket count strictly greater than `requested`.
///
/// Fails with `ERANGE` when `requested` is beyond the largest supported table.
pub fn next_prime(requested: usize) -> Result<usize> {
    PRIMES
        .iter()
        .copied()
        .find(|&p| p > requested)
        .ok_or_else(|| {
            Error::with_msg(
                ErrorCode::Range,
                format!("requested capacity {requested} exceeds the maximum table size"),
            )
        })
}
