const UNITS: [(u64, char); 6] = [
    (1 << 60, 'E'),
    (1 << 50, 'P'),
    (1 << 40, 'T'),
    (1 << 30, 'G'),
    (1 << 20, 'M'),
    (1 << 10, 'K'),
];

/// Formats a byte count with a binary unit suffix: `512`, `1.5K`, `3M`.
///
/// Counts below 1024 are printed as plain integers. `decimals` is clamped to 15.
pub fn fbytes(nbytes: u64, decimals: usize) -> String {
    let decimals = decimals.min(15);
    match UNITS.iter().find(|(size, _)| nbytes >= *size) {
        Some(&(size, unit)) => format!("{:.*}{unit}", decimals, nbytes as f64 / size as f64),
        None => nbytes.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fbytes() {
        assert_eq!(fbytes(0, 2), "0");
        assert_eq!(fbytes(1023, 2), "1023");
        assert_eq!(fbytes(1024, 0), "1K");
        assert_eq!(fbytes(1536, 1), "1.5K");
        assert_eq!(fbytes(5 * 1024 * 1024, 2), "5.00M");
        assert_eq!(fbytes(3 << 40, 0), "3T");
        assert_eq!(fbytes(u64::MAX, 1), "16.0E");
    }

    #[test]
    fn test_fbytes_clamps_decimals() {
        assert_eq!(fbytes(2048, 40), format!("{:.15}K", 2.0));
    }
}
