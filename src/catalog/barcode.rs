use rand::Rng;

const BARCODE_MIN: u64 = 100_000_000_000;
const BARCODE_MAX: u64 = 1_000_000_000_000;

/// Draws a random 12-digit numeric barcode. Uniqueness is checked by the
/// caller against the store.
pub fn generate_barcode() -> String {
    rand::thread_rng()
        .gen_range(BARCODE_MIN..BARCODE_MAX)
        .to_string()
}
