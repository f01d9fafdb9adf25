//! Document number generation.

use chrono::Utc;
use uuid::Uuid;

/// Generate a document number like `INV-482913`.
///
/// The suffix is the tail of the current millisecond timestamp followed by
/// a random number, so two numbers drawn in the same millisecond still
/// differ with high probability.
pub fn generate_number(prefix: &str, length: usize) -> String {
    let millis = Utc::now().timestamp_millis().unsigned_abs();
    let random = Uuid::new_v4().as_u128() % 1_000_000;
    number_from_digits(prefix, length, &format!("{}{}", millis, random))
}

/// Build a number from the last `length` characters of `digits`, zero padded.
pub fn number_from_digits(prefix: &str, length: usize, digits: &str) -> String {
    let length = length.max(1);
    let tail: String = {
        let chars: Vec<char> = digits.chars().collect();
        chars[chars.len().saturating_sub(length)..].iter().collect()
    };
    let suffix = format!("{:0>width$}", tail, width = length);

    if prefix.is_empty() {
        suffix
    } else {
        format!("{}-{}", prefix, suffix)
    }
}
