/// Hashes a string into a cipher key.
///
/// Folds the string's Unicode scalar values left-to-right as
/// `acc = acc * 31 + codepoint` in wrapping 32-bit arithmetic, then widens
/// the 32-bit result to 64 bits with sign extension (a set bit 31 yields a
/// negative key).
///
/// ```
/// assert_eq!(lpk_cipher::hash("test"), 3556498);
/// assert_eq!(lpk_cipher::hash(""), 0);
/// ```
#[must_use]
pub fn hash(s: &str) -> i64 {
    let folded = s.chars().fold(0u32, |acc, c| acc.wrapping_mul(31).wrapping_add(c as u32));
    i64::from(folded as i32)
}
