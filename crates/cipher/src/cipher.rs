/// The keystream restarts from the key at every block boundary.
pub const BLOCK_SIZE: usize = 1024;

const MULTIPLIER: u32 = 214013;
const INCREMENT: u32 = 2531011;

/// Applies the keystream for `key` to `data`, returning the transformed bytes.
///
/// The transform is its own inverse for buffers of equal length, so the
/// same call both decrypts archive members and (in tests) encrypts them.
/// A key of `0` is not the identity: the keystream still runs.
///
/// ```
/// assert_eq!(lpk_cipher::transform(0, &[0x00, 0x00]), vec![0x26, 0xA2]);
/// ```
#[must_use]
pub fn transform(key: i64, data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    transform_in_place(key, &mut out);
    out
}

/// In-place variant of [`transform`].
pub fn transform_in_place(key: i64, data: &mut [u8]) {
    for block in data.chunks_mut(BLOCK_SIZE) {
        // Only the low 32 bits of the key ever influence bits 16..32 of the
        // recurrence, so truncating here is exact.
        let mut state = key as u32;
        for byte in block.iter_mut() {
            state = (INCREMENT.wrapping_add(MULTIPLIER.wrapping_mul(state)) >> 16) & 0xFFFF;
            *byte ^= (state & 0xFF) as u8;
        }
    }
}
