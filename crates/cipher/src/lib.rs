//! Key derivation primitive and keystream cipher for LPK archive members.
//!
//! Every encrypted member of an LPK archive is XOR-ed against a keystream
//! generated from a single signed 64-bit key. Keys are derived by hashing an
//! identifying string with [`hash`], and the keystream is applied with
//! [`transform`]:
//!
//! ```
//! use lpk_cipher::{hash, transform};
//!
//! let key = hash("package-id" /* + target member name */);
//! let ciphertext = transform(key, b"{\"Version\": 3}");
//! assert_eq!(transform(key, &ciphertext), b"{\"Version\": 3}");
//! ```
//!
//! Both functions must stay bit-for-bit compatible with archives that are
//! already in circulation; there is no versioning of either algorithm.

mod cipher;
mod hash;

pub use crate::cipher::{BLOCK_SIZE, transform, transform_in_place};
pub use crate::hash::hash;
