#![no_std]

//! LZSS with a 4 KiB look-back window.
//!
//! The stream is a plain sequence of blocks. Each block is one control byte
//! followed by up to eight tokens; control bit 7 describes the first token.
//! A set bit is a literal byte, a clear bit is a two byte match:
//!
//! ```text
//! byte 0: (length - 3) << 4 | (distance - 1) >> 8
//! byte 1: (distance - 1) & 0xff
//! ```

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
mod compress;
mod expand;
#[cfg(feature = "alloc")]
pub mod matcher;
mod util;

#[cfg(all(test, feature = "alloc"))]
mod validation;

#[cfg(feature = "alloc")]
pub use compress::{
    compress, compress_to_buf, compress_to_vec, max_compressed_len, CompressError,
};
#[cfg(feature = "alloc")]
pub use expand::{expand, expand_to_vec};
pub use expand::{expand_to_buf, ExpandError, Tokens};
pub use util::{decode_match, encode_match, Token};

/// Shortest match worth a token
pub const MIN_MATCH: usize = 3;
/// Longest match a token can describe
pub const MAX_LENGTH: usize = 15 + MIN_MATCH;
/// Furthest back a match may reach
pub const MAX_DISTANCE: usize = 4095 + 1;
/// Tokens covered by one control byte
pub const BLOCK_TOKENS: usize = 8;
/// Control byte plus eight match tokens
pub const MAX_BLOCK_LEN: usize = 1 + 2 * BLOCK_TOKENS;
