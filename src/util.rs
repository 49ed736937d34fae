use crate::{MAX_DISTANCE, MAX_LENGTH, MIN_MATCH};

#[cfg(feature = "alloc")]
extern crate alloc;

/// A single decoded unit of the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// One byte copied verbatim
    Literal(u8),
    /// Copy `length` bytes starting `distance` bytes before the output end
    Match { distance: usize, length: usize },
}
impl Token {
    /// Number of payload bytes this token occupies in a block
    pub fn encoded_len(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { .. } => 2,
        }
    }

    /// Number of output bytes this token produces
    pub fn output_len(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => *length,
        }
    }
}

/// Pack a match into its two byte payload
pub fn encode_match(distance: usize, length: usize) -> [u8; 2] {
    debug_assert!((1..=MAX_DISTANCE).contains(&distance));
    debug_assert!((MIN_MATCH..=MAX_LENGTH).contains(&length));

    let d = distance - 1;
    [(((length - MIN_MATCH) << 4) | (d >> 8)) as u8, d as u8]
}

/// Unpack a two byte match payload into `(distance, length)`
pub fn decode_match(b0: u8, b1: u8) -> (usize, usize) {
    let distance = ((b0 & 0x0f) as usize) * 256 + b1 as usize + 1;
    let length = (b0 >> 4) as usize + MIN_MATCH;
    (distance, length)
}

/// Internal abstraction for types of outputs (slice vs Vec)
///
/// Note for all functions: we guarantee writing all the way up to the limit
pub(crate) trait OutputSink<ErrTy> {
    /// Add one literal byte to the output
    fn put_lit(&mut self, lit: u8) -> Result<(), ErrTy>;
    /// Add a backreference to the output
    ///
    /// A `distance` of 1 means the byte just written.
    ///
    /// Copy `len` bytes, which as usual for LZ77 may exceed `distance`.
    fn put_backref(&mut self, distance: usize, len: usize) -> Result<(), ErrTy>;
}

pub(crate) struct BufOutput<'a> {
    pub pos: usize,
    pub buf: &'a mut [u8],
}
impl<'a> From<&'a mut [u8]> for BufOutput<'a> {
    fn from(buf: &'a mut [u8]) -> Self {
        Self { pos: 0, buf }
    }
}

#[cfg(feature = "alloc")]
pub(crate) struct VecOutput {
    pub vec: alloc::vec::Vec<u8>,
}
#[cfg(feature = "alloc")]
impl From<alloc::vec::Vec<u8>> for VecOutput {
    fn from(vec: alloc::vec::Vec<u8>) -> Self {
        Self { vec }
    }
}
