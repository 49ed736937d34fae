use core::iter::FusedIterator;

use crate::util::*;
use crate::BLOCK_TOKENS;

#[cfg(feature = "alloc")]
extern crate alloc;

/// Expansion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ExpandError {
    /// A control bit announced a match but fewer than 2 bytes were left
    #[error("input was truncated inside a match token")]
    TruncatedMatch,
    /// A control bit announced a literal but no byte was left
    #[error("input was truncated before a literal")]
    TruncatedLiteral,
    /// A match reaches back before the start of the output
    #[error("invalid backreference")]
    InvalidBackreference,
    /// The output buffer was too small to hold all the output.
    ///
    /// Output is written all the way up to the limit.
    #[error("output buffer was insufficient")]
    OutputTooSmall,
}

/// Parser over the tokens of a compressed stream
///
/// Yields each token in order. After the first error it yields nothing more.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    inp: &'a [u8],
    pos: usize,
    ctrl: u8,
    bit: usize,
}
impl<'a> Tokens<'a> {
    pub fn new(inp: &'a [u8]) -> Self {
        Self {
            inp,
            pos: 0,
            ctrl: 0,
            // first call loads a control byte
            bit: BLOCK_TOKENS - 1,
        }
    }

    /// Offset of the next unread input byte
    pub fn position(&self) -> usize {
        self.pos
    }

    fn next_token(&mut self) -> Result<Token, ExpandError> {
        self.bit += 1;
        if self.bit >= BLOCK_TOKENS {
            self.ctrl = self.inp[self.pos];
            self.pos += 1;
            self.bit = 0;
        }

        if self.ctrl & (0x80 >> self.bit) != 0 {
            let lit = *self
                .inp
                .get(self.pos)
                .ok_or(ExpandError::TruncatedLiteral)?;
            self.pos += 1;
            Ok(Token::Literal(lit))
        } else {
            match self.inp.get(self.pos..self.pos + 2) {
                Some(&[b0, b1]) => {
                    self.pos += 2;
                    let (distance, length) = decode_match(b0, b1);
                    Ok(Token::Match { distance, length })
                }
                _ => Err(ExpandError::TruncatedMatch),
            }
        }
    }
}
impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token, ExpandError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.inp.len() {
            return None;
        }

        let ret = self.next_token();
        if let Err(e) = ret {
            log::warn!("corrupt stream at offset {}: {}", self.pos, e);
            self.pos = self.inp.len();
        }
        Some(ret)
    }
}
impl<'a> FusedIterator for Tokens<'a> {}

impl<'a> OutputSink<ExpandError> for BufOutput<'a> {
    fn put_lit(&mut self, lit: u8) -> Result<(), ExpandError> {
        if self.pos < self.buf.len() {
            self.buf[self.pos] = lit;
            self.pos += 1;
            Ok(())
        } else {
            Err(ExpandError::OutputTooSmall)
        }
    }

    fn put_backref(&mut self, distance: usize, mut len: usize) -> Result<(), ExpandError> {
        if distance > self.pos {
            return Err(ExpandError::InvalidBackreference);
        }

        let mut did_overflow = false;
        if self.pos + len > self.buf.len() {
            did_overflow = true;
            len = self.buf.len() - self.pos;
        }

        for i in 0..len {
            self.buf[self.pos + i] = self.buf[self.pos - distance + i];
        }
        self.pos += len;

        if did_overflow {
            Err(ExpandError::OutputTooSmall)
        } else {
            Ok(())
        }
    }
}

#[cfg(feature = "alloc")]
impl OutputSink<ExpandError> for VecOutput {
    fn put_lit(&mut self, lit: u8) -> Result<(), ExpandError> {
        self.vec.push(lit);
        Ok(())
    }

    fn put_backref(&mut self, distance: usize, len: usize) -> Result<(), ExpandError> {
        if distance > self.vec.len() {
            return Err(ExpandError::InvalidBackreference);
        }

        // byte at a time, the source may overlap what is being written
        self.vec.reserve(len);
        for _ in 0..len {
            let b = self.vec[self.vec.len() - distance];
            self.vec.push(b);
        }

        Ok(())
    }
}

/// Returns the number of tokens decoded
fn expand_impl(
    inp: &[u8],
    outp: &mut impl OutputSink<ExpandError>,
) -> Result<usize, ExpandError> {
    let mut ntokens = 0;
    for token in Tokens::new(inp) {
        match token? {
            Token::Literal(lit) => outp.put_lit(lit)?,
            Token::Match { distance, length } => outp.put_backref(distance, length)?,
        }
        ntokens += 1;
    }
    Ok(ntokens)
}

/// Expand the input into a preallocated buffer
///
/// Returns the expanded size on success, or an error otherwise
pub fn expand_to_buf(inp: &[u8], outp: &mut [u8]) -> Result<usize, ExpandError> {
    let mut outp: BufOutput = outp.into();
    let ntokens = expand_impl(inp, &mut outp)?;
    log::debug!(
        "expanded {} bytes into {} ({} tokens)",
        inp.len(),
        outp.pos,
        ntokens
    );
    Ok(outp.pos)
}

#[cfg(feature = "alloc")]
/// Expand the input into a [Vec](alloc::vec::Vec)
///
/// Returns the result on success, or an error otherwise
pub fn expand_to_vec(
    inp: &[u8],
    capacity_hint: Option<usize>,
) -> Result<alloc::vec::Vec<u8>, ExpandError> {
    let mut ret: VecOutput = if let Some(capacity_hint) = capacity_hint {
        alloc::vec::Vec::with_capacity(capacity_hint)
    } else {
        alloc::vec::Vec::new()
    }
    .into();
    let ntokens = expand_impl(inp, &mut ret)?;
    log::debug!(
        "expanded {} bytes into {} ({} tokens)",
        inp.len(),
        ret.vec.len(),
        ntokens
    );
    Ok(ret.vec)
}

#[cfg(feature = "alloc")]
/// Expand a stream produced by [compress](crate::compress)
pub fn expand(inp: &[u8]) -> Result<alloc::vec::Vec<u8>, ExpandError> {
    expand_to_vec(inp, None)
}
