use core::convert::Infallible;

use alloc::vec::Vec;

use crate::matcher::MatchIndex;
use crate::util::*;
use crate::{BLOCK_TOKENS, MAX_BLOCK_LEN, MIN_MATCH};

/// Compression errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CompressError {
    /// The output buffer was too small to hold all the output.
    ///
    /// The output that has been written *is* valid, but has been truncated.
    #[error("output buffer was insufficient")]
    OutputTooSmall,
}

trait OutputHelper {
    type Error;
    fn put_buf(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
}
impl<'a> OutputHelper for BufOutput<'a> {
    type Error = CompressError;
    fn put_buf(&mut self, buf: &[u8]) -> Result<(), CompressError> {
        let mut len = buf.len();
        let mut did_overflow = false;
        if self.pos + len > self.buf.len() {
            did_overflow = true;
            len = self.buf.len() - self.pos;
        }

        self.buf[self.pos..self.pos + len].copy_from_slice(&buf[..len]);
        self.pos += len;

        if did_overflow {
            Err(CompressError::OutputTooSmall)
        } else {
            Ok(())
        }
    }
}

impl OutputHelper for VecOutput {
    type Error = Infallible;
    fn put_buf(&mut self, buf: &[u8]) -> Result<(), Infallible> {
        self.vec.extend_from_slice(buf);
        Ok(())
    }
}

/// Gathers tokens into blocks of one control byte and up to 8 tokens
struct BlockWriter<O> {
    out: O,
    blk: [u8; MAX_BLOCK_LEN],
    blk_len: usize,
    blk_n: usize,
    lits: usize,
    matches: usize,
}
impl<O: OutputHelper> BlockWriter<O> {
    fn new(out: O) -> Self {
        Self {
            out,
            blk: [0; MAX_BLOCK_LEN],
            blk_len: 1,
            blk_n: 0,
            lits: 0,
            matches: 0,
        }
    }

    fn token_done(&mut self) -> Result<(), O::Error> {
        self.blk_n += 1;
        if self.blk_n == BLOCK_TOKENS {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), O::Error> {
        if self.blk_n == 0 {
            return Ok(());
        }

        log::trace!(
            "flushing block: control {:#010b}, {} tokens, {} bytes",
            self.blk[0],
            self.blk_n,
            self.blk_len
        );
        let ret = self.out.put_buf(&self.blk[..self.blk_len]);
        self.blk[0] = 0;
        self.blk_len = 1;
        self.blk_n = 0;
        ret
    }

    /// Write out a trailing partial block
    fn finish(mut self) -> Result<O, O::Error> {
        self.flush()?;
        Ok(self.out)
    }
}

impl<O: OutputHelper> OutputSink<O::Error> for BlockWriter<O> {
    fn put_lit(&mut self, lit: u8) -> Result<(), O::Error> {
        self.blk[0] |= 0x80 >> self.blk_n;
        self.blk[self.blk_len] = lit;
        self.blk_len += 1;
        self.lits += 1;
        self.token_done()
    }

    fn put_backref(&mut self, distance: usize, len: usize) -> Result<(), O::Error> {
        // control bit stays clear
        let [b0, b1] = encode_match(distance, len);
        self.blk[self.blk_len] = b0;
        self.blk[self.blk_len + 1] = b1;
        self.blk_len += 2;
        self.matches += 1;
        self.token_done()
    }
}

fn compress_impl<O: OutputHelper>(
    inp: &[u8],
    outp: &mut BlockWriter<O>,
) -> Result<(), O::Error> {
    let index = MatchIndex::new(inp);

    let mut j = 0;
    while j < inp.len() {
        let m = index.best_match(j);
        if m.length >= MIN_MATCH {
            outp.put_backref(m.distance, m.length)?;
            j += m.length;
        } else {
            outp.put_lit(inp[j])?;
            j += 1;
        }
    }

    Ok(())
}

/// Upper bound on the compressed size of `len` input bytes
///
/// Reached when every byte becomes a literal.
pub fn max_compressed_len(len: usize) -> usize {
    len + len.div_ceil(BLOCK_TOKENS)
}

/// Compress the input into a [Vec](alloc::vec::Vec)
///
/// Never fails; an empty input gives an empty output.
pub fn compress(inp: &[u8]) -> Vec<u8> {
    compress_to_vec(inp)
}

/// Compress the input into a [Vec](alloc::vec::Vec)
///
/// Same as [compress].
pub fn compress_to_vec(inp: &[u8]) -> Vec<u8> {
    let ret: VecOutput = Vec::with_capacity(max_compressed_len(inp.len())).into();
    let mut ret = BlockWriter::new(ret);
    let res = compress_impl(inp, &mut ret);
    let (lits, matches) = (ret.lits, ret.matches);
    let ret = match res.and_then(|_| ret.finish()) {
        Ok(ret) => ret.vec,
        Err(e) => match e {},
    };

    log::debug!(
        "compressed {} bytes into {} ({} literals, {} matches)",
        inp.len(),
        ret.len(),
        lits,
        matches
    );
    ret
}

/// Compress the input into a preallocated buffer
///
/// Returns the compressed size on success, or an error otherwise. A buffer of
/// [max_compressed_len] bytes is always large enough.
pub fn compress_to_buf(inp: &[u8], outp: &mut [u8]) -> Result<usize, CompressError> {
    let outp: BufOutput = outp.into();
    let mut outp = BlockWriter::new(outp);
    compress_impl(inp, &mut outp)?;
    let (lits, matches) = (outp.lits, outp.matches);
    let outp = outp.finish()?;

    log::debug!(
        "compressed {} bytes into {} ({} literals, {} matches)",
        inp.len(),
        outp.pos,
        lits,
        matches
    );
    Ok(outp.pos)
}
