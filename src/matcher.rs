//! Match finding over an exact two byte index
//!
//! Every position is linked to the previous position that starts with the
//! same two bytes. The links are stored as backward distances, so walking
//! `i -= offsets[i]` visits all earlier occurrences from newest to oldest,
//! ending at a position whose offset is 0.

use core::mem;

use alloc::vec;
use alloc::vec::Vec;

use crate::{MAX_DISTANCE, MAX_LENGTH};

const HTAB_SZ: usize = 256 * 256;
const NO_POS: usize = usize::MAX;

fn pair_hash(b0: u8, b1: u8) -> usize {
    ((b0 as usize) << 8) | b1 as usize
}

/// Build the backward links for every position of `data`
///
/// `offsets[i]` is the distance to the closest earlier position starting
/// with the same two bytes as `i`, or 0 if there is none. The last position
/// has no pair and always gets 0.
pub fn link_matches(data: &[u8]) -> Vec<usize> {
    let mut offsets = vec![0; data.len()];
    let mut htab = vec![NO_POS; HTAB_SZ];

    for (i, pair) in data.windows(2).enumerate() {
        let prev = mem::replace(&mut htab[pair_hash(pair[0], pair[1])], i);
        if prev != NO_POS {
            offsets[i] = i - prev;
        }
    }

    offsets
}

/// Count equal bytes at `i` and `j`, up to [MAX_LENGTH] or the end of input
///
/// `i` must be before `j`.
pub fn match_length(data: &[u8], i: usize, j: usize) -> usize {
    debug_assert!(i < j);
    data[j..]
        .iter()
        .zip(data[i..].iter())
        .take(MAX_LENGTH)
        .take_while(|(a, b)| a == b)
        .count()
}

/// Result of a match search
///
/// A `length` of 0 means nothing was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Match {
    pub distance: usize,
    pub length: usize,
}

/// Find the longest earlier occurrence of the bytes at `j`
///
/// Only candidates at most [MAX_DISTANCE] back are considered. On equal
/// lengths the closest candidate wins.
pub fn best_match(data: &[u8], offsets: &[usize], j: usize) -> Match {
    let mut best = Match::default();
    if offsets[j] == 0 {
        return best;
    }

    let mut i = j - offsets[j];
    while j - i <= MAX_DISTANCE {
        let n = match_length(data, i, j);
        if n > best.length {
            best = Match {
                distance: j - i,
                length: n,
            };
            // nothing further back can be longer
            if n == MAX_LENGTH {
                break;
            }
        }

        if offsets[i] == 0 {
            break;
        }
        i -= offsets[i];
    }

    best
}

/// An input buffer together with its match links
pub struct MatchIndex<'a> {
    data: &'a [u8],
    offsets: Vec<usize>,
}
impl<'a> MatchIndex<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offsets: link_matches(data),
        }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn best_match(&self, j: usize) -> Match {
        best_match(self.data, &self.offsets, j)
    }
}
