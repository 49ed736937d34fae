//! Cross-module checks of the compressor and expander.
//!
//! Covers round-trips over assorted inputs, the token bounds of produced
//! streams, literal-only behaviour on inputs without repeats, and corrupt
//! stream handling.
extern crate std;

use std::vec;
use std::vec::Vec;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::*;

// ---------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------

fn data_random(seed: u64, n: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut v = vec![0u8; n];
    rng.fill(&mut v[..]);
    v
}

/// Small alphabet, lots of short repeats
fn data_low_entropy(seed: u64, n: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(b'a'..=b'd')).collect()
}

fn data_repeating_text() -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog. ".repeat(100)
}

fn data_sawtooth(n: usize) -> Vec<u8> {
    (0..n).map(|i| (i % 256) as u8).collect()
}

/// Byte sequence in which every ordered pair of byte values occurs once
fn data_unique_pairs() -> Vec<u8> {
    fn db(t: usize, p: usize, a: &mut [u8; 3], seq: &mut Vec<u8>) {
        if t > 2 {
            if 2 % p == 0 {
                seq.extend_from_slice(&a[1..=p]);
            }
        } else {
            a[t] = a[t - p];
            db(t + 1, p, a, seq);
            for j in a[t - p] as usize + 1..256 {
                a[t] = j as u8;
                db(t + 1, t, a, seq);
            }
        }
    }

    let mut seq = Vec::with_capacity(256 * 256);
    db(1, 1, &mut [0; 3], &mut seq);
    seq
}

fn tokens_of(stream: &[u8]) -> Vec<Token> {
    Tokens::new(stream)
        .collect::<Result<Vec<_>, _>>()
        .expect("stream should parse")
}

fn assert_round_trip(inp: &[u8]) {
    let compressed = compress(inp);
    let expanded = expand(&compressed).expect("expand failed");
    assert_eq!(expanded.len(), inp.len());
    assert!(expanded == inp, "round trip mismatch");

    let mut buf = vec![0u8; max_compressed_len(inp.len())];
    let len = compress_to_buf(inp, &mut buf).expect("bound too small");
    assert_eq!(buf[..len], compressed[..]);

    let mut out = vec![0u8; inp.len()];
    assert_eq!(expand_to_buf(&compressed, &mut out), Ok(inp.len()));
    assert!(out == inp);
}

// ---------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------

#[test]
fn test_round_trip_small() {
    assert_round_trip(&[]);
    assert_round_trip(&[0]);
    assert_round_trip(&[0xff, 0xff]);
    assert_round_trip(b"abc");
    assert_round_trip(b"abcabc");
    assert_round_trip(b"abababababababababababababababababababab");
}

#[test]
fn test_round_trip_structured() {
    assert_round_trip(&vec![0u8; 10_000]);
    assert_round_trip(&(0..=255u8).collect::<Vec<_>>());
    assert_round_trip(&data_repeating_text());
    assert_round_trip(&data_sawtooth(20_000));
    assert_round_trip(&data_unique_pairs());
}

#[test]
fn test_round_trip_random() {
    for (seed, n) in [(1, 1), (2, 17), (3, 1000), (4, 4097), (5, 50_000)] {
        assert_round_trip(&data_random(seed, n));
        assert_round_trip(&data_low_entropy(seed, n));
    }
}

#[test]
fn test_round_trip_own_source() {
    assert_round_trip(include_bytes!("compress.rs"));
    assert_round_trip(include_bytes!("matcher.rs"));
}

#[test]
fn test_round_trip_threads() {
    std::thread::scope(|s| {
        for seed in 0..4 {
            s.spawn(move || assert_round_trip(&data_low_entropy(seed, 30_000)));
        }
    });
}

// ---------------------------------------------------------------
// Stream structure
// ---------------------------------------------------------------

#[test]
fn test_empty_iff_empty() {
    assert!(compress(&[]).is_empty());
    assert_eq!(expand(&[]), Ok(Vec::new()));
    for n in 1..20 {
        assert!(!compress(&data_low_entropy(n as u64, n)).is_empty());
    }
}

#[test]
fn test_token_bounds() {
    for inp in [
        data_low_entropy(7, 30_000),
        data_repeating_text(),
        vec![0u8; 5000],
        data_sawtooth(9000),
    ] {
        let tokens = tokens_of(&compress(&inp));
        let mut covered = 0;
        for token in &tokens {
            if let Token::Match { distance, length } = *token {
                assert!((1..=MAX_DISTANCE).contains(&distance));
                assert!((MIN_MATCH..=MAX_LENGTH).contains(&length));
                assert!(distance <= covered);
            }
            covered += token.output_len();
        }
        assert_eq!(covered, inp.len());
    }
}

#[test]
fn test_sawtooth_uses_far_matches() {
    // period 256 repeats at exactly 256 back
    let tokens = tokens_of(&compress(&data_sawtooth(2048)));
    assert!(tokens.iter().any(|t| matches!(
        t,
        Token::Match {
            distance: 256,
            length: MAX_LENGTH
        }
    )));
}

#[test]
fn test_no_repeats_all_literals() {
    let inp = &data_unique_pairs()[..5000];
    let compressed = compress(inp);
    assert_eq!(compressed.len(), 5000 + 5000 / 8);
    assert!(tokens_of(&compressed)
        .iter()
        .all(|t| matches!(t, Token::Literal(_))));
    // full blocks only, all bits set
    assert!(compressed.iter().step_by(9).all(|&c| c == 0xff));
}

#[test]
fn test_repeat_outside_window_is_literal() {
    let gap = MAX_DISTANCE + 1;
    let mut inp = vec![0u8; gap + 3];
    inp[..3].copy_from_slice(b"XYZ");
    inp[gap..].copy_from_slice(b"XYZ");

    let tokens = tokens_of(&compress(&inp));
    assert_eq!(
        tokens[tokens.len() - 3..],
        [
            Token::Literal(b'X'),
            Token::Literal(b'Y'),
            Token::Literal(b'Z')
        ]
    );
    assert_round_trip(&inp);
}

#[test]
fn test_run_of_one_byte() {
    let compressed = compress(b"AAAAAAAAAA");
    assert_eq!(compressed, [0x80, 0x41, 0x60, 0x00]);
    assert_eq!(
        tokens_of(&compressed),
        [
            Token::Literal(b'A'),
            Token::Match {
                distance: 1,
                length: 9
            }
        ]
    );
    assert_eq!(expand(&compressed).unwrap(), b"AAAAAAAAAA");
}

#[test]
fn test_doubled_block() {
    let block = b"ABCDEFGHIJKLMNOPQRST";
    let mut inp = block.to_vec();
    inp.extend_from_slice(block);

    let compressed = compress(&inp);
    assert_eq!(
        compressed[18..],
        [0xf6, b'Q', b'R', b'S', b'T', 0xf0, 0x13, b'S', b'T']
    );

    let tokens = tokens_of(&compressed);
    assert_eq!(tokens.len(), 23);
    assert_eq!(
        tokens[20],
        Token::Match {
            distance: 20,
            length: 18
        }
    );
    assert_round_trip(&inp);
}

// ---------------------------------------------------------------
// Corrupt streams
// ---------------------------------------------------------------

#[test]
fn test_lone_match_control() {
    assert_eq!(expand(&[0x00]), Err(ExpandError::TruncatedMatch));
    let mut out = [0u8; 16];
    assert_eq!(
        expand_to_buf(&[0x00], &mut out),
        Err(ExpandError::TruncatedMatch)
    );
}

#[test]
fn test_truncated_streams() {
    let compressed = compress(b"ABABA");
    assert_eq!(compressed, [0xc0, 0x41, 0x42, 0x00, 0x01]);
    assert_eq!(
        expand(&compressed[..4]),
        Err(ExpandError::TruncatedMatch)
    );

    // cut right after a control byte announcing literals
    let mut cut = compress(&data_unique_pairs()[..8]);
    assert_eq!(cut.len(), 9);
    cut.push(0x80);
    assert_eq!(expand(&cut), Err(ExpandError::TruncatedLiteral));
}

#[test]
fn test_garbage_never_panics() {
    let mut rng = StdRng::seed_from_u64(99);
    for n in 0..200 {
        let inp = data_random(n, rng.gen_range(0..64));
        match expand(&inp) {
            Ok(out) => assert_eq!(compress(&out).is_empty(), out.is_empty()),
            Err(e) => assert!(matches!(
                e,
                ExpandError::TruncatedMatch
                    | ExpandError::TruncatedLiteral
                    | ExpandError::InvalidBackreference
            )),
        }
    }
}
