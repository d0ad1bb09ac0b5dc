/*
    BLAKE-256 hashing.

    The compression engine is a set of free functions driven by a
    data-only parameter table, so the streaming state in `state.rs`
    stays independent of the constants it runs with.

    Reference:
        https://www.131002.net/blake/blake.pdf
*/

pub mod state;

pub use state::BlakeState;

/// Block size of the compression function in bytes.
pub const BLOCK_LEN: usize = 64;

/// Digest length of BLAKE-256 in bytes.
pub const DIGEST_LEN: usize = 32;

/// Constants a BLAKE compression runs with.
#[derive(Debug)]
pub struct BlakeParams {
    pub iv: [u32; 8],
    pub constants: [u32; 16],
    pub sigma: [[usize; 16]; 10],
    pub rounds: usize,
}

pub const BLAKE256: BlakeParams = BlakeParams {
    iv: [
        0x6A09E667, 0xBB67AE85, 0x3C6EF372, 0xA54FF53A,
        0x510E527F, 0x9B05688C, 0x1F83D9AB, 0x5BE0CD19,
    ],
    constants: [
        0x243F6A88, 0x85A308D3, 0x13198A2E, 0x03707344,
        0xA4093822, 0x299F31D0, 0x082EFA98, 0xEC4E6C89,
        0x452821E6, 0x38D01377, 0xBE5466CF, 0x34E90C6C,
        0xC0AC29B7, 0xC97C50DD, 0x3F84D5B5, 0xB5470917,
    ],
    sigma: [
        [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
        [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
        [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
        [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
        [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
        [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
        [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
        [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
        [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
        [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    ],
    rounds: 14,
};

//Column steps then diagonal steps: (a, b, c, d, sigma offset)
const STEPS: [(usize, usize, usize, usize, usize); 8] = [
    (0, 4, 8, 12, 0),
    (1, 5, 9, 13, 2),
    (2, 6, 10, 14, 4),
    (3, 7, 11, 15, 6),
    (0, 5, 10, 15, 8),
    (1, 6, 11, 12, 10),
    (2, 7, 8, 13, 12),
    (3, 4, 9, 14, 14),
];

/**
    Quarter-round mixing of four words of the working vector with two
    message-derived words.
*/
fn g(v: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize, x: u32, y: u32) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(12);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(8);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(7);
}

/**
    Compresses one 64 byte block into the chain value.

    `counter` is the (lo, hi) bit counter to mix into the working vector,
    or None when the block carries no message bits.
*/
pub(crate) fn compress(
    params: &BlakeParams,
    chain: &mut [u32; 8],
    salt: &[u32; 4],
    block: &[u8],
    counter: Option<[u32; 2]>,
) {
    debug_assert_eq!(block.len(), BLOCK_LEN);

    let mut m = [0u32; 16];
    for (word, bytes) in m.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    let k = &params.constants;
    let mut v: [u32; 16] = [
        chain[0], chain[1], chain[2], chain[3],
        chain[4], chain[5], chain[6], chain[7],
        salt[0] ^ k[0], salt[1] ^ k[1], salt[2] ^ k[2], salt[3] ^ k[3],
        k[4], k[5], k[6], k[7],
    ];

    if let Some([lo, hi]) = counter {
        v[12] ^= lo;
        v[13] ^= lo;
        v[14] ^= hi;
        v[15] ^= hi;
    }

    for round in 0..params.rounds {
        let s = &params.sigma[round % 10];
        for &(a, b, c, d, e) in STEPS.iter() {
            let x = m[s[e]] ^ k[s[e + 1]];
            let y = m[s[e + 1]] ^ k[s[e]];
            g(&mut v, a, b, c, d, x, y);
        }
    }

    for i in 0..8 {
        chain[i] ^= v[i] ^ v[i + 8] ^ salt[i % 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppressed_counter_matches_zero_counter() {
        let block = [0x5Au8; BLOCK_LEN];
        let salt = [0u32; 4];

        let mut suppressed = BLAKE256.iv;
        let mut zero = BLAKE256.iv;
        let mut counted = BLAKE256.iv;
        compress(&BLAKE256, &mut suppressed, &salt, &block, None);
        compress(&BLAKE256, &mut zero, &salt, &block, Some([0, 0]));
        compress(&BLAKE256, &mut counted, &salt, &block, Some([512, 0]));

        assert_eq!(suppressed, zero);
        assert_ne!(suppressed, counted);
    }

    #[test]
    fn sigma_rows_are_permutations() {
        for row in BLAKE256.sigma.iter() {
            let mut seen = [false; 16];
            for &i in row.iter() {
                assert!(!seen[i]);
                seen[i] = true;
            }
        }
    }
}
