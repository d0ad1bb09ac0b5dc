/*
    Streaming BLAKE-256 context.

    Input is buffered into 64 byte blocks; every full block advances the
    64 bit bit-counter by 512 and is compressed immediately. `finalize`
    consumes the state, so a finished hasher can not be updated again.
*/

use super::{compress, BlakeParams, BLAKE256, BLOCK_LEN, DIGEST_LEN};

//Last block markers
const PAD_START: u8 = 0x80;
const FINAL_BIT: u8 = 0x01;
const PAD_START_FINAL_BIT: u8 = 0x81;

//Message bytes that fit in a last block next to the 9 bytes of markers and length
const LAST_BLOCK_ROOM: usize = 55;

#[derive(Clone)]
pub struct BlakeState {
    params: &'static BlakeParams,
    chain: [u32; 8],
    counter: [u32; 2],
    buffer: [u8; BLOCK_LEN],
    buffered: usize,
    salt: [u32; 4],
    suppress_counter: bool,
}

impl BlakeState {
    /// New unsalted BLAKE-256 state.
    pub fn new() -> Self {
        Self::with_salt([0; 4])
    }

    /// New BLAKE-256 state mixing `salt` into every compression.
    pub fn with_salt(salt: [u32; 4]) -> Self {
        Self {
            params: &BLAKE256,
            chain: BLAKE256.iv,
            counter: [0, 0],
            buffer: [0; BLOCK_LEN],
            buffered: 0,
            salt,
            suppress_counter: false,
        }
    }

    /// Hash `data` in one call.
    pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
        let mut state = Self::new();
        state.update(data);
        state.finalize()
    }

    /**
        Absorbs `data`. May be called any number of times with chunks of any
        length, including empty ones.
    */
    pub fn update(&mut self, data: &[u8]) {
        let mut data = data;

        //Top up a partially filled buffer first
        if self.buffered > 0 {
            let fill = BLOCK_LEN - self.buffered;
            if data.len() < fill {
                self.buffer[self.buffered..self.buffered + data.len()].copy_from_slice(data);
                self.buffered += data.len();
                return;
            }

            self.buffer[self.buffered..].copy_from_slice(&data[..fill]);
            self.advance_counter();
            let block = self.buffer;
            self.compress(&block);
            self.buffered = 0;
            data = &data[fill..];
        }

        while data.len() >= BLOCK_LEN {
            let (block, rest) = data.split_at(BLOCK_LEN);
            self.advance_counter();
            self.compress(block);
            data = rest;
        }

        self.buffer[..data.len()].copy_from_slice(data);
        self.buffered = data.len();
    }

    /**
        Pads the buffered remainder, compresses the last block(s) and returns
        the chain words serialized big-endian.
    */
    pub fn finalize(mut self) -> [u8; DIGEST_LEN] {
        let len = self.buffered;
        let total = self.total_bits();

        let mut msglen = [0u8; 8];
        msglen[..4].copy_from_slice(&total[1].to_be_bytes());
        msglen[4..].copy_from_slice(&total[0].to_be_bytes());

        let mut block = [0u8; BLOCK_LEN];
        block[..len].copy_from_slice(&self.buffer[..len]);

        if len == LAST_BLOCK_ROOM {
            block[len] = PAD_START_FINAL_BIT;
            block[BLOCK_LEN - 8..].copy_from_slice(&msglen);
            self.compress_with_counter(&block, total);
        } else if len < LAST_BLOCK_ROOM {
            //An empty remainder leaves a block of pure padding
            if len == 0 {
                self.suppress_counter = true;
            }
            block[len] = PAD_START;
            block[LAST_BLOCK_ROOM] = FINAL_BIT;
            block[BLOCK_LEN - 8..].copy_from_slice(&msglen);
            self.compress_with_counter(&block, total);
        } else {
            //Not enough room for the length: close this block, then one of padding only
            block[len] = PAD_START;
            self.compress_with_counter(&block, total);

            let mut tail = [0u8; BLOCK_LEN];
            tail[LAST_BLOCK_ROOM] = FINAL_BIT;
            tail[BLOCK_LEN - 8..].copy_from_slice(&msglen);
            self.suppress_counter = true;
            self.compress_with_counter(&tail, total);
        }

        let mut out = [0u8; DIGEST_LEN];
        for (bytes, word) in out.chunks_exact_mut(4).zip(self.chain.iter()) {
            bytes.copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Counter of bits compressed so far plus those still buffered.
    fn total_bits(&self) -> [u32; 2] {
        let (lo, carry) = self.counter[0].overflowing_add((self.buffered as u32) << 3);
        [lo, self.counter[1].wrapping_add(carry as u32)]
    }

    fn advance_counter(&mut self) {
        self.counter[0] = self.counter[0].wrapping_add(512);
        if self.counter[0] == 0 {
            self.counter[1] = self.counter[1].wrapping_add(1);
        }
    }

    fn compress(&mut self, block: &[u8]) {
        let counter = self.counter;
        self.compress_with_counter(block, counter);
    }

    fn compress_with_counter(&mut self, block: &[u8], counter: [u32; 2]) {
        let counter = if self.suppress_counter { None } else { Some(counter) };
        compress(self.params, &mut self.chain, &self.salt, block, counter);
    }
}

impl Default for BlakeState {
    fn default() -> Self {
        Self::new()
    }
}
