//! Fixed-layout codec for on-chain round accounts.
//!
//! A round account is a little-endian struct at fixed byte offsets. There
//! are no length-prefixed or variable-width fields, so offsets follow
//! purely from the preceding fields' widths. The program pads accounts
//! past the struct, so trailing bytes are tolerated; anything shorter than
//! [`ROUND_ACCOUNT_LEN`] is rejected before a single field is read.

use thiserror::Error;

use crate::types::{RoundState, TILE_COUNT};

/// Bytes occupied by the round fields themselves.
const ROUND_FIELDS_LEN: usize = 8 + TILE_COUNT * 8 + 32 + TILE_COUNT * 8 + 8 + 8 + 32 + 32 + 8 + 8 + 8 + 8;

/// The on-chain account reserves 32 bytes past the last field.
const RESERVED_TAIL_LEN: usize = 32;

/// Minimum (and exact decoded) length of a round account: 584 bytes.
pub const ROUND_ACCOUNT_LEN: usize = ROUND_FIELDS_LEN + RESERVED_TAIL_LEN;

/// Typed decode failure. Decoding never panics; a blob that cannot hold
/// the full layout is reported, not read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("round account too short: need {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Forward-only reader over a slice whose length has already been checked
/// against [`ROUND_ACCOUNT_LEN`]. Reads stay within the slice by
/// construction; the final position is asserted below as a self-check.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn read_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take::<8>())
    }

    fn read_key(&mut self) -> [u8; 32] {
        self.take::<32>()
    }

    fn read_u64_array(&mut self) -> [u64; TILE_COUNT] {
        let mut out = [0u64; TILE_COUNT];
        for slot in out.iter_mut() {
            *slot = self.read_u64();
        }
        out
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }
}

// ---------------------------------------------------------------------------
// Decode / encode
// ---------------------------------------------------------------------------

/// Decode a round account from raw bytes.
///
/// Total over any input of at least [`ROUND_ACCOUNT_LEN`] bytes: the first
/// 584 bytes are read deterministically and anything beyond is ignored.
pub fn decode_round(data: &[u8]) -> Result<RoundState, DecodeError> {
    if data.len() < ROUND_ACCOUNT_LEN {
        return Err(DecodeError::TooShort {
            expected: ROUND_ACCOUNT_LEN,
            actual: data.len(),
        });
    }

    let mut cur = Cursor::new(&data[..ROUND_ACCOUNT_LEN]);

    let round = RoundState {
        id: cur.read_u64(),
        deployed: cur.read_u64_array(),
        slot_hash: cur.read_key(),
        counts: cur.read_u64_array(),
        expires_at: cur.read_u64(),
        motherlode: cur.read_u64(),
        rent_payer: cur.read_key(),
        top_miner: cur.read_key(),
        top_miner_reward: cur.read_u64(),
        total_deployed: cur.read_u64(),
        total_vaulted: cur.read_u64(),
        total_winnings: cur.read_u64(),
    };

    cur.skip(RESERVED_TAIL_LEN);
    debug_assert_eq!(cur.pos, ROUND_ACCOUNT_LEN);

    Ok(round)
}

impl RoundState {
    /// Serialise into the exact 584-byte account layout (reserved tail
    /// zeroed). Inverse of [`decode_round`]; used to build fixtures.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(ROUND_ACCOUNT_LEN);

        buf.extend_from_slice(&self.id.to_le_bytes());
        for lamports in &self.deployed {
            buf.extend_from_slice(&lamports.to_le_bytes());
        }
        buf.extend_from_slice(&self.slot_hash);
        for count in &self.counts {
            buf.extend_from_slice(&count.to_le_bytes());
        }
        buf.extend_from_slice(&self.expires_at.to_le_bytes());
        buf.extend_from_slice(&self.motherlode.to_le_bytes());
        buf.extend_from_slice(&self.rent_payer);
        buf.extend_from_slice(&self.top_miner);
        buf.extend_from_slice(&self.top_miner_reward.to_le_bytes());
        buf.extend_from_slice(&self.total_deployed.to_le_bytes());
        buf.extend_from_slice(&self.total_vaulted.to_le_bytes());
        buf.extend_from_slice(&self.total_winnings.to_le_bytes());
        buf.resize(ROUND_ACCOUNT_LEN, 0);

        debug_assert_eq!(buf.len(), ROUND_ACCOUNT_LEN);
        buf
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
