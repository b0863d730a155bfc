//! scrypt (RFC 7914) memory-hard key derivation.
//!
//! PBKDF2-HMAC-SHA256 expands the password into `parallelism` blocks of
//! `128 * block_size` bytes, each block is mixed by ROMix over a working
//! area of `128 * block_size * cost` bytes, and a final PBKDF2 pass over the
//! mixed blocks produces the output.
//!
//! The cost of a call is chosen by the caller and is not capped here: large
//! `cost`/`block_size` values are slow and memory-hungry on purpose. The
//! working-set size is validated against overflow and allocated fallibly
//! before any mixing starts.

use zeroize::{Zeroize, Zeroizing};

use super::try_alloc;
use crate::mac::HmacSha256;
use crate::PrimitivesError;

/// Largest output scrypt can produce ((2^32 - 1) * 32 bytes).
const MAX_OUTPUT_LEN: u64 = (u32::MAX as u64) * 32;

/// Salsa20 block size in 32-bit words.
const SALSA_WORDS: usize = 16;

/// Validated scrypt cost parameters.
///
/// Construct with [`ScryptParams::new`]; an existing value is always safe to
/// pass to [`scrypt_with_params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptParams {
    cost: u32,
    block_size: u32,
    parallelism: u32,
}

impl ScryptParams {
    /// Validate and build a parameter set.
    ///
    /// # Arguments
    /// * `cost` - CPU/memory cost `N`; a power of two, at least 2.
    /// * `block_size` - Block size factor `r`, at least 1.
    /// * `parallelism` - Parallelism factor `p`, at least 1.
    ///
    /// # Returns
    /// The parameters, or `InvalidParameter` if any check fails or the
    /// implied working set does not fit in memory addressing limits.
    pub fn new(cost: u32, block_size: u32, parallelism: u32) -> Result<Self, PrimitivesError> {
        if cost < 2 || !cost.is_power_of_two() {
            return Err(PrimitivesError::InvalidParameter(format!(
                "scrypt cost must be a power of two and at least 2, got {}",
                cost
            )));
        }
        if block_size == 0 {
            return Err(PrimitivesError::InvalidParameter(
                "scrypt block_size must be at least 1".to_string(),
            ));
        }
        if parallelism == 0 {
            return Err(PrimitivesError::InvalidParameter(
                "scrypt parallelism must be at least 1".to_string(),
            ));
        }
        if (block_size as u64) * (parallelism as u64) >= 1 << 30 {
            return Err(PrimitivesError::InvalidParameter(format!(
                "scrypt block_size * parallelism must be below 2^30, got {} * {}",
                block_size, parallelism
            )));
        }
        let params = ScryptParams {
            cost,
            block_size,
            parallelism,
        };
        params.memory_required()?;
        Ok(params)
    }

    /// CPU/memory cost `N`.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Block size factor `r`.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Parallelism factor `p`.
    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    /// Total bytes of working memory a derivation with these parameters needs.
    ///
    /// Counts the expanded blocks (`128 * r * p`), the ROMix table
    /// (`128 * r * N`) and the BlockMix scratch space (`256 * r`).
    pub fn memory_required(&self) -> Result<usize, PrimitivesError> {
        let overflow = || {
            PrimitivesError::InvalidParameter(format!(
                "scrypt working set overflows for cost={} block_size={} parallelism={}",
                self.cost, self.block_size, self.parallelism
            ))
        };
        let block_len = (self.block_size as usize)
            .checked_mul(128)
            .ok_or_else(overflow)?;
        let table = block_len
            .checked_mul(self.cost as usize)
            .ok_or_else(overflow)?;
        let blocks = block_len
            .checked_mul(self.parallelism as usize)
            .ok_or_else(overflow)?;
        table
            .checked_add(blocks)
            .and_then(|total| total.checked_add(block_len * 2))
            .ok_or_else(overflow)
    }
}

/// Derive `len` bytes from `pass` and `salt` with scrypt.
///
/// # Arguments
/// * `pass` - Password to derive from.
/// * `salt` - Salt to derive from.
/// * `cost` - CPU/memory cost `N` (power of two, at least 2).
/// * `block_size` - Block size factor `r`.
/// * `parallelism` - Parallelism factor `p`.
/// * `len` - Number of bytes to derive.
///
/// # Returns
/// The derived key, `InvalidParameter`/`InvalidLength` for bad arguments, or
/// `AllocationFailed` if the working set cannot be allocated.
pub fn scrypt(
    pass: &[u8],
    salt: &[u8],
    cost: u32,
    block_size: u32,
    parallelism: u32,
    len: usize,
) -> Result<Vec<u8>, PrimitivesError> {
    let params = ScryptParams::new(cost, block_size, parallelism)?;
    scrypt_with_params(pass, salt, &params, len)
}

/// Derive `len` bytes with a pre-validated [`ScryptParams`].
pub fn scrypt_with_params(
    pass: &[u8],
    salt: &[u8],
    params: &ScryptParams,
    len: usize,
) -> Result<Vec<u8>, PrimitivesError> {
    if len == 0 || len as u64 > MAX_OUTPUT_LEN {
        return Err(PrimitivesError::InvalidLength {
            what: "scrypt output",
            expected: format!("between 1 and {}", MAX_OUTPUT_LEN),
            got: len,
        });
    }

    let r = params.block_size as usize;
    let n = params.cost as usize;
    let p = params.parallelism as usize;
    let block_len = 128 * r;
    let block_words = 32 * r;

    let mut blocks = Zeroizing::new(try_alloc::<u8>(block_len * p, "scrypt blocks")?);
    let mut table = Zeroizing::new(try_alloc::<u32>(block_words * n, "scrypt ROMix table")?);
    let mut scratch = Zeroizing::new(try_alloc::<u32>(block_words * 2, "scrypt scratch")?);

    pbkdf2_sha256_once(pass, salt, &mut blocks)?;
    for block in blocks.chunks_mut(block_len) {
        ro_mix(block, &mut table, &mut scratch, n, r);
    }

    let mut out = try_alloc::<u8>(len, "scrypt output")?;
    if let Err(e) = pbkdf2_sha256_once(pass, &blocks, &mut out) {
        out.zeroize();
        return Err(e);
    }
    Ok(out)
}

fn pbkdf2_sha256_once(pass: &[u8], salt: &[u8], out: &mut [u8]) -> Result<(), PrimitivesError> {
    pbkdf2::pbkdf2::<HmacSha256>(pass, salt, 1, out)
        .map_err(|e| PrimitivesError::InvalidParameter(e.to_string()))
}

/// Mix one `128 * r` byte block in place.
///
/// `table` holds `n` BlockMix states of `32 * r` words; `scratch` holds two.
fn ro_mix(block: &mut [u8], table: &mut [u32], scratch: &mut [u32], n: usize, r: usize) {
    let words = 32 * r;
    let (x, y) = scratch.split_at_mut(words);

    for (w, bytes) in x.iter_mut().zip(block.chunks_exact(4)) {
        *w = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    for slot in table.chunks_exact_mut(words).take(n) {
        slot.copy_from_slice(x);
        block_mix(x, y, r);
        x.copy_from_slice(y);
    }

    for _ in 0..n {
        // n is a power of two, so masking is the modular reduction.
        let j = integerify(x, r) & (n - 1);
        let v = &table[j * words..(j + 1) * words];
        for (xw, vw) in x.iter_mut().zip(v) {
            *xw ^= *vw;
        }
        block_mix(x, y, r);
        x.copy_from_slice(y);
    }

    for (bytes, w) in block.chunks_exact_mut(4).zip(x.iter()) {
        bytes.copy_from_slice(&w.to_le_bytes());
    }
}

/// First word of the last 64-byte sub-block.
fn integerify(x: &[u32], r: usize) -> usize {
    x[(2 * r - 1) * SALSA_WORDS] as usize
}

/// scrypt BlockMix with Salsa20/8 as the hash function.
///
/// Even-indexed outputs land in the first half of `output`, odd-indexed in
/// the second half.
fn block_mix(input: &[u32], output: &mut [u32], r: usize) {
    let mut t = [0u32; SALSA_WORDS];
    t.copy_from_slice(&input[(2 * r - 1) * SALSA_WORDS..2 * r * SALSA_WORDS]);

    for (i, chunk) in input.chunks_exact(SALSA_WORDS).enumerate() {
        for (tw, cw) in t.iter_mut().zip(chunk) {
            *tw ^= *cw;
        }
        salsa20_8(&mut t);
        let dst = if i % 2 == 0 { i / 2 } else { r + i / 2 };
        output[dst * SALSA_WORDS..(dst + 1) * SALSA_WORDS].copy_from_slice(&t);
    }
    t.zeroize();
}

#[inline(always)]
fn quarter_round(x: &mut [u32; SALSA_WORDS], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}

/// Salsa20 core reduced to 8 rounds.
fn salsa20_8(block: &mut [u32; SALSA_WORDS]) {
    let mut x = *block;
    for _ in 0..4 {
        // columns
        quarter_round(&mut x, 0, 4, 8, 12);
        quarter_round(&mut x, 5, 9, 13, 1);
        quarter_round(&mut x, 10, 14, 2, 6);
        quarter_round(&mut x, 15, 3, 7, 11);
        // rows
        quarter_round(&mut x, 0, 1, 2, 3);
        quarter_round(&mut x, 5, 6, 7, 4);
        quarter_round(&mut x, 10, 11, 8, 9);
        quarter_round(&mut x, 15, 12, 13, 14);
    }
    for (b, xw) in block.iter_mut().zip(x.iter()) {
        *b = b.wrapping_add(*xw);
    }
    x.zeroize();
}
