//! The SHA-512 crypt mixing construction.
//!
//! Every intermediate derived from the secret lives in a [`Zeroizing`]
//! buffer so it is wiped on every exit path, including unwinding.

use sha2::{Digest, Sha512, digest::generic_array::GenericArray};
use tracing::instrument;
use zeroize::Zeroizing;

use super::{DIGEST_LEN, alphabet};

/// Source indices of the 64 digest bytes, in the order they are fed to the
/// alphabet encoder: 21 triplets followed by the lone byte 63.
const PERMUTATION: [usize; DIGEST_LEN] = [
    42, 21, 0, 1, 43, 22, 23, 2, 44, 45, 24, 3, 4, 46, 25, 26, 5, 47, 48, 27, 6, 7, 49, 28, 29,
    8, 50, 51, 30, 9, 10, 52, 31, 32, 11, 53, 54, 33, 12, 13, 55, 34, 35, 14, 56, 57, 36, 15,
    16, 58, 37, 38, 17, 59, 60, 39, 18, 19, 61, 40, 41, 20, 62, 63,
];

type Block = Zeroizing<[u8; DIGEST_LEN]>;

fn finish(hasher: Sha512) -> Block {
    let mut out = Zeroizing::new([0u8; DIGEST_LEN]);
    hasher.finalize_into(GenericArray::from_mut_slice(out.as_mut_slice()));
    out
}

/// Copies of `sum` concatenated and cut to exactly `len` bytes.
fn repeat_to_len(sum: &[u8; DIGEST_LEN], len: usize) -> Zeroizing<Vec<u8>> {
    let mut seq = Zeroizing::new(Vec::with_capacity(len));
    seq.extend(sum.iter().copied().cycle().take(len));
    seq
}

/// Computes the raw 64-byte digest for `secret` and `salt`.
///
/// `rounds` is taken as-is; range checking belongs to the record layer.
#[instrument(level = "trace", skip_all, fields(rounds = rounds))]
pub fn digest(secret: &[u8], salt: &[u8], rounds: u32) -> Block {
    // B = H(secret | salt | secret)
    let mut b = Sha512::new();
    b.update(secret);
    b.update(salt);
    b.update(secret);
    let b_sum = finish(b);

    // A = H(secret | salt | B repeated to len(secret) | bit walk)
    let mut a = Sha512::new();
    a.update(secret);
    a.update(salt);

    let mut remaining = secret.len();
    while remaining > DIGEST_LEN {
        a.update(b_sum.as_slice());
        remaining -= DIGEST_LEN;
    }
    a.update(&b_sum[..remaining]);

    let mut bits = secret.len();
    while bits > 0 {
        if bits & 1 != 0 {
            a.update(b_sum.as_slice());
        } else {
            a.update(secret);
        }
        bits >>= 1;
    }
    let a_sum = finish(a);

    let mut dp = Sha512::new();
    for _ in 0..secret.len() {
        dp.update(secret);
    }
    let dp_sum = finish(dp);
    let dp_seq = repeat_to_len(&dp_sum, secret.len());

    let mut ds = Sha512::new();
    for _ in 0..16 + usize::from(a_sum[0]) {
        ds.update(salt);
    }
    let ds_sum = finish(ds);
    let ds_seq = repeat_to_len(&ds_sum, salt.len());

    let mut c = a_sum;
    for i in 0..rounds {
        let mut ctx = Sha512::new();

        if i & 1 != 0 {
            ctx.update(dp_seq.as_slice());
        } else {
            ctx.update(c.as_slice());
        }

        if i % 3 != 0 {
            ctx.update(ds_seq.as_slice());
        }

        if i % 7 != 0 {
            ctx.update(dp_seq.as_slice());
        }

        if i & 1 != 0 {
            ctx.update(c.as_slice());
        } else {
            ctx.update(dp_seq.as_slice());
        }

        ctx.finalize_into(GenericArray::from_mut_slice(c.as_mut_slice()));
    }

    c
}

/// Reorders a raw digest and renders it as the 86-character checksum.
pub fn encode_digest(sum: &[u8; DIGEST_LEN]) -> String {
    let mut permuted = Zeroizing::new([0u8; DIGEST_LEN]);
    for (dst, &src) in permuted.iter_mut().zip(PERMUTATION.iter()) {
        *dst = sum[src];
    }
    alphabet::encode(permuted.as_slice())
}

/// Digest and encode in one step; the checksum portion of a `$6$` record.
pub fn crypt(secret: &[u8], salt: &[u8], rounds: u32) -> String {
    encode_digest(&digest(secret, salt, rounds))
}
