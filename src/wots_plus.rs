//! # Winternitz One-Time Signature Scheme Plus (W-OTS+)
//!
//! W-OTS+ signs a single `n`-byte message per key pair. The key consists of `len` hash
//! chains of length `w`; a signature reveals, for every digit of the encoded message, the
//! value part-way up the matching chain, and the verifier finishes each chain to its tip.
//!
//! The message is encoded as `len1` base-`w` digits, followed by `len2` digits of a
//! checksum that rises whenever a message digit falls, so no chain value can be advanced
//! into a valid signature of another message.
//!
//! Every hash call is tagged with an [`Adrs`]. The caller sets the layer, tree and key pair
//! address; this module sets the chain and hash addresses. No secret chain start leaves
//! this module except as part of a signature, and the buffers holding them are wiped.
//!
//! These functions are the building block of XMSS and are not meant to be used as a
//! standalone signature scheme: signing the same key twice breaks it.

use crate::adrs::{Adrs, AdrsType};
use crate::error::{Error, Result};
use crate::hash::TweakableHash;
use crate::params::Params;
use crate::utils::{base_2b, to_byte};
use zeroize::Zeroizing;

/// Computes the chaining function.
///
/// Interprets `input` as the `start`-th value of the chain and applies `F` `steps` times,
/// writing the result to the first `n` bytes of `output`. `adrs` has to contain the
/// address of the chain; its hash address is overwritten at every step.
///
/// # Arguments
///
/// * `output` - Receives the chain value, at least `n` bytes.
/// * `input` - The chain value at position `start`, at least `n` bytes.
/// * `start` - Position of `input` in the chain.
/// * `steps` - Number of `F` applications.
/// * `adrs` - Address of the chain.
///
/// # Returns
///
/// `Ok(())`, or [`Error::InvalidParameter`] if `start + steps` runs past `w - 1` or a
/// buffer is shorter than `n` bytes. `output` is left untouched on error.
pub fn chain<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    output: &mut [u8],
    input: &[u8],
    start: usize,
    steps: usize,
    adrs: &mut Adrs,
) -> Result<()> {
    let n = params.n();
    if start
        .checked_add(steps)
        .map_or(true, |end| end > params.w() - 1)
    {
        return Err(Error::InvalidParameter(format!(
            "chain from {start} with {steps} steps runs past w - 1 = {}",
            params.w() - 1
        )));
    }
    if input.len() < n || output.len() < n {
        return Err(Error::InvalidParameter(format!(
            "chain values must be at least {n} bytes"
        )));
    }
    run_chain(hasher, params, output, input, start, steps, adrs);
    Ok(())
}

/// [`chain`] for callers whose `start + steps` is at most `w - 1` by construction.
fn run_chain<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    output: &mut [u8],
    input: &[u8],
    start: usize,
    steps: usize,
    adrs: &mut Adrs,
) {
    let n = params.n();
    output[..n].copy_from_slice(&input[..n]);

    for i in start..(start + steps) {
        adrs.set_hash_addr(i as u32);
        hasher.spx_f_inplace(output[..n].as_mut(), adrs);
    }
}

/// Computes the WOTS+ checksum digits over the message digits.
fn wots_checksum(params: &Params, msg_digits: &[u32]) -> Vec<u32> {
    let w = params.w() as u64;
    let lg_w = params.lg_w();
    let len2 = params.len2();

    let mut csum: u64 = msg_digits.iter().map(|&d| w - 1 - u64::from(d)).sum();

    // Make sure expected empty zero bits are the least significant bits.
    csum <<= (8 - ((len2 * lg_w) % 8)) % 8;

    let csum_bytes = to_byte(csum, (len2 * lg_w + 7) / 8);
    base_2b(&csum_bytes, lg_w, len2)
}

/// Takes an `n`-byte message and derives the matching chain lengths: `len1` message
/// digits followed by `len2` checksum digits, each in `[0, w)`.
///
/// Only the first `n` bytes of `msg` are read. Fails with [`Error::InvalidParameter`] if
/// `msg` is shorter.
pub fn chain_lengths(params: &Params, msg: &[u8]) -> Result<Vec<u32>> {
    let n = params.n();
    if msg.len() < n {
        return Err(Error::InvalidParameter(format!(
            "WOTS+ message must be at least {n} bytes, found {}",
            msg.len()
        )));
    }
    let mut lengths = base_2b(&msg[..n], params.lg_w(), params.len1());
    let checksum = wots_checksum(params, &lengths);
    lengths.extend(checksum);
    Ok(lengths)
}

/// Derives the secret start of chain `chain_idx` for the key pair addressed by `adrs`.
fn chain_start<H: TweakableHash>(
    hasher: &H,
    output: &mut [u8],
    sk_seed: &[u8],
    chain_idx: u32,
    adrs: &Adrs,
) {
    let mut sk_adrs = *adrs;
    sk_adrs.set_type_and_clear(AdrsType::WotsPrf);
    sk_adrs.set_keypair_addr(adrs.keypair_addr());
    sk_adrs.set_chain_addr(chain_idx);
    hasher.spx_prf(output, sk_seed, &sk_adrs);
}

/// Compresses the `len` chain tips in `tips` into the WOTS+ public key.
fn compress<H: TweakableHash>(hasher: &H, params: &Params, tips: &[u8], adrs: &Adrs) -> Vec<u8> {
    let mut pk_adrs = *adrs;
    pk_adrs.set_type_and_clear(AdrsType::WotsPk);
    pk_adrs.set_keypair_addr(adrs.keypair_addr());

    let mut pk = vec![0_u8; params.n()];
    hasher.spx_t_l(&mut pk, tips, &pk_adrs);
    pk
}

/// Generates the compressed WOTS+ public key of the key pair addressed by `adrs`.
///
/// `adrs` must be of type [`AdrsType::WotsHash`] with the layer, tree and key pair
/// addresses set.
pub fn pk_gen<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    sk_seed: &[u8],
    adrs: &Adrs,
) -> Vec<u8> {
    let n = params.n();
    let mut sk = Zeroizing::new(vec![0_u8; n]);
    let mut tips = vec![0_u8; params.wots_bytes()];
    let mut hash_adrs = *adrs;

    for (i, tip) in tips.chunks_exact_mut(n).enumerate() {
        chain_start(hasher, &mut sk, sk_seed, i as u32, adrs);

        hash_adrs.set_chain_addr(i as u32);
        run_chain(hasher, params, tip, &sk, 0, params.w() - 1, &mut hash_adrs);
    }

    compress(hasher, params, &tips, adrs)
}

/// Signs an `n`-byte message with the key pair addressed by `adrs`.
///
/// # Arguments
///
/// * `msg` - The message; only its first `n` bytes are signed.
/// * `sk_seed` - The `n`-byte secret seed the chain starts are derived from.
/// * `adrs` - A [`AdrsType::WotsHash`] address with the key pair address set.
///
/// # Returns
///
/// `len` chain values of `n` bytes each, or [`Error::InvalidParameter`] if `msg` is
/// shorter than `n` bytes.
pub fn sign<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    msg: &[u8],
    sk_seed: &[u8],
    adrs: &Adrs,
) -> Result<Vec<u8>> {
    let n = params.n();
    let lengths = chain_lengths(params, msg)?;
    let mut sk = Zeroizing::new(vec![0_u8; n]);
    let mut sig = vec![0_u8; params.wots_bytes()];
    let mut hash_adrs = *adrs;

    for (i, (sig_chunk, &steps)) in sig.chunks_exact_mut(n).zip(lengths.iter()).enumerate() {
        chain_start(hasher, &mut sk, sk_seed, i as u32, adrs);

        hash_adrs.set_chain_addr(i as u32);
        run_chain(hasher, params, sig_chunk, &sk, 0, steps as usize, &mut hash_adrs);
    }

    Ok(sig)
}

/// Takes a WOTS+ signature and an `n`-byte message, and computes the compressed public
/// key the signature belongs to. The caller compares it against the expected key.
///
/// # Arguments
///
/// * `sig` - The WOTS+ signature, exactly `len * n` bytes.
/// * `msg` - The signed message; only its first `n` bytes are read.
/// * `adrs` - The address the signature was made under.
///
/// # Returns
///
/// The recomputed `n`-byte public key. Fails with [`Error::MalformedSignature`] if `sig`
/// has the wrong length and with [`Error::InvalidParameter`] if `msg` is too short.
pub fn pk_from_sig<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    sig: &[u8],
    msg: &[u8],
    adrs: &Adrs,
) -> Result<Vec<u8>> {
    if sig.len() != params.wots_bytes() {
        return Err(Error::MalformedSignature {
            expected: params.wots_bytes(),
            found: sig.len(),
        });
    }

    let n = params.n();
    let w = params.w();
    let lengths = chain_lengths(params, msg)?;
    let mut tips = vec![0_u8; params.wots_bytes()];
    let mut hash_adrs = *adrs;

    for (i, ((tip, sig_chunk), &start)) in tips
        .chunks_exact_mut(n)
        .zip(sig.chunks_exact(n))
        .zip(lengths.iter())
        .enumerate()
    {
        let start = start as usize;
        hash_adrs.set_chain_addr(i as u32);
        run_chain(hasher, params, tip, sig_chunk, start, w - 1 - start, &mut hash_adrs);
    }

    Ok(compress(hasher, params, &tips, adrs))
}

/// Verifies a WOTS+ signature of an `n`-byte message against a compressed public key.
pub fn verify<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    sig: &[u8],
    msg: &[u8],
    pk: &[u8],
    adrs: &Adrs,
) -> bool {
    pk_from_sig(hasher, params, sig, msg, adrs).map_or(false, |recovered| recovered == pk)
}
